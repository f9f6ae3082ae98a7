use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})$").unwrap());
static RGB_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})(?:\s*,\s*\d*\.?\d+)?\s*\)$")
        .unwrap()
});

/// An sRGB triple as sampled from computed styles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS color value (`#rgb`, `#rrggbb`, `rgb()`, `rgba()`).
    /// Alpha channels are ignored; anything else yields `None`.
    pub fn from_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(captures) = HEX_COLOR.captures(value) {
            let hex = captures.get(1)?.as_str();
            let expanded = if hex.len() == 3 {
                hex.chars().flat_map(|c| [c, c]).collect::<String>()
            } else {
                hex.to_string()
            };
            let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
            let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
            let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
            return Some(Self { r, g, b });
        }
        if let Some(captures) = RGB_COLOR.captures(value) {
            let channel = |idx: usize| -> Option<u8> {
                captures.get(idx)?.as_str().parse::<u16>().ok()?.try_into().ok()
            };
            return Some(Self {
                r: channel(1)?,
                g: channel(2)?,
                b: channel(3)?,
            });
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Foreground/background pair sampled from one element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContrastSample {
    pub selector: String,
    pub foreground: Rgb,
    pub background: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarouselMetrics {
    pub selector: String,
    pub slide_count: u32,
    pub has_pause_control: bool,
    pub autoplay: bool,
}

/// Which ratio a coverage count measures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageAspect {
    AltText,
    LinkDecoration,
    ExternalLinkMark,
    HeadingHierarchy,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CoverageCount {
    pub matching: u32,
    pub total: u32,
}

/// Everything the deterministic checks read. Produced once per page by the
/// page-access implementation; the engine never re-queries the DOM.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageMetrics {
    pub viewport: Option<Viewport>,
    pub hero_height: Option<f64>,
    pub contrast_samples: Vec<ContrastSample>,
    pub carousels: Vec<CarouselMetrics>,
    pub coverage: Vec<(CoverageAspect, CoverageCount)>,
}

impl PageMetrics {
    pub fn coverage_for(&self, aspect: CoverageAspect) -> Option<CoverageCount> {
        self.coverage
            .iter()
            .find(|(candidate, _)| *candidate == aspect)
            .map(|(_, count)| *count)
    }
}
