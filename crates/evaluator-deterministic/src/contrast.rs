use page_adapter::{PageMetrics, Rgb};

use crate::CheckOutcome;

/// WCAG AA threshold for normal text.
pub const MIN_CONTRAST_RATIO: f64 = 4.5;

/// Relative luminance of an sRGB color, gamma correction per channel.
pub fn relative_luminance(color: Rgb) -> f64 {
    fn linearize(channel: u8) -> f64 {
        let c = channel as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// Contrast ratio between two colors, always >= 1.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let lum_a = relative_luminance(a);
    let lum_b = relative_luminance(b);
    let lighter = lum_a.max(lum_b);
    let darker = lum_a.min(lum_b);
    (lighter + 0.05) / (darker + 0.05)
}

/// PASS iff every sampled element meets the threshold; the detail string
/// reports the worst offender.
pub fn evaluate(metrics: &PageMetrics) -> CheckOutcome {
    if metrics.contrast_samples.is_empty() {
        return CheckOutcome::unmeasurable("no contrast samples extracted from page");
    }

    let mut worst_ratio = f64::INFINITY;
    let mut worst_selector = "";
    for sample in &metrics.contrast_samples {
        let ratio = contrast_ratio(sample.foreground, sample.background);
        if ratio < worst_ratio {
            worst_ratio = ratio;
            worst_selector = &sample.selector;
        }
    }

    let details = format!("contrast {:.1}:1 ({})", worst_ratio, worst_selector);
    if worst_ratio >= MIN_CONTRAST_RATIO {
        CheckOutcome::pass(details)
    } else {
        CheckOutcome::fail(details).with_evidence(worst_selector)
    }
}

#[cfg(test)]
mod tests {
    use page_adapter::ContrastSample;

    use super::*;
    use crate::OutcomeKind;

    fn metrics_with(foreground: Rgb, background: Rgb) -> PageMetrics {
        PageMetrics {
            contrast_samples: vec![ContrastSample {
                selector: "body".into(),
                foreground,
                background,
            }],
            ..PageMetrics::default()
        }
    }

    #[test]
    fn black_on_white_is_maximal() {
        let ratio = contrast_ratio(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = Rgb::new(10, 120, 200);
        let b = Rgb::new(250, 250, 240);
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn ratio_below_threshold_fails() {
        // gray 120 on white computes to ~4.4:1
        let metrics = metrics_with(Rgb::new(120, 120, 120), Rgb::new(255, 255, 255));
        let ratio = contrast_ratio(Rgb::new(120, 120, 120), Rgb::new(255, 255, 255));
        assert!(ratio < MIN_CONTRAST_RATIO);

        let outcome = evaluate(&metrics);
        assert_eq!(outcome.kind, OutcomeKind::Fail);
        assert!(outcome.details.contains("4.4"));
        assert_eq!(outcome.evidence_selector.as_deref(), Some("body"));
    }

    #[test]
    fn ratio_above_threshold_passes_and_reports_value() {
        // gray 109 on white computes to ~5.2:1
        let metrics = metrics_with(Rgb::new(109, 109, 109), Rgb::new(255, 255, 255));
        let outcome = evaluate(&metrics);
        assert_eq!(outcome.kind, OutcomeKind::Pass);
        assert!(outcome.details.contains("5.2"));
    }

    #[test]
    fn worst_sample_decides() {
        let metrics = PageMetrics {
            contrast_samples: vec![
                ContrastSample {
                    selector: "h1".into(),
                    foreground: Rgb::new(0, 0, 0),
                    background: Rgb::new(255, 255, 255),
                },
                ContrastSample {
                    selector: ".hero p".into(),
                    foreground: Rgb::new(200, 200, 200),
                    background: Rgb::new(255, 255, 255),
                },
            ],
            ..PageMetrics::default()
        };
        let outcome = evaluate(&metrics);
        assert_eq!(outcome.kind, OutcomeKind::Fail);
        assert!(outcome.details.contains(".hero p"));
    }

    #[test]
    fn missing_samples_are_unmeasurable() {
        let outcome = evaluate(&PageMetrics::default());
        assert_eq!(outcome.kind, OutcomeKind::Unmeasurable);
    }
}
