use page_adapter::PageMetrics;

use crate::CheckOutcome;

/// A hero block taller than half the viewport pushes content below the fold.
pub const MAX_HERO_VIEWPORT_RATIO: f64 = 0.5;

pub fn evaluate_hero_ratio(metrics: &PageMetrics) -> CheckOutcome {
    let viewport = match metrics.viewport {
        Some(viewport) if viewport.height > 0.0 => viewport,
        _ => return CheckOutcome::unmeasurable("viewport dimensions unavailable"),
    };
    let hero_height = match metrics.hero_height {
        Some(height) => height,
        // no hero block cannot violate the threshold
        None => return CheckOutcome::pass("no hero element on page"),
    };

    let ratio = hero_height / viewport.height;
    let details = format!(
        "hero/viewport ratio {:.2} ({:.0}px of {:.0}px)",
        ratio, hero_height, viewport.height
    );
    if ratio <= MAX_HERO_VIEWPORT_RATIO {
        CheckOutcome::pass(details)
    } else {
        CheckOutcome::fail(details)
    }
}

#[cfg(test)]
mod tests {
    use page_adapter::Viewport;

    use super::*;
    use crate::OutcomeKind;

    fn metrics(viewport_height: f64, hero_height: Option<f64>) -> PageMetrics {
        PageMetrics {
            viewport: Some(Viewport {
                width: 1280.0,
                height: viewport_height,
            }),
            hero_height,
            ..PageMetrics::default()
        }
    }

    #[test]
    fn half_viewport_or_less_passes() {
        let outcome = evaluate_hero_ratio(&metrics(800.0, Some(400.0)));
        assert_eq!(outcome.kind, OutcomeKind::Pass);
        assert!(outcome.details.contains("0.50"));
    }

    #[test]
    fn oversized_hero_fails() {
        let outcome = evaluate_hero_ratio(&metrics(800.0, Some(600.0)));
        assert_eq!(outcome.kind, OutcomeKind::Fail);
        assert!(outcome.details.contains("0.75"));
    }

    #[test]
    fn absent_hero_passes() {
        let outcome = evaluate_hero_ratio(&metrics(800.0, None));
        assert_eq!(outcome.kind, OutcomeKind::Pass);
    }

    #[test]
    fn missing_viewport_is_unmeasurable() {
        let outcome = evaluate_hero_ratio(&PageMetrics {
            hero_height: Some(500.0),
            ..PageMetrics::default()
        });
        assert_eq!(outcome.kind, OutcomeKind::Unmeasurable);
    }
}
