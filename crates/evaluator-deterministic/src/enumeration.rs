use page_adapter::PageMetrics;

use crate::CheckOutcome;

/// More slides than this buries content users never reach.
pub const MAX_CAROUSEL_SLIDES: u32 = 3;

/// PASS iff every carousel stays at or under the slide cap, or no carousel
/// exists at all.
pub fn evaluate_slide_count(metrics: &PageMetrics) -> CheckOutcome {
    let worst = match metrics
        .carousels
        .iter()
        .max_by_key(|carousel| carousel.slide_count)
    {
        Some(worst) => worst,
        None => return CheckOutcome::pass("no carousel elements on page"),
    };

    let details = format!(
        "max slide count {} ({})",
        worst.slide_count, worst.selector
    );
    if worst.slide_count <= MAX_CAROUSEL_SLIDES {
        CheckOutcome::pass(details)
    } else {
        CheckOutcome::fail(details).with_evidence(worst.selector.clone())
    }
}

/// Autoplaying carousels must expose a pause control.
pub fn evaluate_pause_control(metrics: &PageMetrics) -> CheckOutcome {
    let offender = metrics
        .carousels
        .iter()
        .find(|carousel| carousel.autoplay && !carousel.has_pause_control);

    match offender {
        Some(carousel) => CheckOutcome::fail(format!(
            "autoplaying carousel without pause control ({})",
            carousel.selector
        ))
        .with_evidence(carousel.selector.clone()),
        None => CheckOutcome::pass("no autoplaying carousel without pause control"),
    }
}

#[cfg(test)]
mod tests {
    use page_adapter::CarouselMetrics;

    use super::*;
    use crate::OutcomeKind;

    fn carousel(selector: &str, slide_count: u32, autoplay: bool, has_pause: bool) -> CarouselMetrics {
        CarouselMetrics {
            selector: selector.into(),
            slide_count,
            has_pause_control: has_pause,
            autoplay,
        }
    }

    #[test]
    fn no_carousels_passes() {
        let outcome = evaluate_slide_count(&PageMetrics::default());
        assert_eq!(outcome.kind, OutcomeKind::Pass);
    }

    #[test]
    fn three_slides_passes_four_fails() {
        let pass_metrics = PageMetrics {
            carousels: vec![carousel(".swiper", 3, false, false)],
            ..PageMetrics::default()
        };
        assert_eq!(evaluate_slide_count(&pass_metrics).kind, OutcomeKind::Pass);

        let fail_metrics = PageMetrics {
            carousels: vec![carousel(".swiper", 4, false, false)],
            ..PageMetrics::default()
        };
        let outcome = evaluate_slide_count(&fail_metrics);
        assert_eq!(outcome.kind, OutcomeKind::Fail);
        assert!(outcome.details.contains('4'));
    }

    #[test]
    fn autoplay_without_pause_fails() {
        let metrics = PageMetrics {
            carousels: vec![
                carousel(".a", 2, true, true),
                carousel(".b", 2, true, false),
            ],
            ..PageMetrics::default()
        };
        let outcome = evaluate_pause_control(&metrics);
        assert_eq!(outcome.kind, OutcomeKind::Fail);
        assert!(outcome.details.contains(".b"));
    }

    #[test]
    fn paused_or_static_carousels_pass() {
        let metrics = PageMetrics {
            carousels: vec![
                carousel(".a", 2, true, true),
                carousel(".b", 5, false, false),
            ],
            ..PageMetrics::default()
        };
        assert_eq!(evaluate_pause_control(&metrics).kind, OutcomeKind::Pass);
    }
}
