use page_adapter::{CoverageAspect, PageMetrics};

use crate::CheckOutcome;

/// Ratio of matching to total elements against the criterion's own
/// minimum. An empty population is vacuously compliant.
pub fn evaluate(metrics: &PageMetrics, aspect: CoverageAspect, minimum: f64) -> CheckOutcome {
    let count = match metrics.coverage_for(aspect) {
        Some(count) => count,
        None => {
            return CheckOutcome::unmeasurable(format!(
                "coverage counts for {aspect:?} not extracted"
            ))
        }
    };

    if count.total == 0 {
        return CheckOutcome::pass("no elements to measure");
    }

    let ratio = count.matching as f64 / count.total as f64;
    let details = format!(
        "coverage {:.2} ({}/{}), minimum {:.2}",
        ratio, count.matching, count.total, minimum
    );
    if ratio >= minimum {
        CheckOutcome::pass(details)
    } else {
        CheckOutcome::fail(details)
    }
}

#[cfg(test)]
mod tests {
    use page_adapter::CoverageCount;

    use super::*;
    use crate::OutcomeKind;

    fn metrics(aspect: CoverageAspect, matching: u32, total: u32) -> PageMetrics {
        PageMetrics {
            coverage: vec![(aspect, CoverageCount { matching, total })],
            ..PageMetrics::default()
        }
    }

    #[test]
    fn nine_of_ten_meets_eighty_percent() {
        let outcome = evaluate(&metrics(CoverageAspect::AltText, 9, 10), CoverageAspect::AltText, 0.8);
        assert_eq!(outcome.kind, OutcomeKind::Pass);
        assert!(outcome.details.contains("0.9"));
    }

    #[test]
    fn seven_of_ten_misses_eighty_percent() {
        let outcome = evaluate(&metrics(CoverageAspect::AltText, 7, 10), CoverageAspect::AltText, 0.8);
        assert_eq!(outcome.kind, OutcomeKind::Fail);
        assert!(outcome.details.contains("0.70"));
    }

    #[test]
    fn empty_population_is_vacuous_pass() {
        let outcome = evaluate(
            &metrics(CoverageAspect::ExternalLinkMark, 0, 0),
            CoverageAspect::ExternalLinkMark,
            0.5,
        );
        assert_eq!(outcome.kind, OutcomeKind::Pass);
        assert!(outcome.details.contains("no elements"));
    }

    #[test]
    fn missing_counts_are_unmeasurable() {
        let outcome = evaluate(&PageMetrics::default(), CoverageAspect::LinkDecoration, 0.6);
        assert_eq!(outcome.kind, OutcomeKind::Unmeasurable);
    }
}
