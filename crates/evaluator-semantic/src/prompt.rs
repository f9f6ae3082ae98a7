use sitegauge_core_types::Criterion;

/// Build the judgment prompt for one criterion. Pure function: the same
/// criterion always yields the same prompt, so a criterion+content pair maps
/// to exactly one request shape.
pub fn build_prompt(criterion: &Criterion) -> String {
    format!(
        r#"You are an expert auditor of corporate websites, evaluating one
page against a single quality criterion.

## Criterion
"{category} / {subcategory}"

## Judgment rule
{instruction}

## How to judge
- The text you receive is the visible content of the page under audit.
- Answer found: true only when the page gives clear evidence for the rule.
- When the evidence is ambiguous or missing, answer found: false.

## Examples

### PASS example:
The text contains a "News" section listing several dated disclosure items
-> {{ "found": true, "confidence": 0.9, "details": "dated disclosure news list present" }}

### FAIL example:
The text mentions news but nothing distinguishes it as the required content
-> {{ "found": false, "confidence": 0.7, "details": "generic news only, required list not identifiable" }}

## Output format
Reply with this JSON object only, no surrounding prose:

{{
  "found": true/false,
  "confidence": 0.0-1.0,
  "details": "concrete evidence for the judgment, at most 100 words"
}}

Begin the judgment."#,
        category = criterion.category,
        subcategory = criterion.subcategory,
        instruction = criterion.instruction,
    )
}

#[cfg(test)]
mod tests {
    use sitegauge_core_types::{CheckKind, CriterionId};

    use super::*;

    fn criterion() -> Criterion {
        Criterion {
            id: CriterionId(7),
            category: "Navigation".into(),
            subcategory: "Breadcrumbs".into(),
            check_kind: CheckKind::Semantic,
            evaluator_key: "semantic".into(),
            instruction: "Breadcrumbs must reflect the page hierarchy.".into(),
        }
    }

    #[test]
    fn embeds_criterion_fields() {
        let prompt = build_prompt(&criterion());
        assert!(prompt.contains("Navigation / Breadcrumbs"));
        assert!(prompt.contains("Breadcrumbs must reflect the page hierarchy."));
        assert!(prompt.contains("\"found\""));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(build_prompt(&criterion()), build_prompt(&criterion()));
    }
}
