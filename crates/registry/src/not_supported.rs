use sitegauge_core_types::Criterion;

/// Keyword screen for criteria that need instrumentation beyond page
/// inspection. Matching on text rather than ids keeps the screen stable
/// across catalog renumbering.
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (
        &["largest contentful paint", "lcp"],
        "Largest Contentful Paint requires Web Vitals instrumentation and cannot be measured from page inspection.",
    ),
    (
        &["cumulative layout shift", "cls"],
        "Cumulative Layout Shift requires tracking successive paints and cannot be derived from a static capture.",
    ),
    (
        &["time to first byte", "ttfb"],
        "Time To First Byte requires network-level measurement and cannot be measured from page inspection.",
    ),
    (
        &["speed index"],
        "Speed Index requires frame-capture analysis and cannot be measured from page inspection.",
    ),
    (
        &["uptime", "availability rate"],
        "Uptime requires external monitoring logs and cannot be measured in a single audit pass.",
    ),
    (
        &["action duration", "load timing"],
        "Load timing requires in-browser performance measurement and cannot be measured from page inspection.",
    ),
    (
        &["media clip duration", "video duration"],
        "Media clip duration requires decoding the clip and is not measured by this pipeline.",
    ),
];

/// Returns the canned reason when the criterion is not measurable by
/// design, whatever check kind the catalog declares.
pub fn not_supported_reason(criterion: &Criterion) -> Option<&'static str> {
    let haystack = format!("{} {}", criterion.subcategory, criterion.instruction).to_lowercase();
    KEYWORD_RULES.iter().find_map(|(keywords, reason)| {
        keywords
            .iter()
            .any(|keyword| haystack.contains(keyword))
            .then_some(*reason)
    })
}
