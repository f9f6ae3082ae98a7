use sitegauge_core_types::SemanticVerdict;

/// Decode service output into a verdict. The service is instructed to reply
/// with bare JSON but reasoning models wrap it in prose or code fences often
/// enough that we hunt for an embedded object before giving up. Decode
/// failure yields the unparseable fallback, never an error.
pub fn decode(raw: &str) -> SemanticVerdict {
    let candidate = match extract_json_object(raw) {
        Some(candidate) => candidate,
        None => return SemanticVerdict::unparseable("no JSON object in response"),
    };
    match serde_json::from_str::<SemanticVerdict>(&candidate) {
        Ok(mut verdict) => {
            verdict.confidence = verdict.confidence.clamp(0.0, 1.0);
            verdict
        }
        Err(err) => SemanticVerdict::unparseable(err),
    }
}

/// Pull the first complete JSON object out of free text: bare objects,
/// fenced blocks, then brace-matched substrings.
fn extract_json_object(raw: &str) -> Option<String> {
    if raw.trim_start().starts_with('{') {
        return Some(trim_symmetric(raw));
    }

    let fence = "```";
    if let Some(start) = raw.find(fence) {
        let after_fence = &raw[start + fence.len()..];
        let after_lang = after_fence.trim_start_matches(|c: char| c.is_alphanumeric() || c == '_');
        if let Some(end) = after_lang.find(fence) {
            let block = &after_lang[..end];
            if block.contains('{') {
                return Some(trim_symmetric(block));
            }
        }
    }

    raw.split('{').nth(1).and_then(|rest| {
        let mut depth = 1i32;
        for (idx, ch) in rest.char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let mut candidate = String::from("{");
                        candidate.push_str(&rest[..=idx]);
                        return Some(trim_symmetric(&candidate));
                    }
                }
                _ => {}
            }
        }
        None
    })
}

fn trim_symmetric(value: &str) -> String {
    value.trim().trim_matches('`').trim().to_string()
}
