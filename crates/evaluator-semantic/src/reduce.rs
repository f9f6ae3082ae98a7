use once_cell::sync::Lazy;
use regex::Regex;

static INVISIBLE_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg|iframe)\b.*?</(script|style|noscript|svg|iframe)>")
        .unwrap()
});
static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Reduce raw markup to visible text: drop script/style/noscript/svg/iframe
/// subtrees and comments, strip the remaining tags, collapse whitespace and
/// cap the length. Pure function of its inputs.
pub fn reduce_markup(html: &str, max_chars: usize) -> String {
    let without_blocks = INVISIBLE_BLOCKS.replace_all(html, "\n");
    let without_comments = COMMENTS.replace_all(&without_blocks, "");
    let text = TAGS.replace_all(&without_comments, "\n");
    let collapsed_spaces = SPACE_RUNS.replace_all(&text, " ");
    let collapsed = BLANK_RUNS.replace_all(&collapsed_spaces, "\n");

    let trimmed = collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&trimmed, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
