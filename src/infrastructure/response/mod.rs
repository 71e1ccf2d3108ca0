use once_cell::sync::Lazy;
use regex::Regex;

/// Blocks some models emit before the actual answer
static HIDDEN_BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<think>.*?</think>|<think\s*/>|<reasoning>.*?</reasoning>").unwrap()
});

static RESULT_PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{result\}\}").unwrap());

const WRAPPING_QUOTES: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('`', '`'), ('“', '”')];

/// Strip model artifacts from an extraction reply so only the answer remains.
/// One pair of matching wrapping quotes or backticks is removed as well, so a
/// value the model quoted on purpose loses those quotes.
pub fn clean_extraction_reply(reply: &str) -> String {
    let without_blocks = HIDDEN_BLOCK_PATTERN.replace_all(reply, "");
    let without_placeholders = RESULT_PLACEHOLDER_PATTERN.replace_all(&without_blocks, "");
    let trimmed = without_placeholders.trim();

    unwrap_quotes(trimmed).trim().to_string()
}

fn unwrap_quotes(text: &str) -> &str {
    for (open, close) in WRAPPING_QUOTES {
        if text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close) {
            return &text[open.len_utf8()..text.len() - close.len_utf8()];
        }
    }
    text
}
