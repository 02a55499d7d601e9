//! Markdown formatting for page text.

/// Wrap extracted page text in a fenced `text` code block.
///
/// The page text is emitted verbatim between the fences; consumers render it
/// as preformatted text, which keeps whatever line structure the extraction
/// produced.
pub fn fenced_text_block(text: &str) -> String {
    format!("```text\n{text}\n```")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_text_in_fences() {
        assert_eq!(fenced_text_block("hello"), "```text\nhello\n```");
    }

    #[test]
    fn empty_page_still_produces_a_block() {
        assert_eq!(fenced_text_block(""), "```text\n\n```");
    }
}
