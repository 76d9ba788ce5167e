/// Group subtitle texts into translation-sized chunks bounded by a character
/// budget, to amortize per-call inference overhead.
///
/// Texts are concatenated with a single-space separator while
/// `chars(accumulator) + chars(text) + 1` stays within the limit; otherwise
/// the accumulator is flushed (trimmed of trailing whitespace) and a new one
/// starts with the current text. A single text longer than the limit becomes
/// its own oversized chunk, never truncated. Character counts are Unicode
/// scalar counts, not bytes, so CJK text budgets correctly.
pub fn chunk_texts(texts: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for text in texts {
        let text_chars = text.chars().count();

        if current_chars + text_chars + 1 <= limit {
            current.push_str(text);
            current.push(' ');
            current_chars += text_chars + 1;
        } else {
            if !current.is_empty() {
                chunks.push(current.trim_end().to_string());
            }
            current = format!("{} ", text);
            current_chars = text_chars + 1;
        }
    }

    if !current.is_empty() {
        chunks.push(current.trim_end().to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_chunk_under_limit() {
        let input = texts(&["Hello.", "How are you?", "Fine, thanks."]);
        let chunks = chunk_texts(&input, 100);
        assert_eq!(chunks, vec!["Hello. How are you? Fine, thanks."]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(chunk_texts(&[], 100).is_empty());
    }

    #[test]
    fn test_splits_at_limit() {
        let input = texts(&["aaaa", "bbbb", "cccc"]);
        // "aaaa bbbb " is 10 chars; adding "cccc" would need 15
        let chunks = chunk_texts(&input, 10);
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_oversized_text_becomes_own_chunk() {
        let input = texts(&["short", "this text is much longer than the limit", "tail"]);
        let chunks = chunk_texts(&input, 10);
        assert_eq!(
            chunks,
            vec!["short", "this text is much longer than the limit", "tail"]
        );
    }

    #[test]
    fn test_oversized_first_text_emits_no_empty_chunk() {
        let input = texts(&["this text is much longer than the limit"]);
        let chunks = chunk_texts(&input, 10);
        assert_eq!(chunks, vec!["this text is much longer than the limit"]);
    }

    #[test]
    fn test_limit_counts_chars_not_bytes() {
        // Each string is 4 chars but 12 bytes in UTF-8; both fit in a
        // 10-char budget only if characters are counted
        let input = texts(&["こんにち", "テスト字"]);
        let chunks = chunk_texts(&input, 10);
        assert_eq!(chunks, vec!["こんにち テスト字"]);
    }

    #[test]
    fn test_no_text_dropped_and_order_preserved() {
        let input = texts(&["one", "two", "three", "four", "five", "six"]);
        let chunks = chunk_texts(&input, 12);

        let rejoined = chunks.join(" ");
        let expected = input.join(" ");
        assert_eq!(rejoined, expected);

        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12, "chunk over limit: {:?}", chunk);
        }
    }

    #[test]
    fn test_deterministic() {
        let input = texts(&["alpha", "beta", "gamma"]);
        assert_eq!(chunk_texts(&input, 12), chunk_texts(&input, 12));
    }
}
