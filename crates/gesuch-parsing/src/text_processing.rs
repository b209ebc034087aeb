/// Return at most the first `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// The context window starting at byte offset `start` and spanning at most
/// `max_chars` characters, or up to the end of the text.
///
/// `start` must lie on a char boundary, which holds for regex match offsets.
pub fn window_from(text: &str, start: usize, max_chars: usize) -> &str {
    truncate_chars(&text[start..], max_chars)
}

/// Number of characters (not bytes) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Größe", 3), "Grö");
        assert_eq!(truncate_chars("kurz", 10), "kurz");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_window_from_offset() {
        let text = "Einleitung. TP 1: Medien CHF 100";
        let start = text.find("TP").unwrap();
        assert_eq!(window_from(text, start, 4), "TP 1");
        assert_eq!(window_from(text, start, 500), "TP 1: Medien CHF 100");
    }

    #[test]
    fn test_char_len_counts_umlauts_once() {
        assert_eq!(char_len("Maßnahme"), 8);
    }
}
