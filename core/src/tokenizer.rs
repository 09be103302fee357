use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[a-zA-Z]+").expect("valid regex");
}

const MIN_WORD_LEN: usize = 3;

/// Gate for indexable words: at least three characters, every one ASCII
/// alphabetic. Accepted words are lowercased.
pub fn normalize_word(raw: &str) -> Option<String> {
    if raw.len() < MIN_WORD_LEN || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(raw.to_ascii_lowercase())
}

/// The indexable words of an HTML page, in document order: text content with
/// tags stripped, split into maximal alphabetic runs, gated by
/// [`normalize_word`].
pub fn words(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let text = doc.root_element().text().collect::<Vec<_>>().join(" ");
    WORD_RE
        .find_iter(&text)
        .filter_map(|m| normalize_word(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_rejects_short_and_non_alpha() {
        assert_eq!(normalize_word("ab"), None);
        assert_eq!(normalize_word(""), None);
        assert_eq!(normalize_word("abc1"), None);
        assert_eq!(normalize_word("don't"), None);
        assert_eq!(normalize_word("The"), Some("the".to_string()));
        assert_eq!(normalize_word("Dartmouth"), Some("dartmouth".to_string()));
    }

    #[test]
    fn words_strip_tags_and_split_on_non_alpha() {
        let html = "<html><head><title>Tiny Page</title></head>\
                    <body><p>Computer science, comp-sci &amp; CS!</p></body></html>";
        let w = words(html);
        assert_eq!(w, vec!["tiny", "page", "computer", "science", "comp", "sci"]);
    }

    #[test]
    fn words_keep_duplicates_in_order() {
        let html = "<html><body>alpha beta alpha</body></html>";
        assert_eq!(words(html), vec!["alpha", "beta", "alpha"]);
    }
}
