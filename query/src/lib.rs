use std::path::Path;

use webdex::persist::load_page;
use webdex::{DocId, InvertedIndex};

const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";
const META_DESCRIPTION: &str = "<meta name=\"description\"";
const CONTENT_ATTR: &str = "content=\"";
const SNIPPET_MAX_BYTES: usize = 128;

/// One token of a query after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    Term(String),
}

impl Token {
    fn is_operator(&self) -> bool {
        matches!(self, Token::And | Token::Or)
    }
}

/// A document matched by a query: its score plus the metadata shown in the
/// result listing. Metadata fields stay empty until [`attach_metadata`] runs
/// and remain empty when the page file is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedDoc {
    pub doc_id: DocId,
    pub score: u32,
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl RankedDoc {
    fn new(doc_id: DocId, score: u32) -> Self {
        RankedDoc {
            doc_id,
            score,
            url: String::new(),
            title: String::new(),
            snippet: String::new(),
        }
    }
}

/// Split a raw query on spaces and tabs and produce the token stream.
///
/// Any token containing a non-alphabetic character rejects the whole query
/// (`None`). Tokens shorter than three characters are dropped unless the
/// token is exactly `or`, and an implicit `and` is inserted between adjacent
/// terms.
pub fn tokenize_query(raw: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    for part in raw.split([' ', '\t']).filter(|p| !p.is_empty()) {
        if !part.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let word = part.to_ascii_lowercase();
        if word.len() < 3 && word != "or" {
            continue;
        }
        let token = match word.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            _ => Token::Term(word),
        };
        if let (Some(Token::Term(_)), Token::Term(_)) = (tokens.last(), &token) {
            tokens.push(Token::And);
        }
        tokens.push(token);
    }
    Some(tokens)
}

/// A token stream is valid when it is non-empty, does not start or end with
/// an operator, and contains no two adjacent operators.
pub fn validate_query(tokens: &[Token]) -> bool {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) if !first.is_operator() && !last.is_operator() => {}
        _ => return false,
    }
    !tokens
        .windows(2)
        .any(|w| w[0].is_operator() && w[1].is_operator())
}

/// Evaluate a validated token stream against the index, with `and` binding
/// tighter than `or`.
///
/// Single linear pass over the tokens: a term pushes a fresh result list
/// copied from its postings (a missing term pushes an empty list), a pending
/// `and` combines the two topmost lists immediately, and whatever remains on
/// the stack afterwards is folded with `or`. The index itself is never
/// touched, so repeated queries see identical postings.
pub fn evaluate(tokens: &[Token], index: &InvertedIndex) -> Vec<RankedDoc> {
    let mut stack: Vec<Vec<RankedDoc>> = Vec::new();
    let mut pending_and = false;
    for token in tokens {
        match token {
            Token::And => pending_and = true,
            Token::Or => pending_and = false,
            Token::Term(term) => {
                let list = index
                    .postings(term)
                    .map(|ps| ps.iter().map(|p| RankedDoc::new(p.doc_id, p.count)).collect())
                    .unwrap_or_default();
                stack.push(list);
                if pending_and {
                    if let (Some(top), Some(below)) = (stack.pop(), stack.pop()) {
                        stack.push(and_combine(top, below));
                    }
                }
            }
        }
    }
    let mut result = stack.pop().unwrap_or_default();
    while let Some(below) = stack.pop() {
        result = or_combine(result, below);
    }
    result
}

/// Intersection: one entry per document present in both lists, scored with
/// the smaller of the two scores. Output order follows `driver`.
fn and_combine(driver: Vec<RankedDoc>, other: Vec<RankedDoc>) -> Vec<RankedDoc> {
    let mut out = Vec::new();
    for doc in driver {
        if let Some(o) = other.iter().find(|o| o.doc_id == doc.doc_id) {
            out.push(RankedDoc::new(doc.doc_id, doc.score.min(o.score)));
        }
    }
    out
}

/// Union: every document in either list; a document in both gets the sum of
/// its two scores. Output order is `acc` with new documents appended.
fn or_combine(mut acc: Vec<RankedDoc>, other: Vec<RankedDoc>) -> Vec<RankedDoc> {
    for doc in other {
        match acc.iter_mut().find(|a| a.doc_id == doc.doc_id) {
            Some(a) => a.score += doc.score,
            None => acc.push(doc),
        }
    }
    acc
}

/// Order results by score descending; ties fall back to ascending document
/// id so repeated queries render identically.
pub fn rank(docs: &mut [RankedDoc]) {
    docs.sort_by(|a, b| b.score.cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
}

/// Fill in url, title and snippet for each result from its stored page. A
/// missing or unreadable page leaves the fields empty; the result is still
/// listed.
pub fn attach_metadata(docs: &mut [RankedDoc], page_dir: &Path) {
    for doc in docs.iter_mut() {
        if let Ok(page) = load_page(page_dir, doc.doc_id) {
            doc.url = page.url;
            doc.title = extract_title(&page.html).unwrap_or_default();
            doc.snippet = extract_snippet(&page.html).unwrap_or_default();
        }
    }
}

/// The text between the first `<title>` and the following `</title>`,
/// located by plain substring search on the raw HTML.
pub fn extract_title(html: &str) -> Option<String> {
    let start = html.find(TITLE_OPEN)? + TITLE_OPEN.len();
    let end = html[start..].find(TITLE_CLOSE)?;
    Some(html[start..start + end].to_string())
}

/// The `content="…"` value following the first `<meta name="description"`,
/// truncated to at most 128 bytes (backing off to a character boundary).
pub fn extract_snippet(html: &str) -> Option<String> {
    let meta = html.find(META_DESCRIPTION)?;
    let rest = &html[meta..];
    let value = &rest[rest.find(CONTENT_ATTR)? + CONTENT_ATTR.len()..];
    let end = value.find('"')?;
    let mut cut = end.min(SNIPPET_MAX_BYTES);
    while !value.is_char_boundary(cut) {
        cut -= 1;
    }
    Some(value[..cut].to_string())
}

/// One rendered result block. Absent fields render as empty strings.
pub fn render(doc: &RankedDoc) -> String {
    format!(
        "title: {}\nrank:{} doc:{} : {}\n{}...\n\n",
        doc.title, doc.score, doc.doc_id, doc.url, doc.snippet
    )
}
