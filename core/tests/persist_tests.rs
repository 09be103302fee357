use std::fs;

use tempfile::tempdir;
use webdex::persist::{load_index, load_page, save_index, save_page};
use webdex::{InvertedIndex, PageRecord};

fn page(url: &str, depth: u32, html: &str) -> PageRecord {
    PageRecord { url: url.to_string(), depth, html: html.to_string() }
}

#[test]
fn page_round_trip_is_exact() {
    let dir = tempdir().unwrap();
    let saved = page("https://example.edu/a", 2, "<html><body>hello</body></html>");
    save_page(dir.path(), 7, &saved).unwrap();
    let loaded = load_page(dir.path(), 7).unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn page_html_may_contain_newlines() {
    let dir = tempdir().unwrap();
    let saved = page("https://example.edu/b", 0, "<html>\n<body>\nlines\n</body>\n</html>\n");
    save_page(dir.path(), 1, &saved).unwrap();
    assert_eq!(load_page(dir.path(), 1).unwrap(), saved);
}

#[test]
fn page_file_has_no_trailing_newline_after_html() {
    let dir = tempdir().unwrap();
    let saved = page("https://example.edu/c", 1, "<html>x</html>");
    save_page(dir.path(), 3, &saved).unwrap();
    let raw = fs::read_to_string(dir.path().join("3")).unwrap();
    assert_eq!(raw, "https://example.edu/c\n1\n14\n<html>x</html>");
}

#[test]
fn load_page_fails_on_missing_file() {
    let dir = tempdir().unwrap();
    assert!(load_page(dir.path(), 42).is_err());
}

#[test]
fn load_page_fails_on_truncated_html() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("5"), "https://example.edu/d\n0\n100\nshort").unwrap();
    assert!(load_page(dir.path(), 5).is_err());
}

#[test]
fn index_round_trip_preserves_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index");

    let mut index = InvertedIndex::new();
    for _ in 0..3 {
        index.add_occurrence("dartmouth", 1);
    }
    index.add_occurrence("computer", 1);
    index.add_occurrence("computer", 2);
    index.add_occurrence("computer", 2);

    save_index(&path, &index).unwrap();
    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded, index);
}

#[test]
fn empty_index_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index");
    save_index(&path, &InvertedIndex::new()).unwrap();
    let loaded = load_index(&path).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn index_line_format_matches_insertion_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index");

    let mut index = InvertedIndex::new();
    index.add_occurrence("science", 2);
    index.add_occurrence("science", 1);

    save_index(&path, &index).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw, "science 2 1 1 1\n");
}

#[test]
fn load_index_rejects_dangling_doc_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index");
    fs::write(&path, "word 3\n").unwrap();
    assert!(load_index(&path).is_err());
}

#[test]
fn load_index_rejects_non_numeric_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index");
    fs::write(&path, "word one 2\n").unwrap();
    assert!(load_index(&path).is_err());
}
