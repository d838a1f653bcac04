use search_core::{persist, InvertedIndex, Page, PageDir};
use tempfile::tempdir;

fn save_page(pages: &PageDir, doc_id: u32, url: &str, body: &str) {
    let page = Page {
        url: url.to_string(),
        depth: 0,
        content: format!("<html><body>{body}</body></html>"),
    };
    pages.save(&page, doc_id).unwrap();
}

#[test]
fn build_save_load_round_trip() {
    let dir = tempdir().unwrap();
    let pages = PageDir::new(dir.path());
    pages.init().unwrap();
    save_page(&pages, 1, "https://example.com/", "the cat sat on the mat");
    save_page(&pages, 2, "https://example.com/a", "cat and dog and dog");

    let built = InvertedIndex::build(&pages);
    assert_eq!(built.postings("cat").unwrap()[&1], 1);
    assert_eq!(built.postings("cat").unwrap()[&2], 1);
    assert_eq!(built.postings("dog").unwrap()[&2], 2);
    assert_eq!(built.postings("the").unwrap()[&1], 2);
    // "on" is below the length floor, "and" is not (three letters)
    assert!(built.postings("on").is_none());
    assert_eq!(built.postings("and").unwrap()[&2], 2);

    let file = dir.path().join("index");
    persist::save_index(&file, &built).unwrap();
    let loaded = persist::load_index(&file).unwrap();
    assert_eq!(loaded, built);
}

#[test]
fn build_honors_enumeration_contract() {
    let dir = tempdir().unwrap();
    let pages = PageDir::new(dir.path());
    pages.init().unwrap();
    save_page(&pages, 1, "https://example.com/", "alpha");
    // gap at 2; the record at 3 must never be indexed
    save_page(&pages, 3, "https://example.com/b", "gamma");

    let built = InvertedIndex::build(&pages);
    assert!(built.postings("alpha").is_some());
    assert!(built.postings("gamma").is_none());
}
