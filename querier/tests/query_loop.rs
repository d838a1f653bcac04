use querier::process_queries;
use search_core::{InvertedIndex, Page, PageDir};
use std::io::Cursor;
use tempfile::tempdir;

/// Two-document corpus with the postings cat={1:2, 2:1}, dog={2:3}.
fn fixture(dir: &std::path::Path) -> (InvertedIndex, PageDir) {
    let pages = PageDir::new(dir);
    pages.init().unwrap();
    for (doc_id, url) in [(1, "https://example.com/"), (2, "https://example.com/pets")] {
        let page = Page { url: url.into(), depth: 0, content: "<html></html>".into() };
        pages.save(&page, doc_id).unwrap();
    }

    let mut index = InvertedIndex::new();
    index.insert("cat".into(), [(1, 2), (2, 1)].into_iter().collect());
    index.insert("dog".into(), [(2, 3)].into_iter().collect());
    (index, pages)
}

fn run(input: &str) -> String {
    let dir = tempdir().unwrap();
    let (index, pages) = fixture(dir.path());
    let mut out = Vec::new();
    process_queries(Cursor::new(input), &mut out, &index, &pages).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn or_query_ranks_higher_score_first() {
    let out = run("cat or dog\n");
    assert!(out.contains("Query: cat or dog"));
    assert!(out.contains("Matches 2 documents (ranked):"));
    let lines: Vec<&str> = out.lines().collect();
    let doc2 = lines.iter().position(|l| l.contains("doc\t2")).unwrap();
    let doc1 = lines.iter().position(|l| l.contains("doc\t1")).unwrap();
    assert!(doc2 < doc1, "doc 2 (score 4) must outrank doc 1 (score 2):\n{out}");
    assert!(lines[doc2].contains("score\t4"));
    assert!(lines[doc2].contains("https://example.com/pets"));
    assert!(lines[doc1].contains("score\t2"));
}

#[test]
fn and_query_reports_min_count() {
    let out = run("cat and dog\n");
    assert!(out.contains("Matches 1 documents (ranked):"));
    assert!(out.contains("score\t1 doc\t2: https://example.com/pets"));
}

#[test]
fn unmatched_query_is_a_normal_outcome() {
    let out = run("zebra\n");
    assert!(out.contains("Query: zebra"));
    assert!(out.contains("No documents match."));
}

#[test]
fn invalid_query_is_rejected_without_output() {
    let out = run("and hello\n");
    // rejected before evaluation: no echo, no results, just the next prompt
    assert!(!out.contains("Query: and hello"));
    assert!(!out.contains("Matches"));
}

#[test]
fn blank_line_reprompts() {
    let out = run("\n   \ncat and dog\n");
    assert_eq!(out.matches("Query? ").count(), 4);
    assert!(out.contains("Matches 1 documents"));
}

#[test]
fn exit_stops_the_loop() {
    let out = run("exit\ncat or dog\n");
    assert_eq!(out.matches("Query? ").count(), 1);
    assert!(!out.contains("Matches"));
}

#[test]
fn end_of_input_stops_the_loop() {
    let out = run("");
    assert_eq!(out.matches("Query? ").count(), 1);
}

#[test]
fn queries_are_independent() {
    let out = run("cat and dog\ncat or dog\n");
    assert!(out.contains("Matches 1 documents (ranked):"));
    assert!(out.contains("Matches 2 documents (ranked):"));
}
