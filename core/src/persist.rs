use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::index::{DocId, InvertedIndex, Postings};

/// Write the index as one `word id1 count1 … idN countN` line per word.
/// Word and postings order are unspecified.
pub fn save_index<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path)
        .with_context(|| format!("cannot create index file {}", path.display()))?;
    let mut out = BufWriter::new(f);
    for (word, postings) in index.iter() {
        write!(out, "{word}")?;
        for (doc_id, count) in postings {
            write!(out, " {doc_id} {count}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Read an index back from disk.
///
/// A line with an odd pair-token count, a non-numeric pair token, or a
/// non-positive docID or count is dropped whole. A repeated word key is
/// treated as corruption: the first occurrence wins and the duplicate line
/// is dropped. Every line of the file is parsed; there is no header.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let f = File::open(path)
        .with_context(|| format!("cannot open index file {}", path.display()))?;
    let mut index = InvertedIndex::new();
    for (n, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        let lineno = n + 1;
        match parse_line(&line) {
            Some((word, postings)) => {
                if index.contains(&word) {
                    tracing::warn!(line = lineno, %word, "duplicate word in index file, line dropped");
                } else {
                    index.insert(word, postings);
                }
            }
            None => tracing::warn!(line = lineno, "malformed index line dropped"),
        }
    }
    Ok(index)
}

/// One codec line: the word, then (docID, count) pairs. `None` if malformed.
fn parse_line(line: &str) -> Option<(String, Postings)> {
    let mut tokens = line.split_whitespace();
    let word = tokens.next()?;
    let pairs: Vec<&str> = tokens.collect();
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        return None;
    }
    let mut postings = Postings::new();
    for pair in pairs.chunks(2) {
        let doc_id: DocId = pair[0].parse().ok().filter(|id| *id > 0)?;
        let count: u32 = pair[1].parse().ok().filter(|c| *c > 0)?;
        postings.insert(doc_id, count);
    }
    Some((word.to_string(), postings))
}
