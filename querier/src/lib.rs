//! Boolean query engine: tokenize and validate a raw query, evaluate its
//! AND/OR expression against the inverted index, rank the matches, and
//! render them with URLs read back from the page store.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use search_core::words::{self, MIN_WORD_LEN};
use search_core::{DocId, InvertedIndex, PageDir, Postings};

/// One element of a tokenized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    And,
    Or,
}

impl Token {
    fn operator(&self) -> Option<&'static str> {
        match self {
            Token::And => Some("and"),
            Token::Or => Some("or"),
            Token::Word(_) => None,
        }
    }
}

/// A matching document and its cumulative relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocScore {
    pub doc_id: DocId,
    pub score: u32,
}

/// Lowercase a raw query and split it into tokens.
///
/// Every token must be purely alphabetic; a word shorter than
/// [`MIN_WORD_LEN`] is invalid unless it is the reserved `or` (`and`
/// passes the length rule on its own).
pub fn tokenize(raw: &str) -> Result<Vec<Token>> {
    let cleaned = words::normalize(raw);
    let mut tokens = Vec::new();
    for part in cleaned.split_whitespace() {
        if let Some(bad) = part.chars().find(|c| !c.is_ascii_alphabetic()) {
            bail!("bad character '{bad}' in query");
        }
        let token = match part {
            "and" => Token::And,
            "or" => Token::Or,
            word if word.len() < MIN_WORD_LEN => bail!("'{word}' is an invalid word"),
            word => Token::Word(word.to_string()),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Grammar check over the token stream: non-empty, no leading or trailing
/// operator, no two operators in a row. Any violation rejects the whole
/// query; nothing is evaluated partially.
pub fn validate(tokens: &[Token]) -> Result<()> {
    let Some(first) = tokens.first() else {
        bail!("empty query");
    };
    if let Some(op) = first.operator() {
        bail!("'{op}' cannot be first");
    }
    if let Some(op) = tokens.last().and_then(Token::operator) {
        bail!("'{op}' cannot be last");
    }
    for pair in tokens.windows(2) {
        if let (Some(a), Some(b)) = (pair[0].operator(), pair[1].operator()) {
            bail!("'{b}' cannot follow '{a}'");
        }
    }
    Ok(())
}

/// Evaluate a validated token stream against the index.
///
/// `temp` holds the running intersection of the current AND-chain; docs
/// that drop out of an intersection are zeroed, not removed, so the final
/// fold cannot resurrect them. `or` folds `temp` into `final` by per-doc
/// addition. Scores of 0 mean logically absent.
pub fn evaluate(tokens: &[Token], index: &InvertedIndex) -> HashMap<DocId, u32> {
    let mut final_scores: HashMap<DocId, u32> = HashMap::new();
    let mut temp: Option<HashMap<DocId, u32>> = None;

    for token in tokens {
        match token {
            Token::And => {}
            Token::Or => {
                if let Some(group) = temp.take() {
                    fold_into(&mut final_scores, group);
                }
            }
            Token::Word(word) => {
                let postings = index.postings(word);
                match temp.as_mut() {
                    None => temp = Some(postings.cloned().unwrap_or_default()),
                    Some(group) => intersect(group, postings),
                }
            }
        }
    }
    if let Some(group) = temp.take() {
        fold_into(&mut final_scores, group);
    }
    final_scores
}

/// AND step: keep the per-doc minimum; zero the docs missing from `postings`.
fn intersect(group: &mut HashMap<DocId, u32>, postings: Option<&Postings>) {
    for (doc_id, count) in group.iter_mut() {
        let other = postings.and_then(|p| p.get(doc_id)).copied().unwrap_or(0);
        *count = (*count).min(other);
    }
}

/// OR fold: per-doc addition, treating absent docs as zero.
fn fold_into(final_scores: &mut HashMap<DocId, u32>, group: HashMap<DocId, u32>) {
    for (doc_id, count) in group {
        *final_scores.entry(doc_id).or_insert(0) += count;
    }
}

/// Ranked results: positive scores only, descending score, ascending docID
/// between equal scores.
pub fn rank(scores: &HashMap<DocId, u32>) -> Vec<DocScore> {
    let mut ranked: Vec<DocScore> = scores
        .iter()
        .filter(|(_, score)| **score > 0)
        .map(|(&doc_id, &score)| DocScore { doc_id, score })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
    ranked
}

/// Read-eval-print loop. A blank line re-prompts with no action; the
/// literal token `exit` or end of input terminates; each query is
/// evaluated independently.
pub fn process_queries<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    index: &InvertedIndex,
    pages: &PageDir,
) -> Result<()> {
    let mut lines = input.lines();
    loop {
        write!(out, "Query? ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        let cleaned = words::normalize(line.trim());
        if cleaned.is_empty() {
            continue;
        }
        if cleaned == "exit" {
            break;
        }

        let tokens = match tokenize(&cleaned).and_then(|tokens| {
            validate(&tokens)?;
            Ok(tokens)
        }) {
            Ok(tokens) => tokens,
            Err(err) => {
                eprintln!("Error: {err}");
                continue;
            }
        };

        writeln!(out, "Query: {cleaned}")?;
        let ranked = rank(&evaluate(&tokens, index));
        display(&mut out, &ranked, pages)?;
    }
    Ok(())
}

/// Print one `score doc url` line per hit, in rank order. The page store
/// is consulted only for the URL line of each record.
fn display<W: Write>(out: &mut W, ranked: &[DocScore], pages: &PageDir) -> Result<()> {
    if ranked.is_empty() {
        writeln!(out, "No documents match.")?;
    } else {
        writeln!(out, "Matches {} documents (ranked):", ranked.len())?;
        for hit in ranked {
            match pages.url_of(hit.doc_id) {
                Ok(url) => writeln!(out, "score\t{} doc\t{}: {}", hit.score, hit.doc_id, url)?,
                Err(err) => tracing::warn!(doc_id = hit.doc_id, %err, "cannot read page URL"),
            }
        }
    }
    writeln!(out, "{}", "-".repeat(47))?;
    Ok(())
}
