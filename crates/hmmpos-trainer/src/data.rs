//! Data loading for POS-tagged training corpora.
//!
//! Three line-oriented formats are supported:
//!
//! * **Tabular**: `word<TAB>TAG` per line, a blank line ends a sentence and
//!   lines starting with `#` without a tab are comments. Ten-column CoNLL
//!   rows contribute their FORM and XPOS columns.
//! * **Slash**: one sentence per line as `word/TAG` tokens; the tag follows
//!   the last unescaped `/`, and `\/` is a literal slash.
//! * **JSON lines**: `{"tokens": [...], "tags": [...]}` per line.
//!
//! Files ending in `.gz` are decompressed transparently.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use flate2::read::MultiGzDecoder;
use hmmpos_core::TaggedSentence;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// On-disk layout of a tagged corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// `word<TAB>TAG` lines, blank-line separated sentences.
    Tabular,
    /// `word/TAG word/TAG ...` lines.
    Slash,
    /// One JSON object per line.
    #[value(name = "jsonl")]
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl CorpusFormat {
    /// Guess the format from the file extension, ignoring a trailing `.gz`.
    pub fn detect(path: &Path) -> Option<Self> {
        let path = if is_gzip(path) {
            Path::new(path.file_stem()?)
        } else {
            path
        };
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tsv" | "conll" | "txt" => Some(Self::Tabular),
            "pos" => Some(Self::Slash),
            "jsonl" | "json" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Column count of a CoNLL-U / CoNLL-X row.
const CONLL_COLUMNS: usize = 10;

#[derive(Deserialize)]
struct JsonRecord {
    tokens: Vec<String>,
    tags: Vec<String>,
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Load a corpus file. With `format = None` the format is detected from the
/// file name.
pub fn load_corpus<P: AsRef<Path>>(
    path: P,
    format: Option<CorpusFormat>,
) -> Result<Vec<TaggedSentence>> {
    let path = path.as_ref();
    let format = match format {
        Some(f) => f,
        None => CorpusFormat::detect(path).with_context(|| {
            format!(
                "cannot detect corpus format of {}; pass it explicitly",
                path.display()
            )
        })?,
    };

    let file =
        File::open(path).with_context(|| format!("failed to open corpus {}", path.display()))?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let sentences = read_corpus(BufReader::new(reader), format)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    info!(
        path = %path.display(),
        ?format,
        sentences = sentences.len(),
        "loaded corpus"
    );
    Ok(sentences)
}

/// Read a corpus from any buffered reader.
///
/// Malformed lines are logged and skipped; only I/O failures are errors.
pub fn read_corpus<R: BufRead>(reader: R, format: CorpusFormat) -> Result<Vec<TaggedSentence>> {
    match format {
        CorpusFormat::Tabular => read_tabular(reader),
        CorpusFormat::Slash => read_slash(reader),
        CorpusFormat::JsonLines => read_json_lines(reader),
    }
}

fn read_tabular<R: BufRead>(reader: R) -> Result<Vec<TaggedSentence>> {
    let mut sentences = Vec::new();
    let mut current = TaggedSentence::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }

        // "#\t#" is the Penn pound-sign token, not a comment
        if line.starts_with('#') && !line.contains('\t') {
            continue;
        }

        match tabular_token(line) {
            TabularLine::Token(word, tag) => current.push(word, tag),
            TabularLine::Skip => {}
            TabularLine::Malformed => {
                warn!(line = n + 1, content = line, "skipping malformed corpus line")
            }
        }
    }

    // Last sentence may lack a trailing blank line
    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

enum TabularLine<'a> {
    Token(&'a str, &'a str),
    /// CoNLL multiword ranges (`3-4`) and empty nodes (`5.1`).
    Skip,
    Malformed,
}

/// Parses `word<TAB>TAG`, or a 10-column CoNLL row taking FORM and XPOS
/// (UPOS when XPOS is `_`).
fn tabular_token(line: &str) -> TabularLine<'_> {
    let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
    let (word, tag) = match cols.as_slice() {
        [word, tag] => (*word, *tag),
        [id, form, _lemma, upos, xpos, ..] if cols.len() == CONLL_COLUMNS => {
            if id.contains(['-', '.']) {
                return TabularLine::Skip;
            }
            let tag = if *xpos == "_" { *upos } else { *xpos };
            (*form, tag)
        }
        _ => return TabularLine::Malformed,
    };
    if word.is_empty() || tag.is_empty() || tag == "_" {
        return TabularLine::Malformed;
    }
    TabularLine::Token(word, tag)
}

fn read_slash<R: BufRead>(reader: R) -> Result<Vec<TaggedSentence>> {
    let mut sentences = Vec::new();

    'lines: for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let mut sentence = TaggedSentence::default();
        for token in line.split_whitespace() {
            match split_slash_token(token) {
                Some((word, tag)) => sentence.push(word, tag),
                None => {
                    warn!(line = n + 1, token, "skipping line with malformed word/TAG token");
                    continue 'lines;
                }
            }
        }
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
    }

    Ok(sentences)
}

/// Splits `word/TAG` at the last unescaped slash.
fn split_slash_token(token: &str) -> Option<(String, String)> {
    let bytes = token.as_bytes();
    let split = token
        .char_indices()
        .rev()
        .find(|&(i, c)| c == '/' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| i)?;

    let word = token[..split].replace("\\/", "/");
    let tag = token[split + 1..].replace("\\/", "/");
    if word.is_empty() || tag.is_empty() {
        return None;
    }
    Some((word, tag))
}

fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<TaggedSentence>> {
    let mut sentences = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: JsonRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = n + 1, error = %e, "skipping malformed JSON record");
                continue;
            }
        };
        if record.tokens.len() != record.tags.len() {
            warn!(
                line = n + 1,
                tokens = record.tokens.len(),
                tags = record.tags.len(),
                "skipping record with mismatched tokens and tags"
            );
            continue;
        }
        if record.tokens.is_empty() {
            continue;
        }

        sentences.push(record.tokens.into_iter().zip(record.tags).collect());
    }

    Ok(sentences)
}
