//! Line-by-line corpus transformation.

use crate::sampling::sampling_buckets;
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Runs of characters that are not ASCII letters.
const NON_LETTERS: &str = "[^a-zA-Z]+";

/// One input line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceDocument {
    /// Document URL; becomes the output id. Absent or empty drops the line.
    #[serde(default)]
    pub url: Option<String>,
    /// Raw document text. Absent is treated as empty.
    #[serde(default)]
    pub body: Option<String>,
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusDocument {
    /// Document id (the source URL).
    pub id: String,
    /// Normalized text.
    pub text: String,
    /// Sampling buckets; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<&'static str>,
}

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line produced a document.
    Document(CorpusDocument),
    /// The line is blank or has no URL.
    Skipped,
    /// The line is not a JSON document; carries the parse error.
    Malformed(String),
}

/// Counts over one transformed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Lines read.
    pub lines: usize,
    /// Documents written.
    pub written: usize,
    /// Lines skipped silently.
    pub skipped: usize,
    /// Lines that failed to parse.
    pub malformed: usize,
}

/// Normalizes and tags corpus documents.
#[derive(Debug, Clone)]
pub struct CorpusTransformer {
    non_letters: Regex,
}

impl CorpusTransformer {
    /// Create a transformer.
    pub fn new() -> Result<Self> {
        Ok(Self {
            non_letters: Regex::new(NON_LETTERS)?,
        })
    }

    /// Lower-case `text` and collapse every run of non-letters into one space.
    pub fn normalize(&self, text: &str) -> String {
        self.non_letters
            .replace_all(&text.to_lowercase(), " ")
            .into_owned()
    }

    /// Transform a parsed source document.
    pub fn transform(&self, source: SourceDocument) -> Option<CorpusDocument> {
        let url = source.url.filter(|url| !url.is_empty())?;
        let text = self.normalize(source.body.as_deref().unwrap_or_default());
        Some(CorpusDocument {
            filter: sampling_buckets(&url),
            id: url,
            text,
        })
    }

    /// Transform one input line.
    pub fn transform_line(&self, line: &str) -> LineOutcome {
        if line.trim().is_empty() {
            return LineOutcome::Skipped;
        }
        match serde_json::from_str::<SourceDocument>(line) {
            Ok(source) => match self.transform(source) {
                Some(document) => LineOutcome::Document(document),
                None => LineOutcome::Skipped,
            },
            Err(e) => LineOutcome::Malformed(e.to_string()),
        }
    }

    /// Transform one raw input line; invalid UTF-8 is malformed.
    pub fn transform_bytes(&self, line: &[u8]) -> LineOutcome {
        match std::str::from_utf8(line) {
            Ok(line) => self.transform_line(line),
            Err(e) => LineOutcome::Malformed(e.to_string()),
        }
    }

    /// Transform every line of `input`, writing one JSON line per document.
    ///
    /// Malformed lines, including ones that are not UTF-8, are logged and
    /// skipped; only I/O failures abort.
    pub fn transform_stream<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<TransformStats> {
        let mut stats = TransformStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines += 1;
            let line = trim_line_ending(&buf);

            match self.transform_bytes(line) {
                LineOutcome::Document(document) => {
                    serde_json::to_writer(&mut output, &document)?;
                    output.write_all(b"\n")?;
                    stats.written += 1;
                }
                LineOutcome::Skipped => stats.skipped += 1,
                LineOutcome::Malformed(reason) => {
                    warn!(line = stats.lines, %reason, "skipping malformed corpus line");
                    stats.malformed += 1;
                }
            }
        }

        output.flush()?;
        debug!(
            lines = stats.lines,
            written = stats.written,
            skipped = stats.skipped,
            malformed = stats.malformed,
            "corpus transform finished"
        );
        Ok(stats)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
