//! Hanyu Pinyin conversion for single Chinese characters.
//!
//! The [`Pinyin`] struct owns an immutable character → syllable table,
//! loaded once from a bundled dataset, and renders each raw tone-numbered
//! syllable (e.g. `"lu:3"`) according to an [`OutputFormat`]: tone
//! notation, `ü` spelling, and letter case. Both Simplified and
//! Traditional characters resolve; characters with several pronunciations
//! return them all, in dataset order.
//!
//! ```
//! use hanyu::{OutputFormat, Pinyin, ToneType, VCharType};
//!
//! let pinyin = Pinyin::new();
//!
//! // Default format: tone numbers, `u:` spelling, lowercase.
//! assert_eq!(pinyin.to_pinyin('李'), Some(vec!["li3".to_string()]));
//!
//! let format = OutputFormat {
//!     tone_type: ToneType::Mark,
//!     v_char_type: VCharType::UUnicode,
//!     ..OutputFormat::default()
//! };
//! let rendered = pinyin.to_pinyin_with_format('吕', &format).unwrap();
//! assert_eq!(rendered, Some(vec!["lǚ".to_string()]));
//! ```

use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub use crate::format::{CaseType, FormatError, OutputFormat, ToneType, VCharType};
pub use crate::lookup::SyllableLookup;
pub use crate::syllable::format_syllable;

mod format;
mod lookup;
mod syllable;

/// Output layout for [`Pinyin::convert_file`] and the CLI.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnnotationFormat {
    /// One `grapheme<TAB>syllables` row per annotated grapheme.
    #[default]
    Plain,
    /// One JSON array of annotations per input line.
    Json,
}

/// Pinyin readings of one grapheme of an input string.
///
/// `pinyin` is `None` when the grapheme has no known reading — not
/// Chinese, or not in the dataset. That absence is a normal outcome, not
/// an error.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CharAnnotation {
    pub grapheme: String,
    pub pinyin: Option<Vec<String>>,
}

/// The annotations of one input line, laid out for output.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConversionResult {
    Plain(String),
    Annotations(Vec<CharAnnotation>),
}

impl ConversionResult {
    pub fn to_output_string(&self) -> Result<String, ConversionError> {
        match self {
            ConversionResult::Plain(s) => Ok(s.clone()),
            ConversionResult::Annotations(annotations) => {
                Ok(serde_json::to_string(annotations)?)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Failed to serialize annotations to JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The conversion entry point: an immutable syllable table plus the
/// rendering engine.
///
/// Construction is the only initialization; afterwards every method takes
/// `&self` and the struct is safe to share across threads.
#[derive(Debug, Clone)]
pub struct Pinyin {
    lookup: SyllableLookup,
}

impl Pinyin {
    /// Builds a converter over the bundled dataset.
    pub fn new() -> Self {
        Self {
            lookup: SyllableLookup::bundled(),
        }
    }

    /// Builds a converter over a caller-supplied table.
    pub fn with_lookup(lookup: SyllableLookup) -> Self {
        Self { lookup }
    }

    /// The underlying table.
    pub fn lookup(&self) -> &SyllableLookup {
        &self.lookup
    }

    /// All pinyin readings of `ch` in the default format — a lossless
    /// passthrough of the stored syllables, e.g. `'偻'` →
    /// `["lou2", "lu:3"]`. `None` for characters without a known reading.
    pub fn to_pinyin(&self, ch: char) -> Option<Vec<String>> {
        let format = OutputFormat::default();
        self.lookup
            .raw_syllables(ch)
            .map(|syllables| syllables.map(|raw| syllable::render(raw, &format)).collect())
    }

    /// All pinyin readings of `ch` rendered with `format`, preserving
    /// dataset order.
    ///
    /// An invalid format fails the whole call before any syllable is
    /// rendered; an unknown character is `Ok(None)`, not an error.
    pub fn to_pinyin_with_format(
        &self,
        ch: char,
        format: &OutputFormat,
    ) -> Result<Option<Vec<String>>, FormatError> {
        format.validate()?;
        Ok(self
            .lookup
            .raw_syllables(ch)
            .map(|syllables| syllables.map(|raw| syllable::render(raw, format)).collect()))
    }

    /// Annotates every grapheme of `s` independently.
    ///
    /// No word segmentation or context is applied — each character is
    /// resolved on its own, and multi-pronunciation characters report all
    /// readings.
    pub fn annotate(
        &self,
        s: &str,
        format: &OutputFormat,
    ) -> Result<Vec<CharAnnotation>, FormatError> {
        format.validate()?;
        Ok(s.graphemes(true)
            .map(|grapheme| {
                let mut chars = grapheme.chars();
                let pinyin = match (chars.next(), chars.next()) {
                    (Some(ch), None) => self.lookup.raw_syllables(ch).map(|syllables| {
                        syllables.map(|raw| syllable::render(raw, format)).collect()
                    }),
                    _ => None,
                };
                CharAnnotation {
                    grapheme: grapheme.to_string(),
                    pinyin,
                }
            })
            .collect())
    }

    /// Annotates one line and lays it out per `annotation_format`.
    pub fn convert_line(
        &self,
        line: &str,
        format: &OutputFormat,
        annotation_format: AnnotationFormat,
    ) -> Result<ConversionResult, FormatError> {
        let annotations = self.annotate(line, format)?;
        Ok(match annotation_format {
            AnnotationFormat::Plain => ConversionResult::Plain(plain_rows(&annotations)),
            AnnotationFormat::Json => ConversionResult::Annotations(annotations),
        })
    }

    /// Annotates a stream line by line and writes the output to another
    /// stream, without loading either into memory.
    ///
    /// Non-UTF-8 input is replaced and reported on stderr (up to a cap);
    /// progress indicators go to stderr unless `silent`.
    ///
    /// # Errors
    ///
    /// Returns an error when the format is invalid, when reading or
    /// writing fails, or when JSON serialization of an output line fails.
    pub fn convert_file<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
        format: &OutputFormat,
        annotation_format: AnnotationFormat,
        max_lines: Option<usize>,
        silent: bool,
    ) -> Result<(), ConversionError> {
        format.validate()?;

        let mut line_number = 0usize;
        let mut non_utf8_lines = 0usize;
        let max_n_error_messages = 10;

        let mut buffer = vec![];
        while reader.read_until(b'\n', &mut buffer)? > 0 {
            line_number += 1;

            let line_str = String::from_utf8_lossy(&buffer);
            if matches!(line_str, Cow::Owned(_)) {
                non_utf8_lines += 1;
                if non_utf8_lines <= max_n_error_messages {
                    eprintln!(
                        "Detected encoding error on line {line_number}: non-UTF-8 characters were replaced."
                    );
                } else if non_utf8_lines == max_n_error_messages + 1 {
                    eprintln!("Too many encoding errors. No further errors reported.");
                }
            }

            let line = line_str.strip_suffix('\n').unwrap_or(&line_str);
            let line = line.strip_suffix('\r').unwrap_or(line);

            let result = self.convert_line(line, format, annotation_format)?;
            writeln!(writer, "{}", result.to_output_string()?)?;

            if !silent {
                if line_number % 1000 == 0 {
                    eprint!("{line_number}");
                } else if line_number % 100 == 0 {
                    eprint!(".");
                }
                if line_number % 100 == 0 {
                    io::stderr().flush()?;
                }
            }

            if let Some(max) = max_lines
                && line_number >= max
            {
                break;
            }
            buffer.clear();
        }

        if !silent && line_number > 0 {
            eprintln!();
        }
        if non_utf8_lines > 0 {
            eprintln!("Total number of lines with non-UTF-8 characters: {non_utf8_lines}");
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for Pinyin {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_rows(annotations: &[CharAnnotation]) -> String {
    let mut rows = Vec::with_capacity(annotations.len());
    for annotation in annotations {
        if annotation.grapheme.trim().is_empty() {
            continue;
        }
        let readings = match &annotation.pinyin {
            Some(readings) => readings.join(","),
            None => "-".to_string(),
        };
        rows.push(format!("{}\t{}", annotation.grapheme, readings));
    }
    rows.join("\n")
}
