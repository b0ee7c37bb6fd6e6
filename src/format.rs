//! Output format configuration for rendered pinyin syllables.

use thiserror::Error;

/// How the tone of a syllable is rendered.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToneType {
    /// Strip the tone entirely: `"lu:3"` renders as `"lu:"`.
    None,
    /// Keep the trailing tone digit as stored: `"lu:3"` renders as `"lu:3"`.
    #[default]
    Number,
    /// Place a diacritic on the tone-bearing vowel: `"lu:3"` renders as
    /// `"lǚ"`. Incompatible with [`VCharType::UAndColon`].
    Mark,
}

/// How the `ü` vowel, stored as the two-character placeholder `u:`, is
/// spelled when no diacritic forces the single-character form.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VCharType {
    /// Keep the `u:` placeholder: `"lu:3"` renders as `"lu:3"`.
    #[default]
    UAndColon,
    /// The ASCII substitute `v`: `"lu:3"` renders as `"lv3"`.
    V,
    /// The precomposed `ü` character: `"lu:3"` renders as `"lü3"`.
    UUnicode,
}

/// Letter case of the rendered syllable.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseType {
    #[default]
    Lower,
    Upper,
}

/// A structurally invalid output format.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("tone marks cannot be combined with the `u:` spelling; use `ü` or `v` instead")]
    ToneMarkWithUAndColon,
}

/// Controls the orthography of rendered syllables: tone notation, `ü`
/// spelling, and letter case. The three axes are independent except for
/// the one combination rejected by [`validate`](OutputFormat::validate).
///
/// The default ([`ToneType::Number`], [`VCharType::UAndColon`],
/// [`CaseType::Lower`]) is a lossless passthrough of the stored form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFormat {
    pub tone_type: ToneType,
    pub v_char_type: VCharType,
    pub case_type: CaseType,
}

impl OutputFormat {
    /// Rejects the one inexpressible combination: a diacritic cannot be
    /// composed onto the two-character `u:` placeholder.
    pub fn validate(&self) -> Result<(), FormatError> {
        match (self.tone_type, self.v_char_type) {
            (ToneType::Mark, VCharType::UAndColon) => Err(FormatError::ToneMarkWithUAndColon),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_valid() {
        assert_eq!(OutputFormat::default().validate(), Ok(()));
    }

    #[test]
    fn mark_requires_a_single_character_vowel() {
        let invalid = OutputFormat {
            tone_type: ToneType::Mark,
            ..OutputFormat::default()
        };
        assert_eq!(invalid.validate(), Err(FormatError::ToneMarkWithUAndColon));

        for v_char_type in [VCharType::V, VCharType::UUnicode] {
            let valid = OutputFormat {
                tone_type: ToneType::Mark,
                v_char_type,
                ..OutputFormat::default()
            };
            assert_eq!(valid.validate(), Ok(()));
        }
    }
}
