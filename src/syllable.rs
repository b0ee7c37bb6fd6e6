//! The rendering engine: turns one raw tone-numbered syllable into its
//! display form according to an [`OutputFormat`].

use unicode_normalization::UnicodeNormalization;

use crate::format::{CaseType, FormatError, OutputFormat, ToneType, VCharType};

/// Precomposed vowels carrying the diacritics for tones 1-4
/// (macron, acute, caron, grave).
static TONE_MARKED_VOWELS: phf::Map<char, [char; 4]> = phf::phf_map! {
    'a' => ['ā', 'á', 'ǎ', 'à'],
    'e' => ['ē', 'é', 'ě', 'è'],
    'i' => ['ī', 'í', 'ǐ', 'ì'],
    'o' => ['ō', 'ó', 'ǒ', 'ò'],
    'u' => ['ū', 'ú', 'ǔ', 'ù'],
    'ü' => ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
};

const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

/// Renders one raw tone-numbered syllable (e.g. `"lu:3"`).
///
/// Fails with [`FormatError::ToneMarkWithUAndColon`] before touching the
/// syllable when the format itself is invalid.
pub fn format_syllable(raw: &str, format: &OutputFormat) -> Result<String, FormatError> {
    format.validate()?;
    Ok(render(raw, format))
}

/// Rendering proper; assumes `format` has already been validated.
pub(crate) fn render(raw: &str, format: &OutputFormat) -> String {
    let raw: String = raw.nfc().collect();
    let (body, tone) = split_tone(&raw);

    let mut out = match format.tone_type {
        ToneType::Mark => {
            // Mark mode forbids the two-character placeholder; `v` is the
            // other asciification of the same vowel.
            let body = body.replace("u:", "ü").replace('v', "ü");
            match tone {
                Some(tone @ 1..=4) => place_tone_mark(&body, tone),
                _ => body,
            }
        }
        tone_type => {
            let body = match format.v_char_type {
                VCharType::UAndColon => body.to_string(),
                VCharType::V => body.replace("u:", "v"),
                VCharType::UUnicode => body.replace("u:", "ü"),
            };
            match tone {
                Some(tone) if tone_type == ToneType::Number => format!("{body}{tone}"),
                _ => body,
            }
        }
    };

    if format.case_type == CaseType::Upper {
        out = out.to_uppercase();
    }
    out
}

/// Splits a trailing tone digit off a raw syllable. The dataset stores
/// neutral tones with an explicit `5`; it is reported like any other digit
/// and the caller decides what neutral means for its notation.
fn split_tone(raw: &str) -> (&str, Option<u8>) {
    match raw.as_bytes().last() {
        Some(digit @ b'1'..=b'5') => (&raw[..raw.len() - 1], Some(digit - b'0')),
        _ => (raw, None),
    }
}

/// Replaces the tone-bearing vowel of `body` with its precomposed marked
/// form.
///
/// Priority: `a` anywhere, else `e`, else the `o` of an `ou` pair, else
/// the last vowel letter. A syllable without vowels is returned unchanged.
fn place_tone_mark(body: &str, tone: u8) -> String {
    let Some(index) = tone_mark_index(body) else {
        return body.to_string();
    };
    let tone_index = usize::from(tone - 1);

    let mut out = String::with_capacity(body.len() + 1);
    for (i, c) in body.char_indices() {
        match TONE_MARKED_VOWELS.get(&c) {
            Some(marked) if i == index => out.push(marked[tone_index]),
            _ => out.push(c),
        }
    }
    out
}

fn tone_mark_index(body: &str) -> Option<usize> {
    if let Some(index) = body.find('a') {
        return Some(index);
    }
    if let Some(index) = body.find('e') {
        return Some(index);
    }
    if let Some(index) = body.find("ou") {
        return Some(index);
    }
    body.char_indices()
        .filter(|(_, c)| VOWELS.contains(c))
        .map(|(index, _)| index)
        .next_back()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(raw: &str) -> String {
        let format = OutputFormat {
            tone_type: ToneType::Mark,
            v_char_type: VCharType::UUnicode,
            case_type: CaseType::Lower,
        };
        format_syllable(raw, &format).unwrap()
    }

    #[test]
    fn splits_trailing_tone_digit() {
        assert_eq!(split_tone("lu:3"), ("lu:", Some(3)));
        assert_eq!(split_tone("ma5"), ("ma", Some(5)));
        assert_eq!(split_tone("lu:"), ("lu:", None));
        assert_eq!(split_tone(""), ("", None));
    }

    #[test]
    fn vowel_priority() {
        // `a` wins over everything else.
        assert_eq!(mark("bao3"), "bǎo");
        assert_eq!(mark("huai2"), "huái");
        // `e` next.
        assert_eq!(mark("xie2"), "xié");
        assert_eq!(mark("jue2"), "jué");
        // The `o` of an `ou` pair.
        assert_eq!(mark("kou1"), "kōu");
        // Otherwise the last vowel.
        assert_eq!(mark("li3"), "lǐ");
        assert_eq!(mark("qiu2"), "qiú");
        assert_eq!(mark("luo4"), "luò");
        assert_eq!(mark("jiong3"), "jiǒng");
        assert_eq!(mark("lu:3"), "lǚ");
    }

    #[test]
    fn v_is_normalized_in_mark_mode() {
        assert_eq!(mark("lv3"), "lǚ");
        assert_eq!(mark("nv5"), "nü");
    }

    #[test]
    fn neutral_tone_gets_no_mark() {
        assert_eq!(mark("ma5"), "ma");
        assert_eq!(mark("ma"), "ma");
        assert_eq!(mark("lu:5"), "lü");
    }

    #[test]
    fn decomposed_input_is_normalized() {
        // `ü` written as `u` + combining diaeresis.
        assert_eq!(mark("lu\u{0308}3"), "lǚ");
    }

    #[test]
    fn vowelless_syllable_is_left_alone() {
        assert_eq!(mark("hm2"), "hm");
    }
}
