//! The character → raw-syllable-list table, loaded once from a
//! Pinyin4net-format JSON dataset and read-only thereafter.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// A comma-joined list of raw syllables: lowercase letters with an
/// optional embedded `u:` placeholder and an optional trailing tone digit.
static RAW_SYLLABLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    let syllable = r"[a-z]+(?:u:[a-z]*)?[1-5]?";
    Regex::new(&format!("^{syllable}(?:,{syllable})*$")).unwrap()
});

#[derive(Debug, Deserialize)]
struct PinyinItems {
    items: Vec<PinyinItem>,
}

/// One dataset record: an uppercase-hex code point and its comma-joined
/// raw syllables. Simplified and Traditional characters may carry the
/// same list.
#[derive(Debug, Deserialize)]
struct PinyinItem {
    unicode: String,
    hanyu: String,
}

/// Immutable mapping from a character to its raw tone-numbered syllables,
/// in dataset order.
///
/// Built once; never mutated afterwards, so a `&SyllableLookup` is safe to
/// share across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct SyllableLookup {
    table: IndexMap<char, String>,
}

impl SyllableLookup {
    /// Builds the lookup from the dataset bundled into the binary.
    pub fn bundled() -> Self {
        Self::from_json(include_str!("../data/unicode_to_hanyu_pinyin.json"))
            .expect("invalid bundled dataset")
    }

    /// Builds the lookup from a Pinyin4net-format JSON dataset:
    /// `{"items": [{"unicode": "<HEX>", "hanyu": "<syllables>"}, ...]}`.
    ///
    /// Records with an empty syllable list, an unparseable code point, or
    /// a malformed syllable list are skipped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let items: PinyinItems = serde_json::from_str(json)?;
        let mut table = IndexMap::with_capacity(items.items.len());

        for item in items.items {
            let ch = match u32::from_str_radix(&item.unicode, 16)
                .ok()
                .and_then(char::from_u32)
            {
                Some(ch) => ch,
                None => continue,
            };
            if item.hanyu.is_empty() || !RAW_SYLLABLES_RE.is_match(&item.hanyu) {
                continue;
            }
            table.insert(ch, item.hanyu);
        }

        Ok(Self { table })
    }

    /// All raw syllables of `ch`, preserving dataset order — callers index
    /// multi-pronunciation results positionally. `None` when the character
    /// has no known pinyin.
    pub fn raw_syllables(&self, ch: char) -> Option<impl Iterator<Item = &str>> {
        self.table.get(&ch).map(|list| list.split(','))
    }

    pub fn contains(&self, ch: char) -> bool {
        self.table.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_malformed_records() {
        let lookup = SyllableLookup::from_json(
            r#"{"items": [
                {"unicode": "674E", "hanyu": "li3"},
                {"unicode": "5415", "hanyu": ""},
                {"unicode": "XYZ", "hanyu": "li3"},
                {"unicode": "110000", "hanyu": "li3"},
                {"unicode": "507B", "hanyu": "not pinyin!"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(lookup.len(), 1);
        assert!(lookup.contains('李'));
        assert!(!lookup.contains('吕'));
        assert!(!lookup.contains('偻'));
    }

    #[test]
    fn preserves_syllable_order() {
        let lookup =
            SyllableLookup::from_json(r#"{"items": [{"unicode": "507B", "hanyu": "lou2,lu:3"}]}"#)
                .unwrap();

        let syllables: Vec<&str> = lookup.raw_syllables('偻').unwrap().collect();
        assert_eq!(syllables, ["lou2", "lu:3"]);
    }

    #[test]
    fn bundled_dataset_loads() {
        let lookup = SyllableLookup::bundled();
        assert!(!lookup.is_empty());
        assert!(lookup.contains('中'));
    }
}
