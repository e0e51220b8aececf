// glyphs.rs - Glyph alphabet
//
// The rain draws from a fixed set of 48 katakana. Streams store indices into
// this table; the text renderer looks the string up, the GPU renderer writes
// the index into the cell texture and the shader picks the matching atlas slot.

pub const ALPHABET_SIZE: usize = 48;

pub const ALPHABET: [&str; ALPHABET_SIZE] = [
    "ア", "イ", "ウ", "エ", "オ",
    "カ", "キ", "ク", "ケ", "コ",
    "サ", "シ", "ス", "セ", "ソ",
    "タ", "チ", "ツ", "テ", "ト",
    "ナ", "ニ", "ヌ", "ネ", "ノ",
    "ハ", "ヒ", "フ", "ヘ", "ホ",
    "マ", "ミ", "ム", "メ", "モ",
    "ヤ", "ユ", "ヨ",
    "ラ", "リ", "ル", "レ", "ロ",
    "ワ", "ヰ", "ヱ", "ヲ", "ン",
];

/// Glyph string for an index, wrapping out-of-range indices into the alphabet
#[inline]
pub fn glyph(index: u8) -> &'static str {
    ALPHABET[index as usize % ALPHABET_SIZE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_distinct() {
        let mut seen = ALPHABET.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ALPHABET_SIZE);
    }

    #[test]
    fn glyph_lookup_wraps() {
        assert_eq!(glyph(0), "ア");
        assert_eq!(glyph(47), "ン");
        assert_eq!(glyph(48), "ア");
    }

    #[test]
    fn alpha_channel_can_carry_every_index() {
        assert!(ALPHABET_SIZE <= u8::MAX as usize + 1);
    }
}
