//! Diacritic folding.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Latin letters that have no Unicode decomposition but still have an
/// obvious plain-ASCII spelling (ligatures, stroked letters, etc).
fn ligature(c: char) -> Option<&'static str> {
    Some(match c {
        'Æ' | 'Ǽ' | 'Ǣ' => "AE",
        'æ' | 'ǽ' | 'ǣ' => "ae",
        'Œ' => "OE",
        'œ' => "oe",
        'Ꜳ' => "AA",
        'ꜳ' => "aa",
        'Ꜵ' => "AO",
        'ꜵ' => "ao",
        'Ꜷ' => "AU",
        'ꜷ' => "au",
        'Ꜹ' | 'Ꜻ' => "AV",
        'ꜹ' | 'ꜻ' => "av",
        'Ꜽ' => "AY",
        'ꜽ' => "ay",
        'Ꝏ' => "OO",
        'ꝏ' => "oo",
        'ß' | 'ẞ' => "ss",
        'Þ' => "TH",
        'þ' => "th",
        'Ø' | 'Ǿ' => "O",
        'ø' | 'ǿ' => "o",
        'Ł' => "L",
        'ł' => "l",
        'Đ' | 'Ð' => "D",
        'đ' | 'ð' => "d",
        'Ħ' => "H",
        'ħ' => "h",
        'Ŧ' => "T",
        'ŧ' => "t",
        'ı' => "i",
        'ĸ' => "k",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Ƒ' => "F",
        'ƒ' => "f",
        _ => return None,
    })
}

/// Replace accented and ligature Latin characters with their base letters.
///
/// Each character is compatibility-decomposed (NFKD). If the decomposition
/// starts with an ASCII character, the combining marks are dropped and the
/// remainder is kept (`Ã` becomes `A`, `ﬁ` becomes `fi`). Characters without
/// a decomposition are checked against a small ligature table (`Æ` becomes
/// `AE`). Anything else, such as kana or hangul, is left untouched so that
/// non-Latin titles keep their meaning.
///
/// ```rust
/// use shelf_text::fold_diacritics;
///
/// assert_eq!(fold_diacritics("Pokémon"), "Pokemon");
/// assert_eq!(fold_diacritics("\u{1EA6}"), "A");
/// assert_eq!(fold_diacritics("\u{A736}"), "AU");
/// assert_eq!(fold_diacritics("ナルト"), "ナルト");
/// ```
pub fn fold_diacritics(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii() {
            folded.push(c);
            continue;
        }
        if let Some(replacement) = ligature(c) {
            folded.push_str(replacement);
            continue;
        }
        let mut decomposed = std::iter::once(c).nfkd().peekable();
        match decomposed.peek() {
            Some(base) if base.is_ascii() => folded.extend(decomposed.filter(|d| !is_combining_mark(*d))),
            _ => folded.push(c),
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "Hello World")]
    #[case("", "")]
    #[case("Café", "Cafe")]
    #[case("Ã", "A")]
    #[case("Æon Flux", "AEon Flux")]
    #[case("Straße", "Strasse")]
    #[case("Łódź", "Lodz")]
    #[case("ﬁre", "fire")]
    #[case("\u{1EA6}", "A")]
    #[case("\u{A736}", "AU")]
    fn test_fold(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(fold_diacritics(input), expected);
    }

    #[rstest]
    #[case("ナ")]
    #[case("ガンツ")]
    #[case("진격의 거인")]
    #[case("Ωμέγα")]
    fn test_fold_leaves_non_latin_alone(#[case] input: &str) {
        assert_eq!(fold_diacritics(input), input);
    }
}
