//! Title normalization.

use crate::fold::fold_diacritics;

const ASCII_PUNCTUATION: &str = r##"'!"#$%&()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Symbols that carry meaning in a title ("Black & White") are spelled out
/// before the remaining punctuation is thrown away.
fn symbol(c: char) -> Option<&'static str> {
    Some(match c {
        '#' => "hash",
        '$' => "dollar",
        '%' => "percent",
        '&' => "and",
        '*' => "star",
        '@' => "at",
        _ => return None,
    })
}

fn is_punctuation(c: char) -> bool {
    ASCII_PUNCTUATION.contains(c)
        // General Punctuation
        || ('\u{2000}'..='\u{206F}').contains(&c)
        // Supplemental Punctuation
        || ('\u{2E00}'..='\u{2E7F}').contains(&c)
}

/// Canonicalize a title so that equivalent spellings compare equal.
///
/// The steps are applied in order:
///
/// 1. diacritics are folded to their base letters ([`fold_diacritics`]),
/// 2. the result is trimmed and lowercased,
/// 3. `# $ % & * @` are replaced by `hash dollar percent and star at`,
/// 4. ASCII punctuation and the Unicode punctuation blocks are removed, and
/// 5. all whitespace is removed.
///
/// The function is idempotent and never fails.
///
/// ```rust
/// use shelf_text::normalize;
///
/// assert_eq!(normalize("Hello World & the Moon"), "helloworldandthemoon");
/// assert_eq!(normalize("Café!"), normalize("cafe"));
/// ```
pub fn normalize(value: &str) -> String {
    let folded = fold_diacritics(value);
    let lowered = folded.trim().to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if let Some(word) = symbol(c) {
            normalized.push_str(word);
        } else if !is_punctuation(c) && !c.is_whitespace() {
            normalized.push(c);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World & the Moon", "helloworldandthemoon")]
    #[case("  One Piece  ", "onepiece")]
    #[case("Tokyo\tGhoul", "tokyoghoul")]
    #[case("#1 Fan", "hash1fan")]
    #[case("100% Perfect Girl", "100percentperfectgirl")]
    #[case("$100", "dollar100")]
    #[case("Star*Crossed", "starstarcrossed")]
    #[case("@Home", "athome")]
    #[case("D.Gray-man", "dgrayman")]
    #[case("Kaguya-sama: Love is War", "kaguyasamaloveiswar")]
    #[case("Re:Zero \u{2014} Starting Life", "rezerostartinglife")]
    #[case("Naruto\u{2026}", "naruto")]
    #[case("Ä Ö Ü", "aou")]
    #[case("", "")]
    #[case("   ", "")]
    #[case("!?.", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_normalize_accents_and_punctuation() {
        assert_eq!(normalize("Café!"), normalize("cafe"));
        assert_eq!(normalize("Pokémon Adventures"), normalize("pokemon adventures"));
    }

    #[rstest]
    #[case("Hello World & the Moon")]
    #[case("Café!")]
    #[case("ÆSIR #7 — The @Return")]
    #[case("İstanbul")]
    #[case("ナルト 疾風伝")]
    #[case("  \u{2E3A}  ")]
    #[case("")]
    fn test_normalize_idempotent(#[case] input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}
