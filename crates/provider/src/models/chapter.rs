use time::Date;

use super::Source;

/// One entry of a title's chapter list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    /// Chapter name and location
    pub source: Source,
    /// Volume number, when the site groups chapters into volumes
    pub volume: Option<u32>,
    /// Chapter number; fractional for extras such as `10.5`
    pub chapter: Option<f64>,
    /// Part number within a split chapter
    pub sub_chapter: Option<u32>,
    /// Language of the release, as given by the site
    pub language: Option<String>,
    /// Release date of the chapter
    pub date: Option<Date>,
}
impl Chapter {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            volume: None,
            chapter: None,
            sub_chapter: None,
            language: None,
            date: None,
        }
    }

    pub fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Pull the trailing chapter number out of a listing label such as
    /// `"One Piece 1043"` or `"Vol.3 Ch.10.5: Omake"`.
    pub fn number_from_label(label: &str) -> Option<f64> {
        let head = label.split(':').next()?.trim_end();
        let start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
            .last()
            .map(|(index, _)| index)?;
        head[start..].trim_start_matches('.').parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::Month;

    #[test]
    fn test_with_date() {
        let date = Date::from_calendar_date(2024, Month::March, 1).unwrap();
        let chapter = Chapter::new(Source::new("Chapter 1", "http://site/1")).with_date(date);
        assert_eq!(chapter.date, Some(date));
        assert_eq!(Chapter::new(Source::new("Chapter 2", "http://site/2")).date, None);
    }

    #[rstest]
    #[case("One Piece 1043", Some(1043.0))]
    #[case("Vol.3 Ch.10.5: Omake", Some(10.5))]
    #[case("Berserk 1: The Black Swordsman", Some(1.0))]
    #[case("Oneshot", None)]
    #[case("", None)]
    fn test_number_from_label(#[case] label: &str, #[case] expected: Option<f64>) {
        assert_eq!(Chapter::number_from_label(label), expected);
    }
}
