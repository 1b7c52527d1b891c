use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Genre tags shared by the supported catalogs.
///
/// Sites spell these differently (`"Sci-fi"`, `"SciFi"`, `"Sci fi"`), so
/// parsing ignores case, whitespace and separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Genre {
    Action,
    Adult,
    Adventure,
    AwardWinning,
    Comedy,
    Comic,
    Cooking,
    Demons,
    Doujinshi,
    Drama,
    Ecchi,
    Fantasy,
    FourKoma,
    GenderBender,
    Harem,
    Hentai,
    Historical,
    Horror,
    Josei,
    Lolicon,
    Magic,
    MartialArts,
    Mature,
    Mecha,
    Medical,
    Military,
    Music,
    Mystery,
    Oneshot,
    Psychological,
    Romance,
    SchoolLife,
    SciFi,
    Seinen,
    Shotacon,
    Shoujo,
    ShoujoAi,
    Shounen,
    ShounenAi,
    SliceOfLife,
    Smut,
    Sports,
    SuperPower,
    Supernatural,
    Tragedy,
    Vampire,
    Webtoon,
    Wuxia,
    Xianxia,
    Xuanhuan,
    Yaoi,
    Yuri,
}
impl Genre {
    /// Every genre.
    pub const ALL: [Genre; 52] = [
        Genre::Action,
        Genre::Adult,
        Genre::Adventure,
        Genre::AwardWinning,
        Genre::Comedy,
        Genre::Comic,
        Genre::Cooking,
        Genre::Demons,
        Genre::Doujinshi,
        Genre::Drama,
        Genre::Ecchi,
        Genre::Fantasy,
        Genre::FourKoma,
        Genre::GenderBender,
        Genre::Harem,
        Genre::Hentai,
        Genre::Historical,
        Genre::Horror,
        Genre::Josei,
        Genre::Lolicon,
        Genre::Magic,
        Genre::MartialArts,
        Genre::Mature,
        Genre::Mecha,
        Genre::Medical,
        Genre::Military,
        Genre::Music,
        Genre::Mystery,
        Genre::Oneshot,
        Genre::Psychological,
        Genre::Romance,
        Genre::SchoolLife,
        Genre::SciFi,
        Genre::Seinen,
        Genre::Shotacon,
        Genre::Shoujo,
        Genre::ShoujoAi,
        Genre::Shounen,
        Genre::ShounenAi,
        Genre::SliceOfLife,
        Genre::Smut,
        Genre::Sports,
        Genre::SuperPower,
        Genre::Supernatural,
        Genre::Tragedy,
        Genre::Vampire,
        Genre::Webtoon,
        Genre::Wuxia,
        Genre::Xianxia,
        Genre::Xuanhuan,
        Genre::Yaoi,
        Genre::Yuri,
    ];

    /// Returns the display name of the genre.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adult => "Adult",
            Genre::Adventure => "Adventure",
            Genre::AwardWinning => "Award Winning",
            Genre::Comedy => "Comedy",
            Genre::Comic => "Comic",
            Genre::Cooking => "Cooking",
            Genre::Demons => "Demons",
            Genre::Doujinshi => "Doujinshi",
            Genre::Drama => "Drama",
            Genre::Ecchi => "Ecchi",
            Genre::Fantasy => "Fantasy",
            Genre::FourKoma => "4-Koma",
            Genre::GenderBender => "Gender Bender",
            Genre::Harem => "Harem",
            Genre::Hentai => "Hentai",
            Genre::Historical => "Historical",
            Genre::Horror => "Horror",
            Genre::Josei => "Josei",
            Genre::Lolicon => "Lolicon",
            Genre::Magic => "Magic",
            Genre::MartialArts => "Martial Arts",
            Genre::Mature => "Mature",
            Genre::Mecha => "Mecha",
            Genre::Medical => "Medical",
            Genre::Military => "Military",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Oneshot => "Oneshot",
            Genre::Psychological => "Psychological",
            Genre::Romance => "Romance",
            Genre::SchoolLife => "School Life",
            Genre::SciFi => "Sci-fi",
            Genre::Seinen => "Seinen",
            Genre::Shotacon => "Shotacon",
            Genre::Shoujo => "Shoujo",
            Genre::ShoujoAi => "Shoujo Ai",
            Genre::Shounen => "Shounen",
            Genre::ShounenAi => "Shounen Ai",
            Genre::SliceOfLife => "Slice of Life",
            Genre::Smut => "Smut",
            Genre::Sports => "Sports",
            Genre::SuperPower => "Super Power",
            Genre::Supernatural => "Supernatural",
            Genre::Tragedy => "Tragedy",
            Genre::Vampire => "Vampire",
            Genre::Webtoon => "Webtoon",
            Genre::Wuxia => "Wuxia",
            Genre::Xianxia => "Xianxia",
            Genre::Xuanhuan => "Xuanhuan",
            Genre::Yaoi => "Yaoi",
            Genre::Yuri => "Yuri",
        }
    }
}
impl TryFrom<String> for Genre {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl FromStr for Genre {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        let alias = match sanitized.as_str() {
            "yonkoma" | "4koma" => Some(Self::FourKoma),
            "sciencefiction" => Some(Self::SciFi),
            "oneshots" => Some(Self::Oneshot),
            "superpowers" => Some(Self::SuperPower),
            _ => None,
        };
        match alias.or_else(|| Self::ALL.into_iter().find(|genre| sanitize(genre.as_str()) == sanitized)) {
            Some(genre) => Ok(genre),
            None => exn::bail!(ErrorKind::ParseError {
                field: "genre",
                value: format!("unknown genre: {}", s)
            }),
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
