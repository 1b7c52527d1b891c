use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Where a comic comes from, which also tells you which way it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComicKind {
    /// Japanese, right to left
    Manga,
    /// Korean, left to right
    Manhwa,
    /// Chinese, left to right
    Manhua,
}
impl ComicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComicKind::Manga => "Manga",
            ComicKind::Manhwa => "Manhwa",
            ComicKind::Manhua => "Manhua",
        }
    }

    pub fn is_right_to_left(&self) -> bool {
        matches!(self, ComicKind::Manga)
    }
}
impl TryFrom<String> for ComicKind {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl FromStr for ComicKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        Ok(match sanitized.as_str() {
            "manga" | "japanese" => Self::Manga,
            "manhwa" | "korean" => Self::Manhwa,
            "manhua" | "chinese" => Self::Manhua,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "kind",
                value: format!("unknown comic kind: {}", s)
            }),
        })
    }
}

impl Display for ComicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
