use super::{ComicKind, Genre, Source, Status};

/// Everything a provider knows about a single title.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Details {
    /// Title name and location
    pub source: Source,
    pub about: About,
    pub meta: Meta,
}
impl Details {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            about: About::default(),
            meta: Meta::default(),
        }
    }
}

/// Descriptive information, as a reader would see it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct About {
    pub kind: Option<ComicKind>,
    pub release_year: Option<u16>,
    pub description: Option<String>,
    /// Site rating, normalized to `[0, 1]`
    pub rating: Option<f64>,
    pub genres: Vec<Genre>,
    /// Site-specific categories that don't map to a [`Genre`]
    pub categories: Vec<Source>,
    /// Alternative titles (translations, romanizations)
    pub associated_names: Vec<Source>,
    pub covers: Vec<Cover>,
    pub authors: Vec<String>,
    pub artists: Vec<String>,
}

/// Catalog bookkeeping about a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meta {
    pub status: Option<Status>,
    pub is_novel: bool,
    /// Whether scanlation has caught up with the original release
    pub completely_scanlated: Option<bool>,
    pub publisher: Option<Publisher>,
    /// Groups scanlating the title
    pub groups: Vec<Source>,
    pub related: Vec<Source>,
    pub recommendations: Vec<Source>,
    /// Titles the site recommends based on shared categories
    pub category_recommendations: Vec<Source>,
}

/// Who publishes a title, in its home market and in English.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Publisher {
    /// Original publisher
    pub publisher: Option<Source>,
    /// Magazine the title is serialized in
    pub magazine: Option<Source>,
    pub english_publisher: Option<Source>,
    /// Whether an English release is licensed
    pub licensed: bool,
}

/// Which part of a volume a cover image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoverSide {
    Front,
    Back,
    Side,
    Full,
    TableOfContents,
}

/// A cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cover {
    pub url: String,
    pub mime: String,
    pub side: CoverSide,
    pub volume: u32,
}
impl Cover {
    /// A first-volume front cover, which is all most listing pages offer.
    pub fn front(url: impl Into<String>) -> Self {
        let url = url.into();
        let mime = mime_from_url(&url).to_string();
        Self {
            url,
            mime,
            side: CoverSide::Front,
            volume: 1,
        }
    }
}

fn mime_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
