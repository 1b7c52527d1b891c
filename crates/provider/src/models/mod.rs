mod chapter;
mod details;
mod genre;
mod kind;
mod search;
mod source;
mod status;

pub use self::chapter::Chapter;
pub use self::details::{About, Cover, CoverSide, Details, Meta, Publisher};
pub use self::genre::Genre;
pub use self::kind::ComicKind;
pub use self::search::{SearchOptions, SearchResults};
pub use self::source::Source;
pub use self::status::Status;

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace(['/', '-', '_', ' ', '.'], "")
}
