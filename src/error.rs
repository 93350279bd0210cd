use thiserror::Error;

/// Construction-time / configuration errors.
///
/// `tryClaim` and `findPlacement` are not fallible in this sense — a claim
/// that cannot be placed is not an error, it is `SearchResult::NotFound` /
/// `Placement::NotFound` (see [`crate::organizer::SearchResult`] and
/// [`crate::atlas_manager::Placement`]).
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("invalid atlas configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid style ranges: {0}")]
    InvalidStyleRanges(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
