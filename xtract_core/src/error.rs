use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("tag pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}
