pub mod repository;
pub mod service;

use thiserror::Error;

/// Failure classes of the conversion tracker write path
///
/// `NotFound` and `AlreadyEmpty` are deliberately separate: the first means
/// the tracked row does not exist, the second that its box count is already
/// at the zero floor. Collapsing them would leave the caller unable to tell
/// a stale list from a double click.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("conversion item not found")]
    NotFound,

    #[error("conversion item has no boxes left to finish")]
    AlreadyEmpty,

    #[error("invalid pair count: {0}")]
    InvalidPairCount(i64),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for ConversionError {
    fn from(e: sea_orm::DbErr) -> Self {
        ConversionError::Storage(e.into())
    }
}
