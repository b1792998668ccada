use thiserror::Error;

use crate::profile::Partition;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// ページ単位の読み込みが 0x8000 バイトに満たなかった。
    #[error("input misaligned or truncated: page {page} of {count} yielded {len:#x} bytes")]
    TruncatedInput { page: usize, count: usize, len: usize },

    #[error("{partition:?} page out of range: volume {volume}, page {page:#x}")]
    PageOutOfRange {
        partition: Partition,
        volume: usize,
        page: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_truncated_input(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}
