use std::collections::TryReserveError;

use thiserror::Error;

/// 索引构建阶段的错误。比对与坐标还原阶段没有错误类型：几何上的拒绝是常态。
#[derive(Debug, Error)]
pub enum BuildError {
    /// 缓冲区扩容或索引构建时内存不足，不可恢复。
    #[error("out of memory while allocating {requested} bytes for {what}")]
    ResourceExhaustion {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },
    /// 图中没有可索引的边。
    #[error("graph has no indexable edges")]
    EmptyReference,
    /// 索引构建原语自身报告的失败。
    #[error("index construction failed: {0}")]
    Primitive(String),
}

impl BuildError {
    pub(crate) fn exhausted(what: &'static str, requested: usize) -> impl FnOnce(TryReserveError) -> Self {
        move |source| BuildError::ResourceExhaustion { what, requested, source }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
