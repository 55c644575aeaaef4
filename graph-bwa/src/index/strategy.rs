//! 按文本规模选择索引构建策略。

use std::fmt;

use crate::error::{BuildError, Result};
use crate::index::fm::{FmIndex, SA_INTERVAL};
use crate::index::pac::PackedBuffer;
use crate::index::{bwt, rope, sa};

/// 低于该碱基数时在内存中直接做后缀排序。
pub const ONLINE_THRESHOLD: u64 = 50_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    /// 后缀数组排序后导出 BWT
    InMemory,
    /// 逐符号插入动态序列，省内存但较慢
    Online,
}

impl BuildStrategy {
    #[inline]
    pub fn select(n: u64) -> Self {
        if n < ONLINE_THRESHOLD {
            BuildStrategy::InMemory
        } else {
            BuildStrategy::Online
        }
    }
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStrategy::InMemory => f.write_str("in-memory suffix sort"),
            BuildStrategy::Online => f.write_str("online dynamic BWT"),
        }
    }
}

/// 对双向 pac 的前 n 个碱基构建 FM 索引。
pub fn build_index(pac: &PackedBuffer, n: u64) -> Result<(FmIndex, BuildStrategy)> {
    if n > pac.len() {
        return Err(BuildError::Primitive(format!(
            "requested {} bases from a buffer holding {}",
            n,
            pac.len()
        )));
    }
    let strategy = BuildStrategy::select(n);
    log::info!("building BWT over {} bases using {}", n, strategy);
    let fm = match strategy {
        BuildStrategy::InMemory => {
            let len = n as usize + 1;
            let mut text: Vec<u8> = Vec::new();
            text.try_reserve_exact(len).map_err(BuildError::exhausted("BWT text", len))?;
            text.extend((0..n).map(|i| pac.get(i) + 1));
            text.push(0);
            let sa = sa::build_sa(&text)?;
            let (bwt, primary) = bwt::build_bwt(&text, &sa);
            FmIndex::from_sa(bwt, &sa, primary, SA_INTERVAL)
        }
        BuildStrategy::Online => {
            let (bwt, primary) = rope::build_bwt_online(pac, n)?;
            FmIndex::from_bwt(bwt, primary, SA_INTERVAL)?
        }
    };
    Ok((fm, strategy))
}
