//! 段注释（ann）与模糊碱基区段（amb）。

use crate::graph::EdgeId;

/// pac 中一段连续区间对应的边（蛋白质模式下还有读框）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub edge: EdgeId,
    /// 蛋白质模式下的读框 0..3，其它模式为 None
    pub frame: Option<u8>,
    /// 在正向 pac 中的起始碱基偏移
    pub offset: u64,
    pub len: u64,
}

impl Annotation {
    /// 段名：边标识，蛋白质模式下追加 `_<frame>`。
    pub fn name(&self) -> String {
        match self.frame {
            Some(f) => format!("{}_{}", self.edge, f),
            None => self.edge.to_string(),
        }
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// 连续的非 ACGT 符号（同一符号）区段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousRun {
    pub offset: u64,
    pub len: u64,
    /// 原始符号（如 `N`）
    pub symbol: u8,
}

/// 按偏移有序、首尾相接的注释表。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    anns: Vec<Annotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个段，偏移紧接上一段末尾。
    pub fn push(&mut self, edge: EdgeId, frame: Option<u8>, len: u64) {
        let offset = self.total_len();
        self.anns.push(Annotation { edge, frame, offset, len });
    }

    /// 正向 pac 的总长度（所有段长度之和）。
    pub fn total_len(&self) -> u64 {
        self.anns.last().map_or(0, Annotation::end)
    }

    pub fn len(&self) -> usize {
        self.anns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anns.is_empty()
    }

    pub fn get(&self, segment: usize) -> Option<&Annotation> {
        self.anns.get(segment)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.anns.iter()
    }

    /// 二分查找覆盖正向位置 `pos` 的段。
    pub fn locate(&self, pos: u64) -> Option<usize> {
        let mut lo = 0usize;
        let mut hi = self.anns.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            let a = &self.anns[mid];
            if pos < a.offset {
                hi = mid;
            } else if pos >= a.end() {
                lo = mid + 1;
            } else {
                return Some(mid);
            }
        }
        None
    }

    /// 双向坐标 -> (正向坐标, 是否反向链)。对应 BWA 的 `bns_depos`。
    #[inline]
    pub fn depos(&self, pos: u64) -> (u64, bool) {
        let l_pac = self.total_len();
        if pos >= l_pac {
            ((l_pac << 1) - 1 - pos, true)
        } else {
            (pos, false)
        }
    }

    /// 双向区间 [rb, re) 所在的段与链；跨段或跨链时返回 None。
    pub fn flat_region(&self, rb: u64, re: u64) -> Option<(usize, bool)> {
        let l_pac = self.total_len();
        if rb >= re || re > l_pac << 1 {
            return None;
        }
        if rb < l_pac && re > l_pac {
            return None;
        }
        let (a, is_rev) = self.depos(rb);
        let (b, _) = self.depos(re - 1);
        let (lo, hi) = if is_rev { (b, a) } else { (a, b) };
        let seg = self.locate(lo)?;
        if hi < self.anns[seg].end() {
            Some((seg, is_rev))
        } else {
            None
        }
    }

    /// 段在双向坐标中的 [start, end)。
    pub fn region_bounds(&self, segment: usize, is_rev: bool) -> (u64, u64) {
        let a = &self.anns[segment];
        if is_rev {
            let l2 = self.total_len() << 1;
            (l2 - a.end(), l2 - a.offset)
        } else {
            (a.offset, a.end())
        }
    }

    /// 检查连续性：首段偏移为 0，且每段末尾等于下一段起点。
    pub fn is_contiguous(&self) -> bool {
        self.anns.first().map_or(true, |a| a.offset == 0)
            && self.anns.windows(2).all(|w| w[0].end() == w[1].offset)
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.anns.iter()
    }
}
