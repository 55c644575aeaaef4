//! 图上的映射路径：比对命中还原为边局部坐标后的结果。

mod reconstruct;

pub use reconstruct::{cut_interval, mostly_in_vertex, reconstruct};

use std::fmt;

use crate::graph::EdgeId;

/// 半开区间 [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// 以 `len` 为全长翻转到反向链坐标。
    pub fn invert(&self, len: usize) -> Range {
        Range { start: len.saturating_sub(self.end), end: len.saturating_sub(self.start) }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// read 上的区间与边上的区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MappingRange {
    pub initial: Range,
    pub mapped: Range,
}

impl MappingRange {
    pub fn new(initial: Range, mapped: Range) -> Self {
        Self { initial, mapped }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMapping {
    pub edge: EdgeId,
    pub range: MappingRange,
    /// score / 比对的 read 长度，只用于排序
    pub quality: f64,
}

/// 一条 read 的映射路径，顺序与比对原语给出的命中顺序一致。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingPath {
    entries: Vec<EdgeMapping>,
}

impl MappingPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: EdgeId, range: MappingRange, quality: f64) {
        self.entries.push(EdgeMapping { edge, range, quality });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&EdgeMapping> {
        self.entries.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EdgeMapping> {
        self.entries.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.entries.iter().map(|m| m.edge)
    }
}

impl<'a> IntoIterator for &'a MappingPath {
    type Item = &'a EdgeMapping;
    type IntoIter = std::slice::Iter<'a, EdgeMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for MappingPath {
    type Item = EdgeMapping;
    type IntoIter = std::vec::IntoIter<EdgeMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_flips_around_length() {
        assert_eq!(Range::new(10, 29).invert(70), Range::new(41, 60));
        assert_eq!(Range::new(5, 5).invert(20), Range::new(15, 15));
        // 超出全长时截到 0
        assert_eq!(Range::new(10, 80).invert(70), Range::new(0, 60));
    }

    #[test]
    fn path_preserves_push_order() {
        let mut p = MappingPath::new();
        p.push(EdgeId(3), MappingRange::new(Range::new(0, 5), Range::new(1, 6)), 1.0);
        p.push(EdgeId(1), MappingRange::new(Range::new(5, 9), Range::new(0, 4)), 0.5);
        assert_eq!(p.len(), 2);
        assert_eq!(p.edges().collect::<Vec<_>>(), vec![EdgeId(3), EdgeId(1)]);
        assert_eq!(p.get(1).map(|m| m.range.initial.size()), Some(4));
    }
}
