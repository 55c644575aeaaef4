//! 只读的 de Bruijn 图接口。
//!
//! 索引只通过 [`Graph`] 读取边；共轭（反向互补）关系是边标识上的查找函数，
//! 不是嵌入的回指针。

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::util::dna;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Graph {
    /// 图的 k-mer 大小 K。
    fn k(&self) -> usize;

    /// 按稳定顺序列出所有边；`canonical_only` 时每对共轭边只给出一条。
    fn edges(&self, canonical_only: bool) -> Vec<EdgeId>;

    /// 边的核苷酸序列。
    fn nucleotides(&self, edge: EdgeId) -> Cow<'_, [u8]>;

    /// 边在映射坐标系下的长度。
    fn length(&self, edge: EdgeId) -> usize;

    /// 共轭边。自共轭边返回自身。
    fn conjugate(&self, edge: EdgeId) -> EdgeId;
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    id: EdgeId,
    seq: Vec<u8>,
    conjugate: EdgeId,
    canonical: bool,
}

/// 内存中的边集合，每条边自动配对其反向互补边。
///
/// 边长度按核苷酸计。标识从 1 开始，一对共轭边占用相邻的两个编号
/// （自共轭边只占一个）。
#[derive(Debug, Clone)]
pub struct EdgeGraph {
    k: usize,
    records: Vec<EdgeRecord>,
    by_id: HashMap<EdgeId, usize>,
    next_id: u64,
}

impl EdgeGraph {
    pub fn new(k: usize) -> Self {
        Self { k, records: Vec::new(), by_id: HashMap::new(), next_id: 1 }
    }

    /// 加入一条边及其共轭边，返回正向边的标识。
    pub fn add_edge(&mut self, seq: &[u8]) -> EdgeId {
        let seq: Vec<u8> = seq.iter().map(u8::to_ascii_uppercase).collect();
        let rc = dna::revcomp(&seq);
        let id = self.alloc_id();
        if rc == seq {
            self.insert(EdgeRecord { id, seq, conjugate: id, canonical: true });
            return id;
        }
        let conj = self.alloc_id();
        self.insert(EdgeRecord { id, seq, conjugate: conj, canonical: true });
        self.insert(EdgeRecord { id: conj, seq: rc, conjugate: id, canonical: false });
        id
    }

    pub fn edge_count(&self) -> usize {
        self.records.len()
    }

    fn alloc_id(&mut self) -> EdgeId {
        let id = EdgeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, rec: EdgeRecord) {
        self.by_id.insert(rec.id, self.records.len());
        self.records.push(rec);
    }

    fn record(&self, edge: EdgeId) -> &EdgeRecord {
        // 标识只能来自本图，未知标识属于调用方的逻辑错误
        &self.records[self.by_id[&edge]]
    }
}

impl Graph for EdgeGraph {
    fn k(&self) -> usize {
        self.k
    }

    fn edges(&self, canonical_only: bool) -> Vec<EdgeId> {
        self.records
            .iter()
            .filter(|r| !canonical_only || r.canonical)
            .map(|r| r.id)
            .collect()
    }

    fn nucleotides(&self, edge: EdgeId) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.record(edge).seq)
    }

    fn length(&self, edge: EdgeId) -> usize {
        self.record(edge).seq.len()
    }

    fn conjugate(&self, edge: EdgeId) -> EdgeId {
        self.record(edge).conjugate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjugates_are_paired() {
        let mut g = EdgeGraph::new(3);
        let e = g.add_edge(b"AACG");
        let c = g.conjugate(e);
        assert_ne!(e, c);
        assert_eq!(g.conjugate(c), e);
        assert_eq!(&*g.nucleotides(c), b"CGTT");
        assert_eq!(g.length(c), 4);
    }

    #[test]
    fn palindrome_is_self_conjugate() {
        let mut g = EdgeGraph::new(3);
        let e = g.add_edge(b"ACGT");
        assert_eq!(g.conjugate(e), e);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn canonical_enumeration_skips_conjugates() {
        let mut g = EdgeGraph::new(3);
        let a = g.add_edge(b"AAAC");
        let b = g.add_edge(b"ACGT");
        let c = g.add_edge(b"GGGA");
        assert_eq!(g.edges(true), vec![a, b, c]);
        assert_eq!(g.edges(false).len(), 5);
    }
}
