//! 一次性构建、之后只读的索引包。

use chrono::{DateTime, Utc};

use crate::align::mode::AlignmentMode;
use crate::error::{BuildError, Result};
use crate::graph::{EdgeId, Graph};
use crate::index::ann::{AmbiguousRun, Annotations};
use crate::index::builder::{indexable_edges, PackedReferenceBuilder};
use crate::index::fm::FmIndex;
use crate::index::pac::PackedBuffer;
use crate::index::strategy::{build_index, BuildStrategy};

/// 构建时的元信息，仅用于日志与统计输出。
#[derive(Debug, Clone)]
pub struct IndexMeta {
    pub built_at: DateTime<Utc>,
    pub strategy: BuildStrategy,
    pub n_edges: usize,
    pub n_segments: usize,
    /// 建索引时使用的碱基总数（双向）
    pub indexed_bases: u64,
}

/// {FM 索引, 注释, 正向 pac, 模糊区段, 比对模式}。构建后不可变，可跨线程共享。
#[derive(Debug)]
pub struct IndexBundle {
    fm: FmIndex,
    annotations: Annotations,
    pac: PackedBuffer,
    ambiguous: Vec<AmbiguousRun>,
    mode: AlignmentMode,
    edges: Vec<EdgeId>,
    meta: IndexMeta,
}

impl IndexBundle {
    /// 从图的当前快照构建索引。构建期间图不得被修改。
    pub fn build<G: Graph + ?Sized>(graph: &G, mode: AlignmentMode) -> Result<Self> {
        Self::build_with(graph, PackedReferenceBuilder::new(mode))
    }

    pub fn build_with<G: Graph + ?Sized>(graph: &G, mut builder: PackedReferenceBuilder) -> Result<Self> {
        let mode = builder.mode();
        let edges = indexable_edges(graph, mode);
        if edges.is_empty() {
            return Err(BuildError::EmptyReference);
        }

        // 最终保存的只有正向 pac；双向 pac 只用于建 BWT
        let fwd = builder.build(graph, &edges, true)?;
        let l_pac = fwd.forward_len();
        let (fm, strategy) = {
            let both = builder.build(graph, &edges, false)?;
            build_index(&both.pac, l_pac * 2)?
        };

        let meta = IndexMeta {
            built_at: Utc::now(),
            strategy,
            n_edges: edges.len(),
            n_segments: fwd.annotations.len(),
            indexed_bases: l_pac * 2,
        };
        log::info!(
            "indexed {} edges as {} segments ({} bases, {} ambiguous runs, mode {})",
            meta.n_edges,
            meta.n_segments,
            l_pac,
            fwd.ambiguous.len(),
            mode
        );

        Ok(Self {
            fm,
            annotations: fwd.annotations,
            pac: fwd.pac,
            ambiguous: fwd.ambiguous,
            mode,
            edges,
            meta,
        })
    }

    pub fn fm(&self) -> &FmIndex {
        &self.fm
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// 正向 pac（不含反向互补）。
    pub fn pac(&self) -> &PackedBuffer {
        &self.pac
    }

    pub fn ambiguous(&self) -> &[AmbiguousRun] {
        &self.ambiguous
    }

    /// 正向总长度 l_pac。
    pub fn forward_len(&self) -> u64 {
        self.annotations.total_len()
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// 参与索引的边，按打包顺序。
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// 取双向坐标 [start, end) 的碱基（2-bit 编码），反向半部即时求反向互补。
    pub fn fetch_flat(&self, start: u64, end: u64) -> Vec<u8> {
        (start..end)
            .map(|p| {
                let (fp, is_rev) = self.annotations.depos(p);
                let c = self.pac.get(fp);
                if is_rev {
                    3 - c
                } else {
                    c
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeGraph;

    #[test]
    fn empty_graph_is_rejected() {
        let g = EdgeGraph::new(21);
        assert!(matches!(IndexBundle::build(&g, AlignmentMode::Default), Err(BuildError::EmptyReference)));
    }

    #[test]
    fn bundle_keeps_forward_pac_only() {
        let mut g = EdgeGraph::new(3);
        g.add_edge(b"AACCGGTTA");
        g.add_edge(b"GGGTTTCA");
        let b = IndexBundle::build(&g, AlignmentMode::Default).unwrap();
        assert_eq!(b.forward_len(), 17);
        assert_eq!(b.pac().len(), 17);
        assert_eq!(b.fm().len(), 35);
        assert_eq!(b.meta().indexed_bases, 34);
        assert_eq!(b.meta().strategy, BuildStrategy::InMemory);
        assert_eq!(b.edges().len(), 2);
        // 镜像半部起点是最后一条边的反向互补
        assert_eq!(b.fetch_flat(17, 20), vec![3, 2, 0]);
    }

    #[test]
    fn protein_bundle_triples_segments() {
        let mut g = EdgeGraph::new(3);
        g.add_edge(b"ATGGCTTAAGCA");
        let b = IndexBundle::build(&g, AlignmentMode::Protein).unwrap();
        // 蛋白质模式包含共轭边
        assert_eq!(b.edges().len(), 2);
        assert_eq!(b.annotations().len(), 6);
        assert!(b.annotations().is_contiguous());
    }
}
