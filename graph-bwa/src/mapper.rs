//! 面向调用方的入口：持有图的引用、索引包与比对原语。

use rayon::prelude::*;

use crate::align::{Aligner, AlignmentMode, SeedExtendAligner};
use crate::error::Result;
use crate::graph::Graph;
use crate::index::bundle::IndexBundle;
use crate::mapping::{reconstruct, MappingPath};
use crate::util::codon::{Canonicalizer, CodonCanonicalizer};

/// 把序列比对到图的边上。索引在构造时一次建好，之后只读，
/// 可以在多个线程间共享做并行查询。
pub struct GraphAligner<'g, G: Graph + ?Sized, A: Aligner = SeedExtendAligner> {
    graph: &'g G,
    bundle: IndexBundle,
    aligner: A,
    canonicalizer: Box<dyn Canonicalizer>,
}

impl<'g, G: Graph + ?Sized> GraphAligner<'g, G> {
    /// 为图的当前边集建索引。图在构建期间不得被修改。
    pub fn new(graph: &'g G, mode: AlignmentMode) -> Result<Self> {
        let bundle = IndexBundle::build(graph, mode)?;
        Ok(Self::with_aligner(graph, bundle, SeedExtendAligner::new(mode)))
    }
}

impl<'g, G: Graph + ?Sized, A: Aligner> GraphAligner<'g, G, A> {
    pub fn with_aligner(graph: &'g G, bundle: IndexBundle, aligner: A) -> Self {
        Self { graph, bundle, aligner, canonicalizer: Box::new(CodonCanonicalizer::new()) }
    }

    /// 蛋白质模式下查询序列使用的规范化器，须与建索引时一致。
    pub fn canonicalizer(mut self, canonicalizer: Box<dyn Canonicalizer>) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn bundle(&self) -> &IndexBundle {
        &self.bundle
    }

    pub fn mode(&self) -> AlignmentMode {
        self.bundle.mode()
    }

    /// 蛋白质模式下按第 0 读框规范化整码子部分，不足一个码子的尾部原样保留，
    /// 使 read 坐标不变。
    fn prepare_query(&self, seq: &[u8]) -> Vec<u8> {
        if !self.mode().is_protein() {
            return seq.to_vec();
        }
        let whole = seq.len() - seq.len() % 3;
        let mut q = self.canonicalizer.canonicalize(&seq[..whole]);
        q.extend_from_slice(&seq[whole..]);
        q
    }

    pub fn align_sequence(&self, seq: &[u8]) -> MappingPath {
        let query = self.prepare_query(seq);
        let hits = self.aligner.align(&self.bundle, &query);
        let path = reconstruct(self.graph, &self.bundle, &hits, query.len());
        log::debug!("query of {} bp: {} hits, {} mapped", query.len(), hits.len(), path.len());
        path
    }
}

impl<'g, G: Graph + Sync + ?Sized, A: Aligner> GraphAligner<'g, G, A> {
    /// 在 rayon 线程池上并行比对，结果顺序与输入一致。
    pub fn align_batch<S: AsRef<[u8]> + Sync>(&self, seqs: &[S]) -> Vec<MappingPath> {
        seqs.par_iter().map(|s| self.align_sequence(s.as_ref())).collect()
    }
}
