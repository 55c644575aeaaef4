//! 把图的边压平为 pac + ann + amb。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::align::mode::AlignmentMode;
use crate::error::Result;
use crate::graph::{EdgeId, Graph};
use crate::index::ann::{AmbiguousRun, Annotations};
use crate::index::pac::PackedBuffer;
use crate::util::codon::{Canonicalizer, CodonCanonicalizer};
use crate::util::dna;

/// 模糊碱基替换的默认随机种子，与 BWA 的 `bns->seed` 相同。
pub const DEFAULT_SEED: u64 = 11;

/// 蛋白质模式下每条边展开的读框数。
pub const N_FRAMES: usize = 3;

/// 一次构建的产物。
#[derive(Debug, Clone)]
pub struct PackedReference {
    pub pac: PackedBuffer,
    pub annotations: Annotations,
    pub ambiguous: Vec<AmbiguousRun>,
}

impl PackedReference {
    /// 正向部分的碱基数（不含反向互补镜像）。
    pub fn forward_len(&self) -> u64 {
        self.annotations.total_len()
    }
}

/// pac 构建器。持有自己的随机数生成器，每次构建前按种子重置，
/// 因此相同输入的多次构建逐位一致，且与其它构建器实例互不影响。
pub struct PackedReferenceBuilder {
    mode: AlignmentMode,
    seed: u64,
    rng: StdRng,
    canonicalizer: Box<dyn Canonicalizer>,
}

impl PackedReferenceBuilder {
    pub fn new(mode: AlignmentMode) -> Self {
        Self::with_seed(mode, DEFAULT_SEED)
    }

    pub fn with_seed(mode: AlignmentMode, seed: u64) -> Self {
        Self {
            mode,
            seed,
            rng: StdRng::seed_from_u64(seed),
            canonicalizer: Box::new(CodonCanonicalizer::new()),
        }
    }

    pub fn canonicalizer(mut self, canonicalizer: Box<dyn Canonicalizer>) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// 依次打包 `edges`。`forward_only` 为 false 时再追加整体的反向互补。
    pub fn build<G: Graph + ?Sized>(
        &mut self,
        graph: &G,
        edges: &[EdgeId],
        forward_only: bool,
    ) -> Result<PackedReference> {
        self.rng = StdRng::seed_from_u64(self.seed);
        let mut out = PackedReference {
            pac: PackedBuffer::new(),
            annotations: Annotations::new(),
            ambiguous: Vec::new(),
        };

        for &e in edges {
            let seq = graph.nucleotides(e);
            if self.mode.is_protein() {
                for frame in 0..N_FRAMES {
                    let framed = seq.get(frame..).unwrap_or(&[]);
                    let canon = self.canonicalizer.canonicalize(framed);
                    self.add_segment(&canon, e, Some(frame as u8), &mut out)?;
                }
            } else {
                self.add_segment(&seq, e, None, &mut out)?;
            }
        }

        if !forward_only {
            out.pac.append_reverse_complement()?;
        }
        Ok(out)
    }

    fn add_segment(
        &mut self,
        seq: &[u8],
        edge: EdgeId,
        frame: Option<u8>,
        out: &mut PackedReference,
    ) -> Result<()> {
        if seq.is_empty() {
            return Ok(());
        }
        let offset = out.pac.len();
        let mut last: Option<u8> = None;
        for (i, &b) in seq.iter().enumerate() {
            let mut c = dna::to_nt4(b);
            if c >= 4 {
                match out.ambiguous.last_mut() {
                    // 同一段内紧邻的相同符号并入上一区段
                    Some(run) if last == Some(b) => run.len += 1,
                    _ => out.ambiguous.push(AmbiguousRun { offset: offset + i as u64, len: 1, symbol: b }),
                }
                c = self.rng.gen_range(0..4);
            }
            last = Some(b);
            out.pac.push(c)?;
        }
        out.annotations.push(edge, frame, seq.len() as u64);
        Ok(())
    }
}

/// 选出参与索引的边。蛋白质模式包含共轭边，其余模式只取规范边。
/// 空边被跳过；蛋白质模式下不足以填满三个读框的边（少于 5 个碱基）也被跳过，
/// 保证每条入选的边恰好对应三个段。
pub fn indexable_edges<G: Graph + ?Sized>(graph: &G, mode: AlignmentMode) -> Vec<EdgeId> {
    let min_len = if mode.is_protein() { N_FRAMES + 2 } else { 1 };
    graph
        .edges(!mode.is_protein())
        .into_iter()
        .filter(|&e| graph.nucleotides(e).len() >= min_len)
        .collect()
}
