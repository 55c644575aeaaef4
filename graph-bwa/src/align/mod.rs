//! 比对原语：read → 双向参考文本上的局部比对命中。
//!
//! 流程与 BWA-MEM 一致：SMEM 种子 → 种子链 → 带状 Smith-Waterman 延伸 →
//! 主/次命中标记。命中不会跨越段边界。

pub mod chain;
pub mod hit;
pub mod mode;
pub mod seed;
pub mod sw;

pub use hit::AlignmentHit;
pub use mode::{AlignOpt, AlignmentMode, ReconstructionPolicy};

use crate::index::bundle::IndexBundle;
use crate::util::dna;
use sw::{SwBuffer, SwParams};

/// 比对原语。实现必须可跨线程共享，批量比对时按读段并行调用。
pub trait Aligner: Sync {
    fn align(&self, bundle: &IndexBundle, query: &[u8]) -> Vec<AlignmentHit>;
}

/// 种子-延伸比对器，参数由比对模式决定。
#[derive(Debug, Clone)]
pub struct SeedExtendAligner {
    opt: AlignOpt,
}

impl SeedExtendAligner {
    pub fn new(mode: AlignmentMode) -> Self {
        Self::with_opt(mode.align_opt())
    }

    pub fn with_opt(opt: AlignOpt) -> Self {
        Self { opt }
    }

    pub fn opt(&self) -> &AlignOpt {
        &self.opt
    }
}

impl Aligner for SeedExtendAligner {
    fn align(&self, bundle: &IndexBundle, query: &[u8]) -> Vec<AlignmentHit> {
        let opt = &self.opt;
        let anns = bundle.annotations();
        let m = query.len();

        let alpha: Vec<u8> = query.iter().map(|&b| dna::to_alphabet(b).unwrap_or(0)).collect();
        let seeds = seed::find_smem_seeds(bundle.fm(), anns, &alpha, opt);
        let mut chains = chain::build_chains(&seeds, opt.max_chain_gap);
        chain::filter_chains(&mut chains, opt);
        log::trace!("{} seeds, {} chains kept", seeds.len(), chains.len());

        let q4: Vec<u8> = query.iter().map(|&b| dna::to_nt4(b)).collect();
        let params = SwParams::from(opt);
        let band = opt.band_width;
        let mut buf = SwBuffer::new();
        let mut hits: Vec<AlignmentHit> = Vec::with_capacity(chains.len());

        for ch in &chains {
            let (Some(first), Some(last)) = (ch.seeds.first(), ch.seeds.last()) else {
                continue;
            };
            // 参考窗口限制在段内，两端各留出未覆盖的 read 长度加带宽
            let (reg_start, reg_end) = anns.region_bounds(ch.segment, ch.is_rev);
            let win_start = reg_start.max(first.rb.saturating_sub((first.qb + band) as u64));
            let win_end = reg_end.min(last.re + (m - last.qe + band) as u64);
            if win_start >= win_end {
                continue;
            }
            let reference = bundle.fetch_flat(win_start, win_end);
            let diag = (first.rb - win_start) as isize - first.qb as isize;

            let res = sw::banded_sw_with_buf(&q4, &reference, params, diag, &mut buf);
            if res.score <= 0 {
                continue;
            }
            hits.push(AlignmentHit {
                qb: res.query_start,
                qe: res.query_end,
                rb: win_start + res.ref_start as u64,
                re: win_start + res.ref_end as u64,
                score: res.score,
                is_rev: ch.is_rev,
                secondary: false,
                segment: ch.segment,
            });
        }

        // 不同的链可能延伸成同一条比对
        hits.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.rb.cmp(&b.rb))
                .then(a.qb.cmp(&b.qb))
                .then(a.re.cmp(&b.re))
                .then(a.qe.cmp(&b.qe))
        });
        hits.dedup_by(|a, b| (a.qb, a.qe, a.rb, a.re) == (b.qb, b.qe, b.rb, b.re));
        hit::mark_secondary(&mut hits, opt.mask_level);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeGraph;

    fn lcg_seq(len: usize, mut state: u64) -> Vec<u8> {
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                b"ACGT"[(state >> 33) as usize & 3]
            })
            .collect()
    }

    fn setup() -> (Vec<u8>, IndexBundle) {
        let e1 = lcg_seq(60, 7);
        let e2 = lcg_seq(60, 99);
        let mut g = EdgeGraph::new(21);
        g.add_edge(&e1);
        g.add_edge(&e2);
        let bundle = IndexBundle::build(&g, AlignmentMode::Default).unwrap();
        (e1, bundle)
    }

    #[test]
    fn exact_substring_gives_single_primary_hit() {
        let (e1, bundle) = setup();
        let aligner = SeedExtendAligner::new(AlignmentMode::Default);
        let hits = aligner.align(&bundle, &e1[10..50]);
        let primary: Vec<_> = hits.iter().filter(|h| !h.secondary).collect();
        assert_eq!(primary.len(), 1);
        let h = primary[0];
        assert_eq!((h.qb, h.qe, h.rb, h.re, h.score), (0, 40, 10, 50, 40));
        assert!(!h.is_rev);
        assert_eq!(h.segment, 0);
    }

    #[test]
    fn reverse_complement_hits_reverse_strand() {
        let (e1, bundle) = setup();
        let aligner = SeedExtendAligner::new(AlignmentMode::Default);
        let rc = dna::revcomp(&e1[10..50]);
        let hits = aligner.align(&bundle, &rc);
        let h = hits.iter().find(|h| !h.secondary).expect("hit");
        assert!(h.is_rev);
        // 双向文本长 240，正向 [10,50) 的反向互补位于 [190,230)
        assert_eq!((h.rb, h.re), (190, 230));
        assert_eq!(h.score, 40);
    }

    #[test]
    fn terminal_mismatch_is_absorbed_by_clip_bonus() {
        let (e1, bundle) = setup();
        let aligner = SeedExtendAligner::new(AlignmentMode::Default);
        let mut q = e1[10..50].to_vec();
        q[39] = if q[39] == b'A' { b'C' } else { b'A' };
        let hits = aligner.align(&bundle, &q);
        let h = hits.iter().find(|h| !h.secondary).expect("hit");
        assert_eq!((h.qb, h.qe), (0, 40));
        assert_eq!(h.score, 39 - 4);
    }

    #[test]
    fn unrelated_query_has_no_hits() {
        let (_, bundle) = setup();
        let aligner = SeedExtendAligner::new(AlignmentMode::Default);
        assert!(aligner.align(&bundle, b"NNNNNNNNNNNNNNNNNNNNNNNNNNNNNN").is_empty());
        assert!(aligner.align(&bundle, b"").is_empty());
    }
}
