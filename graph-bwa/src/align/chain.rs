use std::collections::BTreeMap;

use super::mode::AlignOpt;
use super::seed::MemSeed;

/// 每个 (段, 链向) 分组最多剥离的链数
const MAX_CHAINS_PER_REGION: usize = 5;

/// 种子链：同一段同一链向上共线的种子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub segment: usize,
    pub is_rev: bool,
    pub seeds: Vec<MemSeed>,
    /// 链上种子长度之和
    pub weight: usize,
}

impl Chain {
    /// 链在 read 上覆盖的 [min qb, max qe)
    pub fn query_span(&self) -> (usize, usize) {
        let lo = self.seeds.iter().map(|s| s.qb).min().unwrap_or(0);
        let hi = self.seeds.iter().map(|s| s.qe).max().unwrap_or(0);
        (lo, hi)
    }
}

/// 从同一区域的种子中用 DP 找出权重最大的共线链
pub fn best_chain(seeds: &[MemSeed], max_gap: usize) -> Option<Chain> {
    let first = seeds.first()?;

    let mut idxs: Vec<usize> = (0..seeds.len()).collect();
    idxs.sort_by_key(|&i| (seeds[i].qb, seeds[i].rb));

    let n = idxs.len();
    let mut dp: Vec<usize> = vec![0; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut best_t = 0usize;

    for (t, &i) in idxs.iter().enumerate() {
        let si = &seeds[i];
        dp[t] = si.len();

        for (u, &j) in idxs[..t].iter().enumerate() {
            let sj = &seeds[j];
            if sj.qe > si.qb || sj.re > si.rb {
                continue;
            }
            let gap_q = si.qb - sj.qe;
            let gap_r = (si.rb - sj.re) as usize;
            if gap_q > max_gap || gap_r > max_gap {
                continue;
            }
            let cand = dp[u] + si.len();
            if cand > dp[t] {
                dp[t] = cand;
                prev[t] = Some(u);
            }
        }

        if dp[t] > dp[best_t] {
            best_t = t;
        }
    }

    let mut chain_idxs: Vec<usize> = Vec::new();
    let mut cur = Some(best_t);
    while let Some(t) = cur {
        chain_idxs.push(idxs[t]);
        cur = prev[t];
    }
    chain_idxs.reverse();

    Some(Chain {
        segment: first.segment,
        is_rev: first.is_rev,
        seeds: chain_idxs.into_iter().map(|i| seeds[i].clone()).collect(),
        weight: dp[best_t],
    })
}

/// 按 (段, 链向) 分组后贪心剥离多条链，按权重降序返回
pub fn build_chains(seeds: &[MemSeed], max_gap: usize) -> Vec<Chain> {
    let mut by_region: BTreeMap<(usize, bool), Vec<MemSeed>> = BTreeMap::new();
    for s in seeds {
        by_region.entry((s.segment, s.is_rev)).or_default().push(s.clone());
    }

    let mut chains = Vec::new();
    for (_, mut remaining) in by_region {
        for _ in 0..MAX_CHAINS_PER_REGION {
            let Some(chain) = best_chain(&remaining, max_gap) else {
                break;
            };
            remaining.retain(|s| !chain.seeds.contains(s));
            chains.push(chain);
        }
    }

    // 稳定排序，保证输出顺序确定
    chains.sort_by(|a, b| b.weight.cmp(&a.weight));
    chains
}

/// 链过滤，类似 BWA 的 mem_chain_flt：
/// 去掉权重不足的链，以及被更强的链在 read 上大幅覆盖的弱链。
pub fn filter_chains(chains: &mut Vec<Chain>, opt: &AlignOpt) {
    chains.retain(|c| c.weight >= opt.min_chain_weight);

    let mut kept: Vec<Chain> = Vec::with_capacity(chains.len());
    for c in chains.drain(..) {
        let (cb, ce) = c.query_span();
        let shadowed = kept.iter().any(|k| {
            let (kb, ke) = k.query_span();
            let overlap = ke.min(ce).saturating_sub(kb.max(cb));
            let shorter = (ke - kb).min(ce - cb);
            overlap as f32 >= opt.mask_level * shorter as f32
                && (c.weight as f32) < k.weight as f32 * opt.drop_ratio
                && k.weight - c.weight >= opt.min_seed_len * 2
        });
        if !shadowed {
            kept.push(c);
        }
    }
    *chains = kept;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(qb: usize, qe: usize, rb: u64) -> MemSeed {
        MemSeed { segment: 0, is_rev: false, qb, qe, rb, re: rb + (qe - qb) as u64 }
    }

    #[test]
    fn best_chain_simple_diagonal() {
        let seeds = vec![seed(0, 4, 0), seed(4, 8, 4)];
        let chain = best_chain(&seeds, 10).expect("chain");
        assert_eq!(chain.segment, 0);
        assert_eq!(chain.seeds.len(), 2);
        assert_eq!(chain.weight, 8);
    }

    #[test]
    fn best_chain_avoids_overlapping_and_far_gaps() {
        let seeds = vec![seed(0, 4, 0), seed(3, 6, 3), seed(20, 24, 20), seed(4, 8, 4)];
        let chain = best_chain(&seeds, 10).expect("chain");
        assert_eq!(chain.seeds.len(), 2);
        assert_eq!(chain.seeds[0].qb, 0);
        assert_eq!(chain.seeds[1].qb, 4);
        assert_eq!(chain.weight, 8);
    }

    #[test]
    fn build_chains_separates_strands() {
        let mut rev = seed(0, 4, 200);
        rev.is_rev = true;
        let seeds = vec![seed(0, 4, 0), seed(4, 8, 4), seed(0, 4, 100), seed(4, 8, 104), rev];
        let chains = build_chains(&seeds, 10);
        assert_eq!(chains.len(), 3);
        assert!(chains.iter().any(|c| c.is_rev && c.weight == 4));
        assert_eq!(chains[0].weight, 8);
    }

    #[test]
    fn filter_chains_removes_weak_and_shadowed() {
        let opt = AlignOpt { min_seed_len: 3, min_chain_weight: 2, ..AlignOpt::default() };
        let mut chains = vec![
            Chain { segment: 0, is_rev: false, seeds: vec![seed(0, 20, 0)], weight: 20 },
            Chain { segment: 1, is_rev: false, seeds: vec![seed(2, 6, 100)], weight: 4 },
            Chain { segment: 2, is_rev: false, seeds: vec![seed(30, 31, 300)], weight: 1 },
            Chain { segment: 3, is_rev: false, seeds: vec![seed(25, 29, 400)], weight: 4 },
        ];
        filter_chains(&mut chains, &opt);
        let segs: Vec<usize> = chains.iter().map(|c| c.segment).collect();
        assert_eq!(segs, vec![0, 3]);
    }
}
