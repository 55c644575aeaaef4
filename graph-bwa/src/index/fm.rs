use crate::error::{BuildError, Result};
use crate::util::dna::SIGMA;

/// Occ 采样块大小（符号数）。
pub const OCC_BLOCK: usize = 64;
/// SA 采样间隔（按行），与 BWA 的 `bwt_cal_sa(bwt, 32)` 相同。
pub const SA_INTERVAL: u64 = 32;

/// FM 索引：
/// - 字母表 {0:$, 1:A, 2:C, 3:G, 4:T}，文本末尾恰好一个 `$`。
/// - 定长分块的 Occ 采样（块内顺扫补偿）。
/// - 按行稀疏采样的 SA，定位时沿 LF 回溯到最近的采样行。
#[derive(Debug, Clone)]
pub struct FmIndex {
    /// C[c] = BWT 中小于 c 的符号数量
    c: [u64; SIGMA + 1],
    bwt: Vec<u8>,
    /// occ_samples[block * SIGMA + c] = 该块起点之前 c 的数量
    occ_samples: Vec<u64>,
    /// sa_samples[row / SA_INTERVAL] = SA[row]
    sa_samples: Vec<u64>,
    sa_interval: u64,
    /// SA 值为 0 的行（其 BWT 符号为 `$`）
    primary: u64,
}

impl FmIndex {
    /// 由 BWT 与完整 SA 构建（内存排序策略）。
    pub fn from_sa(bwt: Vec<u8>, sa: &[u32], primary: u64, sa_interval: u64) -> Self {
        let mut idx = Self::with_tables(bwt, primary, sa_interval);
        idx.sa_samples = sa
            .iter()
            .step_by(sa_interval as usize)
            .map(|&p| p as u64)
            .collect();
        idx
    }

    /// 只由 BWT 构建（在线策略）：从 `$` 后缀所在的第 0 行沿 LF 走完全部文本，
    /// 顺带记录采样行的 SA 值。
    pub fn from_bwt(bwt: Vec<u8>, primary: u64, sa_interval: u64) -> Result<Self> {
        let mut idx = Self::with_tables(bwt, primary, sa_interval);
        let n = idx.bwt.len() as u64;
        let n_samples = ((n + sa_interval - 1) / sa_interval) as usize;
        let mut samples: Vec<u64> = Vec::new();
        samples
            .try_reserve_exact(n_samples)
            .map_err(BuildError::exhausted("SA samples", n_samples.saturating_mul(8)))?;
        samples.resize(n_samples, 0);
        let mut row = 0u64;
        let mut pos = n - 1;
        loop {
            if row % sa_interval == 0 {
                samples[(row / sa_interval) as usize] = pos;
            }
            if row == primary {
                break;
            }
            row = idx.lf(row);
            pos -= 1;
        }
        idx.sa_samples = samples;
        Ok(idx)
    }

    fn with_tables(bwt: Vec<u8>, primary: u64, sa_interval: u64) -> Self {
        let n = bwt.len();
        let mut freq = [0u64; SIGMA];
        let n_blocks = (n + OCC_BLOCK - 1) / OCC_BLOCK;
        let mut occ_samples = vec![0u64; n_blocks * SIGMA];
        for (bi, block) in bwt.chunks(OCC_BLOCK).enumerate() {
            occ_samples[bi * SIGMA..(bi + 1) * SIGMA].copy_from_slice(&freq);
            for &ch in block {
                freq[ch as usize] += 1;
            }
        }
        let mut c = [0u64; SIGMA + 1];
        for i in 0..SIGMA {
            c[i + 1] = c[i] + freq[i];
        }
        Self { c, bwt, occ_samples, sa_samples: Vec::new(), sa_interval, primary }
    }

    /// BWT 长度（文本长度 + 1 个哨兵）。
    #[inline]
    pub fn len(&self) -> u64 {
        self.bwt.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    #[inline]
    pub fn primary(&self) -> u64 {
        self.primary
    }

    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    /// 返回 BWT[0..pos) 中 c 的出现次数。
    #[inline]
    pub fn occ(&self, c: u8, pos: u64) -> u64 {
        if pos == 0 {
            return 0;
        }
        let pos = pos as usize;
        let bi = (pos - 1) / OCC_BLOCK;
        let start = bi * OCC_BLOCK;
        let base = self.occ_samples[bi * SIGMA + c as usize];
        base + self.bwt[start..pos].iter().filter(|&&ch| ch == c).count() as u64
    }

    #[inline]
    fn lf(&self, row: u64) -> u64 {
        let c = self.bwt[row as usize];
        self.c[c as usize] + self.occ(c, row)
    }

    /// 在区间 [l, r) 上向左扩展字符 c 后的新区间。
    #[inline]
    pub fn extend_left(&self, c: u8, l: u64, r: u64) -> (u64, u64) {
        let c0 = self.c[c as usize];
        (c0 + self.occ(c, l), c0 + self.occ(c, r))
    }

    /// 反向搜索精确匹配，pat 为 1..=4 编码。
    pub fn backward_search(&self, pat: &[u8]) -> Option<(u64, u64)> {
        if self.bwt.is_empty() {
            return None;
        }
        let mut l = 0u64;
        let mut r = self.len();
        for &a in pat.iter().rev() {
            let (nl, nr) = self.extend_left(a, l, r);
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        Some((l, r))
    }

    /// 行 -> 文本位置。
    pub fn locate(&self, row: u64) -> u64 {
        let mut row = row;
        let mut steps = 0u64;
        while row % self.sa_interval != 0 {
            if row == self.primary {
                return steps;
            }
            row = self.lf(row);
            steps += 1;
        }
        self.sa_samples[(row / self.sa_interval) as usize] + steps
    }

    /// SA 区间 [l, r) 中所有行对应的文本位置。
    pub fn sa_interval_positions(&self, l: u64, r: u64) -> Vec<u64> {
        (l..r).map(|row| self.locate(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{bwt, rope, sa};
    use crate::index::pac::PackedBuffer;

    fn text_of(seq: &[u8]) -> Vec<u8> {
        let pac = PackedBuffer::from_ascii(seq).unwrap();
        let mut text: Vec<u8> = pac.iter().map(|c| c + 1).collect();
        text.push(0);
        text
    }

    fn build_sa_fm(seq: &[u8], interval: u64) -> FmIndex {
        let text = text_of(seq);
        let sa = sa::build_sa(&text).unwrap();
        let (bwt, primary) = bwt::build_bwt(&text, &sa);
        FmIndex::from_sa(bwt, &sa, primary, interval)
    }

    fn naive_positions(seq: &[u8], pat: &[u8]) -> Vec<u64> {
        (0..=seq.len().saturating_sub(pat.len()))
            .filter(|&i| seq[i..].starts_with(pat))
            .map(|i| i as u64)
            .collect()
    }

    fn encode(pat: &[u8]) -> Vec<u8> {
        pat.iter().map(|&b| crate::util::dna::to_alphabet(b).unwrap()).collect()
    }

    #[test]
    fn backward_search_finds_all_occurrences() {
        let seq = b"ACGTACGTTTACGAACGT";
        let fm = build_sa_fm(seq, 4);
        for pat in [&b"ACG"[..], b"T", b"ACGT", b"GAA", b"CCC"] {
            let mut got = match fm.backward_search(&encode(pat)) {
                Some((l, r)) => fm.sa_interval_positions(l, r),
                None => Vec::new(),
            };
            got.sort_unstable();
            assert_eq!(got, naive_positions(seq, pat), "pattern {:?}", pat);
        }
    }

    #[test]
    fn locate_agrees_between_strategies() {
        let mut x: u32 = 7;
        let seq: Vec<u8> = (0..700)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                b"ACGT"[(x >> 16) as usize % 4]
            })
            .collect();
        let text = text_of(&seq);
        let sa = sa::build_sa(&text).unwrap();
        let from_sa = build_sa_fm(&seq, SA_INTERVAL);
        let pac = PackedBuffer::from_ascii(&seq).unwrap();
        let (bwt_online, primary) = rope::build_bwt_online(&pac, pac.len()).unwrap();
        let from_bwt = FmIndex::from_bwt(bwt_online, primary, SA_INTERVAL).unwrap();
        assert_eq!(from_sa.bwt(), from_bwt.bwt());
        for row in 0..from_sa.len() {
            assert_eq!(from_sa.locate(row), sa[row as usize] as u64);
            assert_eq!(from_bwt.locate(row), sa[row as usize] as u64);
        }
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let fm = build_sa_fm(b"ACGT", 2);
        assert_eq!(fm.backward_search(&[]), Some((0, 5)));
    }
}
