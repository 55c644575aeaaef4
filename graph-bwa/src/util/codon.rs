//! 蛋白质模式下的核苷酸规范化。
//!
//! 同义密码子在翻译后不可区分，因此每个密码子都被改写为编码同一氨基酸的
//! 代表密码子，使 FM 索引上的精确匹配等价于氨基酸层面的匹配。

use crate::util::dna;

/// 标准遗传密码，密码子按 ACGT 顺序编号（第一位最高位）。
const STANDARD_CODE: &[u8; 64] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

/// 把一段核苷酸序列改写为规范核苷酸序列。输出长度必须是 3 的倍数。
pub trait Canonicalizer: Send + Sync {
    fn canonicalize(&self, seq: &[u8]) -> Vec<u8>;
}

/// 基于标准遗传密码的规范化：每个氨基酸取按 ACGT 序最小的密码子。
#[derive(Debug, Clone)]
pub struct CodonCanonicalizer {
    canonical: [u8; 64],
}

impl CodonCanonicalizer {
    pub fn new() -> Self {
        let mut canonical = [0u8; 64];
        for (codon, slot) in canonical.iter_mut().enumerate() {
            let aa = STANDARD_CODE[codon];
            // 第一次出现的位置即按 ACGT 序最小的同义密码子
            *slot = STANDARD_CODE.iter().position(|&x| x == aa).unwrap_or(codon) as u8;
        }
        Self { canonical }
    }

    /// 返回密码子对应的氨基酸（单字母，终止为 `*`），含模糊碱基时返回 None。
    pub fn translate(codon: &[u8]) -> Option<u8> {
        codon_index(codon).map(|i| STANDARD_CODE[i])
    }
}

impl Default for CodonCanonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer for CodonCanonicalizer {
    fn canonicalize(&self, seq: &[u8]) -> Vec<u8> {
        let n_codons = seq.len() / 3;
        let mut out = Vec::with_capacity(n_codons * 3);
        for codon in seq.chunks_exact(3) {
            match codon_index(codon) {
                Some(i) => {
                    let c = self.canonical[i] as usize;
                    out.push(dna::from_nt4((c >> 4) as u8));
                    out.push(dna::from_nt4(((c >> 2) & 3) as u8));
                    out.push(dna::from_nt4((c & 3) as u8));
                }
                // 模糊密码子原样保留，交给模糊区段记录
                None => out.extend_from_slice(codon),
            }
        }
        out
    }
}

fn codon_index(codon: &[u8]) -> Option<usize> {
    let mut idx = 0usize;
    for &b in codon {
        let c = dna::to_nt4(b);
        if c > 3 {
            return None;
        }
        idx = (idx << 2) | c as usize;
    }
    Some(idx)
}
