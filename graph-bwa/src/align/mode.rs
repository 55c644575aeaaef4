//! 比对模式：决定比对原语的参数以及坐标还原阶段的策略。

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentMode {
    /// 通用 contig 比对
    Default,
    /// 同一 contig 的片段之间
    IntraCtg,
    /// 长且噪声大的读段
    PacBio,
    Ont2D,
    /// 以核苷酸表示的蛋白质搜索，对读框敏感
    Protein,
}

/// 比对参数，对应 BWA 的 `mem_opt_t` 中本 crate 实际使用的部分。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignOpt {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub o_del: i32,
    pub e_del: i32,
    pub o_ins: i32,
    pub e_ins: i32,
    pub pen_clip5: i32,
    pub pen_clip3: i32,
    pub band_width: usize,
    pub min_seed_len: usize,
    pub split_factor: f32,
    /// 出现次数超过该值的种子被忽略
    pub max_occ: usize,
    pub max_chain_gap: usize,
    pub min_chain_weight: usize,
    pub mask_level: f32,
    pub drop_ratio: f32,
}

impl Default for AlignOpt {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch_penalty: 4,
            o_del: 6,
            e_del: 1,
            o_ins: 6,
            e_ins: 1,
            pen_clip5: 5,
            pen_clip3: 5,
            band_width: 100,
            min_seed_len: 19,
            split_factor: 1.5,
            max_occ: 500,
            max_chain_gap: 10_000,
            min_chain_weight: 0,
            mask_level: 0.5,
            drop_ratio: 0.5,
        }
    }
}

/// 坐标还原阶段的策略开关。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructionPolicy {
    pub keep_secondary: bool,
    /// 按读框处理（蛋白质模式）
    pub frame_aware: bool,
}

impl AlignmentMode {
    #[inline]
    pub fn is_protein(self) -> bool {
        self == AlignmentMode::Protein
    }

    pub fn align_opt(self) -> AlignOpt {
        let mut o = AlignOpt::default();
        match self {
            AlignmentMode::Default => {}
            AlignmentMode::IntraCtg => {
                o.o_del = 16;
                o.o_ins = 16;
                o.mismatch_penalty = 9;
                o.pen_clip5 = 5;
                o.pen_clip3 = 5;
            }
            AlignmentMode::PacBio | AlignmentMode::Ont2D => {
                o.o_del = 1;
                o.e_del = 1;
                o.o_ins = 1;
                o.e_ins = 1;
                o.mismatch_penalty = 1;
                o.split_factor = 10.0;
                o.pen_clip5 = 0;
                o.pen_clip3 = 0;
                o.min_seed_len = 14;
                o.mask_level = 20.0;
                o.drop_ratio = 20.0;
                o.min_chain_weight = 40;
            }
            AlignmentMode::Protein => {
                // 罚分足够大，等价于禁止插入缺失
                o.o_del = 10_000;
                o.e_del = 10_000;
                o.o_ins = 10_000;
                o.e_ins = 10_000;
                o.mismatch_penalty = 1;
                o.split_factor = 10.0;
                o.pen_clip5 = 0;
                o.pen_clip3 = 0;
                o.min_seed_len = 7;
                o.drop_ratio = 20.0;
                o.mask_level = 20.0;
                o.min_chain_weight = 10;
            }
        }
        o
    }

    pub fn policy(self) -> ReconstructionPolicy {
        ReconstructionPolicy {
            keep_secondary: matches!(self, AlignmentMode::PacBio | AlignmentMode::Ont2D),
            frame_aware: self.is_protein(),
        }
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlignmentMode::Default => "default",
            AlignmentMode::IntraCtg => "intra-ctg",
            AlignmentMode::PacBio => "pacbio",
            AlignmentMode::Ont2D => "ont2d",
            AlignmentMode::Protein => "protein",
        };
        f.write_str(s)
    }
}

impl FromStr for AlignmentMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(AlignmentMode::Default),
            "intra-ctg" | "intractg" => Ok(AlignmentMode::IntraCtg),
            "pacbio" => Ok(AlignmentMode::PacBio),
            "ont2d" | "ont" => Ok(AlignmentMode::Ont2D),
            "protein" => Ok(AlignmentMode::Protein),
            other => Err(anyhow!("unknown alignment mode '{}'", other)),
        }
    }
}
