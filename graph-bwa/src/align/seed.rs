use crate::align::mode::AlignOpt;
use crate::index::ann::Annotations;
use crate::index::fm::FmIndex;

/// 长 SMEM 内部重新播种时，原种子出现次数的上限（对应 BWA 的 split_width）
const SPLIT_WIDTH: u64 = 10;

/// MEM 种子，参考坐标为双向拼接文本上的位置
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemSeed {
    /// 所在段（annotation 下标）
    pub segment: usize,
    pub is_rev: bool,
    /// read 上的区间 [qb, qe)
    pub qb: usize,
    pub qe: usize,
    /// 参考上的区间 [rb, re)
    pub rb: u64,
    pub re: u64,
}

impl MemSeed {
    #[inline]
    pub fn len(&self) -> usize {
        self.qe - self.qb
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.qe == self.qb
    }
}

/// 以 qe 结尾、出现次数至少为 min_occ 的最长精确匹配，返回 (qb, l, r)。
/// query_alpha 中 0 表示模糊碱基，扩展在此停止。
fn longest_match_ending_at(
    fm: &FmIndex,
    query_alpha: &[u8],
    qe: usize,
    min_occ: u64,
) -> Option<(usize, u64, u64)> {
    let mut l = 0u64;
    let mut r = fm.len();
    let mut qb = qe;
    while qb > 0 {
        let c = query_alpha[qb - 1];
        if c == 0 {
            break;
        }
        let (nl, nr) = fm.extend_left(c, l, r);
        if nr - nl < min_occ.max(1) {
            break;
        }
        l = nl;
        r = nr;
        qb -= 1;
    }
    (qb < qe).then_some((qb, l, r))
}

/// SMEM 搜索：对 read 的每个结束位置，找到向左能延伸的最长精确匹配，
/// 过滤被包含的匹配后即为 SMEM；较长且唯一的 SMEM 在中点附近重新播种，
/// 以找回重复区域中较短的命中。
pub fn find_smem_seeds(
    fm: &FmIndex,
    anns: &Annotations,
    query_alpha: &[u8],
    opt: &AlignOpt,
) -> Vec<MemSeed> {
    let n = query_alpha.len();
    let min_len = opt.min_seed_len.max(1);
    if n == 0 || min_len > n || fm.is_empty() {
        return Vec::new();
    }

    // 第一步：每个结束位置的最长匹配 (qb, qe, sa_l, sa_r)
    let mut mems: Vec<(usize, usize, u64, u64)> = Vec::new();
    for qe in min_len..=n {
        if let Some((qb, l, r)) = longest_match_ending_at(fm, query_alpha, qe, 1) {
            if qe - qb >= min_len {
                mems.push((qb, qe, l, r));
            }
        }
    }

    // 第二步：保留 SMEM
    filter_contained(&mut mems);

    // 第三步：重新播种
    let split_len = (min_len as f32 * opt.split_factor) as usize;
    let mut extra = Vec::new();
    for &(qb, qe, l, r) in &mems {
        if qe - qb < split_len || r - l > SPLIT_WIDTH {
            continue;
        }
        let end = ((qb + qe) / 2 + min_len).min(qe);
        if let Some((rqb, rl, rr)) = longest_match_ending_at(fm, query_alpha, end, r - l + 1) {
            if end - rqb >= min_len {
                extra.push((rqb, end, rl, rr));
            }
        }
    }
    mems.extend(extra);

    // 第四步：展开为具体种子；跨段或跨链的命中丢弃
    let mut seeds = Vec::new();
    for &(qb, qe, l, r) in &mems {
        if (r - l) as usize > opt.max_occ {
            continue;
        }
        let len = (qe - qb) as u64;
        for pos in fm.sa_interval_positions(l, r) {
            if let Some((segment, is_rev)) = anns.flat_region(pos, pos + len) {
                seeds.push(MemSeed { segment, is_rev, qb, qe, rb: pos, re: pos + len });
            }
        }
    }

    seeds.sort();
    seeds.dedup();
    seeds
}

/// 过滤被其他区间完全包含的 MEM
fn filter_contained(mems: &mut Vec<(usize, usize, u64, u64)>) {
    if mems.len() <= 1 {
        return;
    }
    // 按长度降序，等长时按起点
    mems.sort_by(|a, b| (b.1 - b.0).cmp(&(a.1 - a.0)).then(a.0.cmp(&b.0)));

    let mut kept: Vec<(usize, usize, u64, u64)> = Vec::with_capacity(mems.len());
    for &m in mems.iter() {
        if !kept.iter().any(|k| k.0 <= m.0 && k.1 >= m.1) {
            kept.push(m);
        }
    }
    *mems = kept;
}
