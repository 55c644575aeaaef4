use crate::align::mode::AlignOpt;

const NEG_INF: i32 = i32::MIN / 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwParams {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub o_del: i32,
    pub e_del: i32,
    pub o_ins: i32,
    pub e_ins: i32,
    /// 比对延伸到 query 起点 / 终点时的奖励（即不截断的代价阈值）
    pub pen_clip5: i32,
    pub pen_clip3: i32,
    pub band_width: usize,
}

impl From<&AlignOpt> for SwParams {
    fn from(o: &AlignOpt) -> Self {
        Self {
            match_score: o.match_score,
            mismatch_penalty: o.mismatch_penalty,
            o_del: o.o_del,
            e_del: o.e_del,
            o_ins: o.o_ins,
            e_ins: o.e_ins,
            pen_clip5: o.pen_clip5,
            pen_clip3: o.pen_clip3,
            band_width: o.band_width,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SwResult {
    pub score: i32,
    pub query_start: usize,
    pub query_end: usize,
    pub ref_start: usize,
    pub ref_end: usize,
}

/// DP 工作缓冲区，只保存带内的格子，可跨调用复用
#[derive(Debug, Default)]
pub struct SwBuffer {
    h: Vec<i32>,
    e: Vec<i32>,
    f: Vec<i32>,
}

impl SwBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn resize(&mut self, size: usize) {
        // 读取前一定先写入，无需清零
        self.h.resize(size, 0);
        self.e.resize(size, NEG_INF);
        self.f.resize(size, NEG_INF);
    }
}

/// 带状仿射间隙 Smith-Waterman 局部对齐，带以主对角线为中心。
pub fn banded_sw(query: &[u8], reference: &[u8], p: SwParams) -> SwResult {
    banded_sw_with_buf(query, reference, p, 0, &mut SwBuffer::new())
}

/// 带以 `j - i == diag` 为中心，宽 `2 * band_width + 1`。
/// query / reference 为 2-bit 编码，4 表示模糊碱基（与任何碱基都不匹配）。
pub fn banded_sw_with_buf(
    query: &[u8],
    reference: &[u8],
    p: SwParams,
    diag: isize,
    buf: &mut SwBuffer,
) -> SwResult {
    let m = query.len();
    let n = reference.len();
    if m == 0 || n == 0 {
        return SwResult::default();
    }

    let band = p.band_width as isize;
    let w = (2 * band + 1) as usize;
    buf.resize((m + 1) * w);
    let (h, e, f) = (&mut buf.h, &mut buf.e, &mut buf.f);

    // 第 i 行带的左端列号
    let lo = |i: usize| i as isize + diag - band;
    let slot = |i: usize, j: usize| -> Option<usize> {
        let c = j as isize - lo(i);
        (c >= 0 && c < w as isize).then(|| i * w + c as usize)
    };
    // 第 0 行携带 5' 端奖励，第 0 列与带外的格子为 0
    let h_at = |h: &[i32], i: usize, j: usize| -> i32 {
        if i == 0 {
            p.pen_clip5
        } else if j == 0 {
            0
        } else {
            slot(i, j).map_or(0, |k| h[k])
        }
    };
    let gap_at = |g: &[i32], i: usize, j: usize| -> i32 {
        if i == 0 || j == 0 {
            NEG_INF
        } else {
            slot(i, j).map_or(NEG_INF, |k| g[k])
        }
    };
    let subst = |i: usize, j: usize| {
        let (a, b) = (query[i - 1], reference[j - 1]);
        if a == b && a < 4 {
            p.match_score
        } else {
            -p.mismatch_penalty
        }
    };

    let mut best_cand = 0i32;
    let mut best_i = 0usize;
    let mut best_j = 0usize;

    for i in 1..=m {
        let j_start = lo(i).max(1);
        let j_end = (i as isize + diag + band).min(n as isize);
        if j_start > j_end {
            continue;
        }
        for j in j_start as usize..=j_end as usize {
            let k = i * w + (j as isize - lo(i)) as usize;

            let ev = (h_at(h, i - 1, j) - p.o_ins - p.e_ins).max(gap_at(e, i - 1, j) - p.e_ins);
            let fv = (h_at(h, i, j - 1) - p.o_del - p.e_del).max(gap_at(f, i, j - 1) - p.e_del);
            let val = (h_at(h, i - 1, j - 1) + subst(i, j)).max(ev).max(fv).max(0);
            e[k] = ev;
            f[k] = fv;
            h[k] = val;

            // 到达 query 末端的格子享有 3' 奖励
            let cand = if i == m { val + p.pen_clip3 } else { val };
            if val > 0 && cand > best_cand {
                best_cand = cand;
                best_i = i;
                best_j = j;
            }
        }
    }

    if best_cand <= 0 {
        return SwResult::default();
    }

    // 从最佳格子回溯到局部比对起点
    let mut i = best_i;
    let mut j = best_j;
    while i > 0 && j > 0 {
        let here = h_at(h, i, j);
        if here == 0 {
            break;
        }
        if here == h_at(h, i - 1, j - 1) + subst(i, j) {
            i -= 1;
            j -= 1;
        } else if here == gap_at(e, i, j) {
            i -= 1;
        } else if here == gap_at(f, i, j) {
            j -= 1;
        } else {
            break;
        }
    }

    let mut score = h_at(h, best_i, best_j);
    if i == 0 {
        score -= p.pen_clip5;
    }

    SwResult {
        score,
        query_start: i,
        query_end: best_i,
        ref_start: j,
        ref_end: best_j,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(s: &[u8]) -> Vec<u8> {
        s.iter().map(|&b| crate::util::dna::to_nt4(b)).collect()
    }

    fn local_params() -> SwParams {
        SwParams {
            match_score: 2,
            mismatch_penalty: 1,
            o_del: 1,
            e_del: 0,
            o_ins: 1,
            e_ins: 0,
            pen_clip5: 0,
            pen_clip3: 0,
            band_width: 8,
        }
    }

    #[test]
    fn sw_perfect_match() {
        let res = banded_sw(&enc(b"ACGT"), &enc(b"ACGT"), local_params());
        assert_eq!(res, SwResult { score: 8, query_start: 0, query_end: 4, ref_start: 0, ref_end: 4 });
    }

    #[test]
    fn sw_single_mismatch() {
        let res = banded_sw(&enc(b"AGGT"), &enc(b"ACGT"), local_params());
        assert_eq!(res.score, 3 * 2 - 1);
        assert_eq!((res.query_start, res.query_end), (0, 4));
    }

    #[test]
    fn sw_single_insertion() {
        let res = banded_sw(&enc(b"ACGGT"), &enc(b"ACGT"), local_params());
        assert_eq!(res.score, 7);
        assert_eq!((res.query_start, res.query_end), (0, 5));
        assert_eq!((res.ref_start, res.ref_end), (0, 4));
    }

    #[test]
    fn sw_empty_inputs() {
        let p = local_params();
        assert_eq!(banded_sw(b"", &enc(b"ACGT"), p).score, 0);
        assert_eq!(banded_sw(&enc(b"ACGT"), b"", p).score, 0);
    }

    #[test]
    fn ambiguous_bases_never_match() {
        let res = banded_sw(&enc(b"NNNN"), &enc(b"NNNN"), local_params());
        assert_eq!(res.score, 0);
    }

    #[test]
    fn diagonal_offset_finds_shifted_match() {
        let q = enc(b"GATTACA");
        let r = enc(b"CCCCCGATTACACC");
        let mut buf = SwBuffer::new();
        let p = SwParams { band_width: 1, ..local_params() };
        let res = banded_sw_with_buf(&q, &r, p, 5, &mut buf);
        assert_eq!(res.score, 14);
        assert_eq!((res.ref_start, res.ref_end), (5, 12));
    }

    #[test]
    fn clip_bonus_extends_through_terminal_mismatch() {
        // 末端错配：纯局部比对会截掉，奖励足够时延伸到底
        let q = enc(b"ACGTACGTAC");
        let r = enc(b"ACGTACGTAG");
        let local = banded_sw(&q, &r, local_params());
        assert_eq!(local.query_end, 9);
        let p = SwParams { pen_clip3: 5, ..local_params() };
        let ext = banded_sw(&q, &r, p);
        assert_eq!(ext.query_end, 10);
        assert_eq!(ext.score, 9 * 2 - 1);
    }

    #[test]
    fn buffer_reuse() {
        let p = local_params();
        let mut buf = SwBuffer::new();
        let r1 = banded_sw_with_buf(&enc(b"ACGTACGT"), &enc(b"ACGTACGT"), p, 0, &mut buf);
        assert_eq!(r1.score, 16);
        let r2 = banded_sw_with_buf(&enc(b"AGGT"), &enc(b"ACGT"), p, 0, &mut buf);
        assert_eq!(r2.score, 5);
    }
}
