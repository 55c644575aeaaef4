/// 比对原语的一条命中，对应 BWA 的 `mem_alnreg_t`。
///
/// 参考区间 [rb, re) 位于双向拼接文本上：rb 小于正向总长度时在正向链，
/// 否则在反向互补链。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentHit {
    /// read 上的区间 [qb, qe)
    pub qb: usize,
    pub qe: usize,
    pub rb: u64,
    pub re: u64,
    pub score: i32,
    pub is_rev: bool,
    /// 被更好的命中覆盖
    pub secondary: bool,
    /// 命中所在的段（annotation 下标）
    pub segment: usize,
}

impl AlignmentHit {
    #[inline]
    pub fn query_span(&self) -> usize {
        self.qe - self.qb
    }

    #[inline]
    pub fn ref_span(&self) -> u64 {
        self.re - self.rb
    }
}

/// 按得分降序排列后，标记与更高分主命中在 read 上重叠超过
/// `mask_level` 的命中为次要命中（BWA 的 mem_mark_primary_se）。
pub fn mark_secondary(hits: &mut [AlignmentHit], mask_level: f32) {
    for j in 0..hits.len() {
        let (head, tail) = hits.split_at_mut(j);
        let cur = &mut tail[0];
        cur.secondary = head.iter().filter(|p| !p.secondary).any(|p| {
            let overlap = p.qe.min(cur.qe).saturating_sub(p.qb.max(cur.qb));
            let shorter = p.query_span().min(cur.query_span());
            overlap > 0 && overlap as f32 >= mask_level * shorter as f32
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(qb: usize, qe: usize, score: i32) -> AlignmentHit {
        AlignmentHit { qb, qe, rb: 0, re: (qe - qb) as u64, score, is_rev: false, secondary: false, segment: 0 }
    }

    #[test]
    fn overlapping_lower_hits_become_secondary() {
        let mut hits = vec![hit(0, 40, 40), hit(5, 40, 30), hit(40, 60, 20)];
        mark_secondary(&mut hits, 0.5);
        assert_eq!(hits.iter().map(|h| h.secondary).collect::<Vec<_>>(), vec![false, true, false]);
    }

    #[test]
    fn secondary_hits_do_not_shadow_others() {
        let mut hits = vec![hit(0, 20, 20), hit(10, 30, 15), hit(21, 40, 10)];
        mark_secondary(&mut hits, 0.5);
        assert_eq!(hits.iter().map(|h| h.secondary).collect::<Vec<_>>(), vec![false, true, false]);
    }

    #[test]
    fn huge_mask_level_keeps_everything_primary() {
        let mut hits = vec![hit(0, 40, 40), hit(0, 40, 39)];
        mark_secondary(&mut hits, 20.0);
        assert!(hits.iter().all(|h| !h.secondary));
    }
}
