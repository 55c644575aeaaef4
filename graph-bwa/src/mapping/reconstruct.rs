//! 比对命中 → 图上映射路径。
//!
//! 逐条命中过滤、变换，不重排、不合并。非蛋白质模式下，普通读段的区间
//! 按 K 缩减为 k-mer 坐标，便于下游串接。

use log::{trace, warn};

use crate::align::hit::AlignmentHit;
use crate::graph::Graph;
use crate::index::bundle::IndexBundle;

use super::{MappingPath, MappingRange, Range};

/// 区间 [start, end) 是否主要落在边两端的 K 长顶点重叠区内。
#[inline]
pub fn mostly_in_vertex(start: usize, end: usize, len: usize, k: usize) -> bool {
    (start < k && 2 * k > end + start) || (end > len && end + start > 2 * len)
}

/// 把 read 区间收缩到整码子边界，参考区间做同样的平移。
pub fn cut_interval(initial: &mut Range, mapped: &mut Range) {
    let d = (3 - initial.start % 3) % 3;
    initial.start += d;
    mapped.start += d;
    let d = initial.end % 3;
    initial.end -= d;
    mapped.end = mapped.end.saturating_sub(d);
}

/// 把比对原语的命中还原为边上的映射路径。
pub fn reconstruct<G: Graph + ?Sized>(
    graph: &G,
    bundle: &IndexBundle,
    hits: &[AlignmentHit],
    query_len: usize,
) -> MappingPath {
    let k = graph.k();
    let policy = bundle.mode().policy();
    let protein = policy.frame_aware;
    let anns = bundle.annotations();
    let l_pac = bundle.forward_len();
    let short = query_len <= k;

    let mut path = MappingPath::new();
    for h in hits {
        if h.secondary && !policy.keep_secondary {
            continue;
        }

        let qspan = h.query_span();
        let rspan = h.ref_span() as usize;
        if protein && qspan != rspan {
            warn!("protein hit with indels: query [{}, {}) vs reference [{}, {})", h.qb, h.qe, h.rb, h.re);
            continue;
        }

        if short {
            if qspan * 2 <= query_len || rspan * 2 <= query_len {
                continue;
            }
        } else {
            let min_len = if protein { (query_len / 2).min(k) } else { k };
            if qspan <= min_len || rspan <= min_len {
                continue;
            }
        }

        let rep = if h.rb < l_pac { h.rb } else { h.re - 1 };
        let (fpos, is_rev) = anns.depos(rep);
        let Some(ann) = anns.locate(fpos).and_then(|s| anns.get(s)) else {
            trace!("hit at {} outside every segment", rep);
            continue;
        };
        let frame = ann.frame.map_or(0, usize::from);
        let edge = ann.edge;
        let len = graph.length(edge);
        let start = (fpos - ann.offset) as usize + frame;

        let mut initial = Range::new(h.qb, h.qe);
        let mut mapped = Range::new(start, start + rspan);
        // 蛋白质模式保持完整跨度
        if !protein && short {
            initial.end = h.qb;
            mapped.end = start;
            // L 以核苷酸计时 start 总落在段内，不会触发
            if mapped.end > len {
                trace!("short hit on edge {} ends past {}", edge, len);
                continue;
            }
        } else if !protein {
            initial.end = h.qe - k;
            mapped.end = start + rspan - k;
        }

        let quality = h.score as f64 / qspan as f64;

        if mostly_in_vertex(start, start + rspan, len, k) {
            trace!("hit [{}, {}) on edge {} lies in a vertex", start, start + rspan, edge);
            continue;
        }

        if protein {
            if (start - frame) % 3 != h.qb % 3 {
                continue;
            }
            cut_interval(&mut initial, &mut mapped);
            if initial.is_empty() {
                continue;
            }
        }

        if is_rev {
            let eff = if protein { len } else { len + k - 1 };
            path.push(graph.conjugate(edge), MappingRange::new(initial, mapped.invert(eff)), quality);
        } else {
            path.push(edge, MappingRange::new(initial, mapped), quality);
        }
    }
    path
}
