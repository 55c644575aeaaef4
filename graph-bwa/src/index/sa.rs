use crate::error::{BuildError, Result};

/// 构建后缀数组（倍增法，O(n log² n)）。
/// 输入为数值化文本，末尾必须是唯一且最小的哨兵 0（`$`），其余符号为 1..=4。
pub fn build_sa(text: &[u8]) -> Result<Vec<u32>> {
    let n = text.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n > u32::MAX as usize {
        return Err(BuildError::Primitive(format!("text of {} symbols exceeds 32-bit suffix array", n)));
    }

    let mut sa: Vec<u32> = Vec::new();
    sa.try_reserve_exact(n).map_err(BuildError::exhausted("suffix array", n * 4))?;
    sa.extend(0..n as u32);
    let mut rank: Vec<u32> = Vec::new();
    rank.try_reserve_exact(n).map_err(BuildError::exhausted("suffix ranks", n * 4))?;
    rank.extend(text.iter().map(|&b| b as u32));
    let mut tmp: Vec<u32> = vec![0; n];

    let mut k = 1usize;
    loop {
        // 后半段越界时用 0 表示，真实 rank 从 1 开始
        let key = |i: u32, rank: &[u32]| {
            let i = i as usize;
            let next = if i + k < n { rank[i + k] + 1 } else { 0 };
            (rank[i], next)
        };
        sa.sort_unstable_by_key(|&i| key(i, &rank));

        tmp[sa[0] as usize] = 0;
        for w in 1..n {
            let (a, b) = (sa[w - 1], sa[w]);
            let bump = u32::from(key(a, &rank) != key(b, &rank));
            tmp[b as usize] = tmp[a as usize] + bump;
        }
        std::mem::swap(&mut rank, &mut tmp);

        if rank[sa[n - 1] as usize] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }
    Ok(sa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sa(text: &[u8]) -> Vec<u32> {
        let mut idx: Vec<u32> = (0..text.len() as u32).collect();
        idx.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        idx
    }

    fn make_text(len: usize, seed: u32) -> Vec<u8> {
        let mut x = seed;
        let mut v: Vec<u8> = (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((x >> 16) % 4) as u8 + 1
            })
            .collect();
        v.push(0);
        v
    }

    #[test]
    fn sa_basic() {
        // A C G T $ -> 1 2 3 4 0
        let sa = build_sa(&[1, 2, 3, 4, 0]).unwrap();
        assert_eq!(sa, vec![4, 0, 1, 2, 3]);
    }

    #[test]
    fn sa_matches_naive_on_random_texts() {
        for len in 0..=40 {
            let text = make_text(len, 1_234_567 + len as u32);
            assert_eq!(build_sa(&text).unwrap(), naive_sa(&text), "mismatch on len={}", len);
        }
    }

    #[test]
    fn sa_handles_repeats() {
        let text = [1u8, 1, 1, 1, 1, 1, 0];
        assert_eq!(build_sa(&text).unwrap(), vec![6, 5, 4, 3, 2, 1, 0]);
    }
}
