//! 在线 BWT 构建：从文本末尾开始逐个符号插入一个分块的动态序列。
//!
//! 每插入一个符号只需要一次秩查询，整个过程不需要后缀数组，内存约为每个
//! 符号一个字节，代价是比内存排序慢。

use crate::error::{BuildError, Result};
use crate::index::pac::PackedBuffer;
use crate::util::dna::SIGMA;

const LEAF_MAX: usize = 512;
const NODE_MAX: usize = 256;

#[derive(Debug, Default)]
struct Leaf {
    syms: Vec<u8>,
    counts: [u64; SIGMA],
}

impl Leaf {
    fn from_syms(syms: Vec<u8>) -> Self {
        let mut counts = [0u64; SIGMA];
        for &s in &syms {
            counts[s as usize] += 1;
        }
        Self { syms, counts }
    }

    fn len(&self) -> u64 {
        self.syms.len() as u64
    }
}

#[derive(Debug, Default)]
struct Node {
    leaves: Vec<Leaf>,
    len: u64,
    counts: [u64; SIGMA],
}

impl Node {
    fn from_leaves(leaves: Vec<Leaf>) -> Self {
        let mut counts = [0u64; SIGMA];
        let mut len = 0;
        for leaf in &leaves {
            len += leaf.len();
            for (acc, &c) in counts.iter_mut().zip(leaf.counts.iter()) {
                *acc += c;
            }
        }
        Self { leaves, len, counts }
    }
}

/// 两层分块的动态符号序列，支持任意位置插入与秩查询。
#[derive(Debug)]
pub struct DynamicBwt {
    nodes: Vec<Node>,
    len: u64,
    counts: [u64; SIGMA],
}

impl Default for DynamicBwt {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicBwt {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::from_leaves(vec![Leaf::default()])],
            len: 0,
            counts: [0; SIGMA],
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 序列中符号 c 的总数。
    pub fn count(&self, c: u8) -> u64 {
        self.counts[c as usize]
    }

    /// 在 pos 处插入 c，返回 [0, pos) 中 c 的个数。
    pub fn insert(&mut self, pos: u64, c: u8) -> u64 {
        debug_assert!(pos <= self.len);
        let ci = c as usize;
        let mut rem = pos;
        let mut rank = 0u64;

        let mut ni = 0;
        while ni + 1 < self.nodes.len() && rem > self.nodes[ni].len {
            rem -= self.nodes[ni].len;
            rank += self.nodes[ni].counts[ci];
            ni += 1;
        }
        let node = &mut self.nodes[ni];

        let mut li = 0;
        while li + 1 < node.leaves.len() && rem > node.leaves[li].len() {
            rem -= node.leaves[li].len();
            rank += node.leaves[li].counts[ci];
            li += 1;
        }
        let leaf = &mut node.leaves[li];
        let off = rem as usize;
        rank += leaf.syms[..off].iter().filter(|&&s| s == c).count() as u64;
        leaf.syms.insert(off, c);
        leaf.counts[ci] += 1;
        node.len += 1;
        node.counts[ci] += 1;
        self.len += 1;
        self.counts[ci] += 1;

        if leaf.syms.len() > LEAF_MAX {
            let right = leaf.syms.split_off(LEAF_MAX / 2);
            let left = std::mem::take(&mut leaf.syms);
            node.leaves[li] = Leaf::from_syms(left);
            node.leaves.insert(li + 1, Leaf::from_syms(right));
        }
        if node.leaves.len() > NODE_MAX {
            let right = node.leaves.split_off(NODE_MAX / 2);
            let left = std::mem::take(&mut node.leaves);
            self.nodes[ni] = Node::from_leaves(left);
            self.nodes.insert(ni + 1, Node::from_leaves(right));
        }
        rank
    }

    /// 展开为平坦序列，并在 primary 处放入哨兵 0。
    pub fn into_bwt(self, primary: u64) -> Result<Vec<u8>> {
        let len = self.len as usize + 1;
        let mut out = Vec::new();
        out.try_reserve_exact(len).map_err(BuildError::exhausted("online BWT", len))?;
        for node in self.nodes {
            for leaf in node.leaves {
                out.extend_from_slice(&leaf.syms);
            }
        }
        out.insert(primary as usize, 0);
        Ok(out)
    }
}

/// 对 pac 的前 n 个碱基（加末尾哨兵）在线构建 BWT，返回 (BWT, 主行)。
pub fn build_bwt_online(pac: &PackedBuffer, n: u64) -> Result<(Vec<u8>, u64)> {
    let mut rope = DynamicBwt::new();
    let mut x = 0u64;
    for i in (0..n).rev() {
        let c = pac.get(i) + 1;
        // LF 映射：1 计入哨兵，再加上所有更小符号的数量
        x = rope.insert(x, c) + 1;
        for s in 1..c {
            x += rope.count(s);
        }
    }
    Ok((rope.into_bwt(x)?, x))
}
