//! 2-bit 压缩参考序列（pac）。
//!
//! 位置 p 的碱基存放在第 `p >> 2` 个字节的 `((!p & 3) << 1)` 位上，宽 2 位，
//! A/C/G/T 依次为 0..3。该布局必须与 BWA 的 `_set_pac`/`_get_pac` 逐位一致。

use crate::error::{BuildError, Result};
use crate::util::dna;

/// 首次分配的碱基容量，之后按 2 倍增长。
const INITIAL_CAPACITY: u64 = 0x10000;

#[inline]
fn shift(pos: u64) -> u32 {
    (((!pos) & 3) << 1) as u32
}

/// 可增长的 2-bit 碱基缓冲区。`len` 是碱基数，与字节容量分开记录。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBuffer {
    data: Vec<u8>,
    len: u64,
}

impl PackedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 ACGT 序列直接构建（模糊碱基视为 A），主要用于测试与基准。
    pub fn from_ascii(seq: &[u8]) -> Result<Self> {
        let mut pac = Self::new();
        for &b in seq {
            pac.push(dna::to_nt4(b) & 3)?;
        }
        Ok(pac)
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 当前可容纳的碱基数。
    #[inline]
    pub fn capacity(&self) -> u64 {
        (self.data.len() as u64) << 2
    }

    /// 原始字节，长度为 `ceil(len / 4)`。
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..((self.len + 3) >> 2) as usize]
    }

    #[inline]
    pub fn get(&self, pos: u64) -> u8 {
        debug_assert!(pos < self.len);
        (self.data[(pos >> 2) as usize] >> shift(pos)) & 3
    }

    /// 追加一个 2-bit 碱基；容量用尽时恰好翻倍。
    pub fn push(&mut self, c: u8) -> Result<()> {
        if self.len == self.capacity() {
            let target = (self.capacity() << 1).max(INITIAL_CAPACITY);
            self.grow_to(target)?;
        }
        let pos = self.len;
        self.data[(pos >> 2) as usize] |= (c & 3) << shift(pos);
        self.len += 1;
        Ok(())
    }

    /// 在末尾追加当前全部内容的反向互补，长度变为两倍。
    pub fn append_reverse_complement(&mut self) -> Result<()> {
        let fwd = self.len;
        if fwd == 0 {
            return Ok(());
        }
        let target = (fwd * 2 + 3) / 4 * 4;
        if target > self.capacity() {
            self.grow_to(target)?;
        }
        for l in (0..fwd).rev() {
            let c = 3 - self.get(l);
            self.push(c)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |p| self.get(p))
    }

    /// 解包为 ASCII 序列。
    pub fn unpack(&self) -> Vec<u8> {
        self.iter().map(dna::from_nt4).collect()
    }

    /// 取出 [start, end) 区间并解包为 ASCII。
    pub fn fetch(&self, start: u64, end: u64) -> Vec<u8> {
        (start..end.min(self.len)).map(|p| dna::from_nt4(self.get(p))).collect()
    }

    fn grow_to(&mut self, bases: u64) -> Result<()> {
        let bytes = (bases >> 2) as usize;
        let extra = bytes.saturating_sub(self.data.len());
        self.data
            .try_reserve_exact(extra)
            .map_err(BuildError::exhausted("packed reference", bytes))?;
        // 新区域必须清零：写入依赖按位或
        self.data.resize(bytes, 0);
        Ok(())
    }
}
