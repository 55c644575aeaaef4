/// FM 索引字母表大小：{0:$, 1:A, 2:C, 3:G, 4:T}
pub const SIGMA: usize = 5;

/// ASCII -> 2-bit 编码（A=0, C=1, G=2, T/U=3），其余符号为 4（模糊碱基）
pub const NT4_TABLE: [u8; 256] = {
    let mut t = [4u8; 256];
    t[b'A' as usize] = 0;
    t[b'a' as usize] = 0;
    t[b'C' as usize] = 1;
    t[b'c' as usize] = 1;
    t[b'G' as usize] = 2;
    t[b'g' as usize] = 2;
    t[b'T' as usize] = 3;
    t[b't' as usize] = 3;
    t[b'U' as usize] = 3;
    t[b'u' as usize] = 3;
    t
};

#[inline]
pub fn to_nt4(b: u8) -> u8 {
    NT4_TABLE[b as usize]
}

#[inline]
pub fn from_nt4(c: u8) -> u8 {
    match c {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        3 => b'T',
        _ => b'N',
    }
}

/// 2-bit 编码 -> FM 字母表（为 $ 让出 0）。模糊碱基返回 None。
#[inline]
pub fn to_alphabet(b: u8) -> Option<u8> {
    match to_nt4(b) {
        c @ 0..=3 => Some(c + 1),
        _ => None,
    }
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        _ => b'N',
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
