/// 根据后缀数组构建 BWT，同时返回主行（SA 值为 0 的行，其 BWT 符号为 `$`）。
/// text 为数值化字母表（0 为末尾哨兵），sa 为后缀数组。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> (Vec<u8>, u64) {
    let n = text.len();
    let mut primary = 0u64;
    let bwt: Vec<u8> = sa
        .iter()
        .enumerate()
        .map(|(row, &p)| {
            let i = p as usize;
            if i == 0 {
                primary = row as u64;
                text[n - 1]
            } else {
                text[i - 1]
            }
        })
        .collect();
    (bwt, primary)
}
