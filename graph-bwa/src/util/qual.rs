//! Phred quality helpers used when preparing reads for alignment.

use std::ops::Range;

/// Qualities at or below this value carry no information.
const MIN_INFORMATIVE_QUALITY: u8 = 3;

/// Probability that a base call is correct, indexed by raw Phred score.
///
/// Built once and shared by reference; there is no lazily filled global cache.
#[derive(Debug, Clone)]
pub struct QualityTable {
    prob: [f64; 256],
}

impl QualityTable {
    pub fn new() -> Self {
        let mut prob = [0.25f64; 256];
        for (q, p) in prob.iter_mut().enumerate().skip(MIN_INFORMATIVE_QUALITY as usize) {
            *p = 1.0 - 10f64.powf(-(q as f64) / 10.0);
        }
        Self { prob }
    }

    #[inline]
    pub fn correct_probability(&self, qual: u8) -> f64 {
        self.prob[qual as usize]
    }

    /// Probability that every base in `quals` is called correctly.
    pub fn kmer_probability(&self, quals: &[u8]) -> f64 {
        quals.iter().map(|&q| self.correct_probability(q)).product()
    }
}

impl Default for QualityTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the range between the first and the last base whose quality is at
/// least `threshold`. Empty when no base qualifies.
pub fn trim_bad_quality(quals: &[u8], threshold: u8) -> Range<usize> {
    let start = quals.iter().position(|&q| q >= threshold).unwrap_or(quals.len());
    let end = quals[start..]
        .iter()
        .rposition(|&q| q >= threshold)
        .map_or(start, |p| start + p + 1);
    start..end
}

/// Decodes a Phred+33 quality string into raw scores.
pub fn decode_phred33(ascii: &[u8]) -> Vec<u8> {
    ascii.iter().map(|&c| c.saturating_sub(33)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_qualities_are_uninformative() {
        let t = QualityTable::new();
        assert_eq!(t.correct_probability(0), 0.25);
        assert_eq!(t.correct_probability(2), 0.25);
        assert!((t.correct_probability(10) - 0.9).abs() < 1e-12);
        assert!((t.correct_probability(20) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn kmer_probability_multiplies() {
        let t = QualityTable::new();
        let p = t.kmer_probability(&[10, 10]);
        assert!((p - 0.81).abs() < 1e-12);
        assert_eq!(t.kmer_probability(&[]), 1.0);
    }

    #[test]
    fn trim_cuts_both_ends() {
        assert_eq!(trim_bad_quality(&[0, 1, 30, 2, 30, 1], 2), 2..5);
        assert_eq!(trim_bad_quality(&[30, 30], 2), 0..2);
        assert_eq!(trim_bad_quality(&[0, 1, 1], 2), 3..3);
        assert_eq!(trim_bad_quality(&[], 2), 0..0);
    }

    #[test]
    fn phred33_decoding() {
        assert_eq!(decode_phred33(b"!+5I"), vec![0, 10, 20, 40]);
    }
}
