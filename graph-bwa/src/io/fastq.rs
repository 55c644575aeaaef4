use anyhow::{bail, Context, Result};
use std::io::BufRead;

use crate::util::qual::decode_phred33;

/// One four-line FASTQ record; `qual` holds the raw Phred+33 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl FastqRecord {
    /// Decoded Phred scores.
    pub fn phred(&self) -> Vec<u8> {
        decode_phred33(&self.qual)
    }
}

/// Streaming reader for unwrapped FASTQ.
pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    record_no: usize,
    done: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), record_no: 0, done: false }
    }

    fn line(&mut self) -> Result<Option<&str>> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        Ok((n > 0).then(|| self.buf.trim_end()))
    }

    fn read_record(&mut self) -> Result<Option<FastqRecord>> {
        let header = loop {
            match self.line()? {
                None => return Ok(None),
                Some("") => continue,
                Some(h) => break h.to_string(),
            }
        };
        let Some(id) = header.strip_prefix('@') else {
            bail!("header does not start with '@': {}", header);
        };
        let id = id.split_whitespace().next().unwrap_or("").to_string();

        let Some(seq) = self.line()?.map(|s| s.as_bytes().to_vec()) else {
            bail!("unexpected EOF after header of '{}'", id);
        };
        match self.line()? {
            Some(plus) if plus.starts_with('+') => {}
            _ => bail!("missing '+' line in '{}'", id),
        }
        let Some(qual) = self.line()?.map(|s| s.as_bytes().to_vec()) else {
            bail!("missing quality line in '{}'", id);
        };
        if qual.len() != seq.len() {
            bail!("'{}': {} bases but {} qualities", id, seq.len(), qual.len());
        }
        Ok(Some(FastqRecord { id, seq, qual }))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.record_no += 1;
        let res = self
            .read_record()
            .with_context(|| format!("FASTQ record {}", self.record_no));
        if !matches!(res, Ok(Some(_))) {
            self.done = true;
        }
        res.transpose()
    }
}
