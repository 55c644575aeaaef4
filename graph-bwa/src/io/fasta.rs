use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One FASTA record. The sequence is uppercased with whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Streaming FASTA reader, one record per `next()`.
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    line_no: usize,
    pending: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: Vec::new(), line_no: 0, pending: None, done: false }
    }

    /// Reads the next line into `self.line`; false at EOF.
    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.line)
            .with_context(|| format!("read error at line {}", self.line_no + 1))?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n > 0)
    }

    fn header_id(&self) -> String {
        let h = String::from_utf8_lossy(&self.line[1..]);
        h.split_whitespace().next().unwrap_or("").to_string()
    }

    fn read_record(&mut self) -> Result<Option<FastaRecord>> {
        let id = match self.pending.take() {
            Some(id) => id,
            None => loop {
                if !self.read_line()? {
                    self.done = true;
                    return Ok(None);
                }
                if self.line.first() == Some(&b'>') {
                    break self.header_id();
                }
                if self.line.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(anyhow!("line {}: sequence data before the first header", self.line_no));
                }
            },
        };

        let mut seq = Vec::new();
        loop {
            if !self.read_line()? {
                self.done = true;
                break;
            }
            if self.line.first() == Some(&b'>') {
                self.pending = Some(self.header_id());
                break;
            }
            seq.extend(self.line.iter().filter(|b| !b.is_ascii_whitespace()).map(u8::to_ascii_uppercase));
        }
        Ok(Some(FastaRecord { id, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.read_record().transpose()
    }
}

/// Reads every record of a FASTA file.
pub fn read_fasta(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    let path = path.as_ref();
    let fh = File::open(path).with_context(|| format!("cannot open FASTA '{}'", path.display()))?;
    FastaReader::new(BufReader::new(fh))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("malformed FASTA '{}'", path.display()))
}
