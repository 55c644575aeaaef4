//! Readers for the edge and read files consumed by the command-line tool.

pub mod fasta;
pub mod fastq;
