pub mod codon;
pub mod dna;
pub mod qual;
