pub mod ann;
pub mod builder;
pub mod bundle;
pub mod bwt;
pub mod fm;
pub mod pac;
pub mod rope;
pub mod sa;
pub mod strategy;
