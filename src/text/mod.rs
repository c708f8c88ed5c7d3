//! Pure text analysis and the template generators built on it. Nothing in
//! here does I/O.

pub mod description;
pub mod hashtags;
pub mod tags;
pub mod titles;
pub mod tokenizer;

pub use tokenizer::{density, density_all, density_report, rank_by_frequency, tokenize};
