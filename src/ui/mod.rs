//! Interactive and file-driven selection of the preprocessing and scoring
//! tasks run by the `lccde` binary.

pub mod cli;
pub mod types;
