//! Preparation of the ROAD CAN bus captures into labeled tables.
//!
//! None of this is needed by the ensemble itself; it produces the complete,
//! schema-consistent, label-valid tables the ensemble is evaluated on.

pub mod capture;
pub mod csv_tools;
mod error;
pub mod labels;
pub mod road_log;

pub use error::{CaptureError, PreprocessError};
