pub mod core;
pub mod ensemble;
pub mod evaluation;
pub mod preprocessing;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
