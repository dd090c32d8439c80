use std::fmt::Debug;
use std::hash::Hash;

/// Anything usable as a class label: comparable, hashable, printable for
/// error messages and shareable across worker threads.
pub trait ClassLabel: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> ClassLabel for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}
