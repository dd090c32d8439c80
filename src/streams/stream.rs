use crate::core::instance_header::InstanceHeader;
use crate::core::instances::LabeledInstance;
use crate::streams::StreamError;

/// Pull-based interface for labeled datasets.
///
/// All returned instances conform to the same, immutable [`InstanceHeader`]
/// for the lifetime of the stream.
pub trait Stream {
    /// Returns the stream header (relation name, attributes, class index).
    fn header(&self) -> &InstanceHeader;

    /// Indicates whether the stream *may* produce more instances.
    ///
    /// If it returns `false`, a subsequent call to [`next_instance`] must
    /// return `None`.
    ///
    /// [`next_instance`]: Stream::next_instance
    fn has_more_instances(&self) -> bool;

    /// Produces the next instance, `None` at the end of the data, or an error
    /// for a record that does not match the header. A stream that reported an
    /// error of the underlying source (not of a single record) ends afterwards.
    fn next_instance(&mut self) -> Option<Result<LabeledInstance, StreamError>>;

    /// Rewinds to the first record. The header does not change.
    fn restart(&mut self) -> Result<(), StreamError>;

    fn instances(&mut self) -> StreamInstances<'_, Self>
    where
        Self: Sized,
    {
        StreamInstances { stream: self }
    }
}

/// Iterator over the remaining instances of a stream.
pub struct StreamInstances<'a, S: ?Sized> {
    stream: &'a mut S,
}

impl<S: Stream + ?Sized> Iterator for StreamInstances<'_, S> {
    type Item = Result<LabeledInstance, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.next_instance()
    }
}
