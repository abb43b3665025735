use crate::{ClassificationRequest, ClassifyError, Observation};

/// One loaded classification model.
///
/// `classify` is blocking and potentially slow (tens to hundreds of
/// milliseconds). It takes `&mut self` because model sessions are not
/// reentrant: exactly one call may be in flight at a time, and the
/// caller is responsible for serializing access.
pub trait Classifier: Send {
    /// Run the model on one request and return unordered observations.
    fn classify(
        &mut self,
        request: &ClassificationRequest,
    ) -> Result<Vec<Observation>, ClassifyError>;
}
