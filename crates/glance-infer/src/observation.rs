/// A single (label, confidence) pair produced by inference.
///
/// Confidence is clamped to `[0.0, 1.0]` at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    label: String,
    confidence: f32,
}

impl Observation {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Confidence in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Confidence as a percentage, the form shown to the user.
    pub fn percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// Observations for one frame, ranked by confidence descending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassificationResult {
    observations: Vec<Observation>,
}

impl ClassificationResult {
    /// Build a result from unordered observations, sorting by
    /// confidence descending. The sort is stable, so equal confidences
    /// keep their original relative order.
    pub fn ranked(mut observations: Vec<Observation>) -> Self {
        observations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Highest-confidence observation, if any.
    pub fn top(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
