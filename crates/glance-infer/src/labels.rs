use crate::ClassifyError;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct LabelsFile {
    labels: Vec<String>,
}

/// Class-index to identifier mapping for a classification model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn from_vec(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// Load labels from a JSON file.
    ///
    /// Accepts either a plain array `["tench", "goldfish", ...]` or an
    /// object `{"labels": [...]}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        let contents = std::fs::read_to_string(path.as_ref())?;

        if let Ok(labels) = serde_json::from_str::<Vec<String>>(&contents) {
            return Ok(Self(labels));
        }

        let file: LabelsFile = serde_json::from_str(&contents).map_err(|e| {
            ClassifyError::Io(format!(
                "failed to parse labels file {:?}: {e}",
                path.as_ref()
            ))
        })?;
        Ok(Self(file.labels))
    }

    /// Identifier for a class index.
    ///
    /// Out-of-range indices get a synthetic `class_<idx>` name so a
    /// model with more outputs than labels still produces output.
    pub fn get(&self, idx: usize) -> String {
        self.0
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("class_{idx}"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
