//! Image classification for the glance ecosystem.
//!
//! Defines the `Classifier` trait the pipeline drives, the observation
//! and request types exchanged across it, and an ONNX Runtime backed
//! classifier for ImageNet-style models.

pub mod classifier;
pub mod device;
pub mod error;
pub mod labels;
pub mod modelsource;
pub mod observation;
pub mod onnx;
pub mod request;

pub use classifier::Classifier;
pub use device::Device;
pub use error::ClassifyError;
pub use labels::Labels;
pub use modelsource::ModelSource;
pub use observation::{ClassificationResult, Observation};
pub use onnx::OnnxClassifier;
pub use request::ClassificationRequest;
