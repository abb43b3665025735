use crate::{
    ClassificationRequest, Classifier, ClassifyError, Device, Labels, ModelSource, Observation,
};
use glance_base::log;
use ndarray::{ArrayD, IxDyn};
use ort::{inputs, session::Session as OrtSession, value::TensorRef};

/// ONNX Runtime backed image classifier.
///
/// Expects an ImageNet-style model: one image input (NCHW f32, values
/// 0..1) and one logit or score vector output. Preprocessing rotates
/// the frame upright, resizes with nearest-neighbor sampling, and
/// scales pixels to 0..1.
pub struct OnnxClassifier {
    session: OrtSession,
    input_name: String,
    output_name: String,
    labels: Labels,
    input_size: (usize, usize),
    top_k: usize,
    apply_softmax: bool,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_size", &self.input_size)
            .field("top_k", &self.top_k)
            .field("apply_softmax", &self.apply_softmax)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load a classification model.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::ModelLoad` if the session cannot be
    /// created or the model has no inputs/outputs, and
    /// `ClassifyError::Unavailable` if the requested device is not
    /// supported in this build.
    pub fn new(model: ModelSource, labels: Labels, device: Device) -> Result<Self, ClassifyError> {
        let mut builder = OrtSession::builder().map_err(|e| {
            ClassifyError::ModelLoad(format!("failed to create session builder: {e}"))
        })?;

        // Map Device to ort execution providers
        builder = match &device {
            Device::Cpu => {
                log::debug!("using CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::ep::ExecutionProvider;
                use ort::execution_providers::CUDAExecutionProvider;
                let ep = CUDAExecutionProvider::default().with_device_id(*device_id);
                let available = ep.is_available().unwrap_or(false);
                log::info!(
                    "CUDA EP requested (device_id={}), available: {}",
                    device_id,
                    available
                );
                builder.with_execution_providers([ep.build()]).map_err(|e| {
                    ClassifyError::Unavailable(format!("CUDA execution provider: {e}"))
                })?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(ClassifyError::Unavailable(format!(
                    "device {device} not supported in this build"
                )));
            }
        };

        let session = match model {
            ModelSource::File(path) => builder.commit_from_file(path).map_err(|e| {
                ClassifyError::ModelLoad(format!("failed to load model from file: {e}"))
            })?,
            ModelSource::Memory(bytes) => builder.commit_from_memory(&bytes).map_err(|e| {
                ClassifyError::ModelLoad(format!("failed to load model from memory: {e}"))
            })?,
        };

        let input_name = session
            .inputs()
            .iter()
            .next()
            .map(|input| input.name().to_string())
            .ok_or_else(|| ClassifyError::ModelLoad("model has no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .iter()
            .next()
            .map(|output| output.name().to_string())
            .ok_or_else(|| ClassifyError::ModelLoad("model has no outputs".to_string()))?;

        Ok(Self {
            session,
            input_name,
            output_name,
            labels,
            input_size: (299, 299),
            top_k: 5,
            apply_softmax: true,
        })
    }

    /// Set the model input size as (height, width). Default 299x299.
    pub fn with_input_size(mut self, height: usize, width: usize) -> Self {
        self.input_size = (height, width);
        self
    }

    /// Set how many top observations to report. Default 5.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Treat model output as probabilities instead of logits,
    /// skipping the softmax.
    pub fn with_raw_scores(mut self) -> Self {
        self.apply_softmax = false;
        self
    }

    /// Convert an upright RGB8 buffer to a NCHW f32 array in 0..1.
    fn to_nchw(&self, rgb: &[u8]) -> Result<ArrayD<f32>, ClassifyError> {
        let (in_h, in_w) = self.input_size;
        let plane = in_h * in_w;
        let mut chw = vec![0f32; 3 * plane];
        for (i, px) in rgb.chunks_exact(3).enumerate() {
            chw[i] = px[0] as f32 / 255.0;
            chw[plane + i] = px[1] as f32 / 255.0;
            chw[2 * plane + i] = px[2] as f32 / 255.0;
        }
        ArrayD::from_shape_vec(IxDyn(&[1, 3, in_h, in_w]), chw)
            .map_err(|e| ClassifyError::Shape(format!("failed to build input array: {e}")))
    }
}

impl Classifier for OnnxClassifier {
    fn classify(
        &mut self,
        request: &ClassificationRequest,
    ) -> Result<Vec<Observation>, ClassifyError> {
        let frame = request.frame();
        frame.validate()?;
        if frame.channels() != 3 {
            return Err(ClassifyError::Shape(format!(
                "expected 3 channels (RGB), got {}",
                frame.channels()
            )));
        }

        let (width, height, upright) = glance_image::orient_rgb8(
            frame.pixels(),
            frame.width(),
            frame.height(),
            frame.orientation(),
        )?;

        let (in_h, in_w) = self.input_size;
        let resized = glance_image::resize_nearest_rgb8(&upright, width, height, in_w, in_h)?;
        let array = self.to_nchw(&resized)?;

        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| ClassifyError::Session(format!("failed to create tensor ref: {e}")))?;

        let input_name = self.input_name.clone();
        let outputs = self
            .session
            .run(inputs![input_name.as_str() => tensor_ref])
            .map_err(|e| ClassifyError::Session(format!("inference failed: {e}")))?;

        let value = &outputs[self.output_name.as_str()];
        let scores = value.try_extract_array::<f32>().map_err(|e| {
            ClassifyError::Session(format!("output '{}' is not f32: {e}", self.output_name))
        })?;

        let mut scores: Vec<f32> = scores.iter().copied().collect();
        if self.apply_softmax {
            softmax(&mut scores);
        }

        Ok(top_k_observations(&scores, &self.labels, self.top_k))
    }
}

/// In-place softmax over raw logits.
pub fn softmax(scores: &mut [f32]) {
    if scores.is_empty() {
        return;
    }
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    if sum > 0.0 {
        for s in scores.iter_mut() {
            *s /= sum;
        }
    }
}

/// Pick the `k` highest-scoring classes as labeled observations.
pub fn top_k_observations(scores: &[f32], labels: &Labels, k: usize) -> Vec<Observation> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    indices
        .into_iter()
        .take(k)
        .map(|idx| Observation::new(labels.get(idx), scores[idx]))
        .collect()
}
