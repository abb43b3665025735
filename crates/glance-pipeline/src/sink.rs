use glance_base::log;
use glance_infer::ClassificationResult;
use tokio::sync::mpsc;

/// Destination for classification results.
///
/// `present` is fire-and-forget: it must not block, and any rendering
/// failure is the sink's concern. The pipeline calls it from the
/// inference worker after returning to idle, so a slow sink can never
/// stall the next admission.
pub trait ResultSink: Send {
    fn present(&self, result: ClassificationResult);
}

/// Sink that forwards results over an unbounded channel.
///
/// Decouples rendering from the inference worker: whatever task owns
/// the receiver (typically something UI-affine) consumes results on
/// its own context.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ClassificationResult>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClassificationResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn present(&self, result: ClassificationResult) {
        if self.tx.send(result).is_err() {
            log::debug!("result receiver gone, discarding result");
        }
    }
}
