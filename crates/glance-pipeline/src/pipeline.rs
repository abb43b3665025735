use crate::sink::ResultSink;
use crate::stats::{Counters, PipelineStats};
use glance_base::{log, CameraIntrinsics, Frame};
use glance_infer::{ClassificationRequest, ClassificationResult, Classifier};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

/// Outcome of offering a frame to the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Frame admitted; a request is now in flight.
    Accepted,
    /// A request was already in flight (or the worker is gone); the
    /// frame was discarded without queueing.
    Dropped,
    /// Frame failed validation; discarded before any state change.
    Rejected,
}

struct Shared {
    busy: AtomicBool,
    counters: Counters,
}

/// Resets the busy flag when dropped, so the pipeline returns to idle
/// exactly once per request even if the classifier panics.
struct IdleGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for IdleGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Serializes access to one classification model and load-sheds the
/// rest of the capture stream.
///
/// The classifier is moved onto a dedicated worker thread; the capture
/// side only performs an O(1) admission check and a channel handoff,
/// so `on_frame` never blocks regardless of model latency. At most one
/// request is in flight at any instant.
pub struct ClassificationPipeline {
    shared: Arc<Shared>,
    sender: Option<mpsc::Sender<ClassificationRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl ClassificationPipeline {
    /// Spawn the inference worker and take ownership of the model.
    pub fn new(classifier: Box<dyn Classifier>, sink: Box<dyn ResultSink>) -> Self {
        let shared = Arc::new(Shared {
            busy: AtomicBool::new(false),
            counters: Counters::default(),
        });

        // Capacity 1: the busy flag guarantees at most one outstanding
        // request, the channel only hands it to the worker.
        let (tx, rx) = mpsc::channel(1);

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || worker_loop(classifier, sink, rx, worker_shared));

        Self {
            shared,
            sender: Some(tx),
            worker: Some(worker),
        }
    }

    /// Offer one captured frame, called at the source's native rate.
    ///
    /// Never blocks. A frame arriving while a request is in flight is
    /// dropped immediately; dropping is the designed backpressure
    /// response, not an error.
    pub fn on_frame(&self, frame: Frame, intrinsics: Option<CameraIntrinsics>) -> Admission {
        if let Err(e) = frame.validate() {
            log::debug!("rejecting malformed frame: {}", e);
            self.shared.counters.rejected.fetch_add(1, Ordering::Relaxed);
            return Admission::Rejected;
        }

        // Sole synchronization point: the IDLE -> BUSY transition is a
        // compare-exchange so two capture threads can never both admit
        // a frame. An unguarded boolean check would race.
        if self
            .shared
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.shared.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return Admission::Dropped;
        }

        let mut request = ClassificationRequest::new(frame);
        if let Some(intrinsics) = intrinsics {
            request = request.with_intrinsics(intrinsics);
        }

        let send_result = match self.sender.as_ref() {
            Some(sender) => sender.try_send(request).map_err(|_| ()),
            None => Err(()),
        };

        match send_result {
            Ok(()) => {
                self.shared.counters.accepted.fetch_add(1, Ordering::Relaxed);
                Admission::Accepted
            }
            Err(()) => {
                // Worker gone (engine unavailable): fail closed, do
                // not retain the busy state, keep accepting calls.
                self.shared.busy.store(false, Ordering::Release);
                self.shared.counters.dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("inference worker unavailable, dropping frame");
                Admission::Dropped
            }
        }
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> PipelineStats {
        self.shared.counters.snapshot()
    }
}

impl Drop for ClassificationPipeline {
    fn drop(&mut self) {
        // Close the request channel to stop the worker
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

/// Inference worker: runs one request at a time to completion.
///
/// The flag goes back to false (idle) before the result is delivered,
/// so the next frame can be admitted while the sink renders; the sink
/// contract keeps `present` non-blocking either way.
fn worker_loop(
    mut classifier: Box<dyn Classifier>,
    sink: Box<dyn ResultSink>,
    mut rx: mpsc::Receiver<ClassificationRequest>,
    shared: Arc<Shared>,
) {
    while let Some(request) = rx.blocking_recv() {
        let guard = IdleGuard {
            busy: &shared.busy,
        };
        let outcome = classifier.classify(&request);
        // Frame released here, before delivery; no history is retained
        drop(request);
        drop(guard);

        match outcome {
            Ok(observations) => {
                let result = ClassificationResult::ranked(observations);
                shared.counters.completed.fetch_add(1, Ordering::Relaxed);
                sink.present(result);
            }
            Err(e) => {
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("inference failed, discarding request: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_infer::{ClassifyError, Observation};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicU64;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    struct FakeClassifier {
        calls: Arc<AtomicU64>,
        script: VecDeque<Result<Vec<Observation>, ClassifyError>>,
        gate: Option<std_mpsc::Receiver<()>>,
        panic_on_call: bool,
    }

    impl FakeClassifier {
        fn scripted(
            calls: Arc<AtomicU64>,
            script: Vec<Result<Vec<Observation>, ClassifyError>>,
        ) -> Self {
            Self {
                calls,
                script: script.into(),
                gate: None,
                panic_on_call: false,
            }
        }
    }

    impl Classifier for FakeClassifier {
        fn classify(
            &mut self,
            _request: &ClassificationRequest,
        ) -> Result<Vec<Observation>, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panic_on_call {
                panic!("model crashed");
            }
            if let Some(gate) = &self.gate {
                let _ = gate.recv();
            }
            self.script
                .pop_front()
                .unwrap_or_else(|| Err(ClassifyError::Unavailable("script exhausted".to_string())))
        }
    }

    struct CollectSink {
        tx: std_mpsc::Sender<ClassificationResult>,
    }

    impl ResultSink for CollectSink {
        fn present(&self, result: ClassificationResult) {
            let _ = self.tx.send(result);
        }
    }

    fn frame() -> Frame {
        Frame::rgb8(2, 2, vec![0u8; 12])
    }

    fn wait_idle(pipeline: &ClassificationPipeline) {
        for _ in 0..500 {
            if !pipeline.is_busy() {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("pipeline did not return to idle");
    }

    fn wait_calls(calls: &AtomicU64, expected: u64) {
        for _ in 0..500 {
            if calls.load(Ordering::SeqCst) >= expected {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("classifier was not called {expected} times");
    }

    #[test]
    fn test_result_delivered_ranked_as_percent() {
        let calls = Arc::new(AtomicU64::new(0));
        let (result_tx, result_rx) = std_mpsc::channel();
        let classifier = FakeClassifier::scripted(
            Arc::clone(&calls),
            vec![Ok(vec![
                Observation::new("dog", 0.04),
                Observation::new("cat", 0.91),
            ])],
        );
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);

        let result = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.observations()[0].label(), "cat");
        assert!((result.observations()[0].percent() - 91.0).abs() < 1e-3);
        assert_eq!(result.observations()[1].label(), "dog");
        assert!((result.observations()[1].percent() - 4.0).abs() < 1e-3);

        wait_idle(&pipeline);
        assert_eq!(pipeline.stats().completed, 1);
    }

    #[test]
    fn test_busy_pipeline_drops_frames() {
        let calls = Arc::new(AtomicU64::new(0));
        let (gate_tx, gate_rx) = std_mpsc::channel();
        let (result_tx, _result_rx) = std_mpsc::channel();
        let mut classifier = FakeClassifier::scripted(Arc::clone(&calls), vec![Ok(vec![])]);
        classifier.gate = Some(gate_rx);
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        wait_calls(&calls, 1);

        for _ in 0..4 {
            assert_eq!(pipeline.on_frame(frame(), None), Admission::Dropped);
        }

        // Dropping had no observable side effect beyond the counter
        assert!(pipeline.is_busy());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = pipeline.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.dropped, 4);

        gate_tx.send(()).unwrap();
        wait_idle(&pipeline);
    }

    #[test]
    fn test_at_most_one_in_flight_under_concurrent_frames() {
        let calls = Arc::new(AtomicU64::new(0));
        let (gate_tx, gate_rx) = std_mpsc::channel();
        let (result_tx, _result_rx) = std_mpsc::channel();
        let mut classifier = FakeClassifier::scripted(Arc::clone(&calls), vec![Ok(vec![])]);
        classifier.gate = Some(gate_rx);
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        wait_calls(&calls, 1);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| pipeline.on_frame(frame(), None)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), Admission::Dropped);
            }
        });

        // Exactly zero additional requests were created
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.stats().dropped, 8);

        gate_tx.send(()).unwrap();
        wait_idle(&pipeline);
    }

    #[test]
    fn test_inference_error_discards_and_recovers() {
        let calls = Arc::new(AtomicU64::new(0));
        let (result_tx, result_rx) = std_mpsc::channel();
        let classifier = FakeClassifier::scripted(
            Arc::clone(&calls),
            vec![
                Err(ClassifyError::Session("model failure".to_string())),
                Ok(vec![Observation::new("cat", 0.5)]),
            ],
        );
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        // Failed request: no delivery, back to idle
        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        wait_idle(&pipeline);
        assert!(result_rx.try_recv().is_err());

        // Pipeline still accepts the next frame
        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        let result = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(result.top().unwrap().label(), "cat");

        wait_idle(&pipeline);
        let stats = pipeline.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_malformed_frame_rejected_before_admission() {
        let calls = Arc::new(AtomicU64::new(0));
        let (result_tx, _result_rx) = std_mpsc::channel();
        let classifier = FakeClassifier::scripted(Arc::clone(&calls), vec![Ok(vec![])]);
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        let empty = Frame::rgb8(640, 480, vec![]);
        assert_eq!(pipeline.on_frame(empty, None), Admission::Rejected);
        assert!(!pipeline.is_busy());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.stats().rejected, 1);

        // A valid frame is still admitted afterwards
        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        wait_idle(&pipeline);
    }

    #[test]
    fn test_results_arrive_in_admission_order() {
        let calls = Arc::new(AtomicU64::new(0));
        let (result_tx, result_rx) = std_mpsc::channel();
        let classifier = FakeClassifier::scripted(
            Arc::clone(&calls),
            vec![
                Ok(vec![Observation::new("first", 0.9)]),
                Ok(vec![Observation::new("second", 0.8)]),
            ],
        );
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        wait_idle(&pipeline);
        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);

        let first = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.top().unwrap().label(), "first");
        assert_eq!(second.top().unwrap().label(), "second");
    }

    #[test]
    fn test_worker_death_fails_closed() {
        let calls = Arc::new(AtomicU64::new(0));
        let (result_tx, _result_rx) = std_mpsc::channel();
        let mut classifier = FakeClassifier::scripted(Arc::clone(&calls), vec![]);
        classifier.panic_on_call = true;
        let pipeline = ClassificationPipeline::new(
            Box::new(classifier),
            Box::new(CollectSink { tx: result_tx }),
        );

        // The worker dies on the first request; the idle guard still
        // releases the busy state.
        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        wait_idle(&pipeline);

        // Subsequent frames are dropped, not wedged behind BUSY
        for _ in 0..3 {
            assert_eq!(pipeline.on_frame(frame(), None), Admission::Dropped);
            assert!(!pipeline.is_busy());
        }
    }

    #[test]
    fn test_intrinsics_travel_with_request() {
        struct IntrinsicsProbe {
            seen: std_mpsc::Sender<Option<(f32, f32)>>,
        }

        impl Classifier for IntrinsicsProbe {
            fn classify(
                &mut self,
                request: &ClassificationRequest,
            ) -> Result<Vec<Observation>, ClassifyError> {
                let _ = self.seen.send(request.intrinsics().map(|k| k.focal()));
                Ok(vec![])
            }
        }

        let (seen_tx, seen_rx) = std_mpsc::channel();
        let (result_tx, _result_rx) = std_mpsc::channel();
        let pipeline = ClassificationPipeline::new(
            Box::new(IntrinsicsProbe { seen: seen_tx }),
            Box::new(CollectSink { tx: result_tx }),
        );

        let intrinsics = CameraIntrinsics::new(500.0, 505.0, 320.0, 240.0);
        assert_eq!(
            pipeline.on_frame(frame(), Some(intrinsics)),
            Admission::Accepted
        );
        let seen = seen_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(seen, Some((500.0, 505.0)));

        wait_idle(&pipeline);
        assert_eq!(pipeline.on_frame(frame(), None), Admission::Accepted);
        let seen = seen_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(seen, None);
    }
}
