use glance_base::log;
use glance_camera::{CameraConfig, FrameSource, V4l2Camera};
use glance_infer::{Device, Labels, ModelSource, OnnxClassifier};
use glance_pipeline::{ChannelSink, ClassificationPipeline};

const USAGE: &str = "usage: live-label <model.onnx> <labels.json> [video-device]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    glance_base::init_stdout_logger();

    let mut args = std::env::args().skip(1);
    let model_path = args.next().ok_or(USAGE)?;
    let labels_path = args.next().ok_or(USAGE)?;
    let device_path = args.next().unwrap_or_else(|| "/dev/video0".to_string());

    log::info!("Live Label");
    log::info!("Model: {}", model_path);

    let labels = Labels::from_json_file(&labels_path)?;
    log::info!("Loaded {} labels", labels.len());

    let classifier = OnnxClassifier::new(
        ModelSource::File(model_path.into()),
        labels,
        Device::Cpu,
    )?;

    let (sink, mut results) = ChannelSink::new();
    let pipeline = ClassificationPipeline::new(Box::new(classifier), Box::new(sink));

    // Render results on their own task, decoupled from capture and inference
    tokio::spawn(async move {
        while let Some(result) = results.recv().await {
            let lines: Vec<String> = result
                .observations()
                .iter()
                .map(|obs| format!("{} {:.1}", obs.label(), obs.percent()))
                .collect();
            println!("----\n{}", lines.join("\n"));
        }
    });

    let config = CameraConfig::default()
        .with_device(device_path)
        .with_width(640)
        .with_height(480);
    let mut camera = V4l2Camera::new(config)?;
    log::info!("Camera opened: 640x480");

    let mut frames: u64 = 0;
    loop {
        let frame = camera.recv().await?;
        pipeline.on_frame(frame, None);
        frames += 1;

        if frames % 300 == 0 {
            let stats = pipeline.stats();
            log::info!(
                "frames: {} accepted: {} dropped: {} failed: {}",
                frames,
                stats.accepted,
                stats.dropped,
                stats.failed
            );
        }
    }
}
