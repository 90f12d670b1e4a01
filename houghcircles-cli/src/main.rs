use clap::Parser;
use houghcircles::io::load_gray_image;
use houghcircles::{
    CircleDetector, DetectConfig, FrameDetections, LocalSearchConfig, LutConfig, LutReference,
    OwnedImage, Roi, SearchKind, StopMode,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Hough circle transform CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum ReferenceConfig {
    Smallest,
    #[default]
    Largest,
}

impl From<ReferenceConfig> for LutReference {
    fn from(value: ReferenceConfig) -> Self {
        match value {
            ReferenceConfig::Smallest => LutReference::Smallest,
            ReferenceConfig::Largest => LutReference::Largest,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum StopConfig {
    FixedCount { count: usize },
    ScoreThreshold { ratio: f64, max_circles: usize },
}

impl Default for StopConfig {
    fn default() -> Self {
        StopConfig::FixedCount { count: 1 }
    }
}

impl From<StopConfig> for StopMode {
    fn from(value: StopConfig) -> Self {
        match value {
            StopConfig::FixedCount { count } => StopMode::FixedCount { count },
            StopConfig::ScoreThreshold { ratio, max_circles } => {
                StopMode::ScoreThreshold { ratio, max_circles }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LocalConfigJson {
    enabled: bool,
    search_radius: usize,
    search_band: usize,
    min_tracked: usize,
    loss_ratio: f64,
}

impl Default for LocalConfigJson {
    fn default() -> Self {
        let cfg = LocalSearchConfig::default();
        Self {
            enabled: cfg.enabled,
            search_radius: cfg.search_radius,
            search_band: cfg.search_band,
            min_tracked: cfg.min_tracked,
            loss_ratio: cfg.loss_ratio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    radius_min: usize,
    radius_max: usize,
    radius_inc: usize,
    resolution: usize,
    dedup: bool,
    reference: ReferenceConfig,
    stop: StopConfig,
    suppression_ratio: f64,
    parallel: bool,
    local: LocalConfigJson,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            radius_min: cfg.lut.radius_min,
            radius_max: cfg.lut.radius_max,
            radius_inc: cfg.lut.radius_inc,
            resolution: cfg.lut.resolution,
            dedup: cfg.lut.dedup,
            reference: ReferenceConfig::default(),
            stop: StopConfig::default(),
            suppression_ratio: cfg.suppression_ratio,
            parallel: cfg.parallel,
            local: LocalConfigJson::default(),
        }
    }
}

impl From<DetectConfigJson> for DetectConfig {
    fn from(value: DetectConfigJson) -> Self {
        DetectConfig {
            lut: LutConfig {
                radius_min: value.radius_min,
                radius_max: value.radius_max,
                radius_inc: value.radius_inc,
                resolution: value.resolution,
                dedup: value.dedup,
                reference: value.reference.into(),
            },
            stop: value.stop.into(),
            suppression_ratio: value.suppression_ratio,
            local: LocalSearchConfig {
                enabled: value.local.enabled,
                search_radius: value.local.search_radius,
                search_band: value.local.search_band,
                min_tracked: value.local.min_tracked,
                loss_ratio: value.local.loss_ratio,
            },
            parallel: value.parallel,
            keep_volume: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct RoiJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Config {
    frames: Vec<String>,
    roi: Option<RoiJson>,
    output_path: Option<String>,
    /// Directory for raw per-frame vote volumes; `None` skips them.
    volume_dir: Option<String>,
    detect: DetectConfigJson,
}

#[derive(Debug, Serialize)]
struct CircleRecord {
    id: Option<u64>,
    x: usize,
    y: usize,
    radius: usize,
    score: u32,
    normalized_score: f32,
}

/// Raw `u8` volume: `depth` layers of `height` rows of `width` bytes.
#[derive(Debug, Serialize)]
struct VolumeRecord {
    path: String,
    width: usize,
    height: usize,
    depth: usize,
    max_votes: u32,
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: usize,
    path: String,
    search: &'static str,
    unfilled: usize,
    circles: Vec<CircleRecord>,
    volume: Option<VolumeRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    lut_size: usize,
    frames: Vec<FrameRecord>,
}

fn write_volume(
    dir: &Path,
    frame: usize,
    det: &FrameDetections,
) -> std::io::Result<Option<VolumeRecord>> {
    let Some(volume) = det.volume.as_ref() else {
        return Ok(None);
    };
    let path = dir.join(format!("frame_{frame:04}.raw"));
    fs::write(&path, volume.as_slice())?;
    Ok(Some(VolumeRecord {
        path: path.display().to_string(),
        width: volume.width(),
        height: volume.height(),
        depth: volume.depth(),
        max_votes: volume.max_votes(),
    }))
}

fn frame_record(
    frame: usize,
    path: &str,
    roi: Roi,
    det: &FrameDetections,
    volume: Option<VolumeRecord>,
) -> FrameRecord {
    let search = match det.kind {
        SearchKind::Full => "full",
        SearchKind::Local => "local",
        SearchKind::Mixed => "mixed",
    };
    let circles = det
        .circles
        .iter()
        .map(|c| {
            let (x, y) = c.image_center(roi);
            CircleRecord {
                id: c.id,
                x,
                y,
                radius: c.radius,
                score: c.score,
                normalized_score: c.normalized_score(det.lut_size),
            }
        })
        .collect();
    FrameRecord {
        frame,
        path: path.to_owned(),
        search,
        unfilled: det.unfilled,
        circles,
        volume,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("houghcircles=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frames.is_empty() {
        return Err("frames must list at least one image path".into());
    }

    let mut detect_cfg: DetectConfig = config.detect.into();
    detect_cfg.keep_volume = config.volume_dir.is_some();
    let detector = CircleDetector::new(detect_cfg)?;
    if let Some(dir) = &config.volume_dir {
        fs::create_dir_all(dir)?;
    }
    let images = config
        .frames
        .iter()
        .map(load_gray_image)
        .collect::<Result<Vec<OwnedImage<u8>>, _>>()?;
    let roi = config
        .roi
        .map(|r| Roi::new(r.x, r.y, r.width, r.height));
    let full_roi = roi.unwrap_or_else(|| Roi::full(images[0].width(), images[0].height()));

    let views: Vec<_> = images.iter().map(|img| img.view()).collect();
    let results = detector.detect_stack(&views, roi)?;

    let mut frames = Vec::with_capacity(results.len());
    for (idx, (det, path)) in results.iter().zip(&config.frames).enumerate() {
        tracing::info!(frame = idx, circles = det.circles.len(), "frame processed");
        let volume = match &config.volume_dir {
            Some(dir) => write_volume(Path::new(dir), idx, det)?,
            None => None,
        };
        frames.push(frame_record(idx, path, full_roi, det, volume));
    }
    let output = Output {
        lut_size: detector.lut().lut_size(),
        frames,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
