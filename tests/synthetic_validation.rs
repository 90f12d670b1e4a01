//! Detection on synthetic scenes with known circles.
//!
//! Scenes are described in `tests/data/scenes.json`: rasterized rings plus
//! seeded salt noise. Every ground-truth circle must be found within the
//! tolerances below.

use houghcircles::{
    CircleDetector, DetectConfig, ImageView, LutConfig, LutReference, Roi, StopMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Center tolerance in pixels along each axis.
const POSITION_TOLERANCE_PX: usize = 1;

/// Minimum fraction of the maximum possible vote at a true circle.
const MIN_NORMALIZED_SCORE: f32 = 0.7;

#[derive(Debug, Deserialize)]
struct SceneFile {
    scenes: Vec<Scene>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ReferenceJson {
    Smallest,
    Largest,
}

#[derive(Debug, Deserialize)]
struct LutJson {
    radius_min: usize,
    radius_max: usize,
    radius_inc: usize,
    resolution: usize,
    #[serde(default)]
    dedup: bool,
    #[serde(default)]
    reference: Option<ReferenceJson>,
}

#[derive(Debug, Deserialize)]
struct RoiJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize)]
struct TruthCircle {
    x: usize,
    y: usize,
    r: usize,
}

#[derive(Debug, Deserialize)]
struct Scene {
    name: String,
    width: usize,
    height: usize,
    seed: u64,
    noise_pixels: usize,
    #[serde(default)]
    roi: Option<RoiJson>,
    lut: LutJson,
    circles: Vec<TruthCircle>,
}

fn scenes_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("scenes.json")
}

fn load_scenes() -> Vec<Scene> {
    let text = fs::read_to_string(scenes_path()).expect("read scenes.json");
    let file: SceneFile = serde_json::from_str(&text).expect("parse scenes.json");
    file.scenes
}

fn render(scene: &Scene) -> Vec<u8> {
    let (w, h) = (scene.width, scene.height);
    let mut img = vec![0u8; w * h];
    for c in &scene.circles {
        let steps = 16 * c.r.max(1);
        for step in 0..steps {
            let t = step as f64 * std::f64::consts::TAU / steps as f64;
            let x = (c.x as f64 + c.r as f64 * t.cos()).round();
            let y = (c.y as f64 + c.r as f64 * t.sin()).round();
            if x >= 0.0 && y >= 0.0 && (x as usize) < w && (y as usize) < h {
                img[y as usize * w + x as usize] = 255;
            }
        }
    }
    let mut rng = StdRng::seed_from_u64(scene.seed);
    for _ in 0..scene.noise_pixels {
        let x = rng.random_range(0..w);
        let y = rng.random_range(0..h);
        img[y * w + x] = 255;
    }
    img
}

fn detector(scene: &Scene) -> CircleDetector {
    let reference = match scene.lut.reference {
        Some(ReferenceJson::Smallest) => LutReference::Smallest,
        Some(ReferenceJson::Largest) | None => LutReference::Largest,
    };
    CircleDetector::new(DetectConfig {
        lut: LutConfig {
            radius_min: scene.lut.radius_min,
            radius_max: scene.lut.radius_max,
            radius_inc: scene.lut.radius_inc,
            resolution: scene.lut.resolution,
            dedup: scene.lut.dedup,
            reference,
        },
        stop: StopMode::FixedCount {
            count: scene.circles.len(),
        },
        ..DetectConfig::default()
    })
    .unwrap_or_else(|err| panic!("{}: invalid config: {err}", scene.name))
}

#[test]
fn synthetic_scenes_are_detected() {
    let scenes = load_scenes();
    assert!(!scenes.is_empty());

    for scene in &scenes {
        let img = render(scene);
        let view = ImageView::from_slice(&img, scene.width, scene.height).unwrap();
        let roi = scene
            .roi
            .as_ref()
            .map(|r| Roi::new(r.x, r.y, r.width, r.height));
        let det = detector(scene);
        let found = det.detect(view, roi).unwrap();

        assert_eq!(found.unfilled, 0, "{}: unfilled slots", scene.name);
        assert_eq!(found.circles.len(), scene.circles.len(), "{}", scene.name);

        for truth in &scene.circles {
            let hit = found.circles.iter().find(|c| {
                let (x, y) = match roi {
                    Some(roi) => c.image_center(roi),
                    None => (c.x, c.y),
                };
                x.abs_diff(truth.x) <= POSITION_TOLERANCE_PX
                    && y.abs_diff(truth.y) <= POSITION_TOLERANCE_PX
                    && c.radius.abs_diff(truth.r) <= scene.lut.radius_inc
            });
            let Some(hit) = hit else {
                panic!(
                    "{}: no detection near ({}, {}, r={}), got {:?}",
                    scene.name, truth.x, truth.y, truth.r, found.circles
                );
            };
            let score = hit.normalized_score(found.lut_size);
            assert!(
                score >= MIN_NORMALIZED_SCORE,
                "{}: weak detection {score:.3} at ({}, {})",
                scene.name,
                truth.x,
                truth.y
            );
        }
    }
}
