use houghcircles::lowlevel::{accumulate, EdgeMap};
use houghcircles::{
    CircleDetector, DetectConfig, ImageView, LocalSearchConfig, LookupTable, LutConfig, StopMode,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_scene(width: usize, height: usize, shift: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height];
    let rings = [(120.0, 110.0, 40.0), (330.0, 150.0, 64.0), (230.0, 360.0, 90.0)];
    for &(cx, cy, r) in &rings {
        let cx = cx + shift as f64;
        for step in 0..2048 {
            let t = step as f64 * std::f64::consts::TAU / 2048.0;
            let x = (cx + r * t.cos()).round() as usize;
            let y = (cy + r * t.sin()).round() as usize;
            data[y * width + x] = 255;
        }
    }
    // Sparse texture standing in for edge noise.
    for y in (0..height).step_by(7) {
        for x in (0..width).step_by(11) {
            if (x * 13 ^ y * 7) & 0x1F == 0 {
                data[y * width + x] = 255;
            }
        }
    }
    data
}

fn lut_config() -> LutConfig {
    LutConfig {
        radius_min: 30,
        radius_max: 100,
        radius_inc: 2,
        resolution: 360,
        dedup: true,
        ..LutConfig::default()
    }
}

fn bench_transform(c: &mut Criterion) {
    let (width, height) = (512, 512);
    let image = make_scene(width, height, 0);
    let view = ImageView::from_slice(&image, width, height).unwrap();
    let edges = EdgeMap::from_view(view).unwrap();
    let lut = LookupTable::build(&lut_config()).unwrap();

    c.bench_function("lut_build", |b| {
        b.iter(|| black_box(LookupTable::build(&lut_config()).unwrap()));
    });

    c.bench_function("accumulate_sequential", |b| {
        b.iter(|| black_box(accumulate(&edges, &lut, false).unwrap()));
    });

    #[cfg(feature = "rayon")]
    c.bench_function("accumulate_parallel", |b| {
        b.iter(|| black_box(accumulate(&edges, &lut, true).unwrap()));
    });

    let detector = CircleDetector::new(DetectConfig {
        lut: lut_config(),
        stop: StopMode::FixedCount { count: 3 },
        parallel: false,
        ..DetectConfig::default()
    })
    .unwrap();
    c.bench_function("detect_three_circles", |b| {
        b.iter(|| black_box(detector.detect(view, None).unwrap()));
    });
}

fn bench_tracking(c: &mut Criterion) {
    let (width, height) = (512, 512);
    let frames: Vec<Vec<u8>> = (0..8).map(|i| make_scene(width, height, i)).collect();
    let views: Vec<_> = frames
        .iter()
        .map(|img| ImageView::from_slice(img, width, height).unwrap())
        .collect();

    for (name, enabled) in [("stack_full_every_frame", false), ("stack_local_search", true)] {
        let detector = CircleDetector::new(DetectConfig {
            lut: lut_config(),
            stop: StopMode::FixedCount { count: 3 },
            local: LocalSearchConfig {
                enabled,
                search_radius: 6,
                search_band: 4,
                min_tracked: 3,
                ..LocalSearchConfig::default()
            },
            ..DetectConfig::default()
        })
        .unwrap();
        c.bench_function(name, |b| {
            b.iter(|| black_box(detector.detect_stack(&views, None).unwrap()));
        });
    }
}

criterion_group!(benches, bench_transform, bench_tracking);
criterion_main!(benches);
