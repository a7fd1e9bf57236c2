use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma};

use ballsight::{
    BallDetector, CameraExtrinsics, CameraIntrinsics, CameraModel, ColorMap, DetectBallsConfig,
    FieldGeometry, RadialTangentialDistortion, Region,
};

fn overhead_camera() -> CameraModel {
    CameraModel {
        intrinsics: CameraIntrinsics {
            fx: 900.0,
            fy: 900.0,
            cx: 320.0,
            cy: 240.0,
        },
        distortion: RadialTangentialDistortion::default(),
        extrinsics: CameraExtrinsics::default(),
    }
}

/// Field-color frame with orange blobs at a grid of candidate sites.
fn synthetic_frame(regions: &[Region]) -> GrayImage {
    let mut img = GrayImage::from_pixel(640, 480, Luma([5]));
    for r in regions {
        for y in r.y1..=r.y2 {
            for x in r.x1..=r.x2 {
                img.put_pixel(x as u32, y as u32, Luma([1]));
            }
        }
    }
    img
}

fn candidate_grid(n: usize) -> Vec<Region> {
    (0..n)
        .map(|i| {
            let x1 = 20 + ((i * 53) % 580) as i32;
            let y1 = 20 + ((i * 37) % 420) as i32;
            let side = 5 + (i % 3) as i32;
            Region {
                x1,
                y1,
                x2: x1 + side - 1,
                y2: y1 + side - 1,
                cen_x: x1 as f64 + 0.5 * (side - 1) as f64,
                cen_y: y1 as f64 + 0.5 * (side - 1) as f64,
                area: (side * side) as u32,
            }
        })
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let camera = overhead_camera();
    let field = FieldGeometry::default();

    for n in [8usize, 64] {
        let regions = candidate_grid(n);
        let frame = synthetic_frame(&regions);
        let mut detector = BallDetector::new(DetectBallsConfig::default(), ColorMap::default());

        c.bench_function(&format!("detect_{n}_candidates"), |b| {
            b.iter(|| {
                let report = detector
                    .detect(black_box(&frame), black_box(&regions), &camera, &field)
                    .expect("detection succeeds");
                black_box(report)
            })
        });
    }
}

criterion_group!(scoring, bench_detect);
criterion_main!(scoring);
