use image::ImageReader;
use std::error::Error;
use std::path::Path;

use ballsight::{BallDetector, CameraModel, ColorMap, DetectBallsConfig, FieldGeometry, Region};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <segmented.png> <regions.json> <camera.json> [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let segmented = ImageReader::open(&args[1])?.decode()?.to_luma8();
    let regions: Vec<Region> = serde_json::from_str(&std::fs::read_to_string(&args[2])?)?;
    let camera = CameraModel::from_json_file(Path::new(&args[3]))?;

    let mut detector = BallDetector::new(DetectBallsConfig::default(), ColorMap::default());
    let report = detector.detect(&segmented, &regions, &camera, &FieldGeometry::default())?;

    if report.ball.present {
        println!(
            "Ball at ({:.0}, {:.0}) mm with confidence {:.2} ({} candidates scored).",
            report.ball.field_xy[0],
            report.ball.field_xy[1],
            report.ball.confidence,
            report.n_candidates
        );
    } else {
        println!(
            "No acceptable ball candidate ({} scored).",
            report.n_candidates
        );
    }

    if let Some(out_path) = args.get(4) {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
