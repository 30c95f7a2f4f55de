use std::io::Write;

use image::{Rgb, RgbImage};
use pill_counter::{
    BoundingBox, CountingPipeline, DetectionSet, DetectionSetBuilder, DetectionSource, FrameCount,
    FrameCounter, FrameSink, FrameSource, ImageDirSink, ImageDirSource, OverlapThresholds, Region,
    ReplayDetector, center_of, overlaps,
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

struct FailingDetector;

impl DetectionSource for FailingDetector {
    type Error = String;

    fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<DetectionSet, String> {
        Err("inference crashed".to_string())
    }
}

struct FixedDetector(DetectionSet);

impl DetectionSource for FixedDetector {
    type Error = std::convert::Infallible;

    fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<DetectionSet, Self::Error> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_reference_values() {
    assert_eq!(Region::centered(640, 480, 500).coords(), [70, -10, 570, 490]);
    let large: &[f32] = &[100.0, 100.0, 200.0, 200.0];
    let small: &[f32] = &[150.0, 150.0, 160.0, 160.0];
    assert!(overlaps(Some(large), Some(small), 90.0, 90.0));

    let a: &[f32] = &[0.0, 0.0, 10.0, 10.0];
    let b: &[f32] = &[1000.0, 1000.0, 1010.0, 1010.0];
    assert!(!overlaps(Some(a), Some(b), 10.0, 10.0));

    assert!(center_of(None).is_err());
    assert_eq!(center_of(Some(small)).unwrap().x, 155);
}

#[test]
fn test_count_matches_overlap_filter() {
    let region = Region::centered(640, 480, 500);
    let region_box = region.bbox().to_xyxy();
    let counter = FrameCounter::with_default_thresholds(region);

    let mut builder = DetectionSetBuilder::new();
    for i in 0..40 {
        let x = i as f32 * 17.0 - 30.0;
        let y = i as f32 * 13.0 - 40.0;
        builder = builder.xyxy(x, y, x + 25.0, y + 25.0, 0.9, 0.0);
    }
    let mut detections = builder.build();
    detections.bbox.push(vec![300.0, 300.0]);

    let expected = detections
        .boxes()
        .filter(|raw| overlaps(Some(*raw), Some(&region_box[..]), 10.0, 10.0))
        .count();

    let mut frame = RgbImage::from_pixel(640, 480, WHITE);
    let count = counter.count(&mut frame, &detections);
    assert_eq!(count.total_count, expected);
    assert!(count.total_count <= detections.len());
    assert!(count.total_count > 0);
}

#[test]
fn test_failing_detector_keeps_stream_alive() {
    let mut pipeline = CountingPipeline::for_frame_size(
        FailingDetector,
        640,
        480,
        500,
        OverlapThresholds::default(),
    );
    for _ in 0..3 {
        let mut frame = RgbImage::from_pixel(640, 480, WHITE);
        assert_eq!(pipeline.process_frame(&mut frame), FrameCount::default());
    }
}

#[test]
fn test_empty_detections_count_zero() {
    let mut pipeline = CountingPipeline::new(
        FixedDetector(DetectionSet::new()),
        Region::centered(640, 480, 500),
        OverlapThresholds::default(),
    );
    let mut frame = RgbImage::from_pixel(640, 480, WHITE);
    assert_eq!(pipeline.process_frame(&mut frame).total_count, 0);
}

#[test]
fn test_region_larger_than_frame_still_counts() {
    let region = Region::centered(200, 100, 500);
    let counter = FrameCounter::with_default_thresholds(region);
    let detections = DetectionSetBuilder::new()
        .push(BoundingBox::new(10.0, 10.0, 30.0, 30.0), 0.9, 0.0)
        .build();
    let mut frame = RgbImage::from_pixel(200, 100, WHITE);
    assert_eq!(counter.count(&mut frame, &detections).total_count, 1);
}

#[test]
fn test_end_to_end_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join("frames");
    std::fs::create_dir(&frames).unwrap();
    for i in 0..3 {
        RgbImage::from_pixel(640, 480, WHITE)
            .save(frames.join(format!("{i:03}.png")))
            .unwrap();
    }

    let recording = dir.path().join("detections.jsonl");
    let mut file = std::fs::File::create(&recording).unwrap();
    writeln!(
        file,
        r#"{{"bbox": [[100, 100, 130, 130], [300, 200, 330, 230], [0, 0, 20, 20]], "cls_id": [0, 0, 0], "conf": [0.9, 0.85, 0.8]}}"#
    )
    .unwrap();
    writeln!(file, "null").unwrap();
    writeln!(file, r#"{{"bbox": [[300, 200, 330]]}}"#).unwrap();
    drop(file);

    let mut source = ImageDirSource::open(&frames).unwrap();
    let mut sink = ImageDirSink::create(dir.path().join("out")).unwrap();
    let detector = ReplayDetector::open(&recording).unwrap();
    let mut pipeline = CountingPipeline::for_frame_size(
        detector,
        640,
        480,
        500,
        OverlapThresholds::default(),
    );

    let mut counts = Vec::new();
    let mut index = 0;
    while let Some(mut frame) = source.next_frame().unwrap() {
        counts.push(pipeline.process_frame(&mut frame).total_count);
        sink.write_frame(index, &frame).unwrap();
        index += 1;
    }

    assert_eq!(counts, vec![2, 0, 0]);
    assert!(dir.path().join("out").join("frame_000002.png").is_file());
    // A fourth frame has no recording and still counts zero.
    let mut extra = RgbImage::from_pixel(640, 480, WHITE);
    assert_eq!(pipeline.process_frame(&mut extra).total_count, 0);
}
