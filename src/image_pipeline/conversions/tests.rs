use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::conversions::{BatchConverter, BatchOptions, square_file};
use crate::image_pipeline::encode::{EncodeOptions, OutputFormat, encode_to_file};
use crate::image_pipeline::raster::{RasterImage, RasterLoader};
use crate::image_pipeline::raw::RawDecodeParameters;
use crate::image_pipeline::raw::tests::{
    MOCK_HEIGHT, MOCK_WIDTH, MockReader, mock_decoder, write_mock_raw,
};
use crate::image_pipeline::square::ConversionPolicy;
use crate::logger::LogHandle;

fn converter() -> BatchConverter<MockReader> {
    BatchConverter::with_decoder(mock_decoder()).with_log(LogHandle::disabled())
}

fn write_raster(path: &Path, width: u32, height: u32) {
    let image = RasterImage::filled(width, height, [10, 120, 230]).unwrap();
    let format = OutputFormat::from_path(path).unwrap();
    encode_to_file(&image, path, format, &EncodeOptions::default()).unwrap();
}

#[test]
fn test_empty_directory_yields_zero_result() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), b"not a raw file").unwrap();

    let result = converter()
        .convert_directory(
            dir.path(),
            None,
            &ConversionPolicy::crop(),
            &RawDecodeParameters::default(),
        )
        .unwrap();

    assert_eq!(result.total_found, 0);
    assert_eq!(result.converted, 0);
    assert_eq!(result.failed, 0);
    assert!(result.outputs.is_empty());
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let result = converter().convert_directory(
        &dir.path().join("absent"),
        None,
        &ConversionPolicy::crop(),
        &RawDecodeParameters::default(),
    );

    assert!(matches!(result, Err(ConversionError::DirectoryNotFound(_))));
}

#[test]
fn test_convert_directory_writes_developed_and_squared_outputs() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    write_mock_raw(&dir.path().join("b.dng"));
    write_mock_raw(&dir.path().join("A.DNG"));
    fs::write(dir.path().join("photo.jpg"), b"ignored").unwrap();

    let result = converter()
        .convert_directory(
            dir.path(),
            Some(&out),
            &ConversionPolicy::crop(),
            &RawDecodeParameters::default(),
        )
        .unwrap();

    assert_eq!(result.total_found, 2);
    assert_eq!(result.converted, 2);
    assert_eq!(result.failed, 0);
    assert_eq!(result.outputs, vec![out.join("A.png"), out.join("b.png")]);

    let loader = RasterLoader::new();
    let developed = loader.load(out.join("b_raw.png")).unwrap();
    assert_eq!(developed.dimensions(), (MOCK_WIDTH as u32, MOCK_HEIGHT as u32));
    let squared = loader.load(out.join("b.png")).unwrap();
    let side = MOCK_WIDTH.min(MOCK_HEIGHT) as u32;
    assert_eq!(squared.dimensions(), (side, side));
}

#[test]
fn test_output_directory_defaults_to_input() {
    let dir = TempDir::new().unwrap();
    write_mock_raw(&dir.path().join("shot.dng"));

    let result = converter()
        .convert_directory(
            dir.path(),
            None,
            &ConversionPolicy::pad([0, 0, 0]),
            &RawDecodeParameters::default(),
        )
        .unwrap();

    assert_eq!(result.outputs, vec![dir.path().join("shot.png")]);
    assert!(dir.path().join("shot_raw.png").exists());
    let squared = RasterLoader::new().load(dir.path().join("shot.png")).unwrap();
    let side = MOCK_WIDTH.max(MOCK_HEIGHT) as u32;
    assert_eq!(squared.dimensions(), (side, side));
}

#[test]
fn test_corrupt_file_aborts_batch() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    write_mock_raw(&dir.path().join("a.dng"));
    fs::write(dir.path().join("b.dng"), b"corrupt").unwrap();
    write_mock_raw(&dir.path().join("c.dng"));

    let result = converter().convert_directory(
        dir.path(),
        Some(&out),
        &ConversionPolicy::crop(),
        &RawDecodeParameters::default(),
    );

    match result {
        Err(ConversionError::ConversionFailure { path, .. }) => {
            assert_eq!(path, dir.path().join("b.dng"))
        }
        other => panic!("expected conversion failure, got {:?}", other),
    }
    assert!(out.join("a.png").exists());
    assert!(!out.join("b_raw.png").exists());
    assert!(!out.join("c_raw.png").exists());
    assert!(!out.join("c.png").exists());
}

#[test]
fn test_invalid_parameters_leave_no_side_effects() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    write_mock_raw(&dir.path().join("a.dng"));

    let params = RawDecodeParameters::builder().compression_level(10).build();
    let result =
        converter().convert_directory(dir.path(), Some(&out), &ConversionPolicy::crop(), &params);

    assert!(matches!(result, Err(ConversionError::InvalidParameter { .. })));
    assert!(!out.exists());
}

#[test]
fn test_custom_options_select_tiff_and_extensions() {
    let dir = TempDir::new().unwrap();
    write_mock_raw(&dir.path().join("frame.nef"));
    write_mock_raw(&dir.path().join("skipped.dng"));
    let options = BatchOptions::builder()
        .raw_extensions(["nef"])
        .output_format(OutputFormat::Tiff)
        .intermediate_suffix("_developed")
        .build();

    let result = converter()
        .with_options(options)
        .convert_directory(
            dir.path(),
            None,
            &ConversionPolicy::stretch(),
            &RawDecodeParameters::default(),
        )
        .unwrap();

    assert_eq!(result.total_found, 1);
    assert_eq!(result.outputs, vec![dir.path().join("frame.tiff")]);
    assert!(dir.path().join("frame_developed.tiff").exists());
    assert!(!dir.path().join("skipped.tiff").exists());
}

#[test]
fn test_square_directory_continues_past_failures() {
    let dir = TempDir::new().unwrap();
    write_raster(&dir.path().join("wide.png"), 40, 20);
    write_raster(&dir.path().join("tall.tiff"), 10, 30);
    fs::write(dir.path().join("broken.png"), b"not really a png").unwrap();
    fs::write(dir.path().join("readme.md"), b"skip me").unwrap();

    let result = converter()
        .square_directory(dir.path(), None, &ConversionPolicy::pad([255, 255, 255]), 6)
        .unwrap();

    let out = dir.path().join("square_outputs");
    assert_eq!(result.total_found, 3);
    assert_eq!(result.converted, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failures[0].path, dir.path().join("broken.png"));
    assert_eq!(result.outputs, vec![out.join("tall_pad.png"), out.join("wide_pad.png")]);

    let wide = RasterLoader::new().load(out.join("wide_pad.png")).unwrap();
    assert_eq!(wide.dimensions(), (40, 40));
    assert_eq!(wide.pixel(0, 0), [255, 255, 255]);
    assert_eq!(wide.pixel(0, 10), [10, 120, 230]);
}

#[test]
fn test_square_directory_reports_total_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.jpg"), b"garbage").unwrap();

    let result = converter()
        .square_directory(dir.path(), None, &ConversionPolicy::crop(), 6)
        .unwrap();

    assert!(result.all_failed());
}

#[test]
fn test_square_directory_validates_level_first() {
    let dir = TempDir::new().unwrap();
    write_raster(&dir.path().join("wide.png"), 40, 20);

    let result = converter().square_directory(dir.path(), None, &ConversionPolicy::crop(), -1);

    assert!(matches!(result, Err(ConversionError::InvalidParameter { .. })));
    assert!(!dir.path().join("square_outputs").exists());
}

#[test]
fn test_square_file_default_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("banner.png");
    write_raster(&input, 30, 12);

    let output = square_file(&input, None, &ConversionPolicy::crop(), 9).unwrap();

    assert_eq!(output, dir.path().join("banner_crop.png"));
    let squared = RasterLoader::new().load(&output).unwrap();
    assert_eq!(squared.dimensions(), (12, 12));
}

#[test]
fn test_square_file_missing_input() {
    let dir = TempDir::new().unwrap();
    let result = square_file(dir.path().join("absent.png"), None, &ConversionPolicy::default(), 6);

    assert!(matches!(result, Err(ConversionError::FileNotFound(_))));
}
