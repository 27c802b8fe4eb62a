use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use rawsquare_rs::image_pipeline::encode::{EncodeOptions, OutputFormat, RasterWriter, writer_for};
use rawsquare_rs::image_pipeline::{ConversionPolicy, RasterImage, normalize};

fn generate_mock_raster(width: u32, height: u32) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let value = ((x + y) % 256) as u8;
            data.push(value);
            data.push(value.wrapping_mul(3));
            data.push(255 - value);
        }
    }
    RasterImage::from_raw(width, height, data).unwrap()
}

fn benchmark_square_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("square_methods");
    let image = generate_mock_raster(1200, 800);

    let policies = vec![
        (ConversionPolicy::pad([255, 255, 255]), "pad"),
        (ConversionPolicy::crop(), "crop"),
        (ConversionPolicy::stretch(), "stretch"),
    ];

    for (policy, label) in policies {
        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &image,
            |b, image| {
                b.iter(|| normalize(black_box(image), &policy).unwrap());
            },
        );
    }

    group.finish();
}

fn benchmark_encode_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_levels");
    let image = generate_mock_raster(500, 500);

    for format in [OutputFormat::Png, OutputFormat::Tiff] {
        for level in [0, 6, 9] {
            let options = EncodeOptions::new(level).unwrap();
            let writer = writer_for(format);
            group.bench_with_input(
                BenchmarkId::new(format.extension(), level),
                &image,
                |b, image| {
                    b.iter(|| {
                        let mut output = Vec::new();
                        writer.write_raster(black_box(image), &mut output, &options).unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_square_methods, benchmark_encode_levels);
criterion_main!(benches);
