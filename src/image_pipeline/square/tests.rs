use proptest::prelude::*;

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::raster::RasterImage;
use crate::image_pipeline::square::{
    ConversionPolicy, DEFAULT_FILL_COLOR, SquareMethod, SquareNormalizer, normalize,
    parse_fill_color,
};

/// Deterministic, position-dependent content so misplaced pixels show up.
fn patterned(width: u32, height: u32, seed: u8) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x as u8).wrapping_mul(7).wrapping_add(seed));
            data.push((y as u8).wrapping_mul(13).wrapping_add(seed));
            data.push(((x + y) as u8).wrapping_mul(31));
        }
    }
    RasterImage::from_raw(width, height, data).unwrap()
}

fn all_policies() -> [ConversionPolicy; 3] {
    [
        ConversionPolicy::pad([0, 0, 0]),
        ConversionPolicy::crop(),
        ConversionPolicy::stretch(),
    ]
}

proptest! {
    #[test]
    fn square_input_is_returned_unchanged(side in 1u32..48, seed in any::<u8>()) {
        let image = patterned(side, side, seed);
        for policy in all_policies() {
            let squared = normalize(&image, &policy).unwrap();
            prop_assert_eq!(&squared, &image);
        }
    }

    #[test]
    fn pad_keeps_original_content(width in 1u32..48, height in 1u32..48, seed in any::<u8>()) {
        let image = patterned(width, height, seed);
        let squared = normalize(&image, &ConversionPolicy::pad([1, 2, 3])).unwrap();

        let max_dim = width.max(height);
        prop_assert_eq!(squared.dimensions(), (max_dim, max_dim));

        let x_off = (max_dim - width) / 2;
        let y_off = (max_dim - height) / 2;
        for y in 0..max_dim {
            for x in 0..max_dim {
                let inside = x >= x_off && x < x_off + width && y >= y_off && y < y_off + height;
                let expected = if inside { image.pixel(x - x_off, y - y_off) } else { [1, 2, 3] };
                prop_assert_eq!(squared.pixel(x, y), expected);
            }
        }
    }

    #[test]
    fn crop_uses_shorter_side(width in 1u32..48, height in 1u32..48, seed in any::<u8>()) {
        let image = patterned(width, height, seed);
        let squared = normalize(&image, &ConversionPolicy::crop()).unwrap();

        let min_dim = width.min(height);
        prop_assert_eq!(squared.dimensions(), (min_dim, min_dim));

        let left = (width - min_dim) / 2;
        let top = (height - min_dim) / 2;
        prop_assert_eq!(squared.pixel(0, 0), image.pixel(left, top));
        prop_assert_eq!(
            squared.pixel(min_dim - 1, min_dim - 1),
            image.pixel(left + min_dim - 1, top + min_dim - 1)
        );
    }

    #[test]
    fn stretch_uses_longer_side(width in 1u32..48, height in 1u32..48, seed in any::<u8>()) {
        let image = patterned(width, height, seed);
        let squared = normalize(&image, &ConversionPolicy::stretch()).unwrap();

        let max_dim = width.max(height);
        prop_assert_eq!(squared.dimensions(), (max_dim, max_dim));
        prop_assert!(squared.is_square());
    }
}

#[test]
fn pad_landscape_with_white_background() {
    let image = patterned(400, 300, 5);
    let squared = normalize(&image, &ConversionPolicy::default()).unwrap();

    assert_eq!(squared.dimensions(), (400, 400));
    for y in 0..400 {
        for x in 0..400 {
            if (50..350).contains(&y) {
                assert_eq!(squared.pixel(x, y), image.pixel(x, y - 50));
            } else {
                assert_eq!(squared.pixel(x, y), DEFAULT_FILL_COLOR);
            }
        }
    }
}

#[test]
fn crop_portrait_keeps_center_band() {
    let image = patterned(300, 400, 9);
    let squared = normalize(&image, &ConversionPolicy::crop()).unwrap();

    assert_eq!(squared.dimensions(), (300, 300));
    for y in 0..300 {
        for x in 0..300 {
            assert_eq!(squared.pixel(x, y), image.pixel(x, y + 50));
        }
    }
}

#[test]
fn odd_padding_pixel_trails() {
    // 5 wide, 2 tall: three rows of padding, one above and two below.
    let image = RasterImage::filled(5, 2, [9, 9, 9]).unwrap();
    let squared = normalize(&image, &ConversionPolicy::pad([0, 0, 0])).unwrap();

    let rows: Vec<[u8; 3]> = (0..5).map(|y| squared.pixel(0, y)).collect();
    assert_eq!(rows, vec![[0, 0, 0], [9, 9, 9], [9, 9, 9], [0, 0, 0], [0, 0, 0]]);
}

#[test]
fn odd_crop_margin_trails() {
    // 4 wide, 1 tall: left margin 1, right margin 2.
    let data = vec![10, 10, 10, 20, 20, 20, 30, 30, 30, 40, 40, 40];
    let image = RasterImage::from_raw(4, 1, data).unwrap();
    let squared = normalize(&image, &ConversionPolicy::crop()).unwrap();
    assert_eq!(squared.dimensions(), (1, 1));
    assert_eq!(squared.pixel(0, 0), [20, 20, 20]);
}

#[test]
fn stretch_of_uniform_image_stays_uniform() {
    let image = RasterImage::filled(60, 20, [40, 80, 160]).unwrap();
    let squared = normalize(&image, &ConversionPolicy::stretch()).unwrap();
    assert_eq!(squared.dimensions(), (60, 60));
    let [r, g, b] = squared.pixel(30, 30);
    let near = |value: u8, expected: i32| (value as i32 - expected).abs() <= 1;
    assert!(near(r, 40) && near(g, 80) && near(b, 160));
}

#[test]
fn normalizer_handle_matches_free_function() {
    let image = patterned(7, 3, 1);
    let policy = ConversionPolicy::pad([255, 0, 0]);
    let via_handle = SquareNormalizer::new().normalize(&image, &policy).unwrap();
    assert_eq!(via_handle, normalize(&image, &policy).unwrap());
}

#[test]
fn unknown_method_is_invalid_policy() {
    for method in ["skew", "PAD", "", "crop "] {
        let err = ConversionPolicy::new(method, DEFAULT_FILL_COLOR).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidPolicy(ref m) if m == method));
    }

    let policy = ConversionPolicy::new("stretch", [0, 0, 0]).unwrap();
    assert_eq!(policy.method, SquareMethod::Stretch);
}

#[test]
fn method_round_trips_through_display() {
    for method in [SquareMethod::Pad, SquareMethod::Crop, SquareMethod::Stretch] {
        assert_eq!(method.to_string().parse::<SquareMethod>().unwrap(), method);
    }
}

#[test]
fn default_policy_is_white_pad() {
    let policy = ConversionPolicy::default();
    assert_eq!(policy.method, SquareMethod::Pad);
    assert_eq!(policy.fill_color, [255, 255, 255]);
}

#[test]
fn parses_fill_colors() {
    assert_eq!(parse_fill_color("0,0,0").unwrap(), [0, 0, 0]);
    assert_eq!(parse_fill_color(" 255, 128 ,7 ").unwrap(), [255, 128, 7]);
    assert_eq!(parse_fill_color("#FF8000").unwrap(), [255, 128, 0]);

    for bad in ["256,0,0", "1,2", "#12345", "#GGGGGG", "white"] {
        assert!(matches!(
            parse_fill_color(bad).unwrap_err(),
            ConversionError::InvalidParameter { name: "fill_color", .. }
        ));
    }
}
