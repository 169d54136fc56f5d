//! End-to-end batch runs with the real backend.
//!
//! Inputs are synthetic product shots (dark block on a white sweep) built in
//! memory; outputs are decoded again and inspected pixel by pixel.

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use prodshot::batch;
use prodshot::config::{
    self, BackgroundMode, BackgroundSettings, CompressionLevel, CompressionSettings,
    FileNamingSettings, OutputFormat, ProcessingSettings, ResizeMode, ResizePreset,
    ResizeSettings,
};
use prodshot::types::{BatchResult, ImageBlob};
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DARK: Rgb<u8> = Rgb([30, 30, 30]);

fn product_shot(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside = x >= width / 4 && x < width * 3 / 4 && y >= height / 4 && y < height * 3 / 4;
        if inside { DARK } else { Rgb([255, 255, 255]) }
    })
}

fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

fn png(name: &str, width: u32, height: u32) -> ImageBlob {
    ImageBlob::new(encode(&product_shot(width, height), ImageFormat::Png), name, "image/png")
}

fn jpeg(name: &str, width: u32, height: u32) -> ImageBlob {
    ImageBlob::new(encode(&product_shot(width, height), ImageFormat::Jpeg), name, "image/jpeg")
}

fn unzip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

#[test]
fn single_image_with_defaults() {
    let result = batch::run(vec![png("Shoe.png", 64, 48)], &ProcessingSettings::default());

    let BatchResult::Single { name, bytes } = result else {
        panic!("one input should give a single result");
    };
    assert_eq!(name, "Shoe.jpg");
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (64, 48));
}

#[test]
fn archive_skips_corrupt_items_and_keeps_order() {
    let settings = ProcessingSettings {
        output_format: OutputFormat::Webp,
        file_naming: FileNamingSettings {
            suffix: "_web".to_string(),
            to_lowercase: true,
            replace_spaces: true,
        },
        ..Default::default()
    };
    let images = vec![
        jpeg("Red Mug.JPG", 40, 40),
        ImageBlob::new(b"definitely not an image".to_vec(), "broken.png", "image/png"),
        png("Blue Shoe.png", 50, 30),
    ];

    let result = batch::run(images, &settings);
    assert_eq!(result.filename(), "processed_images.zip");
    assert_eq!(result.file_count(), 2);

    let entries = unzip(result.bytes());
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["red-mug_web.webp", "blue-shoe_web.webp"]);
    for (_, bytes) in &entries {
        assert_eq!(image::guess_format(bytes).unwrap(), ImageFormat::WebP);
    }
}

#[test]
fn all_corrupt_gives_empty_archive() {
    let images = vec![
        ImageBlob::new(b"nope".to_vec(), "a.jpg", "image/jpeg"),
        ImageBlob::new(Vec::new(), "b.jpg", "image/jpeg"),
    ];
    let result = batch::run(images, &ProcessingSettings::default());

    assert!(matches!(result, BatchResult::Archive { entries: 0, .. }));
    assert!(unzip(result.bytes()).is_empty());
}

#[test]
fn transparent_background_on_square_canvas() {
    let settings = ProcessingSettings {
        output_format: OutputFormat::Png,
        resize: ResizeSettings {
            use_preset: true,
            preset: ResizePreset::Square,
            ..Default::default()
        },
        background: BackgroundSettings {
            enabled: true,
            mode: BackgroundMode::Transparent,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = batch::run(vec![png("wide.png", 200, 100)], &settings);
    let img = image::load_from_memory(result.bytes()).unwrap().to_rgba8();

    assert_eq!(img.dimensions(), (1000, 1000));
    // padding and removed backdrop are both transparent
    assert_eq!(img.get_pixel(5, 5)[3], 0);
    assert_eq!(img.get_pixel(100, 500)[3], 0);
    // the product survives
    assert_eq!(img.get_pixel(500, 500)[3], 255);
}

#[test]
fn transparent_background_as_jpeg_has_uniform_backdrop() {
    let settings = ProcessingSettings {
        output_format: OutputFormat::Jpg,
        resize: ResizeSettings {
            use_preset: true,
            preset: ResizePreset::Square,
            ..Default::default()
        },
        background: BackgroundSettings {
            enabled: true,
            mode: BackgroundMode::Transparent,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = batch::run(vec![png("wide.png", 200, 100)], &settings);
    let img = image::load_from_memory(result.bytes()).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (1000, 1000));

    let padding = *img.get_pixel(500, 50);
    let backdrop = *img.get_pixel(20, 500);
    for px in [padding, backdrop] {
        assert!(px.0.iter().all(|c| *c >= 250), "expected white, got {px:?}");
    }
    let product = *img.get_pixel(500, 500);
    assert!(product.0.iter().all(|c| *c < 100), "product was {product:?}");
}

#[test]
fn zero_dimensions_keep_source_size() {
    let settings = ProcessingSettings {
        resize: ResizeSettings {
            width: Some(0),
            height: Some(10),
            ..Default::default()
        },
        ..Default::default()
    };
    let result = batch::run(vec![png("small.png", 20, 10)], &settings);
    assert_eq!(image::load_from_memory(result.bytes()).unwrap().dimensions(), (20, 10));
}

#[test]
fn solid_background_fills_backdrop_and_padding() {
    let settings = ProcessingSettings {
        output_format: OutputFormat::Png,
        resize: ResizeSettings {
            use_preset: true,
            preset: ResizePreset::Landscape,
            mode: ResizeMode::Fit,
            ..Default::default()
        },
        background: BackgroundSettings {
            enabled: true,
            mode: BackgroundMode::Solid,
            color: "#ff0000".to_string(),
        },
        ..Default::default()
    };

    let result = batch::run(vec![png("tall.png", 100, 200)], &settings);
    let img = image::load_from_memory(result.bytes()).unwrap();
    assert!(!img.color().has_alpha());

    let img = img.to_rgb8();
    assert_eq!(img.dimensions(), (1920, 1080));
    // padding left of the centered image
    assert_eq!(*img.get_pixel(10, 540), Rgb([255, 0, 0]));
    // backdrop inside the image area: the source's top-left corner region
    let left = (1920 - 540) / 2;
    assert_eq!(*img.get_pixel(left + 20, 20), Rgb([255, 0, 0]));
}

#[test]
fn exact_mode_crops_to_preset() {
    let settings = ProcessingSettings {
        resize: ResizeSettings {
            use_preset: true,
            preset: ResizePreset::ThreeFour,
            mode: ResizeMode::Exact,
            ..Default::default()
        },
        ..Default::default()
    };
    let result = batch::run(vec![jpeg("shot.jpg", 300, 300)], &settings);
    let img = image::load_from_memory(result.bytes()).unwrap();
    assert_eq!(img.dimensions(), (1200, 1600));
}

#[test]
fn compression_level_changes_size() {
    let noisy = RgbImage::from_fn(160, 160, |x, y| {
        let v = x.wrapping_mul(2654435761) ^ y.wrapping_mul(40503);
        Rgb([(v % 256) as u8, (v >> 8) as u8, (v >> 16) as u8])
    });
    let input = ImageBlob::new(encode(&noisy, ImageFormat::Png), "noise.png", "image/png");

    let size_at = |level| {
        let settings = ProcessingSettings {
            compression: CompressionSettings { level },
            ..Default::default()
        };
        batch::run(vec![input.clone()], &settings).bytes().len()
    };
    assert!(size_at(CompressionLevel::Low) < size_at(CompressionLevel::High));
}

#[test]
fn settings_from_files() {
    let tmp = tempfile::TempDir::new().unwrap();
    let toml_path = tmp.path().join("prodshot.toml");
    std::fs::write(
        &toml_path,
        r#"
output_format = "png"

[file_naming]
suffix = "-listing"
"#,
    )
    .unwrap();

    let config = config::load_config(Some(&toml_path)).unwrap();
    let result = batch::run(vec![png("mug.jpg", 20, 20)], &config.settings());
    assert_eq!(result.filename(), "mug-listing.png");

    // JSON settings in the upload-form shape
    let json = r##"{
        "outputFormat": "original",
        "resize": { "usePreset": true, "preset": "fourFive", "mode": "exact", "keepAspectRatio": true },
        "compression": { "level": "high" },
        "background": { "enabled": false, "mode": "none", "color": "#ffffff" },
        "fileNaming": { "suffix": "", "toLowercase": true, "replaceSpaces": false }
    }"##;
    let settings = config::load_settings_json(json).unwrap();
    let result = batch::run(vec![png("MUG.PNG", 40, 40)], &settings);
    assert_eq!(result.filename(), "mug.PNG");
    // `original` keeps the name's extension but the bytes are JPEG
    assert_eq!(image::guess_format(result.bytes()).unwrap(), ImageFormat::Jpeg);
    assert_eq!(
        image::load_from_memory(result.bytes()).unwrap().dimensions(),
        (1200, 1500)
    );
}
