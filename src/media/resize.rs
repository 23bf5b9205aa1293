use std::fmt;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::Serialize;

/// Largest target surface we agree to allocate (width * height).
const MAX_CANVAS_PIXELS: u64 = 80_000_000;

pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    pub name: &'static str,
    pub max_width: u32,
    /// Encoder quality on a 0..=1 scale.
    pub quality: f32,
}

pub const DEFAULT_TIERS: [Tier; 3] = [
    Tier { name: "large", max_width: 1920, quality: 0.85 },
    Tier { name: "medium", max_width: 960, quality: 0.80 },
    Tier { name: "thumbnail", max_width: 320, quality: 0.70 },
];

#[derive(Debug, Clone)]
pub struct ImageVersion {
    pub tier: Tier,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    Load(String),
    Canvas(String),
    Encode(String),
    UnsupportedType(String),
    TooLarge { size: usize, max: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Load(e) => write!(f, "could not decode image: {e}"),
            ImageError::Canvas(e) => write!(f, "could not create drawing surface: {e}"),
            ImageError::Encode(e) => write!(f, "could not encode image: {e}"),
            ImageError::UnsupportedType(mime) => write!(f, "unsupported file type: {mime}"),
            ImageError::TooLarge { size, max } => {
                write!(f, "file is too large ({size} bytes, limit {max})")
            }
        }
    }
}

impl std::error::Error for ImageError {}

/// Check the file picker's declared type and size before decoding anything.
pub fn check_upload(mime: &str, size: usize, max_bytes: usize) -> Result<(), ImageError> {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&essence.as_str()) {
        return Err(ImageError::UnsupportedType(mime.to_string()));
    }
    if size > max_bytes {
        return Err(ImageError::TooLarge { size, max: max_bytes });
    }
    Ok(())
}

/// Scale the longer side down to `max`, keeping the aspect ratio. Never upscales.
pub fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max || longer == 0 {
        return (width, height);
    }
    let ratio = max as f64 / longer as f64;
    let scale = |side: u32| ((side as f64 * ratio).round() as u32).max(1);
    if width >= height {
        (max, scale(height))
    } else {
        (scale(width), max)
    }
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Resize `source` for one tier on a freshly allocated surface and encode it.
pub fn render_tier(source: &RgbImage, tier: Tier) -> Result<ImageVersion, ImageError> {
    let (width, height) = scaled_dimensions(source.width(), source.height(), tier.max_width);
    let pixels = width as u64 * height as u64;
    if pixels == 0 || pixels > MAX_CANVAS_PIXELS {
        return Err(ImageError::Canvas(format!(
            "cannot allocate a {width}x{height} surface for tier '{}'",
            tier.name
        )));
    }

    let surface = if (width, height) == source.dimensions() {
        source.clone()
    } else {
        imageops::resize(source, width, height, FilterType::Lanczos3)
    };

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(tier.quality))
        .write_image(surface.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(ImageVersion { tier, bytes, width, height })
}

/// Decode `bytes` and produce one encoded version per tier.
///
/// Decoding and every tier run on blocking worker threads; the tiers are
/// independent and awaited together.
pub async fn generate_versions(bytes: Vec<u8>, tiers: &[Tier]) -> Result<Vec<ImageVersion>, ImageError> {
    let source = tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map(|img| img.to_rgb8())
    })
    .await
    .map_err(|e| ImageError::Load(e.to_string()))?
    .map_err(|e| ImageError::Load(e.to_string()))?;
    let source = Arc::new(source);

    let jobs = tiers.iter().copied().map(|tier| {
        let source = Arc::clone(&source);
        tokio::task::spawn_blocking(move || render_tier(&source, tier))
    });

    futures::future::join_all(jobs)
        .await
        .into_iter()
        .map(|joined| joined.map_err(|e| ImageError::Canvas(e.to_string()))?)
        .collect()
}
