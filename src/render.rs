//! Key image rendering: icon scaled into the key with a text label below it.
//!
//! Every call loads the icon and font from disk and draws a fresh image.
//! Conversion to the deck's native tile format happens in the driver when
//! the image is written.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::trace;

use crate::config::require_file;
use crate::device::DeviceInfo;
use crate::error::{Result, StroomerError};
use crate::style::KeyStyle;

/// Space kept free below the icon for the label.
pub const LABEL_MARGIN: u32 = 20;
/// Label font size in pixels.
pub const LABEL_FONT_SIZE: f32 = 14.0;
/// Distance from the bottom edge to the label baseline.
pub const LABEL_BASELINE_OFFSET: u32 = 5;

const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Margins around the icon area, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margins {
    /// Margins leaving room for a label under the icon.
    pub const fn label() -> Self {
        Self {
            top: 0,
            right: 0,
            bottom: LABEL_MARGIN,
            left: 0,
        }
    }
}

/// Scale `icon` into a black `width` x `height` tile, inside `margins`.
///
/// The icon keeps its aspect ratio, is only ever shrunk, and is centered in
/// the area left by the margins. Transparent pixels show the background.
pub fn create_scaled_key_image(
    icon: &DynamicImage,
    width: u32,
    height: u32,
    margins: Margins,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));

    let max_w = width.saturating_sub(margins.left + margins.right);
    let max_h = height.saturating_sub(margins.top + margins.bottom);
    if max_w == 0 || max_h == 0 {
        return canvas;
    }

    let thumbnail = if icon.width() > max_w || icon.height() > max_h {
        icon.resize(max_w, max_h, FilterType::Lanczos3).to_rgba8()
    } else {
        icon.to_rgba8()
    };

    let x = margins.left + (max_w - thumbnail.width()) / 2;
    let y = margins.top + (max_h - thumbnail.height()) / 2;
    imageops::overlay(&mut canvas, &thumbnail, i64::from(x), i64::from(y));
    canvas
}

/// Load an icon from disk.
pub fn load_icon(path: &Path) -> Result<DynamicImage> {
    require_file(path)?;
    image::open(path).map_err(|e| StroomerError::ImageProcessing(format!("{}: {e}", path.display())))
}

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontVec> {
    require_file(path)?;
    let bytes = std::fs::read(path)?;
    FontVec::try_from_vec(bytes).map_err(|e| StroomerError::FontLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Draw `label` centered horizontally with its baseline a few pixels above
/// the bottom edge.
pub fn draw_label(image: &mut DynamicImage, font: &FontVec, label: &str) {
    let mut canvas = image.to_rgb8();
    let scale = PxScale::from(LABEL_FONT_SIZE);
    let (text_width, _) = text_size(scale, font, label);
    let ascent = font.as_scaled(scale).ascent();

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)] // Key sizes are small
    let (x, y) = {
        let x = (canvas.width() as i32 - text_width as i32) / 2;
        let baseline = canvas.height().saturating_sub(LABEL_BASELINE_OFFSET) as f32;
        (x, (baseline - ascent).round() as i32)
    };

    draw_text_mut(&mut canvas, LABEL_COLOR, x, y, scale, font, label);
    *image = DynamicImage::ImageRgb8(canvas);
}

/// Render a key tile for a deck.
///
/// Missing or unreadable icon and font files are errors; no fallback image
/// is substituted.
pub fn render_key_image(
    info: &DeviceInfo,
    icon_path: &Path,
    font_path: &Path,
    label: &str,
) -> Result<DynamicImage> {
    trace!(
        icon = %icon_path.display(),
        font = %font_path.display(),
        label,
        "Rendering key image"
    );

    let icon = load_icon(icon_path)?;
    let font = load_font(font_path)?;

    #[allow(clippy::cast_possible_truncation)] // Key dimensions are always small
    let (width, height) = (info.key_width as u32, info.key_height as u32);

    let tile = create_scaled_key_image(&icon, width, height, Margins::label());
    let mut image = DynamicImage::ImageRgba8(tile);
    draw_label(&mut image, &font, label);
    Ok(image)
}

/// Render the tile described by a [`KeyStyle`].
pub fn render_style(info: &DeviceInfo, style: &KeyStyle) -> Result<DynamicImage> {
    render_key_image(info, &style.icon, &style.font, &style.label)
}
