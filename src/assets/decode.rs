use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use image::imageops::FilterType;

/// Still image scaled for the output canvas.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

pub fn decode_image(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Width that keeps the aspect ratio of a `width`x`height` image scaled to `target_height`.
pub fn fit_width_to_height(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return 0;
    }
    let w = (f64::from(width) * f64::from(target_height) / f64::from(height)).round();
    (w as u32).max(1)
}

/// Scale `img` to `target_height` (aspect preserved) and premultiply alpha.
pub fn prepare_for_height(img: &RgbaImage, target_height: u32) -> PreparedImage {
    let (w, h) = img.dimensions();
    let target_width = fit_width_to_height(w, h, target_height);

    let mut rgba8_premul = if (w, h) == (target_width, target_height) {
        img.as_raw().clone()
    } else {
        image::imageops::resize(img, target_width, target_height, FilterType::Lanczos3).into_raw()
    };
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedImage {
        width: target_width,
        height: target_height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
