use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::math::mul_div255_u8;
use crate::timeline::track::{TrackContent, TrackPlan, VideoTrack};

/// One rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// CPU rasterizer for a [`TrackPlan`].
pub struct FrameCompositor<'a> {
    plan: &'a TrackPlan,
    fps: Fps,
}

impl<'a> FrameCompositor<'a> {
    pub fn new(plan: &'a TrackPlan, fps: Fps) -> Self {
        Self { plan, fps }
    }

    pub fn frame_count(&self) -> u64 {
        self.fps.frames_for_secs(self.plan.total_sec)
    }

    /// Render frame `idx`, sampling the timeline at `idx / fps`.
    pub fn render_frame(&self, idx: FrameIndex) -> FrameRGBA {
        let mut frame = FrameRGBA {
            width: self.plan.canvas.width,
            height: self.plan.canvas.height,
            data: Vec::new(),
            premultiplied: true,
        };
        self.render_frame_into(idx, &mut frame);
        frame
    }

    /// Like [`Self::render_frame`] but reuses the buffer of `frame`.
    pub fn render_frame_into(&self, idx: FrameIndex, frame: &mut FrameRGBA) {
        let canvas = self.plan.canvas;
        frame.width = canvas.width;
        frame.height = canvas.height;
        frame.premultiplied = true;
        frame.data.clear();
        frame.data.resize(canvas.rgba_len(), 0);

        let t = self.fps.frame_to_secs(idx);
        for track in self.plan.video.iter().filter(|tr| tr.is_active(t)) {
            draw_track(&mut frame.data, canvas, track, t);
        }
    }
}

fn draw_track(dst: &mut [u8], canvas: Canvas, track: &VideoTrack, t: f64) {
    match &track.content {
        TrackContent::Background(rgba) => {
            for px in dst.chunks_exact_mut(4) {
                let out = over([px[0], px[1], px[2], px[3]], *rgba);
                px.copy_from_slice(&out);
            }
        }
        TrackContent::Image(img) => {
            let pos = track.position_at(t);
            blit_premul(
                dst,
                canvas,
                &img.rgba8_premul,
                img.width,
                img.height,
                pos.x.floor() as i64,
                pos.y.floor() as i64,
            );
        }
    }
}

/// Composite a premultiplied `src` image with its top-left corner at `(x, y)`, clipped to the
/// canvas.
pub(crate) fn blit_premul(
    dst: &mut [u8],
    canvas: Canvas,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x: i64,
    y: i64,
) {
    let cw = i64::from(canvas.width);
    let ch = i64::from(canvas.height);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src_w)).min(cw);
    let y1 = (y + i64::from(src_h)).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let span = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_off = (sy * src_w as usize + sx) * 4;
        let d_off = (dy as usize * canvas.width as usize + x0 as usize) * 4;
        let s_row = &src[s_off..s_off + span * 4];
        let d_row = &mut dst[d_off..d_off + span * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
