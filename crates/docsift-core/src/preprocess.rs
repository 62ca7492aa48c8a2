//! Image cleanup applied before OCR.
//!
//! The filter is colour non-local-means: every pixel becomes a weighted mean
//! of the pixels in its search window, weighted by how similar their
//! surrounding patches are. Luma and chroma are filtered separately so that
//! colour noise is smoothed without bleeding across glyph edges.
//!
//! Patch distances for one search offset are computed for the whole image at
//! once from an integral image of squared differences, which keeps the cost
//! at O(pixels x search window) instead of O(pixels x search window x patch).

use crate::config::DenoiseParams;
use image::{DynamicImage, RgbImage};

/// Weights below `exp(-WEIGHT_CUTOFF)` are treated as zero.
const WEIGHT_CUTOFF: f32 = 30.0;

/// Stateless colour non-local-means denoiser.
#[derive(Debug, Clone)]
pub struct Denoiser {
    params: DenoiseParams,
}

impl Denoiser {
    pub fn new(params: DenoiseParams) -> Self {
        Denoiser { params }
    }

    /// Denoise `image`, returning an RGB image of the same dimensions.
    pub fn denoise(&self, image: &DynamicImage) -> DynamicImage {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return DynamicImage::ImageRgb8(rgb);
        }

        let template_radius = self.params.template_window / 2;
        let search_radius = self.params.search_window / 2;
        let (luma, cb, cr) = split_ycbcr(&rgb);

        let window = Window {
            width: width as usize,
            height: height as usize,
            template_radius,
            search_radius,
        };
        let mut luma = nl_means(&[&luma], &window, self.params.h);
        let chroma = nl_means(&[&cb, &cr], &window, self.params.h_color);

        DynamicImage::ImageRgb8(merge_ycbcr(
            width,
            height,
            &luma.remove(0),
            &chroma[0],
            &chroma[1],
        ))
    }
}

impl Default for Denoiser {
    fn default() -> Self {
        Self::new(DenoiseParams::default())
    }
}

struct Window {
    width: usize,
    height: usize,
    template_radius: usize,
    search_radius: usize,
}

/// Non-local means over `planes` jointly: the patch distance sums squared
/// differences across all planes, and every plane is averaged with the same
/// weights.
fn nl_means(planes: &[&[u8]], win: &Window, strength: f32) -> Vec<Vec<u8>> {
    let (w, h) = (win.width, win.height);
    let (tr, sr) = (win.template_radius, win.search_radius);
    let border = tr + sr;
    let pw = w + 2 * border;

    let padded: Vec<Vec<u8>> = planes
        .iter()
        .map(|p| pad_replicate(p, w, h, border))
        .collect();

    let side = 2 * tr + 1;
    let norm = (side * side * planes.len()) as f32;
    let h2 = strength * strength;

    // Weight lookup indexed by the integer patch sum, never longer than the
    // largest sum a patch can produce.
    let lut_len = lut_len(side * side * planes.len(), h2, norm);
    let lut: Vec<f32> = (0..lut_len)
        .map(|sum| (-(sum as f32 / norm) / h2).exp())
        .collect();

    // Squared-difference image covers every pixel any patch touches.
    let dw = w + 2 * tr;
    let dh = h + 2 * tr;
    let stride = dw + 1;
    let mut integral = vec![0u64; stride * (dh + 1)];

    let mut weight_sum = vec![0f32; w * h];
    let mut acc = vec![vec![0f32; w * h]; planes.len()];

    let sr = sr as isize;
    for dy in -sr..=sr {
        for dx in -sr..=sr {
            for v in 0..dh {
                let py = v + sr as usize;
                let qy = (py as isize + dy) as usize;
                let mut row = 0u64;
                for u in 0..dw {
                    let px = u + sr as usize;
                    let qx = (px as isize + dx) as usize;
                    for plane in &padded {
                        let d = plane[py * pw + px] as i64 - plane[qy * pw + qx] as i64;
                        row += (d * d) as u64;
                    }
                    integral[(v + 1) * stride + u + 1] = integral[v * stride + u + 1] + row;
                }
            }

            for y in 0..h {
                for x in 0..w {
                    let sum = integral[(y + side) * stride + x + side] + integral[y * stride + x]
                        - integral[y * stride + x + side]
                        - integral[(y + side) * stride + x];
                    let Some(&weight) = lut.get(sum as usize) else {
                        continue;
                    };

                    let i = y * w + x;
                    weight_sum[i] += weight;
                    let qy = ((y + border) as isize + dy) as usize;
                    let qx = ((x + border) as isize + dx) as usize;
                    for (out, plane) in acc.iter_mut().zip(&padded) {
                        out[i] += weight * plane[qy * pw + qx] as f32;
                    }
                }
            }
        }
    }

    // The zero offset always contributes weight 1, so weight_sum >= 1.
    acc.into_iter()
        .map(|plane| {
            plane
                .iter()
                .zip(&weight_sum)
                .map(|(v, ws)| (v / ws).round().clamp(0.0, 255.0) as u8)
                .collect()
        })
        .collect()
}

/// Length of the weight table: sums past the cutoff weigh zero, and no sum
/// exceeds `samples * 255^2`. Always at least 1, so the zero offset has weight 1.
fn lut_len(samples: usize, h2: f32, norm: f32) -> usize {
    let max_sum = samples * 255 * 255;
    let cutoff = (f64::from(WEIGHT_CUTOFF) * f64::from(h2) * f64::from(norm)).ceil();
    if cutoff.is_finite() && cutoff < max_sum as f64 {
        cutoff as usize + 1
    } else {
        max_sum + 1
    }
}

/// Copy `plane` into a buffer with `border` replicated edge pixels on each side.
fn pad_replicate(plane: &[u8], w: usize, h: usize, border: usize) -> Vec<u8> {
    let pw = w + 2 * border;
    let ph = h + 2 * border;
    let mut out = Vec::with_capacity(pw * ph);
    for py in 0..ph {
        let y = py.saturating_sub(border).min(h - 1);
        for px in 0..pw {
            let x = px.saturating_sub(border).min(w - 1);
            out.push(plane[y * w + x]);
        }
    }
    out
}

fn split_ycbcr(rgb: &RgbImage) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let n = (rgb.width() * rgb.height()) as usize;
    let mut y = Vec::with_capacity(n);
    let mut cb = Vec::with_capacity(n);
    let mut cr = Vec::with_capacity(n);
    for p in rgb.pixels() {
        let [r, g, b] = p.0.map(f32::from);
        y.push(to_u8(0.299 * r + 0.587 * g + 0.114 * b));
        cb.push(to_u8(128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b));
        cr.push(to_u8(128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b));
    }
    (y, cb, cr)
}

fn merge_ycbcr(width: u32, height: u32, y: &[u8], cb: &[u8], cr: &[u8]) -> RgbImage {
    let mut out = RgbImage::new(width, height);
    for (i, p) in out.pixels_mut().enumerate() {
        let luma = f32::from(y[i]);
        let blue = f32::from(cb[i]) - 128.0;
        let red = f32::from(cr[i]) - 128.0;
        p.0 = [
            to_u8(luma + 1.402 * red),
            to_u8(luma - 0.344_136 * blue - 0.714_136 * red),
            to_u8(luma + 1.772 * blue),
        ];
    }
    out
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
