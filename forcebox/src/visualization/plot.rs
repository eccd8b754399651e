//! Minimal raster plots of a stored run
//!
//! - trajectory scatter in box coordinates
//! - kinetic / potential / total energy over step index
//!
//! Plots are plain `RgbImage`s with a frame around the data area, written as
//! PNG by the caller

use image::{Rgb, RgbImage};

use super::energy::EnergyProfile;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
pub const TRAJECTORY_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
pub const KINETIC_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
pub const POTENTIAL_COLOR: Rgb<u8> = Rgb([44, 160, 44]);
pub const TOTAL_COLOR: Rgb<u8> = Rgb([214, 39, 40]);

const MARGIN: u32 = 10;

/// Linear map from a data interval onto a pixel interval
#[derive(Debug, Clone, Copy)]
struct Axis {
    lo: f64,
    hi: f64,
    px_lo: f64,
    px_hi: f64,
}

impl Axis {
    fn new(lo: f64, hi: f64, px_lo: f64, px_hi: f64) -> Self {
        // flat data still needs a non-empty interval
        let (lo, hi) = if (hi - lo).abs() < 1e-12 { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
        Self { lo, hi, px_lo, px_hi }
    }

    fn map(&self, v: f64) -> f64 {
        self.px_lo + (v - self.lo) / (self.hi - self.lo) * (self.px_hi - self.px_lo)
    }
}

/// Scatter plot of the trajectory inside `[0, box_size]^2`, y axis pointing up
pub fn plot_trajectory(x: &[f64], y: &[f64], box_size: f64, size: u32) -> RgbImage {
    let size = size.max(2 * MARGIN + 2);
    let mut img = RgbImage::from_pixel(size, size, WHITE);
    let inner = (size - 1 - MARGIN) as f64;
    let ax = Axis::new(0.0, box_size, MARGIN as f64, inner);
    let ay = Axis::new(0.0, box_size, inner, MARGIN as f64);

    draw_frame(&mut img);
    for (&xi, &yi) in x.iter().zip(y) {
        put(&mut img, ax.map(xi), ay.map(yi), TRAJECTORY_COLOR);
    }
    img
}

/// Kinetic, potential and total energy against step index
pub fn plot_energy(profile: &EnergyProfile, width: u32, height: u32) -> RgbImage {
    let width = width.max(2 * MARGIN + 2);
    let height = height.max(2 * MARGIN + 2);
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    draw_frame(&mut img);

    let series = [
        (&profile.kinetic, KINETIC_COLOR),
        (&profile.potential, POTENTIAL_COLOR),
        (&profile.total, TOTAL_COLOR),
    ];

    let finite = || series.iter().flat_map(|(s, _)| s.iter().copied()).filter(|v| v.is_finite());
    let (Some(lo), Some(hi)) = (finite().reduce(f64::min), finite().reduce(f64::max)) else {
        return img;
    };

    let steps = profile.len().saturating_sub(1).max(1) as f64;
    let ax = Axis::new(0.0, steps, MARGIN as f64, (width - 1 - MARGIN) as f64);
    let ay = Axis::new(lo, hi, (height - 1 - MARGIN) as f64, MARGIN as f64);

    for (values, color) in series {
        for (i, pair) in values.windows(2).enumerate() {
            let (x0, y0) = (ax.map(i as f64), ay.map(pair[0]));
            let (x1, y1) = (ax.map((i + 1) as f64), ay.map(pair[1]));
            draw_line(&mut img, x0, y0, x1, y1, color);
        }
        if let [only] = values.as_slice() {
            put(&mut img, ax.map(0.0), ay.map(*only), color);
        }
    }
    img
}

fn draw_frame(img: &mut RgbImage) {
    let (w, h) = img.dimensions();
    let (l, t, r, b) = (MARGIN - 1, MARGIN - 1, w - MARGIN, h - MARGIN);
    for x in l..=r {
        img.put_pixel(x, t, AXIS);
        img.put_pixel(x, b, AXIS);
    }
    for y in t..=b {
        img.put_pixel(l, y, AXIS);
        img.put_pixel(r, y, AXIS);
    }
}

fn put(img: &mut RgbImage, x: f64, y: f64, color: Rgb<u8>) {
    if !(x.is_finite() && y.is_finite()) {
        return;
    }
    let (xi, yi) = (x.round(), y.round());
    if xi >= 0.0 && yi >= 0.0 && xi < img.width() as f64 && yi < img.height() as f64 {
        img.put_pixel(xi as u32, yi as u32, color);
    }
}

// DDA, plenty for plot resolutions
fn draw_line(img: &mut RgbImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
    let n = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0);
    if !n.is_finite() {
        return;
    }
    let n = n as usize;
    for k in 0..=n {
        let s = k as f64 / n as f64;
        put(img, x0 + s * (x1 - x0), y0 + s * (y1 - y0), color);
    }
}
