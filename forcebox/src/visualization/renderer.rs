//! Frame rendering for finished trajectories
//!
//! World coordinates in `[0, box_size]^2` map linearly onto a square image
//! with the vertical axis flipped, so world `y = 0` is the bottom row. The
//! sprite is composited centered on the body position

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{imageops, Delay, Frame, Rgba, RgbaImage};
use log::info;

use crate::error::{Result, SimError};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SPRITE_COLOR: Rgba<u8> = Rgba([220, 30, 30, 255]);

/// Image drawn at the body position
#[derive(Debug, Clone)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    /// Filled disc of the given diameter
    pub fn disc(diameter: u32, color: Rgba<u8>) -> Self {
        let d = diameter.max(1);
        let r = d as f64 / 2.0;
        let image = RgbaImage::from_fn(d, d, |px, py| {
            let dx = px as f64 + 0.5 - r;
            let dy = py as f64 + 0.5 - r;
            if dx * dx + dy * dy <= r * r {
                color
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        Self { image }
    }

    /// Load a sprite from an image file (any format the `image` crate reads)
    pub fn from_file(path: &Path) -> Result<Self> {
        let image = image::open(path)?.into_rgba8();
        Ok(Self { image })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[derive(Debug, Clone)]
pub struct SimulationRenderer {
    image_pixel_size: u32,
    background: Rgba<u8>,
    sprite: Sprite,
}

impl SimulationRenderer {
    /// Renderer producing `image_pixel_size` square frames with a red disc sprite
    pub fn new(image_pixel_size: u32) -> Result<Self> {
        let sprite = Sprite::disc((image_pixel_size / 20).max(3), SPRITE_COLOR);
        Self::with_sprite(image_pixel_size, sprite)
    }

    pub fn with_sprite(image_pixel_size: u32, sprite: Sprite) -> Result<Self> {
        if image_pixel_size < 2 {
            return Err(SimError::invalid(
                "image_pixel_size",
                format!("at least 2 pixels (got {image_pixel_size})"),
            ));
        }
        Ok(Self {
            image_pixel_size,
            background: BACKGROUND,
            sprite,
        })
    }

    pub fn image_pixel_size(&self) -> u32 {
        self.image_pixel_size
    }

    /// Map a world point to (fractional) pixel coordinates
    pub fn world_to_pixel(&self, x: f64, y: f64, box_size: f64) -> (f64, f64) {
        let scale = (self.image_pixel_size - 1) as f64 / box_size;
        (x * scale, (box_size - y) * scale)
    }

    /// Single frame with the sprite centered on `(x, y)`
    pub fn render_frame(&self, x: f64, y: f64, box_size: f64) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(self.image_pixel_size, self.image_pixel_size, self.background);
        let (px, py) = self.world_to_pixel(x, y, box_size);
        let (w, h) = self.sprite.dimensions();
        let left = (px - w as f64 / 2.0).round() as i64;
        let top = (py - h as f64 / 2.0).round() as i64;
        imageops::overlay(&mut frame, &self.sprite.image, left, top);
        frame
    }

    /// Render up to `frame_count` frames sampled evenly along the trajectory
    pub fn render_frames(&self, x: &[f64], y: &[f64], box_size: f64, frame_count: usize) -> Result<Vec<RgbaImage>> {
        if x.len() != y.len() {
            return Err(SimError::invalid(
                "y",
                format!("as many samples as x ({} != {})", y.len(), x.len()),
            ));
        }
        if !(box_size.is_finite() && box_size > 0.0) {
            return Err(SimError::invalid("box_size", format!("a finite value > 0 (got {box_size})")));
        }
        if frame_count == 0 {
            return Err(SimError::invalid("frame_count", "at least 1"));
        }

        Ok(frame_indices(x.len(), frame_count)
            .into_iter()
            .map(|i| self.render_frame(x[i], y[i], box_size))
            .collect())
    }
}

/// Trajectory indices shown in each frame: `min(frame_count, len)` indices
/// spread evenly from the first sample to the last
pub fn frame_indices(len: usize, frame_count: usize) -> Vec<usize> {
    let n = frame_count.min(len);
    match n {
        0 => Vec::new(),
        1 => vec![0],
        _ => (0..n)
            .map(|k| ((k * (len - 1)) as f64 / (n - 1) as f64).round() as usize)
            .collect(),
    }
}

/// Write frames as `frame_<i>.png` into `dir` (created if missing)
pub fn save_frames(frames: &[RgbaImage], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("frame_{i}.png"));
        frame.save(&path)?;
        paths.push(path);
    }
    info!("wrote {} frames to {}", frames.len(), dir.display());
    Ok(paths)
}

/// Encode frames into a looping GIF
pub fn write_gif(frames: &[RgbaImage], path: &Path, delay_ms: u32) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    encoder.encode_frames(frames.iter().map(|f| Frame::from_parts(f.clone(), 0, 0, delay)))?;

    info!("wrote {}-frame gif to {}", frames.len(), path.display());
    Ok(())
}
