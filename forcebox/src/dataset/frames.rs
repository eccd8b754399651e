//! Frame directory as a dataset of consecutive-frame windows
//!
//! The PNG files of a snapshot directory are ordered naturally
//! (`frame_2.png` before `frame_10.png`) and item `i` is the window of
//! frames `i, i+1, i+2`

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::RgbImage;

use crate::error::{Result, SimError};

/// Frames per dataset item
pub const WINDOW: usize = 3;

/// Piece of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Number(u128),
    Text(String),
}

/// Split a name into digit runs (compared numerically) and lowercase text runs
pub fn natural_sort_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut rest = name;
    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        chunks.push(match head.parse::<u128>() {
            Ok(n) if is_digit => Chunk::Number(n),
            _ => Chunk::Text(head.to_lowercase()),
        });
        rest = tail;
    }
    chunks
}

impl PartialOrd for Chunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Chunk {
    // numbers sort before text, like "1" < "a" in plain string order
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Number(a), Chunk::Number(b)) => a.cmp(b),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameDataset {
    directory: PathBuf,
    image_files: Vec<String>,
    resize: Option<(u32, u32)>,
}

impl FrameDataset {
    /// Index the `.png` files of `directory`
    /// `resize` rescales every loaded frame to `(width, height)`
    pub fn open(directory: impl Into<PathBuf>, resize: Option<(u32, u32)>) -> Result<Self> {
        let directory = directory.into();
        let mut image_files = Vec::new();
        for entry in fs::read_dir(&directory)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".png") && entry.file_type()?.is_file() {
                image_files.push(name);
            }
        }
        image_files.sort_by_cached_key(|name| natural_sort_key(name));

        Ok(Self {
            directory,
            image_files,
            resize,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn image_files(&self) -> &[String] {
        &self.image_files
    }

    /// Number of complete windows
    pub fn len(&self) -> usize {
        self.image_files.len().saturating_sub(WINDOW - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames `idx, idx+1, idx+2` as RGB images
    pub fn get(&self, idx: usize) -> Result<[RgbImage; WINDOW]> {
        if idx >= self.len() {
            return Err(SimError::invalid(
                "idx",
                format!("an index below {} (got {idx})", self.len()),
            ));
        }
        Ok([self.load(idx)?, self.load(idx + 1)?, self.load(idx + 2)?])
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<[RgbImage; WINDOW]>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    fn load(&self, i: usize) -> Result<RgbImage> {
        let img = image::open(self.directory.join(&self.image_files[i]))?;
        let img = match self.resize {
            Some((w, h)) => img.resize_exact(w, h, FilterType::Triangle),
            None => img,
        };
        Ok(img.into_rgb8())
    }
}
