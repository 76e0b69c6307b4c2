//! Ship sprites: either decoded from an image file or drawn procedurally.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use ratatui::style::Color;

use crate::error::AssetError;

pub const SHIP_SIZE: u32 = 44;

/// Row-major bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    w: usize,
    h: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h, bits: vec![false; w * h] }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.bits[y * self.w + x]
    }

    pub fn set(&mut self, x: usize, y: usize) {
        if x < self.w && y < self.h {
            self.bits[y * self.w + x] = true;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy);
            }
        }
    }

    /// Even-odd scanline fill, sampled at pixel centres.
    fn fill_polygon(&mut self, pts: &[(f32, f32)]) {
        for y in 0..self.h {
            let py = y as f32 + 0.5;
            for x in 0..self.w {
                let px = x as f32 + 0.5;
                let mut inside = false;
                let mut j = pts.len() - 1;
                for i in 0..pts.len() {
                    let (xi, yi) = pts[i];
                    let (xj, yj) = pts[j];
                    if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                        inside = !inside;
                    }
                    j = i;
                }
                if inside {
                    self.set(x, y);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteLayer {
    pub color: Color,
    pub mask: Mask,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpriteSource {
    Image(PathBuf),
    Placeholder,
}

/// Layers are drawn in order, later layers on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub layers: Vec<SpriteLayer>,
    pub source: SpriteSource,
}

impl Sprite {
    /// Triangle hull with a red thruster and two blue wing pods.
    pub fn placeholder() -> Self {
        let s = SHIP_SIZE as usize;
        let mut hull = Mask::new(s, s);
        hull.fill_polygon(&[
            (22.0, 2.0),
            (34.0, 20.0),
            (28.0, 20.0),
            (28.0, 30.0),
            (16.0, 30.0),
            (16.0, 20.0),
            (10.0, 20.0),
        ]);
        let mut thruster = Mask::new(s, s);
        thruster.fill_rect(20, 24, 8, 10);
        let mut pods = Mask::new(s, s);
        pods.fill_rect(12, 22, 6, 6);
        pods.fill_rect(26, 22, 6, 6);
        Self {
            layers: vec![
                SpriteLayer { color: Color::Rgb(220, 240, 255), mask: hull },
                SpriteLayer { color: Color::Rgb(240, 70, 70), mask: thruster },
                SpriteLayer { color: Color::Rgb(70, 140, 255), mask: pods },
            ],
            source: SpriteSource::Placeholder,
        }
    }

    /// Decode an image, scale it to the ship hitbox and keep the visible
    /// pixels as a single layer tinted with their average colour.
    pub fn from_image(path: &Path) -> Result<Self, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let img = image::open(path).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = img
            .resize_exact(SHIP_SIZE, SHIP_SIZE, FilterType::Nearest)
            .to_rgba8();

        let s = SHIP_SIZE as usize;
        let mut mask = Mask::new(s, s);
        let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
        for (x, y, px) in rgba.enumerate_pixels() {
            let [pr, pg, pb, pa] = px.0;
            let luma = (pr as u32 * 3 + pg as u32 * 6 + pb as u32) / 10;
            if pa > 64 && luma > 24 {
                mask.set(x as usize, y as usize);
                r += pr as u64;
                g += pg as u64;
                b += pb as u64;
                n += 1;
            }
        }
        if n == 0 {
            return Err(AssetError::Decode {
                path: path.to_path_buf(),
                reason: "image has no visible pixels".into(),
            });
        }
        let color = Color::Rgb((r / n) as u8, (g / n) as u8, (b / n) as u8);
        Ok(Self {
            layers: vec![SpriteLayer { color, mask }],
            source: SpriteSource::Image(path.to_path_buf()),
        })
    }

    /// First candidate that decodes wins; otherwise the placeholder.
    pub fn resolve(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            match Self::from_image(path) {
                Ok(sprite) => {
                    log::info!("Ship image loaded: {}", path.display());
                    return sprite;
                }
                Err(AssetError::NotFound(_)) => {}
                Err(e) => log::warn!("Ship image rejected: {}", e),
            }
        }
        log::info!("No ship image available, using the generated sprite");
        Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_hull_thruster_and_pods() {
        let s = Sprite::placeholder();
        assert_eq!(s.layers.len(), 3);
        assert_eq!(s.source, SpriteSource::Placeholder);
        // Nose tip and the hull body are inside, corners are not.
        assert!(s.layers[0].mask.get(22, 10));
        assert!(!s.layers[0].mask.get(0, 0));
        assert_eq!(s.layers[1].mask.count(), 8 * 10);
        assert_eq!(s.layers[2].mask.count(), 2 * 6 * 6);
    }

    #[test]
    fn missing_candidates_fall_back_to_placeholder() {
        let s = Sprite::resolve(&[PathBuf::from("/definitely/not/here.png")]);
        assert_eq!(s.source, SpriteSource::Placeholder);
    }

    #[test]
    fn undecodable_file_is_an_asset_error() {
        let path = std::env::temp_dir().join(format!("galactatec-bad-{}.png", std::process::id()));
        std::fs::write(&path, b"not a png").unwrap();
        let res = Sprite::from_image(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(res, Err(AssetError::Decode { .. })));
    }
}
