use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use super::canvas::DotCanvas;
use super::entity::Rect;

pub const STAR_COUNT: usize = 150;

const PALETTE: [Color; 4] = [
    Color::Rgb(255, 255, 255),
    Color::Rgb(198, 220, 255),
    Color::Rgb(255, 204, 153),
    Color::Rgb(180, 190, 255),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    /// Pixels per second.
    pub speed: f32,
    pub size: u8,
    pub color: Color,
}

/// Backdrop of falling stars. Driven by wall-clock delta, not by ticks.
#[derive(Debug, Clone)]
pub struct Starfield {
    width: f32,
    height: f32,
    stars: Vec<Star>,
}

/// Upper bound for sampling a coordinate along `extent`.
fn span(extent: f32) -> f32 {
    if extent.is_finite() {
        extent.max(1.0)
    } else {
        1.0
    }
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let (width, height) = (span(width), span(height));
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.gen_range(0.0..width),
                y: rng.gen_range(0.0..height),
                speed: rng.gen_range(40.0..120.0),
                size: rng.gen_range(1..=3),
                color: PALETTE[rng.gen_range(0..PALETTE.len())],
            })
            .collect();
        Self { width, height, stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: Duration) {
        let secs = dt.as_secs_f32();
        for star in &mut self.stars {
            star.y += star.speed * secs;
            if star.y >= self.height {
                star.y -= self.height;
                star.x = rng.gen_range(0.0..self.width);
            }
        }
    }

    pub fn draw(&self, canvas: &mut DotCanvas) {
        for star in &self.stars {
            if star.size >= 3 {
                let s = star.size as f32;
                canvas.fill_rect(Rect::from_center(star.x, star.y, s, s), star.color, false);
            } else {
                canvas.point(star.x, star.y, star.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stars_start_inside_with_bounded_speed() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = Starfield::new(&mut rng, 900.0, 700.0);
        assert_eq!(field.stars().len(), STAR_COUNT);
        for s in field.stars() {
            assert!((0.0..900.0).contains(&s.x) && (0.0..700.0).contains(&s.y));
            assert!((40.0..120.0).contains(&s.speed));
            assert!((1..=3).contains(&s.size));
        }
    }

    #[test]
    fn stars_wrap_to_the_top() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = Starfield::new(&mut rng, 900.0, 700.0);
        for _ in 0..50 {
            field.advance(&mut rng, Duration::from_millis(500));
        }
        assert!(field.stars().iter().all(|s| s.y >= 0.0 && s.y < 700.0));
    }

    #[test]
    fn unbounded_extent_still_yields_stars() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = Starfield::new(&mut rng, f32::INFINITY, f32::NAN);
        field.advance(&mut rng, Duration::from_secs(2));
        assert_eq!(field.stars().len(), STAR_COUNT);
        assert!(field.stars().iter().all(|s| s.x.is_finite() && s.y.is_finite()));
    }

    #[test]
    fn zero_delta_keeps_stars_still() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = Starfield::new(&mut rng, 900.0, 700.0);
        let before = field.stars().to_vec();
        field.advance(&mut rng, Duration::ZERO);
        assert_eq!(field.stars(), &before[..]);
    }
}
