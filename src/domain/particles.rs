/// Floating hearts behind the card. Purely decorative: parameters are drawn
/// once and the animation is a function of elapsed time.

use rand::Rng;

/// Hearts at or above this size draw with the filled glyph.
pub const LARGE_HEART: f64 = 19.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heart {
    /// Nominal size in pixels (12..26).
    pub size: f64,
    /// Seconds for one full rise across the screen (9..16).
    pub duration: f64,
    /// Seconds the animation is already into its cycle at start (0..6).
    pub delay: f64,
    /// Horizontal position, percent.
    pub left: f64,
    /// Starting vertical position, percent.
    pub top: f64,
    /// 0.35..0.85
    pub opacity: f64,
}

impl Heart {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Heart {
            size: rng.random_range(12.0..26.0),
            duration: rng.random_range(9.0..16.0),
            delay: rng.random_range(0.0..6.0),
            left: rng.random_range(0.0..100.0),
            top: rng.random_range(0.0..100.0),
            opacity: rng.random_range(0.35..0.85),
        }
    }

    /// (left%, top%) after `elapsed` seconds. Drifts upward and wraps.
    pub fn position_at(&self, elapsed: f64) -> (f64, f64) {
        let progress = ((elapsed + self.delay) / self.duration).fract();
        let top = (self.top - progress * 100.0).rem_euclid(100.0);
        (self.left, top)
    }

    pub fn is_large(&self) -> bool {
        self.size >= LARGE_HEART
    }
}

#[derive(Clone, Debug, Default)]
pub struct HeartField {
    pub hearts: Vec<Heart>,
}

impl HeartField {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        HeartField {
            hearts: (0..count).map(|_| Heart::random(rng)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.hearts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn field_has_requested_count_in_range() {
        let field = HeartField::new(18, &mut StdRng::seed_from_u64(7));
        assert_eq!(field.len(), 18);
        for h in &field.hearts {
            assert!((12.0..26.0).contains(&h.size));
            assert!((9.0..16.0).contains(&h.duration));
            assert!((0.0..6.0).contains(&h.delay));
            assert!((0.0..100.0).contains(&h.left));
            assert!((0.0..100.0).contains(&h.top));
            assert!((0.35..0.85).contains(&h.opacity));
        }
    }

    #[test]
    fn zero_hearts_is_fine() {
        assert_eq!(HeartField::new(0, &mut StdRng::seed_from_u64(1)).len(), 0);
    }

    #[test]
    fn heart_rises_and_wraps() {
        let h = Heart { size: 20.0, duration: 10.0, delay: 0.0, left: 40.0, top: 50.0, opacity: 0.5 };
        assert_eq!(h.position_at(0.0), (40.0, 50.0));
        let (_, quarter) = h.position_at(2.5);
        assert!((quarter - 25.0).abs() < 1e-9);
        let (_, wrapped) = h.position_at(7.5);
        assert!((wrapped - 75.0).abs() < 1e-9);
        let (_, full) = h.position_at(10.0);
        assert!((full - 50.0).abs() < 1e-9);
    }

    #[test]
    fn delay_offsets_the_cycle() {
        let a = Heart { size: 12.0, duration: 10.0, delay: 3.0, left: 0.0, top: 50.0, opacity: 0.5 };
        let b = Heart { delay: 0.0, ..a };
        assert_eq!(a.position_at(0.0), b.position_at(3.0));
        assert!(!a.is_large());
    }
}
