/// Ambient backdrops: three layered gradients that rotate on a timer.
///
/// Each backdrop is two translucent radial glows over a diagonal (135°)
/// three-stop gradient. `color_at` takes normalized coordinates
/// (0.0..=1.0 on both axes) and returns the composited colour.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Linear blend toward `other`; `t = 0` is self, `t = 1` is other.
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
        }
    }
}

/// A radial glow: colour at `alpha` in the center, transparent at `radius`.
#[derive(Clone, Copy, Debug)]
pub struct Glow {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Backdrop {
    pub glows: [Glow; 2],
    pub stops: [(f32, Rgb); 3],
}

impl Backdrop {
    pub fn color_at(&self, x: f32, y: f32) -> Rgb {
        // 135deg runs from the top-left corner to the bottom-right one.
        let t = ((x + y) / 2.0).clamp(0.0, 1.0);
        let mut color = linear(&self.stops, t);
        for glow in &self.glows {
            let d = ((x - glow.x).powi(2) + (y - glow.y).powi(2)).sqrt();
            if d < glow.radius {
                color = color.mix(glow.color, glow.alpha * (1.0 - d / glow.radius));
            }
        }
        color
    }
}

fn linear(stops: &[(f32, Rgb); 3], t: f32) -> Rgb {
    let mut prev = stops[0];
    if t <= prev.0 {
        return prev.1;
    }
    for &stop in &stops[1..] {
        if t <= stop.0 {
            let span = (stop.0 - prev.0).max(f32::EPSILON);
            return prev.1.mix(stop.1, (t - prev.0) / span);
        }
        prev = stop;
    }
    prev.1
}

const fn glow(x: f32, y: f32, color: Rgb, alpha: f32, radius: f32) -> Glow {
    Glow { x, y, color, alpha, radius }
}

pub const BACKDROPS: [Backdrop; 3] = [
    Backdrop {
        glows: [
            glow(0.20, 0.20, Rgb::new(255, 182, 193), 0.30, 0.35),
            glow(0.80, 0.10, Rgb::new(255, 105, 180), 0.28, 0.30),
        ],
        stops: [
            (0.00, Rgb::new(0x2b, 0x0f, 0x2f)),
            (0.40, Rgb::new(0x40, 0x10, 0x36)),
            (1.00, Rgb::new(0x2f, 0x0a, 0x23)),
        ],
    },
    Backdrop {
        glows: [
            glow(0.15, 0.30, Rgb::new(255, 204, 229), 0.35, 0.32),
            glow(0.75, 0.20, Rgb::new(255, 150, 200), 0.32, 0.30),
        ],
        stops: [
            (0.00, Rgb::new(0x2a, 0x0d, 0x26)),
            (0.45, Rgb::new(0x3a, 0x10, 0x30)),
            (1.00, Rgb::new(0x2c, 0x0b, 0x22)),
        ],
    },
    Backdrop {
        glows: [
            glow(0.25, 0.25, Rgb::new(255, 180, 210), 0.32, 0.35),
            glow(0.70, 0.25, Rgb::new(255, 130, 190), 0.30, 0.28),
        ],
        stops: [
            (0.00, Rgb::new(0x34, 0x10, 0x2f)),
            (0.40, Rgb::new(0x45, 0x11, 0x3a)),
            (1.00, Rgb::new(0x32, 0x0c, 0x27)),
        ],
    },
];

/// Which backdrop is showing. Advances on its own timer, wraps around.
#[derive(Clone, Debug)]
pub struct BackgroundCycle {
    index: usize,
    len: usize,
}

impl BackgroundCycle {
    pub fn new(len: usize) -> Self {
        BackgroundCycle { index: 0, len: len.max(1) }
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    #[allow(dead_code)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn backdrop(&self) -> &'static Backdrop {
        &BACKDROPS[self.index % BACKDROPS.len()]
    }
}

impl Default for BackgroundCycle {
    fn default() -> Self {
        BackgroundCycle::new(BACKDROPS.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_ticks_then_wrap() {
        let mut bg = BackgroundCycle::default();
        assert_eq!(bg.index(), 0);
        bg.advance();
        assert_eq!(bg.advance(), 2);
        assert_eq!(bg.advance(), 0);
    }

    #[test]
    fn empty_cycle_does_not_divide_by_zero() {
        let mut bg = BackgroundCycle::new(0);
        assert_eq!(bg.advance(), 0);
    }

    #[test]
    fn mix_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgb::new(100, 50, 25));
        assert_eq!(a.mix(b, 7.0), b);
    }

    #[test]
    fn far_corner_is_last_stop() {
        for backdrop in &BACKDROPS {
            assert_eq!(backdrop.color_at(1.0, 1.0), backdrop.stops[2].1);
        }
    }

    #[test]
    fn glow_center_is_lighter_than_base() {
        let b = &BACKDROPS[0];
        let g = b.glows[0];
        let lit = b.color_at(g.x, g.y);
        let base = linear(&b.stops, (g.x + g.y) / 2.0);
        assert!(lit.r > base.r);
    }
}
