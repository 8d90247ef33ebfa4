/// The evasive "No" button: where it sits, how small it gets, what it says.
///
/// Positions are percentages of the button area (top/left are the button's
/// center), rotation is in degrees, scale is unitless. All randomness comes
/// from the caller's `Rng`, so tests can pin it with a seeded generator.

use rand::Rng;

/// Taunts shown under the buttons, selected by `click_attempts % len`.
pub const MESSAGES: [&str; 5] = [
    "Nice try 😌",
    "That option seems unavailable",
    "The universe says no to ‘No’",
    "Sly, but no dice",
    "Destiny prefers ‘Yes’",
];

/// Clicks on "No" after which the view leans visibly toward "Yes".
pub const EMPHASIS_AFTER: u32 = 4;
pub const YES_EMPHASIS_SCALE: f64 = 1.08;
pub const NO_EMPHASIS_FACTOR: f64 = 0.9;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct EvasivePosition {
    pub top: f64,
    pub left: f64,
    pub rotation: f64,
    pub scale: f64,
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Draw a fresh spot for the "No" button.
///
/// Higher intensity pushes it down and to the left and shrinks it; the
/// clamps keep it inside the button area no matter how large intensity grows.
pub fn generate_position<R: Rng + ?Sized>(intensity: f64, rng: &mut R) -> EvasivePosition {
    let top = clamp(40.0 + rng.random_range(-18.0..18.0) + intensity, 15.0, 80.0);
    let left = clamp(50.0 + rng.random_range(-28.0..28.0) - intensity * 0.7, 12.0, 88.0);
    let rotation = rng.random_range(-14.0..14.0);
    let scale = clamp(1.0 - intensity * 0.04, 0.65, 1.0);
    EvasivePosition { top, left, rotation, scale }
}

/// Interaction counters for the landing screen.
#[derive(Clone, Debug)]
pub struct Evasion {
    pub hover_count: u32,
    pub click_attempts: u32,
    pub message: Option<&'static str>,
    pub position: EvasivePosition,
}

impl Evasion {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Evasion {
            hover_count: 0,
            click_attempts: 0,
            message: None,
            position: generate_position(0.0, rng),
        }
    }

    /// Pointer (or focus) reached the button: dodge with intensity = hovers.
    pub fn hover<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.hover_count = self.hover_count.saturating_add(1);
        self.position = generate_position(f64::from(self.hover_count), rng);
    }

    /// The button was actually pressed: taunt, then dodge harder.
    ///
    /// The message index follows clicks only, while the dodge intensity
    /// counts hovers and clicks together.
    pub fn click<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'static str {
        self.click_attempts = self.click_attempts.saturating_add(1);
        let message = MESSAGES[self.click_attempts as usize % MESSAGES.len()];
        self.message = Some(message);
        let intensity = f64::from(self.hover_count) + f64::from(self.click_attempts);
        self.position = generate_position(intensity, rng);
        message
    }

    pub fn intensity(&self) -> u32 {
        self.hover_count.saturating_add(self.click_attempts)
    }

    fn emphasized(&self) -> bool {
        self.click_attempts >= EMPHASIS_AFTER
    }

    pub fn yes_scale(&self) -> f64 {
        if self.emphasized() { YES_EMPHASIS_SCALE } else { 1.0 }
    }

    pub fn no_scale(&self) -> f64 {
        if self.emphasized() {
            self.position.scale * NO_EMPHASIS_FACTOR
        } else {
            self.position.scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    fn assert_in_bounds(p: &EvasivePosition) {
        assert!((15.0..=80.0).contains(&p.top), "top {}", p.top);
        assert!((12.0..=88.0).contains(&p.left), "left {}", p.left);
        assert!((0.65..=1.0).contains(&p.scale), "scale {}", p.scale);
        assert!((-14.0..=14.0).contains(&p.rotation), "rotation {}", p.rotation);
    }

    // ── generate_position ──

    #[test]
    fn zero_intensity_keeps_full_size() {
        let p = generate_position(0.0, &mut rng());
        assert_eq!(p.scale, 1.0);
        assert_in_bounds(&p);
    }

    #[test]
    fn huge_intensity_pins_to_corner() {
        let p = generate_position(10_000.0, &mut rng());
        assert_eq!(p.top, 80.0);
        assert_eq!(p.left, 12.0);
        assert_eq!(p.scale, 0.65);
    }

    #[test]
    fn scale_shrinks_linearly_before_floor() {
        let p = generate_position(5.0, &mut rng());
        assert!((p.scale - 0.8).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_position() {
        let a = generate_position(3.0, &mut rng());
        let b = generate_position(3.0, &mut rng());
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn position_always_clamped(intensity in 0.0f64..1.0e6, seed in any::<u64>()) {
            let p = generate_position(intensity, &mut StdRng::seed_from_u64(seed));
            prop_assert!((15.0..=80.0).contains(&p.top));
            prop_assert!((12.0..=88.0).contains(&p.left));
            prop_assert!((0.65..=1.0).contains(&p.scale));
        }

        #[test]
        fn any_interaction_sequence_stays_clamped(
            moves in proptest::collection::vec(any::<bool>(), 0..200),
            seed in any::<u64>(),
        ) {
            let mut r = StdRng::seed_from_u64(seed);
            let mut e = Evasion::new(&mut r);
            for is_click in moves {
                if is_click { e.click(&mut r); } else { e.hover(&mut r); }
                prop_assert!((15.0..=80.0).contains(&e.position.top));
                prop_assert!((12.0..=88.0).contains(&e.position.left));
                prop_assert!((0.65..=1.0).contains(&e.position.scale));
            }
        }
    }

    // ── Evasion ──

    #[test]
    fn starts_quiet() {
        let e = Evasion::new(&mut rng());
        assert_eq!(e.hover_count, 0);
        assert_eq!(e.click_attempts, 0);
        assert!(e.message.is_none());
        assert_eq!(e.position.scale, 1.0);
    }

    #[test]
    fn hover_uses_hover_count_as_intensity() {
        let mut r = rng();
        let mut e = Evasion::new(&mut r);
        for _ in 0..5 {
            e.hover(&mut r);
        }
        assert_eq!(e.hover_count, 5);
        assert!((e.position.scale - 0.8).abs() < 1e-9);
        assert!(e.message.is_none());
    }

    #[test]
    fn click_intensity_mixes_both_counters() {
        let mut r = rng();
        let mut e = Evasion::new(&mut r);
        e.hover(&mut r);
        e.hover(&mut r);
        e.click(&mut r);
        // 2 hovers + 1 click
        assert_eq!(e.intensity(), 3);
        assert!((e.position.scale - 0.88).abs() < 1e-9);
    }

    #[test]
    fn messages_cycle_by_click_count() {
        let mut r = rng();
        let mut e = Evasion::new(&mut r);
        for n in 1..=12u32 {
            let msg = e.click(&mut r);
            assert_eq!(msg, MESSAGES[n as usize % 5]);
            assert_eq!(e.message, Some(msg));
        }
    }

    #[test]
    fn first_click_skips_first_message() {
        let mut r = rng();
        let mut e = Evasion::new(&mut r);
        assert_eq!(e.click(&mut r), "That option seems unavailable");
    }

    #[test]
    fn hovers_do_not_advance_messages() {
        let mut r = rng();
        let mut e = Evasion::new(&mut r);
        e.click(&mut r);
        e.hover(&mut r);
        e.hover(&mut r);
        assert_eq!(e.message, Some(MESSAGES[1]));
    }

    #[test]
    fn emphasis_kicks_in_at_four_clicks() {
        let mut r = rng();
        let mut e = Evasion::new(&mut r);
        for _ in 0..3 {
            e.click(&mut r);
        }
        assert_eq!(e.yes_scale(), 1.0);
        assert_eq!(e.no_scale(), e.position.scale);

        e.click(&mut r);
        assert_eq!(e.yes_scale(), 1.08);
        assert!((e.no_scale() - e.position.scale * 0.9).abs() < 1e-12);
    }
}
