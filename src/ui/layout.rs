/// Screen geometry shared by the renderer and pointer hit-testing.
///
/// Everything is in terminal cells. The "No" button's percentage position is
/// mapped into the button area and clamped so it never leaves it.

use crate::domain::evasion::Evasion;

pub const CARD_MAX_W: usize = 76;
pub const LANDING_CARD_H: usize = 18;
pub const AREA_TOP: usize = 5;
pub const AREA_H: usize = 10;
pub const BUTTON_H: usize = 3;

const YES_BASE_W: f64 = 11.0;
const NO_BASE_W: f64 = 10.0;
const NO_MIN_W: usize = 6;

/// Horizontal center of "Yes" inside the button area, percent.
const YES_LEFT: f64 = 35.0;
const YES_TOP: f64 = 50.0;

/// Rotation beyond this many degrees draws the button slanted.
const TILT_DEGREES: f64 = 7.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn contains(&self, col: usize, row: usize) -> bool {
        col >= self.x && col < self.x + self.w && row >= self.y && row < self.y + self.h
    }

    pub fn right(&self) -> usize {
        self.x + self.w
    }

    pub fn bottom(&self) -> usize {
        self.y + self.h
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub card: Rect,
    pub area: Rect,
    pub yes: Rect,
    pub no: Rect,
    /// -1, 0 or 1: which way the "No" button leans.
    pub no_tilt: i8,
    pub music: Rect,
}

/// Centered card, as wide as the terminal allows up to `CARD_MAX_W`.
pub fn card(term_w: usize, term_h: usize, height: usize) -> Rect {
    let w = term_w.saturating_sub(4).min(CARD_MAX_W).max(1);
    let h = height.min(term_h.saturating_sub(2)).max(1);
    Rect {
        x: (term_w.saturating_sub(w)) / 2,
        y: (term_h.saturating_sub(h)) / 2,
        w,
        h,
    }
}

pub fn music_label(is_playing: bool) -> &'static str {
    if is_playing { "♪ Pause music" } else { "♪ Play music" }
}

/// Bottom-left music control.
pub fn music_button(term_w: usize, term_h: usize, is_playing: bool) -> Rect {
    let w = (music_label(is_playing).chars().count() + 4).min(term_w);
    Rect { x: 1.min(term_w), y: term_h.saturating_sub(2), w, h: 1 }
}

/// Button of width `w` centered at (`left`%, `top`%) of `area`, kept inside it.
fn place(area: &Rect, left: f64, top: f64, w: usize) -> Rect {
    let w = w.min(area.w).max(1);
    let h = BUTTON_H.min(area.h).max(1);
    let cx = area.x as f64 + area.w as f64 * left / 100.0;
    let cy = area.y as f64 + area.h as f64 * top / 100.0;
    let x = (cx - w as f64 / 2.0).round().max(area.x as f64) as usize;
    let y = (cy - h as f64 / 2.0).round().max(area.y as f64) as usize;
    Rect {
        x: x.min(area.right() - w),
        y: y.min(area.bottom() - h),
        w,
        h,
    }
}

impl Layout {
    pub fn landing(term_w: usize, term_h: usize, evasion: &Evasion, is_playing: bool) -> Self {
        let card = card(term_w, term_h, LANDING_CARD_H);
        let area = Rect {
            x: card.x + 2,
            y: card.y + AREA_TOP,
            w: card.w.saturating_sub(4).max(1),
            h: AREA_H,
        };

        let yes_w = (YES_BASE_W * evasion.yes_scale()).round() as usize;
        let yes = place(&area, YES_LEFT, YES_TOP, yes_w);

        let no_w = ((NO_BASE_W * evasion.no_scale()).round() as usize).max(NO_MIN_W);
        let pos = evasion.position;
        let no = place(&area, pos.left, pos.top, no_w);
        let no_tilt = if pos.rotation > TILT_DEGREES {
            1
        } else if pos.rotation < -TILT_DEGREES {
            -1
        } else {
            0
        };

        Layout {
            card,
            area,
            yes,
            no,
            no_tilt,
            music: music_button(term_w, term_h, is_playing),
        }
    }
}
