/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every cell carries an explicit RGB background: the backdrop gradient is
/// painted first, then hearts, then the translucent card and its contents.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::EventDetails;
use crate::domain::background::Rgb;
use crate::sim::audio::AudioState;
use crate::sim::view::{Invitation, Screen};
use crate::ui::input::Focus;
use crate::ui::layout::{self, Layout, Rect, AREA_H, AREA_TOP};

// ── Palette ──

const WHITE: Rgb = Rgb::new(255, 255, 255);
const BLACK: Rgb = Rgb::new(0, 0, 0);
const PINK: Rgb = Rgb::new(255, 182, 193);
const HOT_PINK: Rgb = Rgb::new(255, 77, 141);
const HEART: Rgb = Rgb::new(255, 105, 180);
const SOFT: Rgb = Rgb::new(240, 200, 215);
const DIM: Rgb = Rgb::new(200, 165, 188);
const PLUM: Rgb = Rgb::new(92, 58, 92);
const PLUM_TEXT: Rgb = Rgb::new(230, 216, 230);

const REVEAL_MIN_TWO_COLUMNS: usize = 64;
const BLOCK_W: usize = 10;
const BLOCK_GAP: usize = 2;
const POSTER_H: usize = 4;

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

/// Emoji and CJK take two terminal columns.
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0x1F300..=0x1FAFF)
}

fn text_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
    bold: bool,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    const BASE_BG: Rgb = Rgb::new(0x2b, 0x0f, 0x2f);

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: WHITE,
        bg: Cell::BASE_BG,
        bold: false,
        wide: false,
        cont: false,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Rgb::new(255, 0, 255),
        bg: Rgb::new(255, 0, 255),
        bold: true,
        wide: false,
        cont: true,
    };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            Some(&mut self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Blend the background of every cell in `rect` toward `tint`.
    fn tint(&mut self, rect: Rect, tint: Rgb, t: f32) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.bg = cell.bg.mix(tint, t);
                }
            }
        }
    }

    fn fill(&mut self, rect: Rect, bg: Rgb) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    *cell = Cell { bg, ..Cell::BLANK };
                }
            }
        }
    }

    /// Write a glyph over the existing background.
    fn put_char(&mut self, x: usize, y: usize, ch: char, fg: Rgb, bold: bool) {
        let wide = is_wide(ch);
        if wide && x + 1 >= self.width {
            return;
        }
        if let Some(cell) = self.get_mut(x, y) {
            *cell = Cell { ch, fg, bg: cell.bg, bold, wide, cont: false };
        } else {
            return;
        }
        if wide {
            if let Some(next) = self.get_mut(x + 1, y) {
                *next = Cell { ch: ' ', fg, bg: next.bg, bold, wide: false, cont: true };
            }
        }
    }

    /// Write a string at (x, y) over the existing background.
    /// Stops at `limit` (exclusive column).
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Rgb, bold: bool, limit: usize) {
        let limit = limit.min(self.width);
        let mut cx = x;
        for ch in s.chars() {
            let w = if is_wide(ch) { 2 } else { 1 };
            if cx + w > limit { break; }
            self.put_char(cx, y, ch, fg, bold);
            cx += w;
        }
    }

    fn put_centered(&mut self, rect: Rect, y: usize, s: &str, fg: Rgb, bold: bool) {
        let w = text_width(s);
        let x = rect.x + rect.w.saturating_sub(w) / 2;
        self.put_str(x, y, s, fg, bold, rect.right());
    }

    /// Rounded box outline.
    fn frame(&mut self, rect: Rect, fg: Rgb) {
        if rect.w < 2 || rect.h < 2 {
            return;
        }
        let (r, b) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x + 1..r {
            self.put_char(x, rect.y, '─', fg, false);
            self.put_char(x, b, '─', fg, false);
        }
        for y in rect.y + 1..b {
            self.put_char(rect.x, y, '│', fg, false);
            self.put_char(r, y, '│', fg, false);
        }
        self.put_char(rect.x, rect.y, '╭', fg, false);
        self.put_char(r, rect.y, '╮', fg, false);
        self.put_char(rect.x, b, '╰', fg, false);
        self.put_char(r, b, '╯', fg, false);
    }
}

/// Everything the renderer needs for one frame.
pub struct Frame<'a> {
    pub view: &'a Invitation,
    pub audio: &'a AudioState,
    pub event: &'a EventDetails,
    pub focus: Option<Focus>,
    /// Seconds since the view came up; drives the hearts.
    pub elapsed: f64,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(32768, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(color(Cell::BASE_BG)),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            SetAttribute(Attribute::Reset),
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Terminal size as of the last init/render.
    pub fn size(&self) -> (usize, usize) {
        (self.term_w, self.term_h)
    }

    pub fn render(&mut self, frame: &Frame) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(color(Cell::BASE_BG)), Clear(ClearType::All))?;
        }

        // Screen change → repaint everything for a clean transition
        let screen = frame.view.screen();
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            self.last_screen = Some(screen);
        }

        self.compose_backdrop(frame.view);
        self.compose_hearts(frame);
        match screen {
            Screen::Landing => self.compose_landing(frame),
            Screen::Revealed => self.compose_reveal(frame),
        }
        self.compose_music_button(frame);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = WHITE;
        let mut last_bg = Cell::BASE_BG;
        let mut last_bold = false;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetAttribute(Attribute::NormalIntensity),
            SetForegroundColor(color(last_fg)),
            SetBackgroundColor(color(last_bg)),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide glyphs)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.bold != last_bold {
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(color(cell.fg)))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(color(cell.bg)))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                if cell.wide {
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_backdrop(&mut self, view: &Invitation) {
        let backdrop = view.background.backdrop();
        let (w, h) = (self.front.width, self.front.height);
        let sx = w.saturating_sub(1).max(1) as f32;
        let sy = h.saturating_sub(1).max(1) as f32;
        for y in 0..h {
            for x in 0..w {
                let bg = backdrop.color_at(x as f32 / sx, y as f32 / sy);
                self.front.cells[y * w + x] = Cell { bg, ..Cell::BLANK };
            }
        }
    }

    fn compose_hearts(&mut self, frame: &Frame) {
        let (w, h) = (self.front.width, self.front.height);
        if w == 0 || h == 0 {
            return;
        }
        for heart in &frame.view.hearts.hearts {
            let (left, top) = heart.position_at(frame.elapsed);
            let x = ((left / 100.0) * w as f64) as usize;
            let y = ((top / 100.0) * h as f64) as usize;
            let bg = self.front.get(x, y).bg;
            let fg = bg.mix(HEART, heart.opacity as f32);
            let glyph = if heart.is_large() { '♥' } else { '♡' };
            self.front.put_char(x, y, glyph, fg, false);
        }
    }

    /// Translucent card with a soft outline.
    fn glass(&mut self, card: Rect) {
        self.front.tint(card, WHITE, 0.10);
        self.front.frame(card, PINK.mix(WHITE, 0.2));
    }

    fn compose_landing(&mut self, frame: &Frame) {
        let l = Layout::landing(self.term_w, self.term_h, &frame.view.evasion, frame.audio.is_playing);
        let card = l.card;
        self.glass(card);

        self.front.put_centered(card, card.y + 2, "An earnest inquiry, delivered with mischief", SOFT, false);
        self.front.put_centered(card, card.y + 3, "Will you be my Valentine?", WHITE, true);

        let focus = frame.focus;
        self.draw_button(l.yes, "Yes", HOT_PINK, WHITE, focus == Some(Focus::Yes), 0);
        // Drawn after "Yes" so it sits on top where they overlap.
        self.draw_button(l.no, "No", PLUM, PLUM_TEXT, focus == Some(Focus::No), l.no_tilt);

        let below = card.y + AREA_TOP + AREA_H;
        if let Some(msg) = frame.view.evasion.message {
            self.front.put_centered(card, below, msg, Rgb::new(255, 214, 230), true);
        }
        if let Some(hint) = frame.audio.hint {
            self.front.put_centered(card, below + 1, hint, DIM, false);
        }
    }

    /// Three-row button; `tilt` slides the top and bottom edges in opposite
    /// directions so it looks rotated.
    fn draw_button(&mut self, rect: Rect, label: &str, fill: Rgb, fg: Rgb, focused: bool, tilt: i8) {
        let edge = if focused { WHITE } else { fill.mix(WHITE, 0.35) };
        let shift = |x: usize, by: i8| -> usize {
            if by < 0 { x.saturating_sub(by.unsigned_abs() as usize) } else { x + by as usize }
        };

        if rect.h < 3 || rect.w < 2 {
            self.front.fill(rect, fill);
            self.front.put_centered(rect, rect.y, label, fg, true);
            return;
        }

        let top = Rect { x: shift(rect.x, tilt), y: rect.y, w: rect.w, h: 1 };
        let mid = Rect { x: rect.x, y: rect.y + 1, w: rect.w, h: 1 };
        let bottom = Rect { x: shift(rect.x, -tilt), y: rect.y + 2, w: rect.w, h: 1 };
        for row in [top, mid, bottom] {
            self.front.fill(row, fill);
        }

        let r = rect.w - 1;
        for i in 1..r {
            self.front.put_char(top.x + i, top.y, '▀', edge, focused);
            self.front.put_char(bottom.x + i, bottom.y, '▄', edge, focused);
        }
        self.front.put_char(top.x, top.y, '▗', edge, focused);
        self.front.put_char(top.x + r, top.y, '▖', edge, focused);
        self.front.put_char(bottom.x, bottom.y, '▝', edge, focused);
        self.front.put_char(bottom.x + r, bottom.y, '▘', edge, focused);
        self.front.put_centered(mid, mid.y, label, fg, true);
        if focused && rect.w >= text_width(label) + 4 {
            let x = mid.x + (mid.w - text_width(label)) / 2;
            self.front.put_char(x - 2, mid.y, '▸', WHITE, true);
        }
    }

    fn compose_reveal(&mut self, frame: &Frame) {
        let event = frame.event;
        let outer = layout::card(self.term_w, self.term_h, usize::MAX);
        let inner_w = outer.w.saturating_sub(6).max(1);
        let two_columns = outer.w >= REVEAL_MIN_TWO_COLUMNS;
        let col_w = if two_columns { inner_w.saturating_sub(3) / 2 } else { inner_w };

        let instructions: Vec<Vec<String>> = event
            .instructions
            .iter()
            .map(|item| wrap(item, col_w.saturating_sub(4)))
            .collect();
        let note = wrap(&format!("Note: {}", event.note), inner_w);

        let feature_h = 4 + POSTER_H;
        let steps_h = 2 + instructions.iter().map(Vec::len).sum::<usize>();
        let sections_h = if two_columns { feature_h.max(steps_h) } else { feature_h + 1 + steps_h };
        let finished = frame.view.countdown.is_finished();
        // border, headline, gap, blocks, finish line, gap, sections, gap, note, border
        let height = 1 + 1 + 1 + 3 + 1 + 1 + sections_h + 1 + note.len() + 1;

        let card = layout::card(self.term_w, self.term_h, height);
        self.glass(card);
        let body = Rect { x: card.x + 3, y: card.y + 1, w: inner_w, h: card.h.saturating_sub(2) };

        // ── Countdown ──
        self.front.put_centered(body, body.y, &event.headline, PINK, true);
        let left = frame.view.time_left();
        let blocks = [
            (left.days, "Days"),
            (left.hours, "Hours"),
            (left.minutes, "Minutes"),
            (left.seconds, "Seconds"),
        ];
        let row_w = blocks.len() * BLOCK_W + (blocks.len() - 1) * BLOCK_GAP;
        let mut bx = body.x + body.w.saturating_sub(row_w) / 2;
        let by = body.y + 2;
        for (value, label) in blocks {
            let block = Rect { x: bx, y: by, w: BLOCK_W, h: 3 };
            self.front.tint(block, BLACK, 0.30);
            self.front.put_centered(block, by + 1, &format!("{:02}", value), WHITE, true);
            self.front.put_centered(block, by + 2, label, DIM, false);
            bx += BLOCK_W + BLOCK_GAP;
        }
        if finished {
            self.front.put_centered(body, by + 3, "It's time! ♥", HOT_PINK, true);
        }

        // ── Sections ──
        let sy = by + 5;
        let feature = Rect { x: body.x, y: sy, w: col_w, h: feature_h };
        let steps = if two_columns {
            Rect { x: body.x + col_w + 3, y: sy, w: col_w, h: steps_h }
        } else {
            Rect { x: body.x, y: sy + feature_h + 1, w: col_w, h: steps_h }
        };

        self.pill(feature.x, feature.y, "Feature Presentation", feature.right());
        self.front.put_str(feature.x, feature.y + 1, &event.title, WHITE, true, feature.right());
        let when = frame.view.countdown.target().format("%B %-d • %-I:%M %p").to_string();
        self.front.put_str(feature.x, feature.y + 2, &when, SOFT, false, feature.right());
        let poster = Rect { x: feature.x, y: feature.y + 4, w: col_w.min(34), h: POSTER_H };
        self.front.tint(poster, BLACK, 0.25);
        self.front.frame(poster, DIM);
        let poster_name = event
            .poster
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let caption = if event.poster.exists() { "poster" } else { "poster missing" };
        let inside = Rect { x: poster.x + 1, y: poster.y, w: poster.w.saturating_sub(2), h: poster.h };
        self.front.put_centered(inside, poster.y + 1, &format!("▣ {}", poster_name), SOFT, false);
        self.front.put_centered(inside, poster.y + 2, caption, DIM, false);

        self.pill(steps.x, steps.y, "Proceedings & Etiquette", steps.right());
        let mut row = steps.y + 2;
        for (i, lines) in instructions.iter().enumerate() {
            for (j, line) in lines.iter().enumerate() {
                if j == 0 {
                    self.front.put_str(steps.x, row, &format!("{}.", i + 1), PINK, true, steps.right());
                }
                self.front.put_str(steps.x + 4, row, line, WHITE, false, steps.right());
                row += 1;
            }
        }

        // ── Memo ──
        let memo_y = sy + sections_h + 1;
        for (i, line) in note.iter().enumerate() {
            let y = memo_y + i;
            if i == 0 {
                if let Some(rest) = line.strip_prefix("Note:") {
                    self.front.put_str(body.x, y, "Note:", HOT_PINK, true, body.right());
                    self.front.put_str(body.x + 5, y, rest, SOFT, false, body.right());
                    continue;
                }
            }
            self.front.put_str(body.x, y, line, SOFT, false, body.right());
        }
    }

    fn pill(&mut self, x: usize, y: usize, text: &str, limit: usize) {
        let label = format!(" {} ", text);
        let rect = Rect { x, y, w: text_width(&label).min(limit.saturating_sub(x)), h: 1 };
        self.front.tint(rect, HOT_PINK, 0.45);
        self.front.put_str(x, y, &label, WHITE, true, limit);
    }

    fn compose_music_button(&mut self, frame: &Frame) {
        let rect = layout::music_button(self.term_w, self.term_h, frame.audio.is_playing);
        let focused = frame.focus == Some(Focus::Music);
        self.front.tint(rect, BLACK, 0.35);
        let label = format!("[ {} ]", layout::music_label(frame.audio.is_playing));
        let fg = if focused { WHITE } else { SOFT };
        self.front.put_str(rect.x, rect.y, &label, fg, focused, rect.right());
    }
}
