/// Invitation: the complete state of the running view.
///
/// ## Screens
///
///   `Landing`   question, Yes/No buttons, taunt line.
///   `Revealed`  countdown and event details.
///
/// The only transition is `Landing → Revealed` via `accept()`; nothing leads
/// back. Hover/click on "No" are ignored once revealed.
///
/// ## Timers
///
/// The countdown and backdrop timers are owned here and polled through
/// `advance()`. They run on both screens and stop when the view is dropped.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::background::BackgroundCycle;
use crate::domain::countdown::{Countdown, TimeLeft};
use crate::domain::evasion::Evasion;
use crate::domain::particles::HeartField;
use crate::sim::event::ViewEvent;
use crate::sim::timer::Interval;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Landing,
    Revealed,
}

#[derive(Clone, Debug)]
pub struct ViewSettings {
    pub heart_count: usize,
    pub seed: Option<u64>,
    pub countdown_period: Duration,
    pub background_period: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            heart_count: 18,
            seed: None,
            countdown_period: Duration::from_millis(1000),
            background_period: Duration::from_millis(5000),
        }
    }
}

pub struct Invitation {
    screen: Screen,
    pub evasion: Evasion,
    pub countdown: Countdown,
    pub background: BackgroundCycle,
    pub hearts: HeartField,
    rng: StdRng,
    countdown_timer: Interval,
    background_timer: Interval,
}

impl Invitation {
    pub fn new(
        settings: &ViewSettings,
        target: DateTime<FixedOffset>,
        wall_now: DateTime<FixedOffset>,
        started: Instant,
    ) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let evasion = Evasion::new(&mut rng);
        let hearts = HeartField::new(settings.heart_count, &mut rng);
        Invitation {
            screen: Screen::Landing,
            evasion,
            countdown: Countdown::new(target, wall_now),
            background: BackgroundCycle::default(),
            hearts,
            rng,
            countdown_timer: Interval::new(settings.countdown_period, started),
            background_timer: Interval::new(settings.background_period, started),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn accepted(&self) -> bool {
        self.screen == Screen::Revealed
    }

    pub fn time_left(&self) -> TimeLeft {
        self.countdown.remaining()
    }

    /// "Yes". Returns the event only on the actual transition.
    pub fn accept(&mut self) -> Option<ViewEvent> {
        if self.accepted() {
            return None;
        }
        self.screen = Screen::Revealed;
        Some(ViewEvent::Accepted)
    }

    /// Pointer or focus reached "No".
    pub fn hover_no(&mut self) -> Option<ViewEvent> {
        if self.accepted() {
            return None;
        }
        self.evasion.hover(&mut self.rng);
        Some(ViewEvent::NoDodged { hover_count: self.evasion.hover_count })
    }

    /// "No" was pressed anyway.
    pub fn click_no(&mut self) -> Option<ViewEvent> {
        if self.accepted() {
            return None;
        }
        let message = self.evasion.click(&mut self.rng);
        Some(ViewEvent::NoClicked { attempts: self.evasion.click_attempts, message })
    }

    /// Fire whichever timers are due.
    pub fn advance(&mut self, now: Instant, wall_now: DateTime<FixedOffset>) -> Vec<ViewEvent> {
        let mut events = Vec::new();

        if self.countdown_timer.poll(now) > 0 {
            let was_finished = self.countdown.is_finished();
            self.countdown.refresh(wall_now);
            if !was_finished && self.countdown.is_finished() {
                events.push(ViewEvent::CountdownFinished);
            }
        }

        for _ in 0..self.background_timer.poll(now) {
            let index = self.background.advance();
            events.push(ViewEvent::BackgroundChanged { index });
        }

        events
    }
}
