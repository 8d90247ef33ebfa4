/// Background-music state: autoplay on mount, manual play/pause, and the
/// hint shown when playback was refused.
///
/// Playback going wrong is expected (no device, no file, autoplay turned off),
/// so every attempt yields a `Result` and the worst outcome is a hint line.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_VOLUME: f32 = 0.35;

pub const AUTOPLAY_HINT: &str = "If you don't hear music, press M to start it.";
pub const RETRY_HINT: &str = "Press M again to allow music to play.";

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("cannot open track {path}: {source}")]
    Track {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode track: {0}")]
    Decode(String),
    #[error("autoplay is disabled")]
    AutoplayBlocked,
    #[error("built without sound support")]
    Unavailable,
}

/// A media sink the controller can drive.
pub trait Playback {
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
}

/// Stand-in used when no real player could be opened: every play attempt
/// reports the same failure again.
pub struct Silent {
    reason: Box<dyn Fn() -> PlaybackError>,
}

impl Silent {
    pub fn new(reason: impl Fn() -> PlaybackError + 'static) -> Self {
        Silent { reason: Box::new(reason) }
    }
}

impl Playback for Silent {
    fn set_volume(&mut self, _volume: f32) {}
    fn play(&mut self) -> Result<(), PlaybackError> {
        Err((self.reason)())
    }
    fn pause(&mut self) {}
    fn is_paused(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioState {
    pub is_playing: bool,
    pub hint: Option<&'static str>,
}

pub struct AudioController {
    player: Box<dyn Playback>,
    volume: f32,
    autoplay: bool,
    state: AudioState,
}

impl AudioController {
    pub fn new(player: Box<dyn Playback>, volume: f32, autoplay: bool) -> Self {
        AudioController {
            player,
            volume,
            autoplay,
            state: AudioState::default(),
        }
    }

    pub fn state(&self) -> &AudioState {
        &self.state
    }

    /// First attempt, made once when the view comes up.
    pub fn mount(&mut self) -> &AudioState {
        self.player.set_volume(self.volume);
        let outcome = if self.autoplay {
            self.player.play()
        } else {
            Err(PlaybackError::AutoplayBlocked)
        };
        match outcome {
            Ok(()) => {
                info!(volume = self.volume, "background music started");
                self.state.is_playing = true;
            }
            Err(e) => {
                warn!(error = %e, "autoplay failed");
                self.state.is_playing = false;
                self.state.hint = Some(AUTOPLAY_HINT);
            }
        }
        &self.state
    }

    /// The play/pause control.
    pub fn toggle(&mut self) -> &AudioState {
        if self.player.is_paused() {
            match self.player.play() {
                Ok(()) => {
                    info!("background music resumed");
                    self.state.is_playing = true;
                    self.state.hint = None;
                }
                Err(e) => {
                    warn!(error = %e, "manual play failed");
                    self.state.hint = Some(RETRY_HINT);
                }
            }
        } else {
            self.player.pause();
            info!("background music paused");
            self.state.is_playing = false;
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Scripted player: pops one outcome per play() call.
    #[derive(Default)]
    struct Script {
        outcomes: Vec<bool>,
        paused: bool,
        volume: Option<f32>,
        plays: u32,
    }

    struct Fake(Rc<RefCell<Script>>);

    impl Playback for Fake {
        fn set_volume(&mut self, volume: f32) {
            self.0.borrow_mut().volume = Some(volume);
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            let mut s = self.0.borrow_mut();
            s.plays += 1;
            let ok = if s.outcomes.is_empty() { true } else { s.outcomes.remove(0) };
            if ok {
                s.paused = false;
                Ok(())
            } else {
                Err(PlaybackError::NoDevice("test".into()))
            }
        }
        fn pause(&mut self) {
            self.0.borrow_mut().paused = true;
        }
        fn is_paused(&self) -> bool {
            self.0.borrow().paused
        }
    }

    fn controller(outcomes: &[bool], autoplay: bool) -> (AudioController, Rc<RefCell<Script>>) {
        let script = Rc::new(RefCell::new(Script {
            outcomes: outcomes.to_vec(),
            paused: true,
            ..Script::default()
        }));
        let ctl = AudioController::new(Box::new(Fake(script.clone())), DEFAULT_VOLUME, autoplay);
        (ctl, script)
    }

    #[test]
    fn autoplay_success_plays_without_hint() {
        let (mut ctl, script) = controller(&[true], true);
        let st = ctl.mount().clone();
        assert_eq!(st, AudioState { is_playing: true, hint: None });
        assert_eq!(script.borrow().volume, Some(0.35));
    }

    #[test]
    fn autoplay_failure_sets_hint() {
        let (mut ctl, _) = controller(&[false], true);
        let st = ctl.mount().clone();
        assert!(!st.is_playing);
        assert_eq!(st.hint, Some(AUTOPLAY_HINT));
    }

    #[test]
    fn disabled_autoplay_never_touches_player() {
        let (mut ctl, script) = controller(&[], false);
        ctl.mount();
        assert_eq!(script.borrow().plays, 0);
        assert_eq!(ctl.state().hint, Some(AUTOPLAY_HINT));
        // Volume is still applied for the later manual play.
        assert_eq!(script.borrow().volume, Some(0.35));
    }

    #[test]
    fn toggle_after_blocked_autoplay_clears_hint() {
        let (mut ctl, _) = controller(&[false, true], true);
        ctl.mount();
        let st = ctl.toggle().clone();
        assert_eq!(st, AudioState { is_playing: true, hint: None });
    }

    #[test]
    fn repeated_failure_switches_hint() {
        let (mut ctl, _) = controller(&[false, false], true);
        ctl.mount();
        let st = ctl.toggle().clone();
        assert!(!st.is_playing);
        assert_eq!(st.hint, Some(RETRY_HINT));
    }

    #[test]
    fn toggle_pauses_when_playing() {
        let (mut ctl, script) = controller(&[true], true);
        ctl.mount();
        let st = ctl.toggle().clone();
        assert!(!st.is_playing);
        assert!(script.borrow().paused);
        assert_eq!(script.borrow().plays, 1);

        let st = ctl.toggle().clone();
        assert!(st.is_playing);
        assert_eq!(script.borrow().plays, 2);
    }

    #[test]
    fn silent_player_always_fails() {
        let mut ctl = AudioController::new(
            Box::new(Silent::new(|| PlaybackError::Unavailable)),
            DEFAULT_VOLUME,
            true,
        );
        assert_eq!(ctl.mount().hint, Some(AUTOPLAY_HINT));
        assert_eq!(ctl.toggle().hint, Some(RETRY_HINT));
        assert!(!ctl.state().is_playing);
    }
}
