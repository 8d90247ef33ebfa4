/// Entry point and frame loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::Instant;

use chrono::Local;
use tracing::{debug, error, info, warn};

use config::AppConfig;
use domain::countdown::target_instant;
use sim::audio::{AudioController, Playback, PlaybackError, Silent};
use sim::event::ViewEvent;
use sim::view::Invitation;
use ui::input::{Action, Controls, InputState};
use ui::layout::Layout;
use ui::renderer::{Frame, Renderer};
use ui::sound::MusicPlayer;

fn main() {
    let config = AppConfig::load();
    let _log_guard = logging::init(&config.logging);

    let wall_now = Local::now();
    let target = target_instant(&wall_now, config.occasion);
    info!(%target, "valentine view starting");

    let started = Instant::now();
    let mut view = Invitation::new(&config.view, target.fixed_offset(), wall_now.fixed_offset(), started);
    debug!(hearts = view.hearts.len(), remaining = ?view.time_left(), "view mounted");

    let mut audio = AudioController::new(open_player(&config), config.audio.volume, config.audio.autoplay);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    audio.mount();

    let result = frame_loop(&mut view, &mut audio, &mut renderer, &config, started);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "frame loop failed");
        eprintln!("Error: {e}");
    }

    println!();
    if view.accepted() {
        let when = view.countdown.target().format("%B %-d at %-I:%M %p");
        println!("It's a date! See you {when}. ♥");
    } else {
        println!("The question still stands. ♥");
    }
}

/// A real player when an output device exists, otherwise one that keeps
/// reporting why it cannot play.
fn open_player(config: &AppConfig) -> Box<dyn Playback> {
    match MusicPlayer::open(config.audio.track.clone()) {
        Ok(player) => Box::new(player),
        Err(PlaybackError::Unavailable) => Box::new(Silent::new(|| PlaybackError::Unavailable)),
        Err(e) => {
            warn!(error = %e, "music player unavailable");
            let reason = e.to_string();
            Box::new(Silent::new(move || PlaybackError::NoDevice(reason.clone())))
        }
    }
}

fn frame_loop(
    view: &mut Invitation,
    audio: &mut AudioController,
    renderer: &mut Renderer,
    config: &AppConfig,
    started: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let mut controls = Controls::new();

    loop {
        input.drain_events();

        if input.ctrl_c_pressed() {
            break;
        }

        let (tw, th) = renderer.size();
        let layout = Layout::landing(tw, th, &view.evasion, audio.state().is_playing);
        for action in controls.translate(&input, &layout, view.screen()) {
            let event = match action {
                Action::Quit => return Ok(()),
                Action::Accept => view.accept(),
                Action::HoverNo => view.hover_no(),
                Action::ClickNo => view.click_no(),
                Action::ToggleMusic => {
                    audio.toggle();
                    None
                }
            };
            if let Some(event) = event {
                log_event(view, &event);
            }
        }

        for event in view.advance(Instant::now(), Local::now().fixed_offset()) {
            log_event(view, &event);
        }

        renderer.render(&Frame {
            view: &*view,
            audio: audio.state(),
            event: &config.event,
            focus: controls.focus(),
            elapsed: started.elapsed().as_secs_f64(),
        })?;
        std::thread::sleep(config.frame);
    }

    Ok(())
}

fn log_event(view: &Invitation, event: &ViewEvent) {
    match event {
        ViewEvent::Accepted => info!(
            hovers = view.evasion.hover_count,
            attempts = view.evasion.click_attempts,
            "invitation accepted"
        ),
        ViewEvent::NoDodged { hover_count } => {
            debug!(hover_count, position = ?view.evasion.position, "no button dodged")
        }
        ViewEvent::NoClicked { attempts, message } => {
            debug!(attempts, message, intensity = view.evasion.intensity(), "no button clicked")
        }
        ViewEvent::BackgroundChanged { index } => debug!(index, "backdrop rotated"),
        ViewEvent::CountdownFinished => info!("countdown reached zero"),
    }
}
