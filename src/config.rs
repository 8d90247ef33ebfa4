/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::countdown::Occasion;
use crate::sim::audio::DEFAULT_VOLUME;
use crate::sim::view::ViewSettings;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub frame: Duration,
    pub view: ViewSettings,
    pub occasion: Occasion,
    pub audio: AudioConfig,
    pub event: EventDetails,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct AudioConfig {
    pub track: PathBuf,
    pub volume: f32,
    pub autoplay: bool,
}

/// Everything printed on the reveal screen besides the countdown.
#[derive(Clone, Debug)]
pub struct EventDetails {
    pub headline: String,
    pub title: String,
    pub poster: PathBuf,
    pub instructions: Vec<String>,
    pub note: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    /// `None` disables the log file.
    pub file: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    occasion: TomlOccasion,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    event: TomlEvent,
    #[serde(default)]
    hearts: TomlHearts,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_countdown_ms")]
    countdown_ms: u64,
    #[serde(default = "default_background_ms")]
    background_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlOccasion {
    #[serde(default = "default_month")]
    month: u32,
    #[serde(default = "default_day")]
    day: u32,
    #[serde(default = "default_hour")]
    hour: u32,
    #[serde(default)]
    minute: u32,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_track")]
    track: String,
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default = "default_true")]
    autoplay: bool,
}

#[derive(Deserialize, Debug)]
struct TomlEvent {
    #[serde(default = "default_headline")]
    headline: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_poster")]
    poster: String,
    #[serde(default = "default_instructions")]
    instructions: Vec<String>,
    #[serde(default = "default_note")]
    note: String,
}

#[derive(Deserialize, Debug)]
struct TomlHearts {
    #[serde(default = "default_heart_count")]
    count: usize,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_level")]
    level: String,
    #[serde(default = "default_log_file")]
    file: String,
}

// ── Defaults ──

fn default_assets_dir() -> String { "assets".into() }
fn default_frame_ms() -> u64 { 16 }
fn default_countdown_ms() -> u64 { 1000 }
fn default_background_ms() -> u64 { 5000 }
fn default_month() -> u32 { Occasion::DATE_NIGHT.month }
fn default_day() -> u32 { Occasion::DATE_NIGHT.day }
fn default_hour() -> u32 { Occasion::DATE_NIGHT.hour }
fn default_track() -> String { "bg-music.mp3".into() }
fn default_volume() -> f32 { DEFAULT_VOLUME }
fn default_true() -> bool { true }
fn default_heart_count() -> usize { 18 }
fn default_level() -> String { "info".into() }
fn default_log_file() -> String { "valentine.log".into() }

fn default_headline() -> String { "Until Our Movie Date Begins".into() }
fn default_title() -> String { "Suzume".into() }
fn default_poster() -> String { "suzume-movie.jpg".into() }
fn default_note() -> String {
    "For dinner, please place your Jollibee order with your Valentine and anticipate \
     its arrival at approximately 8:40 PM. Kindly declare your desired meal 12 hours \
     prior, meaning you are required to inform me of your selection in the morning. :>"
        .into()
}
fn default_instructions() -> Vec<String> {
    vec![
        "Download the movie from Amazon Prime in advance.".into(),
        "Expect a call from your Valentine by 8:50 PM on the appointed date.".into(),
        "The motion picture runs 2 hours and 2 minutes. We shall reconvene via brief \
         calls at: 45:00 and 1:30:00."
            .into(),
        "After the conclusion of the film, we shall reconvene one final time.".into(),
        "This methodology safeguards us from the clutches of unreliable internet connections."
            .into(),
    ]
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            assets_dir: default_assets_dir(),
            seed: None,
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            countdown_ms: default_countdown_ms(),
            background_ms: default_background_ms(),
        }
    }
}

impl Default for TomlOccasion {
    fn default() -> Self {
        TomlOccasion {
            month: default_month(),
            day: default_day(),
            hour: default_hour(),
            minute: 0,
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio {
            track: default_track(),
            volume: default_volume(),
            autoplay: true,
        }
    }
}

impl Default for TomlEvent {
    fn default() -> Self {
        TomlEvent {
            headline: default_headline(),
            title: default_title(),
            poster: default_poster(),
            instructions: default_instructions(),
            note: default_note(),
        }
    }
}

impl Default for TomlHearts {
    fn default() -> Self {
        TomlHearts { count: default_heart_count() }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging {
            level: default_level(),
            file: default_log_file(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::resolve(toml_cfg, &search_dirs)
    }

    /// Parse a config document directly, searching `search_dirs` for assets.
    #[cfg(test)]
    fn parse_str(text: &str, search_dirs: &[PathBuf]) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::resolve(toml_cfg, search_dirs))
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let assets_dir = resolve_dir(&toml_cfg.general.assets_dir, search_dirs);

        let occasion = Occasion {
            month: toml_cfg.occasion.month,
            day: toml_cfg.occasion.day,
            hour: toml_cfg.occasion.hour,
            minute: toml_cfg.occasion.minute,
        };
        let occasion = if occasion.is_valid() {
            occasion
        } else {
            eprintln!("Warning: [occasion] {:?} is not a real date/time.", occasion);
            eprintln!("Using February 13, 21:00.");
            Occasion::DATE_NIGHT
        };

        let log_file = toml_cfg.logging.file.trim();
        let log_file = if log_file.is_empty() {
            None
        } else if Path::new(log_file).is_absolute() {
            Some(PathBuf::from(log_file))
        } else {
            Some(std::env::temp_dir().join(log_file))
        };

        AppConfig {
            frame: Duration::from_millis(toml_cfg.general.frame_ms.max(1)),
            view: ViewSettings {
                heart_count: toml_cfg.hearts.count,
                seed: toml_cfg.general.seed,
                countdown_period: Duration::from_millis(toml_cfg.timing.countdown_ms),
                background_period: Duration::from_millis(toml_cfg.timing.background_ms),
            },
            occasion,
            audio: AudioConfig {
                track: assets_dir.join(&toml_cfg.audio.track),
                volume: toml_cfg.audio.volume.clamp(0.0, 1.0),
                autoplay: toml_cfg.audio.autoplay,
            },
            event: EventDetails {
                headline: toml_cfg.event.headline,
                title: toml_cfg.event.title,
                poster: assets_dir.join(&toml_cfg.event.poster),
                instructions: toml_cfg.event.instructions,
                note: toml_cfg.event.note,
            },
            logging: LoggingConfig {
                level: toml_cfg.logging.level,
                file: log_file,
            },
        }
    }
}

/// Absolute paths are taken as-is; relative ones are looked up in the
/// candidate dirs, defaulting to CWD-relative.
fn resolve_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    if PathBuf::from(dir).is_absolute() {
        return PathBuf::from(dir);
    }
    search_dirs.iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from(dir))
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/valentine)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/valentine");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/valentine");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AppConfig {
        AppConfig::parse_str(text, &[]).unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("");
        assert_eq!(cfg.frame, Duration::from_millis(16));
        assert_eq!(cfg.view.heart_count, 18);
        assert_eq!(cfg.view.seed, None);
        assert_eq!(cfg.view.countdown_period, Duration::from_millis(1000));
        assert_eq!(cfg.view.background_period, Duration::from_millis(5000));
        assert_eq!(cfg.occasion, Occasion::DATE_NIGHT);
        assert_eq!(cfg.audio.volume, 0.35);
        assert!(cfg.audio.autoplay);
        assert_eq!(cfg.audio.track, PathBuf::from("assets/bg-music.mp3"));
        assert_eq!(cfg.event.title, "Suzume");
        assert_eq!(cfg.event.instructions.len(), 5);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.file, Some(std::env::temp_dir().join("valentine.log")));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(
            r#"
            [occasion]
            month = 3
            day = 14

            [audio]
            autoplay = false

            [general]
            seed = 99
            "#,
        );
        assert_eq!(cfg.occasion, Occasion { month: 3, day: 14, hour: 21, minute: 0 });
        assert!(!cfg.audio.autoplay);
        assert_eq!(cfg.audio.volume, 0.35);
        assert_eq!(cfg.view.seed, Some(99));
    }

    #[test]
    fn impossible_occasion_falls_back() {
        let cfg = parse("[occasion]\nmonth = 2\nday = 31\n");
        assert_eq!(cfg.occasion, Occasion::DATE_NIGHT);
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(parse("[audio]\nvolume = 4.0\n").audio.volume, 1.0);
    }

    #[test]
    fn empty_log_file_disables_logging() {
        assert_eq!(parse("[logging]\nfile = \"\"\n").logging.file, None);
    }

    #[test]
    fn custom_event_text() {
        let cfg = parse(
            r#"
            [event]
            title = "Your Name"
            instructions = ["Bring snacks."]
            "#,
        );
        assert_eq!(cfg.event.title, "Your Name");
        assert_eq!(cfg.event.instructions, vec!["Bring snacks.".to_string()]);
        assert_eq!(cfg.event.headline, "Until Our Movie Date Begins");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppConfig::parse_str("[audio\nvolume = ", &[]).is_err());
    }

    #[test]
    fn absolute_assets_dir_is_kept() {
        let cfg = parse("[general]\nassets_dir = \"/srv/valentine\"\n");
        assert_eq!(cfg.event.poster, PathBuf::from("/srv/valentine/suzume-movie.jpg"));
    }
}
