//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.

use log::warn;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Environment tile edge in pixels. Tile and sprite layer geometry is drawn for this size.
pub const TILE_SIZE: u32 = 48;
/// Character sprite box in pixels, anchored bottom-centre inside a tile.
pub const CHARACTER_SIZE: u32 = 32;

// ── Public Config Struct ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub world: WorldConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    /// Resolved NPC content file, if one was found on the search path.
    pub content_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub move_delay: Duration,
    pub anim_interval: Duration,
    pub frame_sleep: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Fixed map seed. `None` = new map every launch.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub pixels_per_cell: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadConfig {
    pub interact: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_move_delay")]
    move_delay_ms: u64,
    #[serde(default = "default_anim_interval")]
    anim_interval_ms: u64,
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_width")]
    width: usize,
    #[serde(default = "default_height")]
    height: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_viewport_width")]
    viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    viewport_height: u32,
    #[serde(default = "default_pixels_per_cell")]
    pixels_per_cell: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_interact")]
    interact: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_content_file")]
    content_file: String,
}

// ── Defaults ──

fn default_move_delay() -> u64 { 200 }
fn default_anim_interval() -> u64 { 500 }
fn default_frame_sleep() -> u64 { 16 }
fn default_width() -> usize { 32 }
fn default_height() -> usize { 24 }
fn default_viewport_width() -> u32 { 768 }   // 16 tiles
fn default_viewport_height() -> u32 { 576 }  // 12 tiles
fn default_pixels_per_cell() -> u32 { 8 }

fn default_interact() -> Vec<String> { vec!["A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_content_file() -> String { "npcs.toml".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            move_delay_ms: default_move_delay(),
            anim_interval_ms: default_anim_interval(),
            frame_sleep_ms: default_frame_sleep(),
        }
    }
}

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            width: default_width(),
            height: default_height(),
            seed: None,
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            pixels_per_cell: default_pixels_per_cell(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            interact: default_interact(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            content_file: default_content_file(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TomlTiming::default().into()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        TomlWorld::default().into()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        TomlDisplay::default().into()
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        TomlGamepad::default().into()
    }
}

// ── TOML → runtime conversion (sizes clamped to at least 1) ──

impl From<TomlTiming> for TimingConfig {
    fn from(t: TomlTiming) -> Self {
        TimingConfig {
            move_delay: Duration::from_millis(t.move_delay_ms),
            anim_interval: Duration::from_millis(t.anim_interval_ms),
            frame_sleep: Duration::from_millis(t.frame_sleep_ms),
        }
    }
}

impl From<TomlWorld> for WorldConfig {
    fn from(w: TomlWorld) -> Self {
        WorldConfig {
            width: w.width.max(1),
            height: w.height.max(1),
            seed: w.seed,
        }
    }
}

impl From<TomlDisplay> for DisplayConfig {
    fn from(d: TomlDisplay) -> Self {
        DisplayConfig {
            viewport_width: d.viewport_width.max(1),
            viewport_height: d.viewport_height.max(1),
            pixels_per_cell: d.pixels_per_cell.max(1),
        }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(g: TomlGamepad) -> Self {
        GamepadConfig {
            interact: g.interact,
            quit: g.quit,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, current working directory,
    /// ~/.local/share/resume-quest, /usr/share/resume-quest.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        // Resolve the content file: absolute path as-is, otherwise first hit on the search path.
        let content_str = &toml_cfg.general.content_file;
        let content_file = if PathBuf::from(content_str).is_absolute() {
            Some(PathBuf::from(content_str)).filter(|p| p.is_file())
        } else {
            search_dirs.iter()
                .map(|d| d.join(content_str))
                .find(|p| p.is_file())
        };

        Self::from_toml(toml_cfg, content_file)
    }

    /// Parse a config document directly (no file search).
    #[cfg(test)]
    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(cfg, None))
    }

    fn from_toml(cfg: TomlConfig, content_file: Option<PathBuf>) -> Self {
        GameConfig {
            timing: cfg.timing.into(),
            world: cfg.world.into(),
            display: cfg.display.into(),
            gamepad: cfg.gamepad.into(),
            content_file,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
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

    // 3. XDG data home (~/.local/share/resume-quest)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/resume-quest");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/resume-quest");
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
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
