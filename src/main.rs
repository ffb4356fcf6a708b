//! Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use log::{info, trace, warn};

use config::GameConfig;
use domain::entity::{Direction, InputSnapshot};
use sim::content::Content;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{pick_direction, InputState};
use ui::renderer::Renderer;

/// Path to send the log to while the terminal is in raw mode.
const LOG_FILE_ENV: &str = "RESUME_QUEST_LOG";

fn main() -> Result<()> {
    init_logging()?;
    let config = GameConfig::load();

    let content = Content::load(
        config.content_file.as_deref(),
        config.world.width,
        config.world.height,
    )
    .context("invalid NPC content")?;

    let seed = config.world.seed.unwrap_or_else(time_seed);
    let mut world = WorldState::new(&config, content, seed);

    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }

    let mut renderer = Renderer::new(&config.display);
    renderer.init().context("terminal init failed")?;

    let result = game_loop(&mut world, &mut renderer, &mut gp, &config);

    // Restore the terminal before any error is printed.
    let cleanup = renderer.cleanup().context("terminal cleanup failed");
    result?;
    cleanup?;

    println!("Thanks for visiting Resume Quest! (map seed {})", world.seed);
    Ok(())
}

fn init_logging() -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        let file = File::create(&path)
            .with_context(|| format!("cannot create log file {}", Path::new(&path).display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    gp: &mut GamepadState,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.enable_key_release().unwrap_or_else(|e| {
        warn!("keyboard enhancement unavailable: {e}; using key hold timeout");
        false
    });
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            info!("quit after {} frames", world.tick);
            break;
        }

        let clicked_dialog = kb.clicks.iter()
            .any(|&(col, row)| renderer.dialog_hit(col as usize, row as usize));
        let input = InputSnapshot {
            movement: detect_movement(&kb, gp),
            interact: kb.any_pressed(KEYS_INTERACT) || gp.interact_pressed(),
            dismiss: kb.any_pressed(KEYS_DISMISS) || clicked_dialog,
        };

        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        last_frame = now;

        for event in step::step(world, input, dt) {
            trace!("{event:?}");
        }

        renderer.render(world)?;
        std::thread::sleep(config.timing.frame_sleep);
    }

    Ok(())
}

// ── Key bindings ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_INTERACT: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Enter];
const KEYS_DISMISS: &[KeyCode] = &[KeyCode::Esc];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

fn detect_movement(kb: &InputState, gp: &GamepadState) -> Option<Direction> {
    let held = |codes: &[KeyCode], dir| kb.any_held(codes) || kb.any_pressed(codes) || gp.held(dir);
    pick_direction(
        held(KEYS_UP, Direction::Up),
        held(KEYS_DOWN, Direction::Down),
        held(KEYS_LEFT, Direction::Left),
        held(KEYS_RIGHT, Direction::Right),
    )
}
