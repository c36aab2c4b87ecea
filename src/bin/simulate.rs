#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use clap::{Parser, ValueEnum};
#[cfg(not(target_arch = "wasm32"))]
use cubefall::{Game, GameMode, GameSettings, InputFrame, TickEvent};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Grid,
    Free,
    Wall,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<ModeArg> for GameMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Grid => GameMode::Grid,
            ModeArg::Free => GameMode::Free,
            ModeArg::Wall => GameMode::Wall,
        }
    }
}

/// Runs the game headless and prints JSON frames for inspection.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
struct Opts {
    /// Game mode; overrides the settings file
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Settings JSON (any subset of the fields)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Input frames, one JSON object per line, replayed in a loop
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    dt_ms: f32,
    #[arg(long)]
    seed: Option<u64>,
    /// Print a snapshot every N ticks (0 prints only the summary)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn load_script(path: &PathBuf) -> anyhow::Result<Vec<InputFrame>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(n, l)| {
            serde_json::from_str(l).with_context(|| format!("{}:{}", path.display(), n + 1))
        })
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let mut settings = match &opts.settings {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            GameSettings::from_json(&text).map_err(anyhow::Error::msg)?
        }
        None => GameSettings::default(),
    };
    if let Some(mode) = opts.mode {
        settings.mode = mode.into();
    }
    if opts.seed.is_some() {
        settings.seed = opts.seed;
    }

    let script = match &opts.script {
        Some(path) => load_script(path)?,
        None => vec![InputFrame {
            fast_drop: true,
            ..InputFrame::default()
        }],
    };
    anyhow::ensure!(!script.is_empty(), "script has no input frames");

    let mut game = Game::new(settings).map_err(anyhow::Error::msg)?;
    let (mut locks, mut slides) = (0u32, 0u32);
    let mut ticks_run = 0u32;
    for tick in 0..opts.ticks {
        let input = &script[tick as usize % script.len()];
        match game.tick(opts.dt_ms, input) {
            TickEvent::Locked { .. } => locks += 1,
            TickEvent::Slid => slides += 1,
            _ => {}
        }
        ticks_run = tick + 1;
        if opts.snapshot_every > 0 && ticks_run % opts.snapshot_every == 0 {
            println!("{}", serde_json::to_string(&game.snapshot())?);
        }
        if game.is_board_full() {
            break;
        }
    }

    let summary = serde_json::json!({
        "ticks": ticks_run,
        "locks": locks,
        "slides": slides,
        "boardFull": game.is_board_full(),
        "wallFace": game.wall_face(),
        "final": game.snapshot(),
    });
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
