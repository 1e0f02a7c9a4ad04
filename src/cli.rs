//! `match3` command line: argument parsing and the two subcommands.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::tty::IsTty;

use crate::core::{Board, GameEngine};
use crate::engine::{autoplay_with, legal_swaps, AutoplayReport};
use crate::io::{write_group, LayoutRepository};
use crate::term::{render_board, BoardView, Canvas, Playback, Screen};
use crate::types::ActionGroup;

pub const USAGE: &str = "\
usage:
  match3 play <layout.json> [--seed N] [--swaps N] [--replay FILE] [--watch MS] [--quiet]
  match3 show <layout.json> [--seed N]

The seed defaults to $MATCH3_SEED, then 1.";

pub const DEFAULT_SWAPS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    pub layout: PathBuf,
    pub seed: u32,
    pub swaps: u32,
    pub replay: Option<PathBuf>,
    /// Animate every action group on an alternate screen, this many ms per group.
    pub watch_ms: Option<u64>,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowConfig {
    pub layout: PathBuf,
    pub seed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayConfig),
    Show(ShowConfig),
    Help,
}

/// Seed from `MATCH3_SEED`, falling back to 1 when unset or unparsable.
pub fn seed_from_env() -> u32 {
    std::env::var("MATCH3_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}

/// Parse arguments after the program name.
pub fn parse_args(args: &[String], default_seed: u32) -> Result<Command> {
    let Some(sub) = args.first() else {
        return Ok(Command::Help);
    };
    let sub = sub.as_str();
    if matches!(sub, "help" | "--help" | "-h") {
        return Ok(Command::Help);
    }
    if sub != "play" && sub != "show" {
        return Err(anyhow!("unknown command: {}", sub));
    }

    let mut layout = None;
    let mut seed = default_seed;
    let mut swaps = DEFAULT_SWAPS;
    let mut replay = None;
    let mut watch_ms = None;
    let mut quiet = false;

    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                seed = parse_value(sub, "--seed", args.get(i))?;
            }
            "--swaps" if sub == "play" => {
                i += 1;
                swaps = parse_value(sub, "--swaps", args.get(i))?;
            }
            "--replay" if sub == "play" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("{}: missing value for --replay", sub))?;
                replay = Some(PathBuf::from(v));
            }
            "--watch" if sub == "play" => {
                i += 1;
                watch_ms = Some(parse_value(sub, "--watch", args.get(i))?);
            }
            "--quiet" if sub == "play" => quiet = true,
            other if other.starts_with("--") => {
                return Err(anyhow!("{}: unknown argument: {}", sub, other));
            }
            other => {
                if layout.is_some() {
                    return Err(anyhow!("{}: unexpected argument: {}", sub, other));
                }
                layout = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    let layout = layout.ok_or_else(|| anyhow!("{}: missing layout file", sub))?;
    Ok(if sub == "play" {
        Command::Play(PlayConfig {
            layout,
            seed,
            swaps,
            replay,
            watch_ms,
            quiet,
        })
    } else {
        Command::Show(ShowConfig { layout, seed })
    })
}

fn parse_value<T: std::str::FromStr>(sub: &str, flag: &str, v: Option<&String>) -> Result<T> {
    let v = v.ok_or_else(|| anyhow!("{}: missing value for {}", sub, flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("{}: invalid {} value: {}", sub, flag, v))
}

/// What a `play` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaySummary {
    pub report: AutoplayReport,
    pub groups: u64,
    pub board_hash: u64,
}

pub fn run_play(config: &PlayConfig, repo: &mut LayoutRepository) -> Result<PlaySummary> {
    let layout = repo
        .load(&config.layout)
        .with_context(|| format!("play: loading {}", config.layout.display()))?;
    if !config.quiet {
        println!(
            "[match3] layout {} ({}x{}, {} types), seed {}",
            config.layout.display(),
            layout.width(),
            layout.height(),
            layout.type_num(),
            config.seed
        );
    }

    let mut engine = GameEngine::new(config.seed);
    engine.start_game(layout);
    let initial = engine
        .board()
        .cloned()
        .ok_or_else(|| anyhow!("play: game did not start"))?;

    let mut replay = match &config.replay {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("play: creating {}", path.display()))?,
        )),
        None => None,
    };
    let mut recorded = Vec::new();
    let mut groups = 0u64;
    let mut write_err = None;

    let report = autoplay_with(&mut engine, config.swaps, |group| {
        if let Some(out) = replay.as_mut() {
            if let Err(e) = write_group(out, groups, group) {
                write_err.get_or_insert(e);
            }
        }
        if config.watch_ms.is_some() {
            recorded.push(group.clone());
        }
        groups += 1;
    });

    if let Some(e) = write_err {
        return Err(anyhow!("play: writing replay: {}", e));
    }
    if let Some(mut out) = replay {
        out.flush()?;
    }

    if let Some(ms) = config.watch_ms {
        if io::stdout().is_tty() {
            watch(&initial, &recorded, Duration::from_millis(ms))?;
        } else if !config.quiet {
            println!("[match3] stdout is not a terminal, skipping --watch");
        }
    }

    let board = engine
        .board()
        .ok_or_else(|| anyhow!("play: game did not start"))?;
    print_board(board)?;

    if !config.quiet {
        println!(
            "[match3] swaps {}, rounds {}, removed {}, generated {}{}",
            report.swaps,
            report.rounds,
            report.removed,
            report.generated,
            if report.stuck { ", no legal swap left" } else { "" }
        );
        if let Some(path) = &config.replay {
            println!("[match3] replay: {} groups written to {}", groups, path.display());
        }
    }

    Ok(PlaySummary {
        report,
        groups,
        board_hash: board.snapshot().board_hash,
    })
}

pub fn run_show(config: &ShowConfig, repo: &mut LayoutRepository) -> Result<usize> {
    let layout = repo
        .load(&config.layout)
        .with_context(|| format!("show: loading {}", config.layout.display()))?;
    let mut engine = GameEngine::new(config.seed);
    engine.start_game(layout);

    let board = engine
        .board()
        .ok_or_else(|| anyhow!("show: game did not start"))?;
    print_board(board)?;
    let hints = legal_swaps(board).len();
    println!("[match3] seed {}, {} legal swaps", config.seed, hints);
    Ok(hints)
}

fn print_board(board: &Board) -> Result<()> {
    let mut buf = Vec::new();
    render_board(board, &mut buf)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&buf)?;
    stdout.flush()?;
    Ok(())
}

/// Replay recorded groups on an alternate screen, one frame per group.
fn watch(initial: &Board, groups: &[ActionGroup], frame: Duration) -> Result<()> {
    let mut screen = Screen::new();
    screen.enter()?;
    let result = animate(&mut screen, initial, groups, frame);
    // Always try to restore the terminal.
    let _ = screen.leave();
    result
}

fn animate(screen: &mut Screen, initial: &Board, groups: &[ActionGroup], frame: Duration) -> Result<()> {
    let view = BoardView::default();
    let mut canvas = Canvas::default();
    let mut playback = Playback::new();
    playback.sync(initial);

    for group in groups {
        playback.apply(group, Some(initial));
        let touched: Vec<_> = group
            .iter()
            .filter_map(|a| a.target.or(a.source))
            .collect();
        view.draw_cells(
            playback.width(),
            playback.height(),
            playback.cells(),
            &touched,
            &mut canvas,
        );
        screen.draw(&canvas)?;
        thread::sleep(frame);
        playback.finish_all();
    }
    Ok(())
}
