//! `match3` binary: headless autoplay and board preview for layout files.

use anyhow::Result;

use match3::cli::{parse_args, run_play, run_show, seed_from_env, Command, USAGE};
use match3::io::LayoutRepository;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args, seed_from_env()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("[match3] {}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let mut repo = LayoutRepository::new();
    match command {
        Command::Help => println!("{}", USAGE),
        Command::Play(config) => {
            run_play(&config, &mut repo)?;
        }
        Command::Show(config) => {
            run_show(&config, &mut repo)?;
        }
    }
    Ok(())
}
