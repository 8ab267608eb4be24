use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use game2048::config::Config;
use game2048::engine::{Board, Move};
use game2048::random::RngSource;

#[derive(Parser, Debug)]
#[command(name = "game2048", version, about = "Play 2048 in the terminal")]
struct Cli {
    /// TOML file with seed, max_moves and [spawn] four_in
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for reproducible games (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Spawn a 4 one time in N (overrides the config file)
    #[arg(long, value_name = "N")]
    four_in: Option<u32>,

    /// Play automatically with uniformly random moves
    #[arg(long)]
    auto: bool,

    /// Stop automatic play after this many moves
    #[arg(long, value_name = "N")]
    max_moves: Option<u64>,
}

type SessionBoard = Board<RngSource<StdRng>>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match &cli.config {
        Some(path) => Config::from_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    }
    .with_overrides(cli.seed, cli.four_in, cli.max_moves)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let spawn_rng = StdRng::from_rng(&mut rng).context("seeding spawn generator")?;
    let mut board: SessionBoard = Board::with_source(RngSource::with_rng(spawn_rng, config.spawn));
    board.initialize();
    info!(
        "new game (seed: {:?}, four_in: {})",
        config.seed,
        config.spawn.four_in()
    );
    println!("{}", board);

    if cli.auto {
        play_auto(&mut board, &mut rng, config.max_moves);
    } else {
        play_interactive(&mut board)?;
    }

    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, {}",
        board.moves(),
        board.score(),
        board.highest_tile(),
        if board.is_won() {
            "won"
        } else if board.is_over() {
            "lost"
        } else {
            "stopped"
        }
    );
    Ok(())
}

fn play_auto(board: &mut SessionBoard, rng: &mut StdRng, max_moves: u64) {
    while !board.is_over() && board.moves() < max_moves {
        let direction = Move::ALL[rng.gen_range(0..Move::ALL.len())];
        board.make_move(direction);
        println!("{}", board);
    }
}

fn play_interactive(board: &mut SessionBoard) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !board.is_over() {
        print!("move (w/a/s/d, q to quit)> ");
        io::stdout().flush().context("flushing prompt")?;
        let line = match lines.next() {
            Some(line) => line.context("reading move")?,
            None => break,
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if input.is_empty() {
            continue;
        }
        match input.parse::<Move>() {
            Ok(direction) => {
                board.make_move(direction);
                println!("{}", board);
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}
