use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minesweeper_engine::score::SCORE_FILE;
use minesweeper_engine::{
    Action, Cell, CellContent, Difficulty, Game, GameClock, GameError, GameState, Position, ScoreStore,
    Ticker,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal")]
struct Cli {
    /// Board preset: easy, medium or expert
    #[arg(short, long, default_value = "easy")]
    difficulty: Difficulty,

    /// High score file
    #[arg(short, long, default_value = SCORE_FILE)]
    score_file: PathBuf,

    /// Seed for reproducible minefields
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

enum Command {
    Cell(Position, Action),
    Surrender,
    NewGame,
    SetDifficulty(Difficulty),
    Scores,
    Exit,
}

struct Session {
    game: Game,
    difficulty: Difficulty,
    clock: Arc<Mutex<GameClock>>,
    rng: StdRng,
    scores: ScoreStore,
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(_) => println!("Thanks for playing!"),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut scores = ScoreStore::open(&cli.score_file);
    if !scores.file_exists() {
        confirm_score_file(&mut scores)?;
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = Game::for_difficulty(cli.difficulty, StdRng::seed_from_u64(rng.gen()))?;
    let clock = Arc::new(Mutex::new(GameClock::new()));
    let _ticker = Ticker::spawn(Arc::clone(&clock));

    let mut session = Session {
        game,
        difficulty: cli.difficulty,
        clock,
        rng,
        scores,
    };
    session.clock()?.start();

    loop {
        print_board(&session)?;

        let Some(line) = prompt("Enter command (x y [r/f/c], q, n, d <level>, h, x): ")? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            println!("Unrecognised command");
            continue;
        };

        match command {
            Command::Cell(pos, action) => {
                let before = session.game.state();
                match session.game.perform_action(pos, action) {
                    Ok(state) if state.is_finished() && !before.is_finished() => {
                        end_game(&mut session)?
                    }
                    Ok(_) => {}
                    Err(GameError::GameOver) => println!("Game over. Press n for a new game."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Command::Surrender => {
                if session.game.state() == GameState::Unfinished {
                    session.game.surrender();
                    end_game(&mut session)?;
                } else {
                    new_game(&mut session)?;
                }
            }
            Command::NewGame => new_game(&mut session)?,
            Command::SetDifficulty(difficulty) => {
                session.difficulty = difficulty;
                new_game(&mut session)?;
            }
            Command::Scores => show_scores(&mut session.scores)?,
            Command::Exit => break,
        }
    }

    Ok(())
}

impl Session {
    fn clock(&self) -> Result<MutexGuard<'_, GameClock>> {
        self.clock
            .lock()
            .map_err(|_| anyhow::anyhow!("game clock lock poisoned"))
    }
}

fn new_game(session: &mut Session) -> Result<()> {
    let rng = StdRng::seed_from_u64(session.rng.gen());
    session.game = Game::for_difficulty(session.difficulty, rng)?;
    session.clock()?.start();
    Ok(())
}

fn end_game(session: &mut Session) -> Result<()> {
    let time = {
        let mut clock = session.clock()?;
        clock.stop();
        clock.seconds()
    };
    print_board(session)?;

    match session.game.state() {
        GameState::Won => {
            println!("Congratulations! You cleared the field in {:.1} seconds.", time);
            if session.scores.is_high_score(session.difficulty, time) {
                let name = prompt("New high score! Enter your name: ")?.unwrap_or_default();
                session.scores.add_score(session.difficulty, name.trim(), time);
                if let Err(e) = session.scores.write() {
                    log::error!("could not save scores: {}", e);
                    println!("Could not save scores: {}", e);
                }
            }
        }
        GameState::Lost => println!("Game Over!"),
        GameState::Unfinished => {}
    }
    println!("Press n for a new game.");
    Ok(())
}

fn confirm_score_file(scores: &mut ScoreStore) -> Result<bool> {
    let answer = prompt(&format!(
        "The high score file {} could not be found, create it? [y/N] ",
        scores.path().display()
    ))?;
    if !matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes")) {
        return Ok(false);
    }

    match scores.create_file() {
        Ok(()) => Ok(true),
        Err(e) => {
            println!("Could not create score file: {}", e);
            Ok(false)
        }
    }
}

fn show_scores(scores: &mut ScoreStore) -> Result<()> {
    if !scores.file_exists() && !confirm_score_file(scores)? {
        return Ok(());
    }

    for difficulty in Difficulty::ALL {
        println!("== {} ==", difficulty);
        let table = scores.table(difficulty);
        if table.is_empty() {
            println!("   (no scores yet)");
        }
        for (rank, score) in table.scores().iter().enumerate() {
            println!("{:>2}. {:<20} {:>6.1}", rank + 1, score.name(), score.time());
        }
    }
    Ok(())
}

/// Prints `message` and reads a line. `None` on end of input.
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush().context("flushing stdout")?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("reading from stdin")?;
    Ok((read > 0).then_some(input))
}

fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();
    let first = parts.next()?;

    match first {
        "q" => return Some(Command::Surrender),
        "n" => return Some(Command::NewGame),
        "h" => return Some(Command::Scores),
        "x" => return Some(Command::Exit),
        "d" => return parts.next()?.parse().ok().map(Command::SetDifficulty),
        _ => {}
    }

    let x = first.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let action = match parts.next().unwrap_or("r") {
        "r" => Action::Reveal,
        "f" => Action::Flag,
        "c" => Action::Chord,
        _ => return None,
    };

    Some(Command::Cell(Position::new(x, y), action))
}

fn print_board(session: &Session) -> Result<()> {
    let game = &session.game;
    let (width, height) = game.dimensions();

    println!(
        "\n[{}] mines: {:02}  time: {}",
        session.difficulty,
        game.remaining_mines(),
        session.clock()?
    );

    // Column numbers
    print!("   ");
    for x in 0..width {
        print!("{:>2} ", x);
    }
    println!();

    let lost = game.state() == GameState::Lost;
    for y in 0..height {
        print!("{:>2} ", y);
        for x in 0..width {
            let cell = game.get_cell(Position::new(x, y))?;
            print!("{:>2} ", cell_symbol(cell, lost));
        }
        println!();
    }
    Ok(())
}

/// Once the game is lost every mine is shown, flagged or not.
fn cell_symbol(cell: &Cell, lost: bool) -> String {
    if lost && cell.is_mine() {
        "*".to_string()
    } else if cell.is_flagged() {
        "⚑".to_string()
    } else if !cell.is_revealed() {
        "□".to_string()
    } else {
        match cell.content() {
            CellContent::Mine => "*".to_string(),
            CellContent::Empty => " ".to_string(),
            CellContent::Adjacent(n) => n.to_string(),
        }
    }
}
