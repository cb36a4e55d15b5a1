use std::io::{self, BufRead, Write};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fairy_chess::engines::engine_alpha_beta::AlphaBetaEngine;
use fairy_chess::engines::engine_random::RandomEngine;
use fairy_chess::engines::engine_trait::{Engine, GoParams};
use fairy_chess::game_state::chess_game::ChessGame;
use fairy_chess::game_state::chess_types::{Color, Coordinate};
use fairy_chess::search::minimax::SearchConfig;
use fairy_chess::utils::coordinate_notation::movement_to_string;

struct Options {
    depth: u8,
    human: Color,
    random: bool,
    chess960: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        depth: SearchConfig::default().max_depth,
        human: Color::Light,
        random: false,
        chess960: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--depth" => {
                let value = args.next().ok_or("--depth needs a value")?;
                options.depth = value
                    .parse()
                    .map_err(|_| format!("invalid depth: {value}"))?;
            }
            "--color" => {
                let value = args.next().ok_or("--color needs a value")?;
                options.human = match value.to_ascii_lowercase().as_str() {
                    "light" | "white" => Color::Light,
                    "dark" | "black" => Color::Dark,
                    _ => return Err(format!("invalid color: {value}")),
                };
            }
            "--random" => options.random = true,
            "--chess960" => options.chess960 = true,
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }

    Ok(options)
}

fn print_help() {
    println!("moves are F1_R1_F2_R2[_piece], column then row, e.g. 4_1_4_3");
    println!("commands: board, undo, promote <F>_<R> <piece>, moves <F>_<R>, quit");
}

fn parse_square(text: &str) -> Option<Coordinate> {
    let (file, rank) = text.split_once(['_', '-'])?;
    Coordinate::new(file.trim().parse().ok()?, rank.trim().parse().ok()?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: fairy_chess [--depth N] [--color light|dark] [--random] [--chess960]");
            std::process::exit(2);
        }
    };

    let mut game = if options.chess960 {
        match ChessGame::chess960(&mut rand::rng()) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("could not build chess960 position: {err}");
                std::process::exit(1);
            }
        }
    } else {
        ChessGame::new()
    };

    let mut engine: Box<dyn Engine> = if options.random {
        Box::new(RandomEngine::new())
    } else {
        Box::new(AlphaBetaEngine::new(SearchConfig {
            max_depth: options.depth,
            ..SearchConfig::default()
        }))
    };
    engine.new_game();
    info!(engine = engine.name(), depth = options.depth, "starting game");

    print_help();
    println!("{}", game.state_string());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if let Some(winner) = game.winner() {
            println!("{} wins", winner.name());
            break;
        }
        if game.draw_opportunity() {
            println!("draw available (repetition or no-progress rule)");
        }

        let to_move = game.side_to_move();
        if to_move != options.human && game.state().pending_promotion().is_none() {
            let output = match engine.choose_move(game.state(), &GoParams::default()) {
                Ok(output) => output,
                Err(err) => {
                    eprintln!("engine failed: {err}");
                    break;
                }
            };
            for line in &output.info_lines {
                info!("{line}");
            }

            let Some(movement) = output.best_move else {
                println!("{} has no move", to_move.name());
                break;
            };
            let text = movement_to_string(&movement, game.state().dictionary());
            if let Err(reason) = game.play(to_move, movement) {
                warn!(%reason, movement = %text, "engine move refused");
                break;
            }
            println!("{} plays {text}", to_move.name());
            println!("{}", game.state_string());
            continue;
        }

        print!("{}> ", to_move.name());
        io::stdout().flush().ok();

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let line = line.trim();
        let mut words = line.split_whitespace();

        match words.next() {
            None => continue,
            Some("quit") | Some("exit") => break,
            Some("help") => print_help(),
            Some("board") => println!("{}", game.state_string()),
            Some("undo") => {
                // Take back the engine reply and the player's move.
                game.undo();
                game.undo();
                println!("{}", game.state_string());
            }
            Some("moves") => match words.next().and_then(parse_square) {
                Some(square) => {
                    let dictionary = game.state().dictionary();
                    let listed: Vec<String> = game
                        .movements_from(square)
                        .iter()
                        .map(|movement| movement_to_string(movement, dictionary))
                        .collect();
                    println!("{}", listed.join(" "));
                }
                None => println!("usage: moves <F>_<R>"),
            },
            Some("promote") => {
                let square = words.next().and_then(parse_square);
                match (square, words.next()) {
                    (Some(square), Some(name)) => match game.promote(square, name) {
                        Ok(()) => println!("{}", game.state_string()),
                        Err(err) => println!("{err}"),
                    },
                    _ => println!("usage: promote <F>_<R> <piece>"),
                }
            }
            Some(_) => {
                let reason = game.check_move_and_move(to_move, line);
                if reason.is_empty() {
                    println!("{}", game.state_string());
                } else {
                    println!("{reason}");
                }
            }
        }
    }
}
