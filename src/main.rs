//! The woodpusher chess engine.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]

use std::fs::File;
use std::path::PathBuf;
use clap::{App, Arg, SubCommand, crate_version};
use simplelog::{WriteLogger, LevelFilter, Config};
use woodpusher::chess::{Color, Square, Position};
use woodpusher::engine::Engine;

fn main() -> Result<(), Error> {
    let matches =
        App::new("Woodpusher")
            .version(crate_version!())
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("woodpusher.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .default_value("info")
                .help("Sets the log level if logging is turned on"))
            .subcommand(SubCommand::with_name("show")
                .about("Prints a board. Defaults to the standard starting position.")
                .arg(Arg::with_name("board")
                    .value_name("BOARD_FILE")
                    .takes_value(true)
                    .help("File holding a board string")))
            .subcommand(SubCommand::with_name("bestmove")
                .about("Searches a position and prints the move the engine would play.\n\
                        Defaults to the standard starting position with White to move.")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .help("Overrides the engine's search depth"))
                .arg(Arg::with_name("color")
                    .long("color")
                    .short("c")
                    .value_name("COLOR")
                    .takes_value(true)
                    .possible_values(&["white", "black"])
                    .default_value("white")
                    .help("Side the engine plays"))
                .arg(Arg::with_name("board")
                    .value_name("BOARD_FILE")
                    .takes_value(true)
                    .help("File holding a board string")))
            .get_matches();

    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level") {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
        None => unreachable!(),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink())
    };

    match matches.subcommand() {
        ("show", Some(matches)) => {
            let pos = load_board(matches.value_of("board"))?;
            print_board(&pos);
        },
        ("bestmove", Some(matches)) => {
            let pos = load_board(matches.value_of("board"))?;
            let color = match matches.value_of("color") {
                Some("black") => Color::Black,
                _ => Color::White,
            };

            let mut engine = match matches.value_of("depth") {
                Some(depth) => {
                    let depth = parse_depth(depth)?;
                    Engine::with_depths(depth, depth)
                },
                None => Engine::new(),
            };

            match engine.choose_move(&pos, color) {
                Some((origin, dest)) => println!("{}{}", origin, dest),
                None => println!("(none)"),
            }
        },
        (_, None) => {
            print_board(&load_board(None)?);
        },
        _ => unreachable!(),
    }

    Ok(())
}

/// Parses a search depth argument. A depth of zero is rejected here so the
/// engine always receives a usable ply count.
fn parse_depth(s: &str) -> Result<usize, Error> {
    match s.parse() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(Error("depth must be a positive number".to_owned())),
    }
}

/// Reads and parses a board string from `path`, or produces the standard
/// starting position if no path was given
fn load_board(path: Option<&str>) -> Result<Position, Error> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| Error(format!("{}: {}", path, err)))?;
            text.trim().parse().map_err(|err| Error(format!("{}: {}", path, err)))
        },
        None => Ok(Position::standard()),
    }
}

/// Prints a board as a grid of piece symbols
fn print_board(pos: &Position) {
    for row in 1..=8 {
        let glyphs: Vec<String> = (1..=8)
            .filter_map(|col| Square::from_row_col(row, col))
            .map(|sq| pos.glyph(sq).to_string())
            .collect();
        println!("{}", glyphs.join(" "));
    }
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

#[cfg(test)]
mod tests {
    use super::parse_depth;

    #[test]
    fn depth_arguments_must_be_positive_numbers() {
        assert_eq!(parse_depth("1").unwrap(), 1);
        assert_eq!(parse_depth("4").unwrap(), 4);
        assert!(parse_depth("0").is_err());
        assert!(parse_depth("-2").is_err());
        assert!(parse_depth("four").is_err());
    }
}
