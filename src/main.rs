// vim: set ai et ts=4 sts=4 sw=4:
mod util;
mod grid;
mod puzzle;
mod row;

use std::fs;
use std::io;
use std::process;
use std::vec::Vec;
use clap::{App, Arg};
use log::error;
use yaml_rust::{YamlLoader, Yaml};

use self::puzzle::Puzzle;
use self::util::is_a_tty;

// note: column numbers are listed top to bottom
const DEMO_PUZZLE: &str = "
rows:
    - 5
    - 1 4
    - 1 1 1
    - 1 1 1 1
    - 1 1 1 1
    - 1 1 3 1
    - 1 1 1
    - 1 1 1
    - 3 4 1
    - 3 3
cols:
    - 8
    - 1 1
    - 1 1 5
    - 1 1
    - 1 2 2
    - 2 1 1
    - 5 1
    - 1 2
    - 1 1
    - 8
";

fn setup_logger(verbosity: u64) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{:5}] {}", record.level(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}

fn main() {
    let matches = App::new("nonosolve")
        .about("Solves nonogram puzzles by logical deduction, without guessing")
        .arg(Arg::with_name("FILE")
                 .help("YAML puzzle file; a built-in demo puzzle is solved if omitted"))
        .arg(Arg::with_name("verbose")
                 .short("v")
                 .long("verbose")
                 .multiple(true)
                 .help("Increases log verbosity (may be repeated)"))
        .arg(Arg::with_name("hint")
                 .long("hint")
                 .help("Reports the next deducible line instead of solving"))
        .get_matches();

    setup_logger(matches.occurrences_of("verbose")).expect("failed to initialize logging");

    let source: String = match matches.value_of("FILE") {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                error!("cannot read {}: {}", path, err);
                process::exit(1);
            }
        },
        None => String::from(DEMO_PUZZLE),
    };
    let docs: Vec<Yaml> = match YamlLoader::load_from_str(&source) {
        Ok(docs) => docs,
        Err(err) => {
            error!("malformed puzzle file: {}", err);
            process::exit(1);
        }
    };
    let mut puzzle = match Puzzle::from_yaml(&docs[0]) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    if matches.is_present("hint") {
        match puzzle.step_solve(true) {
            Ok(Some(hint)) => println!("try {} {}", hint.direction.line_noun(), hint.index),
            Ok(None)       => println!("nothing left to deduce"),
            Err(err) => {
                error!("{}", err);
                process::exit(1);
            }
        }
        return;
    }

    let emit_color = is_a_tty(io::stdout());
    match puzzle.solve() {
        Ok(()) => {
            println!("{}", puzzle.render(emit_color, Some(5)));
        }
        Err(err) => {
            error!("{}", err);
            // show whatever was deduced before the failure
            println!("{}", puzzle.render(emit_color, Some(5)));
            process::exit(1);
        }
    }
}
