// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::io;
use std::process;
use std::time::Instant;

use caissa::console::{Config, Console};
use caissa::{perft, Color, Position};
use clap::{App, Arg, ArgMatches, SubCommand};

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game against a random opponent on the console")
                .arg(
                    Arg::with_name("fen")
                        .help("FEN string of the starting position")
                        .value_name("FEN")
                        .long("--fen")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("color")
                        .help("Color to play")
                        .value_name("COLOR")
                        .short("-c")
                        .long("--color")
                        .possible_values(&["white", "black"])
                        .default_value("white"),
                )
                .arg(
                    Arg::with_name("seed")
                        .help("Seed for the opponent's choices")
                        .value_name("SEED")
                        .long("--seed")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("json")
                        .help("Print the board as JSON")
                        .long("--json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .default_value("4"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => run_play(&ArgMatches::default()),
    }
}

fn run_play(matches: &ArgMatches) -> ! {
    let mut config = Config::default();
    if matches.value_of("color") == Some("black") {
        config.human = Color::Black;
    }
    if matches.is_present("seed") {
        config.seed = Some(value_t_or_exit!(matches, "seed", u64));
    }
    config.fen = matches.value_of("fen").map(str::to_owned);
    config.json = matches.is_present("json");

    let console = match Console::from_config(&config) {
        Ok(console) => console,
        Err(err) => {
            eprintln!("invalid fen: {}", err);
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = console.run(stdin.lock(), stdout.lock()) {
        eprintln!("i/o error: {}", err);
        process::exit(1);
    }

    process::exit(0);
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let pos = match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            eprintln!("invalid fen: {}", err);
            process::exit(1);
        }
    };

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    for i in 1..=depth {
        let start = Instant::now();
        let results = perft(&pos, i);
        let ms = start.elapsed().as_millis();
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}
