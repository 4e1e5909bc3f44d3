//! Build the digest-to-title database from a NesCartsDB XML datafile.

use clap::Parser;
use serde::Deserialize;
use serde_xml_rs::from_str;
use std::process::ExitCode;

#[derive(Deserialize)]
struct Datafile {
    game: Vec<Game>,
}

#[derive(Deserialize)]
struct Game {
    name: String,
    rom: Vec<Rom>,
}

#[derive(Deserialize)]
struct Rom {
    sha1: String,
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// NesCartsDB datafile (XML)
    datafile: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let xml = match std::fs::read_to_string(&args.datafile) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("{}: {}", args.datafile, e);
            return ExitCode::FAILURE;
        }
    };
    let datafile: Datafile = match from_str(&xml) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}: {}", args.datafile, e);
            return ExitCode::FAILURE;
        }
    };

    let mut rom_db = banchi::romdb::RomDb::new();
    for game in datafile.game {
        for rom in game.rom {
            rom_db.insert(rom.sha1.to_lowercase(), game.name.clone());
        }
    }

    println!("{} entries", rom_db.len());
    if banchi::romdb::save(&rom_db) {
        ExitCode::SUCCESS
    } else {
        eprintln!("cannot write rom.db");
        ExitCode::FAILURE
    }
}
