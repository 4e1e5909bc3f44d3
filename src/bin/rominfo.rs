use banchi::rom::RomImage;
use banchi::romdb;
use banchi::session::Session;
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// iNES ROM image to inspect
    rom_file: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let rom = match RomImage::from_file(&args.rom_file) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("{}: {}", args.rom_file, e);
            return ExitCode::FAILURE;
        }
    };

    println!("file:    {}", args.rom_file);
    println!("sha1:    {}", rom.sha1_digest());
    if let Some(db) = romdb::load() {
        if let Some(title) = romdb::lookup(&db, rom.sha1_digest()) {
            println!("title:   {}", title);
        }
    }
    println!("mapper:  {:03}", rom.mapper_id());
    println!("prg rom: {} x 16 KiB", rom.prg_banks());
    println!("chr rom: {} x 8 KiB", rom.chr_banks());

    match Session::new(rom) {
        Ok(session) => {
            println!("mirror:  {:?}", session.mirror());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cannot start session: {}", e);
            ExitCode::FAILURE
        }
    }
}
