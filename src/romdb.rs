use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use directories::BaseDirs;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

/// SHA-1 digest (of the post-header payload) to game title.
pub type RomDb = HashMap<String, String>;

pub fn save(db: &RomDb) -> bool {
    let mut p = rom_db_dir_path();
    std::fs::create_dir_all(&p).unwrap();

    p.push("rom.db");
    let writer = BufWriter::new(File::create(&p).unwrap());
    let mut encoder = ZlibEncoder::new(writer, Compression::best());
    if bincode::serde::encode_into_std_write(db, &mut encoder, bincode::config::standard())
        .is_err()
    {
        return false;
    }
    encoder.finish().is_ok()
}

pub fn load() -> Option<RomDb> {
    let mut p = rom_db_dir_path();
    p.push("rom.db");

    if p.is_file() {
        let reader = BufReader::new(File::open(&p).ok()?);
        let mut decoder = ZlibDecoder::new(reader);
        bincode::serde::decode_from_std_read(&mut decoder, bincode::config::standard()).ok()
    } else {
        None
    }
}

pub fn lookup<'a>(db: &'a RomDb, digest: &str) -> Option<&'a str> {
    db.get(digest).map(String::as_str)
}

fn rom_db_dir_path() -> PathBuf {
    let base_dirs = BaseDirs::new().unwrap();
    let mut rom_db_dir_buf = PathBuf::new();
    rom_db_dir_buf.push(base_dirs.data_dir());
    rom_db_dir_buf.push("banchi");
    rom_db_dir_buf.push("db");
    rom_db_dir_buf
}
