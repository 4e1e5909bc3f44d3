use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::session::Session;

/// Save-state slot for one ROM, stored as zlib-compressed JSON under the
/// platform data directory. JSON because the mapper trait object is
/// serialized with a type tag, which needs a self-describing format.
pub struct SaveState {
    pub save_file: String,
}

impl SaveState {
    pub fn new(rom_filename: &str) -> SaveState {
        // find & create save directory
        let base_dirs = BaseDirs::new().unwrap();
        let mut save_file_buf = PathBuf::new();
        save_file_buf.push(base_dirs.data_dir());
        save_file_buf.push("banchi");
        save_file_buf.push("saves");

        std::fs::create_dir_all(&save_file_buf).unwrap();

        // save file named after the ROM file
        let rom_file_path = Path::new(rom_filename);
        let rom_file_stem = rom_file_path.file_stem().unwrap();
        save_file_buf.push(rom_file_stem);
        save_file_buf.set_extension("sav");

        SaveState {
            save_file: String::from(save_file_buf.to_str().unwrap()),
        }
    }

    pub fn load(&self) -> Option<Session> {
        let save_file_path = Path::new(&self.save_file);
        if save_file_path.is_file() {
            let reader = BufReader::new(File::open(&self.save_file).ok()?);
            let decoder = ZlibDecoder::new(reader);
            serde_json::from_reader(decoder).ok()
        } else {
            None
        }
    }

    pub fn save(&self, session: &Session) -> bool {
        let save_file_path = Path::new(&self.save_file);
        let writer = BufWriter::new(File::create(save_file_path).unwrap());
        let mut encoder = ZlibEncoder::new(writer, Compression::best());
        if serde_json::to_writer(&mut encoder, session).is_err() {
            return false;
        }
        encoder.finish().is_ok()
    }
}
