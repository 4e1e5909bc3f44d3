use std::error::Error;
use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use sha1_smol::Sha1;

pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;

const MAGIC: [u8; 4] = [b'N', b'E', b'S', 0x1a];

#[derive(Debug)]
pub enum LoadError {
    BadMagic([u8; 4]),
    MalformedImage {
        expected: usize,
        actual: usize,
        prg_banks: usize,
        chr_banks: usize,
    },
    Io(io::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::BadMagic(magic) => {
                write!(f, "not an iNES image (magic bytes {:02x?})", magic)
            }
            LoadError::MalformedImage {
                expected,
                actual,
                prg_banks,
                chr_banks,
            } => write!(
                f,
                "image is {} bytes, expected {} (16 header + {} x 16 KiB PRG + {} x 8 KiB CHR)",
                actual, expected, prg_banks, chr_banks
            ),
            LoadError::Io(e) => write!(f, "cannot read image: {}", e),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> LoadError {
        LoadError::Io(e)
    }
}

/// Nametable mirroring wired on the cartridge board.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum Mirror {
    /// defer to the solder-pad configuration in the image header
    Hardware,
    Vertical,
    Horizontal,
}

struct RomHeader {
    prg_rom_chunks: u8,
    chr_rom_chunks: u8,
    mapper1: u8,
    mapper2: u8,
}

impl RomHeader {
    fn parse(buf: &[u8]) -> Result<RomHeader, LoadError> {
        if buf.len() < HEADER_SIZE {
            return Err(LoadError::MalformedImage {
                expected: HEADER_SIZE,
                actual: buf.len(),
                prg_banks: 0,
                chr_banks: 0,
            });
        }
        if buf[0..4] != MAGIC {
            return Err(LoadError::BadMagic([buf[0], buf[1], buf[2], buf[3]]));
        }
        Ok(RomHeader {
            prg_rom_chunks: buf[4],
            chr_rom_chunks: buf[5],
            mapper1: buf[6],
            mapper2: buf[7],
        })
    }

    fn mapper_id(&self) -> u8 {
        (self.mapper2 & 0xf0) | (self.mapper1 >> 4)
    }

    fn has_trainer(&self) -> bool {
        self.mapper1 & 0x04 != 0
    }

    fn hw_mirror(&self) -> Mirror {
        if self.mapper1 & 0x01 != 0 {
            Mirror::Vertical
        } else {
            Mirror::Horizontal
        }
    }
}

/// Immutable cartridge image, partitioned into PRG and CHR regions at load.
#[derive(Deserialize, Serialize)]
pub struct RomImage {
    sha1_digest: String,

    prg_banks: usize,
    chr_banks: usize,
    mapper_id: u8,
    hw_mirror: Mirror,

    mem_prg: Vec<u8>,
    mem_chr: Vec<u8>,
}

impl RomImage {
    pub fn from_file(filename: &str) -> Result<RomImage, LoadError> {
        let buf = std::fs::read(filename)?;
        Self::from_bytes(&buf)
    }

    pub fn from_bytes(buf: &[u8]) -> Result<RomImage, LoadError> {
        let header = RomHeader::parse(buf)?;

        let prg_banks = header.prg_rom_chunks as usize;
        let chr_banks = header.chr_rom_chunks as usize;
        let trainer = if header.has_trainer() { TRAINER_SIZE } else { 0 };

        // The regions are byte-concatenated with no padding, so the total
        // length is fully determined by the header. Anything else means a
        // corrupt or mislabeled dump.
        let expected =
            HEADER_SIZE + trainer + prg_banks * PRG_BANK_SIZE + chr_banks * CHR_BANK_SIZE;
        if buf.len() != expected {
            return Err(LoadError::MalformedImage {
                expected,
                actual: buf.len(),
                prg_banks,
                chr_banks,
            });
        }

        let sha1_digest = Sha1::from(&buf[HEADER_SIZE..]).digest().to_string();

        let prg_start = HEADER_SIZE + trainer;
        let chr_start = prg_start + prg_banks * PRG_BANK_SIZE;
        let mem_prg = buf[prg_start..chr_start].to_vec();
        let mem_chr = match chr_banks {
            // no CHR ROM on board: 8 KiB of CHR RAM instead
            0 => vec![0; CHR_BANK_SIZE],
            _ => buf[chr_start..].to_vec(),
        };

        Ok(RomImage {
            sha1_digest,
            prg_banks,
            chr_banks,
            mapper_id: header.mapper_id(),
            hw_mirror: header.hw_mirror(),
            mem_prg,
            mem_chr,
        })
    }

    pub fn sha1_digest(&self) -> &str {
        &self.sha1_digest
    }

    pub fn prg_banks(&self) -> usize {
        self.prg_banks
    }

    pub fn chr_banks(&self) -> usize {
        self.chr_banks
    }

    pub fn mapper_id(&self) -> u8 {
        self.mapper_id
    }

    pub fn hw_mirror(&self) -> Mirror {
        self.hw_mirror
    }

    pub fn prg_rom(&self) -> &[u8] {
        &self.mem_prg
    }

    /// 8 KiB CHR bank at `index`. Callers must keep `index` inside the
    /// bank count they validated at initialize time.
    pub fn chr_bank(&self, index: usize) -> &[u8] {
        let start = index * CHR_BANK_SIZE;
        &self.mem_chr[start..start + CHR_BANK_SIZE]
    }
}

#[cfg(test)]
pub(crate) fn build_image(prg_banks: usize, chr_banks: usize, mapper_id: u8) -> Vec<u8> {
    let mut buf = vec![
        b'N',
        b'E',
        b'S',
        0x1a,
        prg_banks as u8,
        chr_banks as u8,
        (mapper_id & 0x0f) << 4,
        mapper_id & 0xf0,
        0,
        0,
        0,
        0,
        0,
        0,
        0,
        0,
    ];
    for bank in 0..prg_banks {
        buf.extend((0..PRG_BANK_SIZE).map(|i| (bank * 31 + i) as u8));
    }
    for bank in 0..chr_banks {
        buf.extend((0..CHR_BANK_SIZE).map(|i| (bank * 131 + i * 7) as u8));
    }
    buf
}
