use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::rom::CHR_BANK_SIZE;

/// Read past the end of the pattern window. Recoverable: it points at an
/// address-decoding bug in the caller, not at corrupt state here.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutOfRange {
    pub offset: usize,
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pattern window read at {:#06x}, window is {} bytes",
            self.offset, self.len
        )
    }
}

impl Error for OutOfRange {}

/// The CHR bank currently visible to the rendering collaborator.
///
/// Fixed size, overwritten in place on every bank switch, never cleared
/// in between. The generation counter lets a renderer skip redraws when
/// nothing changed.
#[derive(Deserialize, Serialize)]
pub struct PatternWindow {
    #[serde(with = "BigArray")]
    data: [u8; CHR_BANK_SIZE],
    generation: u64,
}

impl PatternWindow {
    pub fn new() -> PatternWindow {
        PatternWindow {
            data: [0; CHR_BANK_SIZE],
            generation: 0,
        }
    }

    pub fn read(&self, offset: usize) -> Result<u8, OutOfRange> {
        self.data.get(offset).copied().ok_or(OutOfRange {
            offset,
            len: CHR_BANK_SIZE,
        })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Bumped once per bank load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn load_bank(&mut self, bank: &[u8]) {
        self.data.copy_from_slice(bank);
        self.generation += 1;
    }
}

impl Default for PatternWindow {
    fn default() -> Self {
        Self::new()
    }
}
