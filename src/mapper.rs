pub mod cnrom;
pub mod nrom;

use std::error::Error;
use std::fmt;

use crate::rom::{Mirror, RomImage};
use crate::window::PatternWindow;

use self::cnrom::Cnrom;
use self::nrom::Nrom;

/// Outcome of forwarding a CPU-bus write to the active mapper.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SwitchResult {
    /// write fell outside the mapper's register range; no side effect
    Ignored,
    /// bank switch completed, new bank index attached
    Switched(usize),
}

#[derive(Debug)]
pub enum MapperError {
    UnknownId(u8),
    UnsupportedConfiguration { id: u8, reason: String },
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperError::UnknownId(id) => write!(f, "unsupported mapper: {:03}", id),
            MapperError::UnsupportedConfiguration { id, reason } => {
                write!(f, "mapper {:03}: {}", id, reason)
            }
        }
    }
}

impl Error for MapperError {}

/// Bank-switch protocol of one cartridge chip family.
///
/// The session owns the image and the window and passes them in; the
/// variant owns nothing but its own register state.
#[typetag::serde]
pub trait Mapper {
    /// Validate the image against the variant's structural assumptions
    /// and load bank 0 into the window. Must not touch the window when
    /// validation fails.
    fn initialize(
        &mut self,
        rom: &RomImage,
        window: &mut PatternWindow,
    ) -> Result<(), MapperError>;

    /// Decode one CPU-bus write. The range check lives here, nowhere
    /// else; a completed switch has fully overwritten the window before
    /// this returns.
    fn on_write(
        &mut self,
        rom: &RomImage,
        window: &mut PatternWindow,
        addr: u16,
        data: u8,
    ) -> SwitchResult;

    /// Back to the power-on register state, bank 0 reloaded.
    fn reset(&mut self, rom: &RomImage, window: &mut PatternWindow);

    fn mirror(&self) -> Mirror {
        Mirror::Hardware
    }
}

/// One-time variant lookup, keyed on the header mapper id.
pub fn from_image(rom: &RomImage) -> Result<Box<dyn Mapper>, MapperError> {
    match rom.mapper_id() {
        0 => Ok(Box::new(Nrom::new(rom.chr_banks()))),
        3 => Ok(Box::new(Cnrom::new(rom.chr_banks()))),
        id => Err(MapperError::UnknownId(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::build_image;

    #[test]
    fn test_variant_lookup() {
        let rom = RomImage::from_bytes(&build_image(1, 1, 0)).unwrap();
        assert!(from_image(&rom).is_ok());

        let rom = RomImage::from_bytes(&build_image(1, 4, 3)).unwrap();
        assert!(from_image(&rom).is_ok());
    }

    #[test]
    fn test_unknown_id() {
        let rom = RomImage::from_bytes(&build_image(1, 1, 7)).unwrap();
        match from_image(&rom) {
            Err(MapperError::UnknownId(7)) => {}
            _ => panic!("expected UnknownId(7)"),
        }
    }
}
