use serde::{Deserialize, Serialize};

use super::{Mapper, MapperError, SwitchResult};
use crate::rom::RomImage;
use crate::window::PatternWindow;

/// iNES mapper 0 (NROM): no bank switching at all. The single CHR bank
/// (or the zero-filled CHR RAM region) stays visible for the whole
/// session, and every bus write falls through as ignored.
#[derive(Deserialize, Serialize)]
pub struct Nrom {
    num_banks_chr: usize,
}

impl Nrom {
    pub fn new(num_banks_chr: usize) -> Nrom {
        Nrom { num_banks_chr }
    }
}

#[typetag::serde]
impl Mapper for Nrom {
    fn initialize(
        &mut self,
        rom: &RomImage,
        window: &mut PatternWindow,
    ) -> Result<(), MapperError> {
        // the board has no switching hardware, extra banks would be
        // unreachable
        if self.num_banks_chr > 1 {
            return Err(MapperError::UnsupportedConfiguration {
                id: 0,
                reason: format!("at most one CHR bank, got {}", self.num_banks_chr),
            });
        }
        window.load_bank(rom.chr_bank(0));
        Ok(())
    }

    fn on_write(
        &mut self,
        _rom: &RomImage,
        _window: &mut PatternWindow,
        _addr: u16,
        _data: u8,
    ) -> SwitchResult {
        SwitchResult::Ignored
    }

    fn reset(&mut self, rom: &RomImage, window: &mut PatternWindow) {
        window.load_bank(rom.chr_bank(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::build_image;

    #[test]
    fn test_initialize_loads_single_bank() {
        let rom = RomImage::from_bytes(&build_image(1, 1, 0)).unwrap();
        let mut mapper = Nrom::new(1);
        let mut window = PatternWindow::new();
        mapper.initialize(&rom, &mut window).unwrap();
        assert_eq!(window.as_slice(), rom.chr_bank(0));
    }

    #[test]
    fn test_chr_ram_board() {
        let rom = RomImage::from_bytes(&build_image(1, 0, 0)).unwrap();
        let mut mapper = Nrom::new(0);
        let mut window = PatternWindow::new();
        mapper.initialize(&rom, &mut window).unwrap();
        assert!(window.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_extra_banks_rejected() {
        let rom = RomImage::from_bytes(&build_image(1, 2, 0)).unwrap();
        let mut mapper = Nrom::new(2);
        let mut window = PatternWindow::new();
        assert!(matches!(
            mapper.initialize(&rom, &mut window),
            Err(MapperError::UnsupportedConfiguration { id: 0, .. })
        ));
    }

    #[test]
    fn test_all_writes_ignored() {
        let rom = RomImage::from_bytes(&build_image(1, 1, 0)).unwrap();
        let mut mapper = Nrom::new(1);
        let mut window = PatternWindow::new();
        mapper.initialize(&rom, &mut window).unwrap();

        for addr in [0x0000u16, 0x7fff, 0x8000, 0xffff] {
            assert_eq!(
                mapper.on_write(&rom, &mut window, addr, 0x01),
                SwitchResult::Ignored
            );
        }
        assert_eq!(window.generation(), 1);
    }
}
