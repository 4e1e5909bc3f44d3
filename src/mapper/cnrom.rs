use serde::{Deserialize, Serialize};

use super::{Mapper, MapperError, SwitchResult};
use crate::rom::RomImage;
use crate::window::PatternWindow;

/// iNES mapper 3 (CNROM): 8 KiB CHR banks, selected by writing the bank
/// index anywhere in the PRG ROM address range. PRG is never switched.
#[derive(Deserialize, Serialize)]
pub struct Cnrom {
    num_banks_chr: usize,
    chr_bank_select: usize,
}

impl Cnrom {
    pub fn new(num_banks_chr: usize) -> Cnrom {
        Cnrom {
            num_banks_chr,
            chr_bank_select: 0,
        }
    }
}

#[typetag::serde]
impl Mapper for Cnrom {
    fn initialize(
        &mut self,
        rom: &RomImage,
        window: &mut PatternWindow,
    ) -> Result<(), MapperError> {
        // The bank index comes from masking the written byte with
        // (count - 1), which only selects correctly when the count is a
        // nonzero power of two.
        if !self.num_banks_chr.is_power_of_two() {
            return Err(MapperError::UnsupportedConfiguration {
                id: 3,
                reason: format!(
                    "CHR bank count must be a nonzero power of two, got {}",
                    self.num_banks_chr
                ),
            });
        }
        window.load_bank(rom.chr_bank(0));
        Ok(())
    }

    fn on_write(
        &mut self,
        rom: &RomImage,
        window: &mut PatternWindow,
        addr: u16,
        data: u8,
    ) -> SwitchResult {
        match addr {
            // register range [0x8000, 0x10000); u16 caps the bus at 0xffff
            0x8000..=0xffff => {
                let bank = data as usize & (self.num_banks_chr - 1);
                window.load_bank(rom.chr_bank(bank));
                self.chr_bank_select = bank;
                SwitchResult::Switched(bank)
            }
            _ => SwitchResult::Ignored,
        }
    }

    fn reset(&mut self, rom: &RomImage, window: &mut PatternWindow) {
        self.chr_bank_select = 0;
        window.load_bank(rom.chr_bank(0));
    }
}
