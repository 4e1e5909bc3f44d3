use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::bus::{CpuBus, PpuBus};
use crate::mapper::{self, Mapper, MapperError, SwitchResult};
use crate::rom::{Mirror, RomImage};
use crate::window::{OutOfRange, PatternWindow};

/// Callback invoked with the new bank index after every completed switch.
pub type SwitchHook = Box<dyn FnMut(usize) + Send>;

/// One emulated cartridge: the image, the mapper variant picked from its
/// header, and the CHR window the variant writes into. Sessions are
/// independent of each other; nothing here is process-global.
#[derive(Deserialize, Serialize)]
pub struct Session {
    /// cartridge image, immutable for the session's lifetime
    rom: RomImage,
    /// active mapper variant, chosen once at load; never hot-swapped
    mapper: Box<dyn Mapper>,
    /// CHR bank currently visible to the rendering collaborator
    window: PatternWindow,
    #[serde(skip)]
    switch_hook: Option<SwitchHook>,
}

impl Session {
    /// Look up the variant for the image and run its initial bank load.
    /// Any failure aborts construction; there is no partially
    /// initialized session.
    pub fn new(rom: RomImage) -> Result<Session, MapperError> {
        let mut mapper = mapper::from_image(&rom)?;
        let mut window = PatternWindow::new();
        mapper.initialize(&rom, &mut window)?;

        info!(
            "session start: mapper {:03}, #prg: {}, #chr: {}",
            rom.mapper_id(),
            rom.prg_banks(),
            rom.chr_banks()
        );

        Ok(Session {
            rom,
            mapper,
            window,
            switch_hook: None,
        })
    }

    pub fn reset(&mut self) {
        self.mapper.reset(&self.rom, &mut self.window);
    }

    /// Effective nametable mirroring: the variant may override what the
    /// header solder pads say.
    pub fn mirror(&self) -> Mirror {
        match self.mapper.mirror() {
            Mirror::Hardware => self.rom.hw_mirror(),
            m => m,
        }
    }

    pub fn rom(&self) -> &RomImage {
        &self.rom
    }

    pub fn window(&self) -> &PatternWindow {
        &self.window
    }

    pub fn set_switch_hook(&mut self, hook: SwitchHook) {
        self.switch_hook = Some(hook);
    }
}

impl CpuBus for Session {
    fn notify_write(&mut self, addr: u16, data: u8) -> SwitchResult {
        let res = self.mapper.on_write(&self.rom, &mut self.window, addr, data);
        if let SwitchResult::Switched(bank) = res {
            trace!(
                "write {:#06x} <- {:#04x}: switched to bank {}",
                addr, data, bank
            );
            if let Some(hook) = self.switch_hook.as_mut() {
                hook(bank);
            }
        }
        res
    }
}

impl PpuBus for Session {
    fn ppu_read(&self, addr: u16) -> Result<u8, OutOfRange> {
        self.window.read(addr as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::build_image;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cnrom_session(chr_banks: usize) -> Session {
        let rom = RomImage::from_bytes(&build_image(1, chr_banks, 3)).unwrap();
        Session::new(rom).unwrap()
    }

    #[test]
    fn test_new_rejects_unknown_mapper() {
        let rom = RomImage::from_bytes(&build_image(1, 1, 42)).unwrap();
        assert!(matches!(
            Session::new(rom),
            Err(MapperError::UnknownId(42))
        ));
    }

    #[test]
    fn test_new_rejects_bad_configuration() {
        let rom = RomImage::from_bytes(&build_image(1, 0, 3)).unwrap();
        assert!(matches!(
            Session::new(rom),
            Err(MapperError::UnsupportedConfiguration { .. })
        ));
    }

    #[test]
    fn test_dispatch_forwards_every_write() {
        let mut session = cnrom_session(4);

        assert_eq!(session.notify_write(0x7fff, 0xff), SwitchResult::Ignored);
        assert_eq!(session.notify_write(0x8000, 0x06), SwitchResult::Switched(2));

        let expected = session.rom().chr_bank(2).to_vec();
        assert_eq!(session.window().as_slice(), &expected[..]);
    }

    #[test]
    fn test_switch_hook() {
        let mut session = cnrom_session(4);

        let calls = Arc::new(AtomicUsize::new(0));
        let last_bank = Arc::new(AtomicUsize::new(usize::MAX));
        let (c, b) = (calls.clone(), last_bank.clone());
        session.set_switch_hook(Box::new(move |bank| {
            c.fetch_add(1, Ordering::SeqCst);
            b.store(bank, Ordering::SeqCst);
        }));

        session.notify_write(0x1234, 0x01); // ignored, no hook
        session.notify_write(0x8000, 0x03);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(last_bank.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_ppu_read() {
        let session = cnrom_session(2);
        let bank0 = session.rom().chr_bank(0);
        assert_eq!(session.ppu_read(0x0000), Ok(bank0[0]));
        assert_eq!(session.ppu_read(0x1fff), Ok(bank0[0x1fff]));

        // recoverable, session stays usable
        assert!(session.ppu_read(0x2000).is_err());
        assert_eq!(session.ppu_read(0x0000), Ok(bank0[0]));
    }

    #[test]
    fn test_reset() {
        let mut session = cnrom_session(4);
        session.notify_write(0x8000, 0x03);
        session.reset();
        let bank0 = session.rom().chr_bank(0).to_vec();
        assert_eq!(session.window().as_slice(), &bank0[..]);
    }

    #[test]
    fn test_mirror_resolution() {
        let mut buf = build_image(1, 4, 3);
        buf[6] |= 0x01; // vertical
        let session = Session::new(RomImage::from_bytes(&buf).unwrap()).unwrap();
        assert_eq!(session.mirror(), Mirror::Vertical);
    }
}
