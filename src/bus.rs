use crate::mapper::SwitchResult;
use crate::window::OutOfRange;

/// Write side of the cartridge port. The CPU collaborator reports every
/// bus write; relevance is decided by the active mapper, not here.
pub trait CpuBus {
    fn notify_write(&mut self, addr: u16, data: u8) -> SwitchResult;
}

/// Read side of the cartridge port for the rendering collaborator.
pub trait PpuBus {
    fn ppu_read(&self, addr: u16) -> Result<u8, OutOfRange>;
}
