//! Cartridge-side memory mapping for the NES: iNES image loading, mapper
//! chip variants, and the CHR pattern window visible to the rendering
//! collaborator.

pub mod bus;
pub mod mapper;
pub mod rom;
pub mod romdb;
pub mod save;
pub mod session;
pub mod window;
