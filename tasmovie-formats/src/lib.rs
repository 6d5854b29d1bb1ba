//! Movie file decoders.
//!
//! This crate provides one [`MovieDecoder`](tasmovie_core::MovieDecoder)
//! per supported emulator format:
//!
//! - libTAS (.ltm)
//! - BizHawk (.bk2)
//! - lsnes (.lsmv)
//! - FCEUX (.fm2)
//! - Dolphin (.dtm)
//! - VisualBoyAdvance (.vbm)
//! - Snes9x (.smv)

pub(crate) mod common;
pub mod bk2;
pub mod dtm;
pub mod fm2;
pub mod lsmv;
pub mod ltm;
pub mod smv;
pub mod vbm;

pub use bk2::Bk2Decoder;
pub use dtm::DtmDecoder;
pub use fm2::Fm2Decoder;
pub use lsmv::LsmvDecoder;
pub use ltm::LtmDecoder;
pub use smv::SmvDecoder;
pub use vbm::VbmDecoder;

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;
