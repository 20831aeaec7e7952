//! MCAM binary toolpath files
//!
//! Strict little-endian decoding with a bounds check before every read and
//! caps on every declared count. Unreadable input is retried as G-code text.

pub mod decoder;
pub mod reader;

pub use decoder::{
    filetime_to_datetime, has_mcam_magic, DecodeOutcome, DecodeSource, McamDecoder, McamFile,
    McamGeometry, McamHeader, MAGICS, MAX_FACES, MAX_TOOLPATHS, MAX_VERTICES,
    SUPPORTED_VERSIONS,
};
pub use reader::ByteReader;
