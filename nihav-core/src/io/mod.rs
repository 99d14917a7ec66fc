//! Bitstream reading and writing.
pub mod bitreader;
pub mod bitwriter;
