//! Core functionality shared by the NihAV hardware parsers: errors, bitstream I/O, frame slots and options.
#[allow(clippy::upper_case_acronyms)]
pub mod codecs;

pub mod formats;
pub mod frame;
pub mod io;
pub mod options;
