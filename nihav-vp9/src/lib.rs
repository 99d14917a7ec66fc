//! Crate for providing VP9 frame-level parsing for hardware-accelerated decoding.
extern crate nihav_core;

#[allow(clippy::collapsible_if)]
#[allow(clippy::collapsible_else_if)]
#[allow(clippy::comparison_chain)]
#[allow(clippy::identity_op)]
#[allow(clippy::needless_late_init)]
#[allow(clippy::unreadable_literal)]
#[allow(clippy::upper_case_acronyms)]
#[allow(clippy::manual_range_contains)]
mod codecs;

#[cfg(feature="decoder_vp9")]
pub use crate::codecs::vp9::{VP9Parser, VP9ParseResult};
#[cfg(feature="decoder_vp9")]
pub use crate::codecs::vp9header::*;
#[cfg(feature="decoder_vp9")]
pub use crate::codecs::vp9probs::{VP9ProbContext, VP9MVCompProbs, VP9Counts, VP9MVCompCounts, VP9CompressedHeader, VP9TxMode, VP9RefMode};
#[cfg(feature="decoder_vp9")]
pub use crate::codecs::vp9task::*;
