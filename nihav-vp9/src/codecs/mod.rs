macro_rules! validate {
    ($a:expr) => { if !$a { tracing::debug!("check failed at {}:{}", file!(), line!()); return Err(DecoderError::InvalidData); } };
}

#[cfg(feature="decoder_vp9")]
#[allow(clippy::needless_range_loop)]
pub mod vpcommon;
#[cfg(feature="decoder_vp9")]
pub mod vp9data;
#[cfg(feature="decoder_vp9")]
pub mod vp9split;
#[cfg(feature="decoder_vp9")]
#[allow(clippy::needless_range_loop)]
pub mod vp9header;
#[cfg(feature="decoder_vp9")]
#[allow(clippy::needless_range_loop)]
pub mod vp9probs;
#[cfg(feature="decoder_vp9")]
pub mod vp9refs;
#[cfg(feature="decoder_vp9")]
#[allow(clippy::needless_range_loop)]
pub mod vp9task;
#[cfg(feature="decoder_vp9")]
pub mod vp9;
