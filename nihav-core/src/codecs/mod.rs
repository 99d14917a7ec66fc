//! Parser interface definitions.
pub use crate::frame::*;
use crate::io::bitreader::BitReaderError;
pub use crate::options::*;
use thiserror::Error;

/// A list specifying general parsing errors.
///
/// Every error is fatal for the current frame only, the parser stays usable for the next access unit.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Error)]
pub enum DecoderError {
    /// No frame matches the request.
    #[error("no frame available")]
    NoFrame,
    /// Parser needs some feedback before it can continue.
    #[error("try again later")]
    TryAgain,
    /// Frame slot allocation failed.
    #[error("frame slot allocation failed")]
    AllocError,
    /// Invalid input data was provided.
    #[error("invalid bitstream data")]
    InvalidData,
    /// Provided input turned out to be incomplete.
    #[error("bitstream ended prematurely")]
    ShortData,
    /// Frame refers to a reference slot that holds no picture.
    #[error("missing reference frame")]
    MissingReference,
    /// Stream uses a feature (profile, colour format) that is not supported.
    #[error("unsupported feature")]
    NotImplemented,
}

impl DecoderError {
    /// Reports whether the error comes from malformed stream data.
    pub fn is_stream_error(self) -> bool {
        matches!(self, DecoderError::InvalidData | DecoderError::ShortData)
    }
}

/// A specialised `Result` type for parsing operations.
pub type DecoderResult<T> = Result<T, DecoderError>;

impl From<BitReaderError> for DecoderError {
    fn from(e: BitReaderError) -> Self {
        match e {
            BitReaderError::BitstreamEnd => DecoderError::ShortData,
            _ => DecoderError::InvalidData,
        }
    }
}

/// Hardware-assisted parser trait.
///
/// A parser turns access units into tasks for fixed-function hardware and keeps the cross-frame state
/// (references, adaptive probabilities) the hardware itself does not track.
pub trait NAHWParser: NAOptionHandler {
    /// Output of a successfully parsed access unit.
    type Output;
    /// Parses the next frame from the packet.
    ///
    /// Packets carrying several frames are drained by calling this again with the same packet while [`has_pending`] reports more data.
    ///
    /// [`has_pending`]: #tymethod.has_pending
    fn parse(&mut self, pkt: &NAPacket) -> DecoderResult<Self::Output>;
    /// Reports whether the last packet still has frames to be parsed.
    fn has_pending(&self) -> bool;
    /// Tells parser to drop all references and internal state (e.g. after error or seeking).
    fn flush(&mut self);
}
