//! Bitstream reader functionality.
//!
//! Bitstream reader operates on `&[u8]` and reads fixed-length fields MSB first,
//! which is the layout used by uncompressed frame headers.
//!
//! # Examples
//!
//! Reading a frame marker and a profile bit:
//! ```
//! use nihav_core::io::bitreader::BitReader;
//!
//! # use nihav_core::io::bitreader::BitReaderResult;
//! # fn foo() -> BitReaderResult<u32> {
//! let bits: [u8; 2] = [ 0x82, 0x49 ];
//! let mut br = BitReader::new(&bits);
//! let marker = br.read(2)?;
//! let profile_low = br.read_bool()?;
//! # Ok(marker)
//! # }
//! ```

use thiserror::Error;

/// A list specifying general bitstream reading errors.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Error)]
pub enum BitReaderError {
    /// The reader is at the end of bitstream.
    #[error("bitstream end reached")]
    BitstreamEnd,
    /// The caller tried to read too many bits at once (e.g. 128).
    #[error("too many bits requested")]
    TooManyBitsRequested,
}

use self::BitReaderError::*;

/// A specialised `Result` type for bitstream operations.
pub type BitReaderResult<T> = Result<T, BitReaderError>;

/// Bitstream reader.
#[derive(Debug,Clone)]
pub struct BitReader<'a> {
    cache: u64,
    bits:  u8,
    pos:   usize,
    src:   &'a [u8],
}

impl<'a> BitReader<'a> {
    /// Constructs a new instance of bitstream reader.
    pub fn new(src: &'a [u8]) -> Self {
        BitReader{ cache: 0, pos: 0, bits: 0, src }
    }

    /// Reports the current bit position in the bitstream (the number of bits read so far).
    pub fn tell(&self) -> usize {
        self.pos * 8 - (self.bits as usize)
    }

    /// Reports the position of the first byte that has not been touched by reading yet.
    ///
    /// Partially consumed bytes count as read, so after [`align`] this is the start of the following data.
    ///
    /// [`align`]: #method.align
    pub fn byte_pos(&self) -> usize {
        (self.tell() + 7) >> 3
    }

    #[inline(always)]
    fn refill(&mut self) -> BitReaderResult<()> {
        if self.pos >= self.src.len() { return Err(BitstreamEnd) }
        while self.bits <= 56 && self.pos < self.src.len() {
            self.cache |= u64::from(self.src[self.pos]) << (56 - self.bits);
            self.pos  += 1;
            self.bits += 8;
        }
        Ok(())
    }

    #[inline(always)]
    fn read_cache(&self, nbits: u8) -> u32 {
        (self.cache >> (64 - nbits)) as u32
    }

    #[inline(always)]
    fn skip_cache(&mut self, nbits: u8) {
        self.cache <<= nbits;
        self.bits -= nbits;
    }

    /// Reads the specified amount of bits as an unsigned value.
    ///
    /// The amount should fit into 32 bits. If the amount of bits
    /// requested to read is larger than the amount of bits left the
    /// call will return [`BitstreamEnd`].
    ///
    /// [`BitstreamEnd`]: ./enum.BitReaderError.html#variant.BitstreamEnd
    #[inline(always)]
    pub fn read(&mut self, nbits: u8) -> BitReaderResult<u32> {
        if nbits == 0 { return Ok(0) }
        if nbits > 32 { return Err(TooManyBitsRequested) }
        if self.bits < nbits {
            self.refill()?;
            if self.bits < nbits { return Err(BitstreamEnd) }
        }
        let res = self.read_cache(nbits);
        self.skip_cache(nbits);
        Ok(res)
    }

    /// Reads single bit from the stream and interprets it as a boolean value.
    #[inline(always)]
    pub fn read_bool(&mut self) -> BitReaderResult<bool> {
        Ok(self.read(1)? == 1)
    }

    /// Reads a sign-magnitude value: `nbits` of magnitude followed by a sign bit.
    pub fn read_signed(&mut self, nbits: u8) -> BitReaderResult<i32> {
        let val = self.read(nbits)? as i32;
        if self.read_bool()? {
            Ok(-val)
        } else {
            Ok(val)
        }
    }

    /// Aligns the bit position to the next byte boundary. If already at byte boundary the function does nothing.
    pub fn align(&mut self) {
        let pos = self.bits & 7;
        if pos != 0 {
            self.skip_cache(pos);
        }
    }
}
