//! Bitstream writer functionality.
//!
//! Bitstream writer works on `Vec<u8>` and writes fields MSB first, mirroring [`BitReader`].
//! It is mostly used to build synthetic frame headers.
//!
//! # Examples
//!
//! Writing a frame marker followed by a 16-bit value:
//! ```
//! use nihav_core::io::bitwriter::BitWriter;
//!
//! # fn foo() -> Vec<u8> {
//! let mut bw = BitWriter::new(Vec::new());
//! bw.write(2, 2);
//! bw.write(63, 16);
//! # bw.end()
//! # }
//! ```
//!
//! [`BitReader`]: ../bitreader/struct.BitReader.html

/// Bitstream writer.
pub struct BitWriter {
    dst:    Vec<u8>,
    bitbuf: u32,
    bits:   u8,
    start:  usize,
}

impl BitWriter {
    /// Creates a new instance of `BitWriter` that will append data to the input vector.
    pub fn new(dst: Vec<u8>) -> Self {
        let start = dst.len();
        Self {
            dst,
            start,
            bitbuf: 0,
            bits:   0,
        }
    }
    /// Writes single zero bit to the output.
    pub fn write0(&mut self) { self.write_bit(false); }
    /// Writes single set bit to the output.
    pub fn write1(&mut self) { self.write_bit(true); }
    /// Writes single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.write(bit as u32, 1);
    }
    /// Writes `bits` bits of `val` value to the output.
    pub fn write(&mut self, val: u32, bits: u8) {
        if bits == 0 {
            return;
        }
        if self.bits + bits <= 32 {
            let val = if bits < 32 { val & ((1 << bits) - 1) } else { val };
            self.bitbuf |= val << (32 - self.bits - bits);
            self.bits += bits;
            self.flush();
        } else {
            let cbits = 32 - self.bits;
            let bits2 = bits - cbits;
            self.write(val >> bits2, cbits);
            self.write(val & ((1 << bits2) - 1), bits2);
        }
    }
    /// Writes a sign-magnitude value: `bits` bits of magnitude followed by a sign bit.
    pub fn write_signed(&mut self, val: i32, bits: u8) {
        self.write(val.unsigned_abs(), bits);
        self.write_bit(val < 0);
    }
    /// Writes whole bytes, the writer does not have to be aligned.
    pub fn write_bytes(&mut self, src: &[u8]) {
        for &b in src.iter() {
            self.write(u32::from(b), 8);
        }
    }
    /// Tells the amount of bits written so far.
    pub fn tell(&self) -> usize {
        (self.dst.len() - self.start) * 8 + (self.bits as usize)
    }
    fn flush(&mut self) {
        while self.bits >= 8 {
            self.dst.push((self.bitbuf >> 24) as u8);
            self.bitbuf <<= 8;
            self.bits    -= 8;
        }
    }
    /// Finalises operations (padding the last byte with zeroes) and returns the vector containing output data.
    pub fn end(mut self) -> Vec<u8> {
        self.flush();
        if self.bits > 0 {
            self.dst.push((self.bitbuf >> 24) as u8);
        }
        self.dst
    }
}
