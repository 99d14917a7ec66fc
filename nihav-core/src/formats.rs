//! Pixel format definitions.
//!
//! Only planar YUV layouts are described since those are the only ones hardware decoders write.
use std::fmt;

/// Planar YUV pixel format description.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct NAPixelFormaton {
    /// Horizontal chroma subsampling (log2).
    pub h_ss:   u8,
    /// Vertical chroma subsampling (log2).
    pub v_ss:   u8,
    /// Bits per sample.
    pub depth:  u8,
}

/// Predefined format for 8-bit 4:2:0 video.
pub const YUV420_FORMAT: NAPixelFormaton = NAPixelFormaton { h_ss: 1, v_ss: 1, depth: 8 };
/// Predefined format for 10-bit 4:2:0 video.
pub const YUV420P10_FORMAT: NAPixelFormaton = NAPixelFormaton { h_ss: 1, v_ss: 1, depth: 10 };
/// Predefined format for 12-bit 4:2:0 video.
pub const YUV420P12_FORMAT: NAPixelFormaton = NAPixelFormaton { h_ss: 1, v_ss: 1, depth: 12 };

impl NAPixelFormaton {
    /// Constructs a new planar YUV format.
    pub const fn new(h_ss: u8, v_ss: u8, depth: u8) -> Self {
        Self { h_ss, v_ss, depth }
    }
    /// Returns the number of bytes used to store one sample.
    pub fn get_elem_size(&self) -> usize {
        if self.depth > 8 { 2 } else { 1 }
    }
    /// Returns chroma plane dimensions for the provided luma dimensions.
    pub fn get_chroma_size(&self, width: usize, height: usize) -> (usize, usize) {
        let hmask = (1 << self.h_ss) - 1;
        let vmask = (1 << self.v_ss) - 1;
        ((width + hmask) >> self.h_ss, (height + vmask) >> self.v_ss)
    }
    /// Returns the amount of bytes needed to store a picture with the provided dimensions.
    pub fn get_frame_size(&self, width: usize, height: usize) -> usize {
        let (cw, ch) = self.get_chroma_size(width, height);
        (width * height + 2 * cw * ch) * self.get_elem_size()
    }
}

impl fmt::Display for NAPixelFormaton {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sub = match (self.h_ss, self.v_ss) {
                (1, 1) => "420",
                (1, 0) => "422",
                (0, 1) => "440",
                (0, 0) => "444",
                _      => "4xx",
            };
        if self.depth == 8 {
            write!(f, "yuv{}p", sub)
        } else {
            write!(f, "yuv{}p{}", sub, self.depth)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_frame_sizes() {
        assert_eq!(YUV420_FORMAT.get_chroma_size(65, 33), (33, 17));
        assert_eq!(YUV420_FORMAT.get_frame_size(64, 64), 64 * 64 * 3 / 2);
        assert_eq!(YUV420P10_FORMAT.get_frame_size(64, 64), 64 * 64 * 3);
        assert_eq!(YUV420P12_FORMAT.to_string(), "yuv420p12");
        assert_eq!(NAPixelFormaton::new(0, 0, 8).to_string(), "yuv444p");
    }
}
