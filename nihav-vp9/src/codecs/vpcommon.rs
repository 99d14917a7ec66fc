use nihav_core::codecs::*;
use super::vp9data::VP9_INV_MAP_TABLE;

/// Boolean decoder for VP9 compressed headers.
///
/// Unlike the VP7/VP8 coder it never pads the input with implicit zeroes:
/// a renormalisation that needs bits past the end of the buffer fails.
pub struct BoolCoder<'a> {
    src:    &'a [u8],
    pos:    usize,
    value:  u64,
    range:  u32,
    bits:   u32,
}

impl<'a> BoolCoder<'a> {
    /// Initialises decoder and checks the marker bit.
    pub fn new(src: &'a [u8]) -> DecoderResult<Self> {
        if src.is_empty() { return Err(DecoderError::ShortData); }
        let mut bc = Self { src, pos: 1, value: u64::from(src[0]) << 56, range: 255, bits: 0 };
        bc.refill();
        if bc.read_bool()? {
            tracing::debug!("bool coder marker bit is set");
            return Err(DecoderError::InvalidData);
        }
        Ok(bc)
    }
    fn refill(&mut self) {
        while self.bits <= 48 && self.pos < self.src.len() {
            self.value |= u64::from(self.src[self.pos]) << (48 - self.bits);
            self.pos  += 1;
            self.bits += 8;
        }
    }
    pub fn read_bool(&mut self) -> DecoderResult<bool> {
        self.read_prob(128)
    }
    pub fn read_prob(&mut self, prob: u8) -> DecoderResult<bool> {
        let split = 1 + (((self.range - 1) * u32::from(prob)) >> 8);
        let bigsplit = u64::from(split) << 56;
        let bit;
        if self.value < bigsplit {
            self.range = split;
            bit = false;
        } else {
            self.range -= split;
            self.value -= bigsplit;
            bit = true;
        }
        self.renorm()?;
        Ok(bit)
    }
    fn renorm(&mut self) -> DecoderResult<()> {
        let shift = self.range.leading_zeros().saturating_sub(24);
        if shift == 0 {
            return Ok(());
        }
        if self.bits < shift {
            self.refill();
            if self.bits < shift {
                return Err(DecoderError::ShortData);
            }
        }
        self.range <<= shift;
        self.value <<= shift;
        self.bits   -= shift;
        Ok(())
    }
    pub fn read_bits(&mut self, bits: u8) -> DecoderResult<u32> {
        let mut val = 0u32;
        for _ in 0..bits {
            val = (val << 1) | (self.read_bool()? as u32);
        }
        Ok(val)
    }
    fn decode_term_subexp(&mut self) -> DecoderResult<usize> {
        if !self.read_bool()? {
            return Ok(self.read_bits(4)? as usize);
        }
        if !self.read_bool()? {
            return Ok(self.read_bits(4)? as usize + 16);
        }
        if !self.read_bool()? {
            return Ok(self.read_bits(5)? as usize + 32);
        }
        let val = self.read_bits(7)? as usize;
        if val < 65 {
            Ok(val + 64)
        } else {
            let bit = self.read_bool()? as usize;
            Ok((val << 1) - 1 + bit)
        }
    }
    /// Reads optional probability update coded as a remapped difference.
    pub fn read_diff_update(&mut self, prob: &mut u8) -> DecoderResult<()> {
        if self.read_prob(252)? {
            let delta = self.decode_term_subexp()?;
            *prob = inv_remap_prob(delta, *prob);
        }
        Ok(())
    }
    /// Reads optional motion vector probability update (explicit 7-bit value).
    pub fn read_mv_update(&mut self, prob: &mut u8) -> DecoderResult<()> {
        if self.read_prob(252)? {
            *prob = ((self.read_bits(7)? << 1) | 1) as u8;
        }
        Ok(())
    }
}

fn inv_recenter_nonneg(v: usize, m: usize) -> usize {
    if v > 2 * m {
        v
    } else if (v & 1) != 0 {
        m - ((v + 1) >> 1)
    } else {
        m + (v >> 1)
    }
}

pub fn inv_remap_prob(delta: usize, prob: u8) -> u8 {
    let v = usize::from(VP9_INV_MAP_TABLE[delta.min(VP9_INV_MAP_TABLE.len() - 1)]);
    let m = usize::from(prob.max(1)) - 1;
    if (m << 1) <= 255 {
        (1 + inv_recenter_nonneg(v, m)) as u8
    } else {
        (255 - inv_recenter_nonneg(v, 254 - m)) as u8
    }
}

/// Merges observed branch counts into a probability.
///
/// `max_count` limits how many observations count in full and `update_factor` is the weight (out of 256) given to fully saturated statistics.
pub fn merge_prob(pre: u8, c0: u32, c1: u32, max_count: u32, update_factor: u32) -> u8 {
    let den = u64::from(c0) + u64::from(c1);
    let prob = if den == 0 {
            128
        } else {
            ((u64::from(c0) * 256 + (den >> 1)) / den).clamp(1, 255) as u32
        };
    let count = den.min(u64::from(max_count)) as u32;
    let factor = update_factor * count / max_count;
    ((u32::from(pre) * (256 - factor) + prob * factor + 128) >> 8) as u8
}

#[derive(Clone,Copy,Debug,PartialEq)]
pub enum VPTreeDef<T: Copy> {
    Index(u8),
    Value(T),
}

fn merge_tree_node(tree: &[VPTreeDef<usize>], idx: usize, probs: &mut [u8], counts: &[u32], max_count: u32, update_factor: u32) -> u32 {
    let mut branch = [0u32; 2];
    for (i, br) in branch.iter_mut().enumerate() {
        *br = match tree[idx + i] {
                VPTreeDef::Value(sym) => counts[sym],
                VPTreeDef::Index(next) => merge_tree_node(tree, usize::from(next), probs, counts, max_count, update_factor),
            };
    }
    probs[idx >> 1] = merge_prob(probs[idx >> 1], branch[0], branch[1], max_count, update_factor);
    branch[0].saturating_add(branch[1])
}

/// Adapts probabilities of all tree nodes using per-symbol counts.
pub fn merge_tree_probs(tree: &[VPTreeDef<usize>], probs: &mut [u8], counts: &[u32], max_count: u32, update_factor: u32) {
    merge_tree_node(tree, 0, probs, counts, max_count, update_factor);
}

/// Boolean encoder used to produce synthetic compressed headers.
#[cfg(test)]
pub struct BoolEncoder {
    dst:    Vec<u8>,
    low:    u32,
    range:  u32,
    count:  i32,
}

#[cfg(test)]
impl BoolEncoder {
    pub fn new() -> Self {
        let mut bc = Self { dst: Vec::new(), low: 0, range: 255, count: -24 };
        bc.put_bool(false, 128);
        bc
    }
    pub fn put_bool(&mut self, bit: bool, prob: u8) {
        let split = 1 + (((self.range - 1) * u32::from(prob)) >> 8);
        let mut low = self.low;
        let mut range = split;
        if bit {
            low  += split;
            range = self.range - split;
        }
        let mut shift = range.leading_zeros() as i32 - 24;
        range <<= shift;
        let mut count = self.count + shift;
        if count >= 0 {
            let offset = shift - count;
            if ((low << (offset - 1)) & 0x8000_0000) != 0 {
                let mut pos = self.dst.len() - 1;
                while self.dst[pos] == 0xFF {
                    self.dst[pos] = 0;
                    pos -= 1;
                }
                self.dst[pos] += 1;
            }
            self.dst.push((low >> (24 - offset)) as u8);
            low <<= offset;
            shift = count;
            low &= 0xFF_FFFF;
            count -= 8;
        }
        low <<= shift;
        self.low   = low;
        self.range = range;
        self.count = count;
    }
    pub fn put_bits(&mut self, val: u32, bits: u8) {
        for i in (0..bits).rev() {
            self.put_bool(((val >> i) & 1) != 0, 128);
        }
    }
    pub fn flush(mut self) -> Vec<u8> {
        for _ in 0..32 {
            self.put_bool(false, 128);
        }
        self.dst
    }
}
