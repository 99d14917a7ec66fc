use nihav_core::codecs::*;
use nihav_core::io::bitreader::*;
use super::vp9data::*;

pub const VP9_NUM_REF_SLOTS: usize = 8;
pub const VP9_REFS_PER_FRAME: usize = 3;
pub const VP9_NUM_CONTEXTS: usize = 4;
pub const VP9_MAX_SEGMENTS: usize = 8;

pub const SEG_LVL_ALT_Q: usize = 0;
pub const SEG_LVL_ALT_LF: usize = 1;
pub const SEG_LVL_REF_FRAME: usize = 2;
pub const SEG_LVL_SKIP: usize = 3;

const SEG_FEATURE_BITS: [u8; 4] = [ 8, 6, 2, 0 ];
const SEG_FEATURE_SIGNED: [bool; 4] = [ true, true, false, false ];

const VP9_SYNC_CODE: [u32; 3] = [ 0x49, 0x83, 0x42 ];

#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub enum VP9ColorSpace {
    #[default]
    Unknown,
    BT601,
    BT709,
    SMPTE170,
    SMPTE240,
    BT2020,
    Reserved,
    RGB,
}

impl From<u32> for VP9ColorSpace {
    fn from(val: u32) -> Self {
        match val {
            1 => VP9ColorSpace::BT601,
            2 => VP9ColorSpace::BT709,
            3 => VP9ColorSpace::SMPTE170,
            4 => VP9ColorSpace::SMPTE240,
            5 => VP9ColorSpace::BT2020,
            6 => VP9ColorSpace::Reserved,
            7 => VP9ColorSpace::RGB,
            _ => VP9ColorSpace::Unknown,
        }
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub enum VP9InterpFilter {
    #[default]
    Regular,
    Smooth,
    Sharp,
    Bilinear,
    Switchable,
}

const LITERAL_TO_FILTER: [VP9InterpFilter; 4] = [
    VP9InterpFilter::Smooth, VP9InterpFilter::Regular, VP9InterpFilter::Sharp, VP9InterpFilter::Bilinear
];

/// Saved probability contexts to be reset to defaults before decoding the frame.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub enum VP9ContextReset {
    #[default]
    None,
    All,
    Single(usize),
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct VP9LoopFilter {
    pub level:          u8,
    pub sharpness:      u8,
    pub delta_enabled:  bool,
    pub delta_update:   bool,
    pub ref_deltas:     [i8; 4],
    pub mode_deltas:    [i8; 2],
}

impl Default for VP9LoopFilter {
    fn default() -> Self {
        Self {
            level:          0,
            sharpness:      0,
            delta_enabled:  false,
            delta_update:   false,
            ref_deltas:     [1, 0, -1, -1],
            mode_deltas:    [0, 0],
        }
    }
}

#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct VP9Quant {
    pub base_q:         u8,
    pub ydc_delta:      i8,
    pub uvdc_delta:     i8,
    pub uvac_delta:     i8,
    pub lossless:       bool,
}

#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct VP9SegFeatures {
    pub enabled:        [bool; 4],
    pub data:           [i16; 4],
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct VP9Segmentation {
    pub enabled:        bool,
    pub update_map:     bool,
    pub temporal_update: bool,
    pub update_data:    bool,
    pub abs_delta:      bool,
    pub tree_probs:     [u8; 7],
    pub pred_probs:     [u8; 3],
    pub features:       [VP9SegFeatures; VP9_MAX_SEGMENTS],
}

impl Default for VP9Segmentation {
    fn default() -> Self {
        Self {
            enabled:        false,
            update_map:     false,
            temporal_update: false,
            update_data:    false,
            abs_delta:      false,
            tree_probs:     [255; 7],
            pred_probs:     [255; 3],
            features:       [VP9SegFeatures::default(); VP9_MAX_SEGMENTS],
        }
    }
}

/// Values derived for every segment.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct VP9SegmentParams {
    /// Dequantisation factors: luma DC, luma AC, chroma DC, chroma AC.
    pub qmul:           [[i16; 2]; 2],
    /// Loop filter level per reference frame and mode delta.
    pub lflvl:          [[u8; 2]; 4],
}

/// Geometry of a picture stored in a reference slot.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct VP9RefInfo {
    pub width:          usize,
    pub height:         usize,
    pub bit_depth:      u8,
}

#[derive(Clone,Debug,Default,PartialEq)]
pub struct VP9FrameHeader {
    pub profile:        u8,
    pub show_existing:  bool,
    pub show_existing_idx: usize,
    pub keyframe:       bool,
    pub show_frame:     bool,
    pub error_res:      bool,
    pub intra_only:     bool,
    pub reset_ctx:      u8,

    pub bit_depth:      u8,
    pub color_space:    VP9ColorSpace,
    pub color_range:    bool,
    pub ss_x:           bool,
    pub ss_y:           bool,

    pub width:          usize,
    pub height:         usize,
    pub render_width:   usize,
    pub render_height:  usize,

    pub refresh_mask:   u8,
    pub ref_idx:        [usize; VP9_REFS_PER_FRAME],
    /// Sign bias indexed by reference frame (intra, last, golden, altref).
    pub sign_bias:      [bool; 4],
    /// Reference to current frame size ratios in 14-bit fixed point (zero when sizes are equal).
    pub ref_scale:      [[u32; 2]; VP9_REFS_PER_FRAME],
    pub allow_hp:       bool,
    pub interp_filter:  VP9InterpFilter,

    pub refresh_ctx:    bool,
    pub parallel:       bool,
    pub ctx_idx:        usize,
    pub ctx_reset:      VP9ContextReset,

    pub lf:             VP9LoopFilter,
    pub quant:          VP9Quant,
    pub seg:            VP9Segmentation,
    pub seg_params:     [VP9SegmentParams; VP9_MAX_SEGMENTS],

    pub tile_cols_log2: u8,
    pub tile_rows_log2: u8,

    /// Uncompressed header size in bytes.
    pub hdr_size:       usize,
    /// Compressed header size in bytes.
    pub compr_size:     usize,
}

fn read_prob(br: &mut BitReader) -> BitReaderResult<u8> {
    if br.read_bool()? {
        Ok(br.read(8)? as u8)
    } else {
        Ok(255)
    }
}

fn read_delta_q(br: &mut BitReader) -> BitReaderResult<i8> {
    if br.read_bool()? {
        Ok(br.read_signed(4)? as i8)
    } else {
        Ok(0)
    }
}

fn clip_uintp2(val: i32, bits: u8) -> i32 {
    val.max(0).min((1 << bits) - 1)
}

impl VP9FrameHeader {
    pub fn new() -> Self { Self::default() }
    /// Reports whether the frame is coded without references.
    pub fn is_intra(&self) -> bool { self.keyframe || self.intra_only }
    pub fn get_mi_cols(&self) -> usize { (self.width + 7) >> 3 }
    pub fn get_mi_rows(&self) -> usize { (self.height + 7) >> 3 }
    pub fn get_sb64_cols(&self) -> usize { (self.get_mi_cols() + 7) >> 3 }
    pub fn get_sb64_rows(&self) -> usize { (self.get_mi_rows() + 7) >> 3 }
    /// Returns picture format.
    pub fn get_format(&self) -> NAPixelFormaton {
        NAPixelFormaton::new(self.ss_x as u8, self.ss_y as u8, self.bit_depth)
    }
    pub fn get_ref_info(&self) -> VP9RefInfo {
        VP9RefInfo { width: self.width, height: self.height, bit_depth: self.bit_depth }
    }
    /// Returns the allowed range for the number of tile columns (log2).
    pub fn get_tile_cols_log2_range(&self) -> (u8, u8) {
        let sb_cols = self.get_sb64_cols();
        let mut min_log2 = 0;
        while (64 << min_log2) < sb_cols {
            min_log2 += 1;
        }
        let mut max_log2 = 1;
        while (sb_cols >> max_log2) >= 4 {
            max_log2 += 1;
        }
        (min_log2, max_log2 - 1)
    }

    fn read_sync_code(br: &mut BitReader) -> DecoderResult<()> {
        for &code in VP9_SYNC_CODE.iter() {
            validate!(br.read(8)? == code);
        }
        Ok(())
    }
    fn read_color_config(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        self.bit_depth = if self.profile >= 2 {
                if br.read_bool()? { 12 } else { 10 }
            } else {
                8
            };
        self.color_space                        = VP9ColorSpace::from(br.read(3)?);
        if self.color_space == VP9ColorSpace::RGB {
            // only 4:4:4 profiles may code RGB
            return Err(DecoderError::NotImplemented);
        }
        self.color_range                        = br.read_bool()?;
        self.ss_x = true;
        self.ss_y = true;
        Ok(())
    }
    fn read_frame_size(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        self.width                              = (br.read(16)? as usize) + 1;
        self.height                             = (br.read(16)? as usize) + 1;
        Ok(())
    }
    fn read_render_size(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        if br.read_bool()? {
            self.render_width                   = (br.read(16)? as usize) + 1;
            self.render_height                  = (br.read(16)? as usize) + 1;
        } else {
            self.render_width  = self.width;
            self.render_height = self.height;
        }
        Ok(())
    }
    fn read_frame_size_with_refs(&mut self, br: &mut BitReader, refs: &[Option<VP9RefInfo>; VP9_NUM_REF_SLOTS]) -> DecoderResult<()> {
        let mut found = false;
        for i in 0..VP9_REFS_PER_FRAME {
            if br.read_bool()? {
                let rinfo = refs[self.ref_idx[i]].ok_or(DecoderError::MissingReference)?;
                self.width  = rinfo.width;
                self.height = rinfo.height;
                found = true;
                break;
            }
        }
        if !found {
            self.read_frame_size(br)?;
        }
        self.read_render_size(br)
    }
    fn calc_ref_scales(&mut self, refs: &[Option<VP9RefInfo>; VP9_NUM_REF_SLOTS]) -> DecoderResult<()> {
        for i in 0..VP9_REFS_PER_FRAME {
            let rinfo = refs[self.ref_idx[i]].ok_or(DecoderError::MissingReference)?;
            validate!(rinfo.bit_depth == self.bit_depth);
            validate!(self.width * 2 >= rinfo.width && self.height * 2 >= rinfo.height);
            validate!(self.width <= rinfo.width * 16 && self.height <= rinfo.height * 16);
            self.ref_scale[i] = if rinfo.width != self.width || rinfo.height != self.height {
                    [((rinfo.width << 14) / self.width) as u32, ((rinfo.height << 14) / self.height) as u32]
                } else {
                    [0, 0]
                };
        }
        Ok(())
    }
    fn setup_past_independence(&mut self) {
        self.lf.ref_deltas  = [1, 0, -1, -1];
        self.lf.mode_deltas = [0, 0];
        for feat in self.seg.features.iter_mut() {
            *feat = VP9SegFeatures::default();
        }
        self.seg.abs_delta = false;
    }
    fn read_loop_filter(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        self.lf.level                           = br.read(6)? as u8;
        self.lf.sharpness                       = br.read(3)? as u8;
        self.lf.delta_enabled                   = br.read_bool()?;
        self.lf.delta_update = false;
        if self.lf.delta_enabled {
            self.lf.delta_update                = br.read_bool()?;
            if self.lf.delta_update {
                for delta in self.lf.ref_deltas.iter_mut() {
                    if br.read_bool()? {
                        *delta                  = br.read_signed(6)? as i8;
                    }
                }
                for delta in self.lf.mode_deltas.iter_mut() {
                    if br.read_bool()? {
                        *delta                  = br.read_signed(6)? as i8;
                    }
                }
            }
        }
        Ok(())
    }
    fn read_quant(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        self.quant.base_q                       = br.read(8)? as u8;
        self.quant.ydc_delta                    = read_delta_q(br)?;
        self.quant.uvdc_delta                   = read_delta_q(br)?;
        self.quant.uvac_delta                   = read_delta_q(br)?;
        self.quant.lossless = self.quant.base_q == 0 && self.quant.ydc_delta == 0 && self.quant.uvdc_delta == 0 && self.quant.uvac_delta == 0;
        Ok(())
    }
    fn read_segmentation(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        let seg = &mut self.seg;
        seg.update_map      = false;
        seg.temporal_update = false;
        seg.update_data     = false;
        seg.enabled                             = br.read_bool()?;
        if !seg.enabled {
            return Ok(());
        }
        seg.update_map                          = br.read_bool()?;
        if seg.update_map {
            for prob in seg.tree_probs.iter_mut() {
                *prob                           = read_prob(br)?;
            }
            seg.temporal_update                 = br.read_bool()?;
            for prob in seg.pred_probs.iter_mut() {
                *prob = if seg.temporal_update { read_prob(br)? } else { 255 };
            }
        }
        seg.update_data                         = br.read_bool()?;
        if seg.update_data {
            seg.abs_delta                       = br.read_bool()?;
            for feat in seg.features.iter_mut() {
                for j in 0..4 {
                    feat.enabled[j]             = br.read_bool()?;
                    feat.data[j] = 0;
                    if feat.enabled[j] {
                        let mut val             = br.read(SEG_FEATURE_BITS[j])? as i16;
                        if SEG_FEATURE_SIGNED[j] && br.read_bool()? {
                            val = -val;
                        }
                        feat.data[j] = val;
                    }
                }
            }
        }
        Ok(())
    }
    fn read_tile_info(&mut self, br: &mut BitReader) -> DecoderResult<()> {
        let (min_log2, max_log2) = self.get_tile_cols_log2_range();
        self.tile_cols_log2 = min_log2;
        while self.tile_cols_log2 < max_log2 {
            if !br.read_bool()? {
                break;
            }
            self.tile_cols_log2 += 1;
        }
        self.tile_rows_log2                     = br.read(1)? as u8;
        if self.tile_rows_log2 != 0 {
            self.tile_rows_log2                += br.read(1)? as u8;
        }
        Ok(())
    }
    fn calc_segment_params(&mut self) {
        let bpp_idx = match self.bit_depth {
                10 => 1,
                12 => 2,
                _  => 0,
            };
        let base_q = i32::from(self.quant.base_q);
        let shift = if self.lf.level >= 32 { 1 } else { 0 };
        for (seg_id, params) in self.seg_params.iter_mut().enumerate() {
            let feat = &self.seg.features[seg_id];
            let qyac = if self.seg.enabled && feat.enabled[SEG_LVL_ALT_Q] {
                    let q = i32::from(feat.data[SEG_LVL_ALT_Q]);
                    clip_uintp2(if self.seg.abs_delta { q } else { base_q + q }, 8)
                } else {
                    base_q
                };
            let qydc  = clip_uintp2(qyac + i32::from(self.quant.ydc_delta), 8) as usize;
            let quvdc = clip_uintp2(qyac + i32::from(self.quant.uvdc_delta), 8) as usize;
            let quvac = clip_uintp2(qyac + i32::from(self.quant.uvac_delta), 8) as usize;
            let qyac  = clip_uintp2(qyac, 8) as usize;
            params.qmul[0][0] = VP9_DC_QUANT[bpp_idx][qydc];
            params.qmul[0][1] = VP9_AC_QUANT[bpp_idx][qyac];
            params.qmul[1][0] = VP9_DC_QUANT[bpp_idx][quvdc];
            params.qmul[1][1] = VP9_AC_QUANT[bpp_idx][quvac];

            let level = i32::from(self.lf.level);
            let lflvl = if self.seg.enabled && feat.enabled[SEG_LVL_ALT_LF] {
                    let lf = i32::from(feat.data[SEG_LVL_ALT_LF]);
                    clip_uintp2(if self.seg.abs_delta { lf } else { level + lf }, 6)
                } else {
                    level
                };
            if self.lf.delta_enabled {
                let ref_deltas  = self.lf.ref_deltas.map(i32::from);
                let mode_deltas = self.lf.mode_deltas.map(i32::from);
                let intra_lvl = clip_uintp2(lflvl + (ref_deltas[0] << shift), 6) as u8;
                params.lflvl[0] = [intra_lvl; 2];
                for rf in 1..4 {
                    for mode in 0..2 {
                        params.lflvl[rf][mode] = clip_uintp2(lflvl + ((ref_deltas[rf] + mode_deltas[mode]) << shift), 6) as u8;
                    }
                }
            } else {
                params.lflvl = [[lflvl as u8; 2]; 4];
            }
        }
    }

    /// Parses uncompressed frame header.
    ///
    /// `self` should contain the previous frame header since some state (loop filter deltas, segmentation features, colour parameters) persists between frames.
    /// On error the header contents are unspecified and should be discarded.
    pub fn parse(&mut self, src: &[u8], refs: &[Option<VP9RefInfo>; VP9_NUM_REF_SLOTS]) -> DecoderResult<()> {
        let mut br = BitReader::new(src);

        self.show_existing  = false;
        self.intra_only     = false;
        self.reset_ctx      = 0;
        self.refresh_mask   = 0;
        self.ctx_reset      = VP9ContextReset::None;
        self.ref_scale      = [[0; 2]; VP9_REFS_PER_FRAME];
        self.hdr_size       = 0;
        self.compr_size     = 0;

        validate!(br.read(2)? == 2);
        let profile_low                         = br.read(1)? as u8;
        let profile_high                        = br.read(1)? as u8;
        self.profile = (profile_high << 1) | profile_low;
        if self.profile == 3 {
            validate!(!br.read_bool()?);
        }
        if self.profile != 0 && self.profile != 2 {
            tracing::debug!("unsupported profile {}", self.profile);
            return Err(DecoderError::NotImplemented);
        }
        self.show_existing                      = br.read_bool()?;
        if self.show_existing {
            self.show_existing_idx              = br.read(3)? as usize;
            self.hdr_size = br.byte_pos();
            return Ok(());
        }
        self.keyframe                           = !br.read_bool()?;
        self.show_frame                         = br.read_bool()?;
        self.error_res                          = br.read_bool()?;
        if self.keyframe {
            Self::read_sync_code(&mut br)?;
            self.read_color_config(&mut br)?;
            self.read_frame_size(&mut br)?;
            self.read_render_size(&mut br)?;
            self.refresh_mask = 0xFF;
            self.interp_filter = VP9InterpFilter::Regular;
            self.allow_hp = false;
        } else {
            if !self.show_frame {
                self.intra_only                 = br.read_bool()?;
            }
            if !self.error_res {
                self.reset_ctx                  = br.read(2)? as u8;
            }
            if self.intra_only {
                Self::read_sync_code(&mut br)?;
                if self.profile > 0 {
                    self.read_color_config(&mut br)?;
                } else {
                    self.bit_depth   = 8;
                    self.color_space = VP9ColorSpace::BT601;
                    self.color_range = false;
                    self.ss_x = true;
                    self.ss_y = true;
                }
                self.refresh_mask               = br.read(8)? as u8;
                self.read_frame_size(&mut br)?;
                self.read_render_size(&mut br)?;
            } else {
                self.refresh_mask               = br.read(8)? as u8;
                for i in 0..VP9_REFS_PER_FRAME {
                    self.ref_idx[i]             = br.read(3)? as usize;
                    self.sign_bias[i + 1]       = br.read_bool()?;
                    if refs[self.ref_idx[i]].is_none() {
                        tracing::debug!("reference slot {} is empty", self.ref_idx[i]);
                        return Err(DecoderError::MissingReference);
                    }
                }
                validate!(self.bit_depth != 0);
                self.read_frame_size_with_refs(&mut br, refs)?;
                self.allow_hp                   = br.read_bool()?;
                self.interp_filter = if br.read_bool()? {
                        VP9InterpFilter::Switchable
                    } else {
                        LITERAL_TO_FILTER[br.read(2)? as usize]
                    };
                self.calc_ref_scales(refs)?;
            }
        }
        if self.is_intra() {
            self.sign_bias = [false; 4];
        }

        if !self.error_res {
            self.refresh_ctx                    = br.read_bool()?;
            self.parallel                       = br.read_bool()?;
        } else {
            self.refresh_ctx = false;
            self.parallel    = true;
        }
        self.ctx_idx                            = br.read(2)? as usize;
        if self.is_intra() || self.error_res {
            self.setup_past_independence();
            if self.keyframe || self.error_res || self.reset_ctx == 3 {
                self.ctx_reset = VP9ContextReset::All;
            } else if self.reset_ctx == 2 {
                self.ctx_reset = VP9ContextReset::Single(self.ctx_idx);
            }
            self.ctx_idx = 0;
        }

        self.read_loop_filter(&mut br)?;
        self.read_quant(&mut br)?;
        self.read_segmentation(&mut br)?;
        self.read_tile_info(&mut br)?;

        self.compr_size                         = br.read(16)? as usize;
        validate!(self.compr_size > 0);
        br.align();
        self.hdr_size = br.byte_pos();
        validate!(self.compr_size <= src.len() - self.hdr_size);

        self.calc_segment_params();

        tracing::debug!("frame {}x{} key {} intra-only {} show {} ctx {} q {} hdr {}+{}",
                        self.width, self.height, self.keyframe, self.intra_only, self.show_frame,
                        self.ctx_idx, self.quant.base_q, self.hdr_size, self.compr_size);
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use nihav_core::io::bitwriter::BitWriter;

    /// Description of a synthetic frame header.
    #[derive(Clone)]
    pub struct HeaderDesc {
        pub profile:        u8,
        pub high_depth:     bool,
        pub show_existing:  Option<usize>,
        pub keyframe:       bool,
        pub show_frame:     bool,
        pub error_res:      bool,
        pub intra_only:     bool,
        pub reset_ctx:      u8,
        pub width:          usize,
        pub height:         usize,
        pub refresh_mask:   u8,
        pub ref_idx:        [usize; 3],
        pub sign_bias:      [bool; 3],
        pub size_from_ref:  Option<usize>,
        pub allow_hp:       bool,
        pub interp:         Option<u32>,
        pub refresh_ctx:    bool,
        pub parallel:       bool,
        pub ctx_idx:        usize,
        pub lf_level:       u8,
        pub lf_deltas:      Option<([Option<i8>; 4], [Option<i8>; 2])>,
        pub base_q:         u8,
        pub ydc_delta:      i8,
        pub seg_q:          Option<(bool, [i16; 8])>,
        pub tile_cols_inc:  u8,
        pub tile_rows_log2: u8,
    }

    impl Default for HeaderDesc {
        fn default() -> Self {
            Self {
                profile:        0,
                high_depth:     false,
                show_existing:  None,
                keyframe:       true,
                show_frame:     true,
                error_res:      false,
                intra_only:     false,
                reset_ctx:      0,
                width:          64,
                height:         64,
                refresh_mask:   0,
                ref_idx:        [0, 1, 2],
                sign_bias:      [false; 3],
                size_from_ref:  None,
                allow_hp:       false,
                interp:         None,
                refresh_ctx:    true,
                parallel:       false,
                ctx_idx:        0,
                lf_level:       0,
                lf_deltas:      None,
                base_q:         0,
                ydc_delta:      0,
                seg_q:          None,
                tile_cols_inc:  0,
                tile_rows_log2: 0,
            }
        }
    }

    fn write_signed(bw: &mut BitWriter, val: i32, bits: u8) {
        bw.write_signed(val, bits);
    }

    /// Writes uncompressed header followed by the compressed header data and some tile payload.
    pub fn write_frame(desc: &HeaderDesc, compr: &[u8]) -> Vec<u8> {
        let mut bw = BitWriter::new(Vec::new());
        bw.write(2, 2);
        bw.write(u32::from(desc.profile & 1), 1);
        bw.write(u32::from(desc.profile >> 1), 1);
        if desc.profile == 3 {
            bw.write0();
        }
        if let Some(idx) = desc.show_existing {
            bw.write1();
            bw.write(idx as u32, 3);
            return bw.end();
        }
        bw.write0();
        bw.write_bit(!desc.keyframe);
        bw.write_bit(desc.show_frame);
        bw.write_bit(desc.error_res);
        let write_color = |bw: &mut BitWriter| {
                if desc.profile >= 2 {
                    bw.write_bit(desc.high_depth);
                }
                bw.write(2, 3); // BT.709
                bw.write0();
            };
        let write_size = |bw: &mut BitWriter| {
                bw.write((desc.width - 1) as u32, 16);
                bw.write((desc.height - 1) as u32, 16);
                bw.write0();
            };
        if desc.keyframe {
            bw.write_bytes(&[0x49, 0x83, 0x42]);
            write_color(&mut bw);
            write_size(&mut bw);
        } else {
            if !desc.show_frame {
                bw.write_bit(desc.intra_only);
            }
            if !desc.error_res {
                bw.write(u32::from(desc.reset_ctx), 2);
            }
            if desc.intra_only {
                bw.write_bytes(&[0x49, 0x83, 0x42]);
                if desc.profile > 0 {
                    write_color(&mut bw);
                }
                bw.write(u32::from(desc.refresh_mask), 8);
                write_size(&mut bw);
            } else {
                bw.write(u32::from(desc.refresh_mask), 8);
                for i in 0..3 {
                    bw.write(desc.ref_idx[i] as u32, 3);
                    bw.write_bit(desc.sign_bias[i]);
                }
                if let Some(ref_no) = desc.size_from_ref {
                    for _ in 0..ref_no {
                        bw.write0();
                    }
                    bw.write1();
                    bw.write0();
                } else {
                    bw.write(0, 3);
                    write_size(&mut bw);
                }
                bw.write_bit(desc.allow_hp);
                if let Some(filt) = desc.interp {
                    bw.write0();
                    bw.write(filt, 2);
                } else {
                    bw.write1();
                }
            }
        }
        if !desc.error_res {
            bw.write_bit(desc.refresh_ctx);
            bw.write_bit(desc.parallel);
        }
        bw.write(desc.ctx_idx as u32, 2);
        // loop filter
        bw.write(u32::from(desc.lf_level), 6);
        bw.write(0, 3);
        if let Some((ref_deltas, mode_deltas)) = desc.lf_deltas {
            bw.write1();
            bw.write1();
            for delta in ref_deltas.iter().chain(mode_deltas.iter()) {
                if let Some(val) = delta {
                    bw.write1();
                    write_signed(&mut bw, i32::from(*val), 6);
                } else {
                    bw.write0();
                }
            }
        } else {
            bw.write0();
        }
        // quantisation
        bw.write(u32::from(desc.base_q), 8);
        if desc.ydc_delta != 0 {
            bw.write1();
            write_signed(&mut bw, i32::from(desc.ydc_delta), 4);
        } else {
            bw.write0();
        }
        bw.write0();
        bw.write0();
        // segmentation
        if let Some((abs_delta, seg_q)) = desc.seg_q {
            bw.write1();
            bw.write0(); // no map update
            bw.write1();
            bw.write_bit(abs_delta);
            for &q in seg_q.iter() {
                if q != 0 {
                    bw.write1();
                    write_signed(&mut bw, i32::from(q), 8);
                } else {
                    bw.write0();
                }
                bw.write0();
                bw.write0();
                bw.write0();
            }
        } else {
            bw.write0();
        }
        // tiles
        for _ in 0..desc.tile_cols_inc {
            bw.write1();
        }
        let hdr = VP9FrameHeader { width: desc.width, height: desc.height, ..Default::default() };
        let (min_log2, max_log2) = hdr.get_tile_cols_log2_range();
        if min_log2 + desc.tile_cols_inc < max_log2 {
            bw.write0();
        }
        if desc.tile_rows_log2 > 0 {
            bw.write1();
            bw.write_bit(desc.tile_rows_log2 > 1);
        } else {
            bw.write0();
        }
        bw.write(compr.len() as u32, 16);
        let mut data = bw.end();
        data.extend_from_slice(compr);
        data.extend_from_slice(&[0x55; 16]);
        data
    }

    fn no_refs() -> [Option<VP9RefInfo>; VP9_NUM_REF_SLOTS] { [None; VP9_NUM_REF_SLOTS] }

    #[test]
    fn test_keyframe_header() {
        let desc = HeaderDesc { width: 352, height: 288, lf_level: 36, lf_deltas: Some(([None; 4], [None; 2])), base_q: 60, ydc_delta: -3, tile_rows_log2: 1, ..Default::default() };
        let data = write_frame(&desc, &[0; 10]);
        let mut hdr = VP9FrameHeader::new();
        hdr.parse(&data, &no_refs()).unwrap();
        assert!(hdr.keyframe && hdr.show_frame && !hdr.intra_only);
        assert_eq!((hdr.width, hdr.height), (352, 288));
        assert_eq!((hdr.render_width, hdr.render_height), (352, 288));
        assert_eq!(hdr.bit_depth, 8);
        assert_eq!(hdr.color_space, VP9ColorSpace::BT709);
        assert_eq!(hdr.refresh_mask, 0xFF);
        assert_eq!(hdr.ctx_reset, VP9ContextReset::All);
        assert_eq!(hdr.ctx_idx, 0);
        assert_eq!(hdr.quant.ydc_delta, -3);
        assert!(!hdr.quant.lossless);
        assert_eq!(hdr.tile_cols_log2, 0);
        assert_eq!(hdr.tile_rows_log2, 1);
        assert_eq!(hdr.compr_size, 10);
        assert_eq!(hdr.hdr_size + 10 + 16, data.len());
        assert_eq!(hdr.seg_params[0].qmul[0][0], VP9_DC_QUANT[0][57]);
        assert_eq!(hdr.seg_params[0].qmul[0][1], VP9_AC_QUANT[0][60]);
        // level 36 doubles the deltas: intra +2, golden/altref -2
        assert_eq!(hdr.seg_params[0].lflvl, [[38, 38], [36, 36], [34, 34], [34, 34]]);
        assert_eq!(hdr.get_format(), YUV420_FORMAT);
    }
    #[test]
    fn test_header_errors() {
        let mut hdr = VP9FrameHeader::new();
        let desc = HeaderDesc::default();
        let mut data = write_frame(&desc, &[0; 4]);
        data[2] ^= 0x10;
        // broken sync code
        assert_eq!(hdr.parse(&data, &no_refs()), Err(DecoderError::InvalidData));

        let data = write_frame(&HeaderDesc { profile: 1, ..Default::default() }, &[0; 4]);
        assert_eq!(hdr.parse(&data, &no_refs()), Err(DecoderError::NotImplemented));

        let data = write_frame(&desc, &[0; 4]);
        assert_eq!(hdr.parse(&data[..5], &no_refs()), Err(DecoderError::ShortData));
        // compressed header does not fit
        let len = data.len();
        assert_eq!(hdr.parse(&data[..len - 17], &no_refs()), Err(DecoderError::InvalidData));
        assert_eq!(hdr.parse(&[0x00, 0x00], &no_refs()), Err(DecoderError::InvalidData));
    }
    #[test]
    fn test_inter_header() {
        let mut refs = no_refs();
        refs[0] = Some(VP9RefInfo { width: 64, height: 64, bit_depth: 8 });
        refs[3] = Some(VP9RefInfo { width: 128, height: 96, bit_depth: 8 });
        refs[5] = Some(VP9RefInfo { width: 64, height: 64, bit_depth: 8 });
        let mut hdr = VP9FrameHeader::new();
        hdr.parse(&write_frame(&HeaderDesc::default(), &[0; 4]), &no_refs()).unwrap();

        let desc = HeaderDesc {
                keyframe:       false,
                refresh_mask:   0x21,
                ref_idx:        [0, 3, 5],
                sign_bias:      [false, false, true],
                size_from_ref:  Some(0),
                allow_hp:       true,
                interp:         Some(0),
                ctx_idx:        2,
                reset_ctx:      2,
                base_q:         40,
                lf_level:       10,
                lf_deltas:      Some(([None, Some(2), None, Some(-5)], [Some(1), None])),
                ..Default::default()
            };
        hdr.parse(&write_frame(&desc, &[0; 4]), &refs).unwrap();
        assert!(!hdr.keyframe && !hdr.is_intra());
        assert_eq!((hdr.width, hdr.height), (64, 64));
        assert_eq!(hdr.refresh_mask, 0x21);
        assert_eq!(hdr.ref_idx, [0, 3, 5]);
        assert_eq!(hdr.sign_bias, [false, false, false, true]);
        assert_eq!(hdr.interp_filter, VP9InterpFilter::Smooth);
        assert!(hdr.allow_hp);
        assert_eq!(hdr.ctx_idx, 2);
        // reset is applied only to intra frames
        assert_eq!(hdr.ctx_reset, VP9ContextReset::None);
        assert_eq!(hdr.ref_scale[0], [0, 0]);
        assert_eq!(hdr.ref_scale[1], [2 << 14, 3 << 13]);
        assert_eq!(hdr.lf.ref_deltas, [1, 2, -1, -5]);
        assert_eq!(hdr.lf.mode_deltas, [1, 0]);
        assert_eq!(hdr.seg_params[0].lflvl, [[11, 11], [13, 12], [10, 9], [6, 5]]);

        // missing reference
        let desc2 = HeaderDesc { ref_idx: [0, 3, 6], ..desc.clone() };
        assert_eq!(hdr.clone().parse(&write_frame(&desc2, &[0; 4]), &refs), Err(DecoderError::MissingReference));
        // reference too large for scaling
        let desc3 = HeaderDesc { size_from_ref: None, width: 32, height: 32, ..desc.clone() };
        assert_eq!(hdr.clone().parse(&write_frame(&desc3, &[0; 4]), &refs), Err(DecoderError::InvalidData));
        // inter frame on a fresh stream
        let mut fresh = VP9FrameHeader::new();
        assert_eq!(fresh.parse(&write_frame(&desc, &[0; 4]), &no_refs()), Err(DecoderError::MissingReference));
        let desc4 = HeaderDesc { size_from_ref: None, ..desc.clone() };
        assert_eq!(fresh.parse(&write_frame(&desc4, &[0; 4]), &no_refs()), Err(DecoderError::MissingReference));
    }
    #[test]
    fn test_intra_only_and_segments() {
        let mut hdr = VP9FrameHeader::new();
        let desc = HeaderDesc {
                keyframe:       false,
                show_frame:     false,
                intra_only:     true,
                reset_ctx:      2,
                ctx_idx:        3,
                refresh_mask:   0x04,
                width:          1920,
                height:         1080,
                base_q:         100,
                seg_q:          Some((false, [0, -20, 10, 0, 0, 0, 0, 200])),
                tile_cols_inc:  1,
                ..Default::default()
            };
        hdr.parse(&write_frame(&desc, &[0; 4]), &no_refs()).unwrap();
        assert!(hdr.intra_only && hdr.is_intra() && !hdr.show_frame);
        assert_eq!(hdr.bit_depth, 8);
        assert_eq!(hdr.refresh_mask, 0x04);
        assert_eq!(hdr.ctx_reset, VP9ContextReset::Single(3));
        assert_eq!(hdr.ctx_idx, 0);
        assert_eq!(hdr.get_tile_cols_log2_range(), (0, 2));
        assert_eq!(hdr.tile_cols_log2, 1);
        assert!(hdr.seg.enabled && hdr.seg.update_data && !hdr.seg.update_map);
        assert_eq!(hdr.seg_params[0].qmul[0][1], VP9_AC_QUANT[0][100]);
        assert_eq!(hdr.seg_params[1].qmul[0][1], VP9_AC_QUANT[0][80]);
        assert_eq!(hdr.seg_params[2].qmul[1][1], VP9_AC_QUANT[0][110]);
        assert_eq!(hdr.seg_params[7].qmul[0][1], VP9_AC_QUANT[0][255]);
    }
    #[test]
    fn test_high_bitdepth_and_show_existing() {
        let mut hdr = VP9FrameHeader::new();
        let desc = HeaderDesc { profile: 2, high_depth: true, base_q: 255, ..Default::default() };
        hdr.parse(&write_frame(&desc, &[0; 4]), &no_refs()).unwrap();
        assert_eq!(hdr.bit_depth, 12);
        assert_eq!(hdr.get_format(), YUV420P12_FORMAT);
        assert_eq!(hdr.seg_params[0].qmul[0][1], 29247);

        let data = write_frame(&HeaderDesc { show_existing: Some(5), ..Default::default() }, &[]);
        hdr.parse(&data, &no_refs()).unwrap();
        assert!(hdr.show_existing);
        assert_eq!(hdr.show_existing_idx, 5);
    }
}
