use nihav_core::codecs::*;
use super::vpcommon::*;
use super::vp9data::*;
use super::vp9header::*;

pub const VP9_TX_SIZES: usize = 4;
pub const VP9_COEF_BANDS: usize = 6;
pub const VP9_COEF_CONTEXTS: usize = 6;
pub const VP9_SKIP_CONTEXTS: usize = 3;
pub const VP9_INTER_MODE_CONTEXTS: usize = 7;
pub const VP9_INTERP_CONTEXTS: usize = 4;
pub const VP9_INTRA_INTER_CONTEXTS: usize = 4;
pub const VP9_REF_CONTEXTS: usize = 5;
pub const VP9_BLOCK_SIZE_GROUPS: usize = 4;
pub const VP9_PARTITION_CONTEXTS: usize = 16;
pub const VP9_MV_CLASSES: usize = 11;
pub const VP9_MV_OFFSET_BITS: usize = 10;

const COEF_COUNT_SAT: u32 = 24;
const COEF_MAX_UPDATE_FACTOR: u32 = 112;
const COEF_MAX_UPDATE_FACTOR_AFTER_KEY: u32 = 128;
const MODE_MV_COUNT_SAT: u32 = 20;
const MODE_MV_MAX_UPDATE_FACTOR: u32 = 128;

pub type VP9CoefProbs = [[[[[[u8; 3]; VP9_COEF_CONTEXTS]; VP9_COEF_BANDS]; 2]; 2]; VP9_TX_SIZES];

#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub enum VP9TxMode {
    #[default]
    Only4x4,
    Allow8x8,
    Allow16x16,
    Allow32x32,
    Select,
}

impl VP9TxMode {
    fn from_bits(val: u32) -> Self {
        match val {
            0 => VP9TxMode::Only4x4,
            1 => VP9TxMode::Allow8x8,
            2 => VP9TxMode::Allow16x16,
            3 => VP9TxMode::Allow32x32,
            _ => VP9TxMode::Select,
        }
    }
    /// Returns the largest transform size (as log2 of size in 4-pixel units) usable with this mode.
    pub fn max_tx_size(self) -> usize {
        match self {
            VP9TxMode::Only4x4    => 0,
            VP9TxMode::Allow8x8   => 1,
            VP9TxMode::Allow16x16 => 2,
            _                     => 3,
        }
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub enum VP9RefMode {
    #[default]
    Single,
    Compound,
    Select,
}

/// Frame-level decisions made by the compressed header.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub struct VP9CompressedHeader {
    pub tx_mode:        VP9TxMode,
    pub ref_mode:       VP9RefMode,
    /// Reference always used in compound prediction.
    pub comp_fixed_ref: usize,
    /// References selected by the compound reference probability.
    pub comp_var_ref:   [usize; 2],
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct VP9MVCompProbs {
    pub sign:       u8,
    pub classes:    [u8; VP9_MV_CLASSES - 1],
    pub class0:     [u8; 1],
    pub bits:       [u8; VP9_MV_OFFSET_BITS],
    pub class0_fp:  [[u8; 3]; 2],
    pub fp:         [u8; 3],
    pub class0_hp:  u8,
    pub hp:         u8,
}

impl VP9MVCompProbs {
    fn new(comp: usize) -> Self {
        Self {
            sign:       128,
            classes:    VP9_DEFAULT_MV_CLASS_PROBS[comp],
            class0:     [VP9_DEFAULT_MV_CLASS0_PROBS[comp]],
            bits:       VP9_DEFAULT_MV_BITS_PROBS,
            class0_fp:  VP9_DEFAULT_MV_CLASS0_FP_PROBS,
            fp:         VP9_DEFAULT_MV_FP_PROBS,
            class0_hp:  VP9_DEFAULT_MV_CLASS0_HP_PROB,
            hp:         VP9_DEFAULT_MV_HP_PROB,
        }
    }
}

/// Adaptive probabilities in bitstream order.
#[derive(Clone,Debug,PartialEq)]
pub struct VP9ProbContext {
    pub tx8:            [[u8; 1]; 2],
    pub tx16:           [[u8; 2]; 2],
    pub tx32:           [[u8; 3]; 2],
    pub coef:           VP9CoefProbs,
    pub skip:           [u8; VP9_SKIP_CONTEXTS],
    pub inter_mode:     [[u8; 3]; VP9_INTER_MODE_CONTEXTS],
    pub interp_filter:  [[u8; 2]; VP9_INTERP_CONTEXTS],
    pub intra_inter:    [u8; VP9_INTRA_INTER_CONTEXTS],
    pub comp_inter:     [u8; VP9_REF_CONTEXTS],
    pub single_ref:     [[u8; 2]; VP9_REF_CONTEXTS],
    pub comp_ref:       [u8; VP9_REF_CONTEXTS],
    pub y_mode:         [[u8; VP9_INTRA_MODES - 1]; VP9_BLOCK_SIZE_GROUPS],
    pub uv_mode:        [[u8; VP9_INTRA_MODES - 1]; VP9_INTRA_MODES],
    pub partition:      [[u8; 3]; VP9_PARTITION_CONTEXTS],
    pub mv_joint:       [u8; 3],
    pub mv_comp:        [VP9MVCompProbs; 2],
}

impl Default for VP9ProbContext {
    fn default() -> Self {
        Self {
            tx8:            VP9_DEFAULT_TX8_PROBS,
            tx16:           VP9_DEFAULT_TX16_PROBS,
            tx32:           VP9_DEFAULT_TX32_PROBS,
            coef:           VP9_DEFAULT_COEF_PROBS,
            skip:           VP9_DEFAULT_SKIP_PROBS,
            inter_mode:     VP9_DEFAULT_INTER_MODE_PROBS,
            interp_filter:  VP9_DEFAULT_INTERP_FILTER_PROBS,
            intra_inter:    VP9_DEFAULT_INTRA_INTER_PROBS,
            comp_inter:     VP9_DEFAULT_COMP_INTER_PROBS,
            single_ref:     VP9_DEFAULT_SINGLE_REF_PROBS,
            comp_ref:       VP9_DEFAULT_COMP_REF_PROBS,
            y_mode:         VP9_DEFAULT_Y_MODE_PROBS,
            uv_mode:        VP9_DEFAULT_UV_MODE_PROBS,
            partition:      VP9_DEFAULT_PARTITION_PROBS,
            mv_joint:       VP9_DEFAULT_MV_JOINT_PROBS,
            mv_comp:        [VP9MVCompProbs::new(0), VP9MVCompProbs::new(1)],
        }
    }
}

fn num_coef_contexts(band: usize) -> usize {
    if band == 0 { 3 } else { VP9_COEF_CONTEXTS }
}

fn read_updates(bc: &mut BoolCoder, probs: &mut [u8]) -> DecoderResult<()> {
    for prob in probs.iter_mut() {
        bc.read_diff_update(prob)?;
    }
    Ok(())
}

fn read_mv_updates(bc: &mut BoolCoder, probs: &mut [u8]) -> DecoderResult<()> {
    for prob in probs.iter_mut() {
        bc.read_mv_update(prob)?;
    }
    Ok(())
}

/// Reports whether sign biases allow references from both temporal directions.
pub fn compound_reference_allowed(sign_bias: &[bool; 4]) -> bool {
    sign_bias[2] != sign_bias[1] || sign_bias[3] != sign_bias[1]
}

fn setup_compound_refs(sign_bias: &[bool; 4]) -> (usize, [usize; 2]) {
    if sign_bias[1] == sign_bias[2] {
        (3, [1, 2])
    } else if sign_bias[1] == sign_bias[3] {
        (2, [1, 3])
    } else {
        (1, [2, 3])
    }
}

impl VP9ProbContext {
    fn read_coef_probs(&mut self, bc: &mut BoolCoder, tx_mode: VP9TxMode) -> DecoderResult<()> {
        for tx_probs in self.coef.iter_mut().take(tx_mode.max_tx_size() + 1) {
            if !bc.read_bool()? {
                continue;
            }
            for plane_probs in tx_probs.iter_mut() {
                for ref_probs in plane_probs.iter_mut() {
                    for (band, band_probs) in ref_probs.iter_mut().enumerate() {
                        for ctx_probs in band_probs.iter_mut().take(num_coef_contexts(band)) {
                            read_updates(bc, ctx_probs)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
    fn read_mv_probs(&mut self, bc: &mut BoolCoder, allow_hp: bool) -> DecoderResult<()> {
        read_mv_updates(bc, &mut self.mv_joint)?;
        for comp in self.mv_comp.iter_mut() {
            bc.read_mv_update(&mut comp.sign)?;
            read_mv_updates(bc, &mut comp.classes)?;
            read_mv_updates(bc, &mut comp.class0)?;
            read_mv_updates(bc, &mut comp.bits)?;
        }
        for comp in self.mv_comp.iter_mut() {
            for fp in comp.class0_fp.iter_mut() {
                read_mv_updates(bc, fp)?;
            }
            read_mv_updates(bc, &mut comp.fp)?;
        }
        if allow_hp {
            for comp in self.mv_comp.iter_mut() {
                bc.read_mv_update(&mut comp.class0_hp)?;
                bc.read_mv_update(&mut comp.hp)?;
            }
        }
        Ok(())
    }
    /// Applies compressed header updates to the probabilities.
    ///
    /// `src` should contain exactly the compressed header data.
    pub fn read_compressed_header(&mut self, src: &[u8], hdr: &VP9FrameHeader) -> DecoderResult<VP9CompressedHeader> {
        let mut bc = BoolCoder::new(src)?;
        let mut chdr = VP9CompressedHeader::default();

        chdr.tx_mode = if hdr.quant.lossless {
                VP9TxMode::Only4x4
            } else {
                let mut mode                    = bc.read_bits(2)?;
                if mode == 3 {
                    mode                       += bc.read_bits(1)?;
                }
                VP9TxMode::from_bits(mode)
            };
        if chdr.tx_mode == VP9TxMode::Select {
            for probs in self.tx8.iter_mut() {
                read_updates(&mut bc, probs)?;
            }
            for probs in self.tx16.iter_mut() {
                read_updates(&mut bc, probs)?;
            }
            for probs in self.tx32.iter_mut() {
                read_updates(&mut bc, probs)?;
            }
        }
        self.read_coef_probs(&mut bc, chdr.tx_mode)?;
        read_updates(&mut bc, &mut self.skip)?;

        if hdr.is_intra() {
            return Ok(chdr);
        }

        for probs in self.inter_mode.iter_mut() {
            read_updates(&mut bc, probs)?;
        }
        if hdr.interp_filter == VP9InterpFilter::Switchable {
            for probs in self.interp_filter.iter_mut() {
                read_updates(&mut bc, probs)?;
            }
        }
        read_updates(&mut bc, &mut self.intra_inter)?;

        chdr.ref_mode = if compound_reference_allowed(&hdr.sign_bias) && bc.read_bool()? {
                if bc.read_bool()? { VP9RefMode::Select } else { VP9RefMode::Compound }
            } else {
                VP9RefMode::Single
            };
        if chdr.ref_mode != VP9RefMode::Single {
            let (fixed, var) = setup_compound_refs(&hdr.sign_bias);
            chdr.comp_fixed_ref = fixed;
            chdr.comp_var_ref   = var;
        }
        if chdr.ref_mode == VP9RefMode::Select {
            read_updates(&mut bc, &mut self.comp_inter)?;
        }
        if chdr.ref_mode != VP9RefMode::Compound {
            for probs in self.single_ref.iter_mut() {
                read_updates(&mut bc, probs)?;
            }
        }
        if chdr.ref_mode != VP9RefMode::Single {
            read_updates(&mut bc, &mut self.comp_ref)?;
        }

        for probs in self.y_mode.iter_mut() {
            read_updates(&mut bc, probs)?;
        }
        for probs in self.partition.iter_mut() {
            read_updates(&mut bc, probs)?;
        }
        self.read_mv_probs(&mut bc, hdr.allow_hp)?;
        Ok(chdr)
    }
}

#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct VP9MVCompCounts {
    pub sign:       [u32; 2],
    pub classes:    [u32; VP9_MV_CLASSES],
    pub class0:     [u32; 2],
    pub bits:       [[u32; 2]; VP9_MV_OFFSET_BITS],
    pub class0_fp:  [[u32; 4]; 2],
    pub fp:         [u32; 4],
    pub class0_hp:  [u32; 2],
    pub hp:         [u32; 2],
}

pub type VP9CoefCounts = [[[[[[u32; 3]; VP9_COEF_CONTEXTS]; VP9_COEF_BANDS]; 2]; 2]; VP9_TX_SIZES];
pub type VP9EobCounts = [[[[[[u32; 2]; VP9_COEF_CONTEXTS]; VP9_COEF_BANDS]; 2]; 2]; VP9_TX_SIZES];

/// Symbol statistics gathered by hardware while decoding a frame.
///
/// Partition counts are stored starting from 64x64 blocks and intra mode counts use hardware mode labels,
/// [`to_canonical_order`] converts them into bitstream order before adaptation.
///
/// [`to_canonical_order`]: #method.to_canonical_order
#[derive(Clone,Debug,PartialEq)]
pub struct VP9Counts {
    pub y_mode:         [[u32; VP9_INTRA_MODES]; VP9_BLOCK_SIZE_GROUPS],
    pub uv_mode:        [[u32; VP9_INTRA_MODES]; VP9_INTRA_MODES],
    pub partition:      [[u32; 4]; VP9_PARTITION_CONTEXTS],
    pub skip:           [[u32; 2]; VP9_SKIP_CONTEXTS],
    pub intra_inter:    [[u32; 2]; VP9_INTRA_INTER_CONTEXTS],
    pub comp_inter:     [[u32; 2]; VP9_REF_CONTEXTS],
    pub single_ref:     [[[u32; 2]; 2]; VP9_REF_CONTEXTS],
    pub comp_ref:       [[u32; 2]; VP9_REF_CONTEXTS],
    pub inter_mode:     [[u32; 4]; VP9_INTER_MODE_CONTEXTS],
    pub interp_filter:  [[u32; 3]; VP9_INTERP_CONTEXTS],
    pub tx8:            [[u32; 2]; 2],
    pub tx16:           [[u32; 3]; 2],
    pub tx32:           [[u32; 4]; 2],
    pub mv_joint:       [u32; 4],
    pub mv_comp:        [VP9MVCompCounts; 2],
    /// Token counts: zero, one, two and larger.
    pub coef:           VP9CoefCounts,
    /// End of block decisions: block ended, more coefficients follow.
    pub eob:            VP9EobCounts,
}

impl Default for VP9Counts {
    fn default() -> Self {
        Self {
            y_mode:         [[0; VP9_INTRA_MODES]; VP9_BLOCK_SIZE_GROUPS],
            uv_mode:        [[0; VP9_INTRA_MODES]; VP9_INTRA_MODES],
            partition:      [[0; 4]; VP9_PARTITION_CONTEXTS],
            skip:           [[0; 2]; VP9_SKIP_CONTEXTS],
            intra_inter:    [[0; 2]; VP9_INTRA_INTER_CONTEXTS],
            comp_inter:     [[0; 2]; VP9_REF_CONTEXTS],
            single_ref:     [[[0; 2]; 2]; VP9_REF_CONTEXTS],
            comp_ref:       [[0; 2]; VP9_REF_CONTEXTS],
            inter_mode:     [[0; 4]; VP9_INTER_MODE_CONTEXTS],
            interp_filter:  [[0; 3]; VP9_INTERP_CONTEXTS],
            tx8:            [[0; 2]; 2],
            tx16:           [[0; 3]; 2],
            tx32:           [[0; 4]; 2],
            mv_joint:       [0; 4],
            mv_comp:        [VP9MVCompCounts::default(); 2],
            coef:           [[[[[[0; 3]; VP9_COEF_CONTEXTS]; VP9_COEF_BANDS]; 2]; 2]; VP9_TX_SIZES],
            eob:            [[[[[[0; 2]; VP9_COEF_CONTEXTS]; VP9_COEF_BANDS]; 2]; 2]; VP9_TX_SIZES],
        }
    }
}

impl VP9Counts {
    /// Returns a copy with partition and intra mode counts reordered from hardware layout into bitstream order.
    pub fn to_canonical_order(&self) -> Self {
        let mut counts = self.clone();
        for (hw_lvl, &lvl) in VP9_PARTITION_ORDER.iter().enumerate() {
            for ctx in 0..VP9_PARTITION_LEVEL_CTX {
                counts.partition[lvl * VP9_PARTITION_LEVEL_CTX + ctx] = self.partition[hw_lvl * VP9_PARTITION_LEVEL_CTX + ctx];
            }
        }
        for (dst, src) in counts.y_mode.iter_mut().zip(self.y_mode.iter()) {
            for (hw_mode, &mode) in VP9_HW_INTRA_MODE_ORDER.iter().enumerate() {
                dst[mode] = src[hw_mode];
            }
        }
        for (hw_ctx, &ctx) in VP9_HW_INTRA_MODE_ORDER.iter().enumerate() {
            for (hw_mode, &mode) in VP9_HW_INTRA_MODE_ORDER.iter().enumerate() {
                counts.uv_mode[ctx][mode] = self.uv_mode[hw_ctx][hw_mode];
            }
        }
        counts
    }
}

/// Frame parameters affecting probability adaptation.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct VP9AdaptInfo {
    pub intra:              bool,
    pub last_was_key:       bool,
    pub tx_mode:            VP9TxMode,
    pub ref_mode:           VP9RefMode,
    pub interp_switchable:  bool,
    pub allow_hp:           bool,
}

impl VP9AdaptInfo {
    pub fn new(hdr: &VP9FrameHeader, chdr: &VP9CompressedHeader, last_was_key: bool) -> Self {
        Self {
            intra:              hdr.is_intra(),
            last_was_key,
            tx_mode:            chdr.tx_mode,
            ref_mode:           chdr.ref_mode,
            interp_switchable:  hdr.interp_filter == VP9InterpFilter::Switchable,
            allow_hp:           hdr.allow_hp,
        }
    }
}

fn merge_mode_prob(prob: &mut u8, counts: &[u32; 2]) {
    *prob = merge_prob(*prob, counts[0], counts[1], MODE_MV_COUNT_SAT, MODE_MV_MAX_UPDATE_FACTOR);
}

fn merge_mode_tree(tree: &[VPTreeDef<usize>], probs: &mut [u8], counts: &[u32]) {
    merge_tree_probs(tree, probs, counts, MODE_MV_COUNT_SAT, MODE_MV_MAX_UPDATE_FACTOR);
}

impl VP9ProbContext {
    fn adapt_coef_probs(&mut self, counts: &VP9Counts, update_factor: u32) {
        for (tx_probs, (tx_coef, tx_eob)) in self.coef.iter_mut().zip(counts.coef.iter().zip(counts.eob.iter())) {
            for (plane_probs, (plane_coef, plane_eob)) in tx_probs.iter_mut().zip(tx_coef.iter().zip(tx_eob.iter())) {
                for (ref_probs, (ref_coef, ref_eob)) in plane_probs.iter_mut().zip(plane_coef.iter().zip(plane_eob.iter())) {
                    for band in 0..VP9_COEF_BANDS {
                        for ctx in 0..num_coef_contexts(band) {
                            let pp = &mut ref_probs[band][ctx];
                            let c  = &ref_coef[band][ctx];
                            let e  = &ref_eob[band][ctx];
                            pp[0] = merge_prob(pp[0], e[0], e[1], COEF_COUNT_SAT, update_factor);
                            pp[1] = merge_prob(pp[1], c[0], c[1].saturating_add(c[2]), COEF_COUNT_SAT, update_factor);
                            pp[2] = merge_prob(pp[2], c[1], c[2], COEF_COUNT_SAT, update_factor);
                        }
                    }
                }
            }
        }
    }
    fn adapt_mv_probs(&mut self, counts: &VP9Counts, allow_hp: bool) {
        merge_mode_tree(VP9_MV_JOINT_TREE, &mut self.mv_joint, &counts.mv_joint);
        for (comp, cnt) in self.mv_comp.iter_mut().zip(counts.mv_comp.iter()) {
            merge_mode_prob(&mut comp.sign, &cnt.sign);
            merge_mode_tree(VP9_MV_CLASS_TREE, &mut comp.classes, &cnt.classes);
            merge_mode_tree(VP9_BINARY_TREE, &mut comp.class0, &cnt.class0);
            for (prob, bit_cnt) in comp.bits.iter_mut().zip(cnt.bits.iter()) {
                merge_mode_prob(prob, bit_cnt);
            }
            for (probs, fp_cnt) in comp.class0_fp.iter_mut().zip(cnt.class0_fp.iter()) {
                merge_mode_tree(VP9_MV_FP_TREE, probs, fp_cnt);
            }
            merge_mode_tree(VP9_MV_FP_TREE, &mut comp.fp, &cnt.fp);
            if allow_hp {
                merge_mode_prob(&mut comp.class0_hp, &cnt.class0_hp);
                merge_mode_prob(&mut comp.hp, &cnt.hp);
            }
        }
    }
    /// Adapts saved probabilities with the statistics of a decoded frame.
    ///
    /// `self` is the saved context the frame started from, `working` are the probabilities the frame was decoded with
    /// and `counts` should be in bitstream order.
    pub fn adapt(&mut self, working: &VP9ProbContext, counts: &VP9Counts, info: &VP9AdaptInfo) {
        let coef_uf = if !info.intra && info.last_was_key {
                COEF_MAX_UPDATE_FACTOR_AFTER_KEY
            } else {
                COEF_MAX_UPDATE_FACTOR
            };
        self.adapt_coef_probs(counts, coef_uf);

        if info.intra {
            self.skip = working.skip;
            self.tx8  = working.tx8;
            self.tx16 = working.tx16;
            self.tx32 = working.tx32;
            return;
        }

        for (prob, cnt) in self.skip.iter_mut().zip(counts.skip.iter()) {
            merge_mode_prob(prob, cnt);
        }
        for (prob, cnt) in self.intra_inter.iter_mut().zip(counts.intra_inter.iter()) {
            merge_mode_prob(prob, cnt);
        }
        if info.ref_mode == VP9RefMode::Select {
            for (prob, cnt) in self.comp_inter.iter_mut().zip(counts.comp_inter.iter()) {
                merge_mode_prob(prob, cnt);
            }
        }
        if info.ref_mode != VP9RefMode::Compound {
            for (probs, cnt) in self.single_ref.iter_mut().zip(counts.single_ref.iter()) {
                merge_mode_prob(&mut probs[0], &cnt[0]);
                merge_mode_prob(&mut probs[1], &cnt[1]);
            }
        }
        if info.ref_mode != VP9RefMode::Single {
            for (prob, cnt) in self.comp_ref.iter_mut().zip(counts.comp_ref.iter()) {
                merge_mode_prob(prob, cnt);
            }
        }
        for (probs, cnt) in self.inter_mode.iter_mut().zip(counts.inter_mode.iter()) {
            merge_mode_tree(VP9_INTER_MODE_TREE, probs, cnt);
        }
        for (probs, cnt) in self.y_mode.iter_mut().zip(counts.y_mode.iter()) {
            merge_mode_tree(VP9_INTRA_MODE_TREE, probs, cnt);
        }
        for (probs, cnt) in self.uv_mode.iter_mut().zip(counts.uv_mode.iter()) {
            merge_mode_tree(VP9_INTRA_MODE_TREE, probs, cnt);
        }
        for (probs, cnt) in self.partition.iter_mut().zip(counts.partition.iter()) {
            merge_mode_tree(VP9_PARTITION_TREE, probs, cnt);
        }
        if info.interp_switchable {
            for (probs, cnt) in self.interp_filter.iter_mut().zip(counts.interp_filter.iter()) {
                merge_mode_tree(VP9_INTERP_FILTER_TREE, probs, cnt);
            }
        }
        if info.tx_mode == VP9TxMode::Select {
            for ctx in 0..2 {
                merge_mode_tree(VP9_BINARY_TREE, &mut self.tx8[ctx], &counts.tx8[ctx]);
                merge_mode_tree(VP9_TX16_TREE, &mut self.tx16[ctx], &counts.tx16[ctx]);
                merge_mode_tree(VP9_TX32_TREE, &mut self.tx32[ctx], &counts.tx32[ctx]);
            }
        }
        self.adapt_mv_probs(counts, info.allow_hp);
    }
}
