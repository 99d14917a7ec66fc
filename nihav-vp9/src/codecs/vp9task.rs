//! Decode tasks handed to hardware.
use std::ops::Range;
use nihav_core::codecs::*;
use super::vp9data::*;
use super::vp9header::*;
use super::vp9probs::*;

/// Reference picture used by the frame.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct VP9TaskRef {
    pub handle:     NASlotHandle,
    /// Reference table slot the picture comes from.
    pub slot:       usize,
    pub sign_bias:  bool,
    /// Horizontal and vertical scale factors in 14-bit fixed point, zero for unscaled references.
    pub scale:      [u32; 2],
    pub width:      usize,
    pub height:     usize,
}

/// Tile layout.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct VP9TileInfo {
    pub cols_log2:  u8,
    pub rows_log2:  u8,
    pub mi_cols:    usize,
    pub mi_rows:    usize,
}

fn tile_offset(idx: usize, mis: usize, log2: u8) -> usize {
    let sbs = (mis + 7) >> 3;
    (((idx * sbs) >> log2) << 3).min(mis)
}

impl VP9TileInfo {
    pub fn new(hdr: &VP9FrameHeader) -> Self {
        Self {
            cols_log2:  hdr.tile_cols_log2,
            rows_log2:  hdr.tile_rows_log2,
            mi_cols:    hdr.get_mi_cols(),
            mi_rows:    hdr.get_mi_rows(),
        }
    }
    pub fn num_tile_cols(&self) -> usize { 1 << self.cols_log2 }
    pub fn num_tile_rows(&self) -> usize { 1 << self.rows_log2 }
    /// Returns tile column boundaries in 8x8 block units.
    pub fn get_col_range(&self, col: usize) -> Range<usize> {
        tile_offset(col, self.mi_cols, self.cols_log2)..tile_offset(col + 1, self.mi_cols, self.cols_log2)
    }
    /// Returns tile row boundaries in 8x8 block units.
    pub fn get_row_range(&self, row: usize) -> Range<usize> {
        tile_offset(row, self.mi_rows, self.rows_log2)..tile_offset(row + 1, self.mi_rows, self.rows_log2)
    }
}

impl VP9ProbContext {
    /// Returns probabilities in the layout expected by hardware.
    ///
    /// Partition contexts are stored starting from 64x64 blocks and chroma mode contexts follow hardware mode labels.
    pub fn to_hw_order(&self) -> VP9ProbContext {
        let mut probs = self.clone();
        for (hw_lvl, &lvl) in VP9_PARTITION_ORDER.iter().enumerate() {
            for ctx in 0..VP9_PARTITION_LEVEL_CTX {
                probs.partition[hw_lvl * VP9_PARTITION_LEVEL_CTX + ctx] = self.partition[lvl * VP9_PARTITION_LEVEL_CTX + ctx];
            }
        }
        for (hw_ctx, &ctx) in VP9_HW_INTRA_MODE_ORDER.iter().enumerate() {
            probs.uv_mode[hw_ctx] = self.uv_mode[ctx];
        }
        probs
    }
}

/// Store references keeping task pictures alive until hardware is done with them.
pub struct VP9SlotLock {
    store:      NAFrameSlotStoreRef,
    handles:    Vec<NASlotHandle>,
}

impl VP9SlotLock {
    pub fn new(store: NAFrameSlotStoreRef) -> Self {
        Self { store, handles: Vec::with_capacity(6) }
    }
    pub fn add(&mut self, handle: NASlotHandle) -> DecoderResult<()> {
        let handle = self.store.alias(handle)?;
        self.handles.push(handle);
        Ok(())
    }
    pub fn len(&self) -> usize { self.handles.len() }
    pub fn is_empty(&self) -> bool { self.handles.is_empty() }
}

impl Drop for VP9SlotLock {
    fn drop(&mut self) {
        for &handle in self.handles.iter() {
            self.store.release(handle);
        }
    }
}

/// Everything hardware needs to decode one frame.
pub struct VP9DecodeTask {
    /// Picture order number, used to return symbol counts for the frame.
    pub task_id:        u64,
    pub hdr:            VP9FrameHeader,
    pub compr:          VP9CompressedHeader,
    /// Probabilities in hardware order.
    pub probs:          VP9ProbContext,
    /// Last, golden and altref references (absent for intra frames).
    pub refs:           [Option<VP9TaskRef>; VP9_REFS_PER_FRAME],
    pub cur:            NASlotHandle,
    pub mvref:          Option<NASlotHandle>,
    pub segmap:         Option<NASlotHandle>,
    /// Motion vectors of the previous frame may be used for prediction.
    pub use_prev_mvs:   bool,
    pub tiles:          VP9TileInfo,
    pub intra:          bool,
    pub eos:            bool,
    /// Some reference was decoded with errors.
    pub ref_error:      bool,
    pub needs_display:  bool,
    /// Hardware should report symbol counts with [`VP9Parser::update_probs`].
    ///
    /// [`VP9Parser::update_probs`]: ../vp9/struct.VP9Parser.html#method.update_probs
    pub needs_counts:   bool,
    pub pts:            Option<u64>,
    pub dts:            Option<u64>,
    pub data:           Arc<Vec<u8>>,
    /// Compressed header position in `data`.
    pub compr_data:     Range<usize>,
    /// Tile data position in `data`.
    pub tile_data:      Range<usize>,
    /// Pictures used by the task.
    pub lock:           VP9SlotLock,
}

impl VP9DecodeTask {
    pub fn get_compressed_header(&self) -> &[u8] { &self.data[self.compr_data.clone()] }
    pub fn get_tile_data(&self) -> &[u8] { &self.data[self.tile_data.clone()] }
    pub fn get_segment_params(&self, seg_id: usize) -> &VP9SegmentParams { &self.hdr.seg_params[seg_id] }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hw_prob_order() {
        let mut probs = VP9ProbContext::default();
        probs.partition[0] = [1, 2, 3];
        probs.partition[15] = [4, 5, 6];
        probs.uv_mode[DC_PRED][0] = 42;
        let hw = probs.to_hw_order();
        assert_eq!(hw.partition[12], [1, 2, 3]);
        assert_eq!(hw.partition[3], [4, 5, 6]);
        assert_eq!(hw.partition[5], probs.partition[9]);
        assert_eq!(hw.uv_mode[2][0], 42);
        assert_eq!(hw.uv_mode[0], probs.uv_mode[V_PRED]);
        assert_eq!(hw.y_mode, probs.y_mode);
        assert_eq!(hw.coef, probs.coef);
    }
    #[test]
    fn test_slot_lock() {
        let pool = Arc::new(NAFrameSlotPool::new(2));
        let handle = pool.acquire(NAVideoInfo::new(16, 16, YUV420_FORMAT)).unwrap();
        let mut lock = VP9SlotLock::new(pool.clone());
        lock.add(handle).unwrap();
        lock.add(handle).unwrap();
        pool.release(handle);
        assert_eq!(pool.num_refs(handle), 2);
        drop(lock);
        assert_eq!(pool.num_in_use(), 0);
        let mut lock = VP9SlotLock::new(pool.clone());
        assert_eq!(lock.add(handle), Err(DecoderError::MissingReference));
        assert!(lock.is_empty());
    }
    #[test]
    fn test_tiles() {
        let mut hdr = VP9FrameHeader::new();
        hdr.width  = 1920;
        hdr.height = 1080;
        hdr.tile_cols_log2 = 2;
        let tiles = VP9TileInfo::new(&hdr);
        assert_eq!(tiles.num_tile_cols(), 4);
        assert_eq!(tiles.num_tile_rows(), 1);
        assert_eq!(tiles.get_col_range(0), 0..56);
        assert_eq!(tiles.get_col_range(1), 56..120);
        assert_eq!(tiles.get_col_range(2), 120..176);
        assert_eq!(tiles.get_col_range(3), 176..240);
        assert_eq!(tiles.get_row_range(0), 0..135);
    }
}
