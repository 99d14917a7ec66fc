//! Reference frame management.
//!
//! Frames live in an arena with explicit reference counts. A frame is counted once for every reference table
//! or working set entry naming it and its store slot is released when the last entry goes away.
use nihav_core::codecs::*;
use super::vp9header::{VP9RefInfo, VP9_NUM_REF_SLOTS};

#[derive(Clone,Copy,Debug)]
struct VP9Frame {
    handle:     NASlotHandle,
    info:       VP9RefInfo,
    refs:       usize,
    shown:      bool,
}

/// Options for placing a new frame.
#[derive(Clone,Copy,Debug,Default)]
pub struct VP9FrameSetup {
    /// The frame may predict motion vectors from the previous frame.
    pub use_prev_mvs:   bool,
    /// Segmentation map is neither updated nor reset and the old source should stay.
    pub keep_segmap:    bool,
    pub show:           bool,
    pub refresh_mask:   u8,
}

pub struct VP9Shuffler {
    store:      NAFrameSlotStoreRef,
    frames:     Vec<Option<VP9Frame>>,
    table:      [Option<usize>; VP9_NUM_REF_SLOTS],
    cur:        Option<usize>,
    mvref:      Option<usize>,
    segmap:     Option<usize>,
}

impl VP9Shuffler {
    pub fn new(store: NAFrameSlotStoreRef) -> Self {
        Self {
            store,
            frames:     Vec::new(),
            table:      [None; VP9_NUM_REF_SLOTS],
            cur:        None,
            mvref:      None,
            segmap:     None,
        }
    }
    pub fn get_store(&self) -> NAFrameSlotStoreRef { self.store.clone() }
    fn add_ref(&mut self, idx: Option<usize>) -> Option<usize> {
        if let Some(Some(frm)) = idx.and_then(|i| self.frames.get_mut(i)) {
            frm.refs += 1;
        }
        idx
    }
    fn unref(&mut self, idx: Option<usize>) {
        let idx = match idx {
                Some(idx) => idx,
                None => return,
            };
        if let Some(entry) = self.frames.get_mut(idx) {
            if let Some(frm) = entry {
                frm.refs -= 1;
                if frm.refs == 0 {
                    self.store.release(frm.handle);
                    *entry = None;
                }
            }
        }
    }
    fn new_frame(&mut self, frm: VP9Frame) -> usize {
        if let Some(idx) = self.frames.iter().position(|f| f.is_none()) {
            self.frames[idx] = Some(frm);
            idx
        } else {
            self.frames.push(Some(frm));
            self.frames.len() - 1
        }
    }
    fn get_frame(&self, idx: Option<usize>) -> Option<&VP9Frame> {
        idx.and_then(|i| self.frames.get(i)).and_then(|f| f.as_ref())
    }
    /// Returns geometry of the pictures in all reference slots.
    pub fn get_ref_infos(&self) -> [Option<VP9RefInfo>; VP9_NUM_REF_SLOTS] {
        let mut infos = [None; VP9_NUM_REF_SLOTS];
        for (info, &idx) in infos.iter_mut().zip(self.table.iter()) {
            *info = self.get_frame(idx).map(|frm| frm.info);
        }
        infos
    }
    /// Returns the picture stored in the reference slot.
    pub fn get_ref(&self, slot: usize) -> DecoderResult<NASlotHandle> {
        let idx = self.table.get(slot).copied().flatten();
        self.get_frame(idx).map(|frm| frm.handle).ok_or(DecoderError::MissingReference)
    }
    /// Reports whether hardware failed to decode the picture in the reference slot.
    pub fn get_ref_error(&self, slot: usize) -> bool {
        self.get_ref(slot).map_or(true, |handle| self.store.get_error_flag(handle))
    }
    pub fn get_cur(&self) -> Option<NASlotHandle> { self.get_frame(self.cur).map(|frm| frm.handle) }
    pub fn get_mvref(&self) -> Option<NASlotHandle> { self.get_frame(self.mvref).map(|frm| frm.handle) }
    pub fn get_segmap(&self) -> Option<NASlotHandle> { self.get_frame(self.segmap).map(|frm| frm.handle) }
    /// Returns the number of table and working set entries naming the frame in the reference slot.
    pub fn get_ref_count(&self, slot: usize) -> usize {
        self.get_frame(self.table.get(slot).copied().flatten()).map_or(0, |frm| frm.refs)
    }
    /// Returns the number of frames alive.
    pub fn num_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }
    /// Queues the picture from the reference slot for display again.
    pub fn show_existing(&mut self, slot: usize) -> DecoderResult<NASlotHandle> {
        let idx = self.table.get(slot).copied().flatten().ok_or(DecoderError::MissingReference)?;
        let frm = self.frames.get_mut(idx).and_then(|f| f.as_mut()).ok_or(DecoderError::MissingReference)?;
        if !frm.shown {
            tracing::debug!("showing hidden frame {}", frm.handle);
        }
        self.store.mark_for_display(frm.handle);
        frm.shown = true;
        Ok(frm.handle)
    }
    /// Allocates a picture for the new frame and updates references.
    ///
    /// Slot allocation is the only step that may fail and it happens before any reference is touched.
    pub fn add_frame(&mut self, vinfo: NAVideoInfo, info: VP9RefInfo, setup: &VP9FrameSetup) -> DecoderResult<NASlotHandle> {
        let handle = self.store.acquire(vinfo)?;

        let old_mvref = self.mvref.take();
        self.unref(old_mvref);
        if setup.use_prev_mvs {
            self.mvref = self.add_ref(self.cur);
        }
        if !setup.keep_segmap || self.segmap.is_none() {
            let old_segmap = self.segmap.take();
            self.unref(old_segmap);
            if setup.use_prev_mvs {
                self.segmap = self.add_ref(self.cur);
            }
        }
        let old_cur = self.cur.take();
        self.unref(old_cur);

        let idx = self.new_frame(VP9Frame { handle, info, refs: 1, shown: setup.show });
        self.cur = Some(idx);
        for slot in 0..VP9_NUM_REF_SLOTS {
            if ((setup.refresh_mask >> slot) & 1) != 0 {
                let old = self.table[slot].take();
                self.unref(old);
                self.table[slot] = self.add_ref(Some(idx));
            }
        }
        if setup.show {
            self.store.mark_for_display(handle);
        }
        tracing::debug!("new frame {} refresh {:08b} frames alive {}", handle, setup.refresh_mask, self.num_frames());
        Ok(handle)
    }
    /// Drops all references.
    pub fn clear(&mut self) {
        for slot in 0..VP9_NUM_REF_SLOTS {
            let old = self.table[slot].take();
            self.unref(old);
        }
        let cur = self.cur.take();
        self.unref(cur);
        let mvref = self.mvref.take();
        self.unref(mvref);
        let segmap = self.segmap.take();
        self.unref(segmap);
        if self.num_frames() != 0 {
            tracing::warn!("{} frames left after clearing references", self.num_frames());
        }
        self.frames.clear();
    }
}

impl Drop for VP9Shuffler {
    fn drop(&mut self) {
        self.clear();
    }
}
