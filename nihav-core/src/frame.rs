//! Packets and decoded frame slots functionality.
//!
//! Decoded pictures live in slots of a [`NAFrameSlotStore`]. A parser only holds opaque handles to them,
//! hardware marks them as ready and the display side takes them out of the display queue.
//!
//! [`NAFrameSlotStore`]: ./trait.NAFrameSlotStore.html
use std::collections::VecDeque;
use std::fmt;
pub use std::sync::Arc;
pub use crate::formats::*;
use crate::codecs::{DecoderError, DecoderResult};
use parking_lot::Mutex;

/// Video stream information.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct NAVideoInfo {
    /// Picture width.
    pub width:      usize,
    /// Picture height.
    pub height:     usize,
    /// Picture pixel format.
    pub format:     NAPixelFormaton,
}

impl NAVideoInfo {
    /// Constructs a new `NAVideoInfo` instance.
    pub fn new(w: usize, h: usize, fmt: NAPixelFormaton) -> Self {
        NAVideoInfo { width: w, height: h, format: fmt }
    }
    /// Returns picture width.
    pub fn get_width(&self)  -> usize { self.width }
    /// Returns picture height.
    pub fn get_height(&self) -> usize { self.height }
    /// Returns picture pixel format.
    pub fn get_format(&self) -> NAPixelFormaton { self.format }
}

impl fmt::Display for NAVideoInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format)
    }
}

/// Timestamp information.
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct NATimeInfo {
    /// Presentation timestamp.
    pub pts:            Option<u64>,
    /// Decode timestamp.
    pub dts:            Option<u64>,
}

impl NATimeInfo {
    /// Constructs a new `NATimeInfo` instance.
    pub fn new(pts: Option<u64>, dts: Option<u64>) -> Self {
        NATimeInfo { pts, dts }
    }
    /// Returns presentation timestamp.
    pub fn get_pts(&self) -> Option<u64> { self.pts }
    /// Returns decoding timestamp.
    pub fn get_dts(&self) -> Option<u64> { self.dts }
    /// Sets new presentation timestamp.
    pub fn set_pts(&mut self, pts: Option<u64>) { self.pts = pts; }
    /// Sets new decoding timestamp.
    pub fn set_dts(&mut self, dts: Option<u64>) { self.dts = dts; }
}

/// Packet with compressed data.
#[derive(Clone)]
pub struct NAPacket {
    buffer:         Arc<Vec<u8>>,
    /// Packet timestamp.
    pub ts:         NATimeInfo,
    /// End of stream marker.
    pub eos:        bool,
}

impl NAPacket {
    /// Constructs a new `NAPacket` instance.
    pub fn new(vec: Vec<u8>, ts: NATimeInfo, eos: bool) -> Self {
        Self { buffer: Arc::new(vec), ts, eos }
    }
    /// Constructs a new `NAPacket` instance reusing a buffer reference.
    pub fn new_from_refbuf(buffer: Arc<Vec<u8>>, ts: NATimeInfo, eos: bool) -> Self {
        Self { buffer, ts, eos }
    }
    /// Returns a reference to packet data.
    pub fn get_buffer(&self) -> Arc<Vec<u8>> { self.buffer.clone() }
    /// Returns packet timestamp.
    pub fn get_time_information(&self) -> NATimeInfo { self.ts }
    /// Returns packet presentation timestamp.
    pub fn get_pts(&self) -> Option<u64> { self.ts.get_pts() }
    /// Returns packet decoding timestamp.
    pub fn get_dts(&self) -> Option<u64> { self.ts.get_dts() }
    /// Reports whether this is the last packet of the stream.
    pub fn is_eos(&self) -> bool { self.eos }
}

impl fmt::Display for NAPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[pkt size {} pts {:?} dts {:?}{}]", self.buffer.len(), self.ts.pts, self.ts.dts, if self.eos { " eos" } else { "" })
    }
}

/// Opaque handle to a frame slot.
///
/// Handles carry the slot generation so a handle outliving its slot is detected instead of touching the new occupant.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct NASlotHandle {
    index:      u16,
    generation: u32,
}

impl NASlotHandle {
    /// Returns slot index inside the store.
    pub fn get_index(self) -> usize { self.index as usize }
}

impl fmt::Display for NASlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "slot{}@{}", self.index, self.generation)
    }
}

/// Frame slot store contract.
///
/// Every successful `acquire` or `alias` must be balanced by exactly one `release`.
/// Implementations must be safe to call while other threads mark slots as decoded or take them for display.
pub trait NAFrameSlotStore: Send + Sync {
    /// Takes a free slot and allocates a picture for it. The returned handle holds one reference.
    fn acquire(&self, info: NAVideoInfo) -> DecoderResult<NASlotHandle>;
    /// Adds a reference to the slot.
    fn alias(&self, handle: NASlotHandle) -> DecoderResult<NASlotHandle>;
    /// Drops a reference to the slot. The slot and its picture are freed when the last reference is gone.
    fn release(&self, handle: NASlotHandle);
    /// Queues the slot for display. The display queue keeps its own reference until the picture is taken.
    fn mark_for_display(&self, handle: NASlotHandle);
    /// Reports whether hardware flagged a decoding error for the slot picture.
    fn get_error_flag(&self, handle: NASlotHandle) -> bool;
}

/// Shared reference to a frame slot store.
pub type NAFrameSlotStoreRef = Arc<dyn NAFrameSlotStore>;

/// Picture taken from the display queue.
#[derive(Clone)]
pub struct NADisplayFrame {
    /// Slot the picture was decoded into.
    pub handle:     NASlotHandle,
    /// Picture parameters.
    pub info:       NAVideoInfo,
    /// Picture data.
    pub data:       Arc<Vec<u8>>,
    /// Hardware reported a decoding error.
    pub error:      bool,
    /// Hardware finished writing the picture.
    pub ready:      bool,
}

#[derive(Default)]
struct SlotEntry {
    generation: u32,
    holders:    usize,
    info:       Option<NAVideoInfo>,
    data:       Option<Arc<Vec<u8>>>,
    hw_ready:   bool,
    error:      bool,
}

impl SlotEntry {
    fn in_use(&self) -> bool { self.holders > 0 }
}

#[derive(Default)]
struct SlotPoolState {
    slots:      Vec<SlotEntry>,
    display:    VecDeque<NASlotHandle>,
}

impl SlotPoolState {
    fn get_slot(&mut self, handle: NASlotHandle) -> Option<&mut SlotEntry> {
        match self.slots.get_mut(handle.get_index()) {
            Some(slot) if slot.generation == handle.generation && slot.in_use() => Some(slot),
            _ => None,
        }
    }
    fn unref(&mut self, handle: NASlotHandle) -> bool {
        if let Some(slot) = self.get_slot(handle) {
            slot.holders -= 1;
            if !slot.in_use() {
                slot.data       = None;
                slot.info       = None;
                slot.generation = slot.generation.wrapping_add(1);
            }
            true
        } else {
            false
        }
    }
}

/// Default picture size limit (8192x8192 4:2:0 with 16-bit samples).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 8192 * 8192 * 3;

/// Fixed-size frame slot store.
///
/// All bookkeeping is done under one lock so the parser, hardware completion and display threads may share it.
pub struct NAFrameSlotPool {
    state:          Mutex<SlotPoolState>,
    max_frame_size: usize,
}

impl NAFrameSlotPool {
    /// Constructs a new store with the provided number of slots.
    pub fn new(max_slots: usize) -> Self {
        Self::with_max_frame_size(max_slots, DEFAULT_MAX_FRAME_SIZE)
    }
    /// Constructs a new store refusing pictures larger than `max_frame_size` bytes.
    pub fn with_max_frame_size(max_slots: usize, max_frame_size: usize) -> Self {
        let mut slots = Vec::with_capacity(max_slots);
        slots.resize_with(max_slots.min(usize::from(u16::MAX)), SlotEntry::default);
        Self { state: Mutex::new(SlotPoolState { slots, display: VecDeque::new() }), max_frame_size }
    }
    /// Returns the number of slots currently holding a picture.
    pub fn num_in_use(&self) -> usize {
        self.state.lock().slots.iter().filter(|slot| slot.in_use()).count()
    }
    /// Returns the number of references held to the slot (zero for stale handles).
    pub fn num_refs(&self, handle: NASlotHandle) -> usize {
        self.state.lock().get_slot(handle).map_or(0, |slot| slot.holders)
    }
    /// Returns slot picture parameters.
    pub fn get_info(&self, handle: NASlotHandle) -> Option<NAVideoInfo> {
        self.state.lock().get_slot(handle).and_then(|slot| slot.info)
    }
    /// Marks slot picture as written by hardware.
    pub fn set_hw_ready(&self, handle: NASlotHandle, error: bool) {
        let mut state = self.state.lock();
        if let Some(slot) = state.get_slot(handle) {
            slot.hw_ready = true;
            slot.error    = error;
        } else {
            tracing::warn!("hardware completion for stale {}", handle);
        }
    }
    /// Returns the number of pictures waiting in the display queue.
    pub fn display_queue_len(&self) -> usize {
        self.state.lock().display.len()
    }
    /// Takes the next picture from the display queue.
    ///
    /// The queue reference is dropped, the caller keeps the picture data alive through the returned buffer.
    pub fn dequeue_display(&self) -> Option<NADisplayFrame> {
        let mut state = self.state.lock();
        while let Some(handle) = state.display.pop_front() {
            let frm = state.get_slot(handle).and_then(|slot| {
                    let info = slot.info?;
                    let data = slot.data.clone()?;
                    Some(NADisplayFrame { handle, info, data, error: slot.error, ready: slot.hw_ready })
                });
            state.unref(handle);
            if frm.is_some() {
                return frm;
            }
        }
        None
    }
}

impl NAFrameSlotStore for NAFrameSlotPool {
    fn acquire(&self, info: NAVideoInfo) -> DecoderResult<NASlotHandle> {
        if info.width == 0 || info.height == 0 {
            return Err(DecoderError::AllocError);
        }
        let size = info.format.get_frame_size(info.width, info.height);
        if size > self.max_frame_size {
            tracing::warn!("picture {} needs {} bytes, limit is {}", info, size, self.max_frame_size);
            return Err(DecoderError::AllocError);
        }
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|_| DecoderError::AllocError)?;
        data.resize(size, 0);

        let mut state = self.state.lock();
        let (index, slot) = state.slots.iter_mut().enumerate().find(|(_, slot)| !slot.in_use()).ok_or(DecoderError::AllocError)?;
        slot.holders  = 1;
        slot.info     = Some(info);
        slot.data     = Some(Arc::new(data));
        slot.hw_ready = false;
        slot.error    = false;
        Ok(NASlotHandle { index: index as u16, generation: slot.generation })
    }
    fn alias(&self, handle: NASlotHandle) -> DecoderResult<NASlotHandle> {
        let mut state = self.state.lock();
        let slot = state.get_slot(handle).ok_or(DecoderError::MissingReference)?;
        slot.holders += 1;
        Ok(handle)
    }
    fn release(&self, handle: NASlotHandle) {
        if !self.state.lock().unref(handle) {
            tracing::warn!("release of stale {}", handle);
        }
    }
    fn mark_for_display(&self, handle: NASlotHandle) {
        let mut state = self.state.lock();
        if let Some(slot) = state.get_slot(handle) {
            slot.holders += 1;
            state.display.push_back(handle);
        } else {
            tracing::warn!("display request for stale {}", handle);
        }
    }
    fn get_error_flag(&self, handle: NASlotHandle) -> bool {
        self.state.lock().get_slot(handle).map_or(false, |slot| slot.error)
    }
}
