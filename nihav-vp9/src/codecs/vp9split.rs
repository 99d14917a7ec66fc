//! Superframe splitting.
//!
//! A VP9 access unit may pack several frames (typically an invisible alternate reference followed by a shown frame)
//! with an index appended at the end. Frames are handed out one per call.
use std::collections::VecDeque;
use std::ops::Range;
use nihav_core::codecs::*;
use nihav_core::io::bitreader::*;

/// One frame extracted from an access unit.
#[derive(Clone,Debug,PartialEq)]
pub struct VP9SubFrame {
    /// Frame data position inside the access unit.
    pub range:      Range<usize>,
    /// Presentation timestamp assigned to the frame.
    pub pts:        Option<u64>,
    pub keyframe:   bool,
    /// Frame is going to be displayed (including repeated frames).
    pub visible:    bool,
}

#[derive(Default)]
pub struct VP9Splitter {
    pending:    VecDeque<Range<usize>>,
    au_pts:     Option<u64>,
    stash_pts:  Option<u64>,
}

fn classify_frame(src: &[u8]) -> (bool, bool) {
    let mut br = BitReader::new(src);
    let mut classify = || -> BitReaderResult<(bool, bool)> {
            if br.read(2)? != 2 {
                return Ok((false, true));
            }
            let profile = br.read(1)? | (br.read(1)? << 1);
            if profile == 3 {
                br.read(1)?;
            }
            if br.read_bool()? {
                return Ok((false, true));
            }
            let keyframe = !br.read_bool()?;
            let visible = br.read_bool()?;
            Ok((keyframe, visible))
        };
    classify().unwrap_or((false, true))
}

impl VP9Splitter {
    pub fn new() -> Self { Self::default() }
    /// Reports whether frames from the last access unit are still waiting.
    pub fn has_pending(&self) -> bool { !self.pending.is_empty() }
    pub fn reset(&mut self) {
        self.pending.clear();
        self.au_pts    = None;
        self.stash_pts = None;
    }
    fn parse_index(src: &[u8]) -> DecoderResult<Option<VecDeque<Range<usize>>>> {
        let last = match src.last() {
                Some(&b) => b,
                None => return Ok(None),
            };
        if (last & 0xE0) != 0xC0 {
            return Ok(None);
        }
        let sz_bytes = usize::from((last >> 3) & 3) + 1;
        let nframes  = usize::from(last & 7) + 1;
        let idx_size = 2 + sz_bytes * nframes;
        if src.len() < idx_size || src[src.len() - idx_size] != last {
            return Ok(None);
        }
        let data_size = src.len() - idx_size;
        let index = &src[data_size + 1..src.len() - 1];

        let mut frames = VecDeque::with_capacity(nframes);
        let mut pos = 0;
        for entry in index.chunks_exact(sz_bytes) {
            let size = entry.iter().rev().fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
            validate!(size > 0 && size <= data_size - pos);
            frames.push_back(pos..pos + size);
            pos += size;
        }
        if pos < data_size {
            tracing::warn!("superframe: {} trailing bytes before the index", data_size - pos);
        }
        Ok(Some(frames))
    }
    fn assign_pts(&mut self, visible: bool) -> Option<u64> {
        if visible {
            let pts = self.au_pts.take().or(self.stash_pts);
            self.stash_pts = None;
            pts
        } else {
            if let Some(pts) = self.au_pts.take() {
                self.stash_pts = Some(pts);
            }
            None
        }
    }
    /// Returns the next frame from the access unit.
    ///
    /// If frames from the previous call are pending, `src` must be the same access unit and `pts` is ignored.
    pub fn split(&mut self, src: &[u8], pts: Option<u64>, use_index: bool) -> DecoderResult<VP9SubFrame> {
        let range = if let Some(range) = self.pending.pop_front() {
                validate!(range.end <= src.len());
                range
            } else {
                let index = if use_index { Self::parse_index(src)? } else { None };
                let mut frames = index.unwrap_or_else(|| std::iter::once(0..src.len()).collect());
                self.au_pts = pts;
                let first = frames.pop_front().unwrap_or(0..src.len());
                if !frames.is_empty() {
                    tracing::debug!("superframe with {} frames", frames.len() + 1);
                }
                self.pending = frames;
                first
            };
        let (keyframe, visible) = classify_frame(&src[range.clone()]);
        let pts = self.assign_pts(visible);
        Ok(VP9SubFrame { range, pts, keyframe, visible })
    }
}
