use nihav_core::codecs::*;

use super::vp9header::*;
use super::vp9probs::*;
use super::vp9refs::*;
use super::vp9split::*;
use super::vp9task::*;

const SPLIT_SUPERFRAMES_OPTION: &str = "split_superframes";
const IGNORE_REF_ERRORS_OPTION: &str = "ignore_ref_errors";
const FRAME_ADAPTATION_OPTION: &str = "frame_adaptation";

const PARSER_OPTIONS: &[NAOptionDefinition] = &[
    NAOptionDefinition {
        name: SPLIT_SUPERFRAMES_OPTION, description: "Split superframes into separate frames",
        opt_type: NAOptionDefinitionType::Bool },
    NAOptionDefinition {
        name: IGNORE_REF_ERRORS_OPTION, description: "Do not mark frames predicted from broken references",
        opt_type: NAOptionDefinitionType::Bool },
    NAOptionDefinition {
        name: FRAME_ADAPTATION_OPTION, description: "Adapt probabilities using hardware symbol counts",
        opt_type: NAOptionDefinitionType::Bool },
];

/// Outcome of parsing one frame.
pub enum VP9ParseResult {
    /// New frame to decode.
    Task(Box<VP9DecodeTask>),
    /// Already decoded picture has been queued for display again.
    Repeat { handle: NASlotHandle, pts: Option<u64> },
    /// Nothing to do for this frame.
    None,
}

#[derive(Clone,Copy)]
struct LastFrameInfo {
    width:      usize,
    height:     usize,
    show:       bool,
    intra_only: bool,
}

struct PendingAdaptation {
    task_id:    u64,
    ctx_idx:    usize,
    working:    VP9ProbContext,
    info:       VP9AdaptInfo,
}

pub struct VP9Parser {
    hdr:        VP9FrameHeader,
    saved:      [VP9ProbContext; VP9_NUM_CONTEXTS],
    shuf:       VP9Shuffler,
    split:      VP9Splitter,
    cur_pkt:    Option<Arc<Vec<u8>>>,
    poc:        u64,
    last_key:   bool,
    last_frame: Option<LastFrameInfo>,
    pending:    Option<PendingAdaptation>,

    split_superframes:  bool,
    ignore_ref_errors:  bool,
    frame_adaptation:   bool,
}

fn default_contexts() -> [VP9ProbContext; VP9_NUM_CONTEXTS] {
    [VP9ProbContext::default(), VP9ProbContext::default(), VP9ProbContext::default(), VP9ProbContext::default()]
}

impl VP9Parser {
    pub fn new(store: NAFrameSlotStoreRef) -> Self {
        Self {
            hdr:        VP9FrameHeader::new(),
            saved:      default_contexts(),
            shuf:       VP9Shuffler::new(store),
            split:      VP9Splitter::new(),
            cur_pkt:    None,
            poc:        0,
            last_key:   false,
            last_frame: None,
            pending:    None,

            split_superframes:  true,
            ignore_ref_errors:  false,
            frame_adaptation:   true,
        }
    }
    /// Returns the probabilities stored in one of the saved contexts.
    pub fn get_saved_context(&self, idx: usize) -> Option<&VP9ProbContext> { self.saved.get(idx) }
    /// Reports whether the parser waits for symbol counts of some frame.
    pub fn waits_for_counts(&self) -> bool { self.pending.is_some() }

    fn get_working_probs(&self, hdr: &VP9FrameHeader) -> VP9ProbContext {
        match hdr.ctx_reset {
            VP9ContextReset::All => VP9ProbContext::default(),
            VP9ContextReset::Single(idx) if idx == hdr.ctx_idx => VP9ProbContext::default(),
            _ => self.saved[hdr.ctx_idx].clone(),
        }
    }
    fn get_next_frame(&mut self, pkt: &NAPacket) -> DecoderResult<(Arc<Vec<u8>>, VP9SubFrame)> {
        let src = pkt.get_buffer();
        if self.split.has_pending() {
            let same = self.cur_pkt.as_ref().map_or(false, |buf| Arc::ptr_eq(buf, &src));
            if !same {
                tracing::warn!("new packet while {} is not finished, dropping the rest", pkt);
                self.split.reset();
            }
        }
        let res = self.split.split(&src, pkt.get_pts(), self.split_superframes);
        self.cur_pkt = if self.split.has_pending() { Some(src.clone()) } else { None };
        Ok((src, res?))
    }
    fn parse_frame(&mut self, pkt: &NAPacket) -> DecoderResult<VP9ParseResult> {
        let (src, sub) = self.get_next_frame(pkt)?;
        let frame = &src[sub.range.clone()];

        let mut hdr = self.hdr.clone();
        hdr.parse(frame, &self.shuf.get_ref_infos())?;
        if hdr.show_existing {
            let handle = self.shuf.show_existing(hdr.show_existing_idx)?;
            tracing::debug!("repeat frame from slot {}", hdr.show_existing_idx);
            return Ok(VP9ParseResult::Repeat { handle, pts: sub.pts });
        }

        let mut working = self.get_working_probs(&hdr);
        let compr_start = hdr.hdr_size;
        let compr_end   = compr_start + hdr.compr_size;
        let chdr = working.read_compressed_header(&frame[compr_start..compr_end], &hdr)?;

        let intra = hdr.is_intra();
        let mut lock = VP9SlotLock::new(self.shuf.get_store());
        let mut refs = [None; VP9_REFS_PER_FRAME];
        let mut ref_error = false;
        if !intra {
            let infos = self.shuf.get_ref_infos();
            for (i, tref) in refs.iter_mut().enumerate() {
                let slot = hdr.ref_idx[i];
                let handle = self.shuf.get_ref(slot)?;
                let info = infos[slot].ok_or(DecoderError::MissingReference)?;
                lock.add(handle)?;
                ref_error |= self.shuf.get_ref_error(slot);
                *tref = Some(VP9TaskRef {
                        handle, slot,
                        sign_bias:  hdr.sign_bias[i + 1],
                        scale:      hdr.ref_scale[i],
                        width:      info.width,
                        height:     info.height,
                    });
            }
        }
        if ref_error {
            if self.ignore_ref_errors {
                tracing::debug!("ignoring reference errors");
                ref_error = false;
            } else {
                tracing::warn!("frame {} uses broken references", self.poc);
            }
        }

        let setup = VP9FrameSetup {
                use_prev_mvs:   !intra && !hdr.error_res,
                keep_segmap:    !intra && !hdr.error_res && hdr.seg.enabled && !hdr.seg.update_map,
                show:           hdr.show_frame,
                refresh_mask:   hdr.refresh_mask,
            };
        if setup.use_prev_mvs {
            if let Some(handle) = self.shuf.get_cur() {
                lock.add(handle)?;
            }
        }
        if setup.keep_segmap {
            if let Some(handle) = self.shuf.get_segmap() {
                lock.add(handle)?;
            }
        }
        let use_prev_mvs = setup.use_prev_mvs && self.last_frame.map_or(false, |last|
                last.width == hdr.width && last.height == hdr.height && last.show && !last.intra_only);

        let vinfo = NAVideoInfo::new(hdr.width, hdr.height, hdr.get_format());
        let cur = self.shuf.add_frame(vinfo, hdr.get_ref_info(), &setup)?;
        lock.add(cur)?;

        // the frame is accepted, commit the state
        match hdr.ctx_reset {
            VP9ContextReset::All => self.saved = default_contexts(),
            VP9ContextReset::Single(idx) => self.saved[idx] = VP9ProbContext::default(),
            VP9ContextReset::None => {},
        }
        if hdr.refresh_ctx && hdr.parallel {
            self.saved[hdr.ctx_idx] = working.clone();
        }
        let needs_counts = self.frame_adaptation && hdr.refresh_ctx && !hdr.parallel && !hdr.error_res;
        if needs_counts {
            self.pending = Some(PendingAdaptation {
                    task_id:    self.poc,
                    ctx_idx:    hdr.ctx_idx,
                    working:    working.clone(),
                    info:       VP9AdaptInfo::new(&hdr, &chdr, self.last_key),
                });
        }

        let base = sub.range.start;
        let task = VP9DecodeTask {
                task_id:        self.poc,
                compr:          chdr,
                probs:          working.to_hw_order(),
                refs,
                cur,
                mvref:          self.shuf.get_mvref(),
                segmap:         self.shuf.get_segmap(),
                use_prev_mvs,
                tiles:          VP9TileInfo::new(&hdr),
                intra,
                eos:            pkt.is_eos() && !self.split.has_pending(),
                ref_error,
                needs_display:  hdr.show_frame,
                needs_counts,
                pts:            sub.pts,
                dts:            pkt.get_dts(),
                data:           src.clone(),
                compr_data:     base + compr_start..base + compr_end,
                tile_data:      base + compr_end..sub.range.end,
                lock,
                hdr:            hdr.clone(),
            };

        self.last_key = hdr.keyframe;
        self.last_frame = Some(LastFrameInfo {
                width:      hdr.width,
                height:     hdr.height,
                show:       hdr.show_frame,
                intra_only: hdr.intra_only,
            });
        self.hdr = hdr;
        self.poc += 1;
        Ok(VP9ParseResult::Task(Box::new(task)))
    }
    /// Adapts saved probabilities with symbol counts of a decoded frame.
    ///
    /// Parsing is refused with `TryAgain` until the frame that requested counts gets them.
    /// Counts for any other frame are rejected with `NoFrame`.
    pub fn update_probs(&mut self, task_id: u64, counts: &VP9Counts) -> DecoderResult<()> {
        match self.pending.take() {
            Some(pend) if pend.task_id == task_id => {
                let counts = counts.to_canonical_order();
                self.saved[pend.ctx_idx].adapt(&pend.working, &counts, &pend.info);
                tracing::debug!("adapted context {} with counts of frame {}", pend.ctx_idx, task_id);
                Ok(())
            },
            pend => {
                self.pending = pend;
                tracing::debug!("unexpected counts for frame {}", task_id);
                Err(DecoderError::NoFrame)
            },
        }
    }
}

impl NAHWParser for VP9Parser {
    type Output = VP9ParseResult;
    fn parse(&mut self, pkt: &NAPacket) -> DecoderResult<VP9ParseResult> {
        if pkt.get_buffer().is_empty() {
            return Ok(VP9ParseResult::None);
        }
        if let Some(ref pend) = self.pending {
            tracing::debug!("waiting for symbol counts of frame {}", pend.task_id);
            return Err(DecoderError::TryAgain);
        }
        let ret = self.parse_frame(pkt);
        if let Err(err) = ret {
            tracing::debug!("frame {} parsing failed: {}", self.poc, err);
        }
        ret
    }
    fn has_pending(&self) -> bool { self.split.has_pending() }
    fn flush(&mut self) {
        self.shuf.clear();
        self.split.reset();
        self.cur_pkt    = None;
        self.pending    = None;
        self.saved      = default_contexts();
        self.hdr        = VP9FrameHeader::new();
        self.last_key   = false;
        self.last_frame = None;
    }
}

impl NAOptionHandler for VP9Parser {
    fn get_supported_options(&self) -> &[NAOptionDefinition] { PARSER_OPTIONS }
    fn set_options(&mut self, options: &[NAOption]) {
        for option in options.iter() {
            for opt_def in PARSER_OPTIONS.iter() {
                if opt_def.check(option).is_ok() {
                    match (option.name, &option.value) {
                        (SPLIT_SUPERFRAMES_OPTION, NAValue::Bool(val)) => {
                            self.split_superframes = *val;
                        },
                        (IGNORE_REF_ERRORS_OPTION, NAValue::Bool(val)) => {
                            self.ignore_ref_errors = *val;
                        },
                        (FRAME_ADAPTATION_OPTION, NAValue::Bool(val)) => {
                            self.frame_adaptation = *val;
                            if !*val {
                                self.pending = None;
                            }
                        },
                        _ => {},
                    }
                }
            }
        }
    }
    fn query_option_value(&self, name: &str) -> Option<NAValue> {
        match name {
            SPLIT_SUPERFRAMES_OPTION => Some(NAValue::Bool(self.split_superframes)),
            IGNORE_REF_ERRORS_OPTION => Some(NAValue::Bool(self.ignore_ref_errors)),
            FRAME_ADAPTATION_OPTION  => Some(NAValue::Bool(self.frame_adaptation)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codecs::vp9data::*;
    use crate::codecs::vp9header::test::*;
    use crate::codecs::vp9probs::test::*;
    use crate::codecs::vpcommon::inv_remap_prob;

    fn make_frame(desc: &HeaderDesc, cdesc: &ComprDesc) -> Vec<u8> {
        let mut hdr = VP9FrameHeader::new();
        hdr.keyframe    = desc.keyframe;
        hdr.intra_only  = desc.intra_only;
        hdr.quant.lossless = desc.base_q == 0 && desc.ydc_delta == 0;
        hdr.interp_filter = if desc.interp.is_some() { VP9InterpFilter::Regular } else { VP9InterpFilter::Switchable };
        hdr.allow_hp = desc.allow_hp;
        if !hdr.is_intra() {
            hdr.sign_bias = [false, desc.sign_bias[0], desc.sign_bias[1], desc.sign_bias[2]];
        }
        write_frame(desc, &write_compressed(cdesc, &hdr))
    }
    fn make_superframe(frames: &[Vec<u8>]) -> Vec<u8> {
        let mut data = Vec::new();
        for frm in frames.iter() {
            data.extend_from_slice(frm);
        }
        let marker = 0xC8 | ((frames.len() - 1) as u8);
        data.push(marker);
        for frm in frames.iter() {
            data.push(frm.len() as u8);
            data.push((frm.len() >> 8) as u8);
        }
        data.push(marker);
        data
    }
    fn packet(data: Vec<u8>, pts: u64) -> NAPacket {
        NAPacket::new(data, NATimeInfo::new(Some(pts), None), false)
    }
    fn key_desc() -> HeaderDesc {
        HeaderDesc { parallel: false, refresh_ctx: true, ..Default::default() }
    }
    fn inter_desc(refresh_mask: u8) -> HeaderDesc {
        HeaderDesc {
            keyframe:       false,
            refresh_mask,
            ref_idx:        [0, 1, 2],
            size_from_ref:  Some(0),
            interp:         Some(1),
            base_q:         60,
            ..Default::default()
        }
    }
    fn get_task(res: DecoderResult<VP9ParseResult>) -> Box<VP9DecodeTask> {
        match res {
            Ok(VP9ParseResult::Task(task)) => task,
            Ok(_) => panic!("task expected"),
            Err(err) => panic!("parsing failed: {}", err),
        }
    }

    // parses a frame and reports empty symbol counts when asked for them
    fn decode(parser: &mut VP9Parser, pkt: &NAPacket) -> Box<VP9DecodeTask> {
        let task = get_task(parser.parse(pkt));
        if task.needs_counts {
            assert_eq!(parser.update_probs(task.task_id, &VP9Counts::default()), Ok(()));
        }
        task
    }

    #[test]
    fn test_keyframe() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool.clone());
        let data = make_frame(&key_desc(), &ComprDesc::default());
        let len = data.len();
        let task = get_task(parser.parse(&packet(data, 10)));
        assert!(task.intra && task.needs_display && task.needs_counts && !task.eos);
        assert!(task.hdr.quant.lossless);
        assert_eq!(task.compr.tx_mode, VP9TxMode::Only4x4);
        assert_eq!((task.hdr.width, task.hdr.height), (64, 64));
        assert_eq!(task.refs, [None; 3]);
        assert_eq!(task.pts, Some(10));
        assert_eq!(task.task_id, 0);
        assert_eq!(task.tile_data.end, len);
        assert_eq!(task.get_tile_data(), &[0x55; 16]);
        assert_eq!(task.probs, VP9ProbContext::default().to_hw_order());
        assert_eq!(task.mvref, None);
        for slot in 0..8 {
            assert_eq!(parser.shuf.get_ref(slot), Ok(task.cur));
            assert_eq!(parser.shuf.get_ref_count(slot), 9);
        }
        // parser, display queue and task references
        assert_eq!(pool.num_refs(task.cur), 3);
        drop(task);
        assert_eq!(pool.num_in_use(), 1);
        assert!(parser.waits_for_counts());
        assert_eq!(parser.poc, 1);
    }
    #[test]
    fn test_show_existing() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool.clone());
        let repeat = write_frame(&HeaderDesc { show_existing: Some(3), ..Default::default() }, &[]);
        assert_eq!(parser.parse(&packet(repeat.clone(), 0)).err(), Some(DecoderError::MissingReference));
        assert_eq!(parser.shuf.num_frames(), 0);
        assert_eq!(parser.shuf.get_ref_infos(), [None; 8]);
        assert_eq!(parser.poc, 0);

        let key = decode(&mut parser, &packet(make_frame(&key_desc(), &ComprDesc::default()), 1)).cur;
        match parser.parse(&packet(repeat, 2)) {
            Ok(VP9ParseResult::Repeat { handle, pts }) => {
                assert_eq!(handle, key);
                assert_eq!(pts, Some(2));
            },
            _ => panic!("repeated frame expected"),
        }
        assert_eq!(pool.display_queue_len(), 2);
        assert_eq!(parser.shuf.get_ref_count(3), 9);
        assert_eq!(parser.poc, 1);
    }
    #[test]
    fn test_context_reset() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool);
        let skip0 = inv_remap_prob(5, VP9_DEFAULT_SKIP_PROBS[0]);

        // parallel mode stores the working probabilities right away
        let desc = HeaderDesc { ctx_idx: 2, parallel: true, ..Default::default() };
        let task = decode(&mut parser, &packet(make_frame(&desc, &ComprDesc { skip_delta: Some(5), ..Default::default() }), 0));
        assert_eq!(task.hdr.ctx_idx, 0);
        assert!(!task.needs_counts);
        assert_eq!(parser.saved[0].skip[0], skip0);
        assert_eq!(parser.saved[2], VP9ProbContext::default());

        let desc = HeaderDesc { ctx_idx: 3, parallel: true, ..inter_desc(0x01) };
        let task = decode(&mut parser, &packet(make_frame(&desc, &ComprDesc { skip_delta: Some(5), ..Default::default() }), 1));
        assert!(!task.intra);
        assert_eq!(task.probs.skip[0], skip0);
        assert_eq!(parser.saved[3].skip[0], skip0);

        // intra-only frame resetting only the selected context
        let desc = HeaderDesc { keyframe: false, show_frame: false, intra_only: true, reset_ctx: 2, ctx_idx: 3, refresh_mask: 0x02, parallel: true, refresh_ctx: false, ..Default::default() };
        let task = decode(&mut parser, &packet(make_frame(&desc, &ComprDesc::default()), 2));
        assert!(task.intra && !task.needs_display);
        assert_eq!(task.probs.skip[0], skip0);
        assert_eq!(parser.saved[3], VP9ProbContext::default());
        assert_eq!(parser.saved[0].skip[0], skip0);

        let desc = HeaderDesc { ctx_idx: 1, parallel: true, refresh_ctx: false, ..Default::default() };
        decode(&mut parser, &packet(make_frame(&desc, &ComprDesc::default()), 3));
        for ctx in parser.saved.iter() {
            assert_eq!(ctx, &VP9ProbContext::default());
        }
    }
    #[test]
    fn test_adaptation() {
        let mut counts = VP9Counts::default();
        counts.skip[1] = [100, 3];
        counts.partition[0] = [10, 20, 30, 40];
        counts.y_mode[2][0] = 40;
        counts.coef[0][0][0][2][1] = [50, 20, 7];
        counts.eob[0][0][0][2][1] = [9, 70];
        counts.mv_joint = [5, 6, 7, 8];

        let run = || -> VP9Parser {
                let pool = Arc::new(NAFrameSlotPool::new(16));
                let mut parser = VP9Parser::new(pool);
                let task = get_task(parser.parse(&packet(make_frame(&key_desc(), &ComprDesc::default()), 0)));
                parser.update_probs(task.task_id, &counts).unwrap();
                for pts in 1..3 {
                    let desc = HeaderDesc { refresh_ctx: true, ..inter_desc(0x01) };
                    let task = get_task(parser.parse(&packet(make_frame(&desc, &ComprDesc::default()), pts)));
                    assert!(task.needs_counts);
                    assert_eq!(parser.update_probs(task.task_id + 1, &counts), Err(DecoderError::NoFrame));
                    parser.update_probs(task.task_id, &counts).unwrap();
                    assert_eq!(parser.update_probs(task.task_id, &counts), Err(DecoderError::NoFrame));
                }
                parser
            };
        let first = run();
        let second = run();
        assert_eq!(first.saved, second.saved);
        let ctx = &first.saved[0];
        assert_ne!(ctx, &VP9ProbContext::default());
        assert_ne!(ctx.skip[1], VP9_DEFAULT_SKIP_PROBS[1]);
        assert_eq!(ctx.skip[0], VP9_DEFAULT_SKIP_PROBS[0]);
        // hardware partition counts for 64x64 blocks go to the last contexts
        assert_ne!(ctx.partition[12], VP9_DEFAULT_PARTITION_PROBS[12]);
        assert_eq!(ctx.partition[0], VP9_DEFAULT_PARTITION_PROBS[0]);
        // hardware intra mode 0 is vertical prediction
        assert_ne!(ctx.y_mode[2][2], VP9_DEFAULT_Y_MODE_PROBS[2][2]);
        assert_eq!(first.saved[1], VP9ProbContext::default());

        // adaptation switched off
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool);
        let opts: Vec<NAOption> = parser.get_supported_options().iter()
                .filter_map(|def| def.parse("--noframe_adaptation").ok()).collect();
        assert_eq!(opts.len(), 1);
        parser.set_options(&opts);
        assert_eq!(parser.query_option_value(FRAME_ADAPTATION_OPTION), Some(NAValue::Bool(false)));
        let task = get_task(parser.parse(&packet(make_frame(&key_desc(), &ComprDesc::default()), 0)));
        assert!(!task.needs_counts);
        assert_eq!(parser.update_probs(task.task_id, &counts), Err(DecoderError::NoFrame));
    }
    #[test]
    fn test_counts_before_next_frame() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool);
        let key = get_task(parser.parse(&packet(make_frame(&key_desc(), &ComprDesc::default()), 0)));
        assert!(key.needs_counts);

        // next frame has to wait for the adapted probabilities
        let inter = make_frame(&HeaderDesc { parallel: true, ..inter_desc(0x01) }, &ComprDesc::default());
        assert_eq!(parser.parse(&packet(inter.clone(), 1)).err(), Some(DecoderError::TryAgain));
        assert_eq!(parser.poc, 1);
        assert_eq!(parser.shuf.get_ref(0), Ok(key.cur));
        assert!(parser.waits_for_counts());

        let mut counts = VP9Counts::default();
        counts.coef[0][0][0][1][0] = [30, 60, 90];
        parser.update_probs(key.task_id, &counts).unwrap();
        assert!(!parser.waits_for_counts());
        assert_ne!(parser.get_saved_context(0), Some(&VP9ProbContext::default()));
        assert_eq!(parser.get_saved_context(VP9_NUM_CONTEXTS), None);
        let expected = parser.saved[0].to_hw_order();
        let task = get_task(parser.parse(&packet(inter, 1)));
        assert!(!task.needs_counts);
        assert_eq!(task.probs, expected);

        // superframe draining stops until the hidden frame counts arrive
        let hidden = make_frame(&HeaderDesc { show_frame: false, ..inter_desc(0x04) }, &ComprDesc::default());
        let shown  = make_frame(&inter_desc(0x01), &ComprDesc::default());
        let pkt = packet(make_superframe(&[hidden, shown]), 33);
        let task = get_task(parser.parse(&pkt));
        assert!(task.needs_counts);
        assert_eq!(parser.parse(&pkt).err(), Some(DecoderError::TryAgain));
        assert!(parser.has_pending());
        parser.update_probs(task.task_id, &VP9Counts::default()).unwrap();
        let task = decode(&mut parser, &pkt);
        assert!(task.needs_display);
        assert_eq!(task.pts, Some(33));
        assert!(!parser.has_pending());

        // switching adaptation off drops the request
        let key = get_task(parser.parse(&packet(make_frame(&key_desc(), &ComprDesc::default()), 40)));
        assert!(parser.waits_for_counts());
        parser.set_options(&[NAOption { name: FRAME_ADAPTATION_OPTION, value: NAValue::Bool(false) }]);
        assert!(!parser.waits_for_counts());
        assert_eq!(parser.update_probs(key.task_id, &VP9Counts::default()), Err(DecoderError::NoFrame));
        let task = get_task(parser.parse(&packet(make_frame(&inter_desc(0x01), &ComprDesc::default()), 41)));
        assert!(!task.needs_counts);
    }
    #[test]
    fn test_superframe() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool.clone());
        decode(&mut parser, &packet(make_frame(&key_desc(), &ComprDesc::default()), 0));

        let hidden = make_frame(&HeaderDesc { show_frame: false, ..inter_desc(0x04) }, &ComprDesc::default());
        let shown  = make_frame(&HeaderDesc { ref_idx: [0, 2, 1], ..inter_desc(0x01) }, &ComprDesc::default());
        let pkt = NAPacket::new(make_superframe(&[hidden.clone(), shown.clone()]), NATimeInfo::new(Some(33), Some(30)), true);
        let task = decode(&mut parser, &pkt);
        assert!(!task.needs_display && !task.eos);
        assert_eq!(task.pts, None);
        assert_eq!(task.compr_data.start, task.hdr.hdr_size);
        assert!(parser.has_pending());
        let hidden_pic = task.cur;

        let task = decode(&mut parser, &pkt);
        assert!(task.needs_display && task.eos);
        assert_eq!(task.pts, Some(33));
        assert_eq!(task.dts, Some(30));
        assert_eq!(task.compr_data.start, hidden.len() + task.hdr.hdr_size);
        assert_eq!(task.tile_data.end, hidden.len() + shown.len());
        assert_eq!(task.refs[1].map(|r| r.handle), Some(hidden_pic));
        assert_eq!(task.mvref, Some(hidden_pic));
        assert!(!parser.has_pending());
        assert_eq!(parser.shuf.get_ref(2), Ok(hidden_pic));

        // broken index
        let mut data = make_superframe(&[hidden.clone(), shown.clone()]);
        let len = data.len();
        data[len - 2] = 0xFF;
        assert_eq!(parser.parse(&packet(data, 40)).err(), Some(DecoderError::InvalidData));
        assert!(!parser.has_pending());
        assert_eq!(parser.poc, 3);

        // unfinished superframe is dropped on a new packet
        let pkt = packet(make_superframe(&[hidden, shown.clone()]), 50);
        decode(&mut parser, &pkt);
        assert!(parser.has_pending());
        let task = decode(&mut parser, &packet(shown, 60));
        assert_eq!(task.pts, Some(60));
        assert!(!parser.has_pending());
    }
    #[test]
    fn test_errors_keep_state() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool.clone());
        let key = decode(&mut parser, &packet(make_frame(&key_desc(), &ComprDesc::default()), 0)).cur;

        let mut broken = make_frame(&inter_desc(0xFF), &ComprDesc::default());
        let mut hdr = parser.hdr.clone();
        hdr.parse(&broken, &parser.shuf.get_ref_infos()).unwrap();
        // compressed header marker bit
        broken[hdr.hdr_size] |= 0x80;
        assert_eq!(parser.parse(&packet(broken, 1)).err(), Some(DecoderError::InvalidData));
        assert_eq!(parser.shuf.get_ref(7), Ok(key));
        assert_eq!(parser.shuf.get_ref_count(7), 9);
        assert_eq!(parser.poc, 1);

        // unsupported profile
        let data = make_frame(&HeaderDesc { profile: 1, ..key_desc() }, &ComprDesc::default());
        assert_eq!(parser.parse(&packet(data, 2)).err(), Some(DecoderError::NotImplemented));
        // picture does not fit into the store
        let data = make_frame(&HeaderDesc { width: 65536, height: 65536, ..key_desc() }, &ComprDesc::default());
        assert_eq!(parser.parse(&packet(data, 2)).err(), Some(DecoderError::AllocError));
        assert_eq!(parser.shuf.get_ref(0), Ok(key));
        assert!(!parser.waits_for_counts());

        let task = decode(&mut parser, &packet(make_frame(&inter_desc(0x01), &ComprDesc::default()), 3));
        assert_eq!(task.task_id, 1);
        assert!(!task.ref_error);
        assert_eq!(parser.parse(&packet(Vec::new(), 4)).ok().map(|r| matches!(r, VP9ParseResult::None)), Some(true));
    }
    #[test]
    fn test_reference_errors() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool.clone());
        let key = decode(&mut parser, &packet(make_frame(&key_desc(), &ComprDesc::default()), 0)).cur;
        pool.set_hw_ready(key, true);

        let task = decode(&mut parser, &packet(make_frame(&inter_desc(0x00), &ComprDesc::default()), 1));
        assert!(task.ref_error);
        assert_eq!(task.refs[0].map(|r| (r.handle, r.slot, r.scale)), Some((key, 0, [0, 0])));

        parser.set_options(&[NAOption { name: IGNORE_REF_ERRORS_OPTION, value: NAValue::Bool(true) }]);
        let task = decode(&mut parser, &packet(make_frame(&inter_desc(0x00), &ComprDesc::default()), 2));
        assert!(!task.ref_error);

        // intra frames do not inherit errors
        parser.set_options(&[NAOption { name: IGNORE_REF_ERRORS_OPTION, value: NAValue::Bool(false) }]);
        let task = decode(&mut parser, &packet(make_frame(&key_desc(), &ComprDesc::default()), 3));
        assert!(!task.ref_error);
    }
    #[test]
    fn test_flush() {
        let pool = Arc::new(NAFrameSlotPool::new(16));
        let mut parser = VP9Parser::new(pool.clone());
        let task1 = decode(&mut parser, &packet(make_frame(&key_desc(), &ComprDesc::default()), 0));
        let task2 = decode(&mut parser, &packet(make_frame(&inter_desc(0x01), &ComprDesc::default()), 1));
        assert!(task2.use_prev_mvs);
        assert_eq!(task2.lock.len(), 5);
        assert_eq!(pool.num_in_use(), 2);
        parser.flush();
        assert_eq!(parser.shuf.num_frames(), 0);
        drop(task1);
        drop(task2);
        while pool.dequeue_display().is_some() {}
        assert_eq!(pool.num_in_use(), 0);
        assert_eq!(parser.parse(&packet(make_frame(&inter_desc(0x01), &ComprDesc::default()), 2)).err(), Some(DecoderError::MissingReference));
    }
}
