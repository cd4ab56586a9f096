use alloc::vec::{self, Vec};

use snafu::Snafu;

use crate::{
    buffer::{Buf, BytesReader},
    Channels, Frame, RawPayload, END_BYTE, PAYLOAD_LEN, START_BYTE,
};

/// Struct for configuring an `SbusParser`.
#[non_exhaustive]
pub struct ParserConfig {
    /// Maximum number of unconsumed bytes carried over between calls to
    /// [`SbusParser::check_for_new_messages`]. When exceeded, the oldest bytes are dropped.
    /// Default is `None` (unbounded).
    pub max_pending: Option<usize>,
}

impl ParserConfig {
    pub const fn default() -> Self {
        Self { max_pending: None }
    }
}

/// State machine for reading an SBUS frame.
///
/// +--------------+  0x00, 0x0F   +-------------------+
/// | AwaitingSync |-------------->| CollectingPayload |
/// +--------------+               +-------------------+
///         ^                                |
///         |       25th byte (terminator)   |
///         +--------------------------------+
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    AwaitingSync,
    CollectingPayload,
}

/// Streaming SBUS decoder.
///
/// The parser owns all decoding state: the sync stage, the partially collected payload, the
/// last decoded channels and the bytes left over from the previous call. It is meant to be
/// owned by the code reading the receiver and fed sequentially.
pub struct SbusParser {
    config: ParserConfig,
    stage: Stage,
    previous_byte: Option<u8>,
    payload: Buf<PAYLOAD_LEN>,
    channels: Option<Channels>,
    frame_ready: bool,
    pending: Vec<u8>,
}

impl SbusParser {
    /// Creates a new `SbusParser` with the default config.
    pub const fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub const fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            stage: Stage::AwaitingSync,
            previous_byte: None,
            payload: Buf::new(),
            channels: None,
            frame_ready: false,
            pending: Vec::new(),
        }
    }

    /// Resets the framing state and drops any carried-over bytes.
    ///
    /// The last decoded channels and the ready flag are kept.
    pub fn reset(&mut self) {
        self.stage = Stage::AwaitingSync;
        self.previous_byte = None;
        self.payload.clear();
        self.pending.clear();
    }

    /// Feeds a chunk of the byte stream and returns the channels if a frame is ready.
    ///
    /// Bytes left over from the previous call are processed first. Processing stops at the
    /// first frame that becomes ready; anything after it is kept and processed on the next
    /// call, so a chunk holding two frames yields the second one only on the following call
    /// (an empty `data` is enough to flush it).
    ///
    /// Malformed frames are dropped silently and frames flagged as lost are not returned.
    /// The ready flag stays set until [`clear`](Self::clear) is called, so calling this again
    /// without clearing returns the same channels.
    pub fn check_for_new_messages(&mut self, data: &[u8]) -> Option<Channels> {
        let mut buf = core::mem::take(&mut self.pending);
        buf.extend_from_slice(data);

        let mut reader = BytesReader::new(&buf);
        while let Some(byte) = reader.next() {
            if let Some(Ok(_)) = self.push_byte(byte) {
                if self.frame_ready {
                    self.retain_pending(reader.remaining());
                    break;
                }
            }
        }

        if self.frame_ready {
            self.channels
        } else {
            None
        }
    }

    /// Consumes a byte and returns a decoded frame if the byte completed one.
    ///
    /// Frames with the frame lost flag set are returned as well, check
    /// [`Frame::is_frame_lost`]. A frame whose terminator is not `0x00` is dropped and
    /// reported as an error; the parser then looks for the next `0x00, 0x0F` adjacency.
    pub fn push_byte(&mut self, byte: u8) -> Option<Result<Frame, ParseError>> {
        let result = match self.stage {
            Stage::AwaitingSync => {
                if byte == START_BYTE && self.previous_byte == Some(END_BYTE) {
                    self.payload.clear();
                    self.stage = Stage::CollectingPayload;
                }

                None
            }
            Stage::CollectingPayload => match self.payload.full().copied() {
                None => {
                    let pushed = self.payload.push(byte);
                    debug_assert!(pushed, "payload buffer is not full");
                    None
                }
                Some(bytes) => {
                    self.stage = Stage::AwaitingSync;
                    self.payload.clear();

                    if byte == END_BYTE {
                        Some(Ok(self.complete(RawPayload::new(bytes))))
                    } else {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("sbus: dropping frame, terminator {=u8:#x}", byte);

                        Some(Err(ParseError::InvalidTerminator { found: byte }))
                    }
                }
            },
        };

        self.previous_byte = Some(byte);
        result
    }

    /// Returns an iterator over all the frames in the provided buffer, preceded by any bytes
    /// carried over from [`check_for_new_messages`](Self::check_for_new_messages).
    ///
    /// Unlike `check_for_new_messages`, every completed frame is yielded, including lost
    /// frames and dropped ones (as errors). Carried-over bytes not reached when the iterator
    /// is dropped stay pending for the next call.
    pub fn iter_frames<'a, 'b>(&'a mut self, data: &'b [u8]) -> FrameIterator<'a, 'b> {
        let carried = core::mem::take(&mut self.pending).into_iter();

        FrameIterator {
            parser: self,
            carried,
            remaining_data: data.iter(),
        }
    }

    /// Last decoded channels.
    ///
    /// These are not necessarily fresh: they are kept after [`clear`](Self::clear) and are
    /// also updated by frames flagged as lost. Use
    /// [`is_frame_ready`](Self::is_frame_ready) to tell.
    pub fn channels(&self) -> Option<&Channels> {
        self.channels.as_ref()
    }

    /// Whether the stored channels come from a just decoded frame which was not lost.
    pub fn is_frame_ready(&self) -> bool {
        self.frame_ready
    }

    /// Marks the current channels as consumed. The channels themselves are left in place and
    /// remain readable through [`channels`](Self::channels).
    pub fn clear(&mut self) {
        self.frame_ready = false;
    }

    /// Bytes carried over to the next call.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    fn complete(&mut self, payload: RawPayload) -> Frame {
        let frame = payload.decode();

        self.channels = Some(frame.channels);
        self.frame_ready = !frame.is_frame_lost();

        if frame.is_frame_lost() {
            #[cfg(feature = "defmt")]
            defmt::debug!("sbus: frame lost, flags {=u8:#x}", frame.flags.into_bits());
        }

        frame
    }

    fn retain_pending(&mut self, remaining: &[u8]) {
        let skip = match self.config.max_pending {
            Some(max) if remaining.len() > max => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "sbus: dropping {=usize} carried-over bytes",
                    remaining.len() - max
                );

                remaining.len() - max
            }
            _ => 0,
        };

        self.pending.extend_from_slice(&remaining[skip..]);
    }
}

impl Default for SbusParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator for frames in a given buffer. This struct is created by the `iter_frames` method
/// of an `SbusParser`.
pub struct FrameIterator<'a, 'b> {
    parser: &'a mut SbusParser,
    carried: vec::IntoIter<u8>,
    remaining_data: core::slice::Iter<'b, u8>,
}

impl Iterator for FrameIterator<'_, '_> {
    type Item = Result<Frame, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let byte = self
                .carried
                .next()
                .or_else(|| self.remaining_data.next().copied())?;

            if let Some(result) = self.parser.push_byte(byte) {
                return Some(result);
            }
        }
    }
}

impl Drop for FrameIterator<'_, '_> {
    fn drop(&mut self) {
        // The parser's pending buffer was emptied when the iterator was created
        self.parser.pending.extend_from_slice(self.carried.as_slice());
    }
}

/// Enum of parsing errors.
#[non_exhaustive]
#[derive(Debug, PartialEq, Snafu)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    #[snafu(display("Invalid terminator {found:#04x}, expected {END_BYTE:#04x}"))]
    InvalidTerminator { found: u8 },
    #[snafu(display("Invalid payload length {len}, should be {PAYLOAD_LEN}"))]
    InvalidLength { len: usize },
}
