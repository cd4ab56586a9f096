use crate::{
    ParseError, CHANNELS_LEN, END_BYTE, FLAGS_INDEX, FRAME_LEN, PAYLOAD_LEN, START_BYTE,
    TRAILER_INDEX,
};

mod channels;
pub use channels::*;

mod flags;
pub use flags::*;

/// The bytes collected between the start byte and the terminator (not decoded).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPayload([u8; PAYLOAD_LEN]);

impl RawPayload {
    pub const fn new(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    pub fn raw_channels(&self) -> RawChannels {
        let packed: [u8; CHANNELS_LEN] = core::array::from_fn(|i| self.0[i]);
        RawChannels::unpack(&packed)
    }

    pub fn flags(&self) -> Flags {
        Flags::from_bits(self.0[FLAGS_INDEX])
    }

    pub fn trailer(&self) -> u8 {
        self.0[TRAILER_INDEX]
    }

    /// Unpacks and normalizes the payload.
    pub fn decode(&self) -> Frame {
        let raw = self.raw_channels();

        Frame {
            raw,
            channels: raw.normalize(),
            flags: self.flags(),
            trailer: self.trailer(),
        }
    }
}

impl TryFrom<&[u8]> for RawPayload {
    type Error = ParseError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        slice
            .try_into()
            .map(Self)
            .map_err(|_| ParseError::InvalidLength { len: slice.len() })
    }
}

/// A decoded frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Channel values as sent by the receiver
    pub raw: RawChannels,
    /// Channel values normalized to `-1.0..=1.0`
    pub channels: Channels,
    pub flags: Flags,
    /// The byte after the flag byte, see [`Footer`]
    pub trailer: u8,
}

impl Frame {
    pub fn is_frame_lost(&self) -> bool {
        self.flags.frame_lost()
    }

    pub fn is_failsafe(&self) -> bool {
        self.flags.failsafe()
    }

    pub fn footer(&self) -> Option<Footer> {
        Footer::try_from(self.trailer).ok()
    }

    /// Writes the frame in its wire format.
    pub fn encode(&self, buf: &mut [u8; FRAME_LEN]) {
        encode_frame(&self.raw, self.flags, self.trailer, buf);
    }
}

/// Writes a complete frame: start byte, packed channels, flag byte, trailer and terminator.
pub fn encode_frame(raw: &RawChannels, flags: Flags, trailer: u8, buf: &mut [u8; FRAME_LEN]) {
    let mut packed = [0u8; CHANNELS_LEN];
    raw.pack(&mut packed);

    buf[0] = START_BYTE;
    buf[1..=CHANNELS_LEN].copy_from_slice(&packed);
    buf[1 + FLAGS_INDEX] = flags.into_bits();
    buf[1 + TRAILER_INDEX] = trailer;
    buf[FRAME_LEN - 1] = END_BYTE;
}

#[cfg(test)]
mod tests {
    use crate::{encode_frame, Flags, Footer, ParseError, RawChannels, RawPayload, FRAME_LEN};

    #[rustfmt::skip]
    const RAW_BYTES: [u8; FRAME_LEN] = [
        0x0F,
        0xE0, 0x03, 0x1F, 0x58, 0xC0, 0x07, 0x16, 0xB0, 0x80, 0x05, 0x2C,
        0x60, 0x01, 0x0B, 0xF8, 0xC0, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x03, 0x00,
        0x00,
    ];

    #[test]
    fn test_decode_payload() {
        let payload = RawPayload::try_from(&RAW_BYTES[1..FRAME_LEN - 1]).unwrap();
        let frame = payload.decode();

        assert_eq!(
            frame.raw,
            RawChannels([992, 992, 352, 992, 352, 352, 352, 352, 352, 352, 992, 992, 0, 0, 0, 0])
        );
        assert_eq!(frame.channels[12], -1.0);
        assert!(frame.flags.channel_17());
        assert!(frame.flags.channel_18());
        assert!(!frame.is_frame_lost());
        assert!(!frame.is_failsafe());
        assert_eq!(frame.footer(), Some(Footer::End));
    }

    #[test]
    fn test_encode_frame() {
        let frame = RawPayload::try_from(&RAW_BYTES[1..FRAME_LEN - 1])
            .unwrap()
            .decode();

        // dirty buffer
        let mut buf = [0xFF; FRAME_LEN];
        frame.encode(&mut buf);
        assert_eq!(buf, RAW_BYTES);
    }

    #[test]
    fn test_encode_flags_and_trailer() {
        let mut buf = [0; FRAME_LEN];
        encode_frame(&RawChannels([2047; 16]), Flags::from_bits(0x0F), 0x14, &mut buf);

        let payload = RawPayload::try_from(&buf[1..FRAME_LEN - 1]).unwrap();
        assert_eq!(payload.as_bytes()[..22], [0xFF; 22]);

        let frame = payload.decode();
        assert!(frame.is_frame_lost());
        assert!(frame.is_failsafe());
        assert_eq!(frame.footer(), Some(Footer::TelemetrySlots8To15));
        assert!(frame.channels.iter().all(|&ch| ch == 1.0));
    }

    #[test]
    fn test_unknown_footer() {
        let mut bytes = [0; 24];
        bytes[23] = 0x42;
        let frame = RawPayload::new(bytes).decode();
        assert_eq!(frame.trailer, 0x42);
        assert_eq!(frame.footer(), None);
    }

    #[test]
    fn test_payload_wrong_length() {
        assert_eq!(
            RawPayload::try_from(&RAW_BYTES[..]),
            Err(ParseError::InvalidLength { len: FRAME_LEN })
        );
    }
}
