use {bitfields::bitfield, num_enum::TryFromPrimitive};

/// Flag byte of a frame.
#[bitfield(u8)]
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags {
    /// Digital channel 17
    pub channel_17: bool,
    /// Digital channel 18
    pub channel_18: bool,
    /// The receiver missed this frame and repeated the previous channel values
    pub frame_lost: bool,
    /// The receiver is in failsafe
    pub failsafe: bool,
    #[bits(4)]
    _reserved: u8,
}

/// Known values of the byte following the flag byte.
///
/// Receivers with telemetry rotate through the slot markers instead of sending a plain end
/// byte. The decoder reports this byte but never validates it.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Footer {
    End = 0x00,
    TelemetrySlots0To7 = 0x04,
    TelemetrySlots8To15 = 0x14,
    TelemetrySlots16To23 = 0x24,
    TelemetrySlots24To31 = 0x34,
}

#[cfg(test)]
mod tests {
    use super::{Flags, Footer};

    #[test]
    fn test_flag_bits() {
        let flags = Flags::from_bits(0x03);
        assert!(flags.channel_17());
        assert!(flags.channel_18());
        assert!(!flags.frame_lost());
        assert!(!flags.failsafe());

        let flags = Flags::from_bits(0x04);
        assert!(flags.frame_lost());
        assert!(!flags.failsafe());

        let flags = Flags::from_bits(0x08);
        assert!(!flags.frame_lost());
        assert!(flags.failsafe());
    }

    #[test]
    fn test_flags_into_bits() {
        assert_eq!(Flags::from_bits(0x0C).into_bits(), 0x0C);
    }

    #[test]
    fn test_footer_values() {
        assert_eq!(Footer::try_from(0x00u8).ok(), Some(Footer::End));
        assert_eq!(Footer::try_from(0x24u8).ok(), Some(Footer::TelemetrySlots16To23));
        assert!(Footer::try_from(0x0Fu8).is_err());
    }
}
