use crate::{CHANNELS_LEN, CHANNEL_CENTER, CHANNEL_HALF_RANGE, CHANNEL_MASK, NUM_CHANNELS};

const CHANNEL_BITS: usize = 11;

/// Normalizes a raw 11-bit channel value to `-1.0..=1.0`, with [`CHANNEL_CENTER`] mapping to
/// `0.0`. Values further than [`CHANNEL_HALF_RANGE`] from the center are clamped.
pub fn normalize_channel(raw: u16) -> f32 {
    let centered = (raw & CHANNEL_MASK) as f32 - CHANNEL_CENTER as f32;
    (centered / CHANNEL_HALF_RANGE as f32).clamp(-1.0, 1.0)
}

/// Channel values as they appear on the wire (11 bits each).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawChannels(pub [u16; NUM_CHANNELS]);

impl RawChannels {
    /// Unpacks the channels from the packed payload bytes. Channel `i` occupies bits
    /// `11 * i ..= 11 * i + 10`, least significant bit first.
    pub fn unpack(data: &[u8; CHANNELS_LEN]) -> Self {
        let mut channels = [0u16; NUM_CHANNELS];

        for (i, ch) in channels.iter_mut().enumerate() {
            let bit = i * CHANNEL_BITS;
            let idx = bit / 8;

            // An 11 bit window spans at most 3 bytes
            let window = u32::from(data[idx])
                | (u32::from(data[idx + 1]) << 8)
                | data.get(idx + 2).map_or(0, |&b| u32::from(b) << 16);

            *ch = (window >> (bit % 8)) as u16 & CHANNEL_MASK;
        }

        Self(channels)
    }

    /// Packs the channels into `data`. Bits above the 11th of each value are ignored.
    pub fn pack(&self, data: &mut [u8; CHANNELS_LEN]) {
        data.fill(0);

        for (i, &ch) in self.0.iter().enumerate() {
            let bit = i * CHANNEL_BITS;
            let window = u32::from(ch & CHANNEL_MASK) << (bit % 8);

            for (offset, byte) in window.to_le_bytes().into_iter().take(3).enumerate() {
                if let Some(slot) = data.get_mut(bit / 8 + offset) {
                    *slot |= byte;
                }
            }
        }
    }

    pub fn normalize(&self) -> Channels {
        Channels(self.0.map(normalize_channel))
    }
}

impl core::ops::Deref for RawChannels {
    type Target = [u16; NUM_CHANNELS];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Normalized channel values in `-1.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channels(pub [f32; NUM_CHANNELS]);

impl core::ops::Deref for Channels {
    type Target = [f32; NUM_CHANNELS];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
