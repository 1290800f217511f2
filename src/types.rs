use crate::fields::Light;

/// All possible errors in this crate
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I²C bus error.
    I2C(E),
    /// The configured bus frequency is outside the 1 Hz - 400 kHz range
    /// supported by the sensor.
    UnsupportedBusFrequency(u32),
    /// The ID register did not hold the TSL2591 identity byte.
    InvalidDeviceId {
        /// Expected device ID
        expected: u8,
        /// Found device ID
        found: u8,
    },
    /// An ENABLE value with reserved bits set was rejected before being written.
    InvalidEnableFlags(u8),
    /// Not one of the four gain constants.
    InvalidGain(u8),
    /// Not one of the six integration time constants.
    InvalidIntegrationTime(u8),
}

/// Raw counts of both photodiode channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawData {
    /// CH0, full spectrum.
    pub ch0_raw: u16,
    /// CH1, infrared.
    pub ch1_raw: u16,
}

impl RawData {
    /// Decodes the four little-endian bytes starting at C0DATAL.
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        RawData {
            ch0_raw: u16::from_le_bytes([bytes[0], bytes[1]]),
            ch1_raw: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }

    pub fn is_saturated(&self, max_count: u16) -> bool {
        self.ch0_raw >= max_count || self.ch1_raw >= max_count
    }

    /// Combines the channels as selected by `light`. Visible light is the
    /// signed difference of both channels.
    pub fn combine(&self, light: Light) -> i32 {
        match light {
            Light::FullSpectrum => i32::from(self.ch0_raw),
            Light::Infrared => i32::from(self.ch1_raw),
            Light::Visible => i32::from(self.ch0_raw) - i32::from(self.ch1_raw),
        }
    }
}

/// Result of a luminosity reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Luminosity {
    /// Raw counts for the requested channel combination.
    Counts(i32),
    /// A channel hit the maximum count for the current integration time.
    Saturated,
}

impl Luminosity {
    /// Sentinel reported for saturated readings by [`Luminosity::value`].
    pub const SATURATED: i32 = -1;

    /// Flattens the reading into a single number, with `-1` standing in for
    /// a saturated reading.
    pub fn value(self) -> i32 {
        match self {
            Luminosity::Counts(counts) => counts,
            Luminosity::Saturated => Self::SATURATED,
        }
    }

    pub fn is_saturated(self) -> bool {
        self == Luminosity::Saturated
    }
}
