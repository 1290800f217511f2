use num_traits::{FromPrimitive, ToPrimitive};

pub mod helpers {
    #[inline]
    pub fn get_mask(start_index: u8, width: u8) -> u8 {
        ((1u8 << width) - 1u8) << start_index
    }
}

// General Field structure used by registers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<T> {
    pub start_index: u8,
    pub width: u8,
    pub value: T,
}

impl<T> Field<T>
where
    T: ToPrimitive,
{
    /// Returns the field value shifted into place and truncated to the field width.
    pub fn bits(&self) -> u8 {
        let mask: u8 = helpers::get_mask(self.start_index, self.width);
        let val: u8 = self.value.to_u8().unwrap_or_default();
        (val << self.start_index) & mask
    }
}

impl<T> Field<T>
where
    T: FromPrimitive,
{
    /// Extracts the field from a raw register byte. Returns `None` if the bits
    /// don't map to a known value.
    pub fn extract(start_index: u8, width: u8, raw: u8) -> Option<T> {
        let mask = helpers::get_mask(start_index, width);
        T::from_u8((raw & mask) >> start_index)
    }
}

/// ALS gain. Occupies bits 4-5 of the CONTROL register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// 1x
    Low = 0x00,
    /// 25x
    Medium = 0x01,
    /// 428x
    High = 0x02,
    /// 9876x
    Maximum = 0x03,
}

impl Gain {
    /// The gain as it appears in the CONTROL register.
    pub fn bits(self) -> u8 {
        (self as u8) << 4
    }
}

impl TryFrom<u8> for Gain {
    type Error = u8;

    /// Accepts only the register-encoded constants `0x00`, `0x10`, `0x20` and `0x30`.
    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        if raw & !0x30 != 0 {
            return Err(raw);
        }
        Gain::from_u8(raw >> 4).ok_or(raw)
    }
}

/// ALS integration time. Occupies bits 0-2 of the CONTROL register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntegrationTime {
    Ms100 = 0x00,
    Ms200 = 0x01,
    Ms300 = 0x02,
    Ms400 = 0x03,
    Ms500 = 0x04,
    Ms600 = 0x05,
}

impl IntegrationTime {
    /// Largest count a channel can report before it is considered saturated.
    ///
    /// The 100ms setting cannot fill the 16-bit data registers.
    pub fn max_count(self) -> u16 {
        match self {
            IntegrationTime::Ms100 => 0x8FFF,
            _ => 0xFFFF,
        }
    }

    /// Integration time in milliseconds.
    pub fn as_millis(self) -> u32 {
        100 * (self as u32 + 1)
    }
}

impl TryFrom<u8> for IntegrationTime {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        IntegrationTime::from_u8(raw).ok_or(raw)
    }
}

/// One of the two photodiode channels, by its offset in the data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// CH0, visible and infrared.
    FullSpectrum = 0,
    /// CH1, infrared only.
    Infrared = 1,
}

/// Which combination of channels `get_luminosity` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Light {
    FullSpectrum,
    Visible,
    Infrared,
}
