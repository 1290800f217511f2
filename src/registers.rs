use crate::create_register;
use crate::fields::*;
use paste::paste;

/// Every register access sets the CMD bit and selects the normal operation
/// transaction type.
pub const COMMAND_BIT: u8 = 0xA0;

/// Register definitions
pub struct Register;
impl Register {
    pub const ENABLE: u8 = 0x00;
    pub const CONTROL: u8 = 0x01;
    /// Persistent ALS interrupt thresholds, 4 bytes.
    pub const AILTL: u8 = 0x04;
    /// No-persist ALS interrupt thresholds, 4 bytes.
    pub const NPAILTL: u8 = 0x08;
    pub const PERSIST: u8 = 0x0C;
    pub const PID: u8 = 0x11;
    pub const ID: u8 = 0x12;
    pub const STATUS: u8 = 0x13;
    /// CH0 low, CH0 high, CH1 low, CH1 high.
    pub const C0DATAL: u8 = 0x14;
}

/// Special function opcodes. Sent as a bare command byte.
pub struct SpecialFunction;
impl SpecialFunction {
    pub const FORCE_INTERRUPT: u8 = 0xE4;
    pub const CLEAR_PERSIST_INTERRUPT: u8 = 0xE6;
    pub const CLEAR_ALL_INTERRUPTS: u8 = 0xE7;
    pub const CLEAR_NO_PERSIST_INTERRUPT: u8 = 0xEA;
}

/// Bits of the ENABLE register.
pub struct EnableFlags;
impl EnableFlags {
    /// No-persist interrupt enable
    pub const NPIEN: u8 = 0x80;
    /// Sleep after interrupt
    pub const SAI: u8 = 0x40;
    /// ALS (persistent) interrupt enable
    pub const AIEN: u8 = 0x10;
    /// ALS enable
    pub const AEN: u8 = 0x02;
    /// Power on
    pub const PON: u8 = 0x01;
    /// Bits 2, 3 and 5 must always be written as zero.
    pub const RESERVED: u8 = 0x2C;

    #[inline]
    pub fn is_valid(flags: u8) -> bool {
        flags & Self::RESERVED == 0
    }
}

/// Bits of the STATUS register.
pub struct StatusFlags;
impl StatusFlags {
    /// ALS data valid
    pub const AVALID: u8 = 0x01;
    /// ALS (persistent) interrupt
    pub const AINT: u8 = 0x10;
    /// No-persist interrupt
    pub const NPINTR: u8 = 0x20;
}

/// Builds the command byte that addresses `register`.
#[inline]
pub fn command(register: u8) -> u8 {
    COMMAND_BIT | register
}

/// Encodes a persistence count into the PERSIST register.
///
/// Codes 0-3 are taken as-is. Larger counts use the 5-cycle steps of
/// codes 4-15 (5, 10, ... 60 consecutive cycles), capped at 60.
pub fn encode_persistence(count: u8) -> u8 {
    if count > 3 {
        (3 + count / 5).min(15)
    } else {
        count
    }
}

/// Defines a standard structure for a 8-bit register.
///
/// This macro takes `StructName, {structfield1: type1, structfield2: type2, ...}` as arguments
/// and generates a structure:
///
/// ```compile_fail
/// struct StructName {
///     structfield1: Field<type1>,
///     structfield2: Field<type2>,
///     ...
/// }
/// ```
///
/// The structure will have automatic `with_structfieldX()` factory methods created, as well
/// as a `value()` function that returns the encoded u8 data and `decode_structfieldX()`
/// functions that pull a single field out of a raw register byte.
///
#[macro_export]
macro_rules! create_register {
    ($reg_name:ident, {$($element: ident: $ty: ty),*}) => {
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $reg_name { $(pub $element: Field<$ty>),* }

        paste! {
            impl $reg_name {
                pub fn value(&self) -> u8 {
                    let mut temp: u8 = 0x00;
                    $(
                        temp |= self.$element.bits();
                    )*
                    temp
                }

            // Creates with_<variable> methods
            $(
                pub fn [<with_ $element>] (self, paste!{[<new_ $element>]}: $ty) -> Self {
                    let mut tmp = $reg_name{..self};
                    tmp.$element.value = paste!{[<new_ $element>]};
                    tmp
                }
            )*

            // Creates decode_<variable> methods
            $(
                pub fn [<decode_ $element>] (raw: u8) -> Option<$ty> {
                    let layout = $reg_name::default();
                    Field::<$ty>::extract(layout.$element.start_index, layout.$element.width, raw)
                }
            )*
            }
        }
    }
}

create_register!(ControlRegister, {gain: Gain, integration_time: IntegrationTime});

impl Default for ControlRegister {
    fn default() -> Self {
        ControlRegister {
            gain: Field {
                start_index: 4,
                width: 2,
                value: Gain::Low,
            },
            integration_time: Field {
                start_index: 0,
                width: 3,
                value: IntegrationTime::Ms100,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_byte() {
        assert_eq!(command(Register::ENABLE), 0xA0);
        assert_eq!(command(Register::ID), 0xB2);
        assert_eq!(command(Register::C0DATAL), 0xB4);
        // Special functions already carry the command bits
        assert_eq!(command(SpecialFunction::CLEAR_NO_PERSIST_INTERRUPT), 0xEA);
        assert_eq!(command(SpecialFunction::CLEAR_ALL_INTERRUPTS), 0xE7);
    }

    #[test]
    fn control_register_value() {
        let control = ControlRegister::default()
            .with_gain(Gain::Maximum)
            .with_integration_time(IntegrationTime::Ms300);

        assert_eq!(control.gain.value, Gain::Maximum);
        assert_eq!(control.value(), 0b0011_0010);
        assert_eq!(
            control.value(),
            Gain::Maximum.bits() | IntegrationTime::Ms300 as u8
        );
    }

    #[test]
    fn control_register_decode() {
        assert_eq!(ControlRegister::decode_gain(0b0001_0100), Some(Gain::Medium));
        assert_eq!(
            ControlRegister::decode_integration_time(0b0001_0100),
            Some(IntegrationTime::Ms500)
        );
        assert_eq!(ControlRegister::decode_integration_time(0b0000_0111), None);
        // Bit 7 (SRESET) is not part of either field
        assert_eq!(ControlRegister::decode_gain(0b1000_0000), Some(Gain::Low));
    }

    #[test]
    fn enable_flag_validation() {
        assert!(EnableFlags::is_valid(0x00));
        assert!(EnableFlags::is_valid(
            EnableFlags::NPIEN | EnableFlags::SAI | EnableFlags::AIEN | EnableFlags::AEN | EnableFlags::PON
        ));
        for bit in [0x04, 0x08, 0x20] {
            assert!(!EnableFlags::is_valid(bit));
            assert!(!EnableFlags::is_valid(bit | EnableFlags::AIEN));
        }
        assert!(!EnableFlags::is_valid(0xFF));
    }

    #[test]
    fn persistence_encoding() {
        assert_eq!(encode_persistence(0), 0);
        assert_eq!(encode_persistence(3), 3);
        assert_eq!(encode_persistence(4), 3);
        assert_eq!(encode_persistence(5), 4);
        assert_eq!(encode_persistence(7), 4);
        assert_eq!(encode_persistence(60), 15);
        assert_eq!(encode_persistence(255), 15);
    }
}
