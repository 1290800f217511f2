//! # Introduction
//! This is a platform-agnostic Rust driver for the [`TSL2591 Ambient Light Sensor`](https://ams.com/tsl25911) using [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) traits.
//!
//! The driver exposes the sensor configuration (gain, integration time, enable
//! flags, interrupt thresholds) and reports raw channel counts for the full
//! spectrum, infrared or visible part of the incoming light, with saturation
//! detection. Converting counts into lux is left to the application.
//!
//! ## Usage
//! ### Setup
//!
//! Instantiate a new driver instance using a [blocking I²C HAL
//! implementation](https://docs.rs/embedded-hal/0.2.*/embedded_hal/blocking/i2c/index.html).
//! Construction checks the device ID and leaves the sensor powered down.
//! For example, using `linux-embedded-hal` and a TSL2591 sensor:
//! ```no_run
//! use linux_embedded_hal::I2cdev;
//! use tsl2591;
//!
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let config = tsl2591::TSL2591Config::default().with_bus_frequency_hz(400_000);
//! let mut sensor = tsl2591::TSL2591::new(dev, config).unwrap();
//! ```
//!
//! ### Configuration
//!
//! ```no_run
//! # use linux_embedded_hal::I2cdev;
//! # use tsl2591;
//! # let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! # let mut sensor = tsl2591::TSL2591::new(dev, Default::default()).unwrap();
//! sensor.set_gain(tsl2591::Gain::Medium).unwrap();
//! sensor.set_integration_time(tsl2591::IntegrationTime::Ms200).unwrap();
//! ```
//!
//! ### Measurements
//!
//! A reading powers the sensor up, waits for valid data, and powers it down
//! again unless an interrupt mode is active:
//! ```no_run
//! use linux_embedded_hal::{Delay, I2cdev};
//! # use tsl2591;
//! # let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! # let mut sensor = tsl2591::TSL2591::new(dev, Default::default()).unwrap();
//! let mut delay = Delay;
//! match sensor.get_luminosity(tsl2591::Light::Visible, &mut delay).unwrap() {
//!     tsl2591::Luminosity::Counts(counts) => println!("Visible light: {}", counts),
//!     tsl2591::Luminosity::Saturated => println!("Sensor saturated"),
//! }
//! ```
//!
//! The wait for valid data has no timeout. Wrap the call if bounded latency
//! is required.
//!
#![no_std]
#[macro_use]
extern crate num_derive;
#[macro_use]
mod macros;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;
use paste::paste;

mod fields;
mod registers;
mod types;
pub use crate::fields::*;
pub use crate::registers::*;
pub use crate::types::*;

const TSL2591_ADDRESS: u8 = 0x29;

/// Content of the ID register.
pub const TSL2591_DEVICE_ID: u8 = 0x50;

/// Bus frequencies accepted by the sensor.
pub const MIN_BUS_FREQUENCY_HZ: u32 = 1;
pub const MAX_BUS_FREQUENCY_HZ: u32 = 400_000;

create_struct_with!(TSL2591Config, {bus_frequency_hz: u32, poll_interval_ms: u32});

impl Default for TSL2591Config {
    fn default() -> Self {
        TSL2591Config {
            bus_frequency_hz: 100_000,
            poll_interval_ms: 10,
        }
    }
}

/// A TSL2591 on an I²C bus.
///
/// The driver caches the ENABLE flags and the CONTROL fields it last wrote.
/// Status getters always go to the hardware.
#[derive(Debug)]
pub struct TSL2591<I2C> {
    i2c: I2C,
    config: TSL2591Config,
    enabled: u8,
    gain: Gain,
    integration_time: IntegrationTime,
}

impl<I2C, E> TSL2591<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::Read<Error = E>,
{
    /// Initializes the TSL2591 driver while consuming the i2c bus.
    ///
    /// `config.bus_frequency_hz` must describe the speed the bus was set up
    /// with. The device ID is verified, the current gain, integration time and
    /// enable flags are read back, and the sensor is put to sleep.
    pub fn new(i2c: I2C, config: TSL2591Config) -> Result<Self, Error<E>> {
        if !(MIN_BUS_FREQUENCY_HZ..=MAX_BUS_FREQUENCY_HZ).contains(&config.bus_frequency_hz) {
            return Err(Error::UnsupportedBusFrequency(config.bus_frequency_hz));
        }

        let mut tsl = TSL2591 {
            i2c,
            config,
            enabled: 0x00,
            gain: Gain::Low,
            integration_time: IntegrationTime::Ms100,
        };

        let id = tsl.get_device_id()?;
        if id != TSL2591_DEVICE_ID {
            return Err(Error::InvalidDeviceId {
                expected: TSL2591_DEVICE_ID,
                found: id,
            });
        }

        tsl.gain = tsl.get_gain()?;
        tsl.integration_time = tsl.get_integration_time()?;
        tsl.enabled = tsl.read_register(Register::ENABLE)?;
        debug!(
            "TSL2591 found: gain={}, integration_time={}, enable={=u8:#x}",
            tsl.gain,
            tsl.integration_time,
            tsl.enabled
        );

        tsl.set_to_sleep()?;
        Ok(tsl)
    }

    /// Destroy driver instance, return I²C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Get the device ID stored inside the TSL2591. This ID should be 0x50.
    pub fn get_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::ID)
    }

    /// Get the package identification bits of the PID register.
    pub fn get_package_id(&mut self) -> Result<u8, Error<E>> {
        Ok((self.read_register(Register::PID)? & 0x30) >> 4)
    }

    /// Powers the sensor on and enables ALS, together with `flags`.
    ///
    /// Flags with reserved bits set are rejected without touching the bus.
    pub fn enable(&mut self, flags: u8) -> Result<(), Error<E>> {
        if !EnableFlags::is_valid(flags) {
            return Err(Error::InvalidEnableFlags(flags));
        }
        self.write_enable(flags | EnableFlags::AEN | EnableFlags::PON)
    }

    /// Clears `flags` from the current enable flags.
    pub fn disable(&mut self, flags: u8) -> Result<(), Error<E>> {
        let enabled = self.enabled & !flags;
        if !EnableFlags::is_valid(enabled) {
            return Err(Error::InvalidEnableFlags(enabled));
        }
        self.write_enable(enabled)
    }

    /// Clears every enable flag, leaving the sensor in its low-power state.
    pub fn set_to_sleep(&mut self) -> Result<(), Error<E>> {
        self.write_enable(0x00)
    }

    /// Sets the ALS gain.
    ///
    /// If ALS is running, it is disabled around the CONTROL write and the
    /// previous enable flags are restored afterwards.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<E>> {
        let control = self.control().with_gain(gain);

        if self.is_als_enabled()? {
            let flags = self.extra_flags();
            self.disable(EnableFlags::AEN)?;
            self.write_control(control)?;
            self.enable(flags)
        } else {
            self.write_control(control)
        }
    }

    /// Sets the ALS integration time. Unlike [`TSL2591::set_gain`], this
    /// writes CONTROL without pausing a running measurement.
    pub fn set_integration_time(&mut self, integration_time: IntegrationTime) -> Result<(), Error<E>> {
        let control = self.control().with_integration_time(integration_time);
        self.write_control(control)
    }

    /// Reads the gain currently programmed into the sensor.
    pub fn get_gain(&mut self) -> Result<Gain, Error<E>> {
        let control = self.read_register(Register::CONTROL)?;
        ControlRegister::decode_gain(control).ok_or(Error::InvalidGain(control))
    }

    /// Reads the integration time currently programmed into the sensor.
    pub fn get_integration_time(&mut self) -> Result<IntegrationTime, Error<E>> {
        let control = self.read_register(Register::CONTROL)?;
        ControlRegister::decode_integration_time(control)
            .ok_or(Error::InvalidIntegrationTime(control & 0x07))
    }

    pub fn is_sai_enabled(&mut self) -> Result<bool, Error<E>> {
        self.enable_flag_set(EnableFlags::SAI)
    }

    pub fn is_als_enabled(&mut self) -> Result<bool, Error<E>> {
        self.enable_flag_set(EnableFlags::AEN)
    }

    /// No-persist interrupt enabled.
    pub fn is_int_enabled(&mut self) -> Result<bool, Error<E>> {
        self.enable_flag_set(EnableFlags::NPIEN)
    }

    /// Persistent ALS interrupt enabled.
    pub fn is_persist_int_enabled(&mut self) -> Result<bool, Error<E>> {
        self.enable_flag_set(EnableFlags::AIEN)
    }

    /// Check if an ALS cycle completed since ALS was enabled.
    pub fn is_als_valid(&mut self) -> Result<bool, Error<E>> {
        self.status_flag_set(StatusFlags::AVALID)
    }

    pub fn has_int_occurred(&mut self) -> Result<bool, Error<E>> {
        self.status_flag_set(StatusFlags::NPINTR)
    }

    pub fn has_persist_int_occurred(&mut self) -> Result<bool, Error<E>> {
        self.status_flag_set(StatusFlags::AINT)
    }

    /// Clears the no-persist interrupt.
    pub fn clear_interrupt(&mut self) -> Result<(), Error<E>> {
        self.write(SpecialFunction::CLEAR_NO_PERSIST_INTERRUPT, None)
    }

    /// Clears the persistent ALS interrupt.
    pub fn clear_persist_interrupt(&mut self) -> Result<(), Error<E>> {
        self.write(SpecialFunction::CLEAR_PERSIST_INTERRUPT, None)
    }

    pub fn clear_all_interrupts(&mut self) -> Result<(), Error<E>> {
        self.write(SpecialFunction::CLEAR_ALL_INTERRUPTS, None)
    }

    /// Asserts an interrupt regardless of the thresholds. Mostly useful to
    /// check the interrupt line wiring.
    pub fn force_interrupt(&mut self) -> Result<(), Error<E>> {
        self.write(SpecialFunction::FORCE_INTERRUPT, None)
    }

    /// Runs a single measurement and returns the requested channel combination.
    ///
    /// The sensor is polled for valid data every `poll_interval_ms` using
    /// `delay`; there is no timeout. Afterwards the sensor is powered down
    /// again unless one of the interrupt modes is enabled.
    pub fn get_luminosity<D>(&mut self, light: Light, delay: &mut D) -> Result<Luminosity, Error<E>>
    where
        D: DelayMs<u32>,
    {
        self.enable(self.extra_flags())?;

        while !self.is_als_valid()? {
            delay.delay_ms(self.config.poll_interval_ms);
        }

        // The saturation level depends on what the hardware integrated with
        let integration_time = self.get_integration_time()?;
        let raw_data = self.read_raw_data()?;

        let luminosity = if raw_data.is_saturated(integration_time.max_count()) {
            warn!(
                "TSL2591 saturated: ch0={=u16}, ch1={=u16}",
                raw_data.ch0_raw,
                raw_data.ch1_raw
            );
            Luminosity::Saturated
        } else {
            Luminosity::Counts(raw_data.combine(light))
        };

        if !self.is_int_enabled()? && !self.is_persist_int_enabled()? {
            self.disable(EnableFlags::AEN | EnableFlags::PON)?;
        }

        Ok(luminosity)
    }

    /// Programs the ALS interrupt thresholds.
    ///
    /// Without `persist`, the no-persist interrupt (NPIEN) fires on the first
    /// cycle outside `low..=high`. With `persist`, the persistent interrupt
    /// (AIEN) fires after that many consecutive out-of-range cycles.
    pub fn register_interrupt(&mut self, low: u16, high: u16, persist: Option<u8>) -> Result<(), Error<E>> {
        let (flag, thresholds) = match persist {
            None => (EnableFlags::NPIEN, Register::NPAILTL),
            Some(_) => (EnableFlags::AIEN, Register::AILTL),
        };

        self.enable(self.extra_flags() | flag)?;

        let [low_lsb, low_msb] = low.to_le_bytes();
        let [high_lsb, high_msb] = high.to_le_bytes();
        self.write_register(thresholds, low_lsb)?;
        self.write_register(thresholds + 1, low_msb)?;
        self.write_register(thresholds + 2, high_lsb)?;
        self.write_register(thresholds + 3, high_msb)?;

        if let Some(count) = persist {
            self.write_register(Register::PERSIST, encode_persistence(count))?;
        }

        Ok(())
    }

    /// Reads one channel out of the ALS data block.
    pub fn read_channel(&mut self, channel: Channel) -> Result<u16, Error<E>> {
        let mut data = [0u8; 4];
        self.read(Register::C0DATAL, &mut data)?;

        let offset = 2 * channel as usize;
        Ok(u16::from_le_bytes([data[offset], data[offset + 1]]))
    }

    /// Reads both channels in one transfer so they belong to the same ALS cycle.
    pub fn read_raw_data(&mut self) -> Result<RawData, Error<E>> {
        let mut data = [0u8; 4];
        self.read(Register::C0DATAL, &mut data)?;
        Ok(RawData::from_le_bytes(data))
    }

    /// Enable flags other than AEN and PON.
    fn extra_flags(&self) -> u8 {
        self.enabled & !(EnableFlags::AEN | EnableFlags::PON)
    }

    fn control(&self) -> ControlRegister {
        ControlRegister::default()
            .with_gain(self.gain)
            .with_integration_time(self.integration_time)
    }

    fn write_control(&mut self, control: ControlRegister) -> Result<(), Error<E>> {
        self.write_register(Register::CONTROL, control.value())?;
        self.gain = control.gain.value;
        self.integration_time = control.integration_time.value;
        Ok(())
    }

    fn write_enable(&mut self, enabled: u8) -> Result<(), Error<E>> {
        self.write_register(Register::ENABLE, enabled)?;
        self.enabled = enabled;
        Ok(())
    }

    fn enable_flag_set(&mut self, flag: u8) -> Result<bool, Error<E>> {
        Ok(self.read_register(Register::ENABLE)? & flag != 0)
    }

    fn status_flag_set(&mut self, flag: u8) -> Result<bool, Error<E>> {
        Ok(self.read_register(Register::STATUS)? & flag != 0)
    }
}

impl<I2C, E> TSL2591<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::Read<Error = E>,
{
    /// Sends the command byte for `register`, followed by `value` if there is one.
    fn write(&mut self, register: u8, value: Option<u8>) -> Result<(), Error<E>> {
        let command = command(register);
        trace!("TSL2591 write: command={=u8:#x}, value={}", command, value);

        let result = match value {
            Some(value) => self.i2c.write(TSL2591_ADDRESS, &[command, value]),
            None => self.i2c.write(TSL2591_ADDRESS, &[command]),
        };
        result.map_err(Error::I2C)
    }

    fn write_register(&mut self, register: u8, data: u8) -> Result<(), Error<E>> {
        self.write(register, Some(data))
    }

    /// Addresses `register`, then reads `buffer.len()` bytes starting there.
    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error<E>> {
        self.write(register, None)?;
        self.i2c
            .read(TSL2591_ADDRESS, buffer)
            .map_err(Error::I2C)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Error<E>> {
        let mut data: [u8; 1] = [0];
        self.read(register, &mut data).and(Ok(data[0]))
    }
}
