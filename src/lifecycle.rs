use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    chip::Chip,
    command::Command,
    device::AT25DF,
    error::{DeviceError, Error},
};

/// Magic word [`AT25DF::perform_chip_erase`] requires
#[cfg(feature = "chip-erase")]
pub const CHIP_ERASE_MAGIC: u32 = 0xADE570;

/// Where the driver believes the chip is
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Constructed, nothing sent yet
    Unknown,
    /// In ultra deep power down
    Standby,
    /// Identified and unprotected
    Active,
    /// Identification or initialization failed
    Faulted,
}

impl<C, SPI, CS, D> AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Wake the chip, check its identification and unprotect every sector.
    ///
    /// On any failure the device is left [`DeviceState::Faulted`]. Nothing is retried.
    pub fn init(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        let res = self.exit_standby().and_then(|()| self.global_unlock());
        if res.is_ok() {
            #[cfg(feature = "defmt")]
            defmt::info!("{=str} ready", C::NAME);
            self.state = DeviceState::Active;
        } else {
            self.state = DeviceState::Faulted;
        }
        res
    }

    /// Clear the write enable latch and put the chip in ultra deep power down
    pub fn deinit(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        self.enable_protection()?;
        self.enter_standby()
    }

    /// Put the chip in ultra deep power down. It ignores everything until [`Self::exit_standby`]
    pub fn enter_standby(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        self.command(Command::UltraDeepPowerDown)?;
        self.state = DeviceState::Standby;
        Ok(())
    }

    /// Leave ultra deep power down by pulsing chip select, then check the identification
    pub fn exit_standby(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        self.pulse_select(C::TIMING.wake_pulse_ns)?;
        self.delay.delay_us(C::TIMING.wake_settle_us);

        self.check_identity()?;
        self.state = DeviceState::Active;
        Ok(())
    }

    /// Compare the chip's identification with the expected one, every byte must match.
    ///
    /// A mismatch leaves the device [`DeviceState::Faulted`].
    pub fn check_identity(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        let id = self.read_identification()?;
        if id.to_bytes() != C::JEDEC_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("Expected {=str} ({:?}), found {:?}", C::NAME, C::JEDEC_ID, id);
            self.state = DeviceState::Faulted;
            return Err(Error::DeviceNotFound);
        }
        Ok(())
    }

    /// Erase the whole chip. This cannot be undone and blocks for several seconds.
    ///
    /// `magic` must be [`CHIP_ERASE_MAGIC`], anything else returns [`Error::Value`]
    /// without touching the chip.
    #[cfg(feature = "chip-erase")]
    pub fn perform_chip_erase(&mut self, magic: u32) -> Result<(), DeviceError<SPI, CS>> {
        if magic != CHIP_ERASE_MAGIC {
            return Err(Error::Value);
        }
        self.check_identity()?;

        #[cfg(feature = "defmt")]
        defmt::warn!("Erasing the whole {=str}", C::NAME);
        self.disable_protection()?;
        self.command(Command::ChipErase)?;
        self.busy_wait(C::TIMING.chip_erase_timeout_us)?;
        Ok(())
    }
}
