use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    chip::Chip,
    command::Command,
    device::AT25DF,
    error::{DeviceError, Error},
    register::SoftwareProtection,
};

impl<C, SPI, CS, D> AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Set the write enable latch so the next program, erase or status write is accepted.
    ///
    /// The chip clears the latch again once that command completes, program and
    /// erase call this internally before every page or sector.
    #[doc(alias = "write_enable")]
    pub fn disable_protection(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        self.command(Command::WriteEnable)
    }

    /// Clear the write enable latch
    #[doc(alias = "write_disable")]
    pub fn enable_protection(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        self.command(Command::WriteDisable)
    }

    /// Unprotect every sector. All sectors are protected after power up.
    pub(crate) fn global_unlock(&mut self) -> Result<(), DeviceError<SPI, CS>> {
        self.disable_protection()?;
        self.command_write(&[Command::WriteStatus as u8, 0x00])?;
        self.busy_wait(C::TIMING.status_write_timeout_us)?;
        self.enable_protection()?;

        let status = self.read_status()?;
        if status.software_protection != SoftwareProtection::None {
            #[cfg(feature = "defmt")]
            defmt::error!("{=str} still protected: {:?}", C::NAME, status);
            return Err(Error::ProtectionVerification);
        }
        Ok(())
    }
}
