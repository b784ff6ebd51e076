use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    address::Address, chip::Chip, command::Command, device::AT25DF, error::DeviceError,
    operation::OperationKind,
};

impl<C, SPI, CS, D> AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Erase `size` bytes starting at `addr`, one 4kB erase per sector.
    ///
    /// `size` must be a multiple of the sector size. `addr` is sent as is and the
    /// chip erases the whole sector containing each address it receives, so an
    /// unaligned `addr` erases the bytes before it in its first sector and stops
    /// short of `addr + size` in the last one.
    pub fn erase(&mut self, addr: u32, size: u32) -> Result<(), DeviceError<SPI, CS>> {
        C::GEOMETRY.check_operation(addr, size, OperationKind::Erase)?;
        self.check_identity()?;

        let sector_size = C::GEOMETRY.sector_size;
        let mut start = addr;
        for _ in 0..size / sector_size {
            #[cfg(feature = "defmt")]
            defmt::trace!("Erase sector at {=u32}", start);

            self.disable_protection()?;
            self.addr_command(Command::BlockErase4K, Address(start))?;
            self.busy_wait(C::TIMING.sector_erase_timeout_us)?;
            start += sector_size;
        }
        Ok(())
    }
}
