use embedded_hal::{digital::OutputPin, spi::SpiBus};

use crate::error::Error;

/// A selected chip. Chip select is asserted for as long as this value lives.
///
/// [`Self::release`] deasserts and reports failures; dropping the guard on an
/// early return deasserts as well, ignoring them.
pub(crate) struct Selected<'a, SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    bus: &'a mut SPI,
    cs: &'a mut CS,
    released: bool,
}

impl<'a, SPI, CS> Selected<'a, SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub(crate) fn assert(
        bus: &'a mut SPI,
        cs: &'a mut CS,
    ) -> Result<Self, Error<SPI::Error, CS::Error>> {
        cs.set_low().map_err(Error::Pin)?;
        Ok(Self {
            bus,
            cs,
            released: false,
        })
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.bus.write(bytes).map_err(Error::Spi)
    }

    pub(crate) fn read(&mut self, buff: &mut [u8]) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.bus.read(buff).map_err(Error::Spi)
    }

    pub(crate) fn transfer_in_place(
        &mut self,
        bytes: &mut [u8],
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.bus.transfer_in_place(bytes).map_err(Error::Spi)
    }

    /// Finish the transaction. The bus is flushed before chip select goes high.
    pub(crate) fn release(mut self) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.released = true;
        let flushed = self.bus.flush().map_err(Error::Spi);
        self.cs.set_high().map_err(Error::Pin)?;
        flushed
    }
}

impl<SPI, CS> Drop for Selected<'_, SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn drop(&mut self) {
        if !self.released {
            let _ = self.bus.flush();
            let _ = self.cs.set_high();
        }
    }
}
