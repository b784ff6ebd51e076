use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{chip::Chip, device::AT25DF, error::DeviceError};

/// Byte addressed storage that is read, programmed and erased in place.
///
/// Sizes are in bytes. Programming only clears bits, so a region must be
/// erased before it is programmed again.
pub trait BlockDevice {
    type Error;

    fn init(&mut self) -> Result<(), Self::Error>;

    fn deinit(&mut self) -> Result<(), Self::Error>;

    fn read(&mut self, addr: u32, buff: &mut [u8]) -> Result<(), Self::Error>;

    fn program(&mut self, addr: u32, data: &[u8]) -> Result<(), Self::Error>;

    /// `size` must be a multiple of [`Self::erase_size`]
    fn erase(&mut self, addr: u32, size: u32) -> Result<(), Self::Error>;

    /// Smallest readable unit
    fn read_size(&self) -> u32;

    /// Smallest programmable unit
    fn program_size(&self) -> u32;

    /// Smallest erasable unit
    fn erase_size(&self) -> u32;

    /// What erased storage reads back as, `None` if it cannot be relied on
    fn erase_value(&self) -> Option<u8>;

    /// Total size
    fn size(&self) -> u32;

    /// Name of the underlying device
    fn name(&self) -> &'static str;
}

impl<C, SPI, CS, D> BlockDevice for AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = DeviceError<SPI, CS>;

    fn init(&mut self) -> Result<(), Self::Error> {
        AT25DF::init(self)
    }

    fn deinit(&mut self) -> Result<(), Self::Error> {
        AT25DF::deinit(self)
    }

    fn read(&mut self, addr: u32, buff: &mut [u8]) -> Result<(), Self::Error> {
        AT25DF::read(self, addr, buff)
    }

    fn program(&mut self, addr: u32, data: &[u8]) -> Result<(), Self::Error> {
        AT25DF::program(self, addr, data)
    }

    fn erase(&mut self, addr: u32, size: u32) -> Result<(), Self::Error> {
        AT25DF::erase(self, addr, size)
    }

    fn read_size(&self) -> u32 {
        1
    }

    fn program_size(&self) -> u32 {
        1
    }

    fn erase_size(&self) -> u32 {
        C::GEOMETRY.sector_size
    }

    fn erase_value(&self) -> Option<u8> {
        Some(C::GEOMETRY.erase_value)
    }

    fn size(&self) -> u32 {
        C::GEOMETRY.capacity
    }

    fn name(&self) -> &'static str {
        C::NAME
    }
}
