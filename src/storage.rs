//! Implementation of the `NorFlash` traits of the `embedded_storage` crate.
//! The device should be initialized with [`AT25DF::init`] before using them.
//!
//! Unlike [`AT25DF::erase`], erase ranges must start on a sector boundary here.

use core::fmt::Debug;

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use embedded_storage::nor_flash::{
    check_erase, check_read, check_write, ErrorType, MultiwriteNorFlash, NorFlash, NorFlashError,
    NorFlashErrorKind, ReadNorFlash,
};

use crate::{
    chip::Chip,
    device::AT25DF,
    error::{DeviceError, Error},
    operation::InvalidOperation,
};

impl<SpiError, PinError> From<NorFlashErrorKind> for Error<SpiError, PinError> {
    fn from(e: NorFlashErrorKind) -> Self {
        match e {
            NorFlashErrorKind::NotAligned => Error::Invalid(InvalidOperation::NotAligned),
            NorFlashErrorKind::OutOfBounds => Error::Invalid(InvalidOperation::OutOfBounds),
            _ => Error::Value,
        }
    }
}

impl<SpiError, PinError> NorFlashError for Error<SpiError, PinError>
where
    SpiError: Debug,
    PinError: Debug,
{
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            Error::Invalid(InvalidOperation::OutOfBounds) => NorFlashErrorKind::OutOfBounds,
            Error::Invalid(InvalidOperation::NotAligned) => NorFlashErrorKind::NotAligned,
            _ => NorFlashErrorKind::Other,
        }
    }
}

impl<C, SPI, CS, D> ErrorType for AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = DeviceError<SPI, CS>;
}

impl<C, SPI, CS, D> ReadNorFlash for AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        AT25DF::read(self, offset, bytes)
    }

    fn capacity(&self) -> usize {
        C::GEOMETRY.capacity as usize
    }
}

impl<C, SPI, CS, D> NorFlash for AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    const WRITE_SIZE: usize = 1;

    const ERASE_SIZE: usize = C::GEOMETRY.sector_size as usize;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to)?;
        if from == to {
            return Ok(());
        }
        AT25DF::erase(self, from, to - from)
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        AT25DF::program(self, offset, bytes)
    }
}

impl<C, SPI, CS, D> MultiwriteNorFlash for AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
}
