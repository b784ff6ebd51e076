use crate::operation::InvalidOperation;

/// All possible errors emitted by the driver
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiError, PinError> {
    /// Internal Spi error
    Spi(SpiError),

    /// The chip select line could not be driven
    Pin(PinError),

    /// Request rejected before any bus activity
    Invalid(InvalidOperation),

    /// The chip did not answer with the expected identification
    DeviceNotFound,

    /// Sectors were still protected after the global unprotect
    ProtectionVerification,

    /// The chip stayed busy longer than the operation allows
    Timeout,

    /// Invalid value passed
    Value,
}

impl<SpiError, PinError> Error<SpiError, PinError> {
    /// Whether the request itself was malformed, as opposed to a device or bus failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Invalid(_))
    }
}

impl<SpiError, PinError> From<InvalidOperation> for Error<SpiError, PinError> {
    fn from(e: InvalidOperation) -> Self {
        Error::Invalid(e)
    }
}

/// The [`Error`] produced by a driver over the bus `SPI` and chip select `CS`
pub type DeviceError<SPI, CS> = Error<
    <SPI as embedded_hal::spi::ErrorType>::Error,
    <CS as embedded_hal::digital::ErrorType>::Error,
>;
