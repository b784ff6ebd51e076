use crate::geometry::Geometry;

/// Delays and busy-wait bounds of a chip model, in the unit named by each field
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Chip select low time that brings the chip out of ultra deep power down
    pub wake_pulse_ns: u32,
    /// Time after the wake pulse before the chip accepts commands
    pub wake_settle_us: u32,
    /// Sleep between two status reads while busy
    pub poll_interval_us: u32,
    pub page_program_timeout_us: u32,
    pub sector_erase_timeout_us: u32,
    pub status_write_timeout_us: u32,
    pub chip_erase_timeout_us: u32,
}

/// A supported chip model.
///
/// Commands carry 3 address bytes, so the driver only accepts chips of at most
/// 16 MiB whose sector size is a whole number of pages:
///
/// ```
/// # use core::convert::Infallible;
/// # use at25df::{chip::Timing, At25df041b, Chip, Geometry, AT25DF};
/// # use embedded_hal::{delay::DelayNs, digital, spi};
/// # struct Bus;
/// # struct Pin;
/// # struct Delay;
/// # impl spi::ErrorType for Bus { type Error = Infallible; }
/// # impl spi::SpiBus for Bus {
/// #     fn read(&mut self, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn write(&mut self, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn transfer(&mut self, _: &mut [u8], _: &[u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn transfer_in_place(&mut self, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn flush(&mut self) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # impl digital::ErrorType for Pin { type Error = Infallible; }
/// # impl digital::OutputPin for Pin {
/// #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # impl DelayNs for Delay { fn delay_ns(&mut self, _: u32) {} }
/// struct Sixteen;
///
/// impl Chip for Sixteen {
///     const NAME: &'static str = "Sixteen";
///     const GEOMETRY: Geometry = Geometry {
///         capacity: 1 << 24,
///         page_size: 256,
///         sector_size: 4096,
///         erase_value: 0xFF,
///     };
///     const JEDEC_ID: [u8; 3] = [0x1F, 0x48, 0x00];
///     const TIMING: Timing = At25df041b::TIMING;
/// }
///
/// let _flash = AT25DF::<Sixteen, _, _, _>::new(Bus, Pin, Delay);
/// ```
///
/// Anything larger is rejected when the driver is built:
///
/// ```compile_fail
/// # use core::convert::Infallible;
/// # use at25df::{chip::Timing, At25df041b, Chip, Geometry, AT25DF};
/// # use embedded_hal::{delay::DelayNs, digital, spi};
/// # struct Bus;
/// # struct Pin;
/// # struct Delay;
/// # impl spi::ErrorType for Bus { type Error = Infallible; }
/// # impl spi::SpiBus for Bus {
/// #     fn read(&mut self, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn write(&mut self, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn transfer(&mut self, _: &mut [u8], _: &[u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn transfer_in_place(&mut self, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn flush(&mut self) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # impl digital::ErrorType for Pin { type Error = Infallible; }
/// # impl digital::OutputPin for Pin {
/// #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # impl DelayNs for Delay { fn delay_ns(&mut self, _: u32) {} }
/// struct ThirtyTwo;
///
/// impl Chip for ThirtyTwo {
///     const NAME: &'static str = "ThirtyTwo";
///     const GEOMETRY: Geometry = Geometry {
///         capacity: 1 << 25,
///         page_size: 256,
///         sector_size: 4096,
///         erase_value: 0xFF,
///     };
///     const JEDEC_ID: [u8; 3] = [0x1F, 0x48, 0x00];
///     const TIMING: Timing = At25df041b::TIMING;
/// }
///
/// let _flash = AT25DF::<ThirtyTwo, _, _, _>::new(Bus, Pin, Delay);
/// ```
pub trait Chip {
    /// Part number
    const NAME: &'static str;
    const GEOMETRY: Geometry;
    /// Manufacturer id followed by the two device id bytes
    const JEDEC_ID: [u8; 3];
    const TIMING: Timing;
}

/// The Adesto AT25DF041B, 4 Mbit
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy)]
pub struct At25df041b;

impl Chip for At25df041b {
    const NAME: &'static str = "AT25DF041B";

    const GEOMETRY: Geometry = Geometry {
        capacity: 2048 * 256,
        page_size: 256,
        sector_size: 4096,
        erase_value: 0xFF,
    };

    const JEDEC_ID: [u8; 3] = [0x1F, 0x44, 0x02];

    // Datasheet maxima are 20ns / 70us to leave ultra deep power down,
    // 3ms page program, 200ms 4kB erase, 20ms status write, 7s chip erase.
    const TIMING: Timing = Timing {
        wake_pulse_ns: 100,
        wake_settle_us: 100,
        poll_interval_us: 10,
        page_program_timeout_us: 10_000,
        sector_erase_timeout_us: 500_000,
        status_write_timeout_us: 50_000,
        chip_erase_timeout_us: 15_000_000,
    };
}
