#![cfg_attr(not(test), no_std)]
//! This is a platform agnostic library for the Adesto AT25DF serial NOR flash using [embedded-hal](https://github.com/rust-embedded/embedded-hal).
//!
//! Supported chips:
//! * AT25DF041B, 4 Mbit
//!
//! The driver turns the chip's page programs and sector erases into a linear,
//! byte addressed storage. Requests are checked against the chip layout before
//! anything is sent, programs are split at page boundaries, every program and
//! erase is preceded by a write enable and followed by a bounded wait on the
//! busy bit, and the chip's identification is checked again at the start of
//! every read, program and erase.
//!
//! ```no_run
//! # fn run<SPI, CS, D>(spi: SPI, cs: CS, delay: D) -> Result<(), at25df::error::DeviceError<SPI, CS>>
//! # where SPI: embedded_hal::spi::SpiBus, CS: embedded_hal::digital::OutputPin, D: embedded_hal::delay::DelayNs {
//! use at25df::AT25DF041B;
//!
//! let mut flash = AT25DF041B::new(spi, cs, delay);
//! flash.init()?;
//!
//! flash.erase(0, 4096)?;
//! flash.program(234, &[0x42; 568])?;
//!
//! let mut buff = [0; 568];
//! flash.read(234, &mut buff)?;
//!
//! flash.deinit()?;
//! # Ok(())
//! # }
//! ```
//!
//! The driver also implements [`BlockDevice`] and the `embedded-storage` NOR flash traits.
//!
//! Enable the `chip-erase` feature to get `AT25DF::perform_chip_erase`. It is not
//! part of default builds.

pub mod address;
pub mod block_device;
pub mod chip;
mod command;
pub mod device;
mod erase;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod operation;
pub mod program;
mod protection;
pub mod register;
mod select;
mod storage;

pub use block_device::BlockDevice;
pub use chip::{At25df041b, Chip};
pub use device::{AT25DF, AT25DF041B};
pub use error::Error;
pub use geometry::Geometry;
pub use lifecycle::DeviceState;
#[cfg(feature = "chip-erase")]
pub use lifecycle::CHIP_ERASE_MAGIC;
pub use operation::{InvalidOperation, OperationKind};
