use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    address::Address,
    chip::Chip,
    command::Command,
    device::{addr_frame, AT25DF},
    error::DeviceError,
    geometry::Geometry,
    operation::OperationKind,
};

/// A piece of a program request that stays within one page
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: u32,
    pub len: u32,
}

/// Splits `[addr, addr + size)` at every page boundary it crosses.
///
/// The range is clamped at the end of the 32-bit address space, validate it
/// against the chip first.
#[derive(Debug, Clone)]
pub struct PageChunks {
    geometry: Geometry,
    cursor: u32,
    end: u32,
    remaining: u32,
}

impl PageChunks {
    pub fn new(geometry: Geometry, addr: u32, size: u32) -> Self {
        let remaining = if size == 0 {
            0
        } else {
            geometry.boundary_crossings(addr, size) + 1
        };
        Self {
            geometry,
            cursor: addr,
            end: addr.saturating_add(size),
            remaining,
        }
    }
}

impl Iterator for PageChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // the last chunk stops at the end of the request, the others at the next page
        let len = if self.remaining == 0 {
            self.end - self.cursor
        } else {
            self.geometry.round_up_to_page_boundary(self.cursor) - self.cursor
        };
        let chunk = Chunk {
            start: self.cursor,
            len,
        };
        self.cursor += len;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PageChunks {}

impl<C, SPI, CS, D> AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Program `data` starting at `addr`, one transaction per page touched.
    ///
    /// The region must have been erased first, programming can only clear bits.
    /// If a page fails the remaining ones are not written, and there is no way
    /// to tell how many made it.
    pub fn program(&mut self, addr: u32, data: &[u8]) -> Result<(), DeviceError<SPI, CS>> {
        let size = C::GEOMETRY.check_len(addr, data.len(), OperationKind::Program)?;
        self.check_identity()?;

        let mut rest = data;
        for chunk in PageChunks::new(C::GEOMETRY, addr, size) {
            let (now, later) = rest.split_at(chunk.len as usize);
            self.program_page(chunk.start, now)?;
            rest = later;
        }
        Ok(())
    }

    fn program_page(&mut self, addr: u32, bytes: &[u8]) -> Result<(), DeviceError<SPI, CS>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Program {=u32}, {=usize} bytes", addr, bytes.len());

        self.disable_protection()?;
        let frame = addr_frame(Command::ProgramPage, Address(addr));
        self.transaction(|chip| {
            chip.write(&frame)?;
            chip.write(bytes)
        })?;
        self.busy_wait(C::TIMING.page_program_timeout_us)?;
        Ok(())
    }
}
