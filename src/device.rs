use core::marker::PhantomData;

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    address::Address,
    chip::{At25df041b, Chip},
    command::Command,
    error::{DeviceError, Error},
    geometry::Geometry,
    lifecycle::DeviceState,
    operation::OperationKind,
    register::{Identification, StatusRegister},
    select::Selected,
};

/// Type alias for the AT25DF041B
pub type AT25DF041B<SPI, CS, D> = AT25DF<At25df041b, SPI, CS, D>;

/// The generic AT25DF driver.
///
/// Owns the chip select line and frames every command itself. The bus may be a
/// `&mut` to a bus shared with other devices, whoever hands it out must make
/// sure no other device uses it while a call on this driver is running.
///
/// Every call blocks until the chip reports the command as done. Calls take
/// `&mut self` so a single instance never has two commands in flight.
pub struct AT25DF<C, SPI, CS, D> {
    spi: SPI,
    cs: CS,
    pub(crate) delay: D,
    pub(crate) state: DeviceState,
    _chip: PhantomData<C>,
}

pub(crate) const fn addr_frame(cmd: Command, addr: Address) -> [u8; 4] {
    let [high, mid, low] = addr.to_bytes();
    [cmd as u8, high, mid, low]
}

impl<C, SPI, CS, D> AT25DF<C, SPI, CS, D>
where
    C: Chip,
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    // Addresses go out as 3 bytes and erases cover whole pages
    const LAYOUT: () = {
        assert!(C::GEOMETRY.capacity <= 1 << 24, "capacity does not fit 24 bit addresses");
        assert!(C::GEOMETRY.page_size > 0);
        assert!(C::GEOMETRY.sector_size % C::GEOMETRY.page_size == 0);
    };

    /// Create a new instance. Nothing is sent to the chip, see [`Self::init`]
    ///
    /// Fails to build for a [`Chip`] whose layout the command set cannot address.
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        let () = Self::LAYOUT;
        Self {
            spi,
            cs,
            delay,
            state: DeviceState::Unknown,
            _chip: PhantomData,
        }
    }

    /// Give back the bus, chip select and delay
    pub fn free(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }

    pub const fn geometry() -> Geometry {
        C::GEOMETRY
    }

    pub const fn capacity() -> usize {
        C::GEOMETRY.capacity as usize
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Run `f` with the chip selected. Chip select is released whatever `f` returns.
    pub(crate) fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut Selected<'_, SPI, CS>) -> Result<R, DeviceError<SPI, CS>>,
    ) -> Result<R, DeviceError<SPI, CS>> {
        let mut selected = Selected::assert(&mut self.spi, &mut self.cs)?;
        let res = f(&mut selected);
        let released = selected.release();
        let out = res?;
        released?;
        Ok(out)
    }

    /// Select the chip for `hold_ns` without clocking anything
    pub(crate) fn pulse_select(&mut self, hold_ns: u32) -> Result<(), DeviceError<SPI, CS>> {
        let selected = Selected::assert(&mut self.spi, &mut self.cs)?;
        self.delay.delay_ns(hold_ns);
        selected.release()
    }

    pub(crate) fn command_write(&mut self, bytes: &[u8]) -> Result<(), DeviceError<SPI, CS>> {
        self.transaction(|chip| chip.write(bytes))
    }

    pub(crate) fn command(&mut self, cmd: Command) -> Result<(), DeviceError<SPI, CS>> {
        self.command_write(&[cmd as u8])
    }

    fn command_transfer(&mut self, bytes: &mut [u8]) -> Result<(), DeviceError<SPI, CS>> {
        self.transaction(|chip| chip.transfer_in_place(bytes))
    }

    pub(crate) fn addr_command(
        &mut self,
        cmd: Command,
        addr: Address,
    ) -> Result<(), DeviceError<SPI, CS>> {
        self.command_write(&addr_frame(cmd, addr))
    }

    /// Read `buff.len()` bytes starting at `addr`. Reads may cross page and sector boundaries.
    pub fn read(&mut self, addr: u32, buff: &mut [u8]) -> Result<(), DeviceError<SPI, CS>> {
        C::GEOMETRY.check_len(addr, buff.len(), OperationKind::Read)?;
        self.check_identity()?;

        let frame = addr_frame(Command::ReadArray, Address(addr));
        let res = self.transaction(|chip| {
            chip.write(&frame)?;
            chip.read(buff)
        });
        #[cfg(feature = "defmt")]
        if res.is_ok() {
            defmt::trace!("Read from {=u32}, {=usize} bytes", addr, buff.len());
        } else {
            defmt::error!("Read from {=u32} failed", addr);
        }
        res
    }

    /// Read the status register
    pub fn read_status(&mut self) -> Result<StatusRegister, DeviceError<SPI, CS>> {
        let mut command = [Command::ReadStatus as u8, Command::Dummy as u8];
        self.command_transfer(&mut command)?;
        Ok(command[1].into())
    }

    /// Read the manufacturer and device id
    pub fn read_identification(&mut self) -> Result<Identification, DeviceError<SPI, CS>> {
        let dummy = Command::Dummy as u8;
        let mut command = [Command::ReadIdentification as u8, dummy, dummy, dummy];
        self.command_transfer(&mut command)?;
        Ok(Identification::from([command[1], command[2], command[3]]))
    }

    /// Poll the status register until the busy bit clears.
    ///
    /// Sleeps the chip's poll interval between reads and gives up with
    /// [`Error::Timeout`] once `timeout_us` has been spent sleeping.
    pub(crate) fn busy_wait(
        &mut self,
        timeout_us: u32,
    ) -> Result<StatusRegister, DeviceError<SPI, CS>> {
        let interval = C::TIMING.poll_interval_us.max(1);
        let mut waited: u32 = 0;
        loop {
            let status = self.read_status()?;
            if !status.busy {
                #[cfg(feature = "defmt")]
                if status.erase_program_error {
                    defmt::warn!("{=str} reports an erase or program error", C::NAME);
                }
                return Ok(status);
            }
            if waited >= timeout_us {
                #[cfg(feature = "defmt")]
                defmt::error!("{=str} still busy after {=u32}us", C::NAME, waited);
                return Err(Error::Timeout);
            }
            self.delay.delay_us(interval);
            waited = waited.saturating_add(interval);
        }
    }
}
