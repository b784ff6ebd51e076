//! A simulated AT25DF041B behind the `embedded-hal` traits.
//!
//! The bus, chip select and delay handed to the driver share one [`SimChip`],
//! tests keep a [`Sim`] handle to inspect and tamper with it.
#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use at25df::{Error, AT25DF041B};
use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
    spi::{self, SpiBus},
};

pub const CAPACITY: usize = 524_288;
pub const PAGE: usize = 256;
pub const SECTOR: usize = 4096;
pub const JEDEC_ID: [u8; 3] = [0x1F, 0x44, 0x02];

pub const READ_ARRAY: u8 = 0x03;
pub const PROGRAM_PAGE: u8 = 0x02;
pub const BLOCK_ERASE_4K: u8 = 0x20;
pub const CHIP_ERASE: u8 = 0xC7;
pub const WRITE_ENABLE: u8 = 0x06;
pub const WRITE_DISABLE: u8 = 0x04;
pub const READ_STATUS: u8 = 0x05;
pub const WRITE_STATUS: u8 = 0x01;
pub const READ_ID: u8 = 0x9F;
pub const ULTRA_DEEP_POWER_DOWN: u8 = 0x79;
pub const DUMMY: u8 = 0xDB;

/// Opcodes that change the array or the protection
pub const MUTATING: [u8; 5] = [
    WRITE_ENABLE,
    PROGRAM_PAGE,
    BLOCK_ERASE_4K,
    WRITE_STATUS,
    CHIP_ERASE,
];

pub type Flash = AT25DF041B<SimBus, SimCs, SimDelay>;
pub type FlashError = Error<BusFault, PinFault>;

/// Injected bus failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl spi::Error for BusFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// Injected chip select failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct SimChip {
    pub memory: Vec<u8>,
    pub id: [u8; 3],
    pub write_enable_latch: bool,
    /// Software protection bits, all sectors protected after power up
    pub protection: u8,
    /// Status writes are ignored, as with the WP pin asserted
    pub protection_locked: bool,
    /// Status reads each command stays busy for
    pub busy_cycles: u32,
    pub busy_remaining: u32,
    /// Never leaves busy
    pub stuck_busy: bool,
    pub deep_power_down: bool,

    /// The bus fails once after clocking this many more bytes
    pub fail_after_bytes: Option<usize>,
    /// The next chip select release is reported as failed, the line still goes high
    pub fail_release: bool,

    pub selected: bool,
    waking: bool,
    frame: Vec<u8>,

    /// Every completed frame, as clocked in by the driver
    pub frames: Vec<Vec<u8>>,
    pub wake_pulses: usize,
    /// Bytes clocked while chip select was high
    pub unselected_bytes: usize,
    pub delayed_ns: u64,
}

impl SimChip {
    pub fn new() -> Self {
        Self {
            memory: vec![0xFF; CAPACITY],
            id: JEDEC_ID,
            write_enable_latch: false,
            protection: 0b11,
            protection_locked: false,
            busy_cycles: 2,
            busy_remaining: 0,
            stuck_busy: false,
            deep_power_down: false,
            fail_after_bytes: None,
            fail_release: false,
            selected: false,
            waking: false,
            frame: Vec::new(),
            frames: Vec::new(),
            wake_pulses: 0,
            unselected_bytes: 0,
            delayed_ns: 0,
        }
    }

    /// A chip that was left in ultra deep power down
    pub fn asleep() -> Self {
        Self {
            deep_power_down: true,
            ..Self::new()
        }
    }

    fn busy(&self) -> bool {
        self.stuck_busy || self.busy_remaining > 0
    }

    pub fn status(&self) -> u8 {
        let mut status = 0b0001_0000;
        if self.busy() {
            status |= 0b01;
        }
        if self.write_enable_latch {
            status |= 0b10;
        }
        status | (self.protection & 0b11) << 2
    }

    fn select(&mut self) {
        assert!(!self.selected, "chip select asserted twice");
        self.selected = true;
        self.frame.clear();
        // the falling edge wakes the chip, the rest of the frame is ignored
        self.waking = self.deep_power_down;
        self.deep_power_down = false;
    }

    fn deselect(&mut self) {
        if !self.selected {
            return;
        }
        self.selected = false;
        if self.waking {
            self.waking = false;
            self.wake_pulses += 1;
            return;
        }
        let frame = std::mem::take(&mut self.frame);
        self.execute(&frame);
        self.frames.push(frame);
    }

    fn clock(&mut self) -> Result<(), BusFault> {
        match self.fail_after_bytes {
            Some(0) => {
                self.fail_after_bytes = None;
                Err(BusFault)
            }
            Some(n) => {
                self.fail_after_bytes = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn exchange(&mut self, mosi: u8) -> u8 {
        if !self.selected {
            self.unselected_bytes += 1;
            return 0xFF;
        }
        if self.waking {
            return 0x00;
        }
        self.frame.push(mosi);
        let pos = self.frame.len() - 1;
        if pos == 0 {
            return 0x00;
        }
        match self.frame[0] {
            READ_STATUS => {
                let status = self.status();
                self.busy_remaining = self.busy_remaining.saturating_sub(1);
                status
            }
            READ_ID if pos <= 3 => self.id[pos - 1],
            READ_ARRAY if pos >= 4 => {
                let addr = address(&self.frame[1..4]);
                self.memory[(addr + pos - 4) % CAPACITY]
            }
            _ => 0x00,
        }
    }

    fn execute(&mut self, frame: &[u8]) {
        let Some(&opcode) = frame.first() else {
            return;
        };
        if self.busy() {
            return;
        }
        let writable = self.write_enable_latch && self.protection == 0;
        match opcode {
            WRITE_ENABLE => self.write_enable_latch = true,
            WRITE_DISABLE => self.write_enable_latch = false,
            PROGRAM_PAGE if self.write_enable_latch && frame.len() > 4 => {
                if writable {
                    let addr = address(&frame[1..4]);
                    let page = addr & !(PAGE - 1);
                    for (i, byte) in frame[4..].iter().enumerate() {
                        // past the end of the page the chip wraps to its start
                        let offset = (addr + i) % PAGE;
                        self.memory[page + offset] &= byte;
                    }
                }
                self.complete();
            }
            BLOCK_ERASE_4K if self.write_enable_latch && frame.len() == 4 => {
                if writable {
                    let sector = address(&frame[1..4]) & !(SECTOR - 1);
                    self.memory[sector..sector + SECTOR].fill(0xFF);
                }
                self.complete();
            }
            CHIP_ERASE if self.write_enable_latch && frame.len() == 1 => {
                if writable {
                    self.memory.fill(0xFF);
                }
                self.complete();
            }
            WRITE_STATUS if self.write_enable_latch && frame.len() == 2 => {
                if !self.protection_locked {
                    self.protection = (frame[1] >> 2) & 0b11;
                }
                self.complete();
            }
            ULTRA_DEEP_POWER_DOWN if frame.len() == 1 => self.deep_power_down = true,
            _ => {}
        }
    }

    fn complete(&mut self) {
        self.write_enable_latch = false;
        self.busy_remaining = self.busy_cycles;
    }
}

fn address(bytes: &[u8]) -> usize {
    (bytes[0] as usize) << 16 | (bytes[1] as usize) << 8 | bytes[2] as usize
}

#[derive(Clone)]
pub struct Sim(Rc<RefCell<SimChip>>);

impl Sim {
    pub fn chip(&self) -> std::cell::RefMut<'_, SimChip> {
        self.0.borrow_mut()
    }

    /// Forget the frames recorded so far
    pub fn clear_frames(&self) {
        self.chip().frames.clear();
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.chip().frames.clone()
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.chip().frames.iter().filter_map(|f| f.first().copied()).collect()
    }

    /// Frames carrying `opcode`, as `(address, payload length)`
    pub fn addressed(&self, opcode: u8) -> Vec<(usize, usize)> {
        self.chip()
            .frames
            .iter()
            .filter(|f| f.first() == Some(&opcode))
            .map(|f| (address(&f[1..4]), f.len() - 4))
            .collect()
    }

    pub fn fill(&self, addr: usize, bytes: &[u8]) {
        self.chip().memory[addr..addr + bytes.len()].copy_from_slice(bytes);
    }
}

pub struct SimBus(Rc<RefCell<SimChip>>);
pub struct SimCs(Rc<RefCell<SimChip>>);
pub struct SimDelay(Rc<RefCell<SimChip>>);

impl spi::ErrorType for SimBus {
    type Error = BusFault;
}

impl SpiBus for SimBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        for word in words.iter_mut() {
            chip.clock()?;
            *word = chip.exchange(0x00);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        for word in words {
            chip.clock()?;
            chip.exchange(*word);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        for i in 0..read.len().max(write.len()) {
            chip.clock()?;
            let miso = chip.exchange(write.get(i).copied().unwrap_or(0x00));
            if let Some(word) = read.get_mut(i) {
                *word = miso;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        for word in words.iter_mut() {
            chip.clock()?;
            *word = chip.exchange(*word);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl digital::ErrorType for SimCs {
    type Error = PinFault;
}

impl OutputPin for SimCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().select();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        chip.deselect();
        if chip.fail_release {
            chip.fail_release = false;
            return Err(PinFault);
        }
        Ok(())
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().delayed_ns += u64::from(ns);
    }
}

/// A driver wired to `chip`
pub fn connect(chip: SimChip) -> (Flash, Sim) {
    let shared = Rc::new(RefCell::new(chip));
    let flash = Flash::new(
        SimBus(shared.clone()),
        SimCs(shared.clone()),
        SimDelay(shared.clone()),
    );
    (flash, Sim(shared))
}

/// A driver wired to a fresh chip, already initialized, with no frames recorded
pub fn ready() -> (Flash, Sim) {
    let (mut flash, sim) = connect(SimChip::new());
    flash.init().unwrap();
    sim.clear_frames();
    (flash, sim)
}

/// Deterministic, non-erased looking test data
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8 ^ 0x5A).collect()
}
