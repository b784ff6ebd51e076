/// Fixed layout of a chip model
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Total size in bytes
    pub capacity: u32,
    /// Largest span a single program transaction may cover, programs cannot cross it
    pub page_size: u32,
    /// Smallest erasable unit
    pub sector_size: u32,
    /// Value every byte reads back as after an erase
    pub erase_value: u8,
}

impl Geometry {
    /// Number of pages on the chip
    pub const fn page_count(&self) -> u32 {
        self.capacity / self.page_size
    }

    /// Number of sectors on the chip
    pub const fn sector_count(&self) -> u32 {
        self.capacity / self.sector_size
    }

    /// Page index containing `addr`
    pub const fn page_of(&self, addr: u32) -> u32 {
        addr / self.page_size
    }

    /// How many page boundaries `[addr, addr + size)` crosses.
    ///
    /// Ending exactly on a boundary is not a crossing, an empty range crosses
    /// nothing. The range is clamped at the end of the 32-bit address space.
    pub const fn boundary_crossings(&self, addr: u32, size: u32) -> u32 {
        let last = addr.saturating_add(size.saturating_sub(1));
        self.page_of(last) - self.page_of(addr)
    }

    /// Start of the page after the one containing `addr`.
    ///
    /// An address already on a boundary rounds to the next boundary, not to itself.
    pub const fn round_up_to_page_boundary(&self, addr: u32) -> u32 {
        (self.page_of(addr) + 1) * self.page_size
    }
}
