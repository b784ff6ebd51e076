/// An address on the memory chip
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address(pub u32);

impl Address {
    /// The 24-bit frame sent after an opcode, most significant byte first.
    /// Bits above 23 are dropped.
    pub const fn to_bytes(self) -> [u8; 3] {
        let [_, high, mid, low] = self.0.to_be_bytes();
        [high, mid, low]
    }
}

/// Encode a linear offset into the chip's 3 byte address frame
pub const fn encode(addr: u32) -> [u8; 3] {
    Address(addr).to_bytes()
}

impl From<u32> for Address {
    fn from(addr: u32) -> Address {
        Address(addr)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> u32 {
        addr.0
    }
}
