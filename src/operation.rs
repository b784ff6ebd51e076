use crate::geometry::Geometry;

/// What a request is going to do to the array
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Read,
    Program,
    Erase,
}

/// Reason a request was rejected before touching the bus
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOperation {
    /// Erase size is not a whole number of sectors
    NotAligned,

    /// Nothing to do
    ZeroSize,

    /// Range starts or ends past the end of the chip
    OutOfBounds,
}

impl Geometry {
    /// Check a request against the chip layout.
    ///
    /// Only the erase size is checked for alignment, start addresses are taken as is.
    pub const fn check_operation(
        &self,
        addr: u32,
        size: u32,
        kind: OperationKind,
    ) -> Result<(), InvalidOperation> {
        if let OperationKind::Erase = kind {
            if size % self.sector_size != 0 {
                return Err(InvalidOperation::NotAligned);
            }
        }
        if size == 0 {
            return Err(InvalidOperation::ZeroSize);
        }
        if addr >= self.capacity {
            return Err(InvalidOperation::OutOfBounds);
        }
        match addr.checked_add(size) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(InvalidOperation::OutOfBounds),
        }
    }

    pub const fn is_valid_operation(&self, addr: u32, size: u32, kind: OperationKind) -> bool {
        self.check_operation(addr, size, kind).is_ok()
    }

    /// Same as [`Self::check_operation`] for a buffer length
    pub fn check_len(
        &self,
        addr: u32,
        len: usize,
        kind: OperationKind,
    ) -> Result<u32, InvalidOperation> {
        let size = u32::try_from(len).map_err(|_| InvalidOperation::OutOfBounds)?;
        self.check_operation(addr, size, kind)?;
        Ok(size)
    }
}
