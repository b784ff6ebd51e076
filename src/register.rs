use bit::BitIndex;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerId(pub u8);

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub u8, pub u8);

/// Answer to the read manufacturer and device id command
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identification {
    pub manufacturer: ManufacturerId,
    pub device: DeviceId,
}

impl Identification {
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.manufacturer.0, self.device.0, self.device.1]
    }
}

impl From<[u8; 3]> for Identification {
    fn from(id: [u8; 3]) -> Identification {
        Identification {
            manufacturer: ManufacturerId(id[0]),
            device: DeviceId(id[1], id[2]),
        }
    }
}

/// State of the software sector protection, status register bits 2 and 3
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftwareProtection {
    /// Every sector is unprotected
    None,
    /// Some sectors are protected
    Partial,
    /// Every sector is protected, the power up default
    All,
}

impl From<u8> for SoftwareProtection {
    fn from(val: u8) -> Self {
        match val & 0b11 {
            0b00 => SoftwareProtection::None,
            0b11 => SoftwareProtection::All,
            _ => SoftwareProtection::Partial,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister {
    pub sector_protection_locked: bool,
    pub erase_program_error: bool,
    /// Level of the WP pin, `true` when it is not asserted
    pub write_protect_pin: bool,
    pub software_protection: SoftwareProtection,
    pub write_enable_latch: bool,
    pub busy: bool,
}

impl From<u8> for StatusRegister {
    fn from(val: u8) -> StatusRegister {
        StatusRegister {
            sector_protection_locked: val.bit(7),
            erase_program_error: val.bit(5),
            write_protect_pin: val.bit(4),
            software_protection: val.bit_range(2..4).into(),
            write_enable_latch: val.bit(1),
            busy: val.bit(0),
        }
    }
}
