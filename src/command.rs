/// AT25DF041B opcodes used by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Command {
    ReadArray = 0x03,
    ProgramPage = 0x02,
    BlockErase4K = 0x20,
    #[cfg(feature = "chip-erase")]
    ChipErase = 0xC7,

    WriteEnable = 0x06,
    WriteDisable = 0x04,

    ReadStatus = 0x05,
    WriteStatus = 0x01,

    ReadIdentification = 0x9F,
    UltraDeepPowerDown = 0x79,

    /// Filler clocked out while the chip drives the data line
    Dummy = 0xDB,
}
