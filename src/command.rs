//! The register set of the MAX7219.
//!
//! Every write to a MAX7219 is a 16-bit word: an address byte followed by a data byte, both shifted
//! in MSB first. Devices in a chain pass bits through to the next one, so sending the same word N
//! times inside one framing window writes that register on all N devices when LOAD rises.

use crate::error::Error;
use crate::interface::{BitOrder, DisplayInterface};

pub mod consts {
    //! Register addresses.

    pub const NO_OP: u8 = 0x00;
    /// Row 0 of the matrix. Rows 1-7 follow at consecutive addresses.
    pub const DIGIT_0: u8 = 0x01;
    pub const DIGIT_7: u8 = 0x08;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;

    pub const INTENSITY_MAX: u8 = 15;
    pub const SCAN_LIMIT_MAX: u8 = 7;
}

use self::consts::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Shift a word through the chain without touching any register.
    NoOp,
    /// Select BCD code-B decoding per digit. Each set bit enables decoding for that digit; a matrix
    /// needs raw segment mode, i.e. 0.
    SetDecodeMode(u8),
    /// Set the LED drive duty cycle. Range 0 (1/32) to 15 (31/32).
    SetIntensity(u8),
    /// Set how many rows (digits) are scanned, minus one. Range 0-7; a matrix needs 7.
    SetScanLimit(u8),
    /// Enter (`true`) or leave (`false`) shutdown mode. Register contents are kept while shut
    /// down.
    SetShutdown(bool),
    /// Enable or disable display test mode, which lights every LED regardless of the digit
    /// registers.
    SetDisplayTest(bool),
}

impl Command {
    /// The (address, data) word this command writes.
    pub fn encode<E>(self) -> Result<(u8, u8), Error<E>> {
        match self {
            Command::NoOp => Ok((NO_OP, 0x00)),
            Command::SetDecodeMode(mask) => Ok((DECODE_MODE, mask)),
            Command::SetIntensity(level) => match level {
                0..=INTENSITY_MAX => Ok((INTENSITY, level)),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetScanLimit(limit) => match limit {
                0..=SCAN_LIMIT_MAX => Ok((SCAN_LIMIT, limit)),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetShutdown(ena) => Ok((SHUTDOWN, if ena { 0x00 } else { 0x01 })),
            Command::SetDisplayTest(ena) => Ok((DISPLAY_TEST, if ena { 0x01 } else { 0x00 })),
        }
    }

    /// Write this command to every device of a chain of `chain_len` devices.
    pub fn send<DI>(self, iface: &mut DI, chain_len: u8) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (addr, data) = self.encode::<DI::Error>()?;
        broadcast(iface, chain_len, addr, data)
    }
}

/// Send the raw word `(addr, data)` once per device inside a single framing window, so that every
/// device in the chain latches it. Nothing is validated.
pub fn broadcast<DI>(
    iface: &mut DI,
    chain_len: u8,
    addr: u8,
    data: u8,
) -> Result<(), Error<DI::Error>>
where
    DI: DisplayInterface,
{
    trace!("broadcast {=u8:#x} {=u8:#x} x{=u8}", addr, data, chain_len);
    iface.begin_frame().map_err(Error::Interface)?;
    for _ in 0..chain_len {
        iface
            .transfer_byte(addr, BitOrder::MsbFirst)
            .map_err(Error::Interface)?;
        iface
            .transfer_byte(data, BitOrder::MsbFirst)
            .map_err(Error::Interface)?;
    }
    iface.end_frame().map_err(Error::Interface)
}
