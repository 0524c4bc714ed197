//! The serial bus abstraction the driver talks through.
//!
//! A MAX7219 chain listens on a shared data/clock pair and latches whatever has been shifted into
//! it on the rising edge of its LOAD (chip-select) line. The driver therefore only needs three
//! things from the bus: open a frame, shift bytes, close the frame.

/// The order in which the bits of a byte are shifted onto the data line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Bit 7 is shifted out first. This is the order the chip expects for register addresses and
    /// for all control register data.
    MsbFirst,
    /// Bit 0 is shifted out first.
    LsbFirst,
}

/// A bus capable of framing bursts of byte transfers for a chain of MAX7219 devices.
///
/// Bit order is a parameter of each individual transfer rather than a mode of the bus, so an
/// implementation must not let one call's order leak into the next.
pub trait DisplayInterface {
    type Error;

    /// Open a framing window by asserting the chip-select (LOAD) line.
    fn begin_frame(&mut self) -> Result<(), Self::Error>;
    /// Close the framing window by deasserting the chip-select line, latching the shifted data
    /// into every device in the chain.
    fn end_frame(&mut self) -> Result<(), Self::Error>;
    /// Shift out a single byte in the requested bit order.
    fn transfer_byte(&mut self, value: u8, order: BitOrder) -> Result<(), Self::Error>;
}

pub mod spi {
    //! Adapter for a hardware SPI master plus a GPIO driving the LOAD line. The SPI peripheral
    //! must be configured for MODE 0 with MSB-first shifting; LSB-first transfers are produced by
    //! mirroring the byte before it is written.

    use super::{BitOrder, DisplayInterface};

    /// Errors raised by either half of the SPI interface.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum SpiInterfaceError<SE, PE> {
        /// The SPI master failed to write.
        Spi(SE),
        /// The chip-select pin could not be driven.
        ChipSelect(PE),
    }

    pub struct SpiInterface<SPI, CS> {
        /// The SPI master device connected to DIN and CLK of the first module in the chain.
        spi: SPI,
        /// A GPIO output pin connected to the LOAD/CS pin shared by the whole chain.
        cs: CS,
    }

    impl<SPI, CS> SpiInterface<SPI, CS>
    where
        SPI: hal::blocking::spi::Write<u8>,
        CS: hal::digital::v2::OutputPin,
    {
        /// Create a new SPI interface to communicate with the chain. `spi` is the SPI master
        /// device, and `cs` is the GPIO output pin connected to the LOAD pin.
        pub fn new(spi: SPI, cs: CS) -> Self {
            Self { spi, cs }
        }

        /// Give back the SPI master and the chip-select pin.
        pub fn release(self) -> (SPI, CS) {
            (self.spi, self.cs)
        }
    }

    impl<SPI, CS> DisplayInterface for SpiInterface<SPI, CS>
    where
        SPI: hal::blocking::spi::Write<u8>,
        CS: hal::digital::v2::OutputPin,
    {
        type Error = SpiInterfaceError<SPI::Error, CS::Error>;

        fn begin_frame(&mut self) -> Result<(), Self::Error> {
            self.cs.set_low().map_err(SpiInterfaceError::ChipSelect)
        }

        fn end_frame(&mut self) -> Result<(), Self::Error> {
            self.cs.set_high().map_err(SpiInterfaceError::ChipSelect)
        }

        fn transfer_byte(&mut self, value: u8, order: BitOrder) -> Result<(), Self::Error> {
            let wire = match order {
                BitOrder::MsbFirst => value,
                BitOrder::LsbFirst => value.reverse_bits(),
            };
            self.spi.write(&[wire]).map_err(SpiInterfaceError::Spi)
        }
    }

}
