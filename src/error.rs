//! Errors reported by the driver.

/// Everything that can go wrong when configuring the chain or drawing to it. `E` is the error type
/// of the underlying `DisplayInterface`.
///
/// The chain itself never answers, so the only bus failures that can be seen are the ones raised
/// locally by the interface. The remaining variants are detected before anything is put on the
/// bus, and leave both the hardware and the framebuffer untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The interface failed while shifting data out.
    Interface(E),
    /// The driver was constructed with a configuration the chain cannot run with, such as a chain
    /// length of zero or an intensity above 15.
    InvalidConfiguration,
    /// A register argument is outside the range the chip accepts.
    InvalidArgument,
    /// The glyph table has no entry for this character in the selected font.
    GlyphNotFound(char),
    /// The text does not fit in the 32 columns of the framebuffer and the overflow policy forbids
    /// wrapping or clipping it.
    TextTooWide,
}
