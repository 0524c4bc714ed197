//! Driver library for chains of MAX7219 LED display drivers wired as an 8x32 dot matrix, such as
//! the common four-module "FC-16" boards.
//!
//! The driver keeps an 8 row by 32 column framebuffer, can render proportional-width text into it
//! from a packed glyph table, and pushes it to the chain over SPI.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

// Log through defmt when the feature is on; otherwise swallow the arguments.
macro_rules! log_with {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($($arg)*);
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => { log_with!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { log_with!(debug, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { log_with!(warn, $($arg)*) };
}

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod glyph;
pub mod interface;

// Re-exports for primary API.
pub use crate::command::consts;
pub use crate::config::Config;
pub use crate::display::framebuffer::Framebuffer;
pub use crate::display::text::{ColumnOrder, FontVariant, Overflow};
pub use crate::display::Display;
pub use crate::error::Error;
pub use crate::glyph::{Glyph, GlyphTable};
pub use crate::interface::spi::SpiInterface;
pub use crate::interface::{BitOrder, DisplayInterface};
