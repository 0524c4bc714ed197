//! Static configuration of a display chain. Builder methods offer a declarative way to override the
//! defaults the driver brings the chain up with.

use crate::command::consts::INTENSITY_MAX;
use crate::display::text::{ColumnOrder, FontVariant, Overflow, TextCompositor};
use crate::glyph::GlyphTable;

/// Intensity written during bring-up unless overridden.
pub const DEFAULT_INTENSITY: u8 = 1;

/// A configuration for the display.
#[derive(Clone, Copy, Debug)]
pub struct Config<'g> {
    pub(crate) chain_len: u8,
    pub(crate) intensity: u8,
    pub(crate) font: FontVariant,
    overflow: Overflow,
    column_order: ColumnOrder,
    glyphs: GlyphTable<'g>,
}

impl<'g> Config<'g> {
    /// Create a new configuration for a chain of `chain_len` cascaded devices. The chain length is
    /// mandatory because every control register write has to be repeated once per device. All
    /// other options can be optionally set by calling the provided builder methods on `Config`.
    pub fn new(chain_len: u8) -> Self {
        Config {
            chain_len,
            intensity: DEFAULT_INTENSITY,
            font: FontVariant::Base,
            overflow: Overflow::Wrap,
            column_order: ColumnOrder::Forward,
            glyphs: GlyphTable::empty(),
        }
    }

    /// Extend this `Config` to bring the chain up at a different intensity. Range 0-15.
    pub fn intensity(self, level: u8) -> Self {
        Self {
            intensity: level,
            ..self
        }
    }

    /// Extend this `Config` to select the font text is first rendered in. See
    /// `Display::set_font` to change it later.
    pub fn font(self, font: FontVariant) -> Self {
        Self { font, ..self }
    }

    /// Extend this `Config` to choose what happens to text wider than the display.
    pub fn overflow(self, overflow: Overflow) -> Self {
        Self { overflow, ..self }
    }

    /// Extend this `Config` to mirror text horizontally to match how the modules are wired.
    pub fn column_order(self, column_order: ColumnOrder) -> Self {
        Self {
            column_order,
            ..self
        }
    }

    /// Extend this `Config` with the glyph table used to render text. Without one, every
    /// character fails to render with `Error::GlyphNotFound`.
    pub fn glyph_table(self, glyphs: GlyphTable<'g>) -> Self {
        Self { glyphs, ..self }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.chain_len > 0 && self.intensity <= INTENSITY_MAX
    }

    pub(crate) fn compositor(&self) -> TextCompositor<'g> {
        TextCompositor::new(self.glyphs, self.overflow, self.column_order)
    }
}
