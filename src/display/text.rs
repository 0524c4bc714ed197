//! Rasterizing text into a `Framebuffer` using a proportional glyph table.

use itertools::iproduct;

use crate::display::framebuffer::{Framebuffer, COLS, ROWS};
use crate::error::Error;
use crate::glyph::GlyphTable;

/// Which of the two fonts packed into a glyph table is used. The alternate font starts 100 codes
/// after the base font, so character `c` resolves to code `c` or `c + 100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontVariant {
    Base,
    Alternate,
}

impl FontVariant {
    /// The code offset of this font within the glyph table.
    pub fn offset(self) -> u32 {
        match self {
            FontVariant::Base => 0,
            FontVariant::Alternate => 100,
        }
    }
}

impl Default for FontVariant {
    fn default() -> Self {
        FontVariant::Base
    }
}

/// What happens to columns that fall past the right edge of the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overflow {
    /// Column `c` lands on column `c % 32`, overwriting whatever was drawn there earlier in the
    /// same string, lit and dark columns alike.
    Wrap,
    /// Columns past the edge are dropped.
    Clip,
    /// Text wider than the framebuffer is rejected with `Error::TextTooWide`.
    Error,
}

impl Default for Overflow {
    fn default() -> Self {
        Overflow::Wrap
    }
}

/// How a text column maps onto a framebuffer bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColumnOrder {
    /// Text column `c` is framebuffer column `c`.
    Forward,
    /// Text column `c` is framebuffer column `31 - c`. Use this for modules wired so that the
    /// device furthest down the chain is on the left.
    Reversed,
}

impl Default for ColumnOrder {
    fn default() -> Self {
        ColumnOrder::Forward
    }
}

/// Lays text out left to right, one glyph after another with a single blank column between
/// glyphs.
#[derive(Clone, Copy, Debug)]
pub struct TextCompositor<'g> {
    glyphs: GlyphTable<'g>,
    overflow: Overflow,
    column_order: ColumnOrder,
}

impl<'g> TextCompositor<'g> {
    pub fn new(glyphs: GlyphTable<'g>, overflow: Overflow, column_order: ColumnOrder) -> Self {
        Self {
            glyphs,
            overflow,
            column_order,
        }
    }

    pub fn glyphs(&self) -> GlyphTable<'g> {
        self.glyphs
    }

    /// Render `text` in `font` into `fb`, replacing its previous contents. Returns the number of
    /// columns the cursor advanced, spacing columns included.
    ///
    /// On error `fb` is left exactly as it was.
    pub fn render<E>(
        &self,
        text: &str,
        font: FontVariant,
        fb: &mut Framebuffer,
    ) -> Result<usize, Error<E>> {
        let mut scratch = Framebuffer::new();
        let mut cursor = 0;

        for ch in text.chars() {
            let glyph = self
                .glyphs
                .glyph(ch as u32 + font.offset())
                .ok_or(Error::GlyphNotFound(ch))?;
            if self.overflow == Overflow::Error && cursor + glyph.width() > COLS {
                return Err(Error::TextTooWide);
            }
            for (col, row) in iproduct!(0..glyph.width(), 0..ROWS) {
                self.plot(&mut scratch, row, cursor + col, glyph.is_lit(col, row));
            }
            cursor += glyph.width() + 1;
        }

        *fb = scratch;
        Ok(cursor)
    }

    fn plot(&self, fb: &mut Framebuffer, row: usize, cursor: usize, on: bool) {
        let col = match self.overflow {
            Overflow::Wrap => cursor % COLS,
            Overflow::Clip | Overflow::Error if cursor < COLS => cursor,
            Overflow::Clip | Overflow::Error => return,
        };
        let col = match self.column_order {
            ColumnOrder::Forward => col,
            ColumnOrder::Reversed => COLS - 1 - col,
        };
        fb.set(row, col, on);
    }
}
