//! Read-only access to a packed table of proportional-width glyphs.
//!
//! The table is a flat run of variable-length records, one per character code starting from code
//! 0, stored back to back:
//!
//! ```text
//! [len][col 0]..[col len-1] [len][col 0].. ...
//! ```
//!
//! Each column byte describes 8 vertically stacked LEDs, with bit 7 the top row and bit 0 the bottom
//! row. Since the records have no index, finding code `n` means walking over the `n` records before
//! it.

/// A borrowed glyph table.
#[derive(Clone, Copy, Debug)]
pub struct GlyphTable<'a> {
    data: &'a [u8],
}

impl<'a> GlyphTable<'a> {
    /// Wrap a packed glyph table.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// A table with no glyphs at all.
    pub const fn empty() -> Self {
        Self { data: &[] }
    }

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Find the byte offset of the length field of the record for `code`.
    ///
    /// Returns `None` if the walk runs off the end of the table before reaching `code`, or if the
    /// record for `code` is itself truncated.
    pub fn locate(&self, code: u32) -> Option<usize> {
        let mut offset = 0usize;
        for _ in 0..code {
            let len = *self.data.get(offset)? as usize;
            offset += len + 1;
        }
        let len = *self.data.get(offset)? as usize;
        if offset + 1 + len > self.data.len() {
            return None;
        }
        Some(offset)
    }

    /// Decode the glyph for `code`.
    pub fn glyph(&self, code: u32) -> Option<Glyph<'a>> {
        let offset = self.locate(code)?;
        let len = self.data[offset] as usize;
        Some(Glyph {
            columns: &self.data[offset + 1..offset + 1 + len],
        })
    }

    /// The number of complete records in the table, i.e. one past the highest code it can
    /// resolve.
    pub fn len(&self) -> usize {
        let mut offset = 0usize;
        let mut count = 0;
        while let Some(&len) = self.data.get(offset) {
            offset += len as usize + 1;
            if offset > self.data.len() {
                break;
            }
            count += 1;
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The bitmap of a single character: `width()` columns of 8 rows each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph<'a> {
    columns: &'a [u8],
}

impl<'a> Glyph<'a> {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The raw column bytes, left to right.
    pub fn columns(&self) -> &'a [u8] {
        self.columns
    }

    /// Whether the LED at `row` (0 = top) of `column` is lit.
    pub fn is_lit(&self, column: usize, row: usize) -> bool {
        assert!(row < 8, "glyph row out of range");
        self.columns[column] & (0x80 >> row) != 0
    }
}
