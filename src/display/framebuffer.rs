//! An 8 row by 32 column monochrome framebuffer, the image a chain of up to four 8x8 modules
//! shows.

/// Number of rows, one per digit register of the chip.
pub const ROWS: usize = 8;
/// Number of columns. Always 32 regardless of how many devices are chained.
pub const COLS: usize = 32;

/// A bit matrix with one `u32` word per row. Bit `c` of row `r` is the LED at column `c` of row
/// `r`, with column 0 in the least significant bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Framebuffer {
    rows: [u32; ROWS],
}

impl Framebuffer {
    /// An all-dark framebuffer.
    pub const fn new() -> Self {
        Self { rows: [0; ROWS] }
    }

    /// Build a framebuffer directly from its row words.
    pub const fn from_rows(rows: [u32; ROWS]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u32; ROWS] {
        &self.rows
    }

    /// The word of `row`.
    ///
    /// Panics if `row` is not below `ROWS`.
    pub fn row(&self, row: usize) -> u32 {
        assert!(row < ROWS, "framebuffer row out of range");
        self.rows[row]
    }

    /// Turn every LED off.
    pub fn clear(&mut self) {
        self.rows = [0; ROWS];
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|r| *r == 0)
    }

    /// Set or clear the LED at (`row`, `col`).
    ///
    /// Panics if `row` is not below `ROWS` or `col` is not below `COLS`.
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        assert!(row < ROWS && col < COLS, "framebuffer index out of range");
        if on {
            self.rows[row] |= 1 << col;
        } else {
            self.rows[row] &= !(1 << col);
        }
    }

    /// Like `set`, but a column past the right edge wraps around to the left edge, so that column
    /// `c` addresses bit `c % COLS`. This is how text that overflows the display overwrites its own
    /// beginning.
    pub fn set_wrapping(&mut self, row: usize, col: usize, on: bool) {
        self.set(row, col % COLS, on)
    }

    /// Whether the LED at (`row`, `col`) is lit.
    ///
    /// Panics if `row` is not below `ROWS` or `col` is not below `COLS`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < ROWS && col < COLS, "framebuffer index out of range");
        self.rows[row] & (1 << col) != 0
    }

    /// The four bytes of a row as they are handed to the chain: byte `j` holds columns `8j` to
    /// `8j + 7`, lowest column in bit 0.
    ///
    /// Panics if `row` is not below `ROWS`.
    pub fn row_slices(&self, row: usize) -> [u8; 4] {
        self.row(row).to_le_bytes()
    }
}
