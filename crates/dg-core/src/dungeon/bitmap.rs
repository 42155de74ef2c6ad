//! Fixed-size bit matrix over the dungeon grid
//!
//! One bit per cell, addressed with 1-based `row`/`col`. Bounds are checked
//! by the caller; an out-of-range access is a programming error.

use super::point::Point;
use super::region::Region;

const WORD_BITS: usize = u64::BITS as usize;

/// A `rows` x `cols` bit matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    rows: u8,
    cols: u8,
    words: Vec<u64>,
}

impl Bitmap {
    /// Create a bitmap with every bit unset
    pub fn new(rows: u8, cols: u8) -> Self {
        let cells = usize::from(rows) * usize::from(cols);
        Self {
            rows,
            cols,
            words: vec![0; cells.div_ceil(WORD_BITS)],
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    fn index(&self, row: u8, col: u8) -> (usize, u64) {
        debug_assert!(
            row >= 1 && row <= self.rows && col >= 1 && col <= self.cols,
            "({row}, {col}) outside {}x{} bitmap",
            self.rows,
            self.cols
        );
        let bit = usize::from(row - 1) * usize::from(self.cols) + usize::from(col - 1);
        (bit / WORD_BITS, 1 << (bit % WORD_BITS))
    }

    pub fn is_set(&self, row: u8, col: u8) -> bool {
        let (word, mask) = self.index(row, col);
        self.words[word] & mask != 0
    }

    pub fn is_set_at(&self, place: Point) -> bool {
        self.is_set(place.row, place.col)
    }

    pub fn set(&mut self, row: u8, col: u8) {
        let (word, mask) = self.index(row, col);
        self.words[word] |= mask;
    }

    pub fn unset(&mut self, row: u8, col: u8) {
        let (word, mask) = self.index(row, col);
        self.words[word] &= !mask;
    }

    pub fn set_at(&mut self, place: Point) {
        self.set(place.row, place.col);
    }

    pub fn unset_at(&mut self, place: Point) {
        self.unset(place.row, place.col);
    }

    pub fn set_value(&mut self, row: u8, col: u8, value: bool) {
        if value {
            self.set(row, col);
        } else {
            self.unset(row, col);
        }
    }

    /// Set `count` cells of `row` starting at `start_col` to `value`
    pub fn set_row_value(&mut self, row: u8, start_col: u8, count: u8, value: bool) {
        for offset in 0..count {
            self.set_value(row, start_col + offset, value);
        }
    }

    /// Set every cell of `region` to `value`
    pub fn set_region_value(&mut self, region: Region, value: bool) {
        for row in region.top()..=region.bottom() {
            self.set_row_value(row, region.left(), region.cols, value);
        }
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
