//! Bit-packed undefined-value mask, one bit per row.
//!
//! A set bit means the row holds no meaningful value.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndefinedMask {
    /// Each word holds 64 row bits, row 0 in the least significant bit.
    bits: Vec<u64>,
    /// Number of rows covered.
    len: usize,
}

const fn words_for(len: usize) -> usize {
    len.div_ceil(64)
}

impl UndefinedMask {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            bits: Vec::with_capacity(words_for(rows)),
            len: 0,
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the bit for `row`. Rows past the end read as undefined.
    #[inline]
    pub fn get(&self, row: usize) -> bool {
        if row >= self.len {
            return true;
        }
        (self.bits[row >> 6] >> (row & 63)) & 1 == 1
    }

    /// Sets the bit for `row`. The row must be in range.
    #[inline]
    pub fn set(&mut self, row: usize, undefined: bool) {
        debug_assert!(row < self.len);
        let mask = 1u64 << (row & 63);
        if undefined {
            self.bits[row >> 6] |= mask;
        } else {
            self.bits[row >> 6] &= !mask;
        }
    }

    /// Grows or shrinks to `len` rows. New rows start undefined.
    pub fn resize(&mut self, len: usize) {
        let old = self.len;
        self.bits.resize(words_for(len), 0);
        self.len = len;
        if len > old {
            for row in old..len {
                self.set(row, true);
            }
        } else {
            let rem = len & 63;
            if rem != 0 {
                if let Some(last) = self.bits.last_mut() {
                    *last &= (1u64 << rem) - 1;
                }
            }
        }
    }

    /// Marks rows `start..end` defined or undefined.
    pub fn fill(&mut self, start: usize, end: usize, undefined: bool) {
        for row in start..end.min(self.len) {
            self.set(row, undefined);
        }
    }

    pub fn clear(&mut self) {
        self.bits.clear();
        self.len = 0;
    }

    /// Number of rows with the undefined bit clear.
    pub fn defined_count(&self) -> usize {
        let undefined: u32 = self.bits.iter().map(|w| w.count_ones()).sum();
        self.len - undefined as usize
    }

    /// Rows with the undefined bit clear, ascending.
    pub fn defined_rows(&self) -> Vec<usize> {
        (0..self.len).filter(|&row| !self.get(row)).collect()
    }
}
