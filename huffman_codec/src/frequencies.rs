//! Tools to count frequencies of symbols.

use fsum::FSum;
use std::borrow::Borrow;

/// Number of occurrences of a symbol, or total weight of a subtree.
pub type Weight = u64;

/// Number of distinct byte symbols.
pub const SYMBOLS: usize = 256;

/// Types that implement this trait can count number of occurrences of byte symbols.
///
/// It is implemented for `[u64; 256]`, which stores the number of occurrences of each symbol
/// at the symbol's index (zero for symbols that do not occur).
pub trait Frequencies: Sized {
    /// Constructs `Self` with zero occurrences of each symbol.
    fn zeroed() -> Self;

    /// Constructs `Self` that counts occurrences of all symbols exposed by `iter`.
    fn with_occurrences_of<Iter>(iter: Iter) -> Self
        where Iter: IntoIterator, Iter::Item: Borrow<u8>
    {
        let mut result = Self::zeroed();
        result.count_all(iter);
        result
    }

    /// Adds one to the stored number of `symbol` occurrences.
    fn count(&mut self, symbol: u8);

    /// Calls `count` for all items exposed by `iter`.
    fn count_all<Iter>(&mut self, iter: Iter) where Iter: IntoIterator, Iter::Item: Borrow<u8> {
        for v in iter { self.count(*v.borrow()); }
    }

    /// Returns the number of occurrences of `symbol`.
    fn occurrences(&self, symbol: u8) -> Weight;

    /// Returns iterator over the symbols that occur at least once, paired with their numbers of occurrences.
    /// Symbols are exposed in ascending order.
    fn occurring(&self) -> impl Iterator<Item = (u8, Weight)> + '_;

    /// Returns the number of distinct symbols that occur at least once.
    fn number_of_occurring_values(&self) -> usize {
        self.occurring().count()
    }

    /// Returns the total number of occurrences of all symbols.
    fn total(&self) -> Weight {
        self.occurring().map(|(_, w)| w).sum()
    }

    /// Returns the Shannon entropy (in bits per symbol) of the symbols counted so far.
    fn entropy(&self) -> f64 {
        let sum = self.total() as f64;
        - FSum::with_all(self.occurring()
            .map(|(_, w)| { let p = w as f64 / sum; p * p.log2() })).value()
    }
}

impl Frequencies for [Weight; SYMBOLS] {
    #[inline(always)] fn zeroed() -> Self { [0; SYMBOLS] }

    #[inline(always)] fn count(&mut self, symbol: u8) {
        self[symbol as usize] += 1;
    }

    #[inline(always)] fn occurrences(&self, symbol: u8) -> Weight {
        self[symbol as usize]
    }

    fn occurring(&self) -> impl Iterator<Item = (u8, Weight)> + '_ {
        self.iter().enumerate().filter(|(_, w)| **w != 0).map(|(s, w)| (s as u8, *w))
    }
}
