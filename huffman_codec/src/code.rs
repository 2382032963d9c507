//! Codewords and the table that maps symbols to them.

use std::{fmt, ops::Index};
use dyn_size_of::GetSize;
use crate::{Frequencies, Node, Tree, SYMBOLS};

/// The largest supported length of a codeword, in bits.
///
/// Building a tree deeper than this requires more than 10^13 input bytes
/// (the weights along the longest path must grow at least like Fibonacci numbers).
pub const MAX_CODE_LEN: u8 = 64;

/// Codeword which consists of `len` bits.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Hash)]
pub struct Code {
    /// The bits of the codeword, stored in the `len` lowest bits. The most significant of them is the first.
    pub content: u64,
    /// Length of the codeword, in bits.
    pub len: u8
}

impl Code {
    /// Returns the code extended by the `bit` appended to its end.
    #[inline] pub fn with_bit(self, bit: bool) -> Self {
        Self { content: self.content << 1 | bit as u64, len: self.len + 1 }
    }

    /// Returns `nr`-th bit of `self`, counting from the first one.
    #[inline] pub fn get(&self, nr: u8) -> bool {
        self.content >> (self.len - nr - 1) & 1 != 0
    }

    /// Returns iterator over the bits of `self`, from the first one.
    pub fn bits(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(|nr| self.get(nr))
    }

    /// Returns whether `self` is a prefix of `other` (each code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (self.len == 0 || other.content >> (other.len - self.len) == self.content)
    }

    /// Returns whether `self` consists of zero bits.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl fmt::Display for Code {
    /// Writes the bits of the code as the string of `0`s and `1`s.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bits().try_for_each(|b| f.write_str(if b { "1" } else { "0" }))
    }
}

/// Maps each symbol to its codeword. Symbols without codes are mapped to empty codes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CodeTable {
    codes: [Code; SYMBOLS]
}

impl GetSize for CodeTable {}

impl CodeTable {
    /// Derives codewords of all the leaves of `tree`:
    /// descending to the left child appends `0`, to the right one appends `1`.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut result = Self { codes: [Code::default(); SYMBOLS] };
        result.add_leaves(tree.root(), Code::default());
        result
    }

    fn add_leaves(&mut self, node: &Node, code: Code) {
        match node {
            Node::Leaf { symbol, .. } => self.codes[*symbol as usize] = code,
            Node::Internal { left, right, .. } => {
                debug_assert!(code.len < MAX_CODE_LEN);
                self.add_leaves(left, code.with_bit(false));
                if let Some(right) = right { self.add_leaves(right, code.with_bit(true)); }
            }
        }
    }

    /// Returns the codeword of `symbol` or `None` if the symbol has no code.
    #[inline] pub fn get(&self, symbol: u8) -> Option<&Code> {
        let code = &self.codes[symbol as usize];
        (!code.is_empty()).then_some(code)
    }

    /// Returns iterator over symbols that have codes, paired with their codes, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().enumerate().filter(|(_, c)| !c.is_empty()).map(|(s, c)| (s as u8, c))
    }

    /// Returns the number of symbols that have codes.
    pub fn len(&self) -> usize { self.iter().count() }

    /// Returns whether no symbol has a code.
    pub fn is_empty(&self) -> bool { self.iter().next().is_none() }

    /// Returns the length of the longest codeword.
    pub fn max_len(&self) -> u8 {
        self.codes.iter().map(|c| c.len).max().unwrap_or(0)
    }

    /// Returns whether no codeword is a prefix of another one.
    ///
    /// The algorithm runs in *O(n log n)* time, where *n* is the number of codes:
    /// after sorting codewords lexicographically, a prefix must directly precede some codeword it prefixes.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.iter().map(|(_, c)| c).collect();
        codes.sort_unstable_by(|a, b| a.bits().cmp(b.bits()));
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    /// Returns the total number of bits of the codewords of all symbols counted by `frequencies`.
    pub fn total_bits<F: Frequencies>(&self, frequencies: &F) -> u64 {
        frequencies.occurring().map(|(s, w)| self.codes[s as usize].len as u64 * w).sum()
    }
}

impl Index<u8> for CodeTable {
    type Output = Code;

    /// Returns the codeword of `symbol`, empty if the symbol has no code.
    #[inline] fn index(&self, symbol: u8) -> &Code { &self.codes[symbol as usize] }
}

impl fmt::Display for CodeTable {
    /// Writes one `symbol code` line for each symbol that has a code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|(s, c)| writeln!(f, "{s:#04x} {c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Weight;
    use maplit::btreemap;
    use std::collections::BTreeMap;

    fn codes_as_strings(table: &CodeTable) -> BTreeMap<u8, String> {
        table.iter().map(|(s, c)| (s, c.to_string())).collect()
    }

    #[test]
    fn code_bits() {
        let code = Code::default().with_bit(true).with_bit(false).with_bit(true).with_bit(true);
        assert_eq!(code, Code { content: 0b1011, len: 4 });
        assert_eq!(code.bits().collect::<Vec<_>>(), [true, false, true, true]);
        assert_eq!(code.to_string(), "1011");
        assert!(Code { content: 0b10, len: 2 }.is_prefix_of(&code));
        assert!(!Code { content: 0b11, len: 2 }.is_prefix_of(&code));
        assert!(code.is_prefix_of(&code));
        assert!(!code.is_prefix_of(&Code { content: 0b10, len: 2 }));
    }

    #[test]
    fn abracadabra() {
        //    /\
        //   a  \
        //     / \
        //    /\  /\
        //   c d  b r
        let frequencies = <[Weight; SYMBOLS]>::with_occurrences_of(b"abracadabra");
        let table = CodeTable::from_tree(&Tree::from_frequencies(&frequencies).unwrap());
        assert_eq!(codes_as_strings(&table), btreemap!(
            b'a' => "0".to_owned(),
            b'b' => "110".to_owned(),
            b'c' => "100".to_owned(),
            b'd' => "101".to_owned(),
            b'r' => "111".to_owned()
        ));
        assert_eq!(table.len(), 5);
        assert_eq!(table.max_len(), 3);
        assert_eq!(table.total_bits(&frequencies), 23);
        assert!(table.is_prefix_free());
        assert_eq!(table.get(b'z'), None);
        assert!(table[b'z'].is_empty());
        assert_eq!(table[b'b'], Code { content: 0b110, len: 3 });
        assert_eq!(table.to_string(), "0x61 0\n0x62 110\n0x63 100\n0x64 101\n0x72 111\n");
    }

    #[test]
    fn single_symbol() {
        let frequencies = <[Weight; SYMBOLS]>::with_occurrences_of(b"xxxx");
        let table = CodeTable::from_tree(&Tree::from_frequencies(&frequencies).unwrap());
        assert_eq!(codes_as_strings(&table), btreemap!(b'x' => "0".to_owned()));
        assert_eq!(table.total_bits(&frequencies), 4);
    }

    #[test]
    fn not_prefix_free() {
        let mut table = CodeTable { codes: [Code::default(); SYMBOLS] };
        table.codes[1] = Code { content: 0b01, len: 2 };
        table.codes[2] = Code { content: 0b1, len: 1 };
        assert!(table.is_prefix_free());
        table.codes[3] = Code { content: 0b011, len: 3 };
        assert!(!table.is_prefix_free());
    }
}
