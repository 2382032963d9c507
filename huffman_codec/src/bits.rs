//! Packing of logical bits into bytes and unpacking them back.
//!
//! Bits are packed most-significant-bit first. The last byte is completed with zero bits,
//! whose number (in range *[0, 7]*) is returned by [`BitPacker::finish`] and must be given to
//! [`BitUnpacker::new`] to reproduce the exact sequence of bits.

use std::iter::FusedIterator;
use bitm::ceiling_div;
use crate::Code;

/// Appends bits to a byte buffer, 8 bits per byte, most significant bit first.
#[derive(Default, Clone, Debug)]
pub struct BitPacker {
    bytes: Vec<u8>,
    /// Number of bits pushed so far.
    bit_len: usize
}

impl BitPacker {
    /// Constructs an empty packer.
    pub fn new() -> Self { Self::default() }

    /// Constructs an empty packer that can store `bits` bits without reallocating.
    pub fn with_capacity_bits(bits: usize) -> Self {
        Self { bytes: Vec::with_capacity(ceiling_div(bits, 8)), bit_len: 0 }
    }

    /// Returns the number of bits pushed so far.
    #[inline(always)] pub fn bit_len(&self) -> usize { self.bit_len }

    /// Appends a single `bit`.
    #[inline] pub fn push_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 { self.bytes.push(0); }
        if bit {
            if let Some(last) = self.bytes.last_mut() { *last |= 0x80 >> offset; }
        }
        self.bit_len += 1;
    }

    /// Appends the `len` lowest bits of `content`, the most significant of them first.
    pub fn push_bits(&mut self, content: u64, len: u8) {
        for i in (0..len).rev() {
            self.push_bit(content >> i & 1 != 0);
        }
    }

    /// Appends all bits of the `code`.
    #[inline] pub fn push_code(&mut self, code: &Code) {
        self.push_bits(code.content, code.len)
    }

    /// Appends all bits of all `codes`, in order.
    pub fn push_codes<'c, I: IntoIterator<Item = &'c Code>>(&mut self, codes: I) {
        for code in codes { self.push_code(code) }
    }

    /// Returns the number of zero bits that [`Self::finish`] will append to complete the last byte.
    #[inline] pub fn pad_bits(&self) -> u8 {
        ((8 - self.bit_len % 8) % 8) as u8
    }

    /// Finishes packing and returns the packed bytes and the number of padding bits in the last byte.
    pub fn finish(self) -> (Box<[u8]>, u8) {
        let pad_bits = self.pad_bits();
        (self.bytes.into_boxed_slice(), pad_bits)
    }
}

/// Iterator over the bits packed by [`BitPacker`].
#[derive(Clone, Debug)]
pub struct BitUnpacker<'b> {
    bytes: &'b [u8],
    /// Index of the next bit to expose.
    position: usize,
    /// Total number of bits, without padding.
    bit_len: usize
}

impl<'b> BitUnpacker<'b> {
    /// Constructs iterator over the bits of `bytes`, ignoring `pad_bits` trailing bits of the last byte.
    ///
    /// If `pad_bits` exceeds the total number of bits, the iterator is empty.
    pub fn new(bytes: &'b [u8], pad_bits: u8) -> Self {
        Self { bytes, position: 0, bit_len: (bytes.len() * 8).saturating_sub(pad_bits as usize) }
    }

    /// Returns the number of bits consumed so far.
    #[inline(always)] pub fn position(&self) -> usize { self.position }

    /// Returns the number of bytes that contain the bits consumed so far.
    #[inline] pub fn consumed_bytes(&self) -> usize { ceiling_div(self.position, 8) }

    /// Reads and returns `len` (at most 64) bits as an integer whose most significant bit is read first.
    /// Returns `None` if there are fewer than `len` bits left.
    pub fn read_bits(&mut self, len: u8) -> Option<u64> {
        if self.len() < len as usize { return None; }
        let mut result = 0;
        for _ in 0..len {
            result = result << 1 | self.next()? as u64;
        }
        Some(result)
    }
}

impl<'b> Iterator for BitUnpacker<'b> {
    type Item = bool;

    #[inline] fn next(&mut self) -> Option<bool> {
        (self.position < self.bit_len).then(|| {
            let bit = self.bytes[self.position / 8] & (0x80 >> (self.position % 8)) != 0;
            self.position += 1;
            bit
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'b> ExactSizeIterator for BitUnpacker<'b> {
    #[inline] fn len(&self) -> usize { self.bit_len - self.position }
}

impl<'b> FusedIterator for BitUnpacker<'b> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_partial_byte() {
        let mut packer = BitPacker::new();
        packer.push_bits(0b101, 3);
        assert_eq!(packer.bit_len(), 3);
        assert_eq!(packer.pad_bits(), 5);
        let (bytes, pad) = packer.finish();
        assert_eq!(bytes.as_ref(), [0b1010_0000]);
        assert_eq!(pad, 5);
        assert_eq!(BitUnpacker::new(&bytes, pad).collect::<Vec<_>>(), [true, false, true]);
    }

    #[test]
    fn pack_across_bytes() {
        let mut packer = BitPacker::with_capacity_bits(12);
        packer.push_codes(&[Code { content: 0b1111_111, len: 7 }, Code { content: 0b0, len: 1 }, Code { content: 0b1001, len: 4 }]);
        let (bytes, pad) = packer.finish();
        assert_eq!(bytes.as_ref(), [0b1111_1110, 0b1001_0000]);
        assert_eq!(pad, 4);
        let mut unpacker = BitUnpacker::new(&bytes, pad);
        assert_eq!(unpacker.len(), 12);
        assert_eq!(unpacker.read_bits(8), Some(0b1111_1110));
        assert_eq!(unpacker.consumed_bytes(), 1);
        assert_eq!(unpacker.read_bits(5), None);
        assert_eq!(unpacker.read_bits(4), Some(0b1001));
        assert_eq!(unpacker.next(), None);
        assert_eq!(unpacker.position(), 12);
    }

    #[test]
    fn whole_bytes_have_no_padding() {
        let mut packer = BitPacker::new();
        packer.push_bits(0xA5C3, 16);
        let (bytes, pad) = packer.finish();
        assert_eq!(bytes.as_ref(), [0xA5, 0xC3]);
        assert_eq!(pad, 0);
        assert_eq!(BitUnpacker::new(&bytes, 0).len(), 16);
    }

    #[test]
    fn empty() {
        let (bytes, pad) = BitPacker::new().finish();
        assert!(bytes.is_empty());
        assert_eq!(pad, 0);
        assert_eq!(BitUnpacker::new(&bytes, pad).next(), None);
        assert_eq!(BitUnpacker::new(&bytes, 7).len(), 0);
    }
}
