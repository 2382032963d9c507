//! Self-describing result of encoding and its binary layout.

use std::io;
use binout::{AsIs, Serializer};
use dyn_size_of::GetSize;
use crate::{Error, Result, Tree};

/// Self-describing result of encoding: everything needed to decode the original bytes.
///
/// Its serialized layout is:
/// 1. the number of encoded symbols, as little-endian `u64`,
/// 2. the [description](Tree::write_description) of the Huffman tree, zero-padded to whole bytes
///    (absent if the number of symbols is `0`),
/// 3. the number of padding bits in the last byte of the payload, as a single byte,
/// 4. the payload: the codewords of the encoded symbols, packed most significant bit first.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Artifact {
    /// Number of encoded symbols.
    pub(crate) len: usize,
    /// Description of the Huffman tree.
    pub(crate) tree: Box<[u8]>,
    /// Number of padding (zero) bits in the last byte of `payload`.
    pub(crate) pad_bits: u8,
    /// Packed codewords.
    pub(crate) payload: Box<[u8]>
}

impl GetSize for Artifact {
    fn size_bytes_dyn(&self) -> usize {
        self.tree.size_bytes_dyn() + self.payload.size_bytes_dyn()
    }
    const USES_DYN_MEM: bool = true;
}

impl Artifact {
    /// Returns the artifact of the empty sequence.
    #[inline] pub fn empty() -> Self { Self::default() }

    /// Constructs the artifact from its parts.
    pub fn new(len: usize, tree: Box<[u8]>, pad_bits: u8, payload: Box<[u8]>) -> Self {
        Self { len, tree, pad_bits, payload }
    }

    /// Returns the number of encoded symbols.
    #[inline] pub fn len(&self) -> usize { self.len }

    /// Returns whether the artifact encodes the empty sequence.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Returns the description of the Huffman tree.
    #[inline] pub fn tree_description(&self) -> &[u8] { &self.tree }

    /// Returns the number of padding bits in the last byte of the payload.
    #[inline] pub fn pad_bits(&self) -> u8 { self.pad_bits }

    /// Returns the packed codewords.
    #[inline] pub fn payload(&self) -> &[u8] { &self.payload }

    /// Returns the number of bits of the payload, excluding padding.
    #[inline] pub fn payload_bits(&self) -> usize {
        (self.payload.len() * 8).saturating_sub(self.pad_bits as usize)
    }

    /// Returns the tree description to serialize, which is absent for the empty sequence.
    #[inline] fn written_tree(&self) -> &[u8] {
        if self.is_empty() { &[] } else { &self.tree }
    }

    /// Returns number of bytes which `write` will write.
    pub fn write_bytes(&self) -> usize {
        AsIs::size(self.len as u64) + self.written_tree().len() + AsIs::size(self.pad_bits) + self.payload.len()
    }

    /// Writes `self` to the `output`.
    ///
    /// The tree description is written only if at least one symbol is encoded.
    pub fn write(&self, output: &mut dyn io::Write) -> io::Result<()> {
        AsIs::write(output, self.len as u64)?;
        output.write_all(self.written_tree())?;
        AsIs::write(output, self.pad_bits)?;
        output.write_all(&self.payload)
    }

    /// Returns `self` serialized to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.write_bytes());
        // writing to Vec never fails
        let _ = self.write(&mut result);
        result
    }

    /// Reads `Artifact` from the whole remaining content of `input`.
    ///
    /// Returns [`Error::Io`] if reading fails and [`Error::CorruptArtifact`] if the content is malformed.
    pub fn read(input: &mut dyn io::Read) -> Result<Self> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Parses `Artifact` from `bytes`, which must contain exactly one artifact.
    ///
    /// Returns [`Error::CorruptArtifact`] if `bytes` are malformed.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        let len: u64 = AsIs::read(&mut bytes).map_err(|_| Error::corrupt("symbol count is truncated"))?;
        let len = usize::try_from(len).map_err(|_| Error::corrupt(format!("symbol count {len} exceeds address space")))?;
        let tree_len = if len == 0 { 0 } else { Tree::read_description(bytes)?.1 };
        let (tree, mut bytes) = bytes.split_at(tree_len);
        let pad_bits: u8 = AsIs::read(&mut bytes).map_err(|_| Error::corrupt("padding size is truncated"))?;
        if pad_bits > 7 {
            return Err(Error::corrupt(format!("padding size {pad_bits} exceeds 7 bits")));
        }
        Ok(Self { len, tree: tree.into(), pad_bits, payload: bytes.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let artifact = Artifact::empty();
        assert!(artifact.is_empty());
        assert_eq!(artifact.to_bytes(), [0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(artifact.write_bytes(), 9);
        assert_eq!(Artifact::from_bytes(&artifact.to_bytes()).unwrap(), artifact);
    }

    #[test]
    fn layout() {
        let artifact = Artifact::new(9, vec![0x58, 0xAC, 0x20].into(), 7, vec![0xFF, 0x00].into());
        let bytes = artifact.to_bytes();
        assert_eq!(bytes, [9, 0, 0, 0, 0, 0, 0, 0, 0x58, 0xAC, 0x20, 7, 0xFF, 0x00]);
        assert_eq!(bytes.len(), artifact.write_bytes());
        let mut written = Vec::new();
        artifact.write(&mut written).unwrap();
        assert_eq!(written, bytes);
        assert_eq!(artifact.payload_bits(), 9);
        assert_eq!(Artifact::from_bytes(&bytes).unwrap(), artifact);
        assert_eq!(Artifact::read(&mut &bytes[..]).unwrap(), artifact);
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(Artifact::from_bytes(&[]), Err(Error::CorruptArtifact(_))));
        assert!(matches!(Artifact::from_bytes(&[1, 0, 0]), Err(Error::CorruptArtifact(_))));
        assert!(matches!(Artifact::from_bytes(&[9, 0, 0, 0, 0, 0, 0, 0, 0x58]), Err(Error::CorruptArtifact(_))));
        assert!(matches!(Artifact::from_bytes(&[9, 0, 0, 0, 0, 0, 0, 0, 0x58, 0xAC, 0x20]), Err(Error::CorruptArtifact(_))));
    }

    #[test]
    fn empty_sequence_has_no_tree() {
        let artifact = Artifact::new(0, vec![0x58, 0xAC, 0x20].into(), 0, Box::default());
        assert_eq!(artifact.write_bytes(), 9);
        assert_eq!(artifact.to_bytes(), [0; 9]);
        assert_eq!(Artifact::from_bytes(&artifact.to_bytes()).unwrap(), Artifact::empty());
    }

    #[test]
    fn invalid_padding() {
        assert!(matches!(Artifact::from_bytes(&[0, 0, 0, 0, 0, 0, 0, 0, 8]), Err(Error::CorruptArtifact(_))));
    }
}
