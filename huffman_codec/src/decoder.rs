use crate::{Artifact, BitUnpacker, Error, Node, Result, Tree};

/// Result of bit decoding returned by [`Decoder::consume`].
#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum DecodingResult<T> {
    /// Completed value that has been successfully decoded.
    Value(T),
    /// The codeword is incomplete and the next bit is needed.
    Incomplete,
    /// The codeword is invalid (possible only for the tree with a single leaf).
    Invalid
}

/// Decoder that decodes a symbol for given code, consuming one bit at a time
/// and walking the Huffman tree from its root.
///
/// Time complexity of decoding a symbol is linear in the length of its codeword.
pub struct Decoder<'tree> {
    tree: &'tree Tree,
    /// Internal node reached by the bits consumed since the last symbol.
    node: &'tree Node,
    /// Number of bits consumed since construction or last reset.
    consumed: u32
}

impl<'tree> Decoder<'tree> {
    /// Constructs decoder for given `tree`.
    pub fn new(tree: &'tree Tree) -> Self {
        Self { tree, node: tree.root(), consumed: 0 }
    }

    /// Resets `self` to the root of the tree and makes it ready to decode next symbol.
    #[inline] pub fn reset(&mut self) {
        self.node = self.tree.root();
        self.consumed = 0;
    }

    /// Returns whether `self` is at the root of the tree, i.e. no bit of the current codeword has been consumed.
    #[inline] pub fn at_root(&self) -> bool { self.consumed == 0 }

    /// Returns the number of bits consumed since construction or last reset.
    #[inline(always)] pub fn consumed_bits(&self) -> u32 { self.consumed }

    /// Consumes a `bit` (`false` = left, `true` = right) of the codeword and returns:
    /// - a symbol if the given `bit` finishes the valid codeword, `self` is [reset](Self::reset) then;
    /// - a [`DecodingResult::Incomplete`] if the codeword is incomplete and the next bit is needed;
    /// - or [`DecodingResult::Invalid`] if the `bit` leads to a missing child.
    pub fn consume(&mut self, bit: bool) -> DecodingResult<u8> {
        match self.node.child(bit) {
            Some(Node::Leaf { symbol, .. }) => {
                self.reset();
                DecodingResult::Value(*symbol)
            }
            Some(internal) => {
                self.node = internal;
                self.consumed += 1;
                DecodingResult::Incomplete
            }
            None => DecodingResult::Invalid
        }
    }

    /// Tries to decode and return a single symbol from the `bits` iterator,
    /// consuming as many bits as needed.
    ///
    /// Returns [`DecodingResult::Incomplete`] if the iterator exhausted before the symbol was decoded
    /// ([`Self::at_root`] enables checking if the iterator yielded any bit before exhausting).
    pub fn decode_next<I: Iterator<Item = bool>>(&mut self, bits: &mut I) -> DecodingResult<u8> {
        for bit in bits {
            match self.consume(bit) {
                DecodingResult::Incomplete => {},
                result => return result
            }
        }
        DecodingResult::Incomplete
    }
}

/// Decodes the bytes encoded in the `artifact`.
///
/// Returns [`Error::CorruptArtifact`] if the tree description is malformed,
/// the payload ends before all symbols are decoded, contains an invalid codeword,
/// or has any bits left after the last symbol.
pub fn decode(artifact: &Artifact) -> Result<Vec<u8>> {
    if artifact.pad_bits > 7 {
        return Err(Error::corrupt(format!("padding size {} exceeds 7 bits", artifact.pad_bits)));
    }
    if artifact.payload.is_empty() && artifact.pad_bits != 0 {
        return Err(Error::corrupt("padding of the empty payload"));
    }
    if artifact.is_empty() {
        return if artifact.tree.is_empty() && artifact.payload.is_empty() {
            Ok(Vec::new())
        } else {
            Err(Error::corrupt("content after the empty sequence"))
        };
    }
    let (tree, tree_len) = Tree::read_description(&artifact.tree)?;
    if tree_len != artifact.tree.len() {
        return Err(Error::corrupt("bytes after the tree description"));
    }
    let mut bits = BitUnpacker::new(&artifact.payload, artifact.pad_bits);
    let mut result = Vec::with_capacity(artifact.len.min(bits.len()));
    let mut decoder = Decoder::new(&tree);
    while result.len() < artifact.len {
        match decoder.decode_next(&mut bits) {
            DecodingResult::Value(symbol) => result.push(symbol),
            DecodingResult::Incomplete => return Err(Error::corrupt(format!(
                "payload ends after {} of {} symbols", result.len(), artifact.len))),
            DecodingResult::Invalid => return Err(Error::corrupt(format!(
                "invalid codeword of symbol {}", result.len())))
        }
    }
    if bits.len() != 0 {
        return Err(Error::corrupt(format!("{} bits left after the last symbol", bits.len())));
    }
    log::debug!("decoded {} symbols from {} payload bits", result.len(), bits.position());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, Frequencies, Weight, SYMBOLS};
    use quickcheck_macros::quickcheck;

    fn tree_of(text: &[u8]) -> Tree {
        Tree::from_frequencies(&<[Weight; SYMBOLS]>::with_occurrences_of(text)).unwrap()
    }

    #[test]
    fn walk_abracadabra() {
        // a = 0, c = 100, d = 101, b = 110, r = 111
        let tree = tree_of(b"abracadabra");
        let mut decoder = Decoder::new(&tree);
        assert_eq!(decoder.consume(false), DecodingResult::Value(b'a'));
        assert!(decoder.at_root());
        assert_eq!(decoder.consume(true), DecodingResult::Incomplete);
        assert_eq!(decoder.consume(false), DecodingResult::Incomplete);
        assert_eq!(decoder.consumed_bits(), 2);
        assert_eq!(decoder.consume(true), DecodingResult::Value(b'd'));
        let mut bits = [true, true, true, true, true].into_iter();
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Value(b'r'));
        assert_eq!(decoder.decode_next(&mut bits), DecodingResult::Incomplete);
        assert!(!decoder.at_root());
    }

    #[test]
    fn walk_single_symbol() {
        let tree = tree_of(b"x");
        let mut decoder = Decoder::new(&tree);
        assert_eq!(decoder.consume(false), DecodingResult::Value(b'x'));
        assert_eq!(decoder.consume(true), DecodingResult::Invalid);
    }

    #[test]
    fn empty() {
        assert_eq!(decode(&encode(b"")).unwrap(), b"");
        assert!(matches!(decode(&Artifact::new(0, Box::default(), 0, vec![0].into())), Err(Error::CorruptArtifact(_))));
    }

    #[test]
    fn single_symbol() {
        let text = [7u8; 1000];
        let artifact = encode(&text);
        assert_eq!(artifact.payload().len(), 125);
        assert_eq!(decode(&artifact).unwrap(), text);
    }

    #[test]
    fn serialized_round_trip() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let bytes = encode(text).to_bytes();
        assert_eq!(decode(&Artifact::from_bytes(&bytes).unwrap()).unwrap(), text);
    }

    #[test]
    fn truncated_payload() {
        for text in [&b"aaaaaaaab"[..], &b"abracadabra"[..], &b"xxxxxxxxxxxxxxxxx"[..]] {
            let mut bytes = encode(text).to_bytes();
            bytes.pop();
            let artifact = Artifact::from_bytes(&bytes).unwrap();
            assert!(matches!(decode(&artifact), Err(Error::CorruptArtifact(_))));
        }
    }

    #[test]
    fn trailing_bits() {
        let artifact = encode(b"abracadabra");
        let longer = Artifact::new(artifact.len(), artifact.tree_description().into(), 0, artifact.payload().into());
        assert!(matches!(decode(&longer), Err(Error::CorruptArtifact(_))));
        let mut payload = artifact.payload().to_vec();
        payload.push(0);
        let longer = Artifact::new(artifact.len(), artifact.tree_description().into(), artifact.pad_bits(), payload.into());
        assert!(matches!(decode(&longer), Err(Error::CorruptArtifact(_))));
    }

    #[test]
    fn invalid_codeword() {
        let artifact = encode(b"xx");
        let forged = Artifact::new(2, artifact.tree_description().into(), 6, vec![0b01_000000].into());
        assert!(matches!(decode(&forged), Err(Error::CorruptArtifact(_))));
    }

    #[test]
    fn forged_symbol_count() {
        let artifact = encode(b"abracadabra");
        let forged = Artifact::new(usize::MAX, artifact.tree_description().into(), artifact.pad_bits(), artifact.payload().into());
        assert!(matches!(decode(&forged), Err(Error::CorruptArtifact(_))));
    }

    #[quickcheck]
    fn round_trip(text: Vec<u8>) -> bool {
        decode(&encode(&text)).map_or(false, |decoded| decoded == text)
    }

    #[quickcheck]
    fn round_trip_serialized(text: Vec<u8>) -> bool {
        Artifact::from_bytes(&encode(&text).to_bytes())
            .and_then(|artifact| decode(&artifact))
            .map_or(false, |decoded| decoded == text)
    }
}
