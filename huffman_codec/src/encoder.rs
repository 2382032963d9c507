use dyn_size_of::GetSize;
use crate::{Artifact, BitPacker, CodeTable, Error, Frequencies, Result, Tree, Weight, SYMBOLS};

/// Encoder that holds the Huffman tree and the code table derived from it.
///
/// It can be constructed once and then used to encode any data whose symbols have codes.
#[derive(Clone, Debug)]
pub struct Encoder {
    tree: Tree,
    codes: CodeTable,
    /// Description of `tree`, copied into each artifact.
    description: Box<[u8]>
}

impl GetSize for Encoder {
    fn size_bytes_dyn(&self) -> usize {
        self.tree.size_bytes_dyn() + self.codes.size_bytes_dyn() + self.description.size_bytes_dyn()
    }
    const USES_DYN_MEM: bool = true;
}

impl Encoder {
    /// Constructs encoder for given `frequencies` of symbols.
    /// Returns [`Error::EmptyInput`] if no symbol occurs.
    pub fn from_frequencies<F: Frequencies>(frequencies: &F) -> Result<Self> {
        let tree = Tree::from_frequencies(frequencies)?;
        let codes = CodeTable::from_tree(&tree);
        let description = tree.description();
        Ok(Self { tree, codes, description })
    }

    /// Constructs encoder for the frequencies of symbols in `sample`.
    /// Returns [`Error::EmptyInput`] if `sample` is empty.
    pub fn new(sample: &[u8]) -> Result<Self> {
        Self::from_frequencies(&<[Weight; SYMBOLS]>::with_occurrences_of(sample))
    }

    /// Returns the Huffman tree.
    #[inline] pub fn tree(&self) -> &Tree { &self.tree }

    /// Returns the code table.
    #[inline] pub fn codes(&self) -> &CodeTable { &self.codes }

    /// Encodes `data` into a self-describing artifact.
    /// The empty `data` gives the [empty artifact](Artifact::empty).
    /// Returns [`Error::UnknownSymbol`] if some symbol of `data` has no code.
    pub fn encode(&self, data: &[u8]) -> Result<Artifact> {
        if data.is_empty() { return Ok(Artifact::empty()); }
        let mut packer = BitPacker::with_capacity_bits(data.len() * self.codes.max_len() as usize);
        for symbol in data {
            packer.push_code(self.codes.get(*symbol).ok_or(Error::UnknownSymbol(*symbol))?);
        }
        let (payload, pad_bits) = packer.finish();
        Ok(Artifact::new(data.len(), self.description.clone(), pad_bits, payload))
    }
}

/// Encodes `data` into a self-describing artifact, using the Huffman coding built for `data`.
///
/// The empty `data` gives the [empty artifact](Artifact::empty).
pub fn encode(data: &[u8]) -> Artifact {
    let frequencies = <[Weight; SYMBOLS]>::with_occurrences_of(data);
    let encoder = match Encoder::from_frequencies(&frequencies) {
        Ok(encoder) => encoder,
        Err(_) => return Artifact::empty()  // nothing occurs, so data is empty
    };
    let mut packer = BitPacker::with_capacity_bits(encoder.codes.total_bits(&frequencies) as usize);
    // each symbol of data is counted by frequencies, so it has a non-empty code
    packer.push_codes(data.iter().map(|symbol| &encoder.codes[*symbol]));
    debug_assert_eq!(packer.bit_len() as u64, encoder.codes.total_bits(&frequencies));
    let (payload, pad_bits) = packer.finish();
    log::debug!("encoded {} bytes of {} distinct symbols (entropy {:.3}) into {} payload bytes",
        data.len(), encoder.codes.len(), frequencies.entropy(), payload.len());
    Artifact::new(data.len(), encoder.description, pad_bits, payload)
}
