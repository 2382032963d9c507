//! Construction and (de)serialization of the Huffman tree.

use std::collections::VecDeque;
use dyn_size_of::GetSize;
use crate::{BitPacker, BitUnpacker, Error, Frequencies, Result, Weight, MAX_CODE_LEN, SYMBOLS};

/// Node of the Huffman tree. Each node exclusively owns its children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Node {
    /// Leaf assigned to the `symbol` which occurs `weight` times.
    Leaf { symbol: u8, weight: Weight },
    /// Merge point whose `weight` is the total weight of the leaves beneath it.
    /// Only the root of a tree with a single leaf has no `right` child.
    Internal { weight: Weight, left: Box<Node>, right: Option<Box<Node>> }
}

impl Node {
    /// Returns the weight of `self`.
    #[inline] pub fn weight(&self) -> Weight {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight
        }
    }

    /// Returns the internal node whose left child is `left` and right one is `right`.
    pub fn merge(left: Node, right: Node) -> Self {
        Node::Internal { weight: left.weight() + right.weight(), left: Box::new(left), right: Some(Box::new(right)) }
    }

    /// Returns the child of `self` selected by `bit` (`false` = left, `true` = right),
    /// or `None` if `self` is a leaf or does not have such child.
    #[inline] pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => if bit { right.as_deref() } else { Some(&**left) }
        }
    }

    /// Returns the length of the longest path from `self` to a leaf.
    fn height(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } =>
                1 + left.height().max(right.as_ref().map_or(0, |r| r.height()))
        }
    }

    /// Returns the number of leaves in the subtree of `self`.
    fn leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaves() + right.as_ref().map_or(0, |r| r.leaves())
        }
    }

    /// Writes the pre-order description of `self`: `0` for an internal node, `1` followed by 8 bits of symbol for a leaf.
    fn write_description(&self, output: &mut BitPacker) {
        match self {
            Node::Leaf { symbol, .. } => {
                output.push_bit(true);
                output.push_bits(*symbol as u64, 8);
            }
            Node::Internal { left, right, .. } => {
                output.push_bit(false);
                left.write_description(output);
                if let Some(right) = right { right.write_description(output); }
            }
        }
    }

    /// Reads the description written by [`Self::write_description`] of the node at the given `depth`.
    fn read_description(input: &mut BitUnpacker, seen: &mut [bool; SYMBOLS], depth: u8) -> Result<Self> {
        match input.next() {
            Some(true) => {
                let symbol = input.read_bits(8).ok_or_else(|| Error::corrupt("tree description is truncated"))? as u8;
                if std::mem::replace(&mut seen[symbol as usize], true) {
                    return Err(Error::corrupt(format!("symbol {symbol:#04x} occurs twice in tree description")));
                }
                Ok(Node::Leaf { symbol, weight: 0 })
            }
            Some(false) => {
                if depth >= MAX_CODE_LEN {
                    return Err(Error::corrupt(format!("tree description is deeper than {MAX_CODE_LEN} levels")));
                }
                let left = Self::read_description(input, seen, depth + 1)?;
                let right = Self::read_description(input, seen, depth + 1)?;
                Ok(Node::merge(left, right))
            }
            None => Err(Error::corrupt("tree description is truncated"))
        }
    }
}

impl GetSize for Node {
    fn size_bytes_dyn(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } =>
                left.size_bytes() + right.as_ref().map_or(0, |r| r.size_bytes())
        }
    }
    const USES_DYN_MEM: bool = true;
}

/// Pops and returns the lightest node from the front of `leaves` or `internals`.
/// On equal weights, the leaf is preferred.
fn pop_lightest(leaves: &mut VecDeque<Node>, internals: &mut VecDeque<Node>) -> Option<Node> {
    let take_internal = match (leaves.front(), internals.front()) {
        (Some(leaf), Some(internal)) => internal.weight() < leaf.weight(),
        (Some(_), None) => false,
        (None, _) => true
    };
    if take_internal { internals.pop_front() } else { leaves.pop_front() }
}

/// Binary Huffman tree. Its root is always an internal node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tree {
    root: Node
}

impl GetSize for Tree {
    #[inline] fn size_bytes_dyn(&self) -> usize { self.root.size_bytes_dyn() }
    const USES_DYN_MEM: bool = true;
}

impl Tree {
    /// Returns the tree rooted at `root`, wrapping a bare leaf into an internal node,
    /// so the lone symbol gets the one-bit code `0`.
    fn with_root(root: Node) -> Self {
        match root {
            leaf @ Node::Leaf { .. } => Self { root: Node::Internal { weight: leaf.weight(), left: Box::new(leaf), right: None } },
            internal => Self { root: internal }
        }
    }

    /// Constructs Huffman tree for given `frequencies` of symbols.
    /// Returns [`Error::EmptyInput`] if no symbol occurs.
    ///
    /// The two lightest nodes are repeatedly merged, the first one popped becomes the left child.
    /// The lightest node is selected deterministically, by the following rules:
    /// - leaves are ordered by weights and then by symbols, ascending,
    /// - internal nodes are ordered by the time of their creation (their weights are non-decreasing),
    /// - if the lightest leaf and the lightest internal node are of equal weight, the leaf is selected.
    ///
    /// The algorithm runs in *O(n log n)* time, where *n* is the number of distinct symbols
    /// (only sorting the leaves is not linear).
    pub fn from_frequencies<F: Frequencies>(frequencies: &F) -> Result<Self> {
        let mut sorted: Vec<(Weight, u8)> = frequencies.occurring().map(|(symbol, weight)| (weight, symbol)).collect();
        sorted.sort_unstable();
        let mut leaves: VecDeque<Node> = sorted.into_iter()
            .map(|(weight, symbol)| Node::Leaf { symbol, weight }).collect();
        let mut internals = VecDeque::with_capacity(leaves.len());
        while let Some(left) = pop_lightest(&mut leaves, &mut internals) {
            match pop_lightest(&mut leaves, &mut internals) {
                Some(right) => internals.push_back(Node::merge(left, right)),
                None => {
                    let tree = Self::with_root(left);
                    log::trace!("built Huffman tree with {} leaves, height {}", tree.leaves(), tree.height());
                    return Ok(tree);
                }
            }
        }
        Err(Error::EmptyInput)
    }

    /// Returns the root of `self`, which is always an internal node.
    #[inline] pub fn root(&self) -> &Node { &self.root }

    /// Returns the total weight of all leaves (zero for trees read from descriptions).
    #[inline] pub fn weight(&self) -> Weight { self.root.weight() }

    /// Returns the number of leaves, which equals the number of distinct symbols.
    pub fn leaves(&self) -> usize { self.root.leaves() }

    /// Returns the length of the longest root-to-leaf path, which equals the length of the longest codeword.
    pub fn height(&self) -> u32 { self.root.height() }

    /// Appends the description of `self` to `output`.
    ///
    /// The description lists nodes in pre-order, writing bit `0` for each internal node
    /// and bit `1` followed by 8 bits of symbol for each leaf.
    /// The tree with a single leaf is described by the bare leaf.
    pub fn write_description(&self, output: &mut BitPacker) {
        match &self.root {
            Node::Internal { left, right: None, .. } => left.write_description(output),
            root => root.write_description(output)
        }
    }

    /// Returns the description of `self` (see [`Self::write_description`]), zero-padded to whole bytes.
    pub fn description(&self) -> Box<[u8]> {
        let mut packer = BitPacker::with_capacity_bits(self.leaves() * 10);
        self.write_description(&mut packer);
        packer.finish().0
    }

    /// Reads the tree from the description at the beginning of `bytes`
    /// and returns it together with the number of bytes occupied by the description.
    ///
    /// Returns [`Error::CorruptArtifact`] if the description is truncated, repeats a symbol,
    /// or describes a tree deeper than [`MAX_CODE_LEN`].
    pub fn read_description(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut input = BitUnpacker::new(bytes, 0);
        let root = Node::read_description(&mut input, &mut [false; SYMBOLS], 0)?;
        Ok((Self::with_root(root), input.consumed_bytes()))
    }
}
