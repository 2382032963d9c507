#![doc = include_str!("../README.md")]

mod error;
pub use error::{Error, Result};
mod frequencies;
pub use frequencies::{Frequencies, Weight, SYMBOLS};
mod bits;
pub use bits::{BitPacker, BitUnpacker};
mod tree;
pub use tree::{Node, Tree};
mod code;
pub use code::{Code, CodeTable, MAX_CODE_LEN};
mod artifact;
pub use artifact::Artifact;
mod encoder;
pub use encoder::{encode, Encoder};
mod decoder;
pub use decoder::{decode, Decoder, DecodingResult};
