use std::hint::black_box;

use dyn_size_of::GetSize;
use huffman_codec::{decode, encode, Artifact, Encoder, Frequencies, Weight, SYMBOLS};

use crate::compare_texts;

pub fn benchmark(conf: &super::Conf, text: &[u8]) {
    conf.print_speed("Counting symbol occurrences", text.len(), conf.measure(||
        <[Weight; SYMBOLS]>::with_occurrences_of(text)
    ));
    let frequencies = <[Weight; SYMBOLS]>::with_occurrences_of(text);
    println!("Distinct symbols: {}, entropy: {:.3} bits/symbol",
        frequencies.number_of_occurring_values(), frequencies.entropy());

    let encoder = match Encoder::from_frequencies(&frequencies) {
        Ok(encoder) => encoder,
        Err(e) => { println!("Nothing to benchmark: {}", e); return; }
    };
    println!("Encoder construction time [ns]: {:.0}",
        conf.measure(|| Encoder::from_frequencies(&frequencies)) * 1e9);
    println!("Encoder size [bytes]: {}, longest codeword: {} bits, tree height: {}",
        encoder.size_bytes(), encoder.codes().max_len(), encoder.tree().height());

    conf.print_speed("Encoding", text.len(), conf.measure(|| encode(text)));
    let artifact = encode(text);
    let bytes = artifact.to_bytes();
    println!("Compressed size [bytes]: {} ({:.1}% of original; payload: {} bits = {:.3} bits/symbol)",
        bytes.len(), 100.0 * bytes.len() as f64 / text.len() as f64,
        artifact.payload_bits(), artifact.payload_bits() as f64 / text.len() as f64);

    conf.print_speed("Decoding", text.len(), conf.measure(|| {
        Artifact::from_bytes(&bytes).and_then(|a| decode(&a))
    }));

    if conf.verify {
        print!("Verification... ");
        match Artifact::from_bytes(&bytes).and_then(|a| decode(&a)) {
            Ok(decoded) => compare_texts(text, &decoded),
            Err(e) => println!("FAIL: {}", e)
        }
    }
    black_box(artifact);
}
