#![doc = include_str!("../README.md")]
mod codec;

use std::{hint::black_box, path::PathBuf, time::Instant};

use clap::{Parser, Subcommand};

use rand::prelude::*;
use rand::distributions::WeightedIndex;
use rand_pcg::Pcg64Mcg;

#[derive(Subcommand)]
pub enum Source {
    /// Pseudo-random text with the given number of symbols and spread
    #[clap(visible_alias = "r")]
    Random {
        /// Length of the test text
        #[arg(short = 'l', long, default_value_t = 1024*1024)]
        len: usize,

        /// Number of different symbols in the test text.
        #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u16).range(1..=256))]
        symbols: u16,

        /// The spread of the number of symbols (0 for all about equal).
        /// Each successive symbol occurs 1+SPREAD/1000 times more often than the previous one.
        #[arg(short = 'r', long, default_value_t = 100)]
        spread: u32,

        /// Seed for random number generators
        #[arg(short='s', long, default_value_t = 1234)]
        seed: u64,
    },
    /// Content of the given file
    #[clap(visible_alias = "f")]
    File {
        /// Path to the file to compress
        path: PathBuf
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, infer_subcommands=true)]
/// Huffman coding benchmark.
pub struct Conf {
    /// Source of the text to compress
    #[command(subcommand)]
    pub source: Source,

    /// Time (in seconds) of measuring and warming up the CPU cache before measuring
    #[arg(short='t', long, default_value_t = 5)]
    pub time: u16,

    /// Whether to check the validity
    #[arg(long, default_value_t = false)]
    pub verify: bool,
}

/// Returns pseudo-random text of length `len` that consists of `symbols` different symbols,
/// each successive symbol occurring `spread` times more often than the previous one.
fn random_text(len: usize, symbols: u16, spread: u32, seed: u64) -> Box<[u8]> {
    if len <= symbols as usize { return (0..len).map(|v| v as u8).collect(); }
    let spread = 1.0 + spread as f64*0.001;
    let weights: Vec<_> = (1..=symbols as i32).map(|v| spread.powi(v)).collect();
    let rng = Pcg64Mcg::seed_from_u64(seed);
    match WeightedIndex::new(weights) {
        Ok(dist) => (0u8..=(symbols-1) as u8).chain(
            dist.sample_iter(rng).map(|v| v as u8).take(len - symbols as usize)
        ).collect(),
        Err(_) => (0..len).map(|v| (v % symbols as usize) as u8).collect()
    }
}

impl Conf {
    /// Returns the text for testing.
    fn text(&self) -> std::io::Result<Box<[u8]>> {
        Ok(match &self.source {
            Source::Random { len, symbols, spread, seed } => random_text(*len, *symbols, *spread, *seed),
            Source::File { path } => std::fs::read(path)?.into_boxed_slice()
        })
    }

    #[inline(always)] fn measure<R, F>(&self, mut f: F) -> f64
     where F: FnMut() -> R
    {
        let mut iters = 1;
        if self.time > 0 {
            let time = Instant::now();
            loop {
                black_box(f());
                if time.elapsed().as_secs() > self.time as u64 { break; }
                iters += 1;
            }
        }
        let start_moment = Instant::now();
        for _ in 0..iters { black_box(f()); }
        start_moment.elapsed().as_secs_f64() / iters as f64
    }

    fn print_speed(&self, label: &str, len: usize, sec: f64) {
        let mb = len as f64 / (1024 * 1024) as f64;
        println!("{}: {:.0} mb/sec", label, mb / sec);
    }
}

fn compare_texts(original: &[u8], decoded: &[u8]) {
    if original.len() == decoded.len() {
        for (i, (e, g)) in original.iter().zip(decoded).enumerate() {
            if e != g {
                println!("FAIL: decoded text at index {} has {}, while the original has {}", i, g, e);
                return;
            }
        }
    } else {
        println!("FAIL: decoded text has length {} different from original {}", decoded.len(), original.len());
    }
    println!("DONE")
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let conf: Conf = Conf::parse();
    let text = conf.text()?;
    log::info!("benchmarking text of {} bytes", text.len());
    codec::benchmark(&conf, &text);
    Ok(())
}
