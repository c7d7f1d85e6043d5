//! `decode(encode(X)) == X` for a seed corpus of representative inputs, run
//! against both kernels through one shared pair of round-trip helpers.

use rand::SeedableRng;
use rand::RngCore;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::KernelConfig;
use crate::{lion, mandala};

fn assert_lion_round_trips(data: &[u8]) {
  let compressed = lion::compress(data, KernelConfig::default());
  let decompressed = lion::decompress(&compressed, data.len(), KernelConfig::default())
    .expect("lion decode");
  assert_eq!(decompressed, data);
}

fn assert_mandala_round_trips(data: &[u8]) {
  let compressed = mandala::compress(data, KernelConfig::default());
  let decompressed = mandala::decompress(&compressed, data.len(), KernelConfig::default())
    .expect("mandala decode");
  assert_eq!(decompressed, data);
}

fn assert_both_round_trip(data: &[u8]) {
  assert_lion_round_trips(data);
  assert_mandala_round_trips(data);
}

#[test]
fn test_empty_input() {
  assert_both_round_trip(&[]);

  // an empty stream is exactly one flushed signature word: the EOF
  // chunk-dict-A marker for Lion, an all-zero word for Mandala (nothing
  // was ever pushed), and no trailing bytes either way.
  let lion_bytes = lion::compress(&[], KernelConfig::default());
  assert_eq!(lion_bytes.len(), 8);
  let mandala_bytes = mandala::compress(&[], KernelConfig::default());
  assert_eq!(mandala_bytes.len(), 8);
}

#[test]
fn test_repeated_zeros_become_prediction_hits() {
  let data = vec![0_u8; 1024];
  assert_both_round_trip(&data);
}

#[test]
fn test_repeating_four_byte_pattern_populates_dictionary() {
  let mut data = Vec::new();
  for _ in 0..256 {
    data.extend_from_slice(&[0_u8, 1, 2, 3]);
  }
  assert_both_round_trip(&data);
}

#[test]
fn test_random_one_mebibyte_fixed_seed() {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
  let mut data = vec![0_u8; 1 << 20];
  rng.fill_bytes(&mut data);

  let first = lion::compress(&data, KernelConfig::default());
  let second = lion::compress(&data, KernelConfig::default());
  assert_eq!(first, second, "encode(X) must be a deterministic pure function of X");

  let decompressed = lion::decompress(&first, data.len(), KernelConfig::default()).unwrap();
  assert_eq!(decompressed, data);

  assert_mandala_round_trips(&data);
}

/// Finds two distinct nonzero chunks that hash to the same dictionary
/// bucket, then alternates them long enough to exercise the B-row swap.
fn find_colliding_pair() -> (u32, u32) {
  let a: u32 = 1;
  let ha = crate::hash::hash_chunk(a);
  let b = (2..u32::MAX)
    .find(|&x| crate::hash::hash_chunk(x) == ha)
    .expect("multiplicative hash has collisions within a small range");
  (a, b)
}

#[test]
fn test_alternating_b_row_swap_pattern() {
  let (a, b) = find_colliding_pair();
  let mut data = Vec::new();
  for _ in 0..64 {
    data.extend_from_slice(&a.to_le_bytes());
    data.extend_from_slice(&b.to_le_bytes());
  }
  assert_both_round_trip(&data);
}

#[test]
fn test_trailing_bytes_are_verbatim() {
  for trailing_len in 1..=3 {
    let mut data = vec![3_u8; 40];
    data.extend(std::iter::repeat(0x5A_u8).take(trailing_len));

    let lion_bytes = lion::compress(&data, KernelConfig::default());
    assert_eq!(&lion_bytes[lion_bytes.len() - trailing_len..], &data[data.len() - trailing_len..]);
    assert_lion_round_trips(&data);

    let mandala_bytes = mandala::compress(&data, KernelConfig::default());
    assert_eq!(&mandala_bytes[mandala_bytes.len() - trailing_len..], &data[data.len() - trailing_len..]);
    assert_mandala_round_trips(&data);
  }
}
