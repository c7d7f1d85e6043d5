use crate::config::KernelConfig;
use crate::constants::{BYTES_PER_CHUNK, CHUNKS_PER_UNIT};
use crate::dictionary::Dictionary;
use crate::errors::{KernelError, KernelResult};
use crate::signature::SignatureReader;
use crate::state::BlockCounters;

const FLAG_PREDICTED: u64 = 0b00;
const FLAG_MAP_A: u64 = 0b01;
const FLAG_MAP_B: u64 = 0b10;
const FLAG_CHUNK: u64 = 0b11;

/// Mirror image of [`super::MandalaEncoder`]. Derived from scratch since
/// the encoder and decoder must classify each chunk identically, including
/// its effect on the dictionary and predictor, for the stream to be
/// recoverable.
pub struct MandalaDecoder {
  dict: Dictionary,
  counters: BlockCounters,
  config: KernelConfig,
}

impl MandalaDecoder {
  pub fn new(config: KernelConfig) -> Self {
    tracing::debug!(?config, "initializing mandala decoder");
    let reset_cycle = config.reset_cycle;
    MandalaDecoder {
      dict: Dictionary::new(),
      counters: BlockCounters::new(reset_cycle),
      config,
    }
  }

  fn decode_chunk(&mut self, reader: &mut SignatureReader) -> KernelResult<[u8; 4]> {
    let flag = reader.read_bits(2)?;
    let chunk = match flag {
      FLAG_PREDICTED => self.dict.prediction_for(self.dict.last_hash),
      FLAG_MAP_A => {
        let h = reader.read_u16_le()?;
        self.dict.row(h).chunk_a
      }
      FLAG_MAP_B => {
        let h = reader.read_u16_le()?;
        self.dict.row(h).chunk_b
      }
      FLAG_CHUNK => reader.read_u32_le()?,
      _ => return Err(KernelError::corruption("invalid mandala signature flag")),
    };
    self.dict.classify_and_update(chunk);
    Ok(chunk.to_le_bytes())
  }

  fn advance_block_counters(&mut self) {
    if self.counters.signatures_in_block >= self.config.block_signatures {
      self.counters.signatures_in_block = 0;
      self.counters.efficiency_checked = false;
      if self.config.parallel_decompressible {
        if self.counters.reset_cycle_remaining == 0 {
          tracing::trace!("resetting dictionary for parallel-decompressible block boundary");
          self.dict.reset();
          self.counters.reset_cycle_remaining = self.config.reset_cycle.saturating_sub(1);
        } else {
          self.counters.reset_cycle_remaining -= 1;
        }
      }
    }
    self.counters.signatures_in_block += 1;
  }

  pub fn decode_all(&mut self, bytes: &[u8], original_len: usize) -> KernelResult<Vec<u8>> {
    tracing::debug!(compressed_len = bytes.len(), original_len, "decoding mandala stream");
    let mut reader = SignatureReader::new(bytes);
    let mut out = Vec::with_capacity(original_len);

    let full_chunks = original_len / BYTES_PER_CHUNK;
    let trailing = original_len % BYTES_PER_CHUNK;

    let mut chunks_left = full_chunks;
    while chunks_left >= CHUNKS_PER_UNIT {
      self.advance_block_counters();
      for _ in 0..CHUNKS_PER_UNIT {
        out.extend_from_slice(&self.decode_chunk(&mut reader)?);
      }
      chunks_left -= CHUNKS_PER_UNIT;
    }
    if chunks_left > 0 {
      self.advance_block_counters();
      for _ in 0..chunks_left {
        out.extend_from_slice(&self.decode_chunk(&mut reader)?);
      }
    }

    if trailing > 0 {
      let tail = reader.read_bytes(trailing)?;
      out.extend_from_slice(tail);
    }

    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mandala::compress;

  #[test]
  fn test_round_trip_empty() {
    let compressed = compress(&[], KernelConfig::default());
    let decoded = MandalaDecoder::new(KernelConfig::default())
      .decode_all(&compressed, 0)
      .unwrap();
    assert_eq!(decoded, Vec::<u8>::new());
  }

  #[test]
  fn test_round_trip_repeated_zeros() {
    let data = vec![0_u8; 1024];
    let compressed = compress(&data, KernelConfig::default());
    let decoded = MandalaDecoder::new(KernelConfig::default())
      .decode_all(&compressed, data.len())
      .unwrap();
    assert_eq!(decoded, data);
  }

  #[test]
  fn test_round_trip_repeating_pattern() {
    let mut data = Vec::new();
    for _ in 0..256 {
      data.extend_from_slice(&[4_u8, 5, 6, 7]);
    }
    let compressed = compress(&data, KernelConfig::default());
    let decoded = MandalaDecoder::new(KernelConfig::default())
      .decode_all(&compressed, data.len())
      .unwrap();
    assert_eq!(decoded, data);
  }

  #[test]
  fn test_round_trip_b_row_swap() {
    let mut dataset = Vec::new();
    let a: u32 = 1;
    let b = (0..u32::MAX)
      .find(|&x| x != a && x != 0 && crate::hash::hash_chunk(x) == crate::hash::hash_chunk(a))
      .unwrap();
    for _ in 0..32 {
      dataset.extend_from_slice(&a.to_le_bytes());
      dataset.extend_from_slice(&b.to_le_bytes());
    }
    let compressed = compress(&dataset, KernelConfig::default());
    let decoded = MandalaDecoder::new(KernelConfig::default())
      .decode_all(&compressed, dataset.len())
      .unwrap();
    assert_eq!(decoded, dataset);
  }

  #[test]
  fn test_round_trip_trailing_bytes() {
    for trailing_len in 1..=3 {
      let mut data = vec![9_u8; 40];
      data.extend(std::iter::repeat(0x11_u8).take(trailing_len));
      let compressed = compress(&data, KernelConfig::default());
      let decoded = MandalaDecoder::new(KernelConfig::default())
        .decode_all(&compressed, data.len())
        .unwrap();
      assert_eq!(decoded, data, "trailing_len={}", trailing_len);
    }
  }
}
