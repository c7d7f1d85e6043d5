use crate::bigram::{chunk_bigrams, read_bigram, BigramTable};
use crate::config::KernelConfig;
use crate::constants::{BYTES_PER_CHUNK, CHUNKS_PER_UNIT};
use crate::dictionary::Dictionary;
use crate::errors::KernelResult;
use crate::form::{FormId, FormTable};
use crate::signature::SignatureReader;
use crate::state::BlockCounters;
use crate::unigram::UnigramTable;

/// Mirror image of [`super::LionEncoder`]. Kept in lockstep with the
/// encoder's dictionary/bigram/unigram/form-rank state by replaying the
/// identical sequence of table mutations as each chunk is decoded.
pub struct LionDecoder {
  dict: Dictionary,
  bigrams: BigramTable,
  unigrams: UnigramTable,
  forms: FormTable,
  counters: BlockCounters,
  config: KernelConfig,
}

impl LionDecoder {
  pub fn new(config: KernelConfig) -> Self {
    tracing::debug!(?config, "initializing lion decoder");
    let reset_cycle = config.reset_cycle;
    LionDecoder {
      dict: Dictionary::new(),
      bigrams: BigramTable::new(),
      unigrams: UnigramTable::new(),
      forms: FormTable::new(),
      counters: BlockCounters::new(reset_cycle),
      config,
    }
  }

  fn reset_block_dictionaries(&mut self) {
    tracing::trace!("resetting dictionary for parallel-decompressible block boundary");
    self.dict.reset();
    self.bigrams.reset();
    self.unigrams.reset();
  }

  /// Decodes one chunk, returning its 4 little-endian bytes. Mirrors
  /// `LionEncoder::encode_chunk` exactly: each branch below reads precisely
  /// what the matching encoder branch wrote, in the same order.
  fn decode_chunk(&mut self, reader: &mut SignatureReader) -> KernelResult<[u8; 4]> {
    let form = self.forms.decode(reader)?;
    let prev_chunk = self.dict.last_chunk;

    let chunk = match form {
      FormId::ChunkPrediction => self.dict.prediction_for(self.dict.last_hash),
      FormId::ChunkDictA => {
        let h = reader.read_u16_le()?;
        self.dict.row(h).chunk_a
      }
      FormId::ChunkDictB => {
        let h = reader.read_u16_le()?;
        self.dict.row(h).chunk_b
      }
      FormId::SecondaryAccess => {
        let bigram_a = read_bigram(reader, &self.bigrams, &mut self.unigrams)?;
        let bigram_c = read_bigram(reader, &self.bigrams, &mut self.unigrams)?;
        let chunk = (bigram_a as u32) | ((bigram_c as u32) << 16);
        let (ba, bb, bc, bp) = chunk_bigrams(prev_chunk, chunk);
        self.bigrams.update(bp);
        self.bigrams.update(ba);
        self.bigrams.update(bb);
        self.bigrams.update(bc);
        chunk
      }
    };

    self.dict.classify_and_update(chunk);
    Ok(chunk.to_le_bytes())
  }

  /// Runs the block scheduler's bookkeeping for one unit. The decoder has
  /// no output-budget concept of its own (the whole encoded buffer is
  /// already addressable), so this only replays the signature-count-driven
  /// dictionary reset cadence, not the stall/backpressure machinery.
  fn advance_block_counters(&mut self) {
    if self.counters.signatures_in_block >= self.config.block_signatures {
      self.counters.signatures_in_block = 0;
      self.counters.efficiency_checked = false;
      if self.config.parallel_decompressible {
        if self.counters.reset_cycle_remaining == 0 {
          self.reset_block_dictionaries();
          self.counters.reset_cycle_remaining = self.config.reset_cycle.saturating_sub(1);
        } else {
          self.counters.reset_cycle_remaining -= 1;
        }
      }
    }
    self.counters.signatures_in_block += 1;
  }

  /// Decodes an entire stream given the original uncompressed length (see
  /// [`super::decompress`] for why the kernel needs this from its caller).
  pub fn decode_all(&mut self, bytes: &[u8], original_len: usize) -> KernelResult<Vec<u8>> {
    tracing::debug!(compressed_len = bytes.len(), original_len, "decoding lion stream");
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

    // consume the end-of-stream sentinel's rank code (no payload follows it)
    self.forms.decode(&mut reader)?;

    if trailing > 0 {
      let tail = reader.read_bytes(trailing)?;
      out.extend_from_slice(tail);
    }

    Ok(out)
  }
}
