use crate::bigram::{chunk_bigrams, emit_bigram, BigramTable};
use crate::config::KernelConfig;
use crate::constants::{BYTES_PER_CHUNK, MIN_OUTPUT_LOOKAHEAD, UNIT_BYTES};
use crate::dictionary::{Dictionary, Lookup};
use crate::errors::KernelResult;
use crate::form::{FormId, FormTable};
use crate::location::OutputLocation;
use crate::signature::SignatureWriter;
use crate::state::{BlockCounters, ProcessLabel, StateCode};
use crate::teleport::Teleport;
use crate::unigram::UnigramTable;

/// Resumable Lion encoder. Owns every piece of per-stream state described in
/// the dictionary, the bigram and unigram tables,
/// the adaptive form-rank coder, the in-progress signature, and the saved
/// process label that lets `continue_` pick up where a prior call stalled.
pub struct LionEncoder {
  dict: Dictionary,
  bigrams: BigramTable,
  unigrams: UnigramTable,
  forms: FormTable,
  writer: SignatureWriter,
  counters: BlockCounters,
  label: ProcessLabel,
  config: KernelConfig,
}

impl LionEncoder {
  pub fn new(config: KernelConfig) -> Self {
    tracing::debug!(?config, "initializing lion encoder");
    let reset_cycle = config.reset_cycle;
    LionEncoder {
      dict: Dictionary::new(),
      bigrams: BigramTable::new(),
      unigrams: UnigramTable::new(),
      forms: FormTable::new(),
      writer: SignatureWriter::default(),
      counters: BlockCounters::new(reset_cycle),
      label: ProcessLabel::PrepareNewBlock,
      config,
    }
  }

  pub fn byte_size(&self) -> usize {
    self.writer.byte_size()
  }

  /// Whether the dictionary is currently in its fresh-init state, for
  /// verifying the block-reset property.
  #[cfg(test)]
  pub(crate) fn dict_is_fresh(&self) -> bool {
    self.dict.is_fresh()
  }

  fn reset_block_dictionaries(&mut self) {
    tracing::trace!("resetting dictionary for parallel-decompressible block boundary");
    self.dict.reset();
    self.bigrams.reset();
    self.unigrams.reset();
  }

  /// Encodes one 4-byte chunk: classifies it against the dictionary and
  /// predictor, emits the form code, and for a dictionary miss runs the
  /// bigram/unigram fallback pipeline.
  fn encode_chunk(&mut self, chunk: u32) {
    let prev_chunk = self.dict.last_chunk;
    let (lookup, hash) = self.dict.classify_and_update(chunk);

    match lookup {
      Lookup::Prediction => {
        self.forms.encode(&mut self.writer, FormId::ChunkPrediction);
      }
      Lookup::RowA => {
        self.forms.encode(&mut self.writer, FormId::ChunkDictA);
        self.writer.push_bytes(&hash.to_le_bytes());
      }
      Lookup::RowB => {
        self.forms.encode(&mut self.writer, FormId::ChunkDictB);
        self.writer.push_bytes(&hash.to_le_bytes());
      }
      Lookup::Miss => {
        self.forms.encode(&mut self.writer, FormId::SecondaryAccess);
        let (bigram_a, bigram_b, bigram_c, bigram_p) = chunk_bigrams(prev_chunk, chunk);
        emit_bigram(&mut self.writer, &self.bigrams, &mut self.unigrams, bigram_a);
        emit_bigram(&mut self.writer, &self.bigrams, &mut self.unigrams, bigram_c);
        self.bigrams.update(bigram_p);
        self.bigrams.update(bigram_a);
        self.bigrams.update(bigram_b);
        self.bigrams.update(bigram_c);
      }
    }
  }

  /// Runs the block/unit scheduler until it must
  /// stall, or until an efficiency-check / new-block interrupt needs the
  /// caller's attention. Safe to call again after either: it resumes from
  /// the saved process label.
  pub fn continue_(&mut self, input: &mut Teleport, out: &mut OutputLocation) -> KernelResult<StateCode> {
    loop {
      // number of 64-bit signature words actually flushed since the current
      // block started, per spec §3's `count_since_new_block` -- not a count
      // of units processed.
      let signatures_in_block = self.writer.signatures_flushed() - self.counters.block_start_signatures;

      match self.label {
        ProcessLabel::PrepareNewBlock => {
          if !out.has_room_for(MIN_OUTPUT_LOOKAHEAD) {
            tracing::trace!(available = out.available(), "stalling on output at PREPARE_NEW_BLOCK");
            return Ok(StateCode::StallOnOutput);
          }
          if !self.counters.efficiency_checked
            && signatures_in_block == self.config.efficiency_check_signatures as u64
          {
            self.counters.efficiency_checked = true;
            tracing::trace!("efficiency check interrupt");
            return Ok(StateCode::InfoEfficiencyCheck);
          }
          if signatures_in_block >= self.config.block_signatures as u64 {
            self.counters.block_start_signatures = self.writer.signatures_flushed();
            self.counters.efficiency_checked = false;
            if self.config.parallel_decompressible {
              if self.counters.reset_cycle_remaining == 0 {
                self.reset_block_dictionaries();
                self.counters.reset_cycle_remaining = self.config.reset_cycle.saturating_sub(1);
              } else {
                self.counters.reset_cycle_remaining -= 1;
              }
            }
            tracing::trace!("new block interrupt");
            return Ok(StateCode::InfoNewBlock);
          }
          self.label = ProcessLabel::CheckSignatureState;
        }
        ProcessLabel::CheckSignatureState => {
          if !out.has_room_for(MIN_OUTPUT_LOOKAHEAD) {
            tracing::trace!(available = out.available(), "stalling on output at CHECK_SIGNATURE_STATE");
            return Ok(StateCode::StallOnOutput);
          }
          // a unit processed since the last visit to PREPARE_NEW_BLOCK may
          // have flushed enough signature words to cross a threshold;
          // route back there to raise the interrupt before reading more.
          if signatures_in_block >= self.config.block_signatures as u64
            || (!self.counters.efficiency_checked
              && signatures_in_block >= self.config.efficiency_check_signatures as u64)
          {
            self.label = ProcessLabel::PrepareNewBlock;
            continue;
          }
          self.label = ProcessLabel::ReadChunk;
        }
        ProcessLabel::ReadChunk => {
          let unit = match input.read(UNIT_BYTES) {
            Some(u) => u,
            None => {
              tracing::trace!("stalling on input at READ_CHUNK");
              return Ok(StateCode::StallOnInput);
            }
          };
          for chunk_bytes in unit.chunks_exact(BYTES_PER_CHUNK) {
            let chunk = u32::from_le_bytes([
              chunk_bytes[0],
              chunk_bytes[1],
              chunk_bytes[2],
              chunk_bytes[3],
            ]);
            self.encode_chunk(chunk);
          }
          out.advance(MIN_OUTPUT_LOOKAHEAD.min(out.available()));
          self.label = ProcessLabel::CheckSignatureState;
        }
      }
    }
  }

  /// Drains any input shorter than a full unit, chunk by chunk, then emits
  /// the end-of-stream sentinel and copies the final 1-3 leftover bytes
  /// verbatim.
  pub fn finish(&mut self, input: &mut Teleport) {
    tracing::debug!("finishing lion stream");
    while let Some(bytes) = input.read(BYTES_PER_CHUNK) {
      let chunk = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
      self.encode_chunk(chunk);
    }

    // end-of-stream sentinel: reuses the chunk-dict-A rank code with no
    // payload, recognized by the decoder's symmetric finish() because it
    // already knows how many real chunks remain from the external length.
    self.forms.encode(&mut self.writer, FormId::ChunkDictA);
    self.writer.flush_partial();

    let trailing = input.copy_remaining();
    self.writer.push_bytes(trailing);
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.writer.into_bytes()
  }
}
