use crate::config::KernelConfig;
use crate::constants::{BYTES_PER_CHUNK, MIN_OUTPUT_LOOKAHEAD, UNIT_BYTES};
use crate::dictionary::{Dictionary, Lookup};
use crate::errors::KernelResult;
use crate::location::OutputLocation;
use crate::signature::SignatureWriter;
use crate::state::{BlockCounters, ProcessLabel, StateCode};
use crate::teleport::Teleport;

const FLAG_PREDICTED: u64 = 0b00;
const FLAG_MAP_A: u64 = 0b01;
const FLAG_MAP_B: u64 = 0b10;
const FLAG_CHUNK: u64 = 0b11;

/// Resumable Mandala encoder. A slimmer sibling of [`crate::lion::LionEncoder`]:
/// same dictionary and block scheduler, but each chunk costs a fixed 2-bit
/// flag with no adaptive reordering and no bigram/unigram fallback.
pub struct MandalaEncoder {
  dict: Dictionary,
  writer: SignatureWriter,
  counters: BlockCounters,
  label: ProcessLabel,
  config: KernelConfig,
}

impl MandalaEncoder {
  pub fn new(config: KernelConfig) -> Self {
    tracing::debug!(?config, "initializing mandala encoder");
    let reset_cycle = config.reset_cycle;
    MandalaEncoder {
      dict: Dictionary::new(),
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

  fn encode_chunk(&mut self, chunk: u32) {
    let (lookup, hash) = self.dict.classify_and_update(chunk);
    match lookup {
      Lookup::Prediction => self.writer.push(FLAG_PREDICTED, 2),
      Lookup::RowA => {
        self.writer.push(FLAG_MAP_A, 2);
        self.writer.push_bytes(&hash.to_le_bytes());
      }
      Lookup::RowB => {
        self.writer.push(FLAG_MAP_B, 2);
        self.writer.push_bytes(&hash.to_le_bytes());
      }
      Lookup::Miss => {
        self.writer.push(FLAG_CHUNK, 2);
        self.writer.push_bytes(&chunk.to_le_bytes());
      }
    }
  }

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
                tracing::trace!("resetting dictionary for parallel-decompressible block boundary");
                self.dict.reset();
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

  /// Drains any trailing partial unit chunk by chunk, flushes the
  /// in-progress signature, then copies any final 1-3 leftover bytes
  /// verbatim. Mandala has no end-of-stream sentinel.
  pub fn finish(&mut self, input: &mut Teleport) {
    tracing::debug!("finishing mandala stream");
    while let Some(bytes) = input.read(BYTES_PER_CHUNK) {
      let chunk = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
      self.encode_chunk(chunk);
    }
    self.writer.flush_partial();
    let trailing = input.copy_remaining();
    self.writer.push_bytes(trailing);
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.writer.into_bytes()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_is_just_a_signature_word() {
    let bytes = crate::mandala::compress(&[], KernelConfig::default());
    assert_eq!(bytes.len(), 8);
  }
}
