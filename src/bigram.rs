use crate::constants::BIGRAM_HASH_SIZE;
use crate::hash::hash_bigram;
use crate::signature::{SignatureReader, SignatureWriter};
use crate::unigram::UnigramTable;
use crate::errors::KernelResult;

/// Lion's single-slot, 8-bit-hashed bigram table: one remembered 16-bit
/// value per bucket, no MRU row beyond that.
pub struct BigramTable {
  slots: Vec<u16>,
}

impl BigramTable {
  pub fn new() -> Self {
    BigramTable { slots: vec![0_u16; BIGRAM_HASH_SIZE] }
  }

  pub fn reset(&mut self) {
    self.slots.iter_mut().for_each(|s| *s = 0);
  }

  pub fn update(&mut self, bigram: u16) {
    self.slots[hash_bigram(bigram) as usize] = bigram;
  }

  fn lookup(&self, bigram: u16) -> bool {
    self.slots[hash_bigram(bigram) as usize] == bigram
  }
}

impl Default for BigramTable {
  fn default() -> Self {
    Self::new()
  }
}

/// Decomposes a dictionary-missed chunk into its two on-the-wire bigrams
/// (low half, high half) plus the two table-maintenance-only bigrams
/// (interior, cross-boundary with the previous chunk).
pub fn chunk_bigrams(last_chunk: u32, chunk: u32) -> (u16, u16, u16, u16) {
  let bigram_a = (chunk & 0xFFFF) as u16;
  let bigram_c = ((chunk >> 16) & 0xFFFF) as u16;
  let bigram_b = ((chunk >> 8) & 0xFFFF) as u16;
  let bigram_p = ((last_chunk >> 24) | ((chunk & 0xFF) << 8)) as u16;
  (bigram_a, bigram_b, bigram_c, bigram_p)
}

/// Emits one on-the-wire bigram (`bigram_a` or `bigram_c`): a dictionary hit
/// as a flag bit plus an 8-bit hash, or a miss routed through the unigram
/// emitter with a bigram-plain fallback.
pub fn emit_bigram(writer: &mut SignatureWriter, table: &BigramTable, unigrams: &mut UnigramTable, bigram: u16) {
  if table.lookup(bigram) {
    writer.push(1, 1);
    writer.push_byte(hash_bigram(bigram));
    return;
  }

  let lo = (bigram & 0xFF) as u8;
  let hi = (bigram >> 8) as u8;
  let lo_code = unigrams.encode(lo);
  // the high byte is only looked up once the low byte actually produced a
  // code; a low-byte miss forces the plain fallback before `hi` is ever
  // consulted, so its table entry is left untouched.
  let hi_code = lo_code.and_then(|_| unigrams.encode(hi));

  match (lo_code, hi_code) {
    (Some(lo_c), Some(hi_c)) => {
      writer.push(0, 1);
      writer.push(0, 1); // secondary-encoded sub-flag: both bytes index-coded
      writer.push(lo_c.0, lo_c.1);
      writer.push(hi_c.0, hi_c.1);
    }
    _ => {
      writer.push(0, 1);
      writer.push(1, 1); // bigram-plain sub-flag
      writer.push_byte(lo);
      writer.push_byte(hi);
    }
  }
}

/// Decodes one on-the-wire bigram, mirroring `emit_bigram`.
pub fn read_bigram(reader: &mut SignatureReader, table: &BigramTable, unigrams: &mut UnigramTable) -> KernelResult<u16> {
  if reader.read_bit()? {
    let h = reader.read_byte()?;
    return Ok(table.slots[h as usize]);
  }

  if reader.read_bit()? {
    // bigram-plain: the encoder ran the unigram lookup on the low byte, and
    // only consulted the high byte if that lookup produced a code; replay
    // the identical conditional mutation here.
    let lo = reader.read_byte()?;
    let hi = reader.read_byte()?;
    let lo_code = unigrams.encode(lo);
    if lo_code.is_some() {
      unigrams.encode(hi);
    }
    Ok((lo as u16) | ((hi as u16) << 8))
  } else {
    let lo = unigrams.decode(reader)?;
    let hi = unigrams.decode(reader)?;
    Ok((lo as u16) | ((hi as u16) << 8))
  }
}
