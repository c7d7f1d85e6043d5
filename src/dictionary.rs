use crate::constants::CHUNK_HASH_SIZE;
use crate::hash::hash_chunk;

/// A dual-row MRU chunk slot. `chunk_a` is the more recently inserted value
/// for this hash bucket, `chunk_b` the one before it.
#[derive(Clone, Copy, Default)]
pub struct ChunkRow {
  pub chunk_a: u32,
  pub chunk_b: u32,
}

/// Outcome of looking a chunk up against the dictionary, already reflecting
/// the MRU swap that a hit performs.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
  Prediction,
  RowA,
  RowB,
  Miss,
}

/// The shared dictionary shape used by both kernels: a 64Ki-entry two-way
/// chunk table and a per-hash next-chunk predictor. Lion layers a bigram
/// table and a unigram rank table on top of this (see `bigram.rs`,
/// `unigram.rs`); Mandala uses this struct directly.
pub struct Dictionary {
  chunks: Vec<ChunkRow>,
  predictions: Vec<u32>,
  pub last_hash: u16,
  pub last_chunk: u32,
}

impl Dictionary {
  pub fn new() -> Self {
    let mut d = Dictionary {
      chunks: Vec::new(),
      predictions: Vec::new(),
      last_hash: 0,
      last_chunk: 0,
    };
    d.reset();
    d
  }

  /// Restores the dictionary to its fresh-init state: every row and
  /// prediction slot zeroed, last-seen chunk/hash cleared.
  pub fn reset(&mut self) {
    self.chunks = vec![ChunkRow::default(); CHUNK_HASH_SIZE];
    self.predictions = vec![0_u32; CHUNK_HASH_SIZE];
    self.last_hash = 0;
    self.last_chunk = 0;
  }

  #[cfg(test)]
  pub(crate) fn is_fresh(&self) -> bool {
    self.chunks.iter().all(|r| r.chunk_a == 0 && r.chunk_b == 0)
      && self.predictions.iter().all(|&p| p == 0)
  }

  pub fn row(&self, hash: u16) -> ChunkRow {
    self.chunks[hash as usize]
  }

  pub fn prediction_for(&self, hash: u16) -> u32 {
    self.predictions[hash as usize]
  }

  pub fn set_prediction(&mut self, hash: u16, chunk: u32) {
    self.predictions[hash as usize] = chunk;
  }

  /// Classifies `chunk` against the dictionary rows and the predictor keyed
  /// by `self.last_hash`, updating dictionary state as it goes. Returns the
  /// outcome; does not itself
  /// track which hash to use for payload (call `hash_chunk` separately when
  /// you need it for a miss/hit payload).
  pub fn classify_and_update(&mut self, chunk: u32) -> (Lookup, u16) {
    let h = hash_chunk(chunk);
    let lookup = if self.prediction_for(self.last_hash) == chunk {
      Lookup::Prediction
    } else {
      let row = self.row(h);
      if row.chunk_a == chunk {
        Lookup::RowA
      } else if row.chunk_b == chunk {
        Lookup::RowB
      } else {
        Lookup::Miss
      }
    };

    match lookup {
      Lookup::Prediction => {}
      Lookup::RowA => {
        self.set_prediction(self.last_hash, chunk);
      }
      Lookup::RowB => {
        let row = &mut self.chunks[h as usize];
        row.chunk_b = row.chunk_a;
        row.chunk_a = chunk;
        self.set_prediction(self.last_hash, chunk);
      }
      Lookup::Miss => {
        let row = &mut self.chunks[h as usize];
        row.chunk_b = row.chunk_a;
        row.chunk_a = chunk;
        self.set_prediction(self.last_hash, chunk);
      }
    }

    self.last_hash = h;
    self.last_chunk = chunk;
    (lookup, h)
  }
}

impl Default for Dictionary {
  fn default() -> Self {
    Self::new()
  }
}
