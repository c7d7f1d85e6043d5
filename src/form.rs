use crate::signature::{SignatureReader, SignatureWriter};
use crate::errors::KernelResult;

/// The four classifications a Lion chunk emission can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormId {
  SecondaryAccess,
  ChunkDictA,
  ChunkDictB,
  ChunkPrediction,
}

const FORMS: [FormId; 4] = [
  FormId::SecondaryAccess,
  FormId::ChunkDictA,
  FormId::ChunkDictB,
  FormId::ChunkPrediction,
];

fn form_index(f: FormId) -> usize {
  match f {
    FormId::SecondaryAccess => 0,
    FormId::ChunkDictA => 1,
    FormId::ChunkDictB => 2,
    FormId::ChunkPrediction => 3,
  }
}

#[derive(Clone, Copy, Default)]
struct FormStats {
  usage: u32,
  rank: u8,
}

/// Adaptive entropy coder over the four forms: a prefix-free code keyed by
/// *rank*, with ranks reordered by an adjacent bubble-up after each use.
/// Rank 0 costs 1 bit, rank 1 costs 2 bits, ranks 2 and 3 cost 3 bits each.
pub struct FormTable {
  stats: [FormStats; 4],
  rank_to_form: [FormId; 4],
}

impl FormTable {
  pub fn new() -> Self {
    let mut t = FormTable {
      stats: [FormStats::default(); 4],
      rank_to_form: FORMS,
    };
    t.reset();
    t
  }

  pub fn reset(&mut self) {
    // fixed initial ranks
    self.rank_to_form = [
      FormId::SecondaryAccess,
      FormId::ChunkDictA,
      FormId::ChunkDictB,
      FormId::ChunkPrediction,
    ];
    for (i, &f) in self.rank_to_form.iter().enumerate() {
      self.stats[form_index(f)] = FormStats { usage: 0, rank: i as u8 };
    }
  }

  fn rank_of(&self, f: FormId) -> usize {
    self.stats[form_index(f)].rank as usize
  }

  /// Applies the post-emission mutation: bubble the form up one rank if its
  /// *pre-increment* usage already exceeds its neighbor's, then increment
  /// usage. Comparing before the increment means a tie never swaps.
  fn bump(&mut self, f: FormId, rank: usize) {
    if rank > 0 {
      let neighbor = self.rank_to_form[rank - 1];
      if self.stats[form_index(f)].usage > self.stats[form_index(neighbor)].usage {
        self.rank_to_form.swap(rank - 1, rank);
        self.stats[form_index(f)].rank = (rank - 1) as u8;
        self.stats[form_index(neighbor)].rank = rank as u8;
      }
    }
    self.stats[form_index(f)].usage += 1;
  }

  /// Encodes `f`, emitting the code for its *current* rank, then mutating.
  pub fn encode(&mut self, writer: &mut SignatureWriter, f: FormId) {
    let rank = self.rank_of(f);
    push_rank_code(writer, rank);
    self.bump(f, rank);
  }

  /// Snapshot of the current rank-to-form assignment, for verifying the
  /// rank invariant from outside this module.
  #[cfg(test)]
  pub(crate) fn rank_to_form_snapshot(&self) -> [FormId; 4] {
    self.rank_to_form
  }

  /// The rank currently recorded in `f`'s own stats entry.
  #[cfg(test)]
  pub(crate) fn stats_rank(&self, f: FormId) -> u8 {
    self.stats[form_index(f)].rank
  }

  /// Decodes a form: reads the rank code, resolves it against the table as
  /// it stands *before* this event (mirroring the encoder), then applies
  /// the identical mutation.
  pub fn decode(&mut self, reader: &mut SignatureReader) -> KernelResult<FormId> {
    let rank = read_rank_code(reader)?;
    let f = self.rank_to_form[rank];
    self.bump(f, rank);
    Ok(f)
  }
}

impl Default for FormTable {
  fn default() -> Self {
    Self::new()
  }
}

fn push_rank_code(writer: &mut SignatureWriter, rank: usize) {
  match rank {
    0 => writer.push(0b0, 1),
    1 => writer.push(0b01, 2),
    2 => writer.push(0b011, 3),
    3 => writer.push(0b111, 3),
    _ => unreachable!("rank out of range"),
  }
}

fn read_rank_code(reader: &mut SignatureReader) -> KernelResult<usize> {
  if !reader.read_bit()? {
    return Ok(0);
  }
  if !reader.read_bit()? {
    return Ok(1);
  }
  if !reader.read_bit()? {
    Ok(2)
  } else {
    Ok(3)
  }
}
