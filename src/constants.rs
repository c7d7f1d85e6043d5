//! Wire-format constants. Changing any of these breaks bit-for-bit
//! compatibility with streams produced by an earlier version.

/// Bits of the chunk hash used to index the dictionary's chunk/prediction rows.
pub const CHUNK_HASH_BITS: u32 = 16;
pub const CHUNK_HASH_SIZE: usize = 1 << CHUNK_HASH_BITS;

/// Bits of the bigram hash used to index Lion's single-row bigram table.
pub const BIGRAM_HASH_BITS: u32 = 8;
pub const BIGRAM_HASH_SIZE: usize = 1 << BIGRAM_HASH_BITS;

/// Fixed multiplicative hash constant shared by chunk and bigram hashing.
/// This is the well-known 2^32 golden-ratio constant used throughout this
/// codec family; see `hash.rs` for how it's applied.
pub const MULT32: u32 = 0x9E37_79B1;

pub const CHUNKS_PER_UNIT: usize = 8;
pub const BYTES_PER_CHUNK: usize = 4;
pub const UNIT_BYTES: usize = CHUNKS_PER_UNIT * BYTES_PER_CHUNK;

pub const SIGNATURE_WORD_BYTES: usize = 8;
pub const SIGNATURE_WORD_BITS: u32 = 64;

/// Size of the move-to-front unigram rank table (one entry per possible byte).
pub const UNIGRAM_POOL_SIZE: usize = 256;
/// Ranks at or above this are never index-coded; the containing bigram falls
/// back to a plain 2-byte literal instead.
pub const UNIGRAM_PLAIN_RANK_THRESHOLD: usize = 32;

/// Signatures per block before a forced `INFO_NEW_BLOCK` interrupt.
/// Not recoverable from the retained source fragments (only kernel bodies,
/// not the header defining these constants, were available) -- documented
/// as a resolved placeholder in DESIGN.md rather than claimed bit-identical
/// to any particular reference build.
pub const PREFERRED_BLOCK_SIGNATURES: u32 = 4096;
/// Signature count within a block at which an efficiency check interrupt fires.
pub const PREFERRED_EFFICIENCY_CHECK_SIGNATURES: u32 = 256;
/// Number of blocks between forced dictionary resets in parallel-decompressible mode.
pub const PREFERRED_RESET_CYCLE: u32 = 256;

/// Worst case a single unit (8 chunks) can emit: one signature word reservation
/// plus 8 chunks each expanding to at most two dictionary-miss bigrams, each of
/// which can cost at most 2 raw bytes (bigram-plain fallback).
pub const MIN_OUTPUT_LOOKAHEAD: usize =
  SIGNATURE_WORD_BYTES + CHUNKS_PER_UNIT * 2 * 2;
