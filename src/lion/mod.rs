//! The Lion kernel: adaptive form-rank classification of 4-byte chunks,
//! backed by a dual-row dictionary, a next-chunk predictor, and a
//! bigram/unigram fallback for dictionary misses.

mod decode;
mod encode;

pub use decode::LionDecoder;
pub use encode::LionEncoder;

use crate::config::KernelConfig;
use crate::errors::KernelResult;
use crate::location::OutputLocation;
use crate::state::StateCode;
use crate::teleport::Teleport;

/// Compresses `data` end to end, driving the resumable scheduler to
/// completion. A thin convenience wrapper for callers who don't need to
/// pump partial buffers themselves; the true streaming entry points are
/// [`LionEncoder::continue_`] and [`LionEncoder::finish`].
pub fn compress(data: &[u8], config: KernelConfig) -> Vec<u8> {
  let mut encoder = LionEncoder::new(config);
  let mut teleport = Teleport::new(data);
  // an in-memory convenience call never needs to stall on output: give it
  // headroom far beyond anything a real run could consume.
  let mut out = OutputLocation::new(usize::MAX / 4);

  loop {
    match encoder.continue_(&mut teleport, &mut out).expect("unbounded output budget never stalls") {
      StateCode::StallOnInput => break,
      StateCode::StallOnOutput => unreachable!("output budget is effectively unbounded"),
      StateCode::InfoEfficiencyCheck | StateCode::InfoNewBlock | StateCode::Ready => {}
    }
  }
  encoder.finish(&mut teleport);
  encoder.into_bytes()
}

/// Decompresses a Lion stream produced by [`compress`]. `original_len` is
/// supplied by the external framing this kernel deliberately excludes from
/// its own scope; the kernel itself has no way to tell "one more real
/// chunk" from "the end-of-stream marker" without it.
pub fn decompress(bytes: &[u8], original_len: usize, config: KernelConfig) -> KernelResult<Vec<u8>> {
  let mut decoder = LionDecoder::new(config);
  decoder.decode_all(bytes, original_len)
}
