//! The Mandala kernel: a simpler two-bit-flag sibling of Lion, sharing its
//! unit/signature/block framing but with no bigram/unigram decomposition --
//! a dictionary miss is emitted as a raw 4-byte chunk.

mod decode;
mod encode;

pub use decode::MandalaDecoder;
pub use encode::MandalaEncoder;

use crate::config::KernelConfig;
use crate::errors::KernelResult;
use crate::location::OutputLocation;
use crate::state::StateCode;
use crate::teleport::Teleport;

pub fn compress(data: &[u8], config: KernelConfig) -> Vec<u8> {
  let mut encoder = MandalaEncoder::new(config);
  let mut teleport = Teleport::new(data);
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

/// Mandala has no end-of-stream sentinel of its own; framing the end of the
/// stream is left entirely to the external
/// driver, so `original_len` is required here just as it is for Lion.
pub fn decompress(bytes: &[u8], original_len: usize, config: KernelConfig) -> KernelResult<Vec<u8>> {
  let mut decoder = MandalaDecoder::new(config);
  decoder.decode_all(bytes, original_len)
}
