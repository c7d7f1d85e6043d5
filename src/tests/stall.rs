//! Drives the resumable scheduler through arbitrary stall/refill points and
//! checks the output is byte-identical to a single-shot call -- stall
//! idempotence: wherever a `continue_` call gets cut off on a short read,
//! resuming it must produce exactly the bytes a single uninterrupted call
//! would have.

use crate::config::KernelConfig;
use crate::lion::{compress as lion_compress, LionEncoder};
use crate::location::OutputLocation;
use crate::mandala::{compress as mandala_compress, MandalaEncoder};
use crate::state::StateCode;
use crate::teleport::Teleport;

/// Feeds `data` to `encoder` in growing windows sized by `slice_lens`
/// (wrapping around once exhausted), calling `continue_` to exhaustion
/// between each feed so every feed boundary is a genuine `StallOnInput`.
fn drive_lion(data: &[u8], slice_lens: &[usize]) -> Vec<u8> {
  let mut encoder = LionEncoder::new(KernelConfig::default());
  let mut consumed = 0_usize;
  let mut fed = 0_usize;
  let mut slice_idx = 0_usize;

  loop {
    fed = (fed + slice_lens[slice_idx % slice_lens.len()]).min(data.len());
    slice_idx += 1;

    let mut teleport = Teleport::new(&data[consumed..fed]);
    let mut out = OutputLocation::new(1 << 20);
    loop {
      match encoder.continue_(&mut teleport, &mut out).unwrap() {
        StateCode::StallOnInput => break,
        StateCode::StallOnOutput => unreachable!("output budget is generous"),
        StateCode::InfoEfficiencyCheck | StateCode::InfoNewBlock | StateCode::Ready => {}
      }
    }
    consumed = fed - teleport.available();

    if fed == data.len() {
      break;
    }
  }

  let mut tail = Teleport::new(&data[consumed..]);
  encoder.finish(&mut tail);
  encoder.into_bytes()
}

fn drive_mandala(data: &[u8], slice_lens: &[usize]) -> Vec<u8> {
  let mut encoder = MandalaEncoder::new(KernelConfig::default());
  let mut consumed = 0_usize;
  let mut fed = 0_usize;
  let mut slice_idx = 0_usize;

  loop {
    fed = (fed + slice_lens[slice_idx % slice_lens.len()]).min(data.len());
    slice_idx += 1;

    let mut teleport = Teleport::new(&data[consumed..fed]);
    let mut out = OutputLocation::new(1 << 20);
    loop {
      match encoder.continue_(&mut teleport, &mut out).unwrap() {
        StateCode::StallOnInput => break,
        StateCode::StallOnOutput => unreachable!("output budget is generous"),
        StateCode::InfoEfficiencyCheck | StateCode::InfoNewBlock | StateCode::Ready => {}
      }
    }
    consumed = fed - teleport.available();

    if fed == data.len() {
      break;
    }
  }

  let mut tail = Teleport::new(&data[consumed..]);
  encoder.finish(&mut tail);
  encoder.into_bytes()
}

fn sample_data() -> Vec<u8> {
  let mut data = Vec::new();
  for i in 0..2000_u32 {
    data.extend_from_slice(&(i % 37).to_le_bytes());
  }
  data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
  data
}

#[test]
fn test_lion_stall_idempotence() {
  let data = sample_data();
  let one_shot = lion_compress(&data, KernelConfig::default());

  for slice_lens in [
    &[1_usize][..],
    &[3, 7, 1, 32][..],
    &[17][..],
    &[data.len()][..],
    &[5, 5, 5, 5, 5, 5, 5, 5][..],
  ] {
    let staged = drive_lion(&data, slice_lens);
    assert_eq!(staged, one_shot, "slice_lens={:?}", slice_lens);
  }
}

#[test]
fn test_mandala_stall_idempotence() {
  let data = sample_data();
  let one_shot = mandala_compress(&data, KernelConfig::default());

  for slice_lens in [
    &[1_usize][..],
    &[3, 7, 1, 32][..],
    &[17][..],
    &[data.len()][..],
  ] {
    let staged = drive_mandala(&data, slice_lens);
    assert_eq!(staged, one_shot, "slice_lens={:?}", slice_lens);
  }
}
