/// The kernel's observable return value after a `continue`/`finish` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateCode {
  Ready,
  StallOnInput,
  StallOnOutput,
  InfoEfficiencyCheck,
  InfoNewBlock,
}

/// Resumption point of the block/unit scheduler, saved across stalls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessLabel {
  PrepareNewBlock,
  CheckSignatureState,
  ReadChunk,
}

/// Per-stream bookkeeping for the block/efficiency-check/reset-cycle cadence
/// shared by the encode and decode schedulers.
///
/// `signatures_in_block` on the encoder side is *derived*, not incremented
/// directly: it's the number of 64-bit signature words actually flushed
/// since `block_start_signatures`, per spec §3's `count_since_new_block`.
/// The decoder has no flush machinery of its own and keeps counting units.
#[derive(Clone, Copy)]
pub struct BlockCounters {
  pub signatures_in_block: u32,
  pub block_start_signatures: u64,
  pub efficiency_checked: bool,
  pub reset_cycle_remaining: u32,
}

impl BlockCounters {
  pub fn new(preferred_reset_cycle: u32) -> Self {
    BlockCounters {
      signatures_in_block: 0,
      block_start_signatures: 0,
      efficiency_checked: false,
      reset_cycle_remaining: preferred_reset_cycle,
    }
  }
}
