use crate::constants::{
  PREFERRED_BLOCK_SIGNATURES, PREFERRED_EFFICIENCY_CHECK_SIGNATURES, PREFERRED_RESET_CYCLE,
};

/// Tunables for a kernel stream that aren't baked into the wire format
/// itself but still need a typed home.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct KernelConfig {
  /// When set, the dictionary is reset on a fixed block cadence so any
  /// block can be decompressed without replaying everything before it.
  pub parallel_decompressible: bool,
  /// Signatures per block before a forced `INFO_NEW_BLOCK` interrupt.
  pub block_signatures: u32,
  /// Signature count within a block at which an efficiency check fires.
  pub efficiency_check_signatures: u32,
  /// Blocks between forced dictionary resets when `parallel_decompressible`.
  pub reset_cycle: u32,
}

impl Default for KernelConfig {
  fn default() -> Self {
    KernelConfig {
      parallel_decompressible: false,
      block_signatures: PREFERRED_BLOCK_SIGNATURES,
      efficiency_check_signatures: PREFERRED_EFFICIENCY_CHECK_SIGNATURES,
      reset_cycle: PREFERRED_RESET_CYCLE,
    }
  }
}

impl KernelConfig {
  /// Sets [`parallel_decompressible`][KernelConfig::parallel_decompressible].
  pub fn with_parallel_decompressible(mut self, enabled: bool) -> Self {
    self.parallel_decompressible = enabled;
    self
  }

  /// Sets [`block_signatures`][KernelConfig::block_signatures].
  pub fn with_block_signatures(mut self, n: u32) -> Self {
    self.block_signatures = n;
    self
  }

  /// Sets [`efficiency_check_signatures`][KernelConfig::efficiency_check_signatures].
  pub fn with_efficiency_check_signatures(mut self, n: u32) -> Self {
    self.efficiency_check_signatures = n;
    self
  }

  /// Sets [`reset_cycle`][KernelConfig::reset_cycle].
  pub fn with_reset_cycle(mut self, n: u32) -> Self {
    self.reset_cycle = n;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_matches_wire_constants() {
    let cfg = KernelConfig::default();
    assert_eq!(cfg.block_signatures, PREFERRED_BLOCK_SIGNATURES);
    assert!(!cfg.parallel_decompressible);
  }

  #[test]
  fn test_builder_overrides() {
    let cfg = KernelConfig::default()
      .with_parallel_decompressible(true)
      .with_block_signatures(16);
    assert!(cfg.parallel_decompressible);
    assert_eq!(cfg.block_signatures, 16);
  }
}
