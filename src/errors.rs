use thiserror::Error;

/// Errors surfaced by the kernel's public API.
///
/// The kernel's own `ERROR` state (reachable only through an invalid saved
/// process label per spec §7) has no counterpart here: `ProcessLabel` is a
/// Rust enum with exactly three variants, so there is no invalid-label state
/// for safe code to reach in the first place. That leaves the two failure
/// classes a decode path can actually produce: running out of input
/// mid-field, and a corrupt flag combination.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
  #[error("insufficient data: cannot read {n_bits} bits at bit idx {bit_idx} out of {total_bits}")]
  InsufficientData {
    n_bits: usize,
    bit_idx: usize,
    total_bits: usize,
  },
  #[error("corrupt stream: {0}")]
  Corruption(String),
}

impl KernelError {
  pub(crate) fn insufficient_data(n_bits: usize, bit_idx: usize, total_bits: usize) -> Self {
    KernelError::InsufficientData { n_bits, bit_idx, total_bits }
  }

  pub(crate) fn corruption<S: AsRef<str>>(message: S) -> Self {
    KernelError::Corruption(message.as_ref().to_string())
  }
}

pub type KernelResult<T> = Result<T, KernelError>;
