/// Output-side cursor: tracks how much headroom remains in the caller's
/// output buffer without owning the buffer itself. The scheduler consults
/// `available` before committing to a unit's worth of work and stalls if
/// there isn't enough room for the minimum output lookahead.
pub struct OutputLocation {
  available: usize,
}

impl OutputLocation {
  pub fn new(available: usize) -> Self {
    OutputLocation { available }
  }

  pub fn available(&self) -> usize {
    self.available
  }

  pub fn has_room_for(&self, n: usize) -> bool {
    self.available >= n
  }

  pub fn advance(&mut self, n: usize) {
    debug_assert!(n <= self.available);
    self.available -= n;
  }
}
