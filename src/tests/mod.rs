//! Stream-level test suite exercising the public `lion`/`mandala` API end
//! to end, one file per testable property rather than per module.

mod roundtrip;
mod stall;
