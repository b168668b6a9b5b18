//! Level metering: peak extraction from sample buffers and the peak-hold
//! model behind the VU bars.

mod peak;
mod vu;

pub use peak::*;
pub use vu::*;
