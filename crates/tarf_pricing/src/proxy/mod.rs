//! Proxy surface construction for target redemption forwards.
//!
//! While the Monte Carlo engine runs, every path records one
//! observation per open fixing: the spot at the fixing and the net
//! present value of everything the path still pays from that fixing
//! on. After the last path, the recorded observations regress into a
//! [`ProxySurface`]: per (open fixings, accumulated amount) cell,
//! either a constant or a clamped two-segment quadratic in spot. The
//! surface then prices the live contract on later dates without
//! re-simulating.

mod build;
mod merge;
mod segment;

pub mod error;
pub mod function;
pub mod store;
pub mod surface;

pub(crate) use build::build_grid;
pub use error::{DomainError, SurfaceError};
pub use function::{Clamp, FittedSegment, ProxyFunction};
pub use store::{bucket_index, bucket_limits, Observation, ObservationStore};
pub use surface::ProxySurface;
