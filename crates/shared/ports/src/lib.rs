//! Impact Ports
//!
//! Port definitions (traits) for the impact estimation pipeline.
//! These define the boundary between the numerical core and whatever
//! stores the tables it consumes and produces.

mod error;
mod sink;
mod source;

pub use error::{DataError, DataResult};
pub use sink::ResultSink;
pub use source::ObservationSource;
