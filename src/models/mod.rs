pub mod reading;
pub mod report;
pub mod snapshot;
pub mod state;
pub mod timestamp;

pub use reading::{Reading, VitalsPayload};
pub use report::Report;
pub use snapshot::{Indicators, Snapshot};
pub use state::{Classification, Prediction, TwinState, TwinStatus};
