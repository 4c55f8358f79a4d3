//! Child-monitoring digital twin.
//!
//! Periodic readings (heart rate, respiration rate, temperature, and the
//! face/cry labels from upstream classifiers) go in; a current status with a
//! confidence score and a short-horizon prediction comes out, backed by a
//! bounded history log.
//!
//! ```no_run
//! use childeye_twin_lib::{DigitalTwin, Reading};
//!
//! let twin = DigitalTwin::in_memory();
//! let state = twin.update(&Reading {
//!     hr: Some(150.0),
//!     rr: Some(50.0),
//!     ..Reading::default()
//! })?;
//! println!("{} / {}", state.status, state.prediction);
//! # Ok::<(), childeye_twin_lib::TwinError>(())
//! ```

pub mod classifier;
pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod settings;
pub mod trend;
pub mod twin;
mod utils;

use clap::Parser;

pub use classifier::{classify, Classifier, ClassifierConfig};
pub use db::{HistoryStore, TwinStore, HISTORY_CAPACITY};
pub use error::{Record, StorageError, TwinError};
pub use models::{Classification, Prediction, Reading, Report, Snapshot, TwinState, TwinStatus};
pub use trend::{TrendConfig, TrendEngine};
pub use twin::DigitalTwin;

/// Binary entry point.
pub fn run() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to info.
    utils::logging::init();

    log::debug!("childeye-twin {} starting", env!("CARGO_PKG_VERSION"));

    cli::execute(cli::Cli::parse())
}
