pub mod controller;
pub mod scenarios;

pub use controller::DigitalTwin;
