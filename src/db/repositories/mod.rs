pub mod records;
pub mod snapshots;
