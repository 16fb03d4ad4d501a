pub mod format;
pub mod regions;
