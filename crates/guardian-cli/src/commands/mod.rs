//! Command implementations.

pub mod analyze;
pub mod report;
pub mod segment;

pub use self::analyze::execute_analyze;
pub use self::report::execute_report;
pub use self::segment::execute_segment;
