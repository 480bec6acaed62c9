//! The canonical coordinate model shared by every format.

pub mod interval;
pub mod strand;

pub use interval::Interval;
pub use interval::Number;
pub use strand::Strand;
