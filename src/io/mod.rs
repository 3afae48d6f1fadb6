//! Input/output helpers.
//!
//! - scraped intermediate file read/write (`scraped`)
//! - master-file load/store (`master`)

pub mod master;
pub mod scraped;

pub use master::*;
pub use scraped::*;
