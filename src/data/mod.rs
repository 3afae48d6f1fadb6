//! Data acquisition.
//!
//! - time-based on-disk page cache (`cache`)
//! - blocking HTTP client for fund detail pages (`eastmoney`)
//! - pure detail-page parsing (`parse`)

pub mod cache;
pub mod eastmoney;
pub mod parse;

pub use cache::*;
pub use eastmoney::*;
pub use parse::*;
