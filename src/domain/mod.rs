//! Shared domain types.
//!
//! This module defines:
//!
//! - the fund configuration entries (`FundEntry`, `FundGroupConfig`)
//! - one scraped observation per fund (`ScrapedRecord`)
//! - the in-memory master table and its update payloads (`MasterTable`,
//!   `VolatilePatch`)

pub mod master;
pub mod types;

pub use master::*;
pub use types::*;
