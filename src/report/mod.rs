//! Report stage: render the master file as a standalone HTML document.

pub mod html;

pub use html::*;
