//! Utility modules.

pub mod html;
pub mod mime;
pub mod plural;

pub use plural::plural_count;
