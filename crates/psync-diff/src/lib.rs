//! Canonical artifact diffing for promptsync
//!
//! Compares two canonical artifacts field by field and renders each
//! mismatch in a reviewable form: short fields print both sides, text
//! fields print a unified line patch instead of dumping full values.

mod compare;
mod issue;

pub use compare::{diff, equivalent};
pub use issue::Issue;
