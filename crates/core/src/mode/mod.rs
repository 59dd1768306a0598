//! Navigation mode types
//!
//! # Contents
//!
//! - `NavigationMode`: idle / loading / navigating / arrived, with the legal
//!   transitions between them
//! - `SourceKind`: which position source feeds the session (device or simulation)

mod source;
mod state;

pub use source::SourceKind;
pub use state::{NavigationMode, TransitionError};
