//! audioscope library - real-time oscilloscope / spectrum display core

pub mod audio;
pub mod axis;
pub mod cli;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod plot;
pub mod scope;
pub mod zoom;

pub use error::{ScopeError, ScopeResult};
pub use scope::{Scope, ScopeFrame};
