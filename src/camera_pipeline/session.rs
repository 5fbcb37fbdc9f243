//! Session module
//!
//! The acquisition session lifecycle and the operator state shared with it.

mod config;
mod controller;
mod controls;


pub use config::{SessionConfig, SessionConfigBuilder};
pub use controller::{SessionController, SessionEvent, SessionState, SessionSummary, TickReport};
pub use controls::SessionControls;
