#![cfg_attr(not(feature = "std"), no_std)]

//! # Morse Core
//!
//! Non-blocking Morse code sending library for embedded systems.
//! Characters are expanded into on/off timing sequences which a small
//! state machine plays back over repeated short polls, driving an output
//! capability (LED, speaker tone, PWM brightness) without blocking the
//! host control loop.

pub mod types;
pub mod encode;
pub mod sender;
pub mod hal;

pub use types::*;
pub use encode::*;
pub use sender::*;
pub use hal::*;

/// Morse library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
