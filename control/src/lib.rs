//! Components of the user interface of a LED level meter.
//!
//! A sensor sample and the state of a button are passed in on every tick of
//! the main loop. The sample is turned into intensity, smoothened and drawn
//! on an addressable LED strip. Clicks of the button cycle through brightness
//! levels, which are persisted once the user stops clicking.
//!
//! ```text
//!      [Sensor]                [Button]
//!         |                       |
//!   (LevelMapper)            (Debouncer)
//!         |                       |  rising edge
//!   (RollingWindow)               V
//!         |                    [Store] ---- delayed ----> {Persistence}
//!         |  intensity            |                            |
//!         V                       | brightness              {Storage}
//!     [Display] <-----------------+
//!         |
//!    {LedSink}
//! ```
//!
//! All of it is owned and driven by [`control::Control`]. Hardware is
//! reached only through the [`display::LedSink`] and [`storage::Storage`]
//! traits and `embedded_hal` delay.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod color;
pub mod config;
pub mod control;
pub mod debouncer;
pub mod display;
pub mod input;
mod log;
pub mod persistence;
pub mod save;
pub mod settings;
pub mod storage;
pub mod store;
#[cfg(test)]
mod testing;

pub use crate::config::Config;
pub use crate::control::Control;
pub use crate::display::{LedSink, Policy, PowerLimit};
pub use crate::input::Snapshot;
pub use crate::settings::{Brightness, Settings};
pub use crate::storage::{MemoryStorage, Storage};
