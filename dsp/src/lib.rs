//! Signal processing of the sensor input, free of any user interface concern.
//!
//! Samples arrive from the converter one at a time, get mapped from the
//! bipolar waveform into intensity by [`level::LevelMapper`] and are
//! smoothened by [`rolling_window::RollingWindow`].

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod level;
pub mod rolling_window;
