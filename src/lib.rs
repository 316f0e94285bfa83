//! Adaptive audio drill player for vocabulary ear-training.
//!
//! Each item plays its recorded audio three times, reveals its translation,
//! speaks the translation through a speech service and moves on.  Bounded
//! sessions report every repetition to the vocabulary service and retire
//! items that reach their target; looping sessions cycle the whole
//! vocabulary without reporting.

pub mod audio;
pub mod config;
pub mod drill;
pub mod exam;
pub mod hotkey;
pub mod remote;
