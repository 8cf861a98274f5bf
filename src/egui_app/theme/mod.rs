//! UI Theme
//!
//! Color constants for the desktop shell.

pub mod colors;
