//! Color Constants for the RideLink Theme
//!
//! This module defines the color constants used throughout the UI. Colors
//! follow a cool slate/teal scheme.

use egui::Color32;

/// Main sidebar background - Deep slate
pub const SIDEBAR_BG: Color32 = Color32::from_rgb(0x1E, 0x26, 0x2B);

/// Conversation list hovered or selected item - Lighter slate
pub const LIST_HOVER: Color32 = Color32::from_rgb(0x2C, 0x3A, 0x42);

/// Main chat background - Off-white
pub const MAIN_BG: Color32 = Color32::from_rgb(0xF4, 0xF7, 0xF8);

/// Message bubble outgoing - Teal tint
pub const BUBBLE_OUTGOING: Color32 = Color32::from_rgb(0xC4, 0xE3, 0xDE);

/// Message bubble incoming - Light gray
pub const BUBBLE_INCOMING: Color32 = Color32::from_rgb(0xE4, 0xE9, 0xEB);

/// Top bar background - Dark slate
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x25, 0x30, 0x36);

/// Text on dark backgrounds
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xEC, 0xF1, 0xF2);

/// Text on light backgrounds
pub const TEXT_DARK: Color32 = Color32::from_rgb(0x20, 0x2A, 0x2F);

/// Secondary text
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x8A, 0x9A, 0xA2);

/// Unread badge - Teal
pub const BADGE: Color32 = Color32::from_rgb(0x2B, 0xA8, 0x96);

/// Error text and toasts - Red
pub const ERROR: Color32 = Color32::from_rgb(0xD9, 0x53, 0x4F);

/// Pending-delivery marker - Gray
pub const PENDING: Color32 = Color32::from_rgb(0x9E, 0x9E, 0x9E);
