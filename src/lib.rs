//! Sniper - Snipe-IT asset sync agent
//!
//! This library reconciles locally collected hardware facts (one computer and
//! its external monitors) with a Snipe-IT asset management server: it finds
//! the matching remote records, generates asset tags, writes only what
//! changed, and assigns monitors to the computer's user.

pub mod cli;
pub mod config;
pub mod inventory;
pub mod logging;
pub mod matching;
pub mod reconciler;
pub mod snipeit;
pub mod tagging;
