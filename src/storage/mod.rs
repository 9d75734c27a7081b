//! Storage Layer
//!
//! Handles configuration persistence. The record store lives in
//! `services::event_log`.

pub mod config;

pub use config::*;
