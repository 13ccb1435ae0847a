//! Clipster: a personal link manager that keeps saved clips in a folder tree.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod reducer;
pub mod screens;
pub mod services;
pub mod types;
