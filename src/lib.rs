//! Godot Gateway Library
//!
//! This library provides the validation and safe-invocation layer that sits
//! between an automated agent and a headless Godot engine, plus the
//! configuration, logging and engine-discovery glue around it.

pub mod config;
pub mod engine;
pub mod gateway;
pub mod logging;
