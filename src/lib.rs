//! MeteoSpain CLI Library
//!
//! This module exposes the CLI and data modules for use by the binary and in
//! integration tests.

pub mod cli;
pub mod data;
