//! Shared components and utilities for the image simulator.
//!
//! This crate contains the image containers, FFT helpers, random streams
//! and unit types that the simulator's profile and noise layers build on.

pub mod algo;
pub mod image_proc;
pub mod units;
