//! Taxi driver registry with radius-bounded nearby search, plus the
//! authenticating gateway that fronts it.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
