//! Shared types for oxprobe inputs.
//!
//! Inputs never deliver metrics themselves. They hand every record to an
//! [`accumulator::Accumulator`], which the host owns and which decides where
//! the records go.

pub mod accumulator;
pub mod types;
