#![forbid(unsafe_code)]

pub mod challenge;
pub mod config;
pub mod errors;
