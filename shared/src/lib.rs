//! Re-exports the data model, configuration handling and error types shared
//! by the label verification engine and the HTTP service in front of it.

pub mod config;
pub mod dto;
pub mod error;
