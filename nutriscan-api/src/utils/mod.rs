//! Utility helpers shared by the collaborator clients

pub mod payload;

pub use payload::{extract_json_payload, parse_json_payload};
