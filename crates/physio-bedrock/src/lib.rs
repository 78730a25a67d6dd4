//! physio-bedrock
//!
//! AI suggestion text for clinical form fields: prompt assembly with
//! intra-form finding context, Bedrock Converse invocation, and token
//! cost accounting.

pub mod client;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod suggest;
pub mod tokens;
