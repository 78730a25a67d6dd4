//! physio-storage
//!
//! Document persistence for patient records, users and AI transactions.
//! JSON documents are addressed by key; S3 backs production and an
//! in-memory map backs tests and local development.

pub mod client;
pub mod documents;
pub mod error;
pub mod memory;
pub mod s3;
pub mod store;

pub use memory::MemoryStore;
pub use s3::S3Store;
pub use store::DocumentStore;
