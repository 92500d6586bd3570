//! Data models for the verification pipeline.

pub mod document;
pub mod receipt;
pub mod request;

pub use document::{DocumentKind, FetchedDocument};
pub use receipt::{Receipt, VerificationResult};
pub use request::{FileKind, Provider, UploadedFile, VerificationRequest};
