//! Core library for payment receipt verification.
//!
//! This crate provides:
//! - Provider adapters for Ethiopian payment providers (telebirr, CBE,
//!   Dashen, Bank of Abyssinia)
//! - Receipt acquisition over direct HTTPS and headless-browser capture
//! - Text extraction (native PDF text, rendered pages, OCR for uploads)
//! - Declarative field-extraction rules and result normalization

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod resolver;
pub mod rules;
pub mod text;

pub use config::VeripayConfig;
pub use error::{ErrorKind, Result, VerifyError};
pub use models::{
    FileKind, Provider, Receipt, UploadedFile, VerificationRequest, VerificationResult,
};
pub use pipeline::Verifier;
pub use providers::{spec_for, ProviderSpec};
pub use rules::{ExtractedFields, FieldKey};
pub use text::RawText;
