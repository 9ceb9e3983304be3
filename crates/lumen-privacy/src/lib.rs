//! # lumen-privacy
//!
//! Scrubs event metadata before it leaves the pipeline. String values are
//! scanned for email-like patterns and redacted unless their key is
//! whitelisted. Sanitization is idempotent.

pub mod patterns;
pub mod sanitizer;

pub use sanitizer::{MetadataSanitizer, SanitizeReport};
