//! Decoder error type.
use alloc::{boxed::Box, vec::Vec};

use thiserror::Error;

use crate::value::Value;

/// Failure type carried out of user hooks.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// All failures surfaced by the decoder.
///
/// Only [`OutOfData`] leaves the decoder resumable: supplying more input
/// (another `feed`, or further producer pulls) and calling again continues
/// the suspended value. Every other decode-time failure leaves the decoder
/// in an unspecified state and it should not be reused.
///
/// [`OutOfData`]: DecodeError::OutOfData
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The input ended while a value is still incomplete. Resumable.
    #[error("input exhausted while a value is incomplete")]
    OutOfData,

    /// One-shot decoding succeeded but trailing bytes remained. Carries both
    /// the decoded value and the untouched remainder.
    #[error("{} trailing bytes after the decoded value", remainder.len())]
    ExtraData {
        value: Box<Value>,
        remainder: Vec<u8>,
    },

    /// Holding the unread input would require more than the configured
    /// buffer cap.
    #[error("{needed} unread bytes would exceed the buffer cap of {max_buffer_size}")]
    BufferFull {
        needed: usize,
        max_buffer_size: usize,
    },

    /// A byte outside the MessagePack tag table appeared where a tag was
    /// expected.
    #[error("unrecognized tag byte 0x{0:02x}")]
    UnrecognizedTag(u8),

    /// A payload violated the format or the configured decoding policy.
    #[error("invalid payload: {0}")]
    InvalidPayload(&'static str),

    /// A header reader met a value of a different kind.
    #[error("expected {expected} header, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Invalid construction options, or input supplied through the wrong
    /// mode.
    #[error("invalid configuration: {0}")]
    Config(&'static str),

    /// A user hook failed; the underlying failure is preserved as the
    /// source.
    #[error("hook failed")]
    Hook(#[source] BoxError),

    /// Buffer or payload growth could not allocate. The prior buffer
    /// contents are preserved.
    #[error("allocation failed")]
    AllocationFailed,
}
