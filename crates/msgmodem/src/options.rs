//! Decoder construction options.
use alloc::{boxed::Box, vec::Vec};

use crate::{
    error::BoxError,
    value::{Map, Value},
};

/// Hook invoked with each completed array; its return value replaces the
/// array in the result tree.
pub type ArrayHook = Box<dyn FnMut(Vec<Value>) -> Result<Value, BoxError>>;

/// Hook invoked with each completed map; its return value replaces the map
/// in the result tree.
pub type MapHook = Box<dyn FnMut(Map) -> Result<Value, BoxError>>;

/// Hook invoked with each completed map's wire-ordered pair list (duplicate
/// keys surfaced verbatim); its return value replaces the map in the result
/// tree. Mutually exclusive with [`DecoderOptions::object_hook`].
pub type PairsHook = Box<dyn FnMut(Vec<(Value, Value)>) -> Result<Value, BoxError>>;

/// Observer handed the exact bytes consumed by each decode step, in stream
/// order.
pub type TraceSink = Box<dyn FnMut(&[u8])>;

/// Named text encoding applied to `str`-family payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StringEncoding {
    Utf8,
}

/// Policy for payload bytes that are invalid under the configured string
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingErrors {
    /// Fail the decode with an invalid-payload error.
    Strict,
    /// Substitute U+FFFD for each invalid sequence.
    Replace,
    /// Drop invalid sequences.
    Ignore,
}

impl Default for DecodingErrors {
    fn default() -> Self {
        Self::Strict
    }
}

/// Configuration options for a [`Decoder`].
///
/// # Examples
///
/// ```
/// use msgmodem::{DecoderOptions, StringEncoding};
///
/// let options = DecoderOptions {
///     string_encoding: Some(StringEncoding::Utf8),
///     max_buffer_size: 1024 * 1024,
///     ..Default::default()
/// };
/// ```
///
/// [`Decoder`]: crate::Decoder
#[derive(Default)]
pub struct DecoderOptions {
    /// Bytes requested per producer pull.
    ///
    /// Must not exceed the effective buffer cap.
    ///
    /// # Default
    ///
    /// `min(1 MiB, max_buffer_size)` after the zero sentinel on
    /// `max_buffer_size` is resolved.
    pub read_size: Option<usize>,

    /// Hard cap on the internal buffer capacity. A single `feed` or producer
    /// pull that would push the unread-content size past this cap fails with
    /// a buffer-full error.
    ///
    /// # Default
    ///
    /// `0`, meaning unbounded (`usize::MAX`).
    pub max_buffer_size: usize,

    /// When set, `str`-family payloads are decoded to [`Value::String`] with
    /// this encoding; when unset they are surfaced as raw [`Value::Binary`]
    /// bytes. `bin`-family payloads are raw bytes regardless.
    ///
    /// # Default
    ///
    /// `None`
    ///
    /// [`Value::String`]: crate::Value::String
    /// [`Value::Binary`]: crate::Value::Binary
    pub string_encoding: Option<StringEncoding>,

    /// Policy applied when a `str` payload is invalid under
    /// [`string_encoding`](Self::string_encoding).
    ///
    /// # Default
    ///
    /// [`DecodingErrors::Strict`]
    pub decoding_errors: DecodingErrors,

    /// Invoked with each completed map. Mutually exclusive with
    /// [`object_pairs_hook`](Self::object_pairs_hook).
    pub object_hook: Option<MapHook>,

    /// Invoked with each completed map's pair list instead of a built map.
    pub object_pairs_hook: Option<PairsHook>,

    /// Invoked with each completed array.
    pub list_hook: Option<ArrayHook>,

    /// Handed the raw bytes consumed by each decode step.
    pub trace_sink: Option<TraceSink>,
}

impl core::fmt::Debug for DecoderOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecoderOptions")
            .field("read_size", &self.read_size)
            .field("max_buffer_size", &self.max_buffer_size)
            .field("string_encoding", &self.string_encoding)
            .field("decoding_errors", &self.decoding_errors)
            .field("object_hook", &self.object_hook.is_some())
            .field("object_pairs_hook", &self.object_pairs_hook.is_some())
            .field("list_hook", &self.list_hook.is_some())
            .field("trace_sink", &self.trace_sink.is_some())
            .finish()
    }
}

/// String-handling configuration snapshot shared with the format decoder.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StringConfig {
    pub(crate) encoding: Option<StringEncoding>,
    pub(crate) errors: DecodingErrors,
}
