//! The streaming decoder and one-shot entry points.
//!
//! # Examples
//!
//! ```rust
//! use msgmodem::{Decoder, DecoderOptions, Value};
//!
//! let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
//! decoder.feed(&[0x92, 0x01]).unwrap();
//! assert!(decoder.next().is_none()); // array still incomplete
//! decoder.feed(&[0x02]).unwrap();
//! assert_eq!(
//!     decoder.next().unwrap().unwrap(),
//!     Value::Array(vec![Value::Uint(1), Value::Uint(2)])
//! );
//! ```
use alloc::{boxed::Box, vec::Vec};

use crate::{
    buffer::StreamBuffer,
    builder::{Hooks, ValueBuilder},
    error::DecodeError,
    format::{Entry, FormatDecoder, Outcome},
    options::{DecoderOptions, StringConfig, TraceSink},
    producer::ByteProducer,
    value::Value,
};

/// Default bytes-per-pull when the options leave `read_size` unset, before
/// capping at the effective `max_buffer_size`.
const DEFAULT_READ_SIZE: usize = 1024 * 1024;

/// A streaming MessagePack decoder.
///
/// A decoder is either **push-fed** ([`Decoder::new`] + [`feed`]) or
/// **producer-backed** ([`Decoder::from_producer`]); the two input modes
/// cannot be mixed. Values are pulled with [`unpack_one`] or through the
/// [`Iterator`] impl, which ends (`None`) when the available input is
/// exhausted (cleanly *or* mid-value) and resumes after more input
/// arrives.
///
/// A decoder is single-threaded state; it is not meant for concurrent use.
///
/// [`feed`]: Decoder::feed
/// [`unpack_one`]: Decoder::unpack_one
pub struct Decoder {
    buffer: StreamBuffer,
    format: FormatDecoder,
    builder: ValueBuilder,
    hooks: Hooks,
    strings: StringConfig,
    producer: Option<Box<dyn ByteProducer>>,
    /// The producer returned an empty pull; never pull again.
    exhausted: bool,
    read_size: usize,
    trace_sink: Option<TraceSink>,
}

impl Decoder {
    /// Creates a push-fed decoder; input arrives through [`feed`].
    ///
    /// # Errors
    ///
    /// [`DecodeError::Config`] when the options are inconsistent (both map
    /// hooks set, or `read_size` past the buffer cap).
    ///
    /// [`feed`]: Decoder::feed
    pub fn new(options: DecoderOptions) -> Result<Self, DecodeError> {
        Self::build(options, None)
    }

    /// Creates a producer-backed decoder; input is pulled from `producer`
    /// on demand, `read_size` bytes at a time, until it returns an empty
    /// result.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Config`] when the options are inconsistent.
    pub fn from_producer(
        producer: impl ByteProducer + 'static,
        options: DecoderOptions,
    ) -> Result<Self, DecodeError> {
        Self::build(options, Some(Box::new(producer)))
    }

    fn build(
        options: DecoderOptions,
        producer: Option<Box<dyn ByteProducer>>,
    ) -> Result<Self, DecodeError> {
        let max_buffer_size = if options.max_buffer_size == 0 {
            usize::MAX
        } else {
            options.max_buffer_size
        };
        let read_size = match options.read_size {
            Some(read_size) => {
                if read_size > max_buffer_size {
                    return Err(DecodeError::Config("read_size exceeds max_buffer_size"));
                }
                read_size
            }
            None => DEFAULT_READ_SIZE.min(max_buffer_size),
        };
        let hooks = Hooks::new(
            options.object_hook,
            options.object_pairs_hook,
            options.list_hook,
        )?;
        Ok(Self {
            buffer: StreamBuffer::new(max_buffer_size),
            format: FormatDecoder::new(),
            builder: ValueBuilder::new(),
            hooks,
            strings: StringConfig {
                encoding: options.string_encoding,
                errors: options.decoding_errors,
            },
            producer,
            exhausted: false,
            read_size,
            trace_sink: options.trace_sink,
        })
    }

    /// Appends input bytes (push-fed decoders only).
    ///
    /// # Errors
    ///
    /// [`DecodeError::Config`] on a producer-backed decoder,
    /// [`DecodeError::BufferFull`] when the unread content would exceed the
    /// buffer cap, [`DecodeError::AllocationFailed`] when buffer growth
    /// cannot allocate.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        if self.producer.is_some() {
            return Err(DecodeError::Config("cannot feed a producer-backed decoder"));
        }
        self.buffer.append(bytes)
    }

    /// Number of buffered-but-undecoded bytes.
    #[must_use]
    pub fn unread(&self) -> usize {
        self.buffer.unread()
    }

    /// Decodes the next complete value.
    ///
    /// # Errors
    ///
    /// [`DecodeError::OutOfData`] when the available input ends before the
    /// value completes; the decoder stays resumable and the call can be
    /// retried after more input arrives. Any other error leaves the decoder
    /// in an unspecified state.
    pub fn unpack_one(&mut self) -> Result<Value, DecodeError> {
        match self.execute(Entry::Value)? {
            Outcome::Value(value) => {
                #[cfg(any(test, feature = "fuzzing"))]
                assert!(
                    self.builder.is_idle(),
                    "container stack must be empty after a completed value"
                );
                Ok(value)
            }
            outcome => unreachable!("value entry produced {outcome:?}"),
        }
    }

    /// Decodes and discards the next complete value.
    ///
    /// # Errors
    ///
    /// As [`unpack_one`](Decoder::unpack_one).
    pub fn skip_one(&mut self) -> Result<(), DecodeError> {
        match self.execute(Entry::Skip)? {
            Outcome::Skipped => Ok(()),
            outcome => unreachable!("skip entry produced {outcome:?}"),
        }
    }

    /// Consumes the next value's header, which must open an array, and
    /// returns its declared element count. The caller is then responsible
    /// for decoding that many values.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] when the next value is not an array;
    /// otherwise as [`unpack_one`](Decoder::unpack_one).
    pub fn read_array_header(&mut self) -> Result<usize, DecodeError> {
        match self.execute(Entry::ArrayHeader)? {
            Outcome::Header(n) => Ok(n),
            outcome => unreachable!("array header entry produced {outcome:?}"),
        }
    }

    /// Consumes the next value's header, which must open a map, and returns
    /// its declared pair count. The caller is then responsible for decoding
    /// `2 * count` values.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] when the next value is not a map;
    /// otherwise as [`unpack_one`](Decoder::unpack_one).
    pub fn read_map_header(&mut self) -> Result<usize, DecodeError> {
        match self.execute(Entry::MapHeader)? {
            Outcome::Header(n) => Ok(n),
            outcome => unreachable!("map header entry produced {outcome:?}"),
        }
    }

    /// Reads `n` raw stream bytes, bypassing the format decoder. Pulls from
    /// the producer as needed; returns fewer than `n` bytes only when the
    /// stream is exhausted first.
    ///
    /// # Errors
    ///
    /// [`DecodeError::AllocationFailed`] when the output cannot be
    /// allocated; buffer errors as in [`feed`](Decoder::feed).
    pub fn read_raw_bytes(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        out.try_reserve(n.min(self.buffer.unread().max(self.read_size)))
            .map_err(|_| DecodeError::AllocationFailed)?;
        loop {
            let take = (n - out.len()).min(self.buffer.unread());
            if take > 0 {
                out.try_reserve(take)
                    .map_err(|_| DecodeError::AllocationFailed)?;
                out.extend_from_slice(&self.buffer.readable()[..take]);
                self.buffer.advance(take);
            }
            if out.len() == n || !self.pull()? {
                return Ok(out);
            }
        }
    }

    /// Runs one decode entry over the buffered input, pulling from the
    /// producer on `NeedMore` until the entry completes or the stream is
    /// exhausted.
    fn execute(&mut self, entry: Entry) -> Result<Outcome, DecodeError> {
        loop {
            let (outcome, consumed) = {
                let bytes = self.buffer.readable();
                let mut cursor = 0;
                let outcome = self.format.advance(
                    bytes,
                    &mut cursor,
                    entry,
                    &mut self.builder,
                    &mut self.hooks,
                    &self.strings,
                );
                if cursor > 0 {
                    if let Some(sink) = self.trace_sink.as_mut() {
                        sink(&bytes[..cursor]);
                    }
                }
                (outcome, cursor)
            };
            self.buffer.advance(consumed);
            match outcome? {
                Outcome::NeedMore => {
                    if !self.pull()? {
                        return Err(DecodeError::OutOfData);
                    }
                }
                done => return Ok(done),
            }
        }
    }

    /// Pulls one chunk from the producer. Returns `false` when no more
    /// input can arrive (push-fed decoder, or producer exhausted).
    fn pull(&mut self) -> Result<bool, DecodeError> {
        if self.exhausted {
            return Ok(false);
        }
        let Some(producer) = self.producer.as_mut() else {
            return Ok(false);
        };
        let want = self
            .read_size
            .min(self.buffer.max_buffer_size() - self.buffer.unread());
        let chunk = producer.pull(want);
        if chunk.is_empty() {
            self.exhausted = true;
            return Ok(false);
        }
        self.buffer.append(&chunk)?;
        Ok(true)
    }
}

impl core::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Decoder")
            .field("unread", &self.buffer.unread())
            .field("producer_backed", &self.producer.is_some())
            .field("exhausted", &self.exhausted)
            .field("read_size", &self.read_size)
            .finish_non_exhaustive()
    }
}

/// Yields successive values until the available input is exhausted.
///
/// `None` covers both a clean value boundary and an incomplete suspended
/// value; iteration resumes where it left off once more input is fed or the
/// producer yields again. Failures other than input exhaustion come out as
/// `Some(Err(_))`.
impl Iterator for Decoder {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.unpack_one() {
            Ok(value) => Some(Ok(value)),
            Err(DecodeError::OutOfData) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// Decodes exactly one value from `bytes` with default options.
///
/// # Errors
///
/// [`DecodeError::OutOfData`] when `bytes` ends mid-value,
/// [`DecodeError::ExtraData`] when bytes remain after the value, and any
/// format error the payload triggers.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    decode_with(bytes, DecoderOptions::default())
}

/// Decodes exactly one value from `bytes`.
///
/// # Errors
///
/// As [`decode`]; configuration errors surface before any input is
/// examined.
pub fn decode_with(bytes: &[u8], options: DecoderOptions) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(options)?;
    decoder.feed(bytes)?;
    let value = decoder.unpack_one()?;
    if decoder.unread() > 0 {
        return Err(DecodeError::ExtraData {
            value: Box::new(value),
            remainder: decoder.buffer.take_unread(),
        });
    }
    Ok(value)
}
