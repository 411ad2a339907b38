//! Incremental, resumable MessagePack decoding.
//!
//! The decoder consumes the MessagePack binary format either one-shot
//! ([`decode`] a complete buffer) or incrementally: push byte chunks with
//! [`Decoder::feed`], or let the decoder pull them from a [`ByteProducer`],
//! and receive each value as soon as its last byte arrives. Suspension is
//! explicit: parser state is plain data advanced over byte slices, so a
//! value split across any number of chunks decodes exactly as if it had
//! been presented whole.
//!
//! # Examples
//!
//! ```rust
//! use msgmodem::{Decoder, DecoderOptions, Value};
//!
//! let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
//! decoder.feed(&[0x93, 0x01]).unwrap(); // array of 3, first element
//! assert!(decoder.next().is_none()); // not complete yet
//! decoder.feed(&[0x02, 0x03]).unwrap();
//! let value = decoder.next().unwrap().unwrap();
//! assert_eq!(
//!     value,
//!     Value::Array(vec![Value::Uint(1), Value::Uint(2), Value::Uint(3)])
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod builder;
mod chunk_utils;
mod decoder;
mod error;
mod format;
mod options;
mod producer;
mod value;

pub use chunk_utils::produce_chunks;
pub use decoder::{Decoder, decode, decode_with};
pub use error::{BoxError, DecodeError};
pub use options::{
    ArrayHook, DecoderOptions, DecodingErrors, MapHook, PairsHook, StringEncoding, TraceSink,
};
pub use producer::{ByteProducer, FnProducer};
pub use value::{Map, Value};

#[cfg(test)]
mod tests;
