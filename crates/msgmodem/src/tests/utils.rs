//! Test-only reference encoder.
//!
//! The crate under test only decodes; round-trip and resumability tests need
//! encoded input, produced here. Integers use the narrowest tag of the
//! family matching the value's signedness, so every decoded value re-encodes
//! to bytes that decode back to itself.
use alloc::vec::Vec;

use crate::{DecoderOptions, StringEncoding, Value};

pub(crate) fn encode_to_vec(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_value(value, &mut out);
    out
}

/// Decoder options used by most tests: text decoding on, everything else
/// default.
pub(crate) fn utf8_options() -> DecoderOptions {
    DecoderOptions {
        string_encoding: Some(StringEncoding::Utf8),
        ..Default::default()
    }
}

pub(crate) fn encode_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Nil => out.push(0xc0),
        Value::Boolean(false) => out.push(0xc2),
        Value::Boolean(true) => out.push(0xc3),
        Value::Uint(n) => encode_uint(*n, out),
        Value::Int(n) => encode_int(*n, out),
        Value::F32(f) => {
            out.push(0xca);
            out.extend_from_slice(&f.to_be_bytes());
        }
        Value::F64(f) => {
            out.push(0xcb);
            out.extend_from_slice(&f.to_be_bytes());
        }
        Value::Binary(bytes) => {
            match bytes.len() {
                len if len <= 0xff => {
                    out.push(0xc4);
                    out.push(len as u8);
                }
                len if len <= 0xffff => {
                    out.push(0xc5);
                    out.extend_from_slice(&(len as u16).to_be_bytes());
                }
                len => {
                    out.push(0xc6);
                    out.extend_from_slice(&(len as u32).to_be_bytes());
                }
            }
            out.extend_from_slice(bytes);
        }
        Value::String(text) => {
            let bytes = text.as_bytes();
            match bytes.len() {
                len if len <= 0x1f => out.push(0xa0 | len as u8),
                len if len <= 0xff => {
                    out.push(0xd9);
                    out.push(len as u8);
                }
                len if len <= 0xffff => {
                    out.push(0xda);
                    out.extend_from_slice(&(len as u16).to_be_bytes());
                }
                len => {
                    out.push(0xdb);
                    out.extend_from_slice(&(len as u32).to_be_bytes());
                }
            }
            out.extend_from_slice(bytes);
        }
        Value::Array(items) => {
            match items.len() {
                len if len <= 0x0f => out.push(0x90 | len as u8),
                len if len <= 0xffff => {
                    out.push(0xdc);
                    out.extend_from_slice(&(len as u16).to_be_bytes());
                }
                len => {
                    out.push(0xdd);
                    out.extend_from_slice(&(len as u32).to_be_bytes());
                }
            }
            for item in items {
                encode_value(item, out);
            }
        }
        Value::Map(map) => {
            match map.len() {
                len if len <= 0x0f => out.push(0x80 | len as u8),
                len if len <= 0xffff => {
                    out.push(0xde);
                    out.extend_from_slice(&(len as u16).to_be_bytes());
                }
                len => {
                    out.push(0xdf);
                    out.extend_from_slice(&(len as u32).to_be_bytes());
                }
            }
            for (key, value) in map {
                encode_value(key, out);
                encode_value(value, out);
            }
        }
    }
}

fn encode_uint(n: u64, out: &mut Vec<u8>) {
    if n <= 0x7f {
        out.push(n as u8);
    } else if n <= 0xff {
        out.push(0xcc);
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xcd);
        out.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xce);
        out.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        out.push(0xcf);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_int(n: i64, out: &mut Vec<u8>) {
    if (-32..0).contains(&n) {
        out.push(n as i8 as u8);
    } else if i64::from(n as i8) == n {
        out.push(0xd0);
        out.push(n as i8 as u8);
    } else if i64::from(n as i16) == n {
        out.push(0xd1);
        out.extend_from_slice(&(n as i16).to_be_bytes());
    } else if i64::from(n as i32) == n {
        out.push(0xd2);
        out.extend_from_slice(&(n as i32).to_be_bytes());
    } else {
        out.push(0xd3);
        out.extend_from_slice(&n.to_be_bytes());
    }
}
