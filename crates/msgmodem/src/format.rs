//! The MessagePack wire-format state machine.
//!
//! A resumable decoder over `(bytes, cursor, state)`: each call consumes a
//! prefix of `bytes[cursor..]`, committing progress into reified state so
//! that decoding can suspend at any byte boundary and resume when more input
//! arrives. The machine owns no buffer and never rewinds the cursor;
//! partially collected fixed fields and payload bytes live in
//! [`Pending`] until their token completes.
use alloc::{string::String, vec::Vec};

use crate::{
    builder::{Hooks, ValueBuilder},
    error::DecodeError,
    options::{DecodingErrors, StringConfig, StringEncoding},
    value::Value,
};

/// Which operation the coordinator is running. Stable across `NeedMore`
/// resumptions of the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    /// Decode the next complete value.
    Value,
    /// Consume and discard the next complete value.
    Skip,
    /// Consume only the next header, which must open an array.
    ArrayHeader,
    /// Consume only the next header, which must open a map.
    MapHeader,
}

/// Result of one decode step.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// `Entry::Value` finished; the root value.
    Value(Value),
    /// `Entry::Skip` finished.
    Skipped,
    /// A header entry finished; the declared element or pair count.
    Header(usize),
    /// Input ran out mid-value. All presented bytes were committed into
    /// state; resume with the same entry once more input is available.
    NeedMore,
}

/// One fully decoded lexical token.
enum Token {
    Value(Value),
    /// A str/bin payload consumed without being materialized (skip and
    /// header entries).
    Discarded(BodyKind),
    ArrayHeader(usize),
    MapHeader(usize),
}

/// Payload family of an in-progress byte body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Str,
    Bin,
}

impl BodyKind {
    fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bin => "binary",
        }
    }
}

/// The scalar-in-progress. Records exactly what has been committed of the
/// current token: the tag awaiting its fixed field, or the length awaiting
/// its payload together with the bytes collected so far.
#[derive(Debug)]
enum Pending {
    /// The next byte is a tag.
    Tag,
    /// Collecting the fixed-width field (scalar payload, length, or count)
    /// that follows `tag`.
    Fixed {
        tag: u8,
        buf: [u8; 8],
        filled: usize,
        need: usize,
    },
    /// Collecting a str/bin payload body.
    Body {
        kind: BodyKind,
        remaining: usize,
        collected: Vec<u8>,
    },
}

#[derive(Debug)]
pub(crate) struct FormatDecoder {
    pending: Pending,
    /// Remaining-descendant counts for the skip entry, innermost last.
    /// Counts are `u64` so a map's `2 * count` cannot overflow on 32-bit
    /// targets.
    skip_remaining: Vec<u64>,
}

impl FormatDecoder {
    pub(crate) fn new() -> Self {
        Self {
            pending: Pending::Tag,
            skip_remaining: Vec::new(),
        }
    }

    /// Advances the machine over `bytes[*cursor..]` until the selected entry
    /// completes or input runs out. The cursor is left on the first
    /// unconsumed byte.
    pub(crate) fn advance(
        &mut self,
        bytes: &[u8],
        cursor: &mut usize,
        entry: Entry,
        builder: &mut ValueBuilder,
        hooks: &mut Hooks,
        strings: &StringConfig,
    ) -> Result<Outcome, DecodeError> {
        // Only the value entry materializes payloads; skip and header
        // entries consume str/bin bodies without buffering or decoding them.
        let materialize = matches!(entry, Entry::Value);
        loop {
            let Some(token) = self.next_token(bytes, cursor, strings, materialize)? else {
                return Ok(Outcome::NeedMore);
            };
            match entry {
                Entry::Value => {
                    let completed = match token {
                        Token::Value(v) => builder.attach(v, hooks)?,
                        Token::ArrayHeader(n) => builder.open_array(n, hooks)?,
                        Token::MapHeader(n) => builder.open_map(n, hooks)?,
                        Token::Discarded(_) => {
                            unreachable!("payload discarded while materializing")
                        }
                    };
                    if let Some(root) = completed {
                        return Ok(Outcome::Value(root));
                    }
                }
                Entry::Skip => {
                    if self.skip_feed(&token) {
                        return Ok(Outcome::Skipped);
                    }
                }
                Entry::ArrayHeader => {
                    return match token {
                        Token::ArrayHeader(n) => Ok(Outcome::Header(n)),
                        Token::MapHeader(_) => Err(DecodeError::TypeMismatch {
                            expected: "array",
                            found: "map",
                        }),
                        Token::Value(v) => Err(DecodeError::TypeMismatch {
                            expected: "array",
                            found: v.kind_name(),
                        }),
                        Token::Discarded(kind) => Err(DecodeError::TypeMismatch {
                            expected: "array",
                            found: kind.name(),
                        }),
                    };
                }
                Entry::MapHeader => {
                    return match token {
                        Token::MapHeader(n) => Ok(Outcome::Header(n)),
                        Token::ArrayHeader(_) => Err(DecodeError::TypeMismatch {
                            expected: "map",
                            found: "array",
                        }),
                        Token::Value(v) => Err(DecodeError::TypeMismatch {
                            expected: "map",
                            found: v.kind_name(),
                        }),
                        Token::Discarded(kind) => Err(DecodeError::TypeMismatch {
                            expected: "map",
                            found: kind.name(),
                        }),
                    };
                }
            }
        }
    }

    /// Decodes the next complete token, or returns `None` when the input is
    /// exhausted mid-token. When `materialize` is false, str/bin payload
    /// bytes are consumed but neither buffered nor decoded.
    fn next_token(
        &mut self,
        bytes: &[u8],
        cursor: &mut usize,
        strings: &StringConfig,
        materialize: bool,
    ) -> Result<Option<Token>, DecodeError> {
        loop {
            match &mut self.pending {
                Pending::Tag => {
                    let Some(&tag) = bytes.get(*cursor) else {
                        return Ok(None);
                    };
                    *cursor += 1;
                    match tag {
                        0x00..=0x7f => {
                            return Ok(Some(Token::Value(Value::Uint(u64::from(tag)))));
                        }
                        0x80..=0x8f => {
                            return Ok(Some(Token::MapHeader(usize::from(tag & 0x0f))));
                        }
                        0x90..=0x9f => {
                            return Ok(Some(Token::ArrayHeader(usize::from(tag & 0x0f))));
                        }
                        0xa0..=0xbf => {
                            self.pending = Pending::Body {
                                kind: BodyKind::Str,
                                remaining: usize::from(tag & 0x1f),
                                collected: Vec::new(),
                            };
                        }
                        0xc0 => return Ok(Some(Token::Value(Value::Nil))),
                        0xc2 => return Ok(Some(Token::Value(Value::Boolean(false)))),
                        0xc3 => return Ok(Some(Token::Value(Value::Boolean(true)))),
                        0xc4..=0xc6
                        | 0xca..=0xcf
                        | 0xd0..=0xd3
                        | 0xd9..=0xdb
                        | 0xdc..=0xdf => {
                            self.pending = Pending::Fixed {
                                tag,
                                buf: [0; 8],
                                filled: 0,
                                need: fixed_width(tag),
                            };
                        }
                        0xe0..=0xff => {
                            // Negative fixint: the tag byte is the value,
                            // offset by 0x100.
                            return Ok(Some(Token::Value(Value::Int(i64::from(tag as i8)))));
                        }
                        other => return Err(DecodeError::UnrecognizedTag(other)),
                    }
                }
                Pending::Fixed {
                    tag,
                    buf,
                    filled,
                    need,
                } => {
                    let take = (*need - *filled).min(bytes.len() - *cursor);
                    buf[*filled..*filled + take]
                        .copy_from_slice(&bytes[*cursor..*cursor + take]);
                    *filled += take;
                    *cursor += take;
                    if filled < need {
                        return Ok(None);
                    }
                    let (tag, buf) = (*tag, *buf);
                    match finish_fixed(tag, &buf) {
                        FixedStep::Token(token) => {
                            self.pending = Pending::Tag;
                            return Ok(Some(token));
                        }
                        FixedStep::Body { kind, len } => {
                            self.pending = Pending::Body {
                                kind,
                                remaining: len,
                                collected: Vec::new(),
                            };
                        }
                    }
                }
                Pending::Body {
                    kind,
                    remaining,
                    collected,
                } => {
                    let take = (*remaining).min(bytes.len() - *cursor);
                    if take > 0 {
                        if materialize {
                            // Reserve only for bytes actually present; a
                            // hostile length field never drives the
                            // allocation.
                            collected
                                .try_reserve(take)
                                .map_err(|_| DecodeError::AllocationFailed)?;
                            collected.extend_from_slice(&bytes[*cursor..*cursor + take]);
                        }
                        *cursor += take;
                        *remaining -= take;
                    }
                    if *remaining > 0 {
                        return Ok(None);
                    }
                    let kind = *kind;
                    let payload = core::mem::take(collected);
                    self.pending = Pending::Tag;
                    if !materialize {
                        return Ok(Some(Token::Discarded(kind)));
                    }
                    let value = match kind {
                        BodyKind::Bin => Value::Binary(payload),
                        BodyKind::Str => finish_str(payload, strings)?,
                    };
                    return Ok(Some(Token::Value(value)));
                }
            }
        }
    }

    /// Accounts one token against the skip entry. Returns `true` once the
    /// skipped value (including all its descendants) has been consumed.
    fn skip_feed(&mut self, token: &Token) -> bool {
        match token {
            Token::ArrayHeader(n) if *n > 0 => {
                self.skip_remaining.push(*n as u64);
                return false;
            }
            Token::MapHeader(n) if *n > 0 => {
                self.skip_remaining.push(*n as u64 * 2);
                return false;
            }
            // Scalars and empty containers are one complete value.
            _ => {}
        }
        loop {
            match self.skip_remaining.last_mut() {
                None => return true,
                Some(remaining) => {
                    *remaining -= 1;
                    if *remaining > 0 {
                        return false;
                    }
                    self.skip_remaining.pop();
                }
            }
        }
    }
}

/// Width of the fixed field that follows `tag`: the scalar payload, or the
/// length/count field of a variable-size value.
fn fixed_width(tag: u8) -> usize {
    match tag {
        0xc4 | 0xcc | 0xd0 | 0xd9 => 1,
        0xc5 | 0xcd | 0xd1 | 0xda | 0xdc | 0xde => 2,
        0xc6 | 0xca | 0xce | 0xd2 | 0xdb | 0xdd | 0xdf => 4,
        0xcb | 0xcf | 0xd3 => 8,
        _ => unreachable!("tag 0x{tag:02x} has no fixed field"),
    }
}

enum FixedStep {
    Token(Token),
    Body { kind: BodyKind, len: usize },
}

/// Interprets a completed fixed field. Scalar payloads are big-endian; so
/// are length and count fields.
fn finish_fixed(tag: u8, buf: &[u8; 8]) -> FixedStep {
    let be16 = || u16::from_be_bytes([buf[0], buf[1]]);
    let be32 = || u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    match tag {
        0xca => FixedStep::Token(Token::Value(Value::F32(f32::from_be_bytes([
            buf[0], buf[1], buf[2], buf[3],
        ])))),
        0xcb => FixedStep::Token(Token::Value(Value::F64(f64::from_be_bytes(*buf)))),
        0xcc => FixedStep::Token(Token::Value(Value::Uint(u64::from(buf[0])))),
        0xcd => FixedStep::Token(Token::Value(Value::Uint(u64::from(be16())))),
        0xce => FixedStep::Token(Token::Value(Value::Uint(u64::from(be32())))),
        0xcf => FixedStep::Token(Token::Value(Value::Uint(u64::from_be_bytes(*buf)))),
        0xd0 => FixedStep::Token(Token::Value(Value::Int(i64::from(buf[0] as i8)))),
        0xd1 => FixedStep::Token(Token::Value(Value::Int(i64::from(be16() as i16)))),
        0xd2 => FixedStep::Token(Token::Value(Value::Int(i64::from(be32() as i32)))),
        0xd3 => FixedStep::Token(Token::Value(Value::Int(i64::from_be_bytes(*buf)))),
        0xc4 => FixedStep::Body {
            kind: BodyKind::Bin,
            len: usize::from(buf[0]),
        },
        0xc5 => FixedStep::Body {
            kind: BodyKind::Bin,
            len: usize::from(be16()),
        },
        0xc6 => FixedStep::Body {
            kind: BodyKind::Bin,
            len: be32() as usize,
        },
        0xd9 => FixedStep::Body {
            kind: BodyKind::Str,
            len: usize::from(buf[0]),
        },
        0xda => FixedStep::Body {
            kind: BodyKind::Str,
            len: usize::from(be16()),
        },
        0xdb => FixedStep::Body {
            kind: BodyKind::Str,
            len: be32() as usize,
        },
        0xdc => FixedStep::Token(Token::ArrayHeader(usize::from(be16()))),
        0xdd => FixedStep::Token(Token::ArrayHeader(be32() as usize)),
        0xde => FixedStep::Token(Token::MapHeader(usize::from(be16()))),
        0xdf => FixedStep::Token(Token::MapHeader(be32() as usize)),
        _ => unreachable!("tag 0x{tag:02x} has no fixed field"),
    }
}

/// Finalizes a completed `str` payload under the configured encoding.
fn finish_str(payload: Vec<u8>, strings: &StringConfig) -> Result<Value, DecodeError> {
    let Some(encoding) = strings.encoding else {
        return Ok(Value::Binary(payload));
    };
    match encoding {
        StringEncoding::Utf8 => decode_utf8(payload, strings.errors),
    }
}

fn decode_utf8(payload: Vec<u8>, errors: DecodingErrors) -> Result<Value, DecodeError> {
    match errors {
        DecodingErrors::Strict => String::from_utf8(payload)
            .map(Value::String)
            .map_err(|_| DecodeError::InvalidPayload("string payload is not valid UTF-8")),
        DecodingErrors::Replace => Ok(Value::String(
            String::from_utf8_lossy(&payload).into_owned(),
        )),
        DecodingErrors::Ignore => {
            let mut out = String::new();
            let mut rest = payload.as_slice();
            while !rest.is_empty() {
                match core::str::from_utf8(rest) {
                    Ok(tail) => {
                        out.push_str(tail);
                        break;
                    }
                    Err(err) => {
                        let valid = err.valid_up_to();
                        if let Ok(head) = core::str::from_utf8(&rest[..valid]) {
                            out.push_str(head);
                        }
                        let skip = err.error_len().unwrap_or(rest.len() - valid);
                        rest = &rest[valid + skip..];
                    }
                }
            }
            Ok(Value::String(out))
        }
    }
}
