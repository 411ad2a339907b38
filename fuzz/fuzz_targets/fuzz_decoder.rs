//! Differential fuzzing: decoding a byte stream in arbitrary chunk splits
//! must behave exactly like decoding it one-shot, for well-formed and
//! malformed input alike.
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use msgmodem::{DecodeError, Decoder, DecoderOptions, StringEncoding, Value};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    data: &'a [u8],
    splits: Vec<u8>,
    with_encoding: bool,
}

fn options(with_encoding: bool) -> DecoderOptions {
    DecoderOptions {
        string_encoding: with_encoding.then_some(StringEncoding::Utf8),
        // Keep the buffer policy itself under fuzz pressure.
        max_buffer_size: 1 << 20,
        ..Default::default()
    }
}

/// Decode every leading value until the input runs out or errors.
fn one_shot_values(data: &[u8], with_encoding: bool) -> (Vec<Value>, Option<String>) {
    let mut decoder = Decoder::new(options(with_encoding)).expect("options are valid");
    if decoder.feed(data).is_err() {
        return (Vec::new(), Some("feed".into()));
    }
    collect(&mut decoder)
}

fn chunked_values(
    data: &[u8],
    splits: &[u8],
    with_encoding: bool,
) -> (Vec<Value>, Option<String>) {
    let mut decoder = Decoder::new(options(with_encoding)).expect("options are valid");
    let mut values = Vec::new();
    let mut idx = 0;
    for &s in splits {
        if idx >= data.len() {
            break;
        }
        let size = 1 + usize::from(s) % (data.len() - idx);
        if decoder.feed(&data[idx..idx + size]).is_err() {
            return (values, Some("feed".into()));
        }
        let (mut drained, err) = collect(&mut decoder);
        values.append(&mut drained);
        if let Some(err) = err {
            return (values, Some(err));
        }
        idx += size;
    }
    if idx < data.len() && decoder.feed(&data[idx..]).is_err() {
        return (values, Some("feed".into()));
    }
    let (mut drained, err) = collect(&mut decoder);
    values.append(&mut drained);
    (values, err)
}

fn collect(decoder: &mut Decoder) -> (Vec<Value>, Option<String>) {
    let mut values = Vec::new();
    loop {
        match decoder.unpack_one() {
            Ok(value) => values.push(value),
            Err(DecodeError::OutOfData) => return (values, None),
            Err(err) => return (values, Some(err.to_string())),
        }
    }
}

fuzz_target!(|input: Input| {
    // Stay under the buffer cap so the one-shot feed cannot fail where the
    // chunked feeds succeed.
    if input.data.len() > 1 << 19 {
        return;
    }
    let (oneshot, oneshot_err) = one_shot_values(input.data, input.with_encoding);
    let (chunked, chunked_err) = chunked_values(input.data, &input.splits, input.with_encoding);

    assert_eq!(oneshot, chunked, "values diverge for {:02x?}", input.data);
    assert_eq!(
        oneshot_err, chunked_err,
        "errors diverge for {:02x?}",
        input.data
    );
});
