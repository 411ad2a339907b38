//! Integration tests exercising the public decoding surface end to end.
use msgmodem::{
    DecodeError, Decoder, DecoderOptions, Map, StringEncoding, Value, decode, decode_with,
    produce_chunks,
};

fn utf8_options() -> DecoderOptions {
    DecoderOptions {
        string_encoding: Some(StringEncoding::Utf8),
        ..Default::default()
    }
}

/// A record stream as a broker might emit it: three documents back to back.
fn sample_stream() -> Vec<u8> {
    let mut bytes = Vec::new();
    // {"seq": 1, "payload": bin[0xde 0xad]}
    bytes.extend_from_slice(&[
        0x82, 0xa3, b's', b'e', b'q', 0x01, 0xa7, b'p', b'a', b'y', b'l', b'o', b'a', b'd', 0xc4,
        0x02, 0xde, 0xad,
    ]);
    // [true, nil, -5]
    bytes.extend_from_slice(&[0x93, 0xc3, 0xc0, 0xfb]);
    // "done"
    bytes.extend_from_slice(&[0xa4, b'd', b'o', b'n', b'e']);
    bytes
}

fn expected_values() -> Vec<Value> {
    let mut record = Map::new();
    record.insert(Value::String("seq".into()), Value::Uint(1));
    record.insert(
        Value::String("payload".into()),
        Value::Binary(vec![0xde, 0xad]),
    );
    vec![
        Value::Map(record),
        Value::Array(vec![Value::Boolean(true), Value::Nil, Value::Int(-5)]),
        Value::String("done".into()),
    ]
}

#[test]
fn chunked_feeds_yield_the_full_stream() {
    let bytes = sample_stream();
    for parts in [1, 2, 5, bytes.len()] {
        let mut decoder = Decoder::new(utf8_options()).unwrap();
        let mut values = Vec::new();
        for chunk in produce_chunks(&bytes, parts) {
            decoder.feed(chunk).unwrap();
            for result in decoder.by_ref() {
                values.push(result.unwrap());
            }
        }
        assert_eq!(values, expected_values(), "parts = {parts}");
    }
}

#[test]
fn producer_backed_stream_decodes_to_the_same_values() {
    let mut options = utf8_options();
    options.read_size = Some(3);
    let decoder = Decoder::from_producer(sample_stream(), options).unwrap();
    let values: Vec<Value> = decoder.map(|r| r.unwrap()).collect();
    assert_eq!(values, expected_values());
}

#[test]
fn one_shot_decode_rejects_concatenated_documents() {
    let bytes = sample_stream();
    match decode_with(&bytes, utf8_options()).unwrap_err() {
        DecodeError::ExtraData { value, remainder } => {
            assert_eq!(*value, expected_values()[0]);
            assert_eq!(remainder.len(), bytes.len() - 18);
        }
        err => panic!("expected ExtraData, got {err}"),
    }
}

#[test]
fn one_shot_decode_of_a_single_document() {
    assert_eq!(
        decode(&[0x92, 0xcc, 0x80, 0xc2]).unwrap(),
        Value::Array(vec![Value::Uint(128), Value::Boolean(false)])
    );
}

#[test]
fn header_driven_consumption() {
    let mut decoder = Decoder::new(utf8_options()).unwrap();
    decoder.feed(&sample_stream()).unwrap();

    let pairs = decoder.read_map_header().unwrap();
    assert_eq!(pairs, 2);
    for _ in 0..2 * pairs {
        decoder.unpack_one().unwrap();
    }

    let len = decoder.read_array_header().unwrap();
    assert_eq!(len, 3);
    for _ in 0..len {
        decoder.unpack_one().unwrap();
    }

    assert_eq!(
        decoder.unpack_one().unwrap(),
        Value::String("done".into())
    );
    assert_eq!(decoder.unread(), 0);
}

#[test]
fn skip_then_decode() {
    let mut decoder = Decoder::new(utf8_options()).unwrap();
    decoder.feed(&sample_stream()).unwrap();
    decoder.skip_one().unwrap();
    decoder.skip_one().unwrap();
    assert_eq!(
        decoder.unpack_one().unwrap(),
        Value::String("done".into())
    );
}
