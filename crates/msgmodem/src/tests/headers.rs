use alloc::{vec, vec::Vec};

use crate::{DecodeError, Decoder, DecoderOptions, Value, tests::utils::utf8_options};

#[test]
fn read_array_header_then_elements() {
    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0x93, 0x01, 0x02, 0x03]).unwrap();

    let len = decoder.read_array_header().unwrap();
    assert_eq!(len, 3);
    let elements: Vec<Value> = (0..len).map(|_| decoder.unpack_one().unwrap()).collect();
    assert_eq!(
        elements,
        vec![Value::Uint(1), Value::Uint(2), Value::Uint(3)]
    );
    assert_eq!(decoder.unread(), 0);
}

#[test]
fn read_map_header_then_pairs() {
    let mut decoder = Decoder::new(utf8_options()).unwrap();
    decoder
        .feed(&[0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02])
        .unwrap();

    let pairs = decoder.read_map_header().unwrap();
    assert_eq!(pairs, 2);
    let mut flat = Vec::new();
    for _ in 0..2 * pairs {
        flat.push(decoder.unpack_one().unwrap());
    }
    assert_eq!(
        flat,
        vec![
            Value::String("a".into()),
            Value::Uint(1),
            Value::String("b".into()),
            Value::Uint(2),
        ]
    );
}

#[test]
fn wide_headers() {
    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0xdc, 0x01, 0x00]).unwrap();
    assert_eq!(decoder.read_array_header().unwrap(), 256);

    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0xde, 0x00, 0x20]).unwrap();
    assert_eq!(decoder.read_map_header().unwrap(), 32);
}

#[test]
fn header_reads_resume_across_feeds() {
    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0xdc]).unwrap();
    assert!(matches!(
        decoder.read_array_header().unwrap_err(),
        DecodeError::OutOfData
    ));
    decoder.feed(&[0x00]).unwrap();
    assert!(matches!(
        decoder.read_array_header().unwrap_err(),
        DecodeError::OutOfData
    ));
    decoder.feed(&[0x02, 0x01, 0x02]).unwrap();
    assert_eq!(decoder.read_array_header().unwrap(), 2);
    assert_eq!(decoder.unpack_one().unwrap(), Value::Uint(1));
    assert_eq!(decoder.unpack_one().unwrap(), Value::Uint(2));
}

#[test]
fn array_header_on_a_map_is_a_type_mismatch() {
    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0x81, 0xc0, 0xc0]).unwrap();
    assert!(matches!(
        decoder.read_array_header().unwrap_err(),
        DecodeError::TypeMismatch {
            expected: "array",
            found: "map"
        }
    ));
}

#[test]
fn map_header_on_a_scalar_is_a_type_mismatch() {
    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0x2a]).unwrap();
    assert!(matches!(
        decoder.read_map_header().unwrap_err(),
        DecodeError::TypeMismatch {
            expected: "map",
            found: "integer"
        }
    ));
}

#[test]
fn header_reads_do_not_decode_string_payloads() {
    // A str value where an array is expected is a type mismatch even when
    // its payload is invalid under the configured strict encoding.
    let mut decoder = Decoder::new(utf8_options()).unwrap();
    decoder.feed(&[0xa2, 0xff, 0xfe]).unwrap();
    assert!(matches!(
        decoder.read_array_header().unwrap_err(),
        DecodeError::TypeMismatch {
            expected: "array",
            found: "string"
        }
    ));
}

#[test]
fn empty_headers() {
    let mut decoder = Decoder::new(DecoderOptions::default()).unwrap();
    decoder.feed(&[0x90, 0x80]).unwrap();
    assert_eq!(decoder.read_array_header().unwrap(), 0);
    assert_eq!(decoder.read_map_header().unwrap(), 0);
}
