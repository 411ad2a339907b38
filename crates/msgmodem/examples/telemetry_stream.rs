//! Demonstrates reacting to telemetry records **as they complete** while a
//! MessagePack stream arrives in small, irregular network chunks.
//!
//! Each record is a map of the shape (abridged):
//!
//! ```text
//! {
//!   "device":  str,
//!   "reading": float,
//!   "alert":   bool,
//! }
//! ```
//!
//! The example feeds one concatenated stream of three records to the decoder
//! in chunks that deliberately split values mid-payload. The iterator yields
//! each record on the feed that completes it; alerts are surfaced
//! immediately, without waiting for the rest of the stream.
//!
//! Run with
//!
//! ```bash
//! cargo run -p msgmodem --example telemetry_stream
//! ```

use msgmodem::{Decoder, DecoderOptions, StringEncoding, Value};

fn record(device: &str, reading: f64, alert: bool) -> Vec<u8> {
    let mut out = vec![0x83];
    // "device": device
    out.extend_from_slice(&[0xa6, b'd', b'e', b'v', b'i', b'c', b'e']);
    out.push(0xa0 | device.len() as u8);
    out.extend_from_slice(device.as_bytes());
    // "reading": reading
    out.extend_from_slice(&[0xa7, b'r', b'e', b'a', b'd', b'i', b'n', b'g', 0xcb]);
    out.extend_from_slice(&reading.to_be_bytes());
    // "alert": alert
    out.extend_from_slice(&[0xa5, b'a', b'l', b'e', b'r', b't']);
    out.push(if alert { 0xc3 } else { 0xc2 });
    out
}

fn main() {
    let mut stream = Vec::new();
    stream.extend(record("boiler-1", 96.5, false));
    stream.extend(record("boiler-2", 104.0, true));
    stream.extend(record("intake", 18.25, false));

    // In real life these chunks would come from the network; sizes are
    // chosen so that most values are split across chunk boundaries.
    let chunks: Vec<&[u8]> = stream.chunks(7).collect();

    let mut decoder = Decoder::new(DecoderOptions {
        string_encoding: Some(StringEncoding::Utf8),
        ..Default::default()
    })
    .expect("default options are consistent");

    for chunk in chunks {
        decoder.feed(chunk).expect("stream fits in memory");

        // Drain every record completed by this chunk.
        for result in decoder.by_ref() {
            let value = result.expect("stream is well-formed");
            let Value::Map(map) = &value else {
                eprintln!("unexpected value: {value:?}");
                continue;
            };

            let device = map.get(&Value::String("device".into()));
            let reading = map.get(&Value::String("reading".into()));
            match map.get(&Value::String("alert".into())) {
                Some(Value::Boolean(true)) => {
                    println!("ALERT  {device:?} at {reading:?}");
                }
                _ => {
                    println!("ok     {device:?} at {reading:?}");
                }
            }
        }
    }
}
