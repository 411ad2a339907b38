//! Pull-mode byte sources.
use alloc::vec::Vec;

/// A pull-mode source of stream bytes.
///
/// The decoder calls [`pull`] whenever it needs more input, passing the
/// number of bytes it would like. A producer may return fewer; returning an
/// **empty** result marks the stream exhausted, after which the decoder
/// never pulls again.
///
/// `Vec<u8>` and `&[u8]` are producers (serving themselves front to back in
/// `read_size`-sized pieces); arbitrary pull functions plug in through
/// [`FnProducer`].
///
/// [`pull`]: ByteProducer::pull
pub trait ByteProducer {
    /// Yields up to `read_size` further stream bytes; empty means
    /// end-of-stream.
    fn pull(&mut self, read_size: usize) -> Vec<u8>;
}

/// Adapts a `FnMut(usize) -> Vec<u8>` pull function into a
/// [`ByteProducer`].
///
/// # Examples
///
/// ```
/// use msgmodem::{Decoder, DecoderOptions, FnProducer, Value};
///
/// let mut chunks = vec![vec![0x92, 0x01], vec![0x02]];
/// let producer = FnProducer(move |_read_size: usize| -> Vec<u8> {
///     if chunks.is_empty() { Vec::new() } else { chunks.remove(0) }
/// });
/// let mut decoder = Decoder::from_producer(producer, DecoderOptions::default()).unwrap();
/// assert_eq!(
///     decoder.unpack_one().unwrap(),
///     Value::Array(vec![Value::Uint(1), Value::Uint(2)])
/// );
/// ```
pub struct FnProducer<F>(pub F);

impl<F> ByteProducer for FnProducer<F>
where
    F: FnMut(usize) -> Vec<u8>,
{
    fn pull(&mut self, read_size: usize) -> Vec<u8> {
        (self.0)(read_size)
    }
}

impl ByteProducer for &[u8] {
    fn pull(&mut self, read_size: usize) -> Vec<u8> {
        let take = read_size.min(self.len());
        let (out, rest) = self.split_at(take);
        *self = rest;
        out.to_vec()
    }
}

impl ByteProducer for Vec<u8> {
    fn pull(&mut self, read_size: usize) -> Vec<u8> {
        let take = read_size.min(self.len());
        let rest = self.split_off(take);
        core::mem::replace(self, rest)
    }
}
