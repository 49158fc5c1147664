//! Streaming digest primitives fed by the sparse hasher.

use std::io::Cursor;

/// A streaming hash primitive: accepts arbitrary byte chunks and finalizes
/// to a digest of at least [`FINGERPRINT_LEN`](crate::FINGERPRINT_LEN)
/// bytes.
///
/// The hasher requests a fresh instance per fingerprint call and never
/// reuses one across inputs.
pub trait StreamDigest {
    /// Absorb a chunk. May be called any number of times.
    fn update(&mut self, bytes: &[u8]);

    /// Digest of everything written so far.
    fn finalize(&mut self) -> Vec<u8>;
}

impl StreamDigest for blake3::Hasher {
    fn update(&mut self, bytes: &[u8]) {
        blake3::Hasher::update(self, bytes);
    }

    fn finalize(&mut self) -> Vec<u8> {
        blake3::Hasher::finalize(self).as_bytes().to_vec()
    }
}

/// Murmur3 x64 128-bit primitive.
///
/// The `murmur3` crate exposes a one-shot API, so writes are buffered and
/// hashed at finalize. Digest layout is h1 then h2, each big-endian.
#[derive(Debug, Default)]
pub struct Murmur3x128 {
    buf: Vec<u8>,
}

impl Murmur3x128 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamDigest for Murmur3x128 {
    fn update(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn finalize(&mut self) -> Vec<u8> {
        let x = murmur3::murmur3_x64_128(&mut Cursor::new(&self.buf), 0)
            .expect("in-memory read cannot fail");
        let mut out = Vec::with_capacity(16);
        out.extend_from_slice(&(x as u64).to_be_bytes());
        out.extend_from_slice(&((x >> 64) as u64).to_be_bytes());
        out
    }
}
