//! The sparse sampling hasher.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::HashError;
use crate::fingerprint::{Fingerprint, FINGERPRINT_LEN};
use crate::primitive::StreamDigest;

/// Bytes hashed from each of the three sample windows.
pub const DEFAULT_SAMPLE_SIZE: u64 = 16 * 1024;

/// Inputs shorter than this are hashed in full.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 128 * 1024;

const FULL_READ_CHUNK: usize = 64 * 1024;

type DigestFactory = Box<dyn Fn() -> Box<dyn StreamDigest> + Send + Sync>;

/// Fingerprints inputs by sampling three fixed-size windows (beginning,
/// midpoint and end) into a digest primitive and folding the exact input
/// length into the result. Inputs below the size threshold are hashed in
/// full instead.
///
/// The policy and factory are immutable after construction; a hasher can be
/// shared across threads, and every fingerprint call runs on its own fresh
/// primitive instance.
pub struct SparseHasher {
    factory: DigestFactory,
    sample_size: u64,
    size_threshold: u64,
}

impl std::fmt::Debug for SparseHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseHasher")
            .field("sample_size", &self.sample_size)
            .field("size_threshold", &self.size_threshold)
            .finish_non_exhaustive()
    }
}

impl SparseHasher {
    /// New hasher with the default 16 KiB sample windows and 128 KiB
    /// full-hash threshold.
    ///
    /// Probes the factory once and rejects primitives whose digest is
    /// shorter than a fingerprint with [`HashError::Configuration`].
    pub fn new<D, F>(factory: F) -> Result<Self, HashError>
    where
        D: StreamDigest + 'static,
        F: Fn() -> D + Send + Sync + 'static,
    {
        Self::with_policy(factory, DEFAULT_SAMPLE_SIZE, DEFAULT_SIZE_THRESHOLD)
    }

    /// New hasher with an explicit sampling policy. A `sample_size` of 0
    /// disables sampling: every input is hashed in full regardless of the
    /// threshold.
    pub fn with_policy<D, F>(
        factory: F,
        sample_size: u64,
        size_threshold: u64,
    ) -> Result<Self, HashError>
    where
        D: StreamDigest + 'static,
        F: Fn() -> D + Send + Sync + 'static,
    {
        let mut probe = factory();
        let digest_len = probe.finalize().len();
        if digest_len < FINGERPRINT_LEN {
            return Err(HashError::Configuration(format!(
                "digest primitive yields {digest_len} bytes, a fingerprint needs {FINGERPRINT_LEN}"
            )));
        }
        Ok(Self {
            factory: Box::new(move || Box::new(factory()) as Box<dyn StreamDigest>),
            sample_size,
            size_threshold,
        })
    }

    /// Fingerprint an in-memory byte slice. An empty slice is legal.
    pub fn sum_bytes(&self, data: &[u8]) -> Fingerprint {
        let len = data.len() as u64;
        let mut src = Cursor::new(data);
        // Reads from an in-memory buffer cannot fail and the digest width
        // was checked at construction.
        self.sum_reader(&mut src, len)
            .expect("fingerprinting an in-memory buffer cannot fail")
    }

    /// Fingerprint a file.
    ///
    /// The length is captured once from metadata at open time; concurrent
    /// truncation mid-read is not guarded against. The handle is closed on
    /// every exit path.
    pub fn sum_file<P: AsRef<Path>>(&self, path: P) -> Result<Fingerprint, HashError> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        self.sum_reader(&mut file, len)
    }

    /// Fingerprint any seekable source whose total length is `len`.
    pub fn sum_reader<R: Read + Seek>(
        &self,
        src: &mut R,
        len: u64,
    ) -> Result<Fingerprint, HashError> {
        let mut digest = (self.factory)();
        // Threshold first, then sample size: a zero sample size must fall
        // back to full mode whatever the threshold says.
        if len < self.size_threshold || self.sample_size == 0 {
            hash_all(src, digest.as_mut())?;
        } else {
            hash_samples(src, len, self.sample_size, digest.as_mut())?;
        }
        let out = digest.finalize();
        if out.len() < FINGERPRINT_LEN {
            return Err(HashError::Configuration(format!(
                "digest primitive yields {} bytes, a fingerprint needs {FINGERPRINT_LEN}",
                out.len()
            )));
        }
        Ok(Fingerprint::compose(&out, len))
    }
}

// ── Read strategies ──────────────────────────────────────────────────────────

/// Full mode: stream the entire source into the primitive.
fn hash_all<R: Read>(src: &mut R, digest: &mut dyn StreamDigest) -> io::Result<()> {
    let mut buf = vec![0u8; FULL_READ_CHUNK];
    loop {
        match src.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => digest.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Sampled mode: three windows of `sample_size` bytes, in fixed order
/// (start of the source, absolute midpoint, end). Windows are hashed
/// independently even when they overlap.
fn hash_samples<R: Read + Seek>(
    src: &mut R,
    len: u64,
    sample_size: u64,
    digest: &mut dyn StreamDigest,
) -> io::Result<()> {
    let mut window = vec![0u8; sample_size as usize];

    let n = read_window(src, &mut window)?;
    digest.update(&window[..n]);

    src.seek(SeekFrom::Start(len / 2))?;
    let n = read_window(src, &mut window)?;
    digest.update(&window[..n]);

    // Clamped so a window wider than the input seeks to the start of the
    // source rather than before it.
    let back = sample_size.min(len);
    src.seek(SeekFrom::End(-(back as i64)))?;
    let n = read_window(src, &mut window)?;
    digest.update(&window[..n]);

    Ok(())
}

/// Fill `buf` from `src`, stopping early at end-of-input. Returns the byte
/// count actually read; a short or empty window is not an error.
fn read_window<R: Read>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Murmur3x128;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: usize = 3;
    const THRESHOLD: u64 = 45;

    /// Tiny-policy hasher matching the reference vectors.
    fn murmur_hasher() -> SparseHasher {
        SparseHasher::with_policy(Murmur3x128::new, SAMPLE as u64, THRESHOLD).unwrap()
    }

    #[test]
    fn known_vector_small_input() {
        // Full mode: 5 bytes is below the 45-byte threshold.
        assert_eq!(
            murmur_hasher().sum_bytes(b"hello").to_hex(),
            "05d8a7b341bd9b025b1e906a48ae1d19"
        );
    }

    #[test]
    fn known_vector_zero_sample_size() {
        // Sampling disabled: full mode even at the threshold.
        let h = SparseHasher::with_policy(Murmur3x128::new, 0, THRESHOLD).unwrap();
        let data = vec![b'A'; 45];
        assert_eq!(
            h.sum_bytes(&data).to_hex(),
            "2d9123b54d37e9b8f94ab37a7eca6f40"
        );
    }

    #[test]
    fn empty_input_is_all_zero() {
        let h = murmur_hasher();
        assert_eq!(h.sum_bytes(b""), Fingerprint::from_bytes([0u8; 16]));
        assert_eq!(h.sum_bytes(b"").to_hex(), "00000000000000000000000000000000");
    }

    #[test]
    fn empty_input_in_sampled_mode_is_safe() {
        // Threshold 0 pushes even an empty input through the sampled path.
        let h = SparseHasher::with_policy(Murmur3x128::new, 3, 0).unwrap();
        assert_eq!(h.sum_bytes(b""), Fingerprint::from_bytes([0u8; 16]));
    }

    #[test]
    fn fingerprints_are_deterministic_across_instances() {
        let data = vec![0x5a; 1000];
        assert_eq!(
            murmur_hasher().sum_bytes(&data),
            murmur_hasher().sum_bytes(&data)
        );
    }

    #[test]
    fn gap_bytes_do_not_affect_sampled_fingerprint() {
        let h = murmur_hasher();
        let base = vec![b'A'; 45];
        let fp = h.sum_bytes(&base);

        // Flips strictly between the windows are invisible to sampling.
        let mut data = base.clone();
        data[SAMPLE] = b'B';
        data[45 - SAMPLE - 1] = b'B';
        assert_eq!(fp, h.sum_bytes(&data));
    }

    #[test]
    fn window_edge_bytes_affect_sampled_fingerprint() {
        let h = murmur_hasher();
        let base = vec![b'A'; 45];

        let flip = |at: usize| {
            let mut data = base.clone();
            data[at] = b'B';
            h.sum_bytes(&data)
        };

        let original = h.sum_bytes(&base);
        let lead_last = flip(SAMPLE - 1);
        let mid_first = flip(45 / 2);
        let mid_last = flip(45 / 2 + SAMPLE - 1);
        let tail_first = flip(45 - SAMPLE);

        let all = [original, lead_last, mid_first, mid_last, tail_first];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn total_length_always_affects_fingerprint() {
        let h = murmur_hasher();
        let a = h.sum_bytes(&vec![b'A'; 45]);
        let b = h.sum_bytes(&vec![b'A'; 46]);
        assert_ne!(a, b);
        // The size encoding lands in the leading bytes.
        assert_ne!(a.as_bytes()[0], b.as_bytes()[0]);
    }

    #[test]
    fn full_mode_sees_every_byte() {
        let h = murmur_hasher();
        let base = vec![b'A'; 44]; // below the threshold
        let fp = h.sum_bytes(&base);
        for at in [0usize, 20, 43] {
            let mut data = base.clone();
            data[at] = b'B';
            assert_ne!(fp, h.sum_bytes(&data));
        }
    }

    #[test]
    fn sampled_mode_hashes_the_three_windows_in_order() {
        let data: Vec<u8> = (0..45).collect();
        let mut d = Murmur3x128::new();
        d.update(&data[..3]); // leading window
        d.update(&data[22..25]); // midpoint window at ⌊45/2⌋
        d.update(&data[42..]); // trailing window
        let expected = Fingerprint::compose(&d.finalize(), 45);
        assert_eq!(murmur_hasher().sum_bytes(&data), expected);
    }

    #[test]
    fn overlapping_windows_are_hashed_independently() {
        // Windows wider than half the input overlap; overlapped bytes are
        // hashed once per window, and the short midpoint read is tolerated.
        let h = SparseHasher::with_policy(Murmur3x128::new, 4, 0).unwrap();
        let data = [1u8, 2, 3, 4, 5];

        let mut d = Murmur3x128::new();
        d.update(&data[0..4]); // leading window
        d.update(&data[2..5]); // midpoint window, short at end-of-input
        d.update(&data[1..5]); // trailing window
        let expected = Fingerprint::compose(&d.finalize(), 5);
        assert_eq!(h.sum_bytes(&data), expected);
    }

    #[test]
    fn window_wider_than_input_short_reads() {
        // All three windows clamp to the 4 available bytes; the trailing
        // back-seek clamps to the start instead of going negative.
        let h = SparseHasher::with_policy(Murmur3x128::new, 10, 0).unwrap();
        let data = b"tiny";

        let mut d = Murmur3x128::new();
        d.update(data);
        d.update(&data[2..]);
        d.update(data);
        let expected = Fingerprint::compose(&d.finalize(), 4);
        assert_eq!(h.sum_bytes(data), expected);
    }

    #[test]
    fn default_policy_with_blake3() {
        let h = SparseHasher::new(blake3::Hasher::new).unwrap();
        let fp = h.sum_bytes(b"hello");
        assert_eq!(fp, h.sum_bytes(b"hello"));
        // Below the default threshold every byte counts.
        assert_ne!(fp, h.sum_bytes(b"hellp"));
        // The first byte carries the varint-encoded length.
        assert_eq!(fp.as_bytes()[0], 5);
    }

    #[test]
    fn default_policy_samples_large_inputs() {
        let h = SparseHasher::new(blake3::Hasher::new).unwrap();
        let base = vec![0xab; 256 * 1024];
        let fp = h.sum_bytes(&base);

        let mut gap = base.clone();
        gap[DEFAULT_SAMPLE_SIZE as usize] = 0xcd;
        assert_eq!(fp, h.sum_bytes(&gap));

        let mut edge = base.clone();
        edge[DEFAULT_SAMPLE_SIZE as usize - 1] = 0xcd;
        assert_ne!(fp, h.sum_bytes(&edge));
    }

    // ── File sources ─────────────────────────────────────────────────────────

    #[test]
    fn file_and_buffer_fingerprints_agree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        let h = murmur_hasher();

        for size in [0usize, 12, 44, 45, 1000] {
            let data = vec![0x42; size];
            fs::write(&path, &data).unwrap();
            assert_eq!(h.sum_file(&path).unwrap(), h.sum_bytes(&data));
        }
    }

    #[test]
    fn known_vector_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample");
        fs::write(&path, b"hello").unwrap();
        let fp = murmur_hasher().sum_file(&path).unwrap();
        assert_eq!(fp.to_hex(), "05d8a7b341bd9b025b1e906a48ae1d19");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = murmur_hasher()
            .sum_file("/nonexistent/sparsum.bin")
            .unwrap_err();
        assert!(matches!(err, HashError::Io(_)));
    }

    // ── Construction ─────────────────────────────────────────────────────────

    struct TinyDigest;

    impl StreamDigest for TinyDigest {
        fn update(&mut self, _bytes: &[u8]) {}

        fn finalize(&mut self) -> Vec<u8> {
            vec![0; 4]
        }
    }

    #[test]
    fn short_digest_primitive_is_rejected() {
        let err = SparseHasher::new(|| TinyDigest).unwrap_err();
        assert!(matches!(err, HashError::Configuration(_)));
    }
}
