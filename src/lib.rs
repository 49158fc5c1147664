//! Fast, constant-time fingerprints for files and byte buffers.
//!
//! Rather than hashing every byte, [`SparseHasher`] reads three fixed-size
//! windows (the beginning, the midpoint and the end of the input), feeds
//! them to a streaming digest primitive, and folds the exact input length
//! into a fixed 16-byte [`Fingerprint`]. Inputs below a configurable size
//! threshold are hashed in full, so small files keep byte-exact change
//! detection.
//!
//! ```
//! use sparsum::SparseHasher;
//!
//! # fn main() -> Result<(), sparsum::HashError> {
//! let hasher = SparseHasher::new(blake3::Hasher::new)?;
//! let a = hasher.sum_bytes(b"some file contents");
//! let b = hasher.sum_bytes(b"some file contents");
//! assert_eq!(a, b);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fingerprint;
pub mod hasher;
pub mod primitive;

pub use error::HashError;
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
pub use hasher::{SparseHasher, DEFAULT_SAMPLE_SIZE, DEFAULT_SIZE_THRESHOLD};
pub use primitive::{Murmur3x128, StreamDigest};
