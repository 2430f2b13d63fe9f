//! Compressible value generation
//!
//! Values written by the benchmark should compress to a controllable
//! fraction of their original size, because storage engines behave very
//! differently on compressible and incompressible data. Instead of drawing
//! fresh random bytes per value (which would be incompressible and slow),
//! a 1 MiB pool of compressible chunks is built once and values are served
//! as cyclic slices of it. Repeated calls are therefore not independent
//! random draws; the pool keeps the compression ratio stable across the
//! whole run.

use super::Random;

/// Total size of the precomputed data pool
const POOL_SIZE: usize = 1 << 20;

/// Length of one compressible chunk
const CHUNK_LEN: usize = 100;

/// Cyclic generator of compressible byte slices
///
/// # Example
///
/// ```
/// use dbpulse::random::DataGenerator;
///
/// let mut gen = DataGenerator::new(0.5);
/// let value = gen.generate(100);
/// assert_eq!(value.len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct DataGenerator {
    data: Vec<u8>,
    pos: usize,
}

impl DataGenerator {
    /// Build the data pool for the given compression ratio
    ///
    /// Each chunk is a printable-ASCII random string of
    /// `max(1, floor(CHUNK_LEN * compression_ratio))` bytes repeated and
    /// truncated to exactly `CHUNK_LEN` bytes, so a ratio of 0.5 yields
    /// data that compresses to roughly half its size. The pool generator
    /// is seeded independently of the benchmark-wide PRNG.
    pub fn new(compression_ratio: f64) -> Self {
        let mut rng = Random::new(301);
        let mut data = Vec::with_capacity(POOL_SIZE + CHUNK_LEN);
        while data.len() < POOL_SIZE {
            let chunk = compressible_chunk(&mut rng, compression_ratio, CHUNK_LEN);
            data.extend_from_slice(&chunk);
        }
        data.truncate(POOL_SIZE);
        Self { data, pos: 0 }
    }

    /// Return the next `len` bytes from the pool
    ///
    /// The cursor wraps to the start of the pool when fewer than `len`
    /// bytes remain. `len` must not exceed the pool size.
    pub fn generate(&mut self, len: usize) -> &[u8] {
        assert!(len <= self.data.len(), "requested slice exceeds data pool");
        if self.pos + len > self.data.len() {
            self.pos = 0;
        }
        self.pos += len;
        &self.data[self.pos - len..self.pos]
    }

    /// Size of the backing pool in bytes
    pub fn pool_size(&self) -> usize {
        self.data.len()
    }
}

/// Random printable-ASCII bytes in `[32, 126]`
fn random_bytes(rng: &mut Random, len: usize) -> Vec<u8> {
    (0..len).map(|_| b' ' + rng.uniform(95) as u8).collect()
}

/// One chunk: a short random string repeated out to exactly `len` bytes
fn compressible_chunk(rng: &mut Random, compression_ratio: f64, len: usize) -> Vec<u8> {
    let raw_len = ((len as f64 * compression_ratio) as usize).max(1);
    let raw = random_bytes(rng, raw_len);

    let mut chunk = Vec::with_capacity(len + raw_len);
    while chunk.len() < len {
        chunk.extend_from_slice(&raw);
    }
    chunk.truncate(len);
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_is_exactly_one_mebibyte() {
        let gen = DataGenerator::new(0.5);
        assert_eq!(gen.pool_size(), 1 << 20);
    }

    #[test]
    fn test_generate_returns_exact_length() {
        let mut gen = DataGenerator::new(0.5);
        for len in [1, 16, 100, 4096, 100_000] {
            assert_eq!(gen.generate(len).len(), len);
        }
    }

    #[test]
    fn test_cursor_wraps_instead_of_overrunning() {
        let mut gen = DataGenerator::new(0.5);
        let first = gen.generate(100).to_vec();

        // Consume the entire pool, leaving the cursor at the end
        gen.generate(POOL_SIZE - 100);
        assert_eq!(gen.generate(POOL_SIZE).len(), POOL_SIZE);

        // The next request cannot be satisfied from the remainder and must
        // wrap back to the start of the pool
        assert_eq!(gen.generate(100), &first[..]);
    }

    #[test]
    fn test_content_is_deterministic() {
        let mut a = DataGenerator::new(0.25);
        let mut b = DataGenerator::new(0.25);
        assert_eq!(a.generate(1000), b.generate(1000));
    }

    #[test]
    fn test_chunks_repeat_at_the_compression_period() {
        let mut gen = DataGenerator::new(0.25);
        // A ratio of 0.25 repeats a 25-byte string inside each 100-byte chunk
        let chunk = gen.generate(100);
        assert_eq!(&chunk[0..25], &chunk[25..50]);
        assert_eq!(&chunk[0..25], &chunk[50..75]);
    }

    #[test]
    fn test_bytes_are_printable_ascii() {
        let mut gen = DataGenerator::new(0.5);
        assert!(gen.generate(10_000).iter().all(|&b| (32..=126).contains(&b)));
    }

    #[test]
    #[should_panic(expected = "exceeds data pool")]
    fn test_oversized_request_panics() {
        let mut gen = DataGenerator::new(0.5);
        gen.generate(POOL_SIZE + 1);
    }
}
