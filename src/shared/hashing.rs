//! 32-bit rolling string hash.
//!
//! Used for recalculation cache keys, profile fingerprints and structural layout
//! signatures. Not cryptographic: collisions are possible and tolerated by every caller.

/// Incremental `h = h * 31 + c` hash over the characters of one or more strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingHash(u32);

impl RollingHash {
    pub fn new() -> Self {
        Self(0)
    }

    /// Feeds every character of `value` into the hash
    pub fn write_str(&mut self, value: &str) {
        for c in value.chars() {
            self.0 = self.0.wrapping_mul(31).wrapping_add(c as u32);
        }
    }

    pub fn finish(&self) -> u32 {
        self.0
    }
}

/// Hashes a single string
pub fn hash_string(value: &str) -> u32 {
    let mut hash = RollingHash::new();
    hash.write_str(value);
    hash.finish()
}

/// Hashes a single string and renders it as eight lowercase hex digits
pub fn hash_hex(value: &str) -> String {
    format!("{:08x}", hash_string(value))
}
