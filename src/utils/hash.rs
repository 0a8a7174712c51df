//! Content hashing utilities.

use xxhash_rust::xxh3::{xxh3_64, Xxh3};

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Hash a sequence of string parts, separating them so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn hash_str_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut hasher = Xxh3::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(&[0x1f]);
    }
    hasher.digest()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let data = b"hello world";
        let hash = content_hash(data);
        assert_ne!(hash, 0);
        assert_eq!(hash, content_hash(data));
        assert_ne!(hash, content_hash(b"hello world!"));
    }

    #[test]
    fn test_hash_parts_are_separated() {
        assert_ne!(hash_str_parts(["ab", "c"]), hash_str_parts(["a", "bc"]));
        assert_eq!(hash_str_parts(["a", "b"]), hash_str_parts(["a", "b"]));
    }
}
