//! # Common Types

/// Index type for words and codes.
///
/// Token matrices are `i64`, matching the `LongTensor` layout consumers expect.
pub type IndexType = i64;

/// Target value type for the binary label matrices.
pub type TargetType = f32;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type CCHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> CCHashMap<K, V> {
            CCHashMap::new()
        }

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> CCHashMap<K, V> {
            CCHashMap::with_capacity(capacity)
        }
    } else {
        /// Type Alias for hash maps in this crate.
        pub type CCHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> CCHashMap<K, V> {
            CCHashMap::new()
        }

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> CCHashMap<K, V> {
            CCHashMap::with_capacity(capacity)
        }
    }
}
