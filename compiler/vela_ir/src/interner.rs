//! Sharded byte-string interner with process-wide lifetime.
//!
//! The interner canonicalizes *byte* content, not UTF-8 text: string
//! literals may carry arbitrary bytes produced by numeric escapes. Two
//! calls with content-equal input return the same [`Name`], so handle
//! equality substitutes for content equality everywhere downstream.
//!
//! Entries are leaked into `'static` storage and live until process exit.
//! That is the anchoring guarantee the lexer needs: a handle appearing in
//! a token payload can never dangle, no matter when the parser consumes
//! it or how many nested compilations share the interner.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned byte strings.
struct InternShard {
    /// Map from content to local index.
    map: FxHashMap<&'static [u8], u32>,
    /// Storage for the canonical entries.
    entries: Vec<&'static [u8]>,
}

/// Error when interning fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity.
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                Name::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            entries: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern the empty string at index 0 (Name::EMPTY)
        let empty: &'static [u8] = b"";
        shard.map.insert(empty, 0);
        shard.entries.push(empty);
        shard
    }
}

/// Sharded byte-string interner for concurrent access.
///
/// # Thread safety
///
/// Lookup-or-insert is atomic per shard (`RwLock` with a double-checked
/// insert), preserving the canonicalization guarantee when several
/// simultaneously live lexers, possibly on different threads, share
/// one interner.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned entries across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner holding only the empty string.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });
        Self {
            shards,
            total_count: AtomicUsize::new(1),
        }
    }

    /// Compute shard for content based on a prefix hash.
    #[inline]
    fn shard_for(bytes: &[u8]) -> usize {
        let mut hash = 0u32;
        for &byte in bytes.iter().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Try to intern byte content, returning its `Name` or an error on
    /// shard overflow.
    pub fn try_intern(&self, bytes: &[u8]) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(bytes);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(bytes) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring the write lock
        if let Some(&local) = guard.map.get(bytes) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        // Leak the content to get a 'static canonical entry
        let leaked: &'static [u8] = Box::leak(bytes.to_vec().into_boxed_slice());

        let local = u32::try_from(guard.entries.len())
            .ok()
            .filter(|&l| l <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow {
                shard_idx,
                count: guard.entries.len(),
            })?;
        guard.entries.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Intern byte content, returning its `Name`.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity; use [`try_intern`](Self::try_intern)
    /// to handle that case gracefully.
    #[inline]
    pub fn intern(&self, bytes: &[u8]) -> Name {
        match self.try_intern(bytes) {
            Ok(name) => name,
            Err(e) => panic!("{e}"),
        }
    }

    /// Look up the content for a `Name`.
    ///
    /// The `'static` lifetime is real: canonical entries are never
    /// deallocated.
    pub fn lookup(&self, name: Name) -> &'static [u8] {
        let shard = &self.shards[name.shard()];
        let guard = shard.read();
        guard.entries[name.local()]
    }

    /// Number of interned entries (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// `true` when only the empty string has been interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handle for use across simultaneously live lexers.
///
/// Nested chunk compilation constructs a second, independent lexer over
/// the same runtime; both share this handle. The newtype keeps the `Arc`
/// an implementation detail.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_lookup() {
        let interner = StringInterner::new();

        let hello = interner.intern(b"hello");
        let world = interner.intern(b"world");
        let hello2 = interner.intern(b"hello");

        assert_eq!(hello, hello2);
        assert_ne!(hello, world);

        assert_eq!(interner.lookup(hello), b"hello");
        assert_eq!(interner.lookup(world), b"world");
    }

    #[test]
    fn empty_content_is_name_empty() {
        let interner = StringInterner::new();
        let empty = interner.intern(b"");
        assert_eq!(empty, Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), b"");
    }

    #[test]
    fn non_utf8_content_is_canonicalized() {
        let interner = StringInterner::new();
        let a = interner.intern(&[0xFF, 0x00, 0x80]);
        let b = interner.intern(&[0xFF, 0x00, 0x80]);
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), &[0xFF, 0x00, 0x80]);
    }

    #[test]
    fn shared_handles_agree() {
        let interner = SharedInterner::new();
        let interner2 = interner.clone();

        let name1 = interner.intern(b"shared");
        let name2 = interner2.intern(b"shared");

        assert_eq!(name1, name2);
    }

    #[test]
    fn concurrent_interning_is_canonical() {
        let interner = SharedInterner::new();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let interner = interner.clone();
            handles.push(std::thread::spawn(move || {
                (0..100u32)
                    .map(|i| interner.intern(format!("key-{i}").as_bytes()))
                    .collect::<Vec<_>>()
            }));
        }
        let results: Vec<Vec<Name>> = handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(v) => v,
                Err(_) => panic!("worker thread panicked"),
            })
            .collect();
        for window in results.windows(2) {
            assert_eq!(window[0], window[1]);
        }
    }
}
