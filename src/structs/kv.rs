//! Requests and results for the three key-value operations.
//!
//! Keys are arbitrary strings; the empty string is a valid key. Values are arbitrary bytes and may
//! be empty. Absence is only ever expressed through the `found`/`success` flags.

/// Look up the value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GetRequest {
    #[allow(missing_docs)]
    pub key: String,
}

impl GetRequest {
    #[allow(missing_docs)]
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The outcome of a lookup.
///
/// The payload of a miss is always empty; a value supplied alongside `found == false` is
/// discarded on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GetResult {
    /// Whether the key was present.
    found: bool,
    /// The stored bytes. Empty when `found` is false.
    value: Vec<u8>,
}

impl GetResult {
    /// Build a result from its raw parts.
    #[inline]
    pub fn new(found: bool, value: Vec<u8>) -> Self {
        if found {
            Self::hit(value)
        } else {
            Self::miss()
        }
    }

    /// The key was present and held `value`.
    #[inline]
    pub const fn hit(value: Vec<u8>) -> Self {
        Self { found: true, value }
    }

    /// The key was not present.
    #[inline]
    pub const fn miss() -> Self {
        Self {
            found: false,
            value: Vec::new(),
        }
    }

    /// Whether the key was present.
    #[inline]
    pub const fn found(&self) -> bool {
        self.found
    }

    /// The stored bytes, or `None` if the key was not present.
    #[inline]
    pub fn value(&self) -> Option<&[u8]> {
        self.found.then_some(self.value.as_slice())
    }

    /// Take the stored bytes, or `None` if the key was not present.
    #[inline]
    pub fn into_value(self) -> Option<Vec<u8>> {
        self.found.then_some(self.value)
    }

    /// Split into the flag and payload as they travel over the wire.
    #[inline]
    pub fn into_parts(self) -> (bool, Vec<u8>) {
        (self.found, self.value)
    }
}

/// Store a value under a key, replacing any previous value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PutRequest {
    #[allow(missing_docs)]
    pub key: String,
    /// May be empty.
    pub value: Vec<u8>,
}

impl PutRequest {
    #[allow(missing_docs)]
    #[inline]
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The outcome of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PutResult {
    #[allow(missing_docs)]
    pub success: bool,
}

/// Remove the value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoveRequest {
    #[allow(missing_docs)]
    pub key: String,
}

impl RemoveRequest {
    #[allow(missing_docs)]
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The outcome of a removal.
///
/// `success` is `true` if an entry existed and was removed and `false` if the key was absent. A
/// removal that could not be carried out is an error, not `success == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoveResult {
    #[allow(missing_docs)]
    pub success: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn miss_discards_payload() {
        let result = GetResult::new(false, vec![1, 2, 3]);
        assert!(!result.found());
        assert_eq!(result.value(), None);
        assert_eq!(result.clone().into_parts(), (false, Vec::new()));
        assert_eq!(result, GetResult::miss());
    }

    #[test]
    fn empty_hit_is_not_a_miss() {
        let result = GetResult::new(true, Vec::new());
        assert!(result.found());
        assert_eq!(result.value(), Some(&[][..]));
        assert_ne!(result, GetResult::miss());
    }

    #[test]
    fn hit_keeps_payload() {
        let result = GetResult::hit(vec![0x01, 0x02]);
        assert_eq!(result.into_value(), Some(vec![0x01, 0x02]));
    }

    #[test]
    fn empty_key_is_a_key() {
        assert_eq!(GetRequest::new("").key, "");
        assert_eq!(PutRequest::new("", Vec::new()).value, Vec::<u8>::new());
    }
}
