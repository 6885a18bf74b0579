//! IRI interning with shared storage and O(1) equality.

use crate::NamedNode;
use kestrel_iri::{Iri, IriParseError};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A table of deduplicated IRIs.
///
/// Interning the same string twice returns handles that share storage and
/// compare equal by pointer:
/// ```
/// use kestrel_model::UriInterner;
///
/// let mut interner = UriInterner::new();
/// let a = interner.intern("http://example.com/s")?;
/// let b = interner.intern("http://example.com/s")?;
/// assert!(a.shares_storage_with(&b));
/// assert_eq!(a, b);
/// # Result::<_, kestrel_model::IriParseError>::Ok(())
/// ```
///
/// Each interner is independent: two interners never share storage, and the
/// table is not synchronized. Embedders sharing one interner between threads
/// must guard it themselves.
#[derive(Default, Debug)]
pub struct UriInterner {
    iris: HashSet<Arc<str>>,
}

impl UriInterner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `iri` and returns the shared handle for it, creating it on
    /// first use.
    pub fn intern(&mut self, iri: &str) -> Result<InternedIri, IriParseError> {
        Iri::parse(iri)?;
        Ok(self.intern_unchecked(iri))
    }

    /// Like [`UriInterner::intern`] without validating the IRI.
    pub fn intern_unchecked(&mut self, iri: &str) -> InternedIri {
        if let Some(interned) = self.iris.get(iri) {
            return InternedIri(Arc::clone(interned));
        }
        let interned: Arc<str> = Arc::from(iri);
        self.iris.insert(Arc::clone(&interned));
        InternedIri(interned)
    }

    /// Looks up an already-interned IRI without creating it.
    pub fn get(&self, iri: &str) -> Option<InternedIri> {
        self.iris.get(iri).map(|i| InternedIri(Arc::clone(i)))
    }

    /// The number of distinct IRIs in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.iris.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.iris.is_empty()
    }
}

/// A handle on an IRI interned by a [`UriInterner`].
///
/// Cloning is a reference count increment; the backing string is freed when
/// the last handle and the interner entry are gone. Equality checks the
/// pointer first and only falls back to the string for handles from
/// different interners. Ordering always uses the string.
#[derive(Clone, Debug)]
pub struct InternedIri(Arc<str>);

impl InternedIri {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the two handles point at the same backing storage,
    /// i.e. whether they come from the same interner.
    #[inline]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for InternedIri {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for InternedIri {}

impl Hash for InternedIri {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl PartialOrd for InternedIri {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InternedIri {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Borrow<str> for InternedIri {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternedIri {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<InternedIri> for NamedNode {
    #[inline]
    fn from(iri: InternedIri) -> Self {
        NamedNode::new_unchecked(iri.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut interner = UriInterner::new();
        let a = interner.intern("http://example.com/a").unwrap();
        let b = interner.intern("http://example.com/a").unwrap();
        let c = interner.intern("http://example.com/c").unwrap();
        assert!(a.shares_storage_with(&b));
        assert!(!a.shares_storage_with(&c));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn separate_interners_compare_by_string() {
        let mut first = UriInterner::new();
        let mut second = UriInterner::new();
        let a = first.intern("http://example.com/a").unwrap();
        let b = second.intern("http://example.com/a").unwrap();
        assert!(!a.shares_storage_with(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_iris_are_rejected() {
        let mut interner = UriInterner::new();
        assert!(interner.intern("not an iri").is_err());
        assert!(interner.is_empty());
    }
}
