//! Named units of source text.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// File extension used for units named after a type.
pub const SOURCE_EXTENSION: &str = "java";

/// One named piece of source text submitted to or produced by a compilation.
///
/// Immutable once constructed. Clones share the underlying text. Two units are
/// equal when their names and contents are equal; the content hash is computed
/// once at construction and only serves as a fast pre-check.
#[derive(Clone)]
pub struct SourceUnit {
    name: Arc<str>,
    text: Arc<str>,
    content_hash: u64,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name: String = name.into();
        let text: String = text.into();
        let content_hash = hash_text(&text);
        SourceUnit {
            name: Arc::from(name),
            text: Arc::from(text),
            content_hash,
        }
    }

    /// Create a unit named after a fully qualified type, e.g.
    /// `com.example.Foo` becomes `com/example/Foo.java`.
    pub fn for_type(qualified_name: &str, text: impl Into<String>) -> Self {
        Self::new(unit_name_for_type(qualified_name), text)
    }

    /// Logical path of the unit.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the unit's name, for diagnostics that outlive a borrow.
    #[inline]
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }
}

/// Map a fully qualified type name to the unit name a compiler would expect.
pub fn unit_name_for_type(qualified_name: &str) -> String {
    format!("{}.{SOURCE_EXTENSION}", qualified_name.replace('.', "/"))
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for SourceUnit {
    fn eq(&self, other: &Self) -> bool {
        self.content_hash == other.content_hash
            && self.name == other.name
            && self.text == other.text
    }
}

impl Eq for SourceUnit {}

impl Hash for SourceUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.content_hash.hash(state);
    }
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("name", &self.name)
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
