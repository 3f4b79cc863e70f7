//! Declaration modifiers.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Set of declaration modifiers.
    ///
    /// Source order of modifiers is irrelevant, so they are stored as flags
    /// and compare as a set.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;
    }
}

/// Canonical keyword order used when printing a set.
const KEYWORDS: [(ModifierSet, &str); 12] = [
    (ModifierSet::PUBLIC, "public"),
    (ModifierSet::PROTECTED, "protected"),
    (ModifierSet::PRIVATE, "private"),
    (ModifierSet::ABSTRACT, "abstract"),
    (ModifierSet::DEFAULT, "default"),
    (ModifierSet::STATIC, "static"),
    (ModifierSet::FINAL, "final"),
    (ModifierSet::TRANSIENT, "transient"),
    (ModifierSet::VOLATILE, "volatile"),
    (ModifierSet::SYNCHRONIZED, "synchronized"),
    (ModifierSet::NATIVE, "native"),
    (ModifierSet::STRICTFP, "strictfp"),
];

impl ModifierSet {
    /// Look up a single modifier by keyword.
    pub fn from_keyword(keyword: &str) -> Option<ModifierSet> {
        KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(flag, _)| *flag)
    }

    /// Keywords in canonical order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        KEYWORDS
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, kw)| *kw)
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<none>");
        }
        for (i, kw) in self.keywords().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(kw)?;
        }
        Ok(())
    }
}
