//! String interner for identifiers.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::name::WELL_KNOWN;
use crate::Name;

struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Interner mapping identifier spellings to [`Name`]s.
///
/// Interned text is leaked so lookups can hand out `&'static str`; the set of
/// identifiers in a script session is small and lives as long as the session.
/// Interning goes through `&self`, so the lexer, parser and evaluator can
/// share one interner by reference.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner with the well-known names pre-interned at their
    /// fixed ids.
    pub fn new() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        for (index, text) in WELL_KNOWN.iter().enumerate() {
            let name = Name::from_index(u32::try_from(index).unwrap_or(u32::MAX));
            table.map.insert(text, name);
            table.strings.push(text);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern an identifier, normalizing it to upper case.
    pub fn intern(&self, ident: &str) -> Name {
        if ident.bytes().any(|b| b.is_ascii_lowercase()) {
            self.intern_exact(&ident.to_ascii_uppercase())
        } else {
            self.intern_exact(ident)
        }
    }

    fn intern_exact(&self, text: &str) -> Name {
        if let Some(&name) = self.table.read().map.get(text) {
            return name;
        }

        let mut table = self.table.write();
        if let Some(&name) = table.map.get(text) {
            return name;
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let name = Name::from_index(u32::try_from(table.strings.len()).unwrap_or(u32::MAX));
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        name
    }

    /// Find an already-interned identifier without interning it.
    pub fn get(&self, ident: &str) -> Option<Name> {
        let upper = ident.to_ascii_uppercase();
        self.table.read().map.get(upper.as_str()).copied()
    }

    /// Upper-case spelling of `name`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
