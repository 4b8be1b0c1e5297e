use std::{collections::HashMap, fmt, num::NonZeroU32};

/// A handle to an interned identifier. To retrieve its text, use
/// [`Interner::get`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Interned(NonZeroU32);

impl fmt::Debug for Interned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interned({})", self.0)
    }
}

impl From<&Interned> for Interned {
    fn from(value: &Interned) -> Self {
        *value
    }
}

/// Deduplicating store for the identifiers of one compilation.
#[derive(Default)]
pub struct Interner {
    handles: HashMap<Box<str>, Interned>,
    names: Vec<Box<str>>,
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.names).finish()
    }
}

impl Interner {
    pub fn with_capacity(capacity: usize) -> Self {
        Interner {
            handles: HashMap::with_capacity(capacity),
            names: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the handle of `name`, interning it first if it's new.
    pub fn intern(&mut self, name: &str) -> Interned {
        if let Some(handle) = self.handles.get(name) {
            return *handle;
        }
        let next = u32::try_from(self.names.len() + 1)
            .ok()
            .and_then(NonZeroU32::new)
            .expect("too many identifiers");
        let handle = Interned(next);
        self.names.push(name.into());
        self.handles.insert(name.into(), handle);
        handle
    }

    /// The handle of `name`, if it was interned.
    pub fn lookup(&self, name: &str) -> Option<Interned> {
        self.handles.get(name).copied()
    }

    /// Panics if `handle` comes from another interner.
    pub fn get(&self, handle: impl Into<Interned>) -> &str {
        let Interned(index) = handle.into();
        &self.names[index.get() as usize - 1]
    }
}
