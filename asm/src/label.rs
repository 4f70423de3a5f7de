use indexmap::IndexMap;

use crate::error::Error;

/// Label → byte address bindings, kept in source order. Append-only: a
/// second definition of the same name is a hard error, so an address can
/// never change once recorded.
#[derive(Debug, Default)]
pub struct Labels {
    map: IndexMap<String, u32>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, addr: u32) -> Result<(), Error> {
        if self.map.contains_key(name) {
            return Err(Error::RedefinedLabel(name.to_string()));
        }
        self.map.insert(name.to_string(), addr);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.map.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.map.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
