use indexmap::IndexMap;

use crate::{
    error::{Error, Result},
    Tag,
};

/// An NBT compound: named tags, kept in the order they were added so that
/// writing reproduces the order they were read in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    tags: IndexMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.tags.get_mut(name)
    }

    /// Add a new entry. Fails if `name` is already present, see
    /// [`Compound::set`] to overwrite.
    pub fn insert(&mut self, name: impl Into<String>, tag: Tag) -> Result<()> {
        let name = name.into();
        if self.tags.contains_key(&name) {
            return Err(Error::invalid_argument(format!(
                "key '{}' is already present in compound",
                name
            )));
        }
        self.tags.insert(name, tag);
        Ok(())
    }

    /// Set an entry, returning the previous value. An overwritten entry
    /// keeps its position.
    pub fn set(&mut self, name: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.tags.insert(name.into(), tag)
    }

    /// Remove an entry. Later entries keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.tags.shift_remove(name)
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tag> {
        self.tags.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Tag> {
        self.tags.iter_mut()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Tag> {
        self.tags.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Tag> {
        self.tags.values()
    }
}

/// Later entries overwrite earlier ones with the same name.
impl<K: Into<String>> FromIterator<(K, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, Tag)>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for (k, v) in iter {
            compound.set(k, v);
        }
        compound
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = indexmap::map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
