use crate::{
    error::{Error, Result},
    Tag, TagType,
};

/// An NBT list. Every element has the same type.
///
/// A list is either *fixed*, with an element type chosen up front, or
/// *dynamic*, taking its element type from the first element added. Either
/// way, once the list holds an element its type is locked: adding or setting
/// a tag of another type fails with a
/// [`TypeMismatch`][crate::error::ErrorKind::TypeMismatch]. An empty list can
/// be reconfigured freely.
///
/// ```
/// use nbtree::{List, Tag, TagType};
///
/// let mut list = List::new();
/// list.push(Tag::Int(1)).unwrap();
/// assert_eq!(list.element_type(), Some(TagType::Int));
/// assert!(list.push(Tag::from("two")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct List {
    tags: Vec<Tag>,
    // None while dynamic.
    fixed: Option<TagType>,
}

impl List {
    /// Create an empty dynamic list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list fixed to the given element type.
    pub fn with_element_type(element_type: TagType) -> Result<Self> {
        let mut list = Self::new();
        list.set_element_type(element_type)?;
        Ok(list)
    }

    /// Build a list from tags that are assumed to all be of `fixed`, or of
    /// the type of the first tag when `fixed` is `None`.
    pub(crate) fn from_parts(fixed: Option<TagType>, tags: Vec<Tag>) -> Self {
        Self { tags, fixed }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The type of the elements. For a dynamic list this is the type of its
    /// first element, or `None` while the list is empty.
    pub fn element_type(&self) -> Option<TagType> {
        self.fixed.or_else(|| self.tags.first().map(Tag::tag_type))
    }

    pub fn is_dynamic(&self) -> bool {
        self.fixed.is_none()
    }

    /// Make the list dynamic, or keep it fixed.
    ///
    /// A dynamic list can't be switched to fixed with this method: an empty
    /// one has no type to fix to (use [`List::set_element_type`]) and a
    /// non-empty one is locked.
    pub fn set_dynamic(&mut self, dynamic: bool) -> Result<()> {
        match (dynamic, self.fixed) {
            (true, _) => {
                self.fixed = None;
                Ok(())
            }
            (false, Some(_)) => Ok(()),
            (false, None) if self.is_empty() => Err(Error::invalid_operation(
                "can't make an empty list fixed without a type, set the element type instead",
            )),
            (false, None) => Err(Error::invalid_operation(
                "can't switch a non-empty dynamic list to a fixed element type",
            )),
        }
    }

    /// Fix the element type of an empty list.
    pub fn set_element_type(&mut self, element_type: TagType) -> Result<()> {
        if element_type == TagType::End {
            return Err(Error::invalid_argument(
                "can't fix a list to 'End', make it dynamic instead",
            ));
        }
        if !self.is_empty() {
            return Err(Error::invalid_operation(
                "can't change the element type of a list that isn't empty",
            ));
        }
        self.fixed = Some(element_type);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    /// Mutable access to an element. Replacing the element with a tag of
    /// another type breaks the list's lock and makes writing it fail.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.tags.get_mut(index)
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, tag: Tag) -> Result<Tag> {
        self.check_index(index, self.len())?;
        self.verify(&tag)?;
        Ok(std::mem::replace(&mut self.tags[index], tag))
    }

    pub fn push(&mut self, tag: Tag) -> Result<()> {
        self.verify(&tag)?;
        self.tags.push(tag);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, tag: Tag) -> Result<()> {
        self.check_index(index, self.len() + 1)?;
        self.verify(&tag)?;
        self.tags.insert(index, tag);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Tag> {
        self.check_index(index, self.len())?;
        Ok(self.tags.remove(index))
    }

    /// Remove every element. A fixed list stays fixed.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "index {} out of bounds for list of length {}",
                index,
                self.len()
            )))
        }
    }

    fn verify(&self, tag: &Tag) -> Result<()> {
        match self.element_type() {
            Some(expected) if expected != tag.tag_type() => {
                Err(Error::list_element(expected, tag.tag_type()))
            }
            _ => Ok(()),
        }
    }
}

/// Lists are equal when they hold equal tags and report the same element
/// type. Whether the type is fixed doesn't matter.
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.element_type() == other.element_type() && self.tags == other.tags
    }
}

/// Build a dynamic list, failing if the tags are not all the same type.
impl TryFrom<Vec<Tag>> for List {
    type Error = Error;

    fn try_from(tags: Vec<Tag>) -> Result<Self> {
        let mut list = List::new();
        for tag in tags {
            list.push(tag)?;
        }
        Ok(list)
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
