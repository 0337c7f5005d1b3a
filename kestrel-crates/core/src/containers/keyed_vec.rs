use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// A vector which is indexed by a typed key instead of a `usize`.
///
/// Clause indices and variables are both dense, so the traces and assignments of the reasoning
/// core store their data in a [`KeyedVec`] and cannot mix up the two kinds of index.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    key: PhantomData<Key>,
    elements: Vec<Value>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            key: PhantomData,
            elements: Vec::new(),
        }
    }
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        KeyedVec {
            key: PhantomData,
            elements: self.elements.clone(),
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append `value` and return the key under which it is stored.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::create_from_index(self.elements.len());
        self.elements.push(value);
        key
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    pub fn last(&self) -> Option<&Value> {
        self.elements.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    /// All keys with a value, in increasing order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grow the vector so that `key` has a value; new slots hold `fill`.
    pub fn grow_to_include(&mut self, key: Key, fill: Value) {
        let required = key.index() + 1;
        if required > self.elements.len() {
            self.elements.resize(required, fill);
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.elements[key.index()]
    }
}

impl<Key, Value> FromIterator<Value> for KeyedVec<Key, Value> {
    fn from_iter<I: IntoIterator<Item = Value>>(values: I) -> Self {
        KeyedVec {
            key: PhantomData,
            elements: values.into_iter().collect(),
        }
    }
}

/// A key which maps one-to-one onto the indices `0..`.
pub trait StorageKey: Copy {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}
