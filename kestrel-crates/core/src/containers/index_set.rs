use std::fmt::Debug;
use std::fmt::Formatter;
use std::marker::PhantomData;

use super::StorageKey;

const WORD_BITS: usize = u64::BITS as usize;

/// A mutable set of dense indices, stored as a bitset.
///
/// Iteration always happens in increasing index order, which makes every set operation in the
/// reasoning core deterministic. Removal happens in place and never invalidates other elements.
pub struct IndexSet<Key> {
    key: PhantomData<Key>,
    words: Vec<u64>,
    len: usize,
}

impl<Key> Default for IndexSet<Key> {
    fn default() -> Self {
        IndexSet {
            key: PhantomData,
            words: Vec::new(),
            len: 0,
        }
    }
}

impl<Key> Clone for IndexSet<Key> {
    fn clone(&self) -> Self {
        IndexSet {
            key: PhantomData,
            words: self.words.clone(),
            len: self.len,
        }
    }
}

impl<Key: StorageKey> IndexSet<Key> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with room for all keys with an index smaller than `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        IndexSet {
            key: PhantomData,
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            len: 0,
        }
    }

    /// The number of elements in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, key: Key) -> bool {
        let (word, bit) = position(key.index());
        self.words
            .get(word)
            .is_some_and(|&bits| bits & (1 << bit) != 0)
    }

    /// Adds `key` to the set. Returns whether the key was newly inserted.
    pub fn insert(&mut self, key: Key) -> bool {
        let (word, bit) = position(key.index());
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }

        let was_present = self.words[word] & (1 << bit) != 0;
        self.words[word] |= 1 << bit;

        if !was_present {
            self.len += 1;
        }
        !was_present
    }

    /// Removes `key` from the set. Returns whether the key was present.
    pub fn remove(&mut self, key: Key) -> bool {
        let (word, bit) = position(key.index());
        let Some(bits) = self.words.get_mut(word) else {
            return false;
        };

        let was_present = *bits & (1 << bit) != 0;
        *bits &= !(1 << bit);

        if was_present {
            self.len -= 1;
        }
        was_present
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
        self.len = 0;
    }

    /// The smallest element in the set.
    pub fn first(&self) -> Option<Key> {
        self.iter().next()
    }

    /// The largest element in the set.
    pub fn last(&self) -> Option<Key> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, bits)| **bits != 0)
            .map(|(word, bits)| {
                let bit = WORD_BITS - 1 - bits.leading_zeros() as usize;
                Key::create_from_index(word * WORD_BITS + bit)
            })
    }

    /// Iterate over the elements in increasing order.
    pub fn iter(&self) -> Iter<'_, Key> {
        Iter {
            key: PhantomData,
            words: &self.words,
            word: 0,
            remaining: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Only keep the elements for which `predicate` holds.
    pub fn retain(&mut self, mut predicate: impl FnMut(Key) -> bool) {
        let rejected = self.iter().filter(|key| !predicate(key.clone())).collect::<Vec<_>>();
        for key in rejected {
            let _ = self.remove(key);
        }
    }

    /// Adds every element of `other` to this set.
    pub fn union_with(&mut self, other: &IndexSet<Key>) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }

        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= *other_word;
        }

        self.len = count(&self.words);
    }

    /// Keeps only the elements which are also in `other`.
    pub fn intersect_with(&mut self, other: &IndexSet<Key>) {
        for (index, word) in self.words.iter_mut().enumerate() {
            *word &= other.words.get(index).copied().unwrap_or(0);
        }

        self.len = count(&self.words);
    }

    pub fn is_subset(&self, other: &IndexSet<Key>) -> bool {
        self.words.iter().enumerate().all(|(index, &word)| {
            let other_word = other.words.get(index).copied().unwrap_or(0);
            word & !other_word == 0
        })
    }
}

impl<Key: StorageKey> PartialEq for IndexSet<Key> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.is_subset(other)
    }
}

impl<Key: StorageKey> Eq for IndexSet<Key> {}

impl<Key: StorageKey + Debug> Debug for IndexSet<Key> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<Key: StorageKey> FromIterator<Key> for IndexSet<Key> {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        let mut set = IndexSet::new();
        set.extend(iter);
        set
    }
}

impl<Key: StorageKey> Extend<Key> for IndexSet<Key> {
    fn extend<T: IntoIterator<Item = Key>>(&mut self, iter: T) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

impl<'a, Key: StorageKey> IntoIterator for &'a IndexSet<Key> {
    type Item = Key;
    type IntoIter = Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`IndexSet`] in increasing order.
#[derive(Debug)]
pub struct Iter<'a, Key> {
    key: PhantomData<Key>,
    words: &'a [u64],
    word: usize,
    remaining: u64,
}

impl<Key: StorageKey> Iterator for Iter<'_, Key> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining == 0 {
            self.word += 1;
            self.remaining = *self.words.get(self.word)?;
        }

        let bit = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;

        Some(Key::create_from_index(self.word * WORD_BITS + bit))
    }
}

fn position(index: usize) -> (usize, usize) {
    (index / WORD_BITS, index % WORD_BITS)
}

fn count(words: &[u64]) -> usize {
    words.iter().map(|word| word.count_ones() as usize).sum()
}
