//! SymTable: string-keyed map with separate chaining and staged growth.
//!
//! Bindings live in a `slotmap` arena; each bucket holds the arena key of
//! its chain head and every binding holds the key of its successor, so a
//! chain is a singly linked list threaded through the arena. Rehashing on
//! growth only relinks keys, it never moves or clones a binding.

use crate::hash::{bucket_index, next_bucket_count, BUCKET_COUNTS};
use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use slotmap::{new_key_type, SlotMap};
use std::collections::TryReserveError;

new_key_type! {
    /// Arena key of one binding.
    struct BindingKey;
}

#[derive(Debug)]
struct Binding<V> {
    key: Box<str>,
    value: V,
    next: Option<BindingKey>,
}

/// Why `put` did not add a binding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertError {
    /// A binding with an equal key already exists; nothing was changed.
    DuplicateKey,
    /// The owned copy of the key could not be allocated.
    OutOfMemory,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("a binding with this key already exists"),
            InsertError::OutOfMemory => f.write_str("insufficient memory for a new binding"),
        }
    }
}

impl std::error::Error for InsertError {}

/// Failure to create a table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TableError {
    OutOfMemory,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::OutOfMemory => f.write_str("insufficient memory for the bucket array"),
        }
    }
}

impl std::error::Error for TableError {}

/// Unordered map from owned string keys to values of type `V`.
///
/// Values are stored verbatim and never inspected. Use `V = ()` for a set,
/// `V = Option<T>` when a binding may carry no value, and `V = &T` to hold a
/// non-owning reference to caller-managed data.
///
/// Mutating operations take `&mut self`, so the table cannot change shape
/// while a traversal or a borrowed value is alive. Sharing a table between
/// threads is the caller's business (wrap it in a lock).
pub struct SymTable<V> {
    buckets: Vec<Option<BindingKey>>,
    bindings: SlotMap<BindingKey, Binding<V>>,
}

impl<V> SymTable<V> {
    /// Empty table on the smallest bucket tier.
    pub fn new() -> Self {
        Self {
            buckets: vec![None; BUCKET_COUNTS[0]],
            bindings: SlotMap::with_key(),
        }
    }

    /// Like [`SymTable::new`], but reports a failed bucket-array allocation
    /// instead of aborting.
    pub fn try_new() -> Result<Self, TableError> {
        let buckets = empty_buckets(BUCKET_COUNTS[0]).map_err(|_| TableError::OutOfMemory)?;
        Ok(Self {
            buckets,
            bindings: SlotMap::with_key(),
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Current number of buckets; always one of [`BUCKET_COUNTS`].
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bindings per bucket. Exceeds 1.0 only once the last tier is reached.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    fn chain(&self, index: usize) -> Chain<'_, V> {
        Chain {
            bindings: &self.bindings,
            cur: self.buckets.get(index).copied().flatten(),
        }
    }

    fn find(&self, key: &str) -> Option<BindingKey> {
        self.chain(bucket_index(key, self.bucket_count()))
            .find(|(_, b)| &*b.key == key)
            .map(|(k, _)| k)
    }

    /// Adds a binding for `key`. Fails without touching the table if `key`
    /// is already bound.
    ///
    /// When the table holds as many bindings as buckets it first moves to
    /// the next bucket tier. If that allocation fails the binding is still
    /// added to the current buckets.
    pub fn put(&mut self, key: &str, value: V) -> Result<(), InsertError> {
        if self.find(key).is_some() {
            return Err(InsertError::DuplicateKey);
        }

        if self.len() >= self.bucket_count() {
            let _ = self.expand();
        }

        let owned = owned_key(key).map_err(|_| InsertError::OutOfMemory)?;
        let index = bucket_index(key, self.bucket_count());
        let next = self.buckets[index];
        let k = self.bindings.insert(Binding {
            key: owned,
            value,
            next,
        });
        self.buckets[index] = Some(k);
        Ok(())
    }

    /// Moves every binding into the next bucket tier. A no-op on the last
    /// tier. On allocation failure the table is left as it was.
    fn expand(&mut self) -> Result<(), TryReserveError> {
        let Some(new_count) = next_bucket_count(self.bucket_count()) else {
            return Ok(());
        };
        let mut relinked = empty_buckets(new_count)?;

        for head in &self.buckets {
            let mut cur = *head;
            while let Some(k) = cur {
                let binding = &mut self.bindings[k];
                cur = binding.next;
                let index = bucket_index(&binding.key, new_count);
                binding.next = relinked[index];
                relinked[index] = Some(k);
            }
        }

        self.buckets = relinked;
        Ok(())
    }

    /// Swaps in `value` for an existing binding and returns the old value.
    /// Returns `None` (dropping `value`) if `key` is not bound.
    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let k = self.find(key)?;
        self.bindings
            .get_mut(k)
            .map(|b| mem::replace(&mut b.value, value))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let k = self.find(key)?;
        self.bindings.get(k).map(|b| &b.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        self.bindings.get_mut(k).map(|b| &mut b.value)
    }

    /// Unlinks the binding for `key` and returns its value. The bucket
    /// count is never reduced.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = bucket_index(key, self.bucket_count());
        let mut prev: Option<BindingKey> = None;
        let mut cur = self.buckets[index];

        while let Some(k) = cur {
            let binding = self.bindings.get(k)?;
            if &*binding.key == key {
                let next = binding.next;
                match prev {
                    None => self.buckets[index] = next,
                    Some(p) => self.bindings[p].next = next,
                }
                return self.bindings.remove(k).map(|b| b.value);
            }
            prev = cur;
            cur = binding.next;
        }
        None
    }

    /// Calls `visit` once for every binding.
    ///
    /// Order is bucket index ascending, then chain order, which is most
    /// recently inserted first. The visitor may read this table or others
    /// but cannot add or remove bindings while the traversal runs.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &V),
    {
        for (key, value) in self.iter() {
            visit(key, value);
        }
    }

    /// Iterator over `(key, value)` in traversal order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            bindings: &self.bindings,
            cur: None,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }
}

impl<V> Default for SymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for SymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a SymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn empty_buckets(count: usize) -> Result<Vec<Option<BindingKey>>, TryReserveError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(count)?;
    buckets.resize(count, None);
    Ok(buckets)
}

fn owned_key(key: &str) -> Result<Box<str>, TryReserveError> {
    let mut s = String::new();
    s.try_reserve_exact(key.len())?;
    s.push_str(key);
    Ok(s.into_boxed_str())
}

/// Walks one bucket's chain.
struct Chain<'a, V> {
    bindings: &'a SlotMap<BindingKey, Binding<V>>,
    cur: Option<BindingKey>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = (BindingKey, &'a Binding<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let binding = self.bindings.get(k)?;
        self.cur = binding.next;
        Some((k, binding))
    }
}

/// Iterator over the bindings of a [`SymTable`].
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Option<BindingKey>>,
    bindings: &'a SlotMap<BindingKey, Binding<V>>,
    cur: Option<BindingKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let bindings = self.bindings;
        loop {
            if let Some(binding) = self.cur.and_then(|k| bindings.get(k)) {
                self.cur = binding.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&*binding.key, &binding.value));
            }
            self.cur = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}
