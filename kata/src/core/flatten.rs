//! Lazy depth-first flattening of arbitrarily nested sequences.
//!
//! A [`Nested`] value is either an atom or a container. Containers are eager
//! lists or lazy iterators; text is always an atom even though it could be
//! iterated. [`deep_flatten`] walks the tree depth-first, left to right, and
//! only pulls from an inner iterator when the caller asks for the next atom.

use std::fmt;
use std::iter::FusedIterator;

/// A node in a nested structure.
pub enum Nested<'a, T> {
    /// Indivisible value, yielded as-is.
    Atom(T),
    /// Eager container.
    List(Vec<Nested<'a, T>>),
    /// Lazy container. May be infinite, may borrow its source.
    Iter(Box<dyn Iterator<Item = Nested<'a, T>> + 'a>),
}

impl<'a, T> Nested<'a, T> {
    pub fn atom(value: T) -> Self {
        Nested::Atom(value)
    }

    pub fn list(items: impl IntoIterator<Item = Nested<'a, T>>) -> Self {
        Nested::List(items.into_iter().collect())
    }

    /// Wrap a lazy iterator of nodes without consuming it.
    pub fn lazy<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Nested<'a, T>>,
        I::IntoIter: 'a,
    {
        Nested::Iter(Box::new(items.into_iter()))
    }

    /// Wrap a lazy iterator of plain values, each becoming an atom.
    pub fn lazy_atoms<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
        T: 'a,
    {
        Nested::Iter(Box::new(items.into_iter().map(Nested::Atom)))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Nested::Atom(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for Nested<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Atom(value) => value.fmt(f),
            Nested::List(items) => f.debug_list().entries(items).finish(),
            Nested::Iter(_) => f.write_str("<lazy>"),
        }
    }
}

/// JSON arrays are containers; every other JSON value is an atom.
impl From<serde_json::Value> for Nested<'static, serde_json::Value> {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(items) => {
                Nested::List(items.into_iter().map(Nested::from).collect())
            }
            other => Nested::Atom(other),
        }
    }
}

/// Flatten `input` into a lazy, one-shot sequence of atoms.
pub fn deep_flatten<'a, T: 'a>(input: Nested<'a, T>) -> DeepFlatten<'a, T> {
    DeepFlatten {
        stack: vec![Box::new(std::iter::once(input))],
    }
}

/// Iterator returned by [`deep_flatten`].
///
/// Holds one cursor per open container. Each `next` call advances only the
/// innermost cursor, so inner lazy sources are never read ahead.
pub struct DeepFlatten<'a, T> {
    stack: Vec<Box<dyn Iterator<Item = Nested<'a, T>> + 'a>>,
}

impl<'a, T: 'a> Iterator for DeepFlatten<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Nested::Atom(value)) => return Some(value),
                Some(Nested::List(items)) => self.stack.push(Box::new(items.into_iter())),
                Some(Nested::Iter(items)) => self.stack.push(items),
            }
        }
    }
}

impl<'a, T: 'a> FusedIterator for DeepFlatten<'a, T> {}

impl<T> fmt::Debug for DeepFlatten<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepFlatten")
            .field("depth", &self.stack.len())
            .finish()
    }
}

/// Build a [`Nested`] tree from bracketed literals.
///
/// `nested!([0, [1, [2, 3]], [4]])` is a list; any other expression is an atom.
#[macro_export]
macro_rules! nested {
    (@list [$($done:expr,)*]) => {
        $crate::core::flatten::Nested::List(vec![$($done),*])
    };
    (@list [$($done:expr,)*] [$($inner:tt)*] $(, $($rest:tt)*)?) => {
        $crate::nested!(@list [$($done,)* $crate::nested!([$($inner)*]),] $($($rest)*)?)
    };
    (@list [$($done:expr,)*] $atom:expr $(, $($rest:tt)*)?) => {
        $crate::nested!(@list [$($done,)* $crate::core::flatten::Nested::Atom($atom),] $($($rest)*)?)
    };
    ([$($items:tt)*]) => {
        $crate::nested!(@list [] $($items)*)
    };
    ($atom:expr) => {
        $crate::core::flatten::Nested::Atom($atom)
    };
}
