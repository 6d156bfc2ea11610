//! Case- and accent-insensitive string wrapper.
//!
//! A [`FuzzyString`] keeps the text it was built from for display, and
//! compares, hashes and searches by a folded key instead. Comparisons work
//! against plain `str`, `&str` and `String` on either side of the operator.
//!
//! Plain text is folded with the receiver's [`FoldMode`]. Another
//! `FuzzyString` always contributes its own stored key, so two values built
//! with different modes compare the same way through operators and through
//! the named methods.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// How text is folded before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldMode {
    /// Case folding only (`ß` still matches `ss`).
    CaseOnly,
    /// Case folding followed by NFKD, so accents and compatibility forms match.
    #[default]
    Normalized,
}

impl FoldMode {
    /// Fold `text` into its comparison key.
    pub fn fold(self, text: &str) -> String {
        match self {
            FoldMode::CaseOnly => case_fold(text.chars()).collect(),
            // `™` and `ℌ` decompose to uppercase letters, so case folding has
            // to see the decomposed form; the last pass re-decomposes
            // anything the case mapping composed.
            FoldMode::Normalized => case_fold(text.nfkd()).nfkd().collect(),
        }
    }
}

/// Upper-then-lower expands `ß` to `ss` and merges sigma forms, which
/// per-char lowercase alone does not.
fn case_fold(chars: impl Iterator<Item = char>) -> impl Iterator<Item = char> {
    chars
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
}

/// Something a [`FuzzyString`] can be compared with or searched for.
pub trait FuzzyText {
    /// The key to compare against a receiver folding with `mode`.
    fn fuzzy_key(&self, mode: FoldMode) -> Cow<'_, str>;
}

impl FuzzyText for str {
    fn fuzzy_key(&self, mode: FoldMode) -> Cow<'_, str> {
        Cow::Owned(mode.fold(self))
    }
}

impl FuzzyText for String {
    fn fuzzy_key(&self, mode: FoldMode) -> Cow<'_, str> {
        self.as_str().fuzzy_key(mode)
    }
}

/// Uses the stored key whatever the receiver's mode.
impl FuzzyText for FuzzyString {
    fn fuzzy_key(&self, _mode: FoldMode) -> Cow<'_, str> {
        Cow::Borrowed(&self.key)
    }
}

impl<T: FuzzyText + ?Sized> FuzzyText for &T {
    fn fuzzy_key(&self, mode: FoldMode) -> Cow<'_, str> {
        (**self).fuzzy_key(mode)
    }
}

/// Text whose equality, ordering and containment ignore case.
#[derive(Clone)]
pub struct FuzzyString {
    text: String,
    key: String,
    mode: FoldMode,
}

impl FuzzyString {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_mode(text, FoldMode::default())
    }

    pub fn with_mode(text: impl Into<String>, mode: FoldMode) -> Self {
        let text = text.into();
        let key = mode.fold(&text);
        Self { text, key, mode }
    }

    /// The original, unfolded text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_inner(self) -> String {
        self.text
    }

    pub fn mode(&self) -> FoldMode {
        self.mode
    }

    /// The folded key used for every comparison.
    pub fn folded(&self) -> &str {
        &self.key
    }

    pub fn equals(&self, other: impl FuzzyText) -> bool {
        self.key == *other.fuzzy_key(self.mode)
    }

    pub fn compare(&self, other: impl FuzzyText) -> Ordering {
        self.key.as_str().cmp(&*other.fuzzy_key(self.mode))
    }

    /// True if `needle`, once folded, occurs in this string's key.
    pub fn contains(&self, needle: impl FuzzyText) -> bool {
        self.key.contains(&*needle.fuzzy_key(self.mode))
    }

    /// A new value holding both texts, folded with this value's mode.
    pub fn concat(&self, other: impl AsRef<str>) -> FuzzyString {
        let mut text = String::with_capacity(self.text.len() + other.as_ref().len());
        text.push_str(&self.text);
        text.push_str(other.as_ref());
        Self::with_mode(text, self.mode)
    }
}

impl AsRef<str> for FuzzyString {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<&str> for FuzzyString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for FuzzyString {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for FuzzyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for FuzzyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.text.as_str(), f)
    }
}

impl PartialEq for FuzzyString {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FuzzyString {}

impl Hash for FuzzyString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for FuzzyString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FuzzyString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

macro_rules! impl_text_comparisons {
    ($($other:ty),* $(,)?) => {$(
        impl PartialEq<$other> for FuzzyString {
            fn eq(&self, other: &$other) -> bool {
                self.equals(other)
            }
        }

        impl PartialEq<FuzzyString> for $other {
            fn eq(&self, other: &FuzzyString) -> bool {
                other.equals(self)
            }
        }

        impl PartialOrd<$other> for FuzzyString {
            fn partial_cmp(&self, other: &$other) -> Option<Ordering> {
                Some(self.compare(other))
            }
        }

        impl PartialOrd<FuzzyString> for $other {
            fn partial_cmp(&self, other: &FuzzyString) -> Option<Ordering> {
                Some(other.compare(self).reverse())
            }
        }
    )*};
}

impl_text_comparisons!(str, &str, String);

impl Add<&str> for FuzzyString {
    type Output = FuzzyString;

    fn add(mut self, rhs: &str) -> FuzzyString {
        self.text.push_str(rhs);
        Self::with_mode(self.text, self.mode)
    }
}

impl Add<&FuzzyString> for FuzzyString {
    type Output = FuzzyString;

    fn add(self, rhs: &FuzzyString) -> FuzzyString {
        self + rhs.as_str()
    }
}

impl Add<FuzzyString> for FuzzyString {
    type Output = FuzzyString;

    fn add(self, rhs: FuzzyString) -> FuzzyString {
        self + rhs.as_str()
    }
}
