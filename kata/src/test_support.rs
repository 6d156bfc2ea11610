//! Test-only helpers shared by unit and integration tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::account::Account;
use crate::core::flatten::Nested;

/// Open an account, panicking on an invalid balance.
pub fn account(balance: i64) -> Account {
    Account::new(balance).unwrap_or_else(|err| panic!("open account({balance}): {err}"))
}

/// Parse a JSON literal into a nested tree (arrays are containers).
pub fn nested_json(text: &str) -> Nested<'static, serde_json::Value> {
    let value: serde_json::Value =
        serde_json::from_str(text).unwrap_or_else(|err| panic!("parse {text:?}: {err}"));
    Nested::from(value)
}

/// Iterator adapter that records how many items were pulled from `inner`.
#[derive(Debug)]
pub struct Counted<I> {
    inner: I,
    pulls: Rc<Cell<usize>>,
}

impl<I: Iterator> Iterator for Counted<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.pulls.set(self.pulls.get() + 1);
        }
        item
    }
}

/// Wrap `inner` and return a handle to its pull counter.
pub fn counted<I: IntoIterator>(inner: I) -> (Counted<I::IntoIter>, Rc<Cell<usize>>) {
    let pulls = Rc::new(Cell::new(0));
    let counted = Counted {
        inner: inner.into_iter(),
        pulls: Rc::clone(&pulls),
    };
    (counted, pulls)
}
