// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Intrusive singly linked list.
//!
//! Nodes carry their own [`ListLink`] and are owned by whoever registered
//! them, so the list never allocates. Walking it is safe from interrupt
//! context; mutating it is expected to happen from one context only.

use core::cell::Cell;
use core::ptr;

pub struct ListLink<'a, T: 'a + ?Sized>(Cell<Option<&'a T>>);

impl<'a, T: ?Sized> ListLink<'a, T> {
    pub const fn empty() -> ListLink<'a, T> {
        ListLink(Cell::new(None))
    }
}

pub trait ListNode<'a, T: ?Sized> {
    fn next(&'a self) -> &'a ListLink<'a, T>;
}

pub struct List<'a, T: 'a + ?Sized + ListNode<'a, T>> {
    head: ListLink<'a, T>,
}

pub struct ListIterator<'a, T: 'a + ?Sized + ListNode<'a, T>> {
    cur: Option<&'a T>,
}

impl<'a, T: ?Sized + ListNode<'a, T>> Iterator for ListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        match self.cur {
            Some(res) => {
                self.cur = res.next().0.get();
                Some(res)
            }
            None => None,
        }
    }
}

impl<'a, T: ?Sized + ListNode<'a, T>> List<'a, T> {
    pub const fn new() -> List<'a, T> {
        List {
            head: ListLink(Cell::new(None)),
        }
    }

    pub fn head(&self) -> Option<&'a T> {
        self.head.0.get()
    }

    pub fn is_empty(&self) -> bool {
        self.head.0.get().is_none()
    }

    /// Link `node` in front of the current head. The node must not already be
    /// in this or any other list.
    pub fn push_head(&self, node: &'a T) {
        node.next().0.set(self.head.0.get());
        self.head.0.set(Some(node));
    }

    pub fn contains(&self, node: &T) -> bool {
        self.iter().any(|cur| ptr::eq(cur, node))
    }

    /// Unlink `node`. Returns `false` if it was not in the list.
    pub fn remove(&self, node: &T) -> bool {
        let mut link: &ListLink<'a, T> = &self.head;
        while let Some(cur) = link.0.get() {
            if ptr::eq(cur, node) {
                link.0.set(cur.next().0.get());
                cur.next().0.set(None);
                return true;
            }
            link = cur.next();
        }
        false
    }

    pub fn iter(&self) -> ListIterator<'a, T> {
        ListIterator {
            cur: self.head.0.get(),
        }
    }
}
