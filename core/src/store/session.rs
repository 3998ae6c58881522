//! Session gate consulted before every store mutation.
//!
//! The identity provider itself lives outside the core; all the store needs to
//! know is whether someone is signed in right now.

use std::cell::RefCell;
use std::rc::Rc;

pub trait SessionGate {
    fn is_authenticated(&self) -> bool;
}

/// Fixed answer. Handy for embedding the store where sign-in does not apply.
impl SessionGate for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

impl<G: SessionGate + ?Sized> SessionGate for Rc<G> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

/// Locally tracked sign-in state.
///
/// Interior mutability lets a caller keep an `Rc<Session>` while the store holds
/// another handle to the same session.
#[derive(Debug, Default)]
pub struct Session {
    user: RefCell<Option<User>>,
}

impl Session {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(email: impl Into<String>) -> Self {
        let session = Self::default();
        session.sign_in(email);
        session
    }

    pub fn sign_in(&self, email: impl Into<String>) {
        *self.user.borrow_mut() = Some(User {
            email: email.into(),
        });
    }

    pub fn sign_out(&self) {
        *self.user.borrow_mut() = None;
    }

    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }
}

impl SessionGate for Session {
    fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }
}
