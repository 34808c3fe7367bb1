//! Context bindings.
//!
//! A graphics context exposes a set of slots: the current program, the bound vertex array, the
//! texture bound to each unit, etc. Binding an object to a slot replaces whatever was there before.
//! lucent returns the previous occupant of a slot as a [`Handle`] every time a slot is changed, so
//! that callers can restore it.

use std::fmt;

/// Raw driver name of an object occupying a context slot.
///
/// [`Handle::NONE`] means the slot is empty.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Handle(u32);

impl Handle {
  /// The empty slot.
  pub const NONE: Handle = Handle(0);

  /// Wrap a raw driver name.
  pub const fn new(raw: u32) -> Self {
    Handle(raw)
  }

  /// Raw driver name.
  pub const fn raw(self) -> u32 {
    self.0
  }

  /// Whether this handle denotes an empty slot.
  pub const fn is_none(self) -> bool {
    self.0 == 0
  }
}

impl fmt::Display for Handle {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    if self.is_none() {
      f.write_str("<none>")
    } else {
      write!(f, "#{}", self.0)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn none_is_zero() {
    assert!(Handle::NONE.is_none());
    assert_eq!(Handle::default(), Handle::NONE);
    assert!(!Handle::new(3).is_none());
  }

  #[test]
  fn display() {
    assert_eq!(Handle::NONE.to_string(), "<none>");
    assert_eq!(Handle::new(12).to_string(), "#12");
  }
}
