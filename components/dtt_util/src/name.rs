//! Hierarchical names, like `nat.add` or `_private.3.foo`.
use std::fmt;
use std::sync::Arc;

/// A hierarchical name, stored as a shared list of components.
/// The anonymous name has no components.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<[Box<str>]>);

impl Name {
  /// The anonymous name, which displays as `[anonymous]`.
  #[must_use]
  pub fn anonymous() -> Self { Self(Vec::new().into()) }

  /// Build a name from its components. No splitting on `.` is performed.
  pub fn from_parts<S: Into<Box<str>>>(parts: impl IntoIterator<Item = S>) -> Self {
    Self(parts.into_iter().map(Into::into).collect())
  }

  /// The components of this name, outermost first.
  #[must_use]
  pub fn components(&self) -> &[Box<str>] { &self.0 }

  /// True if this is the anonymous name.
  #[must_use]
  pub fn is_anonymous(&self) -> bool { self.0.is_empty() }

  /// True if this name has exactly one component.
  #[must_use]
  pub fn is_atomic(&self) -> bool { self.0.len() == 1 }

  /// Compare against a dotted string without allocating.
  #[must_use]
  pub fn is_str(&self, s: &str) -> bool {
    !self.is_anonymous() && self.0.iter().map(|c| &**c).eq(s.split('.'))
  }

  /// Internal names are generated by the system; some component starts with `_`.
  #[must_use]
  pub fn is_internal(&self) -> bool { self.0.iter().any(|s| s.starts_with('_')) }

  /// Concatenate two names: `a.b` ++ `c.d` = `a.b.c.d`.
  #[must_use]
  pub fn append(&self, other: &Name) -> Name {
    if other.is_anonymous() { return self.clone() }
    if self.is_anonymous() { return other.clone() }
    Self(self.0.iter().chain(other.0.iter()).cloned().collect())
  }

  /// Append a numeric suffix to the last component: `x` becomes `x_1`.
  /// The anonymous name becomes `_1`.
  #[must_use]
  pub fn append_after(&self, i: u32) -> Name {
    let mut parts = self.0.to_vec();
    match parts.last_mut() {
      Some(last) => *last = format!("{last}_{i}").into(),
      None => parts.push(format!("_{i}").into()),
    }
    Self(parts.into())
  }

  /// True if `prefix` is a (not necessarily proper) prefix of this name.
  #[must_use]
  pub fn is_prefix_of(&self, other: &Name) -> bool { other.0.starts_with(&self.0) }

  /// Replace the prefix `prefix` by `new_prefix`, or return the name unchanged
  /// if `prefix` is not a prefix of it.
  #[must_use]
  pub fn replace_prefix(&self, prefix: &Name, new_prefix: &Name) -> Name {
    if !prefix.is_prefix_of(self) { return self.clone() }
    new_prefix.append(&Self(self.0[prefix.0.len()..].into()))
  }
}

impl Default for Name {
  fn default() -> Self { Self::anonymous() }
}

impl From<&str> for Name {
  /// Parses a dotted name. The empty string is the anonymous name.
  fn from(s: &str) -> Self {
    if s.is_empty() { return Self::anonymous() }
    Self::from_parts(s.split('.'))
  }
}

impl From<String> for Name {
  fn from(s: String) -> Self { s.as_str().into() }
}

impl fmt::Display for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some((first, rest)) = self.0.split_first() else { return f.write_str("[anonymous]") };
    f.write_str(first)?;
    for s in rest { write!(f, ".{s}")? }
    Ok(())
  }
}

impl fmt::Debug for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "`{self}") }
}
