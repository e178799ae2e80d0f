//! Universe levels.
use std::fmt;
use dtt_util::Name;

/// A universe level expression.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Level {
  /// The bottom universe, `0`.
  Zero,
  /// `l+1`
  Succ(Box<Level>),
  /// `max l1 l2`
  Max(Box<Level>, Box<Level>),
  /// `imax l1 l2`, which is `0` whenever `l2` is.
  IMax(Box<Level>, Box<Level>),
  /// A universe parameter of a declaration.
  Param(Name),
  /// A universe metavariable.
  Meta(Name),
  /// A level left for the elaborator to fill in, written `_`.
  Placeholder,
}

impl Level {
  /// Construct `l+1`.
  #[must_use]
  pub fn succ(l: Level) -> Level { Level::Succ(Box::new(l)) }
  /// Construct `max l1 l2`.
  #[must_use]
  pub fn max(l1: Level, l2: Level) -> Level { Level::Max(Box::new(l1), Box::new(l2)) }
  /// Construct `imax l1 l2`.
  #[must_use]
  pub fn imax(l1: Level, l2: Level) -> Level { Level::IMax(Box::new(l1), Box::new(l2)) }
  /// `max l1 l2`, simplified when one side is zero or both are equal.
  #[must_use]
  pub fn mk_max(l1: Level, l2: Level) -> Level {
    if l1 == Level::Zero || l1 == l2 { return l2 }
    if l2 == Level::Zero { return l1 }
    Level::max(l1, l2)
  }
  /// `imax l1 l2`, simplified to `max` when `l2` is never zero and to `l2`
  /// when either side is zero.
  #[must_use]
  pub fn mk_imax(l1: Level, l2: Level) -> Level {
    if l2.is_not_zero() { return Level::mk_max(l1, l2) }
    if l1 == Level::Zero || l2 == Level::Zero || l1 == l2 { return l2 }
    Level::imax(l1, l2)
  }
  /// The level `n`, as `n` successors of zero.
  #[must_use]
  pub fn of_nat(n: u32) -> Level { (0..n).fold(Level::Zero, |l, _| Level::succ(l)) }
  /// Construct a parameter level.
  pub fn param(n: impl Into<Name>) -> Level { Level::Param(n.into()) }

  /// True if this level is positive for every assignment of its variables.
  #[must_use]
  pub fn is_not_zero(&self) -> bool {
    match self {
      Level::Succ(_) => true,
      Level::Max(l1, l2) => l1.is_not_zero() || l2.is_not_zero(),
      Level::IMax(_, l2) => l2.is_not_zero(),
      Level::Zero | Level::Param(_) | Level::Meta(_) | Level::Placeholder => false,
    }
  }

  /// Does this level contain a universe metavariable?
  #[must_use]
  pub fn has_meta(&self) -> bool {
    match self {
      Level::Meta(_) => true,
      Level::Succ(l) => l.has_meta(),
      Level::Max(l1, l2) | Level::IMax(l1, l2) => l1.has_meta() || l2.has_meta(),
      Level::Zero | Level::Param(_) | Level::Placeholder => false,
    }
  }

  /// Does this level contain a universe parameter?
  #[must_use]
  pub fn has_param(&self) -> bool {
    match self {
      Level::Param(_) => true,
      Level::Succ(l) => l.has_param(),
      Level::Max(l1, l2) | Level::IMax(l1, l2) => l1.has_param() || l2.has_param(),
      Level::Zero | Level::Meta(_) | Level::Placeholder => false,
    }
  }

  /// Rewrite a level top-down. If `f` returns `Some`, the subtree is replaced
  /// and not visited further.
  pub fn replace(&self, f: &mut impl FnMut(&Level) -> Option<Level>) -> Level {
    if let Some(l) = f(self) { return l }
    match self {
      Level::Succ(l) => Level::succ(l.replace(f)),
      Level::Max(l1, l2) => Level::max(l1.replace(f), l2.replace(f)),
      Level::IMax(l1, l2) => Level::imax(l1.replace(f), l2.replace(f)),
      _ => self.clone(),
    }
  }

  /// Substitute `ls[i]` for the parameter `ps[i]`.
  #[must_use]
  pub fn instantiate(&self, ps: &[Name], ls: &[Level]) -> Level {
    if !self.has_param() { return self.clone() }
    self.replace(&mut |l| match l {
      Level::Param(n) => Some(ps.iter().position(|p| p == n).and_then(|i| ls.get(i))
        .cloned().unwrap_or_else(|| l.clone())),
      _ if !l.has_param() => Some(l.clone()),
      _ => None,
    })
  }

  /// Strip successors, returning the base level and the number of successors removed.
  #[must_use]
  pub fn to_offset(&self) -> (&Level, u32) {
    let mut l = self;
    let mut k = 0;
    while let Level::Succ(l2) = l {
      l = l2;
      k += 1;
    }
    (l, k)
  }

  /// `max` and `imax` levels need parentheses in argument position.
  #[must_use]
  pub fn is_max_like(&self) -> bool { matches!(self, Level::Max(..) | Level::IMax(..)) }

  fn is_atomic(&self) -> bool {
    match self.to_offset() {
      (Level::Zero, _) => true,
      (_, 0) => !self.is_max_like(),
      _ => false,
    }
  }

  fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_atomic() { write!(f, "{self}") } else { write!(f, "({self})") }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.to_offset() {
      (Level::Zero, k) => write!(f, "{k}"),
      (l, 0) => match l {
        Level::Max(l1, l2) | Level::IMax(l1, l2) => {
          f.write_str(if let Level::Max(..) = l {"max "} else {"imax "})?;
          l1.fmt_arg(f)?;
          f.write_str(" ")?;
          l2.fmt_arg(f)
        }
        Level::Param(n) => write!(f, "{n}"),
        Level::Meta(n) => write!(f, "?{n}"),
        Level::Placeholder => f.write_str("_"),
        Level::Zero | Level::Succ(_) => unreachable!("stripped by to_offset"),
      },
      (l, k) => {
        l.fmt_arg(f)?;
        write!(f, "+{k}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display() {
    assert_eq!(Level::of_nat(3).to_string(), "3");
    assert_eq!(Level::succ(Level::param("u")).to_string(), "u+1");
    let m = Level::max(Level::param("u"), Level::succ(Level::param("v")));
    assert_eq!(m.to_string(), "max u (v+1)");
    assert_eq!(Level::succ(m).to_string(), "(max u (v+1))+1");
    assert_eq!(Level::imax(Level::Zero, Level::Meta("M_1".into())).to_string(), "imax 0 ?M_1");
  }

  #[test]
  fn simplify() {
    let u = Level::param("u");
    assert_eq!(Level::mk_imax(Level::of_nat(1), Level::Zero), Level::Zero);
    assert_eq!(Level::mk_imax(u.clone(), Level::of_nat(1)), Level::max(u.clone(), Level::of_nat(1)));
    assert_eq!(Level::mk_max(Level::Zero, u.clone()), u);
  }

  #[test]
  fn instantiate() {
    let l = Level::max(Level::param("u"), Level::param("v"));
    let l = l.instantiate(&["u".into()], &[Level::of_nat(1)]);
    assert_eq!(l, Level::max(Level::of_nat(1), Level::param("v")));
  }
}
