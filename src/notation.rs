//! Notation declarations and the token table.
//!
//! A notation entry pairs a pattern expression, whose bound variables stand
//! for the notation's parameters, with a list of transitions describing the
//! concrete syntax: each transition is a token followed by an action saying
//! what (if anything) is parsed after it.
use std::collections::HashMap;
use num::BigUint;
use crate::expr::Expr;

/// What follows a token in a notation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
  /// Nothing; the token is a literal.
  Skip,
  /// A single expression, parsed at the given right binding power.
  Expr {
    /// The right binding power of the argument.
    rbp: u32,
  },
  /// A separated sequence of expressions.
  Exprs,
  /// A single binder.
  Binder,
  /// A sequence of binders.
  Binders,
  /// An expression scoped over the preceding binders.
  ScopedExpr,
  /// A parser extension.
  Ext,
}

/// A token and the action following it.
#[derive(Clone, Debug)]
pub struct Transition {
  /// The literal token.
  pub token: Box<str>,
  /// What follows the token.
  pub action: Action,
}

impl Transition {
  /// Construct a transition.
  pub fn new(token: impl Into<Box<str>>, action: Action) -> Self {
    Self { token: token.into(), action }
  }
}

/// Whether a notation starts with a token, starts with an expression, or is
/// a numeral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotationKind {
  /// Prefix ("null denotation"): starts with a token.
  Nud,
  /// Infix or postfix ("left denotation"): starts with an expression.
  Led,
  /// The pattern is displayed as this literal number.
  Numeral(BigUint),
}

/// A notation declaration.
#[derive(Clone, Debug)]
pub struct NotationEntry {
  /// The notation kind.
  pub kind: NotationKind,
  /// The tokens and actions, left to right.
  pub transitions: Vec<Transition>,
  /// The expression this notation stands for. `#i` refers to the
  /// `i`-th parameter counting from the right.
  pub pattern: Expr,
  /// True if every token is ASCII, so the notation is usable when unicode
  /// output is disabled.
  pub safe_ascii: bool,
}

impl NotationEntry {
  /// Construct a notation entry, computing `safe_ascii` from the tokens.
  #[must_use]
  pub fn new(kind: NotationKind, transitions: Vec<Transition>, pattern: Expr) -> Self {
    let safe_ascii = transitions.iter().all(|t| t.token.is_ascii());
    Self { kind, transitions, pattern, safe_ascii }
  }

  /// `a tk b` for `f a b`, associating to the left.
  pub fn infixl(tk: impl Into<Box<str>>, prec: u32, f: Expr) -> Self {
    Self::new(NotationKind::Led, vec![Transition::new(tk, Action::Expr { rbp: prec })],
      Expr::mk_app(f, [Expr::var(1), Expr::var(0)]))
  }

  /// `a tk b` for `f a b`, associating to the right.
  pub fn infixr(tk: impl Into<Box<str>>, prec: u32, f: Expr) -> Self {
    Self::new(NotationKind::Led,
      vec![Transition::new(tk, Action::Expr { rbp: prec.saturating_sub(1) })],
      Expr::mk_app(f, [Expr::var(1), Expr::var(0)]))
  }

  /// `a tk` for `f a`.
  pub fn postfix(tk: impl Into<Box<str>>, f: Expr) -> Self {
    Self::new(NotationKind::Led, vec![Transition::new(tk, Action::Skip)],
      Expr::app(f, Expr::var(0)))
  }

  /// `tk a` for `f a`.
  pub fn prefix(tk: impl Into<Box<str>>, prec: u32, f: Expr) -> Self {
    Self::new(NotationKind::Nud, vec![Transition::new(tk, Action::Expr { rbp: prec })],
      Expr::app(f, Expr::var(0)))
  }

  /// Display `pattern` as the number `n`.
  #[must_use]
  pub fn numeral(n: BigUint, pattern: Expr) -> Self {
    Self::new(NotationKind::Numeral(n), vec![], pattern)
  }

  /// True for prefix notations.
  #[must_use]
  pub fn is_nud(&self) -> bool { self.kind == NotationKind::Nud }

  /// The number of parameter slots to fill when matching the pattern.
  #[must_use]
  pub fn num_parameters(&self) -> usize {
    if let NotationKind::Numeral(_) = self.kind { return 0 }
    let led = usize::from(self.kind == NotationKind::Led);
    led + self.transitions.iter().filter(|t| matches!(t.action,
      Action::Expr {..} | Action::Exprs | Action::ScopedExpr | Action::Ext)).count()
  }
}

/// Token precedences, used to decide the binding power of notation tokens.
#[derive(Clone, Debug, Default)]
pub struct TokenTable(HashMap<Box<str>, u32>);

impl TokenTable {
  /// Set the precedence of a token.
  pub fn insert(&mut self, tk: impl Into<Box<str>>, prec: u32) { self.0.insert(tk.into(), prec); }

  /// The precedence of a token, if it has one.
  #[must_use]
  pub fn precedence(&self, tk: &str) -> Option<u32> { self.0.get(tk).copied() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parameters() {
    let add = Expr::constant("add", vec![]);
    assert_eq!(NotationEntry::infixl("+", 65, add.clone()).num_parameters(), 2);
    assert_eq!(NotationEntry::prefix("-", 100, add.clone()).num_parameters(), 1);
    assert_eq!(NotationEntry::postfix("⁻¹", add.clone()).num_parameters(), 1);
    assert_eq!(NotationEntry::numeral(BigUint::from(3u32), add).num_parameters(), 0);
  }

  #[test]
  fn ascii_safety() {
    let f = Expr::constant("f", vec![]);
    assert!(NotationEntry::infixr("->", 25, f.clone()).safe_ascii);
    assert!(!NotationEntry::infixr("→", 25, f).safe_ascii);
  }
}
