//! The environment: declarations, and the display metadata the printer
//! consults (aliases, namespaces, private names, coercions, notations,
//! token precedences).
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use dtt_util::{HashMapExt, Name};
use crate::expr::{Expr, HeadIndex};
use crate::notation::{NotationEntry, TokenTable};

/// A constant declaration.
#[derive(Clone, Debug)]
pub struct Declaration {
  /// The full name of the constant.
  pub name: Name,
  /// The universe parameters.
  pub univ_params: Vec<Name>,
  /// The type, which may mention the universe parameters.
  pub ty: Expr,
  /// The definition body, for definitions; `None` for axioms and constructors.
  pub value: Option<Expr>,
}

impl Declaration {
  /// An axiom or opaque constant.
  pub fn axiom(name: impl Into<Name>, univ_params: Vec<Name>, ty: Expr) -> Self {
    Self { name: name.into(), univ_params, ty, value: None }
  }

  /// A definition.
  pub fn definition(name: impl Into<Name>, univ_params: Vec<Name>, ty: Expr, value: Expr) -> Self {
    Self { name: name.into(), univ_params, ty, value: Some(value) }
  }
}

/// Coercion metadata of a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoercionInfo {
  /// The class of the coercion's result.
  pub target: Name,
  /// The number of leading arguments (parameters of the coercion) that come
  /// before the coerced value.
  pub arity: usize,
}

/// Returned when something is registered twice.
#[derive(Debug, Clone)]
pub struct Redeclaration {
  /// The error message.
  pub msg: String,
}

impl fmt::Display for Redeclaration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.msg) }
}

impl std::error::Error for Redeclaration {}

/// The environment. The printer only reads from it.
#[derive(Debug, Default)]
pub struct Environment {
  decls: HashMap<Name, Declaration>,
  aliases: HashMap<Name, Name>,
  namespaces: Vec<Name>,
  private: HashMap<Name, Name>,
  coercions: HashMap<Name, CoercionInfo>,
  notations: HashMap<HeadIndex, Vec<Arc<NotationEntry>>>,
  tokens: TokenTable,
  impredicative: bool,
}

impl Environment {
  /// An empty environment. If `impredicative`, `Sort 0` is `Prop`.
  #[must_use]
  pub fn new(impredicative: bool) -> Self { Self { impredicative, ..Self::default() } }

  /// True if `Sort 0` is the impredicative universe of propositions.
  #[must_use]
  pub fn impredicative(&self) -> bool { self.impredicative }

  /// Add a declaration.
  pub fn add_decl(&mut self, d: Declaration) -> Result<(), Redeclaration> {
    if let Some((_, e)) = self.decls.try_insert_ext(d.name.clone(), d) {
      return Err(Redeclaration { msg: format!("constant '{}' already declared", e.key()) })
    }
    Ok(())
  }

  /// Look up a declaration.
  #[must_use]
  pub fn find(&self, n: &Name) -> Option<&Declaration> { self.decls.get(n) }

  /// Make `alias` a short name for `full`.
  pub fn add_alias(&mut self, full: impl Into<Name>, alias: impl Into<Name>) -> Result<(), Redeclaration> {
    if let Some((_, e)) = self.aliases.try_insert_ext(full.into(), alias.into()) {
      return Err(Redeclaration { msg: format!("'{}' already has alias '{}'", e.key(), e.get()) })
    }
    Ok(())
  }

  /// The alias of a full name, if one was declared.
  #[must_use]
  pub fn alias_of(&self, full: &Name) -> Option<&Name> { self.aliases.get(full) }

  /// Open a namespace. The most recently opened namespace is tried first.
  pub fn open_namespace(&mut self, ns: impl Into<Name>) { self.namespaces.insert(0, ns.into()) }

  /// The open namespaces, most recent first.
  #[must_use]
  pub fn namespaces(&self) -> &[Name] { &self.namespaces }

  /// Register the hidden name of a private declaration.
  pub fn add_private(&mut self, hidden: impl Into<Name>, user: impl Into<Name>) -> Result<(), Redeclaration> {
    if let Some((_, e)) = self.private.try_insert_ext(hidden.into(), user.into()) {
      return Err(Redeclaration { msg: format!("private name '{}' already registered", e.key()) })
    }
    Ok(())
  }

  /// The user-facing name of a private declaration.
  #[must_use]
  pub fn hidden_to_user_name(&self, hidden: &Name) -> Option<&Name> { self.private.get(hidden) }

  /// Declare `f` a coercion.
  pub fn add_coercion(&mut self, f: impl Into<Name>, info: CoercionInfo) -> Result<(), Redeclaration> {
    if let Some((_, e)) = self.coercions.try_insert_ext(f.into(), info) {
      return Err(Redeclaration { msg: format!("'{}' is already a coercion", e.key()) })
    }
    Ok(())
  }

  /// If `f` is a constant registered as a coercion, its metadata.
  #[must_use]
  pub fn is_coercion(&self, f: &Expr) -> Option<&CoercionInfo> {
    self.coercions.get(f.const_name()?)
  }

  /// Add a notation, indexed by the head of its pattern.
  pub fn add_notation(&mut self, entry: NotationEntry) {
    self.notations.entry(entry.pattern.head_index()).or_default().push(Arc::new(entry))
  }

  /// The notations for a head symbol, most recently declared first.
  pub fn notations(&self, h: &HeadIndex) -> impl Iterator<Item = &NotationEntry> + '_ {
    self.notations.get(h).into_iter().flat_map(|v| v.iter().rev().map(|e| &**e))
  }

  /// Set the precedence of a token.
  pub fn add_token(&mut self, tk: impl Into<Box<str>>, prec: u32) { self.tokens.insert(tk, prec) }

  /// The token table.
  #[must_use]
  pub fn tokens(&self) -> &TokenTable { &self.tokens }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn redeclaration() {
    let mut env = Environment::new(true);
    let ty = Expr::sort(crate::level::Level::of_nat(1));
    assert!(env.add_decl(Declaration::axiom("nat", vec![], ty.clone())).is_ok());
    let err = env.add_decl(Declaration::axiom("nat", vec![], ty)).unwrap_err();
    assert_eq!(err.to_string(), "constant 'nat' already declared");
  }

  #[test]
  fn notation_order() {
    let mut env = Environment::new(true);
    let add = Expr::constant("add", vec![]);
    env.add_notation(NotationEntry::infixl("+", 65, add.clone()));
    env.add_notation(NotationEntry::infixl("⊕", 65, add));
    let toks = env.notations(&HeadIndex::Const("add".into()))
      .map(|e| &*e.transitions[0].token).collect::<Vec<_>>();
    assert_eq!(toks, ["⊕", "+"]);
  }
}
