//! Display names for metavariables and local constants.
//!
//! Elaborator-generated names are long and unreadable, and two distinct
//! locals may share a display name. Before printing, every metavariable is
//! renamed to `M_1`, `M_2`, ... in order of first occurrence, and every local
//! whose display name is already taken by another local gets a numeric suffix.
use std::collections::{HashMap, HashSet};
use dtt_util::Name;
use crate::expr::{Expr, ExprKind};
use crate::level::Level;

/// The renaming state for one term.
#[derive(Debug)]
pub struct Purifier {
  universes: bool,
  metas: HashMap<Name, Name>,
  univ_metas: HashMap<Name, Name>,
  locals: HashMap<Name, Name>,
  used: HashSet<Name>,
  next_meta: u32,
}

impl Purifier {
  /// A fresh purifier. Universe metavariables are renamed only if
  /// `universes` is set, since levels are not displayed otherwise.
  #[must_use]
  pub fn new(universes: bool) -> Self {
    Self {
      universes,
      metas: HashMap::new(),
      univ_metas: HashMap::new(),
      locals: HashMap::new(),
      used: HashSet::new(),
      next_meta: 1,
    }
  }

  fn fresh_meta(next: &mut u32) -> Name {
    let n = Name::from("M").append_after(*next);
    *next += 1;
    n
  }

  fn meta_name(&mut self, n: &Name) -> Name {
    let next = &mut self.next_meta;
    self.metas.entry(n.clone()).or_insert_with(|| Self::fresh_meta(next)).clone()
  }

  fn local_name(&mut self, id: &Name, suggested: &Name) -> Name {
    if let Some(n) = self.locals.get(id) { return n.clone() }
    let mut n = suggested.clone();
    let mut i = 1;
    while self.used.contains(&n) {
      n = suggested.append_after(i);
      i += 1;
    }
    self.used.insert(n.clone());
    self.locals.insert(id.clone(), n.clone());
    n
  }

  fn purify_level(&mut self, l: &Level) -> Level {
    if !l.has_meta() { return l.clone() }
    let (univ_metas, next) = (&mut self.univ_metas, &mut self.next_meta);
    l.replace(&mut |l| match l {
      Level::Meta(n) => Some(Level::Meta(univ_metas.entry(n.clone())
        .or_insert_with(|| Self::fresh_meta(next)).clone())),
      _ if !l.has_meta() => Some(l.clone()),
      _ => None,
    })
  }

  fn needs(&self, e: &Expr) -> bool {
    e.has_meta() || e.has_local() || (self.universes && e.has_univ_meta())
  }

  /// Rename the metavariables and locals of `e`. Subterms with nothing to
  /// rename are shared with the input.
  pub fn purify(&mut self, e: &Expr) -> Expr {
    e.replace(&mut |e, _| match &**e {
      _ if !self.needs(e) => Some(e.clone()),
      ExprKind::Meta(n, ty) => Some(Expr::meta(self.meta_name(n), ty.clone())),
      ExprKind::Local(l) => {
        let n = self.local_name(&l.id, &l.pp_name);
        Some(Expr::local(l.id.clone(), n, l.ty.clone(), l.info))
      }
      ExprKind::Sort(l) => Some(Expr::sort(self.purify_level(l))),
      ExprKind::Const(n, ls) =>
        Some(Expr::constant(n.clone(), ls.iter().map(|l| self.purify_level(l)).collect())),
      _ => None,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::BinderInfo;

  fn nat() -> Expr { Expr::constant("nat", vec![]) }

  fn local_names(e: &Expr) -> Vec<String> {
    let mut v = vec![];
    e.any(&mut |e| {
      match &**e {
        ExprKind::Local(l) => v.push(l.pp_name.to_string()),
        ExprKind::Meta(n, _) => v.push(format!("?{n}")),
        _ => {}
      }
      false
    });
    v
  }

  fn sample() -> Expr {
    let m1 = Expr::meta("_elab.17", nat());
    let m2 = Expr::meta("_elab.4", nat());
    let x1 = Expr::local("_l.1", "x", nat(), BinderInfo::DEFAULT);
    let x2 = Expr::local("_l.2", "x", nat(), BinderInfo::DEFAULT);
    Expr::mk_app(Expr::constant("f", vec![]), [m1.clone(), m2, m1, x1, x2])
  }

  #[test]
  fn names_in_order() {
    let e = Purifier::new(false).purify(&sample());
    assert_eq!(local_names(&e), ["?M_1", "?M_2", "?M_1", "x", "x_1"]);
  }

  #[test]
  fn idempotent() {
    let e1 = Purifier::new(false).purify(&sample());
    let e2 = Purifier::new(false).purify(&e1);
    assert_eq!(local_names(&e1), local_names(&e2));
    assert_eq!(e1, e2);
  }

  #[test]
  fn universes() {
    let e = Expr::sort(Level::succ(Level::Meta("_u.3".into())));
    assert!(Purifier::new(false).purify(&e).ptr_eq(&e));
    let e2 = Purifier::new(true).purify(&e);
    assert_eq!(e2, Expr::sort(Level::succ(Level::Meta("M_1".into()))));
  }

  #[test]
  fn sharing() {
    let e = Expr::app(Expr::constant("f", vec![]), nat());
    assert!(Purifier::new(true).purify(&e).ptr_eq(&e));
  }
}
