//! The type checker interface used by the printer, and a small reference
//! implementation.
//!
//! The printer only asks questions whose answer changes the display: the type
//! of a function (to find implicit arguments), whether a pi body is a
//! proposition, and so on. Every method returns a [`TcError`] instead of
//! panicking, and the printer treats an error as "don't know".
use std::cell::Cell;
use std::fmt;
use dtt_util::Name;
use crate::environment::{Declaration, Environment};
use crate::expr::{Binder, Expr, ExprKind, MacroDef};
use crate::level::Level;

/// Reasons a type checker query can fail.
#[derive(Clone, Debug)]
pub enum TcError {
  /// A constant not in the environment.
  UnknownConstant(Name),
  /// A bound variable with no enclosing binder.
  LooseBoundVar(u32),
  /// Expected a function type.
  NotAFunction(Expr),
  /// Expected a sort.
  NotASort(Expr),
  /// A macro the checker does not understand.
  UnsupportedMacro(Name),
  /// A metavariable whose type is a placeholder.
  MetaTypeUnknown(Name),
}

impl fmt::Display for TcError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TcError::UnknownConstant(n) => write!(f, "unknown constant '{n}'"),
      TcError::LooseBoundVar(i) => write!(f, "loose bound variable #{i}"),
      TcError::NotAFunction(e) => write!(f, "function expected, got {e:?}"),
      TcError::NotASort(e) => write!(f, "type expected, got {e:?}"),
      TcError::UnsupportedMacro(n) => write!(f, "unsupported macro '{n}'"),
      TcError::MetaTypeUnknown(n) => write!(f, "type of metavariable ?{n} is unknown"),
    }
  }
}

impl std::error::Error for TcError {}

/// The queries the printer makes.
pub trait TypeChecker {
  /// Infer the type of a term with no loose bound variables.
  fn infer(&self, e: &Expr) -> Result<Expr, TcError>;

  /// Reduce to weak head normal form.
  fn whnf(&self, e: &Expr) -> Result<Expr, TcError>;

  /// Reduce a type until it is a pi.
  fn ensure_pi(&self, e: &Expr) -> Result<Expr, TcError> {
    if e.is_pi() { return Ok(e.clone()) }
    let e2 = self.whnf(e)?;
    if e2.is_pi() { Ok(e2) } else { Err(TcError::NotAFunction(e.clone())) }
  }

  /// Is the type of `e` the sort of propositions?
  fn is_prop(&self, e: &Expr) -> Result<bool, TcError>;
}

/// A type checker over an [`Environment`], sufficient to classify
/// well-typed terms: it unfolds definitions and annotations, contracts
/// beta redexes, and does not check definitional equality.
#[derive(Debug)]
pub struct BasicChecker<'a> {
  env: &'a Environment,
  next_local: Cell<u32>,
}

impl<'a> BasicChecker<'a> {
  /// Construct a checker.
  #[must_use]
  pub fn new(env: &'a Environment) -> Self { Self { env, next_local: Cell::new(0) } }

  fn fresh_local(&self, b: &Binder) -> (Name, Expr) {
    let i = self.next_local.get();
    self.next_local.set(i + 1);
    let id = Name::from_parts(["_tc".to_owned(), i.to_string()]);
    (id.clone(), Expr::local(id, b.name.clone(), b.ty.clone(), b.info))
  }

  fn infer_sort(&self, e: &Expr) -> Result<Level, TcError> {
    let ty = self.whnf(&self.infer(e)?)?;
    if let ExprKind::Sort(l) = &*ty { Ok(l.clone()) } else { Err(TcError::NotASort(e.clone())) }
  }

  fn macro_arg<'b>(d: &MacroDef, args: &'b [Expr], i: usize) -> Result<&'b Expr, TcError> {
    args.get(i).ok_or_else(|| TcError::UnsupportedMacro(match d {
      MacroDef::Other(n) => n.clone(),
      _ => Name::from(format!("{d:?}")),
    }))
  }

  /// Unfold one layer at the head: a definition, an annotation or a let.
  fn unfold_head(&self, f: &Expr) -> Option<Expr> {
    match &**f {
      ExprKind::Const(n, ls) => match self.env.find(n)? {
        Declaration { univ_params, value: Some(v), .. } => Some(v.instantiate_univ_params(univ_params, ls)),
        _ => None,
      },
      ExprKind::Macro(MacroDef::Annotation(_) | MacroDef::LetValue, args) if args.len() == 1 =>
        Some(args[0].clone()),
      ExprKind::Macro(MacroDef::Let(_) | MacroDef::TypedExpr, args) if args.len() == 2 =>
        Some(args[1].clone()),
      _ => None,
    }
  }
}

impl TypeChecker for BasicChecker<'_> {
  fn infer(&self, e: &Expr) -> Result<Expr, TcError> {
    match &**e {
      ExprKind::Var(i) => Err(TcError::LooseBoundVar(*i)),
      ExprKind::Sort(l) => Ok(Expr::sort(Level::succ(l.clone()))),
      ExprKind::Const(n, ls) => {
        let d = self.env.find(n).ok_or_else(|| TcError::UnknownConstant(n.clone()))?;
        Ok(d.ty.instantiate_univ_params(&d.univ_params, ls))
      }
      ExprKind::Meta(n, ty) =>
        if ty.is_placeholder() { Err(TcError::MetaTypeUnknown(n.clone())) } else { Ok(ty.clone()) },
      ExprKind::Local(l) => Ok(l.ty.clone()),
      ExprKind::App(..) => {
        let (f, args) = e.get_app_args();
        let mut ty = self.infer(f)?;
        for a in &args {
          let pi = self.ensure_pi(&ty)?;
          let ExprKind::Pi(_, body) = &*pi else { return Err(TcError::NotAFunction(ty)) };
          ty = body.instantiate(a);
        }
        Ok(ty)
      }
      ExprKind::Lambda(b, body) => {
        let (id, x) = self.fresh_local(b);
        let ty = self.infer(&body.instantiate(&x))?;
        Ok(Expr::pi(b.name.clone(), b.ty.clone(), ty.abstract_local(&id), b.info))
      }
      ExprKind::Pi(b, body) => {
        let l1 = self.infer_sort(&b.ty)?;
        let (_, x) = self.fresh_local(b);
        let l2 = self.infer_sort(&body.instantiate(&x))?;
        Ok(Expr::sort(if self.env.impredicative() { Level::mk_imax(l1, l2) } else { Level::mk_max(l1, l2) }))
      }
      ExprKind::Macro(d, args) => match d {
        MacroDef::Annotation(_) | MacroDef::LetValue => self.infer(Self::macro_arg(d, args, 0)?),
        MacroDef::Let(_) => self.infer(Self::macro_arg(d, args, 1)?),
        MacroDef::TypedExpr => Ok(Self::macro_arg(d, args, 0)?.clone()),
        MacroDef::Other(n) => Err(TcError::UnsupportedMacro(n.clone())),
      },
    }
  }

  fn whnf(&self, e: &Expr) -> Result<Expr, TcError> {
    let mut e = e.clone();
    loop {
      let (f, args) = e.get_app_args();
      let f2 = if f.is_lambda() && !args.is_empty() {
        None
      } else if let Some(f2) = self.unfold_head(f) {
        Some(f2)
      } else {
        return Ok(e)
      };
      e = match f2 {
        None => e.head_beta(),
        Some(f2) => Expr::mk_app(f2, args),
      };
    }
  }

  fn is_prop(&self, e: &Expr) -> Result<bool, TcError> {
    let ty = self.whnf(&self.infer(e)?)?;
    Ok(self.env.impredicative() && ty == Expr::prop())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::BinderInfo;

  fn c(s: &str) -> Expr { Expr::constant(s, vec![]) }

  fn env() -> Environment {
    let mut env = Environment::new(true);
    let ty1 = Expr::sort(Level::of_nat(1));
    env.add_decl(Declaration::axiom("nat", vec![], ty1)).unwrap();
    env.add_decl(Declaration::axiom("zero", vec![], c("nat"))).unwrap();
    env.add_decl(Declaration::axiom("eq", vec![],
      Expr::arrow(c("nat"), &Expr::arrow(c("nat"), &Expr::prop())))).unwrap();
    let id_ty = Expr::pi("A", Expr::sort(Level::of_nat(1)),
      Expr::arrow(Expr::var(0), &Expr::var(0)), BinderInfo::IMPLICIT);
    let id_val = Expr::lambda("A", Expr::sort(Level::of_nat(1)),
      Expr::lambda("x", Expr::var(0), Expr::var(0), BinderInfo::DEFAULT), BinderInfo::IMPLICIT);
    env.add_decl(Declaration::definition("id", vec![], id_ty, id_val)).unwrap();
    env
  }

  #[test]
  fn infer_app() {
    let env = env();
    let tc = BasicChecker::new(&env);
    let e = Expr::mk_app(c("id"), [c("nat"), c("zero")]);
    assert_eq!(tc.infer(&e).unwrap(), c("nat"));
    assert!(matches!(tc.infer(&c("foo")), Err(TcError::UnknownConstant(_))));
    assert!(matches!(tc.infer(&Expr::var(0)), Err(TcError::LooseBoundVar(0))));
  }

  #[test]
  fn whnf_unfolds() {
    let env = env();
    let tc = BasicChecker::new(&env);
    let e = Expr::mk_app(c("id"), [c("nat"), c("zero")]);
    assert_eq!(tc.whnf(&e).unwrap(), c("zero"));
  }

  #[test]
  fn props() {
    let env = env();
    let tc = BasicChecker::new(&env);
    let p = Expr::mk_app(c("eq"), [c("zero"), c("zero")]);
    assert!(tc.is_prop(&p).unwrap());
    assert!(!tc.is_prop(&c("zero")).unwrap());
    let all = Expr::pi("x", c("nat"), Expr::mk_app(c("eq"), [Expr::var(0), Expr::var(0)]),
      BinderInfo::DEFAULT);
    assert!(tc.is_prop(&all).unwrap());
  }
}
