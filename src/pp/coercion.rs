//! Hiding implicit arguments and coercions.
//!
//! Both need the type checker: an argument is implicit if the binder it
//! instantiates is, which is only known from the function's type. Any type
//! checker failure is read as "not implicit", so the term is printed in full.
use dtt_util::Name;
use crate::expr::{BinderInfo, Expr, ExprKind};
use crate::typeck::TcError;
use super::{Pretty, RenderCtx, PP, APP_BP, EXPLICIT, MAX_BP};

impl<'a> Pretty<'a> {
  fn first_binder(&self, f: &Expr) -> Result<BinderInfo, TcError> {
    let tc = self.fe.tc;
    let ty = tc.ensure_pi(&tc.infer(f)?)?;
    match &*ty {
      ExprKind::Pi(b, _) => Ok(b.info),
      _ => Err(TcError::NotAFunction(ty.clone())),
    }
  }

  /// Is the next argument of `f` implicit and hidden? Never under an `@`.
  pub(super) fn is_implicit(&self, f: &Expr) -> bool {
    if self.opts().implicit || !f.closed() || f.get_app_fn().is_explicit() { return false }
    self.first_binder(f).is_ok_and(|bi| !bi.is_explicit())
  }

  fn any_implicit_binder(&self, f: &Expr) -> Result<bool, TcError> {
    let tc = self.fe.tc;
    let mut ty = tc.whnf(&tc.infer(f)?)?;
    let mut i = 0_u32;
    while let ExprKind::Pi(b, body) = &*ty {
      if !b.info.is_explicit() { return Ok(true) }
      let x = Expr::local(Name::from_parts(["_pp_arg".to_owned(), i.to_string()]),
        b.name.clone(), b.ty.clone(), b.info);
      i += 1;
      let next = tc.whnf(&body.instantiate(&x))?;
      ty = next;
    }
    Ok(false)
  }

  /// Does the type of `f` have an implicit binder anywhere in its telescope?
  pub(super) fn has_implicit_args(&self, f: &Expr) -> bool {
    f.closed() && self.any_implicit_binder(f).unwrap_or(false)
  }

  /// Is `e` a proof, that is, is its type a proposition?
  pub(super) fn is_prop(&self, e: &Expr) -> bool {
    self.fe.env.impredicative() && self.fe.tc.is_prop(e).unwrap_or(false)
  }

  /// The arity of the coercion at the head of `e`, if `e` is an application
  /// of one and coercions are hidden.
  pub(super) fn hidden_coercion(&self, e: &Expr) -> Option<usize> {
    if_chain! {
      if !self.opts().coercions && e.is_app();
      if let Some(info) = self.fe.env.is_coercion(e.get_app_fn());
      then { Some(info.arity) }
      else { None }
    }
  }

  /// Render `e` where binding power `bp` is required, skipping hidden
  /// implicit arguments and coercions.
  pub(super) fn pp_child(&'a self, cx: &mut RenderCtx, e: &Expr, bp: u32) -> PP<'a> {
    if let Some((f, _)) = e.app_parts() {
      if self.is_implicit(f) { return self.pp_child(cx, f, bp) }
      if let Some(arity) = self.hidden_coercion(e) { return self.pp_coercion(cx, e, bp, arity) }
    }
    self.pp_child_core(cx, e, bp)
  }

  /// Render an application of a coercion taking `arity` parameters before
  /// the coerced value. The parameters and the coercion are dropped; any
  /// arguments after the coerced value stay, as in `f x` for `coe_fn f x`.
  pub(super) fn pp_coercion(&'a self, cx: &mut RenderCtx, e: &Expr, bp: u32, arity: usize) -> PP<'a> {
    let n = e.get_app_num_args();
    if arity >= n { return self.pp_child_core(cx, e, bp) }
    if arity + 1 == n {
      let Some((_, a)) = e.app_parts() else { unreachable!("not an application") };
      return self.pp_child(cx, a, bp)
    }
    let r = self.pp_coercion_fn(cx, e, n - arity);
    if r.rbp < bp { PP::atom(self.paren(r.doc)) } else { r }
  }

  /// Render the last `sz` arguments of `e` as an application headed by the
  /// first of them.
  fn pp_coercion_fn(&'a self, cx: &mut RenderCtx, e: &Expr, sz: usize) -> PP<'a> {
    let Some((f, a)) = e.app_parts() else { unreachable!("not an application") };
    if sz == 1 { return self.pp_child(cx, a, APP_BP) }
    if self.is_implicit(f) { return self.pp_coercion_fn(cx, f, sz - 1) }
    let mut fn_doc = self.pp_coercion_fn(cx, f, sz - 1).doc;
    if self.opts().implicit && sz == 2 && self.has_implicit_args(f) {
      fn_doc = self.append(self.text(EXPLICIT), fn_doc)
    }
    let arg = self.pp_child(cx, a, MAX_BP);
    PP::bp(APP_BP, self.app_doc(fn_doc, arg.doc))
  }
}
