//! Binders and the forms that introduce names: lambda, pi, let, have, show.
use itertools::Itertools;
use pretty::RefDoc;
use dtt_util::Name;
use crate::expr::{Binder, BinderInfo, BinderKind, Expr, ExprKind, Local};
use super::{Pretty, RenderCtx, PP, ARROW_PREC, ASSIGN, FROM, HAVE, IN, LET, SHOW, VISIBLE};

/// A non-dependent pi with default binder info, printed as `A → B`.
fn is_default_arrow(e: &Expr) -> bool {
  matches!(&**e, ExprKind::Pi(b, body) if b.info == BinderInfo::DEFAULT && !body.has_loose_bvar(0))
}

impl<'a> Pretty<'a> {
  /// A variant of `n` (or of `a`, if `n` is not a user name) that does not
  /// occur in `body` and is not bound in the enclosing scope.
  fn pick_unused_name(cx: &RenderCtx, body: &Expr, n: &Name) -> Name {
    let base = if n.is_anonymous() || n.is_internal() { Name::from("a") } else { n.clone() };
    let mut r = base.clone();
    let mut i = 1;
    while body.has_name(&r) || cx.scope.contains(&r) {
      r = base.append_after(i);
      i += 1;
    }
    r
  }

  /// A new local constant displayed as `n`, brought into scope.
  fn fresh_local(cx: &mut RenderCtx, n: Name, ty: Expr, info: BinderInfo) -> Local {
    cx.scope.push(n.clone());
    let id = Name::from_parts(["_pp".to_owned(), cx.next_local.to_string()]);
    cx.next_local += 1;
    Local { id, pp_name: n, ty, info }
  }

  /// Open a binder: choose a fresh display name, bring it into scope, and
  /// instantiate the body with a new local constant.
  fn binding_body_fresh(cx: &mut RenderCtx, b: &Binder, body: &Expr) -> (Expr, Local) {
    let n = Self::pick_unused_name(cx, body, &b.name);
    let l = Self::fresh_local(cx, n, b.ty.clone(), b.info);
    (body.instantiate(&l.clone().into()), l)
  }

  fn pp_binder_block(&'a self, cx: &mut RenderCtx, names: &[&Local]) -> RefDoc<'a, ()> {
    let Some(first) = names.first() else { return self.nil };
    let (open, close) = match first.info.kind {
      BinderKind::Default => ("(", ")"),
      BinderKind::Implicit => ("{", "}"),
      BinderKind::InstImplicit => ("[", "]"),
      BinderKind::StrictImplicit => (self.glyphs().strict_open, self.glyphs().strict_close),
    };
    let mut doc = self.text(open);
    for l in names {
      doc = self.cat([doc, self.text(l.pp_name.to_string()), self.space]);
    }
    let ty = self.pp_child(cx, &first.ty, 0);
    let ty = self.nest(self.indent(), self.append(self.line, ty.doc));
    self.group(self.cat([doc, self.text(":"), ty, self.text(close)]))
  }

  /// Render a list of opened binders, grouping consecutive binders with the
  /// same type and binder info into one block.
  fn pp_binders(&'a self, cx: &mut RenderCtx, locals: &[Local]) -> RefDoc<'a, ()> {
    let mut doc = self.nil;
    for (_, block) in &locals.iter().chunk_by(|&l| (&l.ty, l.info)) {
      let block = self.pp_binder_block(cx, &block.collect_vec());
      doc = self.append(doc, self.group(self.append(self.line, block)));
    }
    doc
  }

  /// `kw binders, body`, the shared layout of lambdas and pis.
  fn pp_binding(&'a self, cx: &mut RenderCtx, kw: &'static str, locals: &[Local], body: &Expr) -> PP<'a> {
    let binders = self.pp_binders(cx, locals);
    let body = self.pp_child(cx, body, 0);
    let body = self.nest(self.indent(), self.append(self.line, body.doc));
    PP::bp(0, self.cat([self.text(kw), binders, self.text(","), body]))
  }

  pub(super) fn pp_lambda(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let mark = cx.scope.len();
    let mut b = e.clone();
    let mut locals = vec![];
    while let ExprKind::Lambda(bi, body) = &*b {
      let (body, l) = Self::binding_body_fresh(cx, bi, body);
      locals.push(l);
      b = body;
    }
    let r = self.pp_binding(cx, self.glyphs().lambda, &locals, &b);
    cx.scope.truncate(mark);
    r
  }

  pub(super) fn pp_pi(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    if is_default_arrow(e) {
      let Some((b, body)) = e.binding() else { unreachable!("not a pi") };
      let lhs = self.pp_child(cx, &b.ty, ARROW_PREC);
      let rhs = self.pp_child(cx, &body.lower_loose_bvars(1, 1), ARROW_PREC - 1);
      let doc = self.cat([lhs.doc, self.space, self.text(self.glyphs().arrow), self.line, rhs.doc]);
      return PP::bp(ARROW_PREC - 1, self.group(doc))
    }
    let mark = cx.scope.len();
    let mut b = e.clone();
    let mut locals = vec![];
    while let ExprKind::Pi(bi, body) = &*b {
      if is_default_arrow(&b) { break }
      let (body, l) = Self::binding_body_fresh(cx, bi, body);
      locals.push(l);
      b = body;
    }
    let kw = if self.is_prop(&b) { self.glyphs().forall } else { self.glyphs().pi };
    let r = self.pp_binding(cx, kw, &locals, &b);
    cx.scope.truncate(mark);
    r
  }

  /// Flatten a chain of lets. A binding is displayed only if its value
  /// occurs in the rest of the term. Leading bindings that do not occur are
  /// dropped, and once one binding is displayed the chain stops at the first
  /// binding whose value does not occur.
  pub(super) fn pp_let(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let mark = cx.scope.len();
    let mut decls = vec![];
    let mut e = e.clone();
    while let Some((n, v, b)) = e.let_parts() {
      let b1 = b.abstract_expr(v);
      if b1.closed() {
        if !decls.is_empty() { break }
        e = b1;
        continue
      }
      let n = Self::pick_unused_name(cx, &b1, n);
      let ty = self.fe.tc.infer(v).unwrap_or_else(|_| Expr::placeholder());
      let l = Self::fresh_local(cx, n.clone(), ty, BinderInfo::DEFAULT);
      decls.push((n, v.clone()));
      e = b1.instantiate(&l.into());
    }
    if decls.is_empty() {
      let r = self.pp_child(cx, &e, 0);
      cx.scope.truncate(mark);
      return r
    }
    let mut doc = self.text(LET);
    for (i, (n, v)) in decls.iter().enumerate() {
      let beg = if i == 0 { self.space } else { self.line };
      let sep = if i + 1 < decls.len() { self.text(",") } else { self.nil };
      let v = self.pp_child(cx, v, 0);
      let v = self.nest(self.indent(), self.cat([self.line, v.doc, sep]));
      let entry = self.cat([self.text(n.to_string()), self.space, self.text(ASSIGN), v]);
      doc = self.append(doc, self.nest(4, self.append(beg, self.group(entry))));
    }
    let body = self.pp_child(cx, &e, 0);
    cx.scope.truncate(mark);
    PP::bp(0, self.cat([doc, self.line, self.text(IN), self.space, self.nest(3, body.doc)]))
  }

  pub(super) fn pp_have(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let Some((f, proof)) = e.app_parts() else { unreachable!("not a have") };
    let Some(ExprKind::Lambda(bi, body)) = f.have_arg().map(|b| &**b) else { unreachable!("not a have") };
    let ty = self.pp_child(cx, &bi.ty, 0);
    let proof = self.pp_child(cx, proof, 0);
    let mark = cx.scope.len();
    let (body, l) = Self::binding_body_fresh(cx, bi, body);
    let body = self.pp_child(cx, &body, 0);
    cx.scope.truncate(mark);
    let mut doc = self.cat([self.text(HAVE), self.space, self.text(l.pp_name.to_string()), self.space]);
    if bi.info.contextual { doc = self.cat([doc, self.text(VISIBLE), self.space]) }
    let ty = self.cat([self.line, ty.doc, self.text(","), self.space, self.text(FROM)]);
    let doc = self.group(self.cat([doc, self.text(":"), self.nest(self.indent(), ty)]));
    let proof = self.nest(self.indent(), self.cat([self.line, proof.doc, self.text(",")]));
    let doc = self.group(self.append(doc, proof));
    PP::bp(0, self.cat([doc, self.line, body.doc]))
  }

  pub(super) fn pp_show(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let Some((f, proof)) = e.show_arg().and_then(Expr::app_parts) else { unreachable!("not a show") };
    let Some((b, _)) = f.binding() else { unreachable!("not a show") };
    let ty = self.pp_child(cx, &b.ty, 0);
    let proof = self.pp_child(cx, proof, 0);
    let doc = self.group(self.cat([self.text(SHOW), self.space, self.nest(5, ty.doc),
      self.text(","), self.space, self.text(FROM)]));
    let proof = self.nest(self.indent(), self.append(self.line, proof.doc));
    PP::bp(0, self.group(self.append(doc, proof)))
  }
}
