//! Printing with user notations.
//!
//! A notation applies if its pattern matches the term. Pattern variables
//! collect the arguments, which are then laid out around the notation's
//! tokens from right to left, so that each argument knows the precedence of
//! the tokens on either side of it.
use log::trace;
use crate::expr::{Expr, ExprKind};
use crate::level::Level;
use crate::notation::{Action, NotationEntry, NotationKind};
use crate::typeck::TcError;
use super::{Pretty, RenderCtx, PP, MAX_BP};

impl<'a> Pretty<'a> {
  fn match_level(&self, p: &Level, l: &Level) -> bool {
    if p == l { return true }
    if self.opts().universes { return false }
    match (p, l) {
      (Level::Placeholder, _) => true,
      (Level::Succ(p), Level::Succ(l)) => self.match_level(p, l),
      _ => false,
    }
  }

  /// Match `e` against the pattern `p`, filling `args[len - 1 - i]` with the
  /// subterm at pattern variable `#i`.
  fn match_expr(&self, p: &Expr, e: &Expr, args: &mut [Option<Expr>]) -> bool {
    if let Some(p) = p.explicit_arg() { return self.match_expr(p, e, args) }
    match (&**p, &**e) {
      (ExprKind::Var(i), _) => {
        let Some(slot) = args.len().checked_sub(*i as usize + 1).and_then(|j| args.get_mut(j))
        else { return false };
        if let Some(a) = slot { return *a == *e }
        *slot = Some(e.clone());
        true
      }
      _ if p.is_placeholder() => true,
      (ExprKind::Const(n1, ls1), ExprKind::Const(n2, ls2)) =>
        n1 == n2 && ls1.len() <= ls2.len() &&
        ls1.iter().zip(ls2).all(|(p, l)| self.match_level(p, l)),
      (ExprKind::Sort(l1), ExprKind::Sort(l2)) => self.match_level(l1, l2),
      (ExprKind::Sort(_), _) => false,
      (_, ExprKind::App(..)) => self.match_app(p, e, args),
      _ => false,
    }
  }

  fn match_app(&self, p: &Expr, e: &Expr, args: &mut [Option<Expr>]) -> bool {
    let (p_fn, p_args) = p.get_app_args();
    let (e_fn, e_args) = e.get_app_args();
    if let Some(p_fn) = p_fn.explicit_arg() {
      return self.match_expr(p_fn, e_fn, args) && p_args.len() == e_args.len() &&
        p_args.iter().zip(&e_args).all(|(p, e)| self.match_expr(p, e, args))
    }
    self.match_expr(p_fn, e_fn, args) &&
      self.match_explicit_args(e_fn, &p_args, &e_args, args).unwrap_or(false)
  }

  /// Match the pattern arguments against the explicit arguments of `e_fn`
  /// applied to `e_args`, skipping the implicit ones.
  fn match_explicit_args(&self, e_fn: &Expr, p_args: &[Expr], e_args: &[Expr],
    args: &mut [Option<Expr>]
  ) -> Result<bool, TcError> {
    let tc = self.fe.tc;
    let mut ty = tc.infer(e_fn)?;
    let mut j = 0;
    for a in e_args {
      let pi = tc.ensure_pi(&ty)?;
      let ExprKind::Pi(b, body) = &*pi else { return Err(TcError::NotAFunction(pi.clone())) };
      if b.info.is_explicit() {
        let Some(p) = p_args.get(j) else { return Ok(false) };
        if !self.match_expr(p, a, args) { return Ok(false) }
        j += 1;
      }
      ty = body.instantiate(a);
    }
    Ok(j == p_args.len())
  }

  /// Render a notation child between a token of precedence `lbp` on its right
  /// and one of precedence `rbp` on its left.
  fn pp_notation_child(&'a self, cx: &mut RenderCtx, e: &Expr, lbp: u32, rbp: u32) -> PP<'a> {
    if let Some((f, _)) = e.app_parts() {
      if self.is_implicit(f) { return self.pp_notation_child(cx, f, lbp, rbp) }
      if let Some(arity) = self.hidden_coercion(e) { return self.pp_coercion(cx, e, rbp, arity) }
    }
    let r = self.pp(cx, e);
    if r.rbp < lbp || r.lbp <= rbp { PP::atom(self.paren(r.doc)) } else { r }
  }

  fn pp_notation_entry(&'a self, cx: &mut RenderCtx, entry: &'a NotationEntry, mut args: Vec<Expr>
  ) -> Option<PP<'a>> {
    if let NotationKind::Numeral(n) = &entry.kind { return Some(self.pp_num(n)) }
    let tokens = self.fe.env.tokens();
    let mut last_rbp = MAX_BP - 1;
    let mut token_lbp = 0;
    let mut doc = None;
    for (i, t) in entry.transitions.iter().rev().enumerate() {
      let last = i == 0;
      let tk = self.text(&*t.token);
      let curr = match t.action {
        Action::Skip => {
          if last { last_rbp = tokens.precedence(&t.token).unwrap_or(0) }
          tk
        }
        Action::Expr { rbp } => {
          let e = args.pop()?;
          if last { last_rbp = rbp }
          let r = self.pp_notation_child(cx, &e, token_lbp, rbp);
          self.cat([tk, self.space, r.doc])
        }
        _ => {
          trace!("notation action {:?} is not printable", t.action);
          return None
        }
      };
      token_lbp = tokens.precedence(&t.token).unwrap_or(0);
      doc = Some(match doc {
        None => curr,
        Some(doc) => self.cat([curr, self.space, doc]),
      });
    }
    let first_lbp = token_lbp;
    let mut doc = doc.unwrap_or(self.nil);
    if !entry.is_nud() {
      let [e] = &*args else { return None };
      let r = self.pp_notation_child(cx, e, token_lbp, 0);
      doc = self.cat([r.doc, self.space, doc]);
    }
    Some(PP { lbp: first_lbp, rbp: last_rbp, doc })
  }

  /// Try the notations for the head of `e`, most recently declared first.
  pub(super) fn pp_notation(&'a self, cx: &mut RenderCtx, e: &Expr) -> Option<PP<'a>> {
    let (env, opts) = (self.fe.env, self.opts());
    if !opts.notation || matches!(**e, ExprKind::Var(_)) { return None }
    for entry in env.notations(&e.head_index()) {
      if !opts.unicode && !entry.safe_ascii {
        trace!("skipping notation with non-ascii tokens");
        continue
      }
      let mut args = vec![None; entry.num_parameters()];
      if !self.match_expr(&entry.pattern, e, &mut args) {
        trace!("notation pattern {:?} does not match", entry.pattern);
        continue
      }
      let Some(args) = args.into_iter().collect::<Option<Vec<_>>>() else {
        trace!("notation pattern {:?} left a parameter unassigned", entry.pattern);
        continue
      };
      if let Some(r) = self.pp_notation_entry(cx, entry, args) { return Some(r) }
      trace!("notation pattern {:?} matched but could not be printed", entry.pattern);
    }
    None
  }
}
