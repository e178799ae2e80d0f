//! The expression pretty printer.
//!
//! Printing happens in two passes. The input is first purified (see
//! [`purify`]), giving every metavariable and local constant a distinct
//! display name. The purified term is then rendered bottom-up into a
//! [`pretty`] document; every rendering step returns a [`PP`] carrying the
//! binding powers of the fragment's outermost connective, which the caller
//! compares against its own requirement to decide on parentheses.
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use log::debug;
use num::BigUint;
use pretty::{Arena, DocAllocator, Doc, RefDoc};
use dtt_util::Name;
use crate::environment::Environment;
use crate::expr::{Expr, ExprKind, Local};
use crate::level::Level;
use crate::options::Options;
use crate::typeck::TypeChecker;

mod binders;
mod coercion;
mod notation;
pub mod purify;

use purify::Purifier;

/// The largest binding power. Atoms bind this tightly on both sides.
pub const MAX_BP: u32 = 1024;
/// The binding power of application.
pub const APP_BP: u32 = MAX_BP - 1;
/// The precedence of `→`. The arrow associates to the right, so its result
/// binds at `ARROW_PREC - 1`.
pub const ARROW_PREC: u32 = 25;

/// The spellings of the symbols that differ between unicode and ASCII output.
#[derive(Copy, Clone, Debug)]
pub struct Glyphs {
  /// Printed in place of truncated subterms.
  pub ellipsis: &'static str,
  /// Lambda binder.
  pub lambda: &'static str,
  /// Pi binder with a proposition body.
  pub forall: &'static str,
  /// Pi binder.
  pub pi: &'static str,
  /// Non-dependent function type.
  pub arrow: &'static str,
  /// Opening bracket of a strict implicit binder.
  pub strict_open: &'static str,
  /// Closing bracket of a strict implicit binder.
  pub strict_close: &'static str,
}

/// Unicode glyphs.
pub static UNICODE: Glyphs = Glyphs {
  ellipsis: "…", lambda: "λ", forall: "∀", pi: "Π", arrow: "→",
  strict_open: "⦃", strict_close: "⦄",
};

/// ASCII glyphs.
pub static ASCII: Glyphs = Glyphs {
  ellipsis: "...", lambda: "fun", forall: "forall", pi: "Pi", arrow: "->",
  strict_open: "{{", strict_close: "}}",
};

const LET: &str = "let";
const IN: &str = "in";
const ASSIGN: &str = ":=";
const HAVE: &str = "have";
const FROM: &str = "from";
const VISIBLE: &str = "[visible]";
const SHOW: &str = "show";
const EXPLICIT: &str = "@";

/// An options snapshot together with the data derived from it.
#[derive(Debug)]
pub struct Config {
  opts: Arc<Options>,
  glyphs: &'static Glyphs,
}

impl Config {
  /// Derive the configuration for a set of options.
  #[must_use]
  pub fn new(opts: Arc<Options>) -> Self {
    let glyphs = if opts.unicode { &UNICODE } else { &ASCII };
    Self { opts, glyphs }
  }

  /// The options.
  #[must_use]
  pub fn options(&self) -> &Arc<Options> { &self.opts }
}

/// A rendered fragment with the binding powers of its outermost connective.
#[derive(Copy, Clone, Debug)]
pub struct PP<'a> {
  /// How tightly the fragment binds on its left.
  pub lbp: u32,
  /// How tightly the fragment binds on its right.
  pub rbp: u32,
  /// The document.
  pub doc: RefDoc<'a, ()>,
}

impl<'a> PP<'a> {
  fn atom(doc: RefDoc<'a, ()>) -> PP<'a> { PP { lbp: MAX_BP, rbp: MAX_BP, doc } }
  fn bp(bp: u32, doc: RefDoc<'a, ()>) -> PP<'a> { PP { lbp: bp, rbp: bp, doc } }
}

/// The mutable state of one print call.
#[derive(Debug, Default)]
struct RenderCtx {
  depth: u32,
  steps: u32,
  next_local: u32,
  /// Display names of the binders enclosing the current subterm.
  scope: Vec<Name>,
}

/// Everything the renderer reads.
#[derive(Copy, Clone)]
pub struct FormatEnv<'a> {
  /// The environment.
  pub env: &'a Environment,
  /// The type checker.
  pub tc: &'a dyn TypeChecker,
  /// The configuration.
  pub cfg: &'a Config,
}

impl fmt::Debug for FormatEnv<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FormatEnv").field("env", self.env).field("cfg", self.cfg).finish_non_exhaustive()
  }
}

impl<'a> FormatEnv<'a> {
  /// Run `f` with a renderer allocating into a fresh arena.
  pub fn pretty<T>(self, f: impl for<'b> FnOnce(&'b Pretty<'b>) -> T) -> T {
    f(&Pretty::new(self, &Arena::new()))
  }

  /// A value whose `Display` lays `e` out at the given width.
  #[must_use]
  pub fn pp(self, e: &'a Expr, width: usize) -> PPExpr<'a> { PPExpr { fe: self, e, width } }
}

/// The renderer. Documents are allocated in the arena and live as long as it.
pub struct Pretty<'a> {
  fe: FormatEnv<'a>,
  alloc: &'a Arena<'a, ()>,
  line: RefDoc<'a, ()>,
  space: RefDoc<'a, ()>,
  nil: RefDoc<'a, ()>,
}

impl fmt::Debug for Pretty<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pretty").field("fe", &self.fe).finish_non_exhaustive()
  }
}

type Handler<'a> = fn(&'a Pretty<'a>, &mut RenderCtx, &Expr) -> PP<'a>;

impl<'a> Pretty<'a> {
  fn new(fe: FormatEnv<'a>, alloc: &'a Arena<'a, ()>) -> Pretty<'a> {
    Pretty {
      line: alloc.line().into_doc(),
      space: alloc.space().into_doc(),
      nil: alloc.nil().into_doc(),
      fe, alloc,
    }
  }

  fn opts(&self) -> &'a Options { &self.fe.cfg.opts }
  fn glyphs(&self) -> &'static Glyphs { self.fe.cfg.glyphs }
  fn indent(&self) -> isize { isize::try_from(self.opts().indent).unwrap_or(2) }

  fn alloc(&'a self, doc: Doc<'a, RefDoc<'a, ()>, ()>) -> RefDoc<'a, ()> {
    self.alloc.alloc(doc)
  }

  fn text(&'a self, s: impl Into<Cow<'a, str>>) -> RefDoc<'a, ()> { self.alloc.text(s).into_doc() }

  fn append(&'a self, a: RefDoc<'a, ()>, b: RefDoc<'a, ()>) -> RefDoc<'a, ()> {
    self.alloc(Doc::Append(a, b))
  }

  fn cat<const N: usize>(&'a self, docs: [RefDoc<'a, ()>; N]) -> RefDoc<'a, ()> {
    docs.into_iter().reduce(|a, b| self.append(a, b)).unwrap_or(self.nil)
  }

  fn group(&'a self, doc: RefDoc<'a, ()>) -> RefDoc<'a, ()> { self.alloc(Doc::Group(doc)) }

  fn nest(&'a self, i: isize, doc: RefDoc<'a, ()>) -> RefDoc<'a, ()> { self.alloc(Doc::Nest(i, doc)) }

  fn paren(&'a self, doc: RefDoc<'a, ()>) -> RefDoc<'a, ()> {
    self.group(self.nest(1, self.cat([self.text("("), doc, self.text(")")])))
  }

  /// `f` followed by an indented argument on a breakable line.
  fn app_doc(&'a self, f: RefDoc<'a, ()>, arg: RefDoc<'a, ()>) -> RefDoc<'a, ()> {
    self.group(self.append(f, self.nest(self.indent(), self.append(self.line, arg))))
  }

  /// Render an expression at the top level.
  pub fn expr(&'a self, e: &Expr) -> RefDoc<'a, ()> {
    let opts = self.opts();
    let e = if opts.beta { e.beta_reduce() } else { e.clone() };
    let e = Purifier::new(opts.universes).purify(&e);
    let mut cx = RenderCtx::default();
    let doc = self.pp_child(&mut cx, &e, 0).doc;
    self.group(doc)
  }

  fn pp(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let opts = self.opts();
    if cx.depth > opts.max_depth || cx.steps > opts.max_steps {
      debug!("truncating at depth {} after {} steps", cx.depth, cx.steps);
      return PP::atom(self.text(self.glyphs().ellipsis))
    }
    cx.depth += 1;
    cx.steps += 1;
    let r = self.pp_core(cx, e);
    cx.depth -= 1;
    r
  }

  fn pp_core(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    if let Some(r) = self.pp_notation(cx, e) { return r }
    // Later rules assume the earlier ones did not apply.
    let rules: [(fn(&Expr) -> bool, Handler<'a>); 6] = [
      (Expr::is_placeholder, Self::pp_placeholder),
      (Expr::is_show, Self::pp_show),
      (Expr::is_have, Self::pp_have),
      (Expr::is_let, Self::pp_let),
      (Expr::is_typed_expr, Self::pp_typed_expr),
      (Expr::is_let_value, Self::pp_let_value),
    ];
    if let Some((_, f)) = rules.iter().find(|(test, _)| test(e)) { return f(self, cx, e) }
    if let Some(n) = e.to_num() { return self.pp_num(&n) }
    if !self.opts().metavar_args {
      if let ExprKind::Meta(n, _) = &**e.get_app_fn() { return self.pp_meta(n) }
    }
    match &**e {
      ExprKind::Var(i) => PP::atom(self.text(format!("#{i}"))),
      ExprKind::Sort(l) => self.pp_sort(l),
      ExprKind::Const(n, ls) => self.pp_const(n, ls),
      ExprKind::Meta(n, _) => self.pp_meta(n),
      ExprKind::Local(l) => self.pp_local(l),
      ExprKind::App(..) => self.pp_app(cx, e),
      ExprKind::Lambda(..) => self.pp_lambda(cx, e),
      ExprKind::Pi(..) => self.pp_pi(cx, e),
      ExprKind::Macro(..) => self.pp_macro(cx, e),
    }
  }

  /// Render `e` where binding power `bp` is required, adding parentheses if
  /// the result binds less tightly. Never looks through implicit arguments
  /// or coercions.
  fn pp_child_core(&'a self, cx: &mut RenderCtx, e: &Expr, bp: u32) -> PP<'a> {
    let r = self.pp(cx, e);
    if r.rbp < bp { PP::atom(self.paren(r.doc)) } else { r }
  }

  fn pp_placeholder(&'a self, _: &mut RenderCtx, _: &Expr) -> PP<'a> {
    PP::atom(self.text(crate::expr::PLACEHOLDER))
  }

  fn pp_typed_expr(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let Some((_, v)) = e.typed_expr_parts() else { unreachable!("not a typed expression") };
    self.pp(cx, v)
  }

  fn pp_let_value(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let Some(v) = e.let_value_arg() else { unreachable!("not a let value") };
    self.pp(cx, v)
  }

  fn pp_num(&'a self, n: &BigUint) -> PP<'a> { PP::atom(self.text(n.to_string())) }

  fn pp_sort(&'a self, l: &Level) -> PP<'a> {
    if self.fe.env.impredicative() && *l == Level::Zero {
      PP::atom(self.text("Prop"))
    } else if self.opts().universes {
      PP::atom(self.group(self.cat([
        self.text("Type.{"), self.nest(6, self.text(l.to_string())), self.text("}")])))
    } else {
      PP::atom(self.text("Type"))
    }
  }

  /// The alias of `n`, unless a declaration in an open namespace would
  /// shadow it.
  fn is_aliased(&self, n: &Name) -> Option<&'a Name> {
    let env = self.fe.env;
    let alias = env.alias_of(n)?;
    if env.namespaces().iter().any(|ns| !ns.is_anonymous() && env.find(&ns.append(alias)).is_some()) {
      return None
    }
    Some(alias)
  }

  fn pp_const(&'a self, n: &Name, ls: &[Level]) -> PP<'a> {
    let (env, opts) = (self.fe.env, self.opts());
    let mut n = n.clone();
    if !opts.full_names {
      if let Some(alias) = self.is_aliased(&n) {
        n = alias.clone()
      } else {
        let stripped = env.namespaces().iter()
          .filter(|ns| !ns.is_anonymous())
          .map(|ns| n.replace_prefix(ns, &Name::anonymous()))
          .find(|n2| *n2 != n && !n2.is_anonymous());
        if let Some(n2) = stripped { n = n2 }
      }
    }
    if !opts.private_names {
      if let Some(user) = env.hidden_to_user_name(&n) { n = user.clone() }
    }
    if opts.universes && !ls.is_empty() {
      let mut doc = self.text(format!("{n}.{{"));
      for (i, l) in ls.iter().enumerate() {
        let mut l_doc = self.text(l.to_string());
        if l.is_max_like() { l_doc = self.paren(l_doc) }
        if i != 0 { l_doc = self.append(self.line, l_doc) }
        doc = self.append(doc, self.nest(self.indent(), l_doc));
      }
      PP::atom(self.group(self.append(doc, self.text("}"))))
    } else {
      PP::atom(self.text(n.to_string()))
    }
  }

  fn pp_meta(&'a self, n: &Name) -> PP<'a> { PP::atom(self.text(format!("?{n}"))) }

  fn pp_local(&'a self, l: &Local) -> PP<'a> { PP::atom(self.text(l.pp_name.to_string())) }

  fn pp_app(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    let Some((f, a)) = e.app_parts() else { unreachable!("not an application") };
    let mut fn_doc = self.pp_child(cx, f, APP_BP).doc;
    if self.opts().implicit && !f.is_app() && self.has_implicit_args(f) {
      fn_doc = self.append(self.text(EXPLICIT), fn_doc)
    }
    let arg = self.pp_child(cx, a, MAX_BP);
    PP::bp(APP_BP, self.app_doc(fn_doc, arg.doc))
  }

  fn pp_macro(&'a self, cx: &mut RenderCtx, e: &Expr) -> PP<'a> {
    if let Some(arg) = e.explicit_arg() {
      let r = self.pp_child(cx, arg, MAX_BP);
      return PP::atom(self.append(self.text(EXPLICIT), r.doc))
    }
    let ExprKind::Macro(d, args) = &**e else { unreachable!("not a macro") };
    let mut doc = self.text(format!("[{d}"));
    for a in args {
      let r = self.pp_child(cx, a, MAX_BP);
      doc = self.append(doc, self.nest(self.indent(), self.append(self.line, r.doc)));
    }
    PP::atom(self.group(self.append(doc, self.text("]"))))
  }
}

/// The result of [`PrettyPrinter::pp`], rendered on display.
pub struct PPExpr<'a> {
  fe: FormatEnv<'a>,
  e: &'a Expr,
  width: usize,
}

impl fmt::Debug for PPExpr<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PPExpr").field("e", self.e).field("width", &self.width).finish_non_exhaustive()
  }
}

impl fmt::Display for PPExpr<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.fe.pretty(|p| p.expr(self.e).render_fmt(self.width, f))
  }
}

/// A printer bound to an environment and a type checker.
///
/// The configuration is derived from the options when they are set, and
/// reused until a different options value is installed.
pub struct PrettyPrinter<'a> {
  env: &'a Environment,
  tc: &'a dyn TypeChecker,
  cfg: Config,
}

impl fmt::Debug for PrettyPrinter<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PrettyPrinter").field("cfg", &self.cfg).finish_non_exhaustive()
  }
}

impl<'a> PrettyPrinter<'a> {
  /// Construct a printer.
  #[must_use]
  pub fn new(env: &'a Environment, tc: &'a dyn TypeChecker, opts: Arc<Options>) -> Self {
    Self { env, tc, cfg: Config::new(opts) }
  }

  /// Install a set of options. Nothing is recomputed if `opts` is the same
  /// allocation as the current options.
  pub fn set_options(&mut self, opts: &Arc<Options>) {
    if Arc::ptr_eq(&self.cfg.opts, opts) { return }
    debug!("printer options changed");
    self.cfg = Config::new(opts.clone());
  }

  /// The current options.
  #[must_use]
  pub fn options(&self) -> &Arc<Options> { &self.cfg.opts }

  /// The formatting environment.
  #[must_use]
  pub fn format_env(&self) -> FormatEnv<'_> { FormatEnv { env: self.env, tc: self.tc, cfg: &self.cfg } }

  /// Lay out `e` at the given width.
  #[must_use]
  pub fn pp<'b>(&'b self, e: &'b Expr, width: usize) -> PPExpr<'b> { self.format_env().pp(e, width) }
}
