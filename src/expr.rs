//! Expressions of the dependently typed term language.
//!
//! An [`Expr`] is a shared pointer to an immutable node. Every node caches a
//! few [`ExprFlags`] and the range of its loose bound variables, so that
//! "is this subterm closed" and "does this subterm contain metavariables" are
//! constant time questions.
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use bitflags::bitflags;
use num::BigUint;
use dtt_util::Name;
use crate::level::Level;

bitflags! {
  /// Facts about an expression, computed bottom-up at construction.
  #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
  pub struct ExprFlags: u8 {
    /// Contains an expression metavariable.
    const HAS_META = 1;
    /// Contains a universe metavariable.
    const HAS_UNIV_META = 2;
    /// Contains a local constant.
    const HAS_LOCAL = 4;
    /// Contains a universe parameter.
    const HAS_PARAM = 8;
  }
}

impl ExprFlags {
  fn of_level(l: &Level) -> ExprFlags {
    let mut flags = ExprFlags::empty();
    if l.has_meta() { flags |= ExprFlags::HAS_UNIV_META }
    if l.has_param() { flags |= ExprFlags::HAS_PARAM }
    flags
  }
}

/// The kind of a binder, which determines its brackets and whether the
/// argument is supplied by the elaborator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BinderKind {
  /// `(x : T)`
  #[default]
  Default,
  /// `{x : T}`
  Implicit,
  /// `⦃x : T⦄`
  StrictImplicit,
  /// `[x : T]`
  InstImplicit,
}

/// Binder annotations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BinderInfo {
  /// The bracket kind.
  pub kind: BinderKind,
  /// A contextual hypothesis, displayed as `[visible]` on `have`.
  pub contextual: bool,
}

impl BinderInfo {
  /// An explicit binder.
  pub const DEFAULT: BinderInfo = BinderInfo { kind: BinderKind::Default, contextual: false };
  /// An implicit binder.
  pub const IMPLICIT: BinderInfo = BinderInfo { kind: BinderKind::Implicit, contextual: false };
  /// A strict implicit binder.
  pub const STRICT_IMPLICIT: BinderInfo =
    BinderInfo { kind: BinderKind::StrictImplicit, contextual: false };
  /// An instance implicit binder.
  pub const INST_IMPLICIT: BinderInfo =
    BinderInfo { kind: BinderKind::InstImplicit, contextual: false };

  /// True for the plain `(x : T)` kind.
  #[must_use]
  pub fn is_explicit(self) -> bool { self.kind == BinderKind::Default }
}

/// The name, type and annotations bound by a lambda or pi.
#[derive(Clone, Debug)]
pub struct Binder {
  /// The suggested display name.
  pub name: Name,
  /// The binder type.
  pub ty: Expr,
  /// Binder annotations.
  pub info: BinderInfo,
}

/// A local constant: a free variable standing for an opened binder.
#[derive(Clone, Debug)]
pub struct Local {
  /// The unique identity of this local. Two locals are equal iff their ids are.
  pub id: Name,
  /// The name to display.
  pub pp_name: Name,
  /// The type of the local.
  pub ty: Expr,
  /// Annotations of the binder this local came from.
  pub info: BinderInfo,
}

/// Annotation markers, wrapping a single argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Annotation {
  /// `have h : T, from p, body`, wrapping `(λ h : T, body) p`.
  Have,
  /// `show T, from p`, wrapping `(λ this : T, this) p`.
  Show,
  /// `@f`: display all arguments of the application explicitly.
  Explicit,
}

/// The macros known to the printer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MacroDef {
  /// A one-argument annotation.
  Annotation(Annotation),
  /// `let x := v in b`, with arguments `[v, b']` where `b'` is `b` with
  /// every use of `x` replaced by `v`.
  Let(Name),
  /// Marks the value of a let binding. One argument.
  LetValue,
  /// `(v : T)`, with arguments `[T, v]`.
  TypedExpr,
  /// Any other macro, printed as `[name args...]`.
  Other(Name),
}

/// The shape of an expression node.
#[derive(Clone, Debug)]
pub enum ExprKind {
  /// A bound variable, by de Bruijn index.
  Var(u32),
  /// `Sort l`.
  Sort(Level),
  /// A constant with its universe instantiation.
  Const(Name, Vec<Level>),
  /// A metavariable with its name and type.
  Meta(Name, Expr),
  /// A local constant.
  Local(Local),
  /// Application `f a`.
  App(Expr, Expr),
  /// `λ x : T, e`
  Lambda(Binder, Expr),
  /// `Π x : T, e`
  Pi(Binder, Expr),
  /// A macro application.
  Macro(MacroDef, Vec<Expr>),
}

#[derive(Debug)]
struct ExprNode {
  kind: ExprKind,
  flags: ExprFlags,
  bvars: u32,
}

/// A shared expression.
#[derive(Clone)]
pub struct Expr(Arc<ExprNode>);

impl Deref for Expr {
  type Target = ExprKind;
  fn deref(&self) -> &ExprKind { &self.0.kind }
}

impl fmt::Debug for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.kind.fmt(f) }
}

impl PartialEq for Expr {
  fn eq(&self, other: &Expr) -> bool {
    if self.ptr_eq(other) { return true }
    if self.0.flags != other.0.flags || self.0.bvars != other.0.bvars { return false }
    match (&**self, &**other) {
      (ExprKind::Var(i), ExprKind::Var(j)) => i == j,
      (ExprKind::Sort(l1), ExprKind::Sort(l2)) => l1 == l2,
      (ExprKind::Const(n1, ls1), ExprKind::Const(n2, ls2)) => n1 == n2 && ls1 == ls2,
      (ExprKind::Meta(n1, _), ExprKind::Meta(n2, _)) => n1 == n2,
      (ExprKind::Local(l1), ExprKind::Local(l2)) => l1.id == l2.id,
      (ExprKind::App(f1, a1), ExprKind::App(f2, a2)) => f1 == f2 && a1 == a2,
      (ExprKind::Lambda(b1, e1), ExprKind::Lambda(b2, e2)) |
      (ExprKind::Pi(b1, e1), ExprKind::Pi(b2, e2)) =>
        b1.info == b2.info && b1.ty == b2.ty && e1 == e2,
      (ExprKind::Macro(d1, as1), ExprKind::Macro(d2, as2)) => d1 == d2 && as1 == as2,
      _ => false,
    }
  }
}
impl Eq for Expr {}

impl fmt::Display for MacroDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MacroDef::Annotation(Annotation::Have) => f.write_str("have"),
      MacroDef::Annotation(Annotation::Show) => f.write_str("show"),
      MacroDef::Annotation(Annotation::Explicit) => f.write_str("@"),
      MacroDef::Let(_) => f.write_str("let"),
      MacroDef::LetValue => f.write_str("let_value"),
      MacroDef::TypedExpr => f.write_str("typed_expr"),
      MacroDef::Other(n) => write!(f, "{n}"),
    }
  }
}

impl From<Local> for Expr {
  fn from(l: Local) -> Expr { Expr::new(ExprKind::Local(l)) }
}

/// The name of the placeholder constant `_`.
pub const PLACEHOLDER: &str = "_";

/// The symbol a notation or coercion is indexed by: the head of an application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeadIndex {
  /// A constant head.
  Const(Name),
  /// A local constant head, by id.
  Local(Name),
  /// A metavariable head.
  Meta(Name),
  /// A bound variable head.
  Var,
  /// A sort.
  Sort,
  /// A lambda head.
  Lambda,
  /// A pi type.
  Pi,
  /// A macro head.
  Macro,
}

impl Expr {
  fn new(kind: ExprKind) -> Expr {
    let (flags, bvars) = match &kind {
      ExprKind::Var(i) => (ExprFlags::empty(), i.saturating_add(1)),
      ExprKind::Sort(l) => (ExprFlags::of_level(l), 0),
      ExprKind::Const(_, ls) =>
        (ls.iter().fold(ExprFlags::empty(), |f, l| f | ExprFlags::of_level(l)), 0),
      ExprKind::Meta(_, ty) => (ty.flags() | ExprFlags::HAS_META, 0),
      ExprKind::Local(l) => (l.ty.flags() | ExprFlags::HAS_LOCAL, 0),
      ExprKind::App(f, a) => (f.flags() | a.flags(), f.0.bvars.max(a.0.bvars)),
      ExprKind::Lambda(b, e) | ExprKind::Pi(b, e) =>
        (b.ty.flags() | e.flags(), b.ty.0.bvars.max(e.0.bvars.saturating_sub(1))),
      ExprKind::Macro(_, args) => args.iter().fold((ExprFlags::empty(), 0),
        |(f, n), a| (f | a.flags(), n.max(a.0.bvars))),
    };
    Expr(Arc::new(ExprNode { kind, flags, bvars }))
  }

  /// A bound variable.
  #[must_use]
  pub fn var(i: u32) -> Expr { Expr::new(ExprKind::Var(i)) }
  /// `Sort l`.
  #[must_use]
  pub fn sort(l: Level) -> Expr { Expr::new(ExprKind::Sort(l)) }
  /// `Prop`, that is, `Sort 0`.
  #[must_use]
  pub fn prop() -> Expr { Expr::sort(Level::Zero) }
  /// A constant.
  pub fn constant(n: impl Into<Name>, ls: Vec<Level>) -> Expr {
    Expr::new(ExprKind::Const(n.into(), ls))
  }
  /// A metavariable.
  pub fn meta(n: impl Into<Name>, ty: Expr) -> Expr { Expr::new(ExprKind::Meta(n.into(), ty)) }
  /// A local constant.
  pub fn local(id: impl Into<Name>, pp_name: impl Into<Name>, ty: Expr, info: BinderInfo) -> Expr {
    Expr::new(ExprKind::Local(Local { id: id.into(), pp_name: pp_name.into(), ty, info }))
  }
  /// An application.
  #[must_use]
  pub fn app(f: Expr, a: Expr) -> Expr { Expr::new(ExprKind::App(f, a)) }
  /// `f a1 ... an`.
  pub fn mk_app(f: Expr, args: impl IntoIterator<Item = Expr>) -> Expr {
    args.into_iter().fold(f, Expr::app)
  }
  /// A lambda.
  pub fn lambda(n: impl Into<Name>, ty: Expr, body: Expr, info: BinderInfo) -> Expr {
    Expr::new(ExprKind::Lambda(Binder { name: n.into(), ty, info }, body))
  }
  /// A pi type.
  pub fn pi(n: impl Into<Name>, ty: Expr, body: Expr, info: BinderInfo) -> Expr {
    Expr::new(ExprKind::Pi(Binder { name: n.into(), ty, info }, body))
  }
  /// The non-dependent function type `dom → cod`.
  #[must_use]
  pub fn arrow(dom: Expr, cod: &Expr) -> Expr {
    Expr::pi("a", dom, cod.lift_loose_bvars(0, 1), BinderInfo::DEFAULT)
  }
  /// A macro application.
  #[must_use]
  pub fn mk_macro(d: MacroDef, args: Vec<Expr>) -> Expr { Expr::new(ExprKind::Macro(d, args)) }
  /// Wrap `e` in an annotation.
  #[must_use]
  pub fn annotate(a: Annotation, e: Expr) -> Expr {
    Expr::mk_macro(MacroDef::Annotation(a), vec![e])
  }
  /// `let n := v in body`, where `body` already has `v` substituted for `n`.
  pub fn mk_let(n: impl Into<Name>, v: Expr, body: Expr) -> Expr {
    Expr::mk_macro(MacroDef::Let(n.into()), vec![v, body])
  }
  /// `have n : ty, from proof, body`, where `body` refers to `n` as `#0`.
  pub fn have(n: impl Into<Name>, ty: Expr, proof: Expr, body: Expr, info: BinderInfo) -> Expr {
    Expr::app(Expr::annotate(Annotation::Have, Expr::lambda(n, ty, body, info)), proof)
  }
  /// `show ty, from proof`.
  #[must_use]
  pub fn show(ty: Expr, proof: Expr) -> Expr {
    let id = Expr::lambda("this", ty, Expr::var(0), BinderInfo::DEFAULT);
    Expr::annotate(Annotation::Show, Expr::app(id, proof))
  }
  /// `@e`.
  #[must_use]
  pub fn explicit(e: Expr) -> Expr { Expr::annotate(Annotation::Explicit, e) }
  /// Mark `v` as the value of a let binding.
  #[must_use]
  pub fn let_value(v: Expr) -> Expr { Expr::mk_macro(MacroDef::LetValue, vec![v]) }
  /// `(v : ty)`.
  #[must_use]
  pub fn typed_expr(ty: Expr, v: Expr) -> Expr { Expr::mk_macro(MacroDef::TypedExpr, vec![ty, v]) }
  /// The placeholder `_`.
  #[must_use]
  pub fn placeholder() -> Expr { Expr::constant(PLACEHOLDER, vec![]) }

  /// Build the numeral `n` out of `num.zero`, `num.pos` and the binary
  /// `pos_num` constructors.
  #[must_use]
  pub fn num(n: &BigUint) -> Expr {
    fn pos(n: &BigUint) -> Expr {
      if *n == BigUint::from(1u32) { return Expr::constant("pos_num.one", vec![]) }
      let bit = if n.bit(0) { "pos_num.bit1" } else { "pos_num.bit0" };
      Expr::app(Expr::constant(bit, vec![]), pos(&(n >> 1u32)))
    }
    if *n == BigUint::default() { return Expr::constant("num.zero", vec![]) }
    Expr::app(Expr::constant("num.pos", vec![]), pos(n))
  }

  /// The kind of this node.
  #[must_use]
  pub fn kind(&self) -> &ExprKind { &self.0.kind }
  /// The cached flags.
  #[must_use]
  pub fn flags(&self) -> ExprFlags { self.0.flags }
  /// One more than the largest loose bound variable, or `0` if closed.
  #[must_use]
  pub fn loose_bvar_range(&self) -> u32 { self.0.bvars }
  /// True if there are no loose bound variables.
  #[must_use]
  pub fn closed(&self) -> bool { self.0.bvars == 0 }
  /// True if some metavariable occurs.
  #[must_use]
  pub fn has_meta(&self) -> bool { self.0.flags.contains(ExprFlags::HAS_META) }
  /// True if some universe metavariable occurs.
  #[must_use]
  pub fn has_univ_meta(&self) -> bool { self.0.flags.contains(ExprFlags::HAS_UNIV_META) }
  /// True if some local constant occurs.
  #[must_use]
  pub fn has_local(&self) -> bool { self.0.flags.contains(ExprFlags::HAS_LOCAL) }
  /// True if some universe parameter occurs.
  #[must_use]
  pub fn has_param(&self) -> bool { self.0.flags.contains(ExprFlags::HAS_PARAM) }
  /// Pointer equality.
  #[must_use]
  pub fn ptr_eq(&self, other: &Expr) -> bool { Arc::ptr_eq(&self.0, &other.0) }

  /// If this is an application `f a`, return `(f, a)`.
  #[must_use]
  pub fn app_parts(&self) -> Option<(&Expr, &Expr)> {
    if let ExprKind::App(f, a) = &**self { Some((f, a)) } else { None }
  }
  /// If this is a lambda or pi, return its binder and body.
  #[must_use]
  pub fn binding(&self) -> Option<(&Binder, &Expr)> {
    match &**self {
      ExprKind::Lambda(b, e) | ExprKind::Pi(b, e) => Some((b, e)),
      _ => None,
    }
  }
  /// True for applications.
  #[must_use]
  pub fn is_app(&self) -> bool { matches!(**self, ExprKind::App(..)) }
  /// True for lambdas.
  #[must_use]
  pub fn is_lambda(&self) -> bool { matches!(**self, ExprKind::Lambda(..)) }
  /// True for pi types.
  #[must_use]
  pub fn is_pi(&self) -> bool { matches!(**self, ExprKind::Pi(..)) }
  /// True for a constant with the given dotted name.
  #[must_use]
  pub fn is_const_named(&self, s: &str) -> bool {
    matches!(&**self, ExprKind::Const(n, _) if n.is_str(s))
  }
  /// The name of a constant.
  #[must_use]
  pub fn const_name(&self) -> Option<&Name> {
    if let ExprKind::Const(n, _) = &**self { Some(n) } else { None }
  }

  /// The head of an application spine.
  #[must_use]
  pub fn get_app_fn(&self) -> &Expr {
    let mut e = self;
    while let ExprKind::App(f, _) = &**e { e = f }
    e
  }

  /// The head of an application spine and its arguments in order.
  #[must_use]
  pub fn get_app_args(&self) -> (&Expr, Vec<Expr>) {
    let mut args = vec![];
    let mut e = self;
    while let ExprKind::App(f, a) = &**e {
      args.push(a.clone());
      e = f;
    }
    args.reverse();
    (e, args)
  }

  /// The number of arguments in the application spine.
  #[must_use]
  pub fn get_app_num_args(&self) -> usize {
    let mut n = 0;
    let mut e = self;
    while let ExprKind::App(f, _) = &**e { e = f; n += 1 }
    n
  }

  /// The index used to look up notations and coercions. Explicit
  /// annotations on the head are looked through.
  #[must_use]
  pub fn head_index(&self) -> HeadIndex {
    let mut f = self.get_app_fn();
    while let Some(e) = f.explicit_arg() { f = e.get_app_fn() }
    match &**f {
      ExprKind::Const(n, _) => HeadIndex::Const(n.clone()),
      ExprKind::Local(l) => HeadIndex::Local(l.id.clone()),
      ExprKind::Meta(n, _) => HeadIndex::Meta(n.clone()),
      ExprKind::Var(_) => HeadIndex::Var,
      ExprKind::Sort(_) => HeadIndex::Sort,
      ExprKind::Lambda(..) => HeadIndex::Lambda,
      ExprKind::Pi(..) => HeadIndex::Pi,
      ExprKind::App(..) | ExprKind::Macro(..) => HeadIndex::Macro,
    }
  }

  /// If this is an annotation, return its marker and argument.
  #[must_use]
  pub fn annotation(&self) -> Option<(Annotation, &Expr)> {
    match &**self {
      ExprKind::Macro(MacroDef::Annotation(a), args) if args.len() == 1 => Some((*a, &args[0])),
      _ => None,
    }
  }
  fn annotation_arg(&self, a: Annotation) -> Option<&Expr> {
    match self.annotation() {
      Some((a2, e)) if a == a2 => Some(e),
      _ => None,
    }
  }
  /// The argument of an `@` annotation.
  #[must_use]
  pub fn explicit_arg(&self) -> Option<&Expr> { self.annotation_arg(Annotation::Explicit) }
  /// The argument of a `have` annotation.
  #[must_use]
  pub fn have_arg(&self) -> Option<&Expr> { self.annotation_arg(Annotation::Have) }
  /// The argument of a `show` annotation.
  #[must_use]
  pub fn show_arg(&self) -> Option<&Expr> { self.annotation_arg(Annotation::Show) }
  /// True for `@e`.
  #[must_use]
  pub fn is_explicit(&self) -> bool { self.explicit_arg().is_some() }
  /// True for `have` forms: an application whose function is a `have`
  /// annotation.
  #[must_use]
  pub fn is_have(&self) -> bool {
    self.app_parts().and_then(|(f, _)| f.have_arg()).is_some_and(Expr::is_lambda)
  }
  /// True for `show` forms: a `show` annotation around the application of
  /// a lambda.
  #[must_use]
  pub fn is_show(&self) -> bool {
    self.show_arg().and_then(Expr::app_parts).is_some_and(|(f, _)| f.is_lambda())
  }

  /// If this is a let macro, return `(name, value, body)`.
  #[must_use]
  pub fn let_parts(&self) -> Option<(&Name, &Expr, &Expr)> {
    match &**self {
      ExprKind::Macro(MacroDef::Let(n), args) if args.len() == 2 => Some((n, &args[0], &args[1])),
      _ => None,
    }
  }
  /// True for let macros.
  #[must_use]
  pub fn is_let(&self) -> bool { self.let_parts().is_some() }
  /// The value wrapped by a let-value marker.
  #[must_use]
  pub fn let_value_arg(&self) -> Option<&Expr> {
    match &**self {
      ExprKind::Macro(MacroDef::LetValue, args) if args.len() == 1 => Some(&args[0]),
      _ => None,
    }
  }
  /// True for let-value markers.
  #[must_use]
  pub fn is_let_value(&self) -> bool { self.let_value_arg().is_some() }
  /// If this is a typed expression `(v : T)`, return `(T, v)`.
  #[must_use]
  pub fn typed_expr_parts(&self) -> Option<(&Expr, &Expr)> {
    match &**self {
      ExprKind::Macro(MacroDef::TypedExpr, args) if args.len() == 2 => Some((&args[0], &args[1])),
      _ => None,
    }
  }
  /// True for typed expressions.
  #[must_use]
  pub fn is_typed_expr(&self) -> bool { self.typed_expr_parts().is_some() }
  /// True for the placeholder constant `_` and `Sort _`.
  #[must_use]
  pub fn is_placeholder(&self) -> bool {
    match &**self {
      ExprKind::Const(n, _) => n.is_str(PLACEHOLDER),
      ExprKind::Sort(l) => *l == Level::Placeholder,
      _ => false,
    }
  }

  /// Recognize a binary numeral, returning its value.
  #[must_use]
  pub fn to_num(&self) -> Option<BigUint> {
    fn pos(e: &Expr) -> Option<BigUint> {
      if e.is_const_named("pos_num.one") { return Some(BigUint::from(1u32)) }
      let (f, a) = e.app_parts()?;
      let n = pos(a)? << 1u32;
      if f.is_const_named("pos_num.bit0") { Some(n) }
      else if f.is_const_named("pos_num.bit1") { Some(n + 1u32) }
      else { None }
    }
    if self.is_const_named("num.zero") { return Some(BigUint::default()) }
    let (f, a) = self.app_parts()?;
    if f.is_const_named("num.pos") { pos(a) } else { None }
  }

  /// Rewrite top-down. `f` receives each subterm and the number of binders
  /// above it; returning `Some` replaces the subterm without visiting its
  /// children. Unchanged subterms are shared with the input.
  pub fn replace(&self, f: &mut impl FnMut(&Expr, u32) -> Option<Expr>) -> Expr {
    self.replace_core(0, f)
  }

  fn replace_core<F: FnMut(&Expr, u32) -> Option<Expr>>(&self, off: u32, f: &mut F) -> Expr {
    if let Some(e) = f(self, off) { return e }
    match &**self {
      ExprKind::App(g, a) => {
        let (g2, a2) = (g.replace_core(off, f), a.replace_core(off, f));
        if g2.ptr_eq(g) && a2.ptr_eq(a) { self.clone() } else { Expr::app(g2, a2) }
      }
      ExprKind::Lambda(b, e) | ExprKind::Pi(b, e) => {
        let ty = b.ty.replace_core(off, f);
        let e2 = e.replace_core(off + 1, f);
        if ty.ptr_eq(&b.ty) && e2.ptr_eq(e) { return self.clone() }
        let b = Binder { name: b.name.clone(), ty, info: b.info };
        Expr::new(if self.is_lambda() { ExprKind::Lambda(b, e2) } else { ExprKind::Pi(b, e2) })
      }
      ExprKind::Macro(d, args) => {
        let args2 = args.iter().map(|a| a.replace_core(off, f)).collect::<Vec<_>>();
        if args2.iter().zip(args).all(|(a2, a)| a2.ptr_eq(a)) { self.clone() }
        else { Expr::mk_macro(d.clone(), args2) }
      }
      _ => self.clone(),
    }
  }

  /// True if `f` holds for some subterm, visiting binder types and macro
  /// arguments but not the types of metavariables and locals.
  pub fn any(&self, f: &mut impl FnMut(&Expr) -> bool) -> bool {
    if f(self) { return true }
    match &**self {
      ExprKind::App(g, a) => g.any(f) || a.any(f),
      ExprKind::Lambda(b, e) | ExprKind::Pi(b, e) => b.ty.any(f) || e.any(f),
      ExprKind::Macro(_, args) => args.iter().any(|a| a.any(f)),
      _ => false,
    }
  }

  /// Replace the loose bound variable `#0` by `s`, lowering the others.
  #[must_use]
  pub fn instantiate(&self, s: &Expr) -> Expr {
    if self.closed() { return self.clone() }
    self.replace(&mut |e, off| {
      if e.loose_bvar_range() <= off { return Some(e.clone()) }
      match **e {
        ExprKind::Var(i) if i == off => Some(s.lift_loose_bvars(0, off)),
        ExprKind::Var(i) => Some(Expr::var(i - 1)),
        _ => None,
      }
    })
  }

  /// Add `d` to every loose bound variable `#i` with `i >= s`.
  #[must_use]
  pub fn lift_loose_bvars(&self, s: u32, d: u32) -> Expr {
    if d == 0 || self.loose_bvar_range() <= s { return self.clone() }
    self.replace(&mut |e, off| {
      if e.loose_bvar_range() <= s + off { return Some(e.clone()) }
      if let ExprKind::Var(i) = **e { Some(Expr::var(i + d)) } else { None }
    })
  }

  /// Subtract `d` from every loose bound variable `#i` with `i >= s`.
  /// The variables `s - d .. s` must not occur.
  #[must_use]
  pub fn lower_loose_bvars(&self, s: u32, d: u32) -> Expr {
    if d == 0 || self.loose_bvar_range() <= s { return self.clone() }
    self.replace(&mut |e, off| {
      if e.loose_bvar_range() <= s + off { return Some(e.clone()) }
      if let ExprKind::Var(i) = **e { Some(Expr::var(i - d)) } else { None }
    })
  }

  /// True if the loose bound variable `#i` occurs.
  #[must_use]
  pub fn has_loose_bvar(&self, i: u32) -> bool {
    if self.loose_bvar_range() <= i { return false }
    match &**self {
      ExprKind::Var(j) => *j == i,
      ExprKind::App(f, a) => f.has_loose_bvar(i) || a.has_loose_bvar(i),
      ExprKind::Lambda(b, e) | ExprKind::Pi(b, e) =>
        b.ty.has_loose_bvar(i) || e.has_loose_bvar(i + 1),
      ExprKind::Macro(_, args) => args.iter().any(|a| a.has_loose_bvar(i)),
      _ => false,
    }
  }

  /// Replace every occurrence of the closed term `v` by a bound variable,
  /// producing the body of a binder for `v`.
  #[must_use]
  pub fn abstract_expr(&self, v: &Expr) -> Expr {
    let body = self.lift_loose_bvars(0, 1);
    body.replace(&mut |e, off| if e == v { Some(Expr::var(off)) } else { None })
  }

  /// Replace the local constant with id `id` by a bound variable.
  #[must_use]
  pub fn abstract_local(&self, id: &Name) -> Expr {
    let body = self.lift_loose_bvars(0, 1);
    body.replace(&mut |e, off| match &**e {
      _ if !e.has_local() => Some(e.clone()),
      ExprKind::Local(l) if l.id == *id => Some(Expr::var(off)),
      _ => None,
    })
  }

  /// True if `n` occurs as a constant name or as the display name of a local.
  #[must_use]
  pub fn has_name(&self, n: &Name) -> bool {
    self.any(&mut |e| match &**e {
      ExprKind::Const(c, _) => c == n,
      ExprKind::Local(l) => l.pp_name == *n,
      _ => false,
    })
  }

  /// Contract the beta redexes at the head of the application spine.
  #[must_use]
  pub fn head_beta(&self) -> Expr {
    let (f, args) = self.get_app_args();
    if !f.is_lambda() { return self.clone() }
    let mut f = f.clone();
    let mut rest = &*args;
    while let (ExprKind::Lambda(_, body), Some((a, rest2))) = (&*f, rest.split_first()) {
      f = body.instantiate(a);
      rest = rest2;
    }
    let e = Expr::mk_app(f, rest.iter().cloned());
    if e.is_app() && e.get_app_fn().is_lambda() { e.head_beta() } else { e }
  }

  /// Contract every beta redex.
  #[must_use]
  pub fn beta_reduce(&self) -> Expr {
    self.replace(&mut |e, _| {
      if e.is_app() && e.get_app_fn().is_lambda() { Some(e.head_beta().beta_reduce()) } else { None }
    })
  }

  /// Substitute levels for the universe parameters `ps`.
  #[must_use]
  pub fn instantiate_univ_params(&self, ps: &[Name], ls: &[Level]) -> Expr {
    if !self.has_param() { return self.clone() }
    self.replace(&mut |e, _| match &**e {
      _ if !e.has_param() => Some(e.clone()),
      ExprKind::Sort(l) => Some(Expr::sort(l.instantiate(ps, ls))),
      ExprKind::Const(n, lvls) =>
        Some(Expr::constant(n.clone(), lvls.iter().map(|l| l.instantiate(ps, ls)).collect())),
      _ => None,
    })
  }
}
