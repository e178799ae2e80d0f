mod common;

use std::sync::Arc;
use common::*;
use dtt_pp::*;

#[test]
fn sorts() {
  let env = fixture();
  assert_eq!(show(&env, &Expr::prop()), "Prop");
  assert_eq!(show(&env, &ty()), "Type");
  assert_eq!(show_with(&env, opts(|o| o.universes = true), &ty(), 80), "Type.{1}");
  let pred = Environment::new(false);
  assert_eq!(show(&pred, &Expr::prop()), "Type");
}

#[test]
fn constants() {
  let mut env = fixture();
  let u = Level::param("u");
  let e = Expr::constant("ulift", vec![u.clone(), Level::max(u, Level::param("v"))]);
  assert_eq!(show(&env, &e), "ulift");
  assert_eq!(show_with(&env, opts(|o| o.universes = true), &e, 80), "ulift.{u (max u v)}");

  env.open_namespace("nat");
  let e = app("nat.succ", [c("a")]);
  assert_eq!(show(&env, &e), "succ a");
  assert_eq!(show_with(&env, opts(|o| o.full_names = true), &e, 80), "nat.succ a");

  env.add_decl(Declaration::axiom("_private.7.secret", vec![], nat())).unwrap();
  env.add_private("_private.7.secret", "secret").unwrap();
  let e = c("_private.7.secret");
  assert_eq!(show(&env, &e), "secret");
  assert_eq!(show_with(&env, opts(|o| o.private_names = true), &e, 80), "_private.7.secret");

  env.add_alias("int.of_nat", "of_nat").unwrap();
  let e = app("int.of_nat", [c("a")]);
  assert_eq!(show_with(&env, opts(|o| o.coercions = true), &e, 80), "of_nat a");
}

#[test]
fn applications() {
  let env = fixture();
  assert_eq!(show(&env, &app("h", [app("f", [c("a")]), c("b")])), "h (f a) b");
  assert_eq!(show(&env, &app("f", [app("g", [app("f", [c("a")])])])), "f (g (f a))");
  assert_eq!(show(&env, &Expr::var(3)), "#3");
  assert_eq!(show(&env, &Expr::placeholder()), "_");
}

#[test]
fn line_breaking() {
  let env = fixture();
  let e = app("h", [app("f", [c("a")]), app("f", [c("b")])]);
  assert_eq!(show_with(&env, Options::default(), &e, 10), "h (f a)\n  (f b)");
  assert_eq!(show_with(&env, opts(|o| o.indent = 4), &e, 10), "h (f a)\n    (f b)");
}

#[test]
fn implicit_arguments() {
  let env = fixture();
  let e = app("id", [nat(), c("a")]);
  assert_eq!(show(&env, &e), "id a");
  assert_eq!(show_with(&env, opts(|o| o.implicit = true), &e, 80), "@id nat a");
  let e = Expr::mk_app(Expr::explicit(c("id")), [nat(), c("a")]);
  assert_eq!(show(&env, &e), "@id nat a");
}

#[test]
fn coercions() {
  let env = fixture();
  let e = app("int.of_nat", [c("a")]);
  assert_eq!(show(&env, &e), "a");
  assert_eq!(show_with(&env, opts(|o| o.coercions = true), &e, 80), "int.of_nat a");
  let e = app("fn_coe", [c("F"), c("b")]);
  assert_eq!(show(&env, &e), "F b");
  assert_eq!(show(&env, &app("f", [e])), "f (F b)");
}

#[test]
fn coercion_parameters() {
  let env = fixture();
  let e = app("coe", [nat(), c("a")]);
  assert_eq!(show(&env, &e), "a");
  assert_eq!(show(&env, &app("f", [e.clone()])), "f a");
  assert_eq!(show_with(&env, opts(|o| o.coercions = true), &e, 80), "coe nat a");
  let e = app("coe", [nat()]);
  assert_eq!(show(&env, &e), "coe nat");
}

#[test]
fn coercions_with_implicit_arguments() {
  let env = fixture();
  let e = app("poly_coe", [c("F"), nat(), c("b")]);
  assert_eq!(show(&env, &e), "F b");
  assert_eq!(show(&env, &app("f", [e.clone()])), "f (F b)");
  assert_eq!(show_with(&env, opts(|o| o.implicit = true), &e, 80), "@F nat b");
  assert_eq!(show_with(&env, opts(|o| o.coercions = true), &e, 80), "poly_coe F b");
}

#[test]
fn numerals() {
  let env = fixture();
  assert_eq!(show(&env, &Expr::num(&5u32.into())), "5");
  assert_eq!(show(&env, &Expr::num(&0u32.into())), "0");
  assert_eq!(show(&env, &app("f", [Expr::num(&12u32.into())])), "f 12");
}

#[test]
fn binders() {
  let env = fixture();
  let lam = |n: &str, info, body| Expr::lambda(n, nat(), body, info);
  let d = BinderInfo::DEFAULT;
  let e = lam("x", d, lam("y", d, Expr::var(1)));
  assert_eq!(show(&env, &e), "λ (x y : nat), x");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &e, 80), "fun (x y : nat), x");
  let e = lam("x", d, lam("y", BinderInfo::IMPLICIT, Expr::var(1)));
  assert_eq!(show(&env, &e), "λ (x : nat) {y : nat}, x");
  let e = lam("x", BinderInfo::INST_IMPLICIT, Expr::var(0));
  assert_eq!(show(&env, &e), "λ [x : nat], x");
  let e = lam("x", BinderInfo::STRICT_IMPLICIT, Expr::var(0));
  assert_eq!(show(&env, &e), "λ ⦃x : nat⦄, x");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &e, 80), "fun {{x : nat}}, x");
}

#[test]
fn fresh_binder_names() {
  let env = fixture();
  let d = BinderInfo::DEFAULT;
  let e = Expr::lambda("a", nat(), app("h", [Expr::var(0), c("a")]), d);
  assert_eq!(show(&env, &e), "λ (a_1 : nat), h a_1 a");
  let e = Expr::lambda("x", nat(), Expr::lambda("x", nat(), app("h", [Expr::var(1), Expr::var(0)]), d), d);
  assert_eq!(show(&env, &e), "λ (x x_1 : nat), h x x_1");
  let e = Expr::lambda("_x", nat(), app("f", [Expr::var(0)]), d);
  assert_eq!(show(&env, &e), "λ (a : nat), f a");
  let e = Expr::lambda(Name::anonymous(), nat(), app("h", [Expr::var(0), c("a")]), d);
  assert_eq!(show(&env, &e), "λ (a_1 : nat), h a_1 a");
}

#[test]
fn pis_and_arrows() {
  let env = fixture();
  let nn = Expr::arrow(nat(), &nat());
  assert_eq!(show(&env, &Expr::arrow(nat(), &nn)), "nat → nat → nat");
  assert_eq!(show(&env, &Expr::arrow(nn.clone(), &nat())), "(nat → nat) → nat");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &nn, 80), "nat -> nat");
  let all = Expr::pi("x", nat(), app("eq", [Expr::var(0), Expr::var(0)]), BinderInfo::DEFAULT);
  assert_eq!(show(&env, &all), "∀ (x : nat), eq x x");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &all, 80), "forall (x : nat), eq x x");
  let id_ty = Expr::pi("A", ty(), Expr::arrow(Expr::var(0), &Expr::var(0)), BinderInfo::IMPLICIT);
  assert_eq!(show(&env, &id_ty), "Π {A : Type}, A → A");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &id_ty, 80), "Pi {A : Type}, A -> A");
  let lam = Expr::lambda("x", nat(), Expr::var(0), BinderInfo::DEFAULT);
  assert_eq!(show(&env, &Expr::arrow(nat(), &lam)), "nat → (λ (x : nat), x)");
}

#[test]
fn beta() {
  let env = fixture();
  let lam = Expr::lambda("x", nat(), app("f", [Expr::var(0)]), BinderInfo::DEFAULT);
  let e = Expr::app(lam, c("a"));
  assert_eq!(show(&env, &e), "(λ (x : nat), f x) a");
  assert_eq!(show_with(&env, opts(|o| o.beta = true), &e, 80), "f a");
}

#[test]
fn lets() {
  let env = fixture();
  let fa = app("f", [c("a")]);
  let ga = app("g", [c("a")]);
  let e = Expr::mk_let("x", fa.clone(), Expr::mk_let("y", ga.clone(),
    app("h", [fa.clone(), c("c")])));
  assert_eq!(show(&env, &e), "let x := f a in h x c");
  let e = Expr::mk_let("x", fa.clone(), Expr::mk_let("y", ga.clone(),
    app("h", [fa.clone(), ga.clone()])));
  assert_eq!(show(&env, &e), "let x := f a, y := g a in h x y");
  let e = Expr::mk_let("x", fa.clone(), c("b"));
  assert_eq!(show(&env, &e), "b");
  let e = Expr::mk_let("y", ga.clone(), Expr::mk_let("x", fa.clone(), app("h", [fa.clone(), c("c")])));
  assert_eq!(show(&env, &e), "let x := f a in h x c");
}

#[test]
fn let_names_are_bound() {
  let mut env = fixture();
  let fa = app("f", [c("a")]);
  let e = Expr::mk_let("zero", fa.clone(), app("h", [fa.clone(), fa.clone()]));
  assert_eq!(show(&env, &e), "let zero := f a in h zero zero");
  env.add_alias("y", "q").unwrap();
  let e = Expr::mk_let("y", fa.clone(), app("h", [fa.clone(), c("b")]));
  assert_eq!(show(&env, &e), "let y := f a in h y b");
  let e = Expr::mk_let("a", fa.clone(), app("h", [fa.clone(), c("a")]));
  assert_eq!(show(&env, &e), "let a_1 := f a in h a_1 a");
}

#[test]
fn have_and_show() {
  let env = fixture();
  let eq_aa = app("eq", [c("a"), c("a")]);
  let proof = app("refl", [c("a")]);
  let e = Expr::have("h", eq_aa.clone(), proof.clone(), Expr::var(0), BinderInfo::DEFAULT);
  assert_eq!(show(&env, &e), "have h : eq a a, from refl a, h");
  let vis = BinderInfo { contextual: true, ..BinderInfo::DEFAULT };
  let e = Expr::have("h", eq_aa.clone(), proof.clone(), Expr::var(0), vis);
  assert_eq!(show(&env, &e), "have h [visible] : eq a a, from refl a, h");
  assert_eq!(show(&env, &Expr::show(eq_aa, proof)), "show eq a a, from refl a");
}

#[test]
fn macros() {
  let env = fixture();
  assert_eq!(show(&env, &Expr::typed_expr(nat(), c("a"))), "a");
  assert_eq!(show(&env, &Expr::let_value(c("b"))), "b");
  let e = Expr::mk_macro(MacroDef::Other("sorry_macro".into()), vec![c("a"), app("f", [c("b")])]);
  assert_eq!(show(&env, &e), "[sorry_macro a (f b)]");
  assert_eq!(show(&env, &Expr::explicit(c("id"))), "@id");
}

#[test]
fn metavariables_and_locals() {
  let env = fixture();
  let m1 = Expr::meta("_elab.17", Expr::placeholder());
  let m2 = Expr::meta("_elab.4", nat());
  let e = Expr::mk_app(m1.clone(), [m2, m1, x("_l.1", "x"), x("_l.2", "x")]);
  assert_eq!(show_with(&env, opts(|o| o.metavar_args = true), &e, 80), "?M_1 ?M_2 ?M_1 x x_1");
  assert_eq!(show(&env, &e), "?M_1");
  let e = app("h", [x("_l.2", "x"), x("_l.1", "x")]);
  assert_eq!(show(&env, &e), "h x x_1");
}

#[test]
fn depth_and_steps() {
  let env = fixture();
  let e = (0..5).fold(c("a"), |e, _| Expr::app(c("f"), e));
  assert_eq!(show_with(&env, opts(|o| o.max_depth = 3), &e, 80), "f (f (f (… …)))");
  assert_eq!(show_with(&env, opts(|o| { o.max_depth = 3; o.unicode = false }), &e, 80),
    "f (f (f (... ...)))");
  let e = app("h", [c("a"), c("b")]);
  assert_eq!(show_with(&env, opts(|o| o.max_steps = 0), &e, 80), "… …");
  let deep = (0..100).fold(c("a"), |e, _| Expr::app(c("f"), e));
  assert!(show_with(&env, opts(|o| o.max_depth = 10), &deep, 80).contains('…'));
}

#[test]
fn set_options() {
  let env = fixture();
  let tc = BasicChecker::new(&env);
  let o1 = Arc::new(Options::default());
  let mut pp = PrettyPrinter::new(&env, &tc, o1.clone());
  let nn = Expr::arrow(nat(), &nat());
  assert_eq!(pp.pp(&nn, 80).to_string(), "nat → nat");
  pp.set_options(&o1);
  assert!(Arc::ptr_eq(pp.options(), &o1));
  let o2 = Arc::new(opts(|o| o.unicode = false));
  pp.set_options(&o2);
  assert!(Arc::ptr_eq(pp.options(), &o2));
  assert_eq!(pp.pp(&nn, 80).to_string(), "nat -> nat");
  assert!(format!("{pp:?}").starts_with("PrettyPrinter { cfg: Config"));
  assert!(format!("{:?}", pp.pp(&nn, 80)).starts_with("PPExpr"));
}
