mod common;

use common::*;
use dtt_pp::*;

fn pow(a: Expr, b: Expr) -> Expr { app("pow", [a, b]) }

#[test]
fn infix() {
  let env = fixture();
  let e = plus(c("a"), c("b"));
  assert_eq!(show(&env, &e), "a + b");
  assert_eq!(show_with(&env, opts(|o| o.notation = false), &e, 80), "add a b");
  assert_eq!(show_with(&env, opts(|o| { o.notation = false; o.implicit = true }), &e, 80),
    "@add nat nat_has_add a b");
  assert_eq!(show_with(&env, opts(|o| o.implicit = true), &e, 80), "a + b");
}

#[test]
fn associativity() {
  let env = fixture();
  let (a, b, cc) = (c("a"), c("b"), c("c"));
  assert_eq!(show(&env, &plus(plus(a.clone(), b.clone()), cc.clone())), "a + b + c");
  assert_eq!(show(&env, &plus(a.clone(), plus(b.clone(), cc.clone()))), "a + (b + c)");
  assert_eq!(show(&env, &pow(a.clone(), pow(b.clone(), cc.clone()))), "a ^ b ^ c");
  assert_eq!(show(&env, &pow(pow(a.clone(), b.clone()), cc.clone())), "(a ^ b) ^ c");
}

#[test]
fn precedence() {
  let env = fixture();
  let (a, b, cc) = (c("a"), c("b"), c("c"));
  assert_eq!(show(&env, &plus(pow(a.clone(), b.clone()), cc.clone())), "a ^ b + c");
  assert_eq!(show(&env, &pow(plus(a.clone(), b.clone()), cc.clone())), "(a + b) ^ c");
  assert_eq!(show(&env, &plus(app("f", [a.clone()]), b.clone())), "f a + b");
  assert_eq!(show(&env, &app("f", [plus(a.clone(), b.clone())])), "f (a + b)");
  let lam = Expr::lambda("x", nat(), plus(Expr::var(0), b.clone()), BinderInfo::DEFAULT);
  assert_eq!(show(&env, &lam), "λ (x : nat), x + b");
  assert_eq!(show(&env, &plus(a.clone(), lam)), "a + (λ (x : nat), x + b)");
}

#[test]
fn breaks_inside_arguments() {
  let env = fixture();
  let e = plus(app("h", [app("f", [c("a")]), app("f", [c("b")])]), c("c"));
  assert_eq!(show_with(&env, Options::default(), &e, 10), "h (f a)\n  (f b) + c");
  assert_eq!(show_with(&env, Options::default(), &e, 80), "h (f a) (f b) + c");
}

#[test]
fn notation_children_hide_coercions() {
  let env = fixture();
  let e = plus(app("int.of_nat", [c("a")]), c("b"));
  assert_eq!(show(&env, &e), "a + b");
  assert_eq!(show_with(&env, opts(|o| o.coercions = true), &e, 80), "int.of_nat a + b");
}

#[test]
fn prefix_and_ascii() {
  let env = fixture();
  let e = app("not", [app("eq", [c("a"), c("b")])]);
  assert_eq!(show(&env, &e), "¬ eq a b");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &e, 80), "not (eq a b)");
  let e = plus(c("a"), c("b"));
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &e, 80), "a + b");
}

#[test]
fn numeral_notation() {
  let env = fixture();
  assert_eq!(show(&env, &c("zero")), "0");
  assert_eq!(show(&env, &app("f", [c("zero")])), "f 0");
  assert_eq!(show_with(&env, opts(|o| o.notation = false), &c("zero"), 80), "zero");
}

#[test]
fn partial_applications_fall_back() {
  let env = fixture();
  let e = app("add", [nat(), c("nat_has_add"), c("a")]);
  assert_eq!(show(&env, &e), "add a");
  let e = app("pow", [c("a")]);
  assert_eq!(show(&env, &e), "pow a");
}

#[test]
fn most_recent_notation_wins() {
  let mut env = fixture();
  env.add_notation(NotationEntry::infixl("⊕", 65, c("add")));
  let e = plus(c("a"), c("b"));
  assert_eq!(show(&env, &e), "a ⊕ b");
  assert_eq!(show_with(&env, opts(|o| o.unicode = false), &e, 80), "a + b");
}

#[test]
fn repeated_pattern_variables() {
  let mut env = fixture();
  let twice = Expr::mk_app(c("h"), [Expr::var(0), Expr::var(0)]);
  env.add_notation(NotationEntry::new(NotationKind::Led,
    vec![Transition::new("²", Action::Skip)], twice));
  env.add_token("²", 1000);
  assert_eq!(show(&env, &app("h", [c("a"), c("a")])), "a ²");
  assert_eq!(show(&env, &app("h", [c("a"), c("b")])), "h a b");
}
