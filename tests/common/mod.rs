#![allow(dead_code)]

use std::sync::Arc;
use dtt_pp::*;

pub fn c(s: &str) -> Expr { Expr::constant(s, vec![]) }
pub fn nat() -> Expr { c("nat") }
pub fn ty() -> Expr { Expr::sort(Level::of_nat(1)) }
pub fn app<const N: usize>(f: &str, args: [Expr; N]) -> Expr { Expr::mk_app(c(f), args) }
pub fn x(id: &str, name: &str) -> Expr { Expr::local(id, name, nat(), BinderInfo::DEFAULT) }

fn axiom(env: &mut Environment, n: &str, ty: Expr) {
  env.add_decl(Declaration::axiom(n, vec![], ty)).unwrap();
}

/// A small arithmetic library:
///
/// * `nat`, `int`, `fnlike : Type`, `a b c zero : nat`, `F : fnlike`
/// * `f g succ : nat → nat`, `h pow : nat → nat → nat`
/// * `eq : nat → nat → Prop`, `refl : Π x, eq x x`, `not : Prop → Prop`
/// * `id : Π {A : Type}, A → A`
/// * `add : Π {A : Type} [inst : has_add A], A → A → A` with `nat_has_add`
/// * coercions `int.of_nat : nat → int` and `fn_coe : fnlike → nat → nat`,
///   `coe : Π (A : Type), A → int` taking one parameter, and
///   `poly_coe : fnlike → Π {A : Type}, A → A`
/// * notations `+` (infixl 65), `^` (infixr 75), `¬` (prefix 40), `0`
pub fn fixture() -> Environment {
  let mut env = Environment::new(true);
  let nn = Expr::arrow(nat(), &nat());
  let nnn = Expr::arrow(nat(), &nn);
  for n in ["nat", "int", "fnlike"] { axiom(&mut env, n, ty()) }
  for n in ["a", "b", "c", "zero"] { axiom(&mut env, n, nat()) }
  axiom(&mut env, "F", c("fnlike"));
  for n in ["f", "g", "nat.succ"] { axiom(&mut env, n, nn.clone()) }
  for n in ["h", "pow"] { axiom(&mut env, n, nnn.clone()) }
  axiom(&mut env, "eq", Expr::arrow(nat(), &Expr::arrow(nat(), &Expr::prop())));
  axiom(&mut env, "refl", Expr::pi("x", nat(), app("eq", [Expr::var(0), Expr::var(0)]),
    BinderInfo::DEFAULT));
  axiom(&mut env, "not", Expr::arrow(Expr::prop(), &Expr::prop()));
  env.add_decl(Declaration::definition("id", vec![],
    Expr::pi("A", ty(), Expr::arrow(Expr::var(0), &Expr::var(0)), BinderInfo::IMPLICIT),
    Expr::lambda("A", ty(), Expr::lambda("x", Expr::var(0), Expr::var(0), BinderInfo::DEFAULT),
      BinderInfo::IMPLICIT))).unwrap();
  axiom(&mut env, "has_add", Expr::arrow(ty(), &ty()));
  let a3 = Expr::arrow(Expr::var(1), &Expr::arrow(Expr::var(1), &Expr::var(1)));
  axiom(&mut env, "add", Expr::pi("A", ty(),
    Expr::pi("inst", Expr::app(c("has_add"), Expr::var(0)), a3, BinderInfo::INST_IMPLICIT),
    BinderInfo::IMPLICIT));
  axiom(&mut env, "nat_has_add", Expr::app(c("has_add"), nat()));
  axiom(&mut env, "int.of_nat", Expr::arrow(nat(), &c("int")));
  env.add_coercion("int.of_nat", CoercionInfo { target: "int".into(), arity: 0 }).unwrap();
  axiom(&mut env, "fn_coe", Expr::arrow(c("fnlike"), &nn));
  env.add_coercion("fn_coe", CoercionInfo { target: "fn".into(), arity: 0 }).unwrap();
  axiom(&mut env, "coe", Expr::pi("A", ty(), Expr::arrow(Expr::var(0), &c("int")),
    BinderInfo::DEFAULT));
  env.add_coercion("coe", CoercionInfo { target: "int".into(), arity: 1 }).unwrap();
  let poly = Expr::pi("A", ty(), Expr::arrow(Expr::var(0), &Expr::var(0)), BinderInfo::IMPLICIT);
  axiom(&mut env, "poly_coe", Expr::arrow(c("fnlike"), &poly));
  env.add_coercion("poly_coe", CoercionInfo { target: "fn".into(), arity: 0 }).unwrap();
  env.add_notation(NotationEntry::infixl("+", 65, c("add")));
  env.add_token("+", 65);
  env.add_notation(NotationEntry::infixr("^", 75, c("pow")));
  env.add_token("^", 75);
  env.add_notation(NotationEntry::prefix("¬", 40, c("not")));
  env.add_token("¬", 40);
  env.add_notation(NotationEntry::numeral(0u32.into(), c("zero")));
  env
}

/// `a + b` at type `nat`, with its implicit arguments.
pub fn plus(a: Expr, b: Expr) -> Expr { app("add", [nat(), c("nat_has_add"), a, b]) }

pub fn show_with(env: &Environment, opts: Options, e: &Expr, width: usize) -> String {
  let tc = BasicChecker::new(env);
  let pp = PrettyPrinter::new(env, &tc, Arc::new(opts));
  pp.pp(e, width).to_string()
}

pub fn show(env: &Environment, e: &Expr) -> String { show_with(env, Options::default(), e, 80) }

pub fn opts(f: impl FnOnce(&mut Options)) -> Options {
  let mut o = Options::default();
  f(&mut o);
  o
}
