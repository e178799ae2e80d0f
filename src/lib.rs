//! A notation-aware pretty printer for the terms of a dependently typed
//! calculus with universes, metavariables, local constants and macros.
//!
//! The entry point is [`PrettyPrinter`], which is constructed from an
//! [`Environment`] (declarations, aliases, coercions and notations), a
//! [`TypeChecker`] used to discover implicit arguments, and a set of
//! [`Options`]:
//!
//! ```
//! use std::sync::Arc;
//! use dtt_pp::{BasicChecker, Environment, Expr, Options, PrettyPrinter};
//!
//! let env = Environment::new(true);
//! let tc = BasicChecker::new(&env);
//! let pp = PrettyPrinter::new(&env, &tc, Arc::new(Options::default()));
//! assert_eq!(pp.pp(&Expr::prop(), 80).to_string(), "Prop");
//! ```

// rust lints we want
#![warn(bare_trait_objects, elided_lifetimes_in_paths,
  missing_copy_implementations, missing_debug_implementations, future_incompatible,
  rust_2018_idioms, trivial_numeric_casts, variant_size_differences, unreachable_pub,
  unused, missing_docs)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(clippy::get_unwrap, clippy::rc_buffer, clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add, clippy::unwrap_used)]
// all the clippy lints we don't want
#![allow(clippy::cognitive_complexity, clippy::comparison_chain,
  clippy::default_trait_access, clippy::enum_glob_use, clippy::inline_always,
  clippy::manual_map, clippy::missing_const_for_fn, clippy::missing_errors_doc,
  clippy::missing_panics_doc, clippy::module_name_repetitions, clippy::multiple_crate_versions,
  clippy::option_if_let_else, clippy::redundant_pub_crate, clippy::semicolon_if_nothing_returned,
  clippy::shadow_unrelated, clippy::too_many_lines, clippy::use_self)]

#[macro_use] extern crate if_chain;

pub mod level;
pub mod expr;
pub mod notation;
pub mod environment;
pub mod typeck;
pub mod options;
pub mod pp;

pub use dtt_util::Name;
pub use environment::{CoercionInfo, Declaration, Environment, Redeclaration};
pub use expr::{Annotation, Binder, BinderInfo, BinderKind, Expr, ExprKind, HeadIndex, Local, MacroDef};
pub use level::Level;
pub use notation::{Action, NotationEntry, NotationKind, Transition};
pub use options::{OptionError, OptionValue, Options};
pub use pp::{FormatEnv, PPExpr, PrettyPrinter};
pub use typeck::{BasicChecker, TcError, TypeChecker};
