//! Printer options.
use std::fmt;

/// The value of an option.
#[allow(variant_size_differences)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
  /// A flag.
  Bool(bool),
  /// A natural number.
  Nat(u32),
}

impl OptionValue {
  fn as_bool(self) -> Option<bool> { if let OptionValue::Bool(b) = self { Some(b) } else { None } }
  fn as_nat(self) -> Option<u32> { if let OptionValue::Nat(n) = self { Some(n) } else { None } }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(b) => write!(f, "{b}"),
      OptionValue::Nat(n) => write!(f, "{n}"),
    }
  }
}

/// An error setting an option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionError {
  /// No option by this name.
  Unknown(String),
  /// The value has the wrong type.
  TypeMismatch {
    /// The option name.
    name: String,
    /// The expected type, `bool` or `nat`.
    expected: &'static str,
  },
}

impl fmt::Display for OptionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionError::Unknown(n) => write!(f, "unknown option '{n}'"),
      OptionError::TypeMismatch { name, expected } =>
        write!(f, "option '{name}' expects a value of type {expected}"),
    }
  }
}

impl std::error::Error for OptionError {}

macro_rules! make_options {
  (@ty bool) => {bool};
  (@ty nat) => {u32};
  (@get bool, $v:expr) => {$v.as_bool()};
  (@get nat, $v:expr) => {$v.as_nat()};
  (@wrap bool, $v:expr) => {OptionValue::Bool($v)};
  (@wrap nat, $v:expr) => {OptionValue::Nat($v)};
  {$($(#[$attr:meta])* $x:ident: $name:literal $ty:ident = $default:expr,)*} => {
    /// The options controlling the printer. Each field is settable by name
    /// through [`Options::set`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Options {
      $($(#[$attr])* pub $x: make_options!(@ty $ty),)*
    }

    impl Default for Options {
      fn default() -> Self { Self { $($x: $default,)* } }
    }

    impl Options {
      /// Set an option by name.
      pub fn set(&mut self, name: &str, v: OptionValue) -> Result<(), OptionError> {
        match name {
          $($name => self.$x = make_options!(@get $ty, v).ok_or_else(|| OptionError::TypeMismatch {
            name: name.to_owned(), expected: stringify!($ty)
          })?,)*
          _ => return Err(OptionError::Unknown(name.to_owned())),
        }
        Ok(())
      }

      /// Get an option by name.
      #[must_use]
      pub fn get(&self, name: &str) -> Option<OptionValue> {
        match name {
          $($name => Some(make_options!(@wrap $ty, self.$x)),)*
          _ => None,
        }
      }

      /// Map a function over the option names and default values.
      pub fn on_options(mut f: impl FnMut(&str, OptionValue)) {
        $(f($name, make_options!(@wrap $ty, $default));)*
      }
    }
  }
}

make_options! {
  /// Indentation of nested lines.
  indent: "pp.indent" nat = 2,
  /// Subterms deeper than this are printed as an ellipsis.
  max_depth: "pp.max_depth" nat = 1000,
  /// After this many subterms, the rest are printed as ellipses.
  max_steps: "pp.max_steps" nat = 1_000_000,
  /// Show implicit arguments.
  implicit: "pp.implicit" bool = false,
  /// Use unicode symbols.
  unicode: "pp.unicode" bool = true,
  /// Show coercion functions.
  coercions: "pp.coercions" bool = false,
  /// Use notations.
  notation: "pp.notation" bool = true,
  /// Show universe levels.
  universes: "pp.universes" bool = false,
  /// Show full names, ignoring aliases and open namespaces.
  full_names: "pp.full_names" bool = false,
  /// Show the hidden names of private declarations.
  private_names: "pp.private_names" bool = false,
  /// Show the arguments of applied metavariables.
  metavar_args: "pp.metavar_args" bool = false,
  /// Beta reduce before printing.
  beta: "pp.beta" bool = false,
}
