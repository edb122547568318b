//! Macro for enums that travel on the wire as lowercase words
//!
//! Generates `as_str`, `Display` and a case-insensitive `FromStr` that fails
//! with [`SamplifyError::Validation`](crate::SamplifyError::Validation).
//!
//! # Example
//!
//! ```rust
//! use samplify_domain::impl_wire_name;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Direction {
//!     Up,
//!     Down,
//! }
//!
//! impl_wire_name!(Direction {
//!     Up => "up",
//!     Down => "down",
//! });
//!
//! assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
//! assert_eq!(Direction::Down.to_string(), "down");
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
#[macro_export]
macro_rules! impl_wire_name {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::SamplifyError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::SamplifyError::Validation(format!(
                        "invalid {}: '{}'",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
