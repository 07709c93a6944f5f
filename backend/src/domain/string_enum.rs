//! Helper macro for closed sets of string-backed domain values.
//!
//! Database columns and JSON payloads store these values as snake_case text;
//! the macro keeps `Display`, `FromStr` and serde naming in one place.

/// Error returned when text does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    /// Construct a parse error for the given value kind.
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Human-readable name of the value kind, such as `event type`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Rejected input.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

macro_rules! string_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($kind:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable text form stored in the database and JSON payloads.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::ParseEnumError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    _ => Err($crate::domain::ParseEnumError::new($kind, value)),
                }
            }
        }
    };
}

pub(crate) use string_enum;
