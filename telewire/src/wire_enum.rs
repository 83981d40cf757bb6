//!
//! Bidirectional tables between enum constants and their wire tokens.
//!
//! Each enum gets one [`EnumTable`], built lazily on first use from all its
//! constants and immutable afterwards. Tokens are the snake_case names of the
//! constants unless overridden with `#[strum(serialize = "...")]`, which is
//! needed for emoji glyphs and irregular tokens such as `"HTML"`.
//!
//! The zero constant (the `Default` one) is a placeholder for values this
//! library doesn't know about:
//!  - decoding an unknown token always yields it, so that new values added
//!    server-side never break decoding
//!  - encoding it (or any constant without a token) is governed by the
//!    per-enum [`UnknownWrite`] policy
//!
//! ## Example
//! ```
//! # use telewire::{ChatType, WireEnum};
//! assert_eq!(ChatType::from_token("supergroup"), ChatType::Supergroup);
//! assert_eq!(ChatType::from_token("not_yet_invented"), ChatType::Unknown);
//! assert!(ChatType::Unknown.to_token().is_err());
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{de, ser, Deserializer, Serializer};
use snafu::Snafu;
use strum::IntoEnumIterator;
use tracing::{debug, warn};


/// Token written for constants without a wire form under [`UnknownWrite::EmitUnknown`].
pub const UNKNOWN_TOKEN: &str = "unknown";

#[derive(Debug, Snafu)]
pub enum EnumError {
    #[snafu(display("cannot encode {enum_name}::{constant}: constant has no wire token"))]
    Unencodable { enum_name: String, constant: String },
}

/// What happens when encoding a constant that has no wire token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnknownWrite {
    /// Fail with [`EnumError::Unencodable`].
    Fail,
    /// Write the literal `"unknown"`.
    EmitUnknown,
}

/// Wire tokens of an enum, indexed both ways.
pub struct EnumTable<E: 'static> {
    by_token: HashMap<&'static str, E>,
    by_value: HashMap<E, &'static str>,
    tokens: Vec<&'static str>,
}

impl<E: WireEnum> EnumTable<E> {
    pub fn build() -> Self {
        let zero = E::default();
        let mut by_token = HashMap::new();
        let mut by_value = HashMap::new();
        let mut tokens = vec![];

        for value in E::iter() {
            if value == zero && !E::ZERO_ON_WIRE {
                continue;
            }
            let token: &'static str = value.into();
            // first constant wins, later ones can still be encoded
            if by_token.contains_key(token) {
                warn!(token, enum_name = E::NAME, "duplicate token in wire enum");
            }
            else {
                by_token.insert(token, value);
            }
            by_value.insert(value, token);
            tokens.push(token);
        }

        EnumTable { by_token, by_value, tokens }
    }

    /// Return the constant for `token`, or the zero constant if the token is unknown.
    pub fn decode(&self, token: &str) -> E {
        match self.by_token.get(token) {
            Some(value) => *value,
            None => {
                debug!(token, enum_name = E::NAME, "unknown token, falling back to the zero constant");
                E::default()
            },
        }
    }

    pub fn encode(&self, value: E) -> Result<&'static str, EnumError> {
        match (self.by_value.get(&value), E::UNKNOWN_WRITE) {
            (Some(token), _) => Ok(token),
            (None, UnknownWrite::EmitUnknown) => Ok(UNKNOWN_TOKEN),
            (None, UnknownWrite::Fail) => UnencodableSnafu {
                enum_name: E::NAME,
                constant: format!("{value:?}"),
            }.fail(),
        }
    }

    /// All tokens of the table, in declaration order of the constants.
    pub fn tokens(&self) -> &[&'static str] {
        &self.tokens
    }
}

/// An enum with a wire token table.
///
/// Implement it with the [`wire_enum!`](crate::wire_enum!) macro rather than by hand, it also
/// declares the static table and the `serde` impls going through it.
pub trait WireEnum:
    Copy + Eq + Hash + Default + Debug + IntoEnumIterator + Into<&'static str> + 'static
{
    const NAME: &'static str;
    const UNKNOWN_WRITE: UnknownWrite;
    /// Whether the zero constant has a token of its own (normally `"unknown"`).
    const ZERO_ON_WIRE: bool = false;

    fn table() -> &'static EnumTable<Self>;

    fn from_token(token: &str) -> Self {
        Self::table().decode(token)
    }

    fn to_token(self) -> Result<&'static str, EnumError> {
        Self::table().encode(self)
    }

    fn tokens() -> &'static [&'static str] {
        Self::table().tokens()
    }
}

pub fn serialize<E, S>(value: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: WireEnum,
    S: Serializer,
{
    let token = value.to_token().map_err(ser::Error::custom)?;
    serializer.serialize_str(token)
}

pub fn deserialize<'de, E, D>(deserializer: D) -> Result<E, D::Error>
where
    E: WireEnum,
    D: Deserializer<'de>,
{
    struct TokenVisitor<E>(std::marker::PhantomData<E>);

    impl<E: WireEnum> de::Visitor<'_> for TokenVisitor<E> {
        type Value = E;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a {} token", E::NAME)
        }

        fn visit_str<Er: de::Error>(self, token: &str) -> Result<E, Er> {
            Ok(E::from_token(token))
        }
    }

    deserializer.deserialize_str(TokenVisitor(std::marker::PhantomData))
}

/// Implement [`WireEnum`] for an enum deriving `strum::EnumIter` and `strum::IntoStaticStr`,
/// along with `serde::Serialize` and `serde::Deserialize` going through its token table.
///
/// ```ignore
/// wire_enum!(ChatType, unknown_write = Fail);
/// wire_enum!(UpdateType, unknown_write = EmitUnknown, zero_on_wire);
/// ```
#[macro_export]
macro_rules! wire_enum {
    ($typ:ident, unknown_write = $policy:ident) => {
        $crate::wire_enum!(@impl $typ, $policy, false);
    };
    ($typ:ident, unknown_write = $policy:ident, zero_on_wire) => {
        $crate::wire_enum!(@impl $typ, $policy, true);
    };
    (@impl $typ:ident, $policy:ident, $zero:expr) => {
        impl $crate::wire_enum::WireEnum for $typ {
            const NAME: &'static str = stringify!($typ);
            const UNKNOWN_WRITE: $crate::wire_enum::UnknownWrite = $crate::wire_enum::UnknownWrite::$policy;
            const ZERO_ON_WIRE: bool = $zero;

            fn table() -> &'static $crate::wire_enum::EnumTable<Self> {
                static TABLE: ::std::sync::LazyLock<$crate::wire_enum::EnumTable<$typ>> =
                    ::std::sync::LazyLock::new(|| $crate::wire_enum::EnumTable::build());
                &TABLE
            }
        }

        impl $crate::__serde::Serialize for $typ {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where S: $crate::__serde::Serializer
            {
                $crate::wire_enum::serialize(self, serializer)
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $typ {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                $crate::wire_enum::deserialize(deserializer)
            }
        }
    };
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use strum::{EnumIter, IntoStaticStr};
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
    #[strum(serialize_all = "snake_case")]
    enum Fruit {
        #[default]
        Unknown,
        Apple,
        BloodOrange,
        #[strum(serialize = "🍌")]
        Banana,
    }

    crate::wire_enum!(Fruit, unknown_write = Fail);

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
    #[strum(serialize_all = "snake_case")]
    enum Drink {
        #[default]
        Unknown,
        Tea,
        #[strum(serialize = "tea")]
        GreenTea,
    }

    crate::wire_enum!(Drink, unknown_write = Fail);

    #[test]
    fn table_is_built_from_constants() {
        assert_eq!(Fruit::tokens(), &["apple", "blood_orange", "🍌"]);
        assert_eq!(Fruit::from_token("blood_orange"), Fruit::BloodOrange);
        assert_eq!(Fruit::from_token("🍌"), Fruit::Banana);
        assert_eq!(Fruit::Apple.to_token().unwrap(), "apple");
    }

    #[test]
    fn zero_constant_is_not_on_the_wire() {
        assert_eq!(Fruit::from_token("unknown"), Fruit::Unknown);
        assert_eq!(Fruit::from_token(""), Fruit::Unknown);

        let err = Fruit::Unknown.to_token().unwrap_err();
        assert_eq!(err.to_string(), "cannot encode Fruit::Unknown: constant has no wire token");
    }

    #[test]
    fn table_is_shared() {
        assert!(std::ptr::eq(Fruit::table(), Fruit::table()));
    }

    #[test]
    fn serde_goes_through_the_table() {
        assert_eq!(serde_json::to_string(&Fruit::BloodOrange).unwrap(), r#""blood_orange""#);
        assert_eq!(serde_json::from_str::<Fruit>(r#""kiwi""#).unwrap(), Fruit::Unknown);
        assert!(serde_json::to_string(&Fruit::Unknown).is_err());
        assert!(serde_json::from_str::<Fruit>("3").is_err());
    }

    #[test]
    fn first_constant_wins_on_duplicate_tokens() {
        assert_eq!(Drink::tokens(), &["tea", "tea"]);
        assert_eq!(Drink::from_token("tea"), Drink::Tea);
        assert_eq!(Drink::GreenTea.to_token().unwrap(), "tea");
    }
}
