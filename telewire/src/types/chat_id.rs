use std::fmt;
use std::str::FromStr;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, Snafu};


#[derive(Debug, Snafu)]
pub enum InvalidChatId {
    #[snafu(display("chat id is empty: it needs either a numeric id or a username"))]
    Empty,
}

/// Target chat of a request: either its numeric identifier or the username
/// of a public chat (`@channelusername`).
///
/// It is always carried on the wire as a string.
#[derive(Eq, Hash, PartialEq, Debug, Clone)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl ChatId {
    /// Build a `ChatId` from its wire representation: strings of digits with an
    /// optional leading `-` are ids, anything else is kept verbatim as a username.
    ///
    /// ## Example
    /// ```
    /// # use telewire::{ChatId, InvalidChatId};
    /// assert_eq!(ChatId::new("-1001234567890")?, ChatId::Id(-1001234567890));
    /// assert_eq!(ChatId::new("@durov")?, ChatId::Username("@durov".to_owned()));
    /// assert!(ChatId::new("").is_err());
    /// # Ok::<(), InvalidChatId>(())
    /// ```
    pub fn new(s: &str) -> Result<Self, InvalidChatId> {
        ensure!(!s.is_empty(), EmptySnafu);
        let digits = s.strip_prefix('-').unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = s.parse::<i64>() {
                return Ok(ChatId::Id(id));
            }
        }
        Ok(ChatId::Username(s.to_owned()))
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            ChatId::Id(id) => Some(*id),
            ChatId::Username(_) => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            ChatId::Username(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Return the string sent on the wire: the username if there is one,
    /// the numeric id otherwise.
    pub fn to_wire(&self) -> Result<String, InvalidChatId> {
        if let Some(username) = self.username() {
            return Ok(username.to_owned());
        }
        match self.id() {
            Some(id) => Ok(id.to_string()),
            None => EmptySnafu.fail(),
        }
    }
}


// -----------------------------------------------------------------------------
//     Conversion traits
// -----------------------------------------------------------------------------

impl From<i64> for ChatId {
    fn from(id: i64) -> ChatId {
        ChatId::Id(id)
    }
}

impl TryFrom<&str> for ChatId {
    type Error = InvalidChatId;

    fn try_from(s: &str) -> Result<ChatId, InvalidChatId> {
        ChatId::new(s)
    }
}

impl FromStr for ChatId {
    type Err = InvalidChatId;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatId::new(s)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{id}"),
            ChatId::Username(name) => write!(f, "{name}"),
        }
    }
}


// -----------------------------------------------------------------------------
//     `Serde` traits implementation
// -----------------------------------------------------------------------------

impl Serialize for ChatId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let repr = self.to_wire().map_err(ser::Error::custom)?;
        serializer.serialize_str(&repr)
    }
}

struct ChatIdVisitor;

impl de::Visitor<'_> for ChatIdVisitor {
    type Value = ChatId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a chat id or a username")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<ChatId, E> {
        ChatId::new(s).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, id: i64) -> Result<ChatId, E> {
        Ok(ChatId::Id(id))
    }

    fn visit_u64<E: de::Error>(self, id: u64) -> Result<ChatId, E> {
        i64::try_from(id)
            .map(ChatId::Id)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(id), &self))
    }
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D>(deserializer: D) -> Result<ChatId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ChatIdVisitor)
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;
    use serde_json::json;
    use super::*;

    #[test]
    fn wire_form_is_a_string() -> Result<()> {
        assert_eq!(serde_json::to_value(ChatId::Username("alice".to_owned()))?, json!("alice"));
        assert_eq!(serde_json::to_value(ChatId::Id(12345))?, json!("12345"));
        assert_eq!(serde_json::to_value(ChatId::Id(-100123))?, json!("-100123"));
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        for chat_id in [ChatId::Username("alice".to_owned()), ChatId::Id(12345)] {
            let wire = serde_json::to_string(&chat_id)?;
            assert_eq!(serde_json::from_str::<ChatId>(&wire)?, chat_id);
        }
        Ok(())
    }

    #[test]
    fn only_plain_digits_are_ids() -> Result<()> {
        assert_eq!(ChatId::new("+5")?, ChatId::Username("+5".to_owned()));
        assert_eq!(ChatId::new("-")?, ChatId::Username("-".to_owned()));
        assert_eq!(ChatId::new("-42")?, ChatId::Id(-42));

        let plus = ChatId::Username("+5".to_owned());
        let wire = serde_json::to_string(&plus)?;
        assert_eq!(wire, r#""+5""#);
        assert_eq!(serde_json::from_str::<ChatId>(&wire)?, plus);
        Ok(())
    }

    #[test]
    fn integers_are_accepted_on_read() -> Result<()> {
        assert_eq!(serde_json::from_value::<ChatId>(json!(42))?, ChatId::Id(42));
        assert_eq!(serde_json::from_value::<ChatId>(json!(-42))?, ChatId::Id(-42));
        assert!(serde_json::from_value::<ChatId>(json!(u64::MAX)).is_err());
        Ok(())
    }

    #[test]
    fn empty_chat_id() {
        assert!(ChatId::new("").is_err());
        assert!(serde_json::from_value::<ChatId>(json!("")).is_err());

        let empty = ChatId::Username(String::new());
        assert!(empty.to_wire().is_err());
        assert!(serde_json::to_value(&empty).is_err());
    }
}
