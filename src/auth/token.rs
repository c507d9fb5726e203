//! Defines the token stored in the auth cookie and how to serialize/deserialize it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod datetime_format {
    //! Serializes a [time::OffsetDateTime] in a fixed width format.
    //!
    //! The default serializer for [time::OffsetDateTime] writes midnight as
    //! "0:00:00.0" and then fails to parse it back because it expects the hour
    //! to have two digits.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// Date time format for the token expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The contents of the auth cookie.
///
/// `access_token` is the token the identity provider issued at sign-in. It is
/// checked with the provider on every request, so the cookie only has to
/// carry it and the time the cookie lapses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,

    #[serde(
        serialize_with = "datetime_format::serialize",
        deserialize_with = "datetime_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use time::{UtcOffset, macros::datetime};

    use crate::auth::token::Token;

    #[test]
    fn serialise_token() {
        let token = Token {
            access_token: "abc123".to_owned(),
            expires_at: datetime!(2025-12-21 03:54:00).assume_offset(UtcOffset::UTC),
        };
        let expected = r#"{"access_token":"abc123","expires_at":"2025-12-21 03:54:00.0 +00:00:00"}"#;

        let actual = serde_json::to_string(&token).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn deserialise_token_at_midnight() {
        let want = Token {
            access_token: "abc123".to_owned(),
            expires_at: datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC),
        };

        let got: Token = serde_json::from_str(
            r#"{"access_token":"abc123","expires_at":"2025-12-21 00:00:00.0 +00:00:00"}"#,
        )
        .unwrap();

        assert_eq!(want, got);
    }
}
