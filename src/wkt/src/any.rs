// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::message::{Map, Message};

/// `Any` contains an arbitrary serialized message along with a URL that
/// describes the type of the serialized message.
///
/// # JSON
///
/// The JSON representation of an `Any` value uses the regular
/// representation of the deserialized, embedded message, with an
/// additional field `@type` which contains the type URL. Example:
///
/// ```norust
///     {
///       "@type": "type.googleapis.com/google.profile.Person",
///       "firstName": <string>,
///       "lastName": <string>
///     }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Any(Map);

/// Indicates a problem trying to use an [Any].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum AnyError {
    /// Problem serializing an object into an [Any].
    #[error("cannot serialize object into an Any, source={0}")]
    Serialization(#[source] BoxedError),

    /// Problem deserializing an object from an [Any].
    #[error("cannot deserialize from an Any, source={0}")]
    Deserialization(#[source] BoxedError),

    /// Mismatched type, the [Any] does not contain the desired type.
    #[error("expected type mismatch in Any deserialization has={has}, want={want}")]
    TypeMismatch {
        /// The type URL stored in the [Any].
        has: String,
        /// The type URL of the requested message.
        want: String,
    },
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;
type Error = AnyError;

impl AnyError {
    pub(crate) fn ser<T: Into<BoxedError>>(v: T) -> Self {
        Self::Serialization(v.into())
    }

    pub(crate) fn deser<T: Into<BoxedError>>(v: T) -> Self {
        Self::Deserialization(v.into())
    }

    /// Returns true if the [Any] holds a different message type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl Any {
    /// Packs a message into an [Any], tagging it with the message type URL.
    ///
    /// # Example
    /// ```
    /// # use gapic_wkt::{Any, Empty};
    /// let any = Any::from_msg(&Empty::default())?;
    /// assert_eq!(any.type_url(), Some("type.googleapis.com/google.protobuf.Empty"));
    /// # Ok::<(), gapic_wkt::AnyError>(())
    /// ```
    pub fn from_msg<T>(message: &T) -> Result<Self, Error>
    where
        T: Message,
    {
        use serde_json::Value;
        let value = serde_json::to_value(message).map_err(Error::ser)?;
        match value {
            Value::Object(mut map) => {
                map.insert(
                    "@type".to_string(),
                    Value::String(T::typename().to_string()),
                );
                Ok(Any(map))
            }
            _ => Err(Error::ser(
                "unexpected JSON type, only objects can be packed",
            )),
        }
    }

    /// The type URL of the packed message, if any.
    pub fn type_url(&self) -> Option<&str> {
        self.0.get("@type").and_then(|v| v.as_str())
    }

    /// Extracts (if possible) a `T` value from the [Any].
    ///
    /// Fails with [AnyError::TypeMismatch] if the [Any] contains a message of
    /// a different type.
    pub fn to_msg<T>(&self) -> Result<T, Error>
    where
        T: Message,
    {
        let has = self
            .type_url()
            .ok_or_else(|| Error::deser("@type field is missing or is not a string"))?;
        if has != T::typename() {
            return Err(Error::TypeMismatch {
                has: has.to_string(),
                want: T::typename().to_string(),
            });
        }
        let map: Map = self
            .0
            .iter()
            .filter(|(k, _)| k.as_str() != "@type")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value::<T>(serde_json::Value::Object(map)).map_err(Error::deser)
    }
}

/// Implement [`serde`](::serde) serialization for [Any].
impl serde::ser::Serialize for Any {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Implement [`serde`](::serde) deserialization for [Any].
impl<'de> serde::de::Deserialize<'de> for Any {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Map::deserialize(deserializer)?;
        Ok(Any(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    type Result = anyhow::Result<()>;

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Stored {
        parent: String,
        id: String,
    }

    impl Message for Stored {
        fn typename() -> &'static str {
            "type.googleapis.com/test.Stored"
        }
    }

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    struct Other {
        name: String,
    }

    impl Message for Other {
        fn typename() -> &'static str {
            "type.googleapis.com/test.Other"
        }
    }

    #[test]
    fn serialize_generic() -> Result {
        let d = Stored {
            parent: "parent".to_string(),
            id: "id".to_string(),
        };
        let any = Any::from_msg(&d)?;
        let got = serde_json::to_value(any)?;
        let want = json!({"@type": "type.googleapis.com/test.Stored", "parent": "parent", "id": "id"});
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn deserialize_generic() -> Result {
        let input = json!({"@type": "type.googleapis.com/test.Stored", "parent": "parent", "id": "id"});
        let any = serde_json::from_value::<Any>(input)?;
        let d = any.to_msg::<Stored>()?;
        assert_eq!(
            d,
            Stored {
                parent: "parent".to_string(),
                id: "id".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn type_mismatch() -> Result {
        let any = Any::from_msg(&Other {
            name: "dud".to_string(),
        })?;
        let got = any.to_msg::<Stored>();
        let err = got.expect_err("the types should not match");
        assert!(err.is_type_mismatch(), "{err:?}");
        assert!(err.to_string().contains("test.Other"), "{err}");
        Ok(())
    }

    #[test]
    fn serialize_error() {
        let input = vec![2, 3, 4];
        #[derive(serde::Serialize, serde::Deserialize)]
        struct List(Vec<i32>);
        impl Message for List {
            fn typename() -> &'static str {
                "type.googleapis.com/test.List"
            }
        }
        let got = Any::from_msg(&List(input));
        assert!(matches!(got, Err(AnyError::Serialization(_))), "{got:?}");
    }

    #[test]
    fn deserialize_error() -> Result {
        let input = json!({"@type-is-missing": ""});
        let any = serde_json::from_value::<Any>(input)?;
        let got = any.to_msg::<Stored>();
        assert!(matches!(got, Err(AnyError::Deserialization(_))), "{got:?}");

        let input = json!({"@type": [1, 2, 3]});
        let any = serde_json::from_value::<Any>(input)?;
        let got = any.to_msg::<Stored>();
        assert!(matches!(got, Err(AnyError::Deserialization(_))), "{got:?}");

        let input = json!({"@type": "type.googleapis.com/test.Stored", "parent": [1, 2]});
        let any = serde_json::from_value::<Any>(input)?;
        let got = any.to_msg::<Stored>();
        assert!(matches!(got, Err(AnyError::Deserialization(_))), "{got:?}");
        Ok(())
    }

    #[test]
    fn default_is_untyped() {
        let any = Any::default();
        assert!(any.type_url().is_none());
    }
}
