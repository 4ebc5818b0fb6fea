use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized representation of an object, as produced by an
/// [`ObjectSerializer`](crate::serialization::ObjectSerializer).
///
/// Text backends produce `Text`; binary backends produce `Binary`. Inside an
/// envelope's own wire form the two are written untagged, so a text form
/// appears as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedForm {
    Text(String),
    Binary(Vec<u8>),
}

impl SerializedForm {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SerializedForm::Text(text) => text.as_bytes(),
            SerializedForm::Binary(bytes) => bytes,
        }
    }

    /// The text form, if this is text or valid UTF-8 bytes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SerializedForm::Text(text) => Some(text),
            SerializedForm::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedForm::Text(text) => text.into_bytes(),
            SerializedForm::Binary(bytes) => bytes,
        }
    }
}

impl From<String> for SerializedForm {
    fn from(text: String) -> Self {
        SerializedForm::Text(text)
    }
}

impl From<&str> for SerializedForm {
    fn from(text: &str) -> Self {
        SerializedForm::Text(text.to_string())
    }
}

impl From<Vec<u8>> for SerializedForm {
    fn from(bytes: Vec<u8>) -> Self {
        SerializedForm::Binary(bytes)
    }
}

impl fmt::Display for SerializedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(text),
            None => write!(f, "<{} bytes>", self.len()),
        }
    }
}
