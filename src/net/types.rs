//! Wire DTOs for the blog REST API.
//!
//! DESIGN
//! ======
//! Every response body is an envelope `{ data, success, message? }`. Payload
//! types are lenient where the server is: unknown user fields are preserved,
//! post `status` arrives either as a boolean or as a label, and `owner` is
//! either a populated user or a bare id.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::transport::FormPart;

/// Standard response envelope.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

// =============================================================================
// USERS
// =============================================================================

/// Authenticated user profile as returned by `current-user`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    /// Any other fields the server sends, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Best display label: username, then full name, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.fullname.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// Body of `POST /api/v1/user/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/v1/user/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignupForm {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Payload of the token refresh endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

// =============================================================================
// POSTS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PostStatus {
    #[default]
    Active,
    Inactive,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl Serialize for PostStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PostStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Active),
            Raw::Flag(false) => Ok(Self::Inactive),
            Raw::Label(label) => match label.to_ascii_lowercase().as_str() {
                "active" | "true" => Ok(Self::Active),
                "inactive" | "false" => Ok(Self::Inactive),
                other => Err(serde::de::Error::custom(format!("unknown post status: {other}"))),
            },
        }
    }
}

/// Post author: populated user document or a bare id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    Id(String),
    User(User),
}

impl Owner {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::User(user) => user.id.as_deref(),
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::User(user) => user.username.as_deref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// HTML produced by the rich-text editor.
    #[serde(default)]
    pub content: String,
    #[serde(rename = "imagePublicId", default, skip_serializing_if = "Option::is_none")]
    pub image_public_id: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Image attached to a create/update post request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Fields of the create/update post form, sent as multipart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub image: Option<ImageUpload>,
}

impl PostForm {
    /// Multipart fields in the layout the server expects. `status` travels as
    /// the string `"true"` / `"false"`.
    #[must_use]
    pub fn into_parts(self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::Text { name: "title".into(), value: self.title },
            FormPart::Text { name: "content".into(), value: self.content },
            FormPart::Text { name: "status".into(), value: self.status.is_active().to_string() },
        ];
        if let Some(image) = self.image {
            parts.push(FormPart::File {
                name: "image".into(),
                file_name: image.file_name,
                mime: image.mime,
                bytes: image.bytes,
            });
        }
        parts
    }
}

/// Displayable location of a stored image.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilePreview {
    pub url: String,
}
