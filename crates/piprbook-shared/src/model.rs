//! Domain entities persisted by the store.
//!
//! Every constructor validates its input and never yields an invalid value.
//! Fields are private; the few that may change after construction have
//! mutators that keep the invariants intact. `Clone` is a full deep copy.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{ModelError, Result};
use crate::identifiers::{generate_id, is_id};
use crate::validation::{
    is_email, is_filename, is_hash, is_hex, is_salt, is_supported_format, is_username,
};

/// Anything stored under its own identifier.
pub trait Entity {
    fn id(&self) -> &str;
}

fn check_id(field: &'static str, value: &str) -> Result<()> {
    if is_id(value) {
        Ok(())
    } else {
        Err(ModelError::identifier(field, value))
    }
}

fn check_parties(from_user_id: &str, to_user_id: &str) -> Result<()> {
    check_id("from_user_id", from_user_id)?;
    check_id("to_user_id", to_user_id)?;
    if from_user_id == to_user_id {
        return Err(ModelError::SelfReference(from_user_id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account together with its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: String,
    username: String,
    email: String,
    /// Hex SHA-256 of `password + salt`.
    password_hash: String,
    salt: String,
    /// Mirrored on the friend's side when a request is accepted.
    friend_ids: Vec<String>,
    profile_picture_id: Option<String>,
    bio: Option<String>,
}

impl User {
    /// Build a user with no friends, picture or bio.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        salt: impl Into<String>,
    ) -> Result<Self> {
        let user = Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            salt: salt.into(),
            friend_ids: Vec::new(),
            profile_picture_id: None,
            bio: None,
        };

        check_id("uuid", &user.id)?;
        if !is_username(&user.username) {
            return Err(ModelError::IncorrectUsername(user.username));
        }
        if !is_email(&user.email) {
            return Err(ModelError::IncorrectEmail(user.email));
        }
        if !is_hash(&user.password_hash) {
            return Err(ModelError::IncorrectPasswordHash(user.password_hash));
        }
        if !is_salt(&user.salt) {
            return Err(ModelError::IncorrectSalt(user.salt));
        }

        Ok(user)
    }

    pub fn with_friend_ids(mut self, friend_ids: Vec<String>) -> Result<Self> {
        for friend_id in &friend_ids {
            check_id("friend_uuids", friend_id)?;
        }
        self.friend_ids = friend_ids;
        Ok(self)
    }

    pub fn with_profile_picture_id(mut self, photo_id: Option<String>) -> Result<Self> {
        self.set_profile_picture_id(photo_id)?;
        Ok(self)
    }

    pub fn with_bio(mut self, bio: Option<String>) -> Self {
        self.bio = bio;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn friend_ids(&self) -> &[String] {
        &self.friend_ids
    }

    pub fn profile_picture_id(&self) -> Option<&str> {
        self.profile_picture_id.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
    }

    pub fn set_profile_picture_id(&mut self, photo_id: Option<String>) -> Result<()> {
        if let Some(id) = &photo_id {
            check_id("profile_picture_id", id)?;
        }
        self.profile_picture_id = photo_id;
        Ok(())
    }

    /// Append `friend_id` unless it is already listed.
    pub fn add_friend(&mut self, friend_id: &str) -> Result<()> {
        check_id("friend_uuids", friend_id)?;
        if !self.friend_ids.iter().any(|id| id == friend_id) {
            self.friend_ids.push(friend_id.to_string());
        }
        Ok(())
    }

    pub fn is_friends_with(&self, other: &User) -> bool {
        self.friend_ids.iter().any(|id| *id == other.id)
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A direct text message between two distinct users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: String,
    text: String,
    timestamp: DateTime<Utc>,
    from_user_id: String,
    to_user_id: String,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
    ) -> Result<Self> {
        let message = Self {
            id: id.into(),
            text: text.into(),
            timestamp,
            from_user_id: from_user_id.into(),
            to_user_id: to_user_id.into(),
        };

        check_id("uuid", &message.id)?;
        if message.text.is_empty() {
            return Err(ModelError::IncorrectMessageText);
        }
        check_parties(&message.from_user_id, &message.to_user_id)?;

        Ok(message)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn from_user_id(&self) -> &str {
        &self.from_user_id
    }

    pub fn to_user_id(&self) -> &str {
        &self.to_user_id
    }
}

impl Entity for Message {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// FriendRequest
// ---------------------------------------------------------------------------

/// A pending invitation from one user to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    id: String,
    timestamp: DateTime<Utc>,
    from_user_id: String,
    to_user_id: String,
}

impl FriendRequest {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
    ) -> Result<Self> {
        let request = Self {
            id: id.into(),
            timestamp,
            from_user_id: from_user_id.into(),
            to_user_id: to_user_id.into(),
        };

        check_id("uuid", &request.id)?;
        check_parties(&request.from_user_id, &request.to_user_id)?;

        Ok(request)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn from_user_id(&self) -> &str {
        &self.from_user_id
    }

    pub fn to_user_id(&self) -> &str {
        &self.to_user_id
    }
}

impl Entity for FriendRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Photo
// ---------------------------------------------------------------------------

/// An uploaded image. The raw file content is kept as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    id: String,
    filename: String,
    format: String,
    binary_data_hex: String,
}

impl Photo {
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        format: impl Into<String>,
        binary_data_hex: impl Into<String>,
    ) -> Result<Self> {
        let photo = Self {
            id: id.into(),
            filename: filename.into(),
            format: format.into(),
            binary_data_hex: binary_data_hex.into(),
        };

        check_id("uuid", &photo.id)?;
        if !is_filename(&photo.filename) {
            return Err(ModelError::IncorrectFilename(photo.filename));
        }
        if !is_supported_format(&photo.format) {
            return Err(ModelError::UnsupportedFileFormat(photo.format));
        }
        if !is_hex(&photo.binary_data_hex) {
            return Err(ModelError::IncorrectHexRepresentation);
        }

        Ok(photo)
    }

    /// Wrap raw file content under a fresh id.
    ///
    /// The filename is the last component of `path` and the format is its
    /// extension, so `/tmp/me.png` becomes `me.png` / `png`.
    pub fn from_bytes(bytes: &[u8], path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(generate_id(), filename, format, hex::encode(bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn binary_data_hex(&self) -> &str {
        &self.binary_data_hex
    }

    /// Decode the stored payload back into raw bytes.
    pub fn get_bytes(&self) -> std::result::Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.binary_data_hex)
    }
}

impl Entity for Photo {
    fn id(&self) -> &str {
        &self.id
    }
}
