//! Conversion between entities and their stored JSON records.
//!
//! `to_json` is a plain field projection. `from_json` requires every key,
//! including the nullable ones, and then goes through the entity
//! constructor so stored data is validated exactly like fresh input.

use chrono::{DateTime, NaiveDateTime, Utc};
use piprbook_shared::model::{Entity, FriendRequest, Message, Photo, User};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RepresentationError, Result};
use crate::store::Record;

/// Two-way mapping between one entity type and its record.
pub trait Serializer {
    type Entity: Entity;

    fn to_json(&self, entity: &Self::Entity) -> Record;

    fn from_json(&self, record: &Record) -> Result<Self::Entity>;
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    uuid: String,
    username: String,
    email: String,
    password_hash: String,
    salt: String,
    friend_uuids: Vec<String>,
    // deserialize_with makes the key mandatory even though null is allowed
    #[serde(deserialize_with = "Option::deserialize")]
    profile_picture_id: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    bio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    uuid: String,
    text: String,
    timestamp: String,
    from_user_id: String,
    to_user_id: String,
}

#[derive(Debug, Deserialize)]
struct FriendRequestRecord {
    uuid: String,
    timestamp: String,
    from_user_id: String,
    to_user_id: String,
}

#[derive(Debug, Deserialize)]
struct PhotoRecord {
    uuid: String,
    filename: String,
    format: String,
    binary_data_hex: String,
}

fn parse_record<T: DeserializeOwned>(entity: &'static str, record: &Record) -> Result<T> {
    serde_json::from_value(Value::Object(record.clone())).map_err(|e| {
        RepresentationError {
            entity,
            reason: e.to_string(),
            record: record.clone(),
        }
        .into()
    })
}

/// Accept RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC.
fn parse_timestamp(entity: &'static str, value: &str, record: &Record) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            RepresentationError {
                entity,
                reason: format!("invalid timestamp {value:?}: {e}"),
                record: record.clone(),
            }
            .into()
        })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UserSerializer;

impl Serializer for UserSerializer {
    type Entity = User;

    fn to_json(&self, user: &User) -> Record {
        let mut record = Record::new();
        record.insert("uuid".into(), user.id().into());
        record.insert("username".into(), user.username().into());
        record.insert("email".into(), user.email().into());
        record.insert("password_hash".into(), user.password_hash().into());
        record.insert("salt".into(), user.salt().into());
        record.insert("friend_uuids".into(), user.friend_ids().to_vec().into());
        record.insert(
            "profile_picture_id".into(),
            user.profile_picture_id().map_or(Value::Null, Value::from),
        );
        record.insert("bio".into(), user.bio().map_or(Value::Null, Value::from));
        record
    }

    fn from_json(&self, record: &Record) -> Result<User> {
        let parsed: UserRecord = parse_record("user", record)?;

        let user = User::new(
            parsed.uuid,
            parsed.username,
            parsed.email,
            parsed.password_hash,
            parsed.salt,
        )?
        .with_friend_ids(parsed.friend_uuids)?
        .with_profile_picture_id(parsed.profile_picture_id)?
        .with_bio(parsed.bio);
        Ok(user)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MessageSerializer;

impl Serializer for MessageSerializer {
    type Entity = Message;

    fn to_json(&self, message: &Message) -> Record {
        let mut record = Record::new();
        record.insert("uuid".into(), message.id().into());
        record.insert("text".into(), message.text().into());
        record.insert("timestamp".into(), message.timestamp().to_rfc3339().into());
        record.insert("from_user_id".into(), message.from_user_id().into());
        record.insert("to_user_id".into(), message.to_user_id().into());
        record
    }

    fn from_json(&self, record: &Record) -> Result<Message> {
        let parsed: MessageRecord = parse_record("message", record)?;
        let timestamp = parse_timestamp("message", &parsed.timestamp, record)?;

        Ok(Message::new(
            parsed.uuid,
            parsed.text,
            timestamp,
            parsed.from_user_id,
            parsed.to_user_id,
        )?)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FriendRequestSerializer;

impl Serializer for FriendRequestSerializer {
    type Entity = FriendRequest;

    fn to_json(&self, request: &FriendRequest) -> Record {
        let mut record = Record::new();
        record.insert("uuid".into(), request.id().into());
        record.insert("timestamp".into(), request.timestamp().to_rfc3339().into());
        record.insert("from_user_id".into(), request.from_user_id().into());
        record.insert("to_user_id".into(), request.to_user_id().into());
        record
    }

    fn from_json(&self, record: &Record) -> Result<FriendRequest> {
        let parsed: FriendRequestRecord = parse_record("friend request", record)?;
        let timestamp = parse_timestamp("friend request", &parsed.timestamp, record)?;

        Ok(FriendRequest::new(
            parsed.uuid,
            timestamp,
            parsed.from_user_id,
            parsed.to_user_id,
        )?)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PhotoSerializer;

impl Serializer for PhotoSerializer {
    type Entity = Photo;

    fn to_json(&self, photo: &Photo) -> Record {
        let mut record = Record::new();
        record.insert("uuid".into(), photo.id().into());
        record.insert("filename".into(), photo.filename().into());
        record.insert("format".into(), photo.format().into());
        record.insert("binary_data_hex".into(), photo.binary_data_hex().into());
        record
    }

    fn from_json(&self, record: &Record) -> Result<Photo> {
        let parsed: PhotoRecord = parse_record("photo", record)?;

        Ok(Photo::new(
            parsed.uuid,
            parsed.filename,
            parsed.format,
            parsed.binary_data_hex,
        )?)
    }
}
