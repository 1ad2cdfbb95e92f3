//! The operations the user interface calls.
//!
//! [`UserService`] wires the four repositories and an [`Authentication`]
//! over one shared store. Actions taken on behalf of a user check that this
//! user is the one currently logged in and fail with
//! [`ClientError::Unauthorized`] otherwise.

use std::sync::Arc;

use chrono::Utc;
use piprbook_shared::identifiers::generate_id;
use piprbook_shared::model::{Entity, FriendRequest, Message, Photo, User};
use piprbook_shared::password::{generate_salt, hash_password};
use piprbook_store::{
    FriendRequestRepository, MessageRepository, PhotoRepository, Store, UserRepository,
};
use tracing::{debug, info};

use crate::auth::Authentication;
use crate::error::{AuthError, ClientError, Result};

pub struct UserService<S: ?Sized> {
    auth: Authentication<S>,
    users: UserRepository<S>,
    messages: MessageRepository<S>,
    friend_requests: FriendRequestRepository<S>,
    photos: PhotoRepository<S>,
}

impl<S: Store + ?Sized> UserService<S> {
    /// Bind every repository to its default collection in `store`.
    pub fn new(store: Arc<S>) -> Self {
        let users = UserRepository::with_default_collection(Arc::clone(&store));
        Self {
            auth: Authentication::new(users.clone()),
            users,
            messages: MessageRepository::with_default_collection(Arc::clone(&store)),
            friend_requests: FriendRequestRepository::with_default_collection(Arc::clone(&store)),
            photos: PhotoRepository::with_default_collection(store),
        }
    }

    // -- Session --

    /// Returns whether the credentials were accepted.
    pub fn log_in_user(&mut self, username: &str, password: &str) -> Result<bool> {
        match self.auth.log_in(username, password) {
            Ok(()) => Ok(true),
            Err(AuthError::UserDoesNotExist(_) | AuthError::IncorrectPassword) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn log_out_user(&mut self) {
        self.auth.log_out();
    }

    /// The logged-in user as currently stored, or `None` if nobody is
    /// logged in.
    pub fn get_current_user(&self) -> Result<Option<User>> {
        match self.auth.logged_in_user() {
            Some(user) => self.get_user_by_id(user.id()),
            None => Ok(None),
        }
    }

    fn check_logged_in(&self, user: &User) -> Result<()> {
        match self.get_current_user()? {
            Some(current) if current.id() == user.id() => Ok(()),
            _ => Err(ClientError::Unauthorized),
        }
    }

    // -- Users --

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get_by_id(user_id)?)
    }

    pub fn get_users_by_username_fragment(&self, fragment: &str) -> Result<Vec<User>> {
        Ok(self.users.get_by_username_fragment(fragment)?)
    }

    /// Create and store a new account with a fresh salt.
    ///
    /// Username and email must not belong to anybody else yet.
    pub fn register_new_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        if self.users.get_by_username(username)?.is_some() {
            return Err(ClientError::UsernameTaken(username.to_string()));
        }
        if self.users.get_by_email(email)?.is_some() {
            return Err(ClientError::EmailAlreadyUsed(email.to_string()));
        }

        let salt = generate_salt();
        let user = User::new(
            generate_id(),
            username,
            email,
            hash_password(password, &salt),
            salt,
        )?;
        self.save_user(&user)?;

        info!(user_id = %user.id(), username, "registered new user");
        Ok(user)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        Ok(self.users.save(user)?)
    }

    /// Requires `user` to be logged in.
    pub fn set_bio(&self, user: &mut User, bio: Option<String>) -> Result<()> {
        self.check_logged_in(user)?;
        user.set_bio(bio);
        self.save_user(user)
    }

    /// Friends in the order they were added; ids that no longer resolve are
    /// skipped.
    pub fn get_friends(&self, user: &User) -> Result<Vec<User>> {
        let mut friends = Vec::with_capacity(user.friend_ids().len());
        for friend_id in user.friend_ids() {
            if let Some(friend) = self.users.get_by_id(friend_id)? {
                friends.push(friend);
            }
        }
        Ok(friends)
    }

    // -- Photos --

    pub fn get_profile_picture(&self, user: &User) -> Result<Option<Photo>> {
        match user.profile_picture_id() {
            Some(photo_id) => Ok(self.photos.get_by_id(photo_id)?),
            None => Ok(None),
        }
    }

    /// Replace the profile picture of `user`, deleting the previous one.
    ///
    /// Requires `user` to be logged in.
    pub fn add_profile_picture(&self, user: &mut User, photo: &Photo) -> Result<()> {
        self.check_logged_in(user)?;

        if let Some(previous) = self.get_profile_picture(user)? {
            self.delete_picture(&previous)?;
        }

        user.set_profile_picture_id(Some(photo.id().to_string()))?;
        self.users.save(user)?;
        self.photos.save(photo)?;

        info!(user_id = %user.id(), photo_id = %photo.id(), "profile picture replaced");
        Ok(())
    }

    pub fn delete_picture(&self, photo: &Photo) -> Result<()> {
        Ok(self.photos.delete(photo)?)
    }

    // -- Messages --

    /// Store a message from `from_user`, who must be logged in. The two
    /// users need not be friends.
    pub fn send_message(&self, from_user: &User, to_user: &User, text: &str) -> Result<Message> {
        self.check_logged_in(from_user)?;

        let message = Message::new(generate_id(), text, Utc::now(), from_user.id(), to_user.id())?;
        self.messages.save(&message)?;

        debug!(message_id = %message.id(), to = %to_user.id(), "message sent");
        Ok(message)
    }

    /// The conversation between two users, oldest first.
    ///
    /// The logged-in user must be one of the two.
    pub fn get_messages(&self, user_a: &User, user_b: &User) -> Result<Vec<Message>> {
        let current = self.get_current_user()?.ok_or(ClientError::Unauthorized)?;
        if current.id() != user_a.id() && current.id() != user_b.id() {
            return Err(ClientError::Unauthorized);
        }

        Ok(self.messages.get_messages(user_a, user_b)?)
    }

    // -- Friend requests --

    /// Pending requests sent by `user`, who must be logged in.
    pub fn get_friend_requests_from(&self, user: &User) -> Result<Vec<FriendRequest>> {
        self.check_logged_in(user)?;
        Ok(self.friend_requests.get_requests_from_user(user)?)
    }

    /// Pending requests addressed to `user`, who must be logged in.
    pub fn get_friend_requests_to(&self, user: &User) -> Result<Vec<FriendRequest>> {
        self.check_logged_in(user)?;
        Ok(self.friend_requests.get_requests_to_user(user)?)
    }

    pub fn send_friend_request(&self, from_user: &User, to_user: &User) -> Result<FriendRequest> {
        self.check_logged_in(from_user)?;
        if from_user.is_friends_with(to_user) {
            return Err(ClientError::AlreadyFriends);
        }

        let request = FriendRequest::new(generate_id(), Utc::now(), from_user.id(), to_user.id())?;
        self.friend_requests.save(&request)?;

        debug!(request_id = %request.id(), to = %to_user.id(), "friend request sent");
        Ok(request)
    }

    /// Make both users friends and drop the request.
    ///
    /// The receiver must be logged in. Both users are written before the
    /// request is deleted; nothing is rolled back if a later write fails.
    pub fn accept_friend_request(&self, request: &FriendRequest) -> Result<()> {
        let from_user = self.users.get_by_id(request.from_user_id())?;
        let to_user = self.users.get_by_id(request.to_user_id())?;
        let (Some(mut from_user), Some(mut to_user)) = (from_user, to_user) else {
            return Err(ClientError::UnknownUsers);
        };

        self.check_logged_in(&to_user)?;

        if to_user.is_friends_with(&from_user) {
            return Err(ClientError::AlreadyFriends);
        }

        to_user.add_friend(from_user.id())?;
        from_user.add_friend(to_user.id())?;

        self.users.save(&to_user)?;
        self.users.save(&from_user)?;
        self.friend_requests.delete(request)?;

        info!(
            from = %from_user.id(),
            to = %to_user.id(),
            "friend request accepted"
        );
        Ok(())
    }

    /// Drop a request without accepting it. Needs no session, since its
    /// users may no longer exist.
    pub fn delete_friend_request(&self, request: &FriendRequest) -> Result<()> {
        Ok(self.friend_requests.delete(request)?)
    }
}
