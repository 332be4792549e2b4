// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// User profile stored in Firestore.
///
/// Stored at: `users/{clerk_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Identity provider user ID (also used as document ID)
    pub clerk_id: String,
    /// Display name
    pub name: String,
    pub email: String,
    /// Avatar URL
    pub image: Option<String>,
}

/// Arguments of `syncUser`, sent on first sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncUser {
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub clerk_id: String,
    pub image: Option<String>,
}

impl From<SyncUser> for User {
    fn from(args: SyncUser) -> Self {
        Self {
            clerk_id: args.clerk_id,
            name: args.name,
            email: args.email,
            image: args.image,
        }
    }
}

/// Arguments of `updateUser`, sent on profile change.
///
/// Patch semantics: an omitted `image` keeps the stored avatar.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 128))]
    pub clerk_id: String,
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub image: Option<String>,
}

impl User {
    /// Overwrite name and email, and the avatar when one is given.
    pub fn apply_update(&mut self, update: UpdateUser) {
        self.name = update.name;
        self.email = update.email;
        if update.image.is_some() {
            self.image = update.image;
        }
    }
}
