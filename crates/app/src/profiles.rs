//! Profiles
//!
//! Contact details a signed-in customer keeps on file. They prefill enquiry forms and are
//! listed for the administrator.

use std::sync::Arc;

use catalog::{enquiry::ProductEnquiry, normalize::RawRecord};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::{
    auth::Identity,
    store::{DocumentStore, PROFILES, StoreError},
};

const DEFAULT_COUNTRY: &str = "India";

/// Profile errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A required field was left blank.
    #[error("Please enter your {0}")]
    MissingField(&'static str),

    /// The stored document is not a profile.
    #[error("invalid profile document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// The store call failed.
    #[error("Failed to save profile: {0}")]
    Store(#[from] StoreError),
}

/// The editable part of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    /// Full name (required)
    pub full_name: String,

    /// Phone number (required)
    pub phone: String,

    /// Company
    pub company_name: String,

    /// Job title
    pub designation: String,

    /// City
    pub city: String,

    /// State or province
    pub state: String,

    /// Country
    pub country: String,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            company_name: String::new(),
            designation: String::new(),
            city: String::new(),
            state: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl ProfileForm {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingField`] for a blank full name or phone number.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.full_name.trim().is_empty() {
            return Err(ProfileError::MissingField("full name"));
        }

        if self.phone.trim().is_empty() {
            return Err(ProfileError::MissingField("phone number"));
        }

        Ok(())
    }

    fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
            designation: self.designation.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// A stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Owner's user id
    pub uid: String,

    /// Owner's email
    #[serde(default)]
    pub email: Option<String>,

    /// Owner's display name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Form fields
    #[serde(flatten)]
    pub form: ProfileForm,

    /// Whether the required fields have been filled in
    #[serde(default)]
    pub profile_complete: bool,

    /// Last save, milliseconds since the epoch
    #[serde(default)]
    pub updated_at: Option<i64>,

    /// First save, milliseconds since the epoch
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Profile {
    /// Fills blank contact fields of an enquiry form from the profile.
    pub fn prefill(&self, enquiry: &mut ProductEnquiry) {
        if enquiry.name.trim().is_empty() {
            enquiry.name.clone_from(&self.form.full_name);
        }

        if enquiry.phone.trim().is_empty() {
            enquiry.phone.clone_from(&self.form.phone);
        }

        let blank_email = enquiry.email.trim().is_empty();

        if let Some(email) = self.email.as_ref().filter(|_| blank_email) {
            enquiry.email.clone_from(email);
        }
    }

    fn from_record(record: RawRecord) -> Result<Self, ProfileError> {
        let mut fields = record.fields;

        fields
            .entry("uid")
            .or_insert_with(|| Value::from(record.id));

        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Reads and writes profiles.
#[derive(Clone)]
pub struct ProfilesService {
    documents: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for ProfilesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilesService").finish_non_exhaustive()
    }
}

impl ProfilesService {
    /// Create a service over `documents`.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// The profile of user `uid`, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns an error when the store call fails or the document is malformed.
    pub async fn load(&self, uid: &str) -> Result<Option<Profile>, ProfileError> {
        self.documents
            .get(PROFILES, uid)
            .await?
            .map(Profile::from_record)
            .transpose()
    }

    /// Every saved profile, for the administrator.
    ///
    /// # Errors
    ///
    /// Returns an error when the store call fails or a document is malformed.
    pub async fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        self.documents
            .list_all(PROFILES)
            .await?
            .into_iter()
            .map(Profile::from_record)
            .collect()
    }

    /// Validate and merge `form` into the user's profile. The creation time is written only
    /// the first time.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingField`] before any store call when validation fails,
    /// or [`ProfileError::Store`] when a store call fails.
    #[tracing::instrument(skip(self, identity, form), fields(uid = %identity.uid))]
    pub async fn save(
        &self,
        identity: &Identity,
        form: &ProfileForm,
        now: Timestamp,
    ) -> Result<Profile, ProfileError> {
        form.validate()?;

        let existing = self.documents.get(PROFILES, &identity.uid).await?;
        let now = now.as_millisecond();

        let profile = Profile {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            form: form.trimmed(),
            profile_complete: true,
            updated_at: Some(now),
            created_at: existing.is_none().then_some(now),
        };

        let value = serde_json::to_value(&profile)?;
        let mut fields: Map<String, Value> = serde_json::from_value(value)?;

        if profile.created_at.is_none() {
            fields.remove("createdAt");
        }

        self.documents.set(PROFILES, &identity.uid, fields).await?;

        info!(new = existing.is_none(), "saved profile");

        Ok(profile)
    }
}
