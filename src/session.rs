//! Process-scoped session state.
//!
//! Replaces implicit framework-managed state with an explicit store,
//! initialized empty at session start and accessed from a single logical
//! thread of control. Uploads are keyed by a stable id issued at
//! registration, never by file name, so two uploads with identical names
//! stay independent.

use crate::codec::UploadedFile;
use crate::table::Table;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Picture formats accepted by the profile form.
const PICTURE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Unknown upload id {0}")]
    UnknownUpload(UploadId),

    #[error("Unsupported picture format '{0}'")]
    UnsupportedPictureFormat(String),
}

/// Stable identifier for one upload within a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId(u64);

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded file together with its current decoded table, if any.
/// The table is replaced by each pipeline run and dropped with the upload.
#[derive(Debug)]
pub struct UploadEntry {
    pub file: UploadedFile,
    pub table: Option<Table>,
}

/// Preferred learning style on the profile form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LearningStyle {
    Visual,
    ReadingWriting,
    HandsOn,
    Listening,
}

impl LearningStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::ReadingWriting => "Reading/Writing",
            LearningStyle::HandsOn => "Hands-on",
            LearningStyle::Listening => "Listening",
        }
    }
}

/// One submission of the profile form.
#[derive(Clone, Debug)]
pub struct ProfileSubmission {
    pub name: String,
    pub goal: String,
    pub bio: String,
    pub interests: String,
    pub email: String,
    pub learning_style: LearningStyle,
    /// Optional picture upload as (file name, content)
    pub picture: Option<(String, Vec<u8>)>,
}

/// Per-user profile record, held only for the session.
#[derive(Clone, Debug)]
pub struct Profile {
    pub goal: String,
    pub learning_style: LearningStyle,
    pub effort_score: u32,
    pub learning_score: u32,
    pub badges: Vec<String>,
    pub picture: Option<Vec<u8>>,
    pub bio: String,
    pub interests: String,
    pub email: String,
}

/// In-memory store for one session: uploads and profile records.
#[derive(Debug, Default)]
pub struct SessionStore {
    next_upload_id: u64,
    uploads: HashMap<UploadId, UploadEntry>,
    profiles: HashMap<String, Profile>,
}

impl SessionStore {
    pub fn new() -> SessionStore {
        SessionStore::default()
    }

    /// Registers an upload and returns its stable id.
    pub fn register_upload(&mut self, file: UploadedFile) -> UploadId {
        let id = UploadId(self.next_upload_id);
        self.next_upload_id += 1;
        debug!(%id, name = file.name(), size = file.size(), "registered upload");
        self.uploads.insert(id, UploadEntry { file, table: None });
        id
    }

    pub fn upload(&self, id: UploadId) -> Option<&UploadEntry> {
        self.uploads.get(&id)
    }

    /// Replaces the current table of an upload.
    pub fn put_table(&mut self, id: UploadId, table: Table) -> Result<(), SessionError> {
        let entry = self
            .uploads
            .get_mut(&id)
            .ok_or(SessionError::UnknownUpload(id))?;
        entry.table = Some(table);
        Ok(())
    }

    pub fn table(&self, id: UploadId) -> Option<&Table> {
        self.uploads.get(&id).and_then(|entry| entry.table.as_ref())
    }

    /// Discards one upload and its derived table.
    pub fn remove_upload(&mut self, id: UploadId) -> Option<UploadEntry> {
        self.uploads.remove(&id)
    }

    /// Discards all uploads, e.g. when the file list changes.
    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
    }

    pub fn upload_ids(&self) -> Vec<UploadId> {
        let mut ids: Vec<UploadId> = self.uploads.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Applies a profile form submission.
    ///
    /// The first submission for a name creates the record. Later submissions
    /// overwrite only the picture, bio, interests and email fields; goal,
    /// learning style, scores and badges are kept. Last write wins per field.
    pub fn submit_profile(&mut self, submission: ProfileSubmission) -> Result<&Profile, SessionError> {
        let picture = submission
            .picture
            .map(|(name, content)| {
                if is_supported_picture(&name) {
                    Ok(content)
                } else {
                    Err(SessionError::UnsupportedPictureFormat(name))
                }
            })
            .transpose()?;

        let profile = self
            .profiles
            .entry(submission.name)
            .or_insert_with(|| Profile {
                goal: submission.goal,
                learning_style: submission.learning_style,
                effort_score: 0,
                learning_score: 0,
                badges: Vec::new(),
                picture: None,
                bio: String::new(),
                interests: String::new(),
                email: String::new(),
            });
        if let Some(picture) = picture {
            profile.picture = Some(picture);
        }
        profile.bio = submission.bio;
        profile.interests = submission.interests;
        profile.email = submission.email;
        Ok(profile)
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Adds to a user's effort score.
    pub fn record_effort(&mut self, name: &str, points: u32) -> bool {
        match self.profiles.get_mut(name) {
            Some(profile) => {
                profile.effort_score += points;
                true
            }
            None => false,
        }
    }

    /// Adds to a user's learning score.
    pub fn record_learning(&mut self, name: &str, points: u32) -> bool {
        match self.profiles.get_mut(name) {
            Some(profile) => {
                profile.learning_score += points;
                true
            }
            None => false,
        }
    }

    /// Awards a badge once; re-awarding the same badge is a no-op.
    pub fn award_badge(&mut self, name: &str, badge: &str) -> bool {
        match self.profiles.get_mut(name) {
            Some(profile) => {
                if !profile.badges.iter().any(|it| it == badge) {
                    profile.badges.push(badge.to_owned());
                }
                true
            }
            None => false,
        }
    }
}

fn is_supported_picture(name: &str) -> bool {
    crate::codec::extension_of(name)
        .map(|extension| PICTURE_EXTENSIONS.contains(&extension.as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str) -> ProfileSubmission {
        ProfileSubmission {
            name: name.to_owned(),
            goal: "learn rust".to_owned(),
            bio: "bio".to_owned(),
            interests: "data".to_owned(),
            email: "a@example.com".to_owned(),
            learning_style: LearningStyle::HandsOn,
            picture: None,
        }
    }

    #[test]
    fn duplicate_upload_names_stay_independent() {
        let mut store = SessionStore::new();
        let first = store.register_upload(UploadedFile::new("data.csv", b"a\n1\n".to_vec()));
        let second = store.register_upload(UploadedFile::new("data.csv", b"b\n2\n".to_vec()));
        assert_ne!(first, second);
        assert_eq!(store.upload(first).unwrap().file.content(), b"a\n1\n");
        assert_eq!(store.upload(second).unwrap().file.content(), b"b\n2\n");
    }

    #[test]
    fn put_table_requires_known_upload() {
        let mut store = SessionStore::new();
        let id = store.register_upload(UploadedFile::new("data.csv", Vec::new()));
        store.remove_upload(id);
        let result = store.put_table(id, Table::new(Vec::new()));
        assert!(matches!(result, Err(SessionError::UnknownUpload(_))));
    }

    #[test]
    fn table_is_replaced_per_run() {
        let mut store = SessionStore::new();
        let id = store.register_upload(UploadedFile::new("data.csv", Vec::new()));
        assert!(store.table(id).is_none());
        store.put_table(id, Table::new(vec!["a".to_owned()])).unwrap();
        store.put_table(id, Table::new(vec!["b".to_owned()])).unwrap();
        assert_eq!(store.table(id).unwrap().columns(), ["b"]);
    }

    #[test]
    fn resubmission_overwrites_only_form_fields() {
        let mut store = SessionStore::new();
        store.submit_profile(submission("sam")).unwrap();
        store.record_effort("sam", 5);
        store.award_badge("sam", "starter");

        let mut update = submission("sam");
        update.goal = "changed goal".to_owned();
        update.bio = "new bio".to_owned();
        update.picture = Some(("me.png".to_owned(), vec![1, 2, 3]));
        store.submit_profile(update).unwrap();

        let profile = store.profile("sam").unwrap();
        assert_eq!(profile.goal, "learn rust");
        assert_eq!(profile.bio, "new bio");
        assert_eq!(profile.effort_score, 5);
        assert_eq!(profile.badges, ["starter"]);
        assert_eq!(profile.picture.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn rejects_unsupported_picture_format() {
        let mut store = SessionStore::new();
        let mut form = submission("sam");
        form.picture = Some(("me.gif".to_owned(), vec![0]));
        let result = store.submit_profile(form);
        assert!(matches!(result, Err(SessionError::UnsupportedPictureFormat(ref name)) if name == "me.gif"));
        assert!(store.profile("sam").is_none());
    }

    #[test]
    fn badge_awarded_once() {
        let mut store = SessionStore::new();
        store.submit_profile(submission("sam")).unwrap();
        store.award_badge("sam", "starter");
        store.award_badge("sam", "starter");
        assert_eq!(store.profile("sam").unwrap().badges.len(), 1);
        assert!(!store.award_badge("nobody", "starter"));
    }
}
