//! Profile pages
//!
//! Edits go to a draft copy; the saved copy changes only on an explicit save.

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use hms_core::{DoctorProfileFields, DoctorRecord, PatientRecord, ValidationError};
use tracing::info;

/// Saved value plus an optional in-progress edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft<T> {
    saved: T,
    editing: Option<T>,
}

impl<T: Clone> Draft<T> {
    #[must_use]
    pub fn new(saved: T) -> Self {
        Self {
            saved,
            editing: None,
        }
    }

    #[must_use]
    pub fn saved(&self) -> &T {
        &self.saved
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Start editing from the saved value; an edit already in progress is kept
    pub fn begin_edit(&mut self) -> &mut T {
        self.editing.get_or_insert_with(|| self.saved.clone())
    }

    pub fn draft(&self) -> Option<&T> {
        self.editing.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut T> {
        self.editing.as_mut()
    }

    /// Drop the edit
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Replace the saved value and end editing
    pub fn commit(&mut self, saved: T) {
        self.saved = saved;
        self.editing = None;
    }
}

/// `/profile/doctor`
#[derive(Debug, Clone, Default)]
pub struct DoctorProfileEditor {
    profile: Option<Draft<DoctorProfileFields>>,
}

impl DoctorProfileEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `GET /api/doctors/me`; any edit in progress is discarded
    pub async fn load(&mut self, ctx: &AppContext) -> AppResult<&DoctorProfileFields> {
        let record = ctx
            .call(|api, token| async move { api.my_doctor_profile(&token).await })
            .await?;
        let profile = self
            .profile
            .insert(Draft::new(DoctorProfileFields::from_record(&record)));
        Ok(profile.saved())
    }

    #[must_use]
    pub fn saved(&self) -> Option<&DoctorProfileFields> {
        self.profile.as_ref().map(Draft::saved)
    }

    #[must_use]
    pub fn draft(&self) -> Option<&DoctorProfileFields> {
        self.profile.as_ref().and_then(Draft::draft)
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.profile.as_ref().is_some_and(Draft::is_editing)
    }

    pub fn begin_edit(&mut self) -> AppResult<()> {
        self.loaded_mut()?.begin_edit();
        Ok(())
    }

    /// Change one draft field by form name
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> AppResult<()> {
        let draft = self
            .loaded_mut()?
            .draft_mut()
            .ok_or(AppError::InvalidStep { expected: "edit" })?;
        if draft.set(field, value) {
            Ok(())
        } else {
            Err(ValidationError::unrecognized("profile field", field).into())
        }
    }

    pub fn cancel(&mut self) {
        if let Some(profile) = &mut self.profile {
            profile.cancel();
        }
    }

    /// Send `PUT /api/doctors/me`; the draft is committed only on success
    pub async fn save(&mut self, ctx: &AppContext) -> AppResult<&DoctorProfileFields> {
        let draft = self
            .loaded_mut()?
            .draft()
            .cloned()
            .ok_or(AppError::InvalidStep { expected: "edit" })?;
        hms_core::error::require("name", &draft.name)?;

        let updated: DoctorRecord = ctx
            .call(|api, token| async move { api.update_doctor_profile(&token, &draft).await })
            .await?;
        info!(doctor_id = %updated.id, "doctor profile saved");

        let profile = self.loaded_mut()?;
        profile.commit(DoctorProfileFields::from_record(&updated));
        Ok(profile.saved())
    }

    fn loaded_mut(&mut self) -> AppResult<&mut Draft<DoctorProfileFields>> {
        self.profile
            .as_mut()
            .ok_or(AppError::InvalidStep { expected: "loaded profile" })
    }
}

/// Locally editable patient fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientProfileFields {
    pub name: String,
    pub contact: String,
}

/// `/patient/profile`
///
/// The backend has no update endpoint, so saving only replaces the local copy.
#[derive(Debug, Clone, Default)]
pub struct PatientProfileView {
    record: Option<PatientRecord>,
    fields: Option<Draft<PatientProfileFields>>,
}

impl PatientProfileView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `GET /api/auth/me/patient`
    pub async fn load(&mut self, ctx: &AppContext) -> AppResult<&PatientRecord> {
        let record = ctx
            .call(|api, token| async move { api.my_patient_profile(&token).await })
            .await?;
        self.fields = Some(Draft::new(PatientProfileFields {
            name: record.name.clone(),
            contact: record.contact.clone(),
        }));
        Ok(self.record.insert(record))
    }

    #[must_use]
    pub fn record(&self) -> Option<&PatientRecord> {
        self.record.as_ref()
    }

    /// Draft editor once loaded
    pub fn fields_mut(&mut self) -> Option<&mut Draft<PatientProfileFields>> {
        self.fields.as_mut()
    }

    #[must_use]
    pub fn fields(&self) -> Option<&Draft<PatientProfileFields>> {
        self.fields.as_ref()
    }

    /// Commit the draft locally
    pub fn save_local(&mut self) -> AppResult<()> {
        let fields = self
            .fields
            .as_mut()
            .ok_or(AppError::InvalidStep { expected: "loaded profile" })?;
        let draft = fields
            .draft()
            .cloned()
            .ok_or(AppError::InvalidStep { expected: "edit" })?;
        hms_core::error::require("name", &draft.name)?;
        hms_core::error::require("contact", &draft.contact)?;
        fields.commit(draft);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::MemoryStorage;
    use hms_core::Session;
    use hms_test_utils::{
        doctor_record, doctor_user, patient_record, patient_user, seeded_api, Endpoint, FakeApi,
    };
    use std::sync::Arc;

    fn signed_in(api: &Arc<FakeApi>, user: hms_core::UserProfile) -> AppContext {
        let ctx = AppContext::new(api.clone(), Arc::new(MemoryStorage::new()), AppConfig::default());
        let token = api.issue_token(user.clone());
        ctx.sign_in(Session::new(token, user)).unwrap();
        ctx
    }

    #[test]
    fn draft_lifecycle() {
        let mut draft = Draft::new(1);
        *draft.begin_edit() = 5;
        assert_eq!(*draft.saved(), 1);
        assert_eq!(draft.draft(), Some(&5));

        // a second begin keeps the in-progress value
        assert_eq!(*draft.begin_edit(), 5);
        draft.cancel();
        assert!(!draft.is_editing());
        assert_eq!(*draft.saved(), 1);

        draft.begin_edit();
        draft.commit(7);
        assert_eq!(*draft.saved(), 7);
        assert!(!draft.is_editing());
    }

    #[tokio::test]
    async fn doctor_edit_cancel_and_save() {
        let api = Arc::new(seeded_api());
        let ctx = signed_in(&api, doctor_user(&doctor_record("d-1", "Alice", "Cardiology")));
        let mut editor = DoctorProfileEditor::new();
        assert!(editor.begin_edit().is_err());

        editor.load(&ctx).await.unwrap();
        editor.begin_edit().unwrap();
        editor.set_field("department", "Cardiac Care").unwrap();
        assert!(editor.set_field("salary", "lots").is_err());
        assert_eq!(editor.saved().unwrap().department, "");

        editor.cancel();
        assert!(!editor.is_editing());
        assert_eq!(api.call_count(Endpoint::UpdateDoctorProfile), 0);

        editor.begin_edit().unwrap();
        editor.set_field("bio", "Twenty years in cardiology").unwrap();
        let saved = editor.save(&ctx).await.unwrap();
        assert_eq!(saved.bio, "Twenty years in cardiology");
        assert!(!editor.is_editing());
    }

    #[tokio::test]
    async fn failed_save_keeps_draft() {
        let api = Arc::new(seeded_api());
        let ctx = signed_in(&api, doctor_user(&doctor_record("d-1", "Alice", "Cardiology")));
        let mut editor = DoctorProfileEditor::new();
        editor.load(&ctx).await.unwrap();
        editor.begin_edit().unwrap();
        editor.set_field("phone", "555-7777").unwrap();

        api.reject(Endpoint::UpdateDoctorProfile, 422, "Invalid phone number");
        let err = editor.save(&ctx).await.unwrap_err();
        assert_eq!(err.user_message("Failed to update profile"), "Invalid phone number");
        assert_eq!(editor.draft().unwrap().phone, "555-7777");
        assert_eq!(editor.saved().unwrap().phone, "555-0199");
    }

    #[tokio::test]
    async fn patient_profile_is_local_only() {
        let api = Arc::new(seeded_api());
        let ctx = signed_in(&api, patient_user(&patient_record("p-1", "Bob", "555-0100")));
        let mut view = PatientProfileView::new();
        assert_eq!(view.load(&ctx).await.unwrap().name, "Bob");

        view.fields_mut().unwrap().begin_edit().name = "Robert".into();
        view.save_local().unwrap();
        assert_eq!(view.fields().unwrap().saved().name, "Robert");
        assert_eq!(view.record().unwrap().name, "Bob");
    }
}
