//! Doctor directory: the `/doctors` page and the wizard's first step

use crate::context::AppContext;
use crate::error::AppResult;
use hms_core::{specialties, DoctorQuery, DoctorRecord};
use tracing::debug;

/// Loaded doctors plus the search/specialty filter
#[derive(Debug, Clone, Default)]
pub struct DoctorDirectory {
    doctors: Vec<DoctorRecord>,
    query: DoctorQuery,
}

impl DoctorDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `GET /api/doctors`; the query is kept
    pub async fn load(&mut self, ctx: &AppContext) -> AppResult<usize> {
        let doctors = ctx
            .call(|api, token| async move { api.doctors(&token).await })
            .await?;
        debug!(count = doctors.len(), "doctors loaded");
        self.doctors = doctors;
        Ok(self.doctors.len())
    }

    /// Replace the list without a request
    pub fn set_doctors(&mut self, doctors: Vec<DoctorRecord>) {
        self.doctors = doctors;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    /// `None` or `"all"` shows every specialty
    pub fn set_specialty(&mut self, specialty: Option<&str>) {
        self.query.specialty = specialty
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
            .map(str::to_string);
    }

    #[must_use]
    pub fn query(&self) -> &DoctorQuery {
        &self.query
    }

    /// Every loaded doctor
    #[must_use]
    pub fn all(&self) -> &[DoctorRecord] {
        &self.doctors
    }

    /// Doctors passing the query
    #[must_use]
    pub fn visible(&self) -> Vec<&DoctorRecord> {
        self.doctors.iter().filter(|d| self.query.matches(d)).collect()
    }

    /// Specialty options, after the implicit "all"
    #[must_use]
    pub fn specialties(&self) -> Vec<String> {
        specialties(&self.doctors)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&DoctorRecord> {
        self.doctors.iter().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hms_test_utils::doctor_record;

    fn directory() -> DoctorDirectory {
        let mut dir = DoctorDirectory::new();
        dir.set_doctors(vec![
            doctor_record("d-1", "Alice", "Cardiology"),
            doctor_record("d-2", "Gregory House", "Diagnostics"),
            doctor_record("d-3", "Bea Cardoso", "Cardiology"),
        ]);
        dir
    }

    fn names(dir: &DoctorDirectory) -> Vec<&str> {
        dir.visible().iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn search_covers_name_and_specialty() {
        let mut dir = directory();
        dir.set_search("card");
        assert_eq!(names(&dir), ["Alice", "Bea Cardoso"]);
        dir.set_search("HOUSE");
        assert_eq!(names(&dir), ["Gregory House"]);
    }

    #[test]
    fn specialty_filter() {
        let mut dir = directory();
        assert_eq!(dir.specialties(), ["Cardiology", "Diagnostics"]);
        dir.set_specialty(Some("Diagnostics"));
        assert_eq!(names(&dir), ["Gregory House"]);
        dir.set_specialty(Some("all"));
        assert_eq!(dir.visible().len(), 3);
    }
}
