use std::fmt;

/// Tenant/container scoping pair sent as `accessType` and `accessId` on every
/// resource-scoped call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    pub access_type: String,
    pub access_id: String,
}

impl AccessContext {
    #[must_use]
    pub fn new(access_type: &str, access_id: &str) -> Self {
        Self {
            access_type: access_type.to_string(),
            access_id: access_id.to_string(),
        }
    }

    /// Derive the access id of a project folder.
    ///
    /// Project ids carry a one letter prefix (`b.<uuid>`), the id used for
    /// access is the part after the first `.` joined to the folder id with the
    /// configured delimiter.
    #[must_use]
    pub fn for_folder(access_type: &str, project: &str, folder: &str, delimiter: &str) -> Self {
        let project_id = project.split_once('.').map_or(project, |(_, id)| id);
        Self {
            access_type: access_type.to_string(),
            access_id: format!("{project_id}{delimiter}{folder}"),
        }
    }

    /// Query pairs in the order the API documents them.
    #[must_use]
    pub fn query_pairs(&self) -> [(&str, &str); 2] {
        [
            ("accessType", self.access_type.as_str()),
            ("accessId", self.access_id.as_str()),
        ]
    }
}

impl fmt::Display for AccessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.access_type, self.access_id)
    }
}
