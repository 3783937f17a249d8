use svcprism_core::error::Result;
use svcprism_core::protocol::response::Metadata;
use svcprism_core::protocol::subject::validate_token;
use uuid::Uuid;

/// Who this service instance is. Immutable once the registry owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    /// Shared by every instance of the service.
    pub name: String,
    /// Unique per process.
    pub id: String,
    pub version: String,
    pub description: String,
    pub metadata: Metadata,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            version: version.into(),
            description: String::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Fresh instance id (uuid v4, no hyphens).
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Name and id are embedded in discovery subjects, so both must be
    /// non-empty single tokens.
    pub fn validate(&self) -> Result<()> {
        validate_token("service.name", &self.name)?;
        validate_token("service.id", &self.id)?;
        Ok(())
    }
}
