use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Write-once log entry. The trail has no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: String,

    pub actor_id: String,

    #[schema(example = "Jane Admin")]
    pub actor_name: String,

    #[schema(example = "employee.create")]
    pub action: String,

    #[schema(example = "Created employee John Doe")]
    pub detail: String,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub at: DateTime<Utc>,
}

/// Actor identity attached to every audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Actor {
    pub id: String,
    pub name: String,
}
