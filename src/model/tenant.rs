use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subscription tiers are ordered: Free < Premium < Enterprise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Premium,
    Enterprise,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "acme",
        "name": "Acme Trading WLL",
        "tier": "premium",
        "created_at": "2026-01-01T00:00:00Z"
    })
)]
pub struct Tenant {
    #[schema(example = "acme")]
    pub id: String,

    #[schema(example = "Acme Trading WLL")]
    pub name: String,

    #[schema(example = "premium")]
    pub tier: SubscriptionTier,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(SubscriptionTier::Free < SubscriptionTier::Premium);
        assert!(SubscriptionTier::Premium < SubscriptionTier::Enterprise);
    }
}
