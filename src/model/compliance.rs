use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wage-protection settings a tenant must configure before its first
/// payroll run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplianceSettings {
    #[schema(example = "EST-10021")]
    pub establishment_id: String,

    #[schema(example = "Doha Bank")]
    pub bank_name: String,

    #[schema(example = "QA58DOHB00009876543210ABCDEFG")]
    pub payer_iban: String,
}
