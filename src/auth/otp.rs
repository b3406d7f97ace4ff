use std::time::Duration;

use moka::future::Cache;
use rand::Rng;
use tracing::info;

/// Outcome of issuing a one-time code; delivery itself is an external
/// collaborator's problem.
pub struct IssueOutcome {
    pub success: bool,
    pub message: String,
}

/// One-time login codes, keyed by `{tenant}:{email}`. The cache TTL is the
/// expiry window; successful verification deletes the entry so a code is
/// single-use.
pub struct OtpService {
    codes: Cache<String, String>,
}

impl OtpService {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            codes: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build(),
        }
    }

    fn key(tenant_id: &str, email: &str) -> String {
        format!("{}:{}", tenant_id, email.to_lowercase())
    }

    pub async fn issue(&self, tenant_id: &str, email: &str) -> IssueOutcome {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.codes.insert(Self::key(tenant_id, email), code).await;

        // Delivery (email/SMS) is out-of-process; the code is only ever
        // readable through verification.
        info!(tenant_id, email, "Issued one-time login code");
        IssueOutcome {
            success: true,
            message: "Verification code sent".to_string(),
        }
    }

    /// Returns true and consumes the code when it matches.
    pub async fn verify(&self, tenant_id: &str, email: &str, code: &str) -> bool {
        let key = Self::key(tenant_id, email);
        match self.codes.get(&key).await {
            Some(stored) if stored == code => {
                self.codes.invalidate(&key).await;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub async fn issue_fixed(&self, tenant_id: &str, email: &str, code: &str) {
        self.codes
            .insert(Self::key(tenant_id, email), code.to_string())
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn codes_are_single_use() {
        let otp = OtpService::new(300);
        otp.issue_fixed("demo", "a@b.c", "123456").await;

        assert!(otp.verify("demo", "a@b.c", "123456").await);
        // consumed on first success
        assert!(!otp.verify("demo", "a@b.c", "123456").await);
    }

    #[actix_web::test]
    async fn wrong_code_does_not_consume() {
        let otp = OtpService::new(300);
        otp.issue_fixed("demo", "a@b.c", "123456").await;

        assert!(!otp.verify("demo", "a@b.c", "000000").await);
        assert!(otp.verify("demo", "a@b.c", "123456").await);
    }

    #[actix_web::test]
    async fn codes_are_tenant_scoped() {
        let otp = OtpService::new(300);
        otp.issue_fixed("demo", "a@b.c", "123456").await;
        assert!(!otp.verify("other", "a@b.c", "123456").await);
    }
}
