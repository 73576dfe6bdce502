use crate::addr::AddressSpec;
use crate::config::AdmissionConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Read-side containment query over the allowlist. Holds no mutable
/// state and never modifies entries.
#[derive(Clone)]
pub struct AdmissionEvaluator {
    db: DbPool,
}

impl AdmissionEvaluator {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// True iff at least one stored entry contains `candidate` (any-match
    /// OR; there are no deny entries). An empty allowlist answers false
    /// here; the default for that case belongs to the caller, see
    /// `AdmissionPolicy`.
    pub async fn is_allowed(&self, candidate: &AddressSpec) -> AppResult<bool> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT address FROM allowlisted_ips")
            .fetch_all(&self.db)
            .await?;

        for stored in rows {
            // Stored addresses are written in canonical form; a row that
            // no longer parses is corrupt, not a deny.
            let spec: AddressSpec = stored
                .parse()
                .map_err(|e| AppError::Internal(format!("Corrupt allowlist row '{stored}': {e}")))?;

            if spec.contains(candidate) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Caller-side admission decision: the evaluator's containment answer
/// combined with the configured empty-store default.
#[derive(Clone)]
pub struct AdmissionPolicy {
    evaluator: AdmissionEvaluator,
    allow_when_empty: bool,
}

impl AdmissionPolicy {
    pub fn new(db: DbPool, cfg: &AdmissionConfig) -> Self {
        Self {
            evaluator: AdmissionEvaluator::new(db),
            allow_when_empty: cfg.allow_when_empty,
        }
    }

    pub async fn decide(&self, candidate: &AddressSpec) -> AppResult<bool> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM allowlisted_ips")
            .fetch_one(&self.evaluator.db)
            .await?;

        if total == 0 {
            return Ok(self.allow_when_empty);
        }

        self.evaluator.is_allowed(candidate).await
    }
}
