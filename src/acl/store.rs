use chrono::Utc;

use crate::addr::AddressSpec;
use crate::db::models::allowlist::AllowlistEntry;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Parameters for a single `list` call. One explicit struct instead of a
/// chain of lazily-built query clauses.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Clone)]
pub struct AclStore {
    db: DbPool,
}

impl AclStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Insert a new entry and return it with its assigned id and
    /// timestamp. Duplicate addresses are not an error.
    pub async fn create(
        &self,
        address: &AddressSpec,
        description: Option<&str>,
        created_by: &str,
    ) -> AppResult<AllowlistEntry> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO allowlisted_ips (address, description, created_by, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(address.to_string())
        .bind(description)
        .bind(created_by)
        .bind(now)
        .execute(&self.db)
        .await?;

        self.find(result.last_insert_rowid()).await
    }

    pub async fn find(&self, id: i64) -> AppResult<AllowlistEntry> {
        sqlx::query_as::<_, AllowlistEntry>(
            "SELECT id, address, description, created_by, created_at
             FROM allowlisted_ips WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Allowlist entry {id} not found")))
    }

    /// Replace `address` and `description` in one statement; the row is
    /// either fully updated or untouched. A concurrently deleted id is
    /// `NotFound`, never a phantom success.
    pub async fn update(
        &self,
        id: i64,
        address: &AddressSpec,
        description: Option<&str>,
    ) -> AppResult<AllowlistEntry> {
        let result =
            sqlx::query("UPDATE allowlisted_ips SET address = ?, description = ? WHERE id = ?")
                .bind(address.to_string())
                .bind(description)
                .bind(id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Allowlist entry {id} not found")));
        }

        self.find(id).await
    }

    /// Permanent removal. Of two racing deletes for the same id exactly
    /// one observes `rows_affected == 1`.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM allowlisted_ips WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Allowlist entry {id} not found")));
        }

        Ok(())
    }

    /// Newest-first listing (descending id). A blank search means "no
    /// filter"; a non-blank search matches the canonical address text
    /// exactly. Pages are 1-based and a page past the end is an empty
    /// page, not an error.
    pub async fn list(&self, query: &ListQuery) -> AppResult<Page<AllowlistEntry>> {
        let page = query.page.max(1);
        let page_size = query.page_size.max(1);
        let offset = (page - 1) * page_size;

        let filter = normalize_search(query.search.as_deref());

        let (entries, total) = match filter {
            Some(ref address) => {
                let entries = sqlx::query_as::<_, AllowlistEntry>(
                    "SELECT id, address, description, created_by, created_at
                     FROM allowlisted_ips WHERE address = ?
                     ORDER BY id DESC LIMIT ? OFFSET ?",
                )
                .bind(address)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.db)
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM allowlisted_ips WHERE address = ?")
                        .bind(address)
                        .fetch_one(&self.db)
                        .await?;

                (entries, total)
            }
            None => {
                let entries = sqlx::query_as::<_, AllowlistEntry>(
                    "SELECT id, address, description, created_by, created_at
                     FROM allowlisted_ips ORDER BY id DESC LIMIT ? OFFSET ?",
                )
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.db)
                .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM allowlisted_ips")
                    .fetch_one(&self.db)
                    .await?;

                (entries, total)
            }
        };

        Ok(Page {
            entries,
            total,
            page,
            page_size,
        })
    }
}

/// Blank search → no filter. Search text that parses as an address is
/// compared in canonical form, so `10.0.0.1/32` finds entries stored as
/// `10.0.0.1`; anything else is compared literally and matches nothing.
fn normalize_search(search: Option<&str>) -> Option<String> {
    let s = search?.trim();
    if s.is_empty() {
        return None;
    }

    Some(match s.parse::<AddressSpec>() {
        Ok(spec) => spec.to_string(),
        Err(_) => s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_no_filter() {
        assert_eq!(normalize_search(None), None);
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(Some("   ")), None);
    }

    #[test]
    fn search_text_is_canonicalized_when_parseable() {
        assert_eq!(
            normalize_search(Some("10.0.0.1/32")),
            Some("10.0.0.1".to_string())
        );
        assert_eq!(
            normalize_search(Some(" 10.0.0.5/24 ")),
            Some("10.0.0.0/24".to_string())
        );
        assert_eq!(
            normalize_search(Some("not-an-ip")),
            Some("not-an-ip".to_string())
        );
    }
}
