use serde::Serialize;

use crate::acl::store::{AclStore, ListQuery, Page};
use crate::addr::{AddressSpec, ParseError};
use crate::db::models::allowlist::{AllowlistEntry, CreateEntryRequest, UpdateEntryRequest};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Fixed outward page size for admin listings.
pub const PAGE_SIZE: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SuperAdmin,
    Admin,
    ReadOnly,
}

impl Role {
    pub fn can_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

/// Explicit caller identity. Every facade operation takes one; there is
/// no ambient current-user state.
#[derive(Debug, Clone)]
pub struct Caller {
    pub username: String,
    pub role: Role,
}

impl Caller {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

const CREATED_NOTICE: &str = "Added new IP address to the whitelist";
const UPDATED_NOTICE: &str = "Updated IP address";
const REMOVED_NOTICE: &str = "Removed IP address from the whitelist";

/// Receipt for a successful mutation. `notice` is the confirmation text
/// the caller shows on its redirect path.
#[derive(Debug, Clone, Serialize)]
pub struct MutationReceipt {
    pub notice: &'static str,
    pub entry: Option<AllowlistEntry>,
}

/// Admin operation surface over the store. Every operation runs the same
/// fixed stage order: authorize, validate, execute.
#[derive(Clone)]
pub struct AdminFacade {
    store: AclStore,
}

impl AdminFacade {
    pub fn new(db: DbPool) -> Self {
        Self {
            store: AclStore::new(db),
        }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        search: Option<&str>,
        page: i64,
    ) -> AppResult<Page<AllowlistEntry>> {
        authorize(caller)?;

        self.store
            .list(&ListQuery {
                search: search.map(str::to_string),
                page,
                page_size: PAGE_SIZE,
            })
            .await
    }

    pub async fn create(
        &self,
        caller: &Caller,
        req: CreateEntryRequest,
    ) -> AppResult<MutationReceipt> {
        authorize(caller)?;
        let address = validate_address(&req.address)?;

        let entry = self
            .store
            .create(&address, req.description.as_deref(), &caller.username)
            .await?;

        tracing::info!(
            id = entry.id,
            address = %entry.address,
            by = %caller.username,
            "Allowlist entry created"
        );

        Ok(MutationReceipt {
            notice: CREATED_NOTICE,
            entry: Some(entry),
        })
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        req: UpdateEntryRequest,
    ) -> AppResult<MutationReceipt> {
        authorize(caller)?;
        let address = validate_address(&req.address)?;

        let entry = self
            .store
            .update(id, &address, req.description.as_deref())
            .await?;

        tracing::info!(id, address = %entry.address, by = %caller.username, "Allowlist entry updated");

        Ok(MutationReceipt {
            notice: UPDATED_NOTICE,
            entry: Some(entry),
        })
    }

    pub async fn delete(&self, caller: &Caller, id: i64) -> AppResult<MutationReceipt> {
        authorize(caller)?;

        self.store.delete(id).await?;

        tracing::info!(id, by = %caller.username, "Allowlist entry removed");

        Ok(MutationReceipt {
            notice: REMOVED_NOTICE,
            entry: None,
        })
    }

    /// Row lookup for edit forms.
    pub async fn find(&self, caller: &Caller, id: i64) -> AppResult<AllowlistEntry> {
        authorize(caller)?;
        self.store.find(id).await
    }
}

fn authorize(caller: &Caller) -> AppResult<()> {
    if caller.role.can_admin() {
        Ok(())
    } else {
        tracing::warn!(user = %caller.username, "Refused admin allowlist access");
        Err(AppError::Forbidden(
            "Admin or super_admin role required".to_string(),
        ))
    }
}

fn validate_address(raw: &str) -> AppResult<AddressSpec> {
    raw.parse().map_err(|e: ParseError| AppError::Validation {
        field: "address",
        message: e.to_string(),
    })
}
