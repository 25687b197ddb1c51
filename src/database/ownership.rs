use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::auth::EffectiveTenant;

/// Tenant-owned lookup tables a request payload may reference by id. The
/// table name and its academy column always come from this enum, never
/// from caller-supplied strings; adding a table here is the only way to
/// put it under ownership validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedTable {
    Positions,
    Categories,
    Branches,
    EventTypes,
    PaymentConcepts,
}

impl OwnedTable {
    pub fn table(self) -> &'static str {
        match self {
            OwnedTable::Positions => "positions",
            OwnedTable::Categories => "categories",
            OwnedTable::Branches => "branches",
            OwnedTable::EventTypes => "event_types",
            OwnedTable::PaymentConcepts => "payment_concepts",
        }
    }

    /// Column holding the owning academy id. Uniform across the current
    /// schema; kept per table so a divergent legacy table can be mapped
    /// without touching call sites.
    pub fn tenant_column(self) -> &'static str {
        match self {
            OwnedTable::Positions
            | OwnedTable::Categories
            | OwnedTable::Branches
            | OwnedTable::EventTypes
            | OwnedTable::PaymentConcepts => "academia_id",
        }
    }
}

#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error("{table} id {id} not found")]
    MissingRow { table: &'static str, id: i64 },

    /// The row exists under another academy. The Display text matches
    /// `MissingRow` exactly: clients must not be able to tell the two
    /// apart.
    #[error("{table} id {id} not found")]
    ForeignTenant { table: &'static str, id: i64 },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Confirm that `id` in `table` belongs to the effective academy. Must
/// complete before any read or write uses the reference; the caller awaits
/// the result rather than racing it against its own statements.
pub async fn assert_owned(
    pool: &PgPool,
    table: OwnedTable,
    id: i64,
    tenant: EffectiveTenant,
) -> Result<(), OwnershipError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = $1",
        table.tenant_column(),
        table.table()
    );

    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    match row {
        None => Err(OwnershipError::MissingRow {
            table: table.table(),
            id,
        }),
        Some(row) => {
            let owner: i64 = row.get(0);
            if owner == tenant.0 {
                Ok(())
            } else {
                tracing::warn!(
                    table = table.table(),
                    id,
                    owner,
                    effective = tenant.0,
                    "cross-academy reference denied"
                );
                Err(OwnershipError::ForeignTenant {
                    table: table.table(),
                    id,
                })
            }
        }
    }
}
