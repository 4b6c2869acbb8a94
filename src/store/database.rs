//! # Database
//!
//! Owns the three tables. Constructed once at startup and shared by
//! reference; tests build isolated instances.

use tracing::info;

use super::errors::StoreResult;
use super::table::{EntityKind, Table};
use super::transaction::{LockMode, Transaction};
use super::{Flat, Reservation, Tenant};

/// The in-memory database: one table per entity kind.
#[derive(Debug, Default)]
pub struct Database {
    pub(crate) tenants: Table<Tenant>,
    pub(crate) flats: Table<Flat>,
    pub(crate) reservations: Table<Reservation>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a unit of work. Locks are taken lazily and released together
    /// when the returned transaction is dropped.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Run `f` inside a fresh transaction.
    pub fn transactional<T>(
        &self,
        f: impl FnOnce(&mut Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut tx = self.begin();
        let result = f(&mut tx);
        tx.commit();
        result
    }

    /// Empty every table, dependents first.
    ///
    /// All three tables are write-locked up front in lock order, so no
    /// concurrent transaction can observe or insert into a half-cleared
    /// database. Sequences are not reset.
    pub fn reset(&self) -> StoreResult<()> {
        self.transactional(|tx| {
            for kind in [EntityKind::Tenant, EntityKind::Flat, EntityKind::Reservation] {
                tx.lock(kind, LockMode::Write)?;
            }
            tx.delete_all::<Reservation>()?;
            tx.delete_all::<Flat>()?;
            tx.delete_all::<Tenant>()
        })?;
        info!("database reset");
        Ok(())
    }
}
