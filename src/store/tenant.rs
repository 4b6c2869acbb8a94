//! Tenants: people living in a flat or looking to move in.

use super::database::Database;
use super::errors::StoreResult;
use super::table::{EntityKind, Id, Row, Table};
use super::transaction::{Held, Transaction};

/// A tenant. Immutable once created; `name` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: Id,
    pub name: String,
}

impl Row for Tenant {
    type Draft = String;
    type Key = String;

    const KIND: EntityKind = EntityKind::Tenant;
    const REFERENCES: &'static [EntityKind] = &[];
    const DEPENDENTS: &'static [EntityKind] = &[EntityKind::Flat, EntityKind::Reservation];

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, name: String) -> Self {
        Self { id, name }
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn references(&self) -> Vec<(EntityKind, Id)> {
        Vec::new()
    }

    fn table(db: &Database) -> &Table<Self> {
        &db.tenants
    }

    fn held<'a, 'db>(tx: &'a mut Transaction<'db>) -> &'a mut Held<'db, Self> {
        &mut tx.tenants
    }
}

impl Transaction<'_> {
    /// Insert a tenant. Fails if the name is taken (exact, case-sensitive).
    pub fn insert_tenant(&mut self, name: impl Into<String>) -> StoreResult<Tenant> {
        self.insert::<Tenant>(name.into())
    }
}
