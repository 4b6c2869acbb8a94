//! Flats and their current tenant.

use super::database::Database;
use super::errors::StoreResult;
use super::table::{EntityKind, Id, Row, Table};
use super::transaction::{Held, Transaction};

/// A flat. The address is free text and need not be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat {
    pub id: Id,
    pub address: String,
    pub current_tenant_id: Id,
}

/// Fields of a flat before insertion
#[derive(Debug, Clone)]
pub struct NewFlat {
    pub address: String,
    pub current_tenant_id: Id,
}

impl Row for Flat {
    type Draft = NewFlat;
    type Key = ();

    const KIND: EntityKind = EntityKind::Flat;
    const REFERENCES: &'static [EntityKind] = &[EntityKind::Tenant];
    const DEPENDENTS: &'static [EntityKind] = &[EntityKind::Reservation];

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: NewFlat) -> Self {
        Self {
            id,
            address: draft.address,
            current_tenant_id: draft.current_tenant_id,
        }
    }

    fn unique_key(&self) -> Option<()> {
        None
    }

    fn references(&self) -> Vec<(EntityKind, Id)> {
        vec![(EntityKind::Tenant, self.current_tenant_id)]
    }

    fn table(db: &Database) -> &Table<Self> {
        &db.flats
    }

    fn held<'a, 'db>(tx: &'a mut Transaction<'db>) -> &'a mut Held<'db, Self> {
        &mut tx.flats
    }
}

impl Transaction<'_> {
    /// Insert a flat owned by an existing tenant.
    pub fn insert_flat(
        &mut self,
        address: impl Into<String>,
        current_tenant_id: Id,
    ) -> StoreResult<Flat> {
        self.insert::<Flat>(NewFlat {
            address: address.into(),
            current_tenant_id,
        })
    }
}
