//! # Reservations
//!
//! A reservation books one viewing slot of a flat for a prospective
//! tenant. `(flat_id, date_time)` is unique across live reservations.
//!
//! Approval lifecycle:
//! - new reservations are `Pending`
//! - `set_approved` moves to `Approved` or `Rejected`, in any direction,
//!   but never to the state the reservation is already in
//! - `cancel_reservation` removes pending or approved reservations only;
//!   a rejected reservation keeps its slot forever

use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDateTime;
use tracing::debug;

use super::database::Database;
use super::errors::{StoreError, StoreResult};
use super::table::{EntityKind, Id, Row, Table};
use super::transaction::{Held, Transaction};

/// Approval state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Approval {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Approval {
    /// `None` while pending.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Approval::Pending => None,
            Approval::Approved => Some(true),
            Approval::Rejected => Some(false),
        }
    }
}

impl From<bool> for Approval {
    fn from(approved: bool) -> Self {
        if approved {
            Approval::Approved
        } else {
            Approval::Rejected
        }
    }
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Approval::Pending => "pending",
            Approval::Approved => "approved",
            Approval::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: Id,
    pub flat_id: Id,
    pub date_time: NaiveDateTime,
    pub prospective_tenant_id: Id,
    pub approval: Approval,
}

/// Fields of a reservation before insertion
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub flat_id: Id,
    pub date_time: NaiveDateTime,
    pub prospective_tenant_id: Id,
}

impl Row for Reservation {
    type Draft = NewReservation;
    type Key = (Id, NaiveDateTime);

    const KIND: EntityKind = EntityKind::Reservation;
    const REFERENCES: &'static [EntityKind] = &[EntityKind::Tenant, EntityKind::Flat];
    const DEPENDENTS: &'static [EntityKind] = &[];

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: NewReservation) -> Self {
        Self {
            id,
            flat_id: draft.flat_id,
            date_time: draft.date_time,
            prospective_tenant_id: draft.prospective_tenant_id,
            approval: Approval::Pending,
        }
    }

    fn unique_key(&self) -> Option<(Id, NaiveDateTime)> {
        Some((self.flat_id, self.date_time))
    }

    fn references(&self) -> Vec<(EntityKind, Id)> {
        vec![
            (EntityKind::Flat, self.flat_id),
            (EntityKind::Tenant, self.prospective_tenant_id),
        ]
    }

    fn table(db: &Database) -> &Table<Self> {
        &db.reservations
    }

    fn held<'a, 'db>(tx: &'a mut Transaction<'db>) -> &'a mut Held<'db, Self> {
        &mut tx.reservations
    }
}

impl Transaction<'_> {
    /// Book a slot. Fails if the flat or tenant is unknown or the slot is taken.
    pub fn insert_reservation(
        &mut self,
        flat_id: Id,
        date_time: NaiveDateTime,
        prospective_tenant_id: Id,
    ) -> StoreResult<Reservation> {
        self.insert::<Reservation>(NewReservation {
            flat_id,
            date_time,
            prospective_tenant_id,
        })
    }

    /// Reservations of `flat_id` whose slot falls inside `range`, in insertion order.
    pub fn reservations_by_flat_and_range(
        &mut self,
        flat_id: Id,
        range: RangeInclusive<NaiveDateTime>,
    ) -> StoreResult<Vec<Reservation>> {
        Ok(self
            .read::<Reservation>()?
            .iter()
            .filter(|r| r.flat_id == flat_id && range.contains(&r.date_time))
            .cloned()
            .collect())
    }

    /// Approve or reject a reservation.
    ///
    /// Setting the state the reservation already has is rejected.
    pub fn set_approved(&mut self, id: Id, approved: bool) -> StoreResult<Reservation> {
        let target = Approval::from(approved);
        self.update::<Reservation>(id, |current| {
            if current.approval == target {
                return Err(StoreError::precondition(format!(
                    "reservation {} is already {}",
                    id, target
                )));
            }
            Ok(Reservation {
                approval: target,
                ..current.clone()
            })
        })
    }

    /// Remove a pending or approved reservation, returning it.
    pub fn cancel_reservation(&mut self, id: Id) -> StoreResult<Reservation> {
        let rows = self.write::<Reservation>()?;
        let index = rows.position(id).ok_or(StoreError::NotFound {
            kind: EntityKind::Reservation,
            id,
        })?;
        if rows.get(id).map(|r| r.approval) == Some(Approval::Rejected) {
            return Err(StoreError::precondition(format!(
                "reservation {} was rejected and cannot be cancelled",
                id
            )));
        }

        let removed = rows.remove(index);
        debug!(id, "reservation cancelled");
        Ok(removed)
    }
}
