//! # Transactions
//!
//! A transaction is the set of table locks acquired by one logical unit of
//! work. Every store operation takes `&mut Transaction`; the first access to
//! a table locks it and the guard stays in the transaction until the
//! transaction is dropped or committed, so a request that touches several
//! tables keeps all of them locked until it completes.
//!
//! Locks are re-entrant within a transaction: a table locked for write also
//! satisfies reads. Upgrading a held read lock to a write lock is refused
//! with [`StoreError::LockUpgrade`] rather than deadlocking against itself.
//!
//! The transaction does not order acquisitions. Callers touching several
//! tables lock them in [`EntityKind`] order (tenant, flat, reservation).

use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use super::database::Database;
use super::errors::{StoreError, StoreResult};
use super::table::{EntityKind, Row, Rows};
use super::{Flat, Reservation, Tenant};

/// Lock mode requested on a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Read,
    Write,
}

/// Lock state of one table inside a transaction
#[derive(Debug)]
pub enum Held<'db, R> {
    Unlocked,
    Read(RwLockReadGuard<'db, Rows<R>>),
    Write(RwLockWriteGuard<'db, Rows<R>>),
}

impl<'db, R: Row> Held<'db, R> {
    fn mode(&self) -> Option<LockMode> {
        match self {
            Held::Unlocked => None,
            Held::Read(_) => Some(LockMode::Read),
            Held::Write(_) => Some(LockMode::Write),
        }
    }
}

/// One logical unit of work against a [`Database`].
pub struct Transaction<'db> {
    db: &'db Database,
    pub(crate) tenants: Held<'db, Tenant>,
    pub(crate) flats: Held<'db, Flat>,
    pub(crate) reservations: Held<'db, Reservation>,
}

impl<'db> Transaction<'db> {
    pub(crate) fn new(db: &'db Database) -> Self {
        Self {
            db,
            tenants: Held::Unlocked,
            flats: Held::Unlocked,
            reservations: Held::Unlocked,
        }
    }

    /// Rows of `R`, locking the table for read if it is not held yet.
    pub fn read<R: Row>(&mut self) -> StoreResult<&Rows<R>> {
        let db = self.db;
        let held = R::held(self);
        if let Held::Unlocked = held {
            trace!(kind = %R::KIND, "acquiring read lock");
            *held = Held::Read(R::table(db).read()?);
        }
        match held {
            Held::Read(guard) => Ok(&**guard),
            Held::Write(guard) => Ok(&**guard),
            Held::Unlocked => unreachable!("lock acquired above"),
        }
    }

    /// Mutable rows of `R`, locking the table for write if it is not held yet.
    pub fn write<R: Row>(&mut self) -> StoreResult<&mut Rows<R>> {
        let db = self.db;
        let held = R::held(self);
        match held {
            Held::Unlocked => {
                trace!(kind = %R::KIND, "acquiring write lock");
                *held = Held::Write(R::table(db).write()?);
            }
            Held::Read(_) => return Err(StoreError::LockUpgrade { kind: R::KIND }),
            Held::Write(_) => {}
        }
        match held {
            Held::Write(guard) => Ok(&mut **guard),
            _ => unreachable!("write lock acquired above"),
        }
    }

    /// Lock a table by kind without touching its rows.
    pub fn lock(&mut self, kind: EntityKind, mode: LockMode) -> StoreResult<()> {
        match (kind, mode) {
            (EntityKind::Tenant, LockMode::Read) => self.read::<Tenant>().map(drop),
            (EntityKind::Tenant, LockMode::Write) => self.write::<Tenant>().map(drop),
            (EntityKind::Flat, LockMode::Read) => self.read::<Flat>().map(drop),
            (EntityKind::Flat, LockMode::Write) => self.write::<Flat>().map(drop),
            (EntityKind::Reservation, LockMode::Read) => self.read::<Reservation>().map(drop),
            (EntityKind::Reservation, LockMode::Write) => {
                self.write::<Reservation>().map(drop)
            }
        }
    }

    /// The mode currently held on a table, if any.
    pub fn held_mode(&self, kind: EntityKind) -> Option<LockMode> {
        match kind {
            EntityKind::Tenant => self.tenants.mode(),
            EntityKind::Flat => self.flats.mode(),
            EntityKind::Reservation => self.reservations.mode(),
        }
    }

    /// Number of tables currently locked.
    pub fn lock_count(&self) -> usize {
        [EntityKind::Tenant, EntityKind::Flat, EntityKind::Reservation]
            .into_iter()
            .filter(|kind| self.held_mode(*kind).is_some())
            .count()
    }

    /// End the unit of work, releasing every lock.
    ///
    /// Mutations are applied in place as they succeed, so there is nothing
    /// to roll back; dropping the transaction has the same effect.
    pub fn commit(self) {}
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        let released = self.lock_count();
        if released > 0 {
            trace!(released, "releasing transaction locks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_access_locks_table() {
        let db = Database::new();
        let mut tx = db.begin();
        assert_eq!(tx.lock_count(), 0);

        tx.read::<Tenant>().unwrap();
        assert_eq!(tx.held_mode(EntityKind::Tenant), Some(LockMode::Read));
        assert_eq!(tx.held_mode(EntityKind::Flat), None);
        assert_eq!(tx.lock_count(), 1);
    }

    #[test]
    fn test_write_lock_satisfies_read() {
        let db = Database::new();
        let mut tx = db.begin();
        tx.write::<Flat>().unwrap();
        tx.read::<Flat>().unwrap();
        assert_eq!(tx.held_mode(EntityKind::Flat), Some(LockMode::Write));
    }

    #[test]
    fn test_read_to_write_upgrade_refused() {
        let db = Database::new();
        let mut tx = db.begin();
        tx.lock(EntityKind::Reservation, LockMode::Read).unwrap();
        let err = tx.write::<Reservation>().unwrap_err();
        assert_eq!(
            err,
            StoreError::LockUpgrade {
                kind: EntityKind::Reservation
            }
        );
    }

    #[test]
    fn test_locks_released_on_drop() {
        let db = Database::new();
        {
            let mut tx = db.begin();
            tx.write::<Tenant>().unwrap();
        }
        // A second writer would block forever if the first guard leaked.
        let mut tx = db.begin();
        tx.write::<Tenant>().unwrap();
        tx.commit();
    }

    #[test]
    fn test_concurrent_readers_share_table() {
        let db = Database::new();
        let mut first = db.begin();
        let mut second = db.begin();
        first.read::<Tenant>().unwrap();
        second.read::<Tenant>().unwrap();
        assert_eq!(first.lock_count(), 1);
        assert_eq!(second.lock_count(), 1);
    }
}
