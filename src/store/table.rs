//! # Tables
//!
//! The per-kind collection (`Rows`), its lock (`Table`) and the `Row`
//! trait that ties an entity type to its table, its natural key and its
//! foreign references.

use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use super::database::Database;
use super::errors::{StoreError, StoreResult};
use super::transaction::{Held, Transaction};

/// Row identifier. Strictly increasing per kind, never reused.
pub type Id = u64;

/// The three entity kinds held by the store.
///
/// Declaration order is the canonical lock order: a transaction that
/// touches several tables must lock them in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Tenant,
    Flat,
    Reservation,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Tenant => "tenant",
            EntityKind::Flat => "flat",
            EntityKind::Reservation => "reservation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity type stored in its own table.
pub trait Row: Clone + Send + Sync + 'static {
    /// Caller-supplied fields; the store assigns the identifier.
    type Draft;

    /// Natural key, unique across live rows.
    type Key: PartialEq;

    const KIND: EntityKind;

    /// Kinds this kind references, in lock order.
    const REFERENCES: &'static [EntityKind];

    /// Kinds whose rows may reference rows of this kind.
    const DEPENDENTS: &'static [EntityKind];

    fn id(&self) -> Id;

    fn from_draft(id: Id, draft: Self::Draft) -> Self;

    /// `None` when the kind has no uniqueness constraint.
    fn unique_key(&self) -> Option<Self::Key>;

    /// Foreign references held by this row.
    fn references(&self) -> Vec<(EntityKind, Id)>;

    fn table(db: &Database) -> &Table<Self>;

    fn held<'a, 'db>(tx: &'a mut Transaction<'db>) -> &'a mut Held<'db, Self>;
}

/// Ordered rows of one kind plus the identifier sequence.
#[derive(Debug)]
pub struct Rows<R> {
    rows: Vec<R>,
    sequence: Id,
}

impl<R> Default for Rows<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            sequence: 1,
        }
    }
}

impl<R: Row> Rows<R> {
    /// The identifier the next insert will receive.
    pub fn peek_id(&self) -> Id {
        self.sequence
    }

    /// Consume the next identifier. Must be called under the write lock.
    pub(crate) fn next_id(&mut self) -> Id {
        let id = self.sequence;
        self.sequence += 1;
        id
    }

    pub fn get(&self, id: Id) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn position(&self, id: Id) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of the rows in insertion order.
    pub fn snapshot(&self) -> Vec<R> {
        self.rows.clone()
    }

    pub(crate) fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    pub(crate) fn replace(&mut self, index: usize, row: R) {
        self.rows[index] = row;
    }

    pub(crate) fn remove(&mut self, index: usize) -> R {
        self.rows.remove(index)
    }

    /// Drop every row. The sequence keeps counting.
    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }
}

/// A table: rows behind a read/write lock.
#[derive(Debug)]
pub struct Table<R> {
    lock: RwLock<Rows<R>>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            lock: RwLock::new(Rows::default()),
        }
    }
}

impl<R: Row> Table<R> {
    pub(crate) fn read(&self) -> StoreResult<RwLockReadGuard<'_, Rows<R>>> {
        self.lock
            .read()
            .map_err(|_| StoreError::Poisoned { kind: R::KIND })
    }

    pub(crate) fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Rows<R>>> {
        self.lock
            .write()
            .map_err(|_| StoreError::Poisoned { kind: R::KIND })
    }
}
