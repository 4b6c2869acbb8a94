//! # Row Operations
//!
//! The generic entity-store contract, implemented once for every [`Row`]
//! type on top of [`Transaction`].
//!
//! Lock discipline per operation:
//! - reads lock `R` for read
//! - `insert` / `update` lock the referenced tables for read, then `R` for write
//! - `delete` / `delete_all` lock `R` for write, then the dependent tables for read
//!
//! Both orders ascend in [`EntityKind`](super::EntityKind) order.

use tracing::debug;

use super::constraints::{check_no_dependents, check_references, check_unique, check_unreferenced};
use super::errors::{StoreError, StoreResult};
use super::table::{Id, Row};
use super::transaction::{LockMode, Transaction};

impl Transaction<'_> {
    /// Insert a new row built from `draft`.
    ///
    /// Constraints are checked against the row as it would be stored; the
    /// identifier is consumed only once every check has passed.
    pub fn insert<R: Row>(&mut self, draft: R::Draft) -> StoreResult<R> {
        self.lock_references::<R>()?;
        let id = self.write::<R>()?.peek_id();
        let candidate = R::from_draft(id, draft);

        check_references(self, &candidate)?;
        check_unique(self.read::<R>()?, &candidate)?;

        let rows = self.write::<R>()?;
        let assigned = rows.next_id();
        debug_assert_eq!(assigned, candidate.id());
        rows.push(candidate.clone());

        debug!(kind = %R::KIND, id, "row inserted");
        Ok(candidate)
    }

    pub fn find_by_id<R: Row>(&mut self, id: Id) -> StoreResult<Option<R>> {
        Ok(self.read::<R>()?.get(id).cloned())
    }

    /// All rows in insertion order.
    ///
    /// The result is a copy; later writes do not affect it.
    pub fn find_all<R: Row>(&mut self) -> StoreResult<Vec<R>> {
        Ok(self.read::<R>()?.snapshot())
    }

    /// Replace row `id` with the value produced by `change`.
    ///
    /// `change` sees the current row and must keep its identifier. The new
    /// row is checked like an insert before it replaces the old one.
    pub fn update<R: Row>(
        &mut self,
        id: Id,
        change: impl FnOnce(&R) -> StoreResult<R>,
    ) -> StoreResult<R> {
        self.lock_references::<R>()?;
        let current = self
            .write::<R>()?
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: R::KIND, id })?;

        let next = change(&current)?;
        if next.id() != id {
            return Err(StoreError::precondition(format!(
                "{} identifier is immutable",
                R::KIND
            )));
        }

        check_references(self, &next)?;
        check_unique(self.read::<R>()?, &next)?;

        let rows = self.write::<R>()?;
        if let Some(index) = rows.position(id) {
            rows.replace(index, next.clone());
        }
        debug!(kind = %R::KIND, id, "row updated");
        Ok(next)
    }

    /// Remove row `id`. Returns whether a row was removed.
    pub fn delete<R: Row>(&mut self, id: Id) -> StoreResult<bool> {
        let Some(index) = self.write::<R>()?.position(id) else {
            return Ok(false);
        };
        check_unreferenced::<R>(self, id)?;

        self.write::<R>()?.remove(index);
        debug!(kind = %R::KIND, id, "row deleted");
        Ok(true)
    }

    /// Remove every row of `R`. Fails while any dependent row exists.
    pub fn delete_all<R: Row>(&mut self) -> StoreResult<()> {
        self.write::<R>()?;
        check_no_dependents::<R>(self)?;

        let rows = self.write::<R>()?;
        let removed = rows.len();
        rows.clear();
        debug!(kind = %R::KIND, removed, "table cleared");
        Ok(())
    }

    fn lock_references<R: Row>(&mut self) -> StoreResult<()> {
        for kind in R::REFERENCES {
            self.lock(*kind, LockMode::Read)?;
        }
        Ok(())
    }
}
