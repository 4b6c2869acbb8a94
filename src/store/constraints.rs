//! # Constraints
//!
//! Uniqueness and referential checks. Every check runs inside the caller's
//! transaction while the target table is write-locked and before any
//! mutation is applied.

use super::errors::{StoreError, StoreResult};
use super::table::{EntityKind, Id, Row, Rows};
use super::transaction::Transaction;
use super::{Flat, Reservation, Tenant};

/// Fail if a live row other than `candidate` shares its natural key.
pub fn check_unique<R: Row>(rows: &Rows<R>, candidate: &R) -> StoreResult<()> {
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };
    let taken = rows
        .iter()
        .filter(|row| row.id() != candidate.id())
        .any(|row| row.unique_key().as_ref() == Some(&key));
    if taken {
        return Err(StoreError::UniqueConstraintViolation { kind: R::KIND });
    }
    Ok(())
}

/// Fail unless every reference held by `candidate` points at a live row.
pub fn check_references<R: Row>(tx: &mut Transaction<'_>, candidate: &R) -> StoreResult<()> {
    for (kind, id) in candidate.references() {
        if !is_live(tx, kind, id)? {
            return Err(StoreError::ForeignConstraintViolation { kind, id });
        }
    }
    Ok(())
}

/// Fail if any dependent row references `R` row `id`.
pub fn check_unreferenced<R: Row>(tx: &mut Transaction<'_>, id: Id) -> StoreResult<()> {
    for dependent in R::DEPENDENTS {
        if references_any(tx, *dependent, R::KIND, Some(id))? {
            return Err(StoreError::ForeignConstraintViolation { kind: R::KIND, id });
        }
    }
    Ok(())
}

/// Fail if any dependent table still holds rows referencing `R`.
pub fn check_no_dependents<R: Row>(tx: &mut Transaction<'_>) -> StoreResult<()> {
    for dependent in R::DEPENDENTS {
        if references_any(tx, *dependent, R::KIND, None)? {
            return Err(StoreError::DependentsExist {
                kind: R::KIND,
                dependent: *dependent,
            });
        }
    }
    Ok(())
}

fn is_live(tx: &mut Transaction<'_>, kind: EntityKind, id: Id) -> StoreResult<bool> {
    Ok(match kind {
        EntityKind::Tenant => tx.read::<Tenant>()?.contains(id),
        EntityKind::Flat => tx.read::<Flat>()?.contains(id),
        EntityKind::Reservation => tx.read::<Reservation>()?.contains(id),
    })
}

/// Whether a row of `dependent` references `target` (row `id`, or any row).
fn references_any(
    tx: &mut Transaction<'_>,
    dependent: EntityKind,
    target: EntityKind,
    id: Option<Id>,
) -> StoreResult<bool> {
    fn scan<D: Row>(rows: &Rows<D>, target: EntityKind, id: Option<Id>) -> bool {
        rows.iter().any(|row| {
            row.references()
                .iter()
                .any(|(kind, ref_id)| *kind == target && id.map_or(true, |id| id == *ref_id))
        })
    }

    Ok(match dependent {
        EntityKind::Tenant => scan(tx.read::<Tenant>()?, target, id),
        EntityKind::Flat => scan(tx.read::<Flat>()?, target, id),
        EntityKind::Reservation => scan(tx.read::<Reservation>()?, target, id),
    })
}
