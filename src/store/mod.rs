//! # Store
//!
//! Concurrent in-memory transactional store for tenants, flats and
//! reservations.
//!
//! Each entity kind lives in its own [`Table`]: an ordered collection, an
//! identifier sequence and a read/write lock. All access goes through a
//! [`Transaction`] obtained from [`Database::begin`], which keeps every lock
//! it acquires until it is dropped. Constraint checks run under those locks
//! before any mutation, so concurrent writers racing for the same natural
//! key are totally ordered: one wins, the others fail and nothing partial is
//! ever visible.
//!
//! # Usage
//!
//! ```
//! use viewdb::store::{Database, Flat};
//!
//! let db = Database::new();
//! let mut tx = db.begin();
//! let owner = tx.insert_tenant("Anna Lee").unwrap();
//! let flat = tx.insert_flat("10 Downing Street", owner.id).unwrap();
//! assert_eq!(tx.find_all::<Flat>().unwrap(), vec![flat]);
//! tx.commit();
//! ```

mod constraints;
mod database;
mod errors;
mod flat;
mod operations;
mod reservation;
mod table;
mod tenant;
mod transaction;

pub use database::Database;
pub use errors::{StoreError, StoreResult};
pub use flat::{Flat, NewFlat};
pub use reservation::{Approval, NewReservation, Reservation};
pub use table::{EntityKind, Id, Row, Rows, Table};
pub use tenant::Tenant;
pub use transaction::{Held, LockMode, Transaction};
