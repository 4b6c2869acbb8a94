//! viewdb - flat viewing scheduler on a strict in-memory transactional store
//!
//! - [`store`]: tables, transactions, constraint checks
//! - [`codec`]: request body decoding, escaping JSON encoder, date-times
//! - [`router`]: ordered regex route table and dispatcher
//! - [`scheduler`]: the application, its handlers and business rules
//! - [`http_server`]: axum front end and server configuration
//! - [`cli`]: command-line entry point

pub mod cli;
pub mod codec;
pub mod http_server;
pub mod observability;
pub mod router;
pub mod scheduler;
pub mod store;
