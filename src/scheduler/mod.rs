//! # Scheduler
//!
//! The flat viewing application: the [`App`] object owning the database
//! and its business-rule collaborators, and the route table exposing it.
//!
//! | Method | Path                  | Handler                              |
//! |--------|-----------------------|--------------------------------------|
//! | GET    | `/tenants`            | [`handlers::get_tenants`]            |
//! | POST   | `/tenants`            | [`handlers::create_tenant`]          |
//! | GET    | `/flats`              | [`handlers::get_flats`]              |
//! | GET    | `/flats/{id}`         | [`handlers::get_flat`]               |
//! | POST   | `/flats`              | [`handlers::create_flat`]            |
//! | GET    | `/reservations`       | [`handlers::get_reservations`]       |
//! | POST   | `/reservations`       | [`handlers::create_reservation`]     |
//! | PUT    | `/reservations/{id}`  | [`handlers::approve_or_reject_reservation`] |
//! | DELETE | `/reservations/{id}`  | [`handlers::cancel_reservation`]     |

pub mod handlers;
mod notify;
mod policy;
mod views;

use std::fmt;

use axum::http::Method;
use chrono::NaiveDateTime;

pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use policy::{
    upcoming_week_range, Clock, FixedClock, SlotPolicy, SlotPolicyKind, SystemClock,
    UpcomingWeekPolicy, ViewingHoursPolicy,
};
pub use views::{FlatView, ReservationView, TenantView};

use crate::router::{RouteResult, Router};
use crate::store::{Database, Tenant};

/// Application state shared by every request
pub struct App {
    database: Database,
    slot_policy: Box<dyn SlotPolicy>,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
}

impl App {
    /// Empty database, system clock, log notifications.
    pub fn new(slot_policy: Box<dyn SlotPolicy>) -> Self {
        Self {
            database: Database::new(),
            slot_policy,
            clock: Box::new(SystemClock),
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn slot_policy(&self) -> &dyn SlotPolicy {
        self.slot_policy.as_ref()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn notify(&self, tenant: &Tenant, text: &str) {
        self.notifier.notify(tenant, text);
    }

    /// The route table, most specific patterns first.
    pub fn routes() -> RouteResult<Router<App>> {
        Router::new()
            .route("/tenants", Method::GET, handlers::get_tenants)?
            .route("/tenants", Method::POST, handlers::create_tenant)?
            .route("/flats", Method::GET, handlers::get_flats)?
            .route("/flats/(\\d+)", Method::GET, handlers::get_flat)?
            .route("/flats", Method::POST, handlers::create_flat)?
            .route("/reservations", Method::GET, handlers::get_reservations)?
            .route("/reservations", Method::POST, handlers::create_reservation)?
            .route(
                "/reservations/(\\d+)",
                Method::PUT,
                handlers::approve_or_reject_reservation,
            )?
            .route(
                "/reservations/(\\d+)",
                Method::DELETE,
                handlers::cancel_reservation,
            )
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("database", &self.database)
            .field("now", &self.now())
            .finish_non_exhaustive()
    }
}
