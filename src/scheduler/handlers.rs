//! Request handlers for the viewing scheduler routes.
//!
//! Each handler runs in one store transaction. Mutations are issued before
//! any read of the same table so the transaction never needs to upgrade a
//! read lock; notifications go out after the transaction is committed.

use axum::http::StatusCode;

use super::views::{FlatView, ReservationView, TenantView};
use super::App;
use crate::codec::format_date_time;
use crate::router::{Exchange, RouteError, RouteResult};
use crate::store::{Flat, Id, Reservation, Tenant, Transaction};

pub fn get_tenants(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let tenants = app.database().begin().find_all::<Tenant>()?;
    let views: Vec<TenantView<'_>> = tenants.iter().map(TenantView::from).collect();
    ex.append_json(&views)?;
    Ok(())
}

pub fn create_tenant(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let name = ex.body.require_str("name")?.to_string();
    let tenant = app.database().begin().insert_tenant(name)?;
    ex.append(tenant.id);
    Ok(())
}

pub fn get_flats(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let flats = app.database().begin().find_all::<Flat>()?;
    let views: Vec<FlatView<'_>> = flats.iter().map(FlatView::from).collect();
    ex.append_json(&views)?;
    Ok(())
}

/// Unknown flats answer 404 without a body.
pub fn get_flat(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let id = ex.path_param(0)?;
    match app.database().begin().find_by_id::<Flat>(id)? {
        Some(flat) => {
            ex.append_json(&FlatView::from(&flat))?;
        }
        None => {
            ex.set_status(StatusCode::NOT_FOUND);
        }
    }
    Ok(())
}

pub fn create_flat(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let address = ex.body.require_str("address")?.to_string();
    let current_tenant_id = ex.body.require_id("currentTenantId")?;
    let flat = app
        .database()
        .begin()
        .insert_flat(address, current_tenant_id)?;
    ex.append(flat.id);
    Ok(())
}

/// Reservations of `flatId` between `from` and `to`, both inclusive.
pub fn get_reservations(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let flat_id = ex.query.require_id("flatId")?;
    let from = ex.query.require_date_time("from")?;
    let to = ex.query.require_date_time("to")?;

    let reservations = app
        .database()
        .begin()
        .reservations_by_flat_and_range(flat_id, from..=to)?;
    let views: Vec<ReservationView> = reservations.iter().map(ReservationView::from).collect();
    ex.append_json(&views)?;
    Ok(())
}

/// Book a viewing and ask the flat's current tenant to confirm it.
pub fn create_reservation(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let date_time = ex.body.require_date_time("dateTime")?;
    app.slot_policy()
        .check(date_time, app.now())
        .map_err(RouteError::Validation)?;
    let flat_id = ex.body.require_id("flatId")?;
    let prospective_tenant_id = ex.body.require_id("prospectiveTenantId")?;

    let mut tx = app.database().begin();
    let reservation = tx.insert_reservation(flat_id, date_time, prospective_tenant_id)?;
    let flat = require_flat(&mut tx, reservation.flat_id)?;
    let current_tenant = require_tenant(&mut tx, flat.current_tenant_id)?;
    tx.commit();

    ex.append(reservation.id);
    app.notify(
        &current_tenant,
        &format!(
            "Please, approve or reject reservation at \"{}\" on {}.",
            flat.address,
            format_date_time(&reservation.date_time)
        ),
    );
    Ok(())
}

/// Approve or reject a reservation and tell the prospective tenant.
pub fn approve_or_reject_reservation(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let id = ex.path_param(0)?;
    let approved = ex.body.require_bool("approved")?;

    let mut tx = app.database().begin();
    let reservation = tx.set_approved(id, approved)?;
    let flat = require_flat(&mut tx, reservation.flat_id)?;
    let prospective_tenant = require_tenant(&mut tx, reservation.prospective_tenant_id)?;
    tx.commit();

    ex.set_status(StatusCode::NO_CONTENT);
    app.notify(&prospective_tenant, &decision_message(&flat, &reservation));
    Ok(())
}

/// Cancel a pending or approved reservation. Rejected slots stay taken.
pub fn cancel_reservation(app: &App, ex: &mut Exchange) -> RouteResult<()> {
    let id = ex.path_param(0)?;
    app.database().begin().cancel_reservation(id)?;
    ex.set_status(StatusCode::NO_CONTENT);
    Ok(())
}

fn decision_message(flat: &Flat, reservation: &Reservation) -> String {
    let decision = match reservation.approval.as_bool() {
        Some(true) => "approved",
        _ => "rejected",
    };
    format!(
        "Your reservation at {} on {} has been {}.",
        flat.address,
        format_date_time(&reservation.date_time),
        decision
    )
}

fn require_flat(tx: &mut Transaction<'_>, id: Id) -> RouteResult<Flat> {
    tx.find_by_id::<Flat>(id)?
        .ok_or_else(|| RouteError::missing(format!("flat {}", id)))
}

fn require_tenant(tx: &mut Transaction<'_>, id: Id) -> RouteResult<Tenant> {
    tx.find_by_id::<Tenant>(id)?
        .ok_or_else(|| RouteError::missing(format!("tenant {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BodyParams;
    use crate::router::QueryParams;
    use crate::scheduler::{FixedClock, RecordingNotifier, UpcomingWeekPolicy};
    use crate::store::Approval;
    use chrono::{NaiveDate, NaiveDateTime};

    // Wednesday
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 11, 13)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn monday(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 11, 18)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn setup() -> (App, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let app = App::new(Box::new(UpcomingWeekPolicy::default()))
            .with_clock(FixedClock(now()))
            .with_notifier(notifier.clone());
        app.database()
            .transactional(|tx| {
                tx.insert_tenant("John Dow")?;
                tx.insert_tenant("Anna Lee")?;
                tx.insert_flat("10 Downing Street", 2)?;
                Ok(())
            })
            .unwrap();
        (app, notifier)
    }

    fn exchange(path: Vec<Id>, body: &str) -> Exchange {
        Exchange::new(
            path,
            QueryParams::default(),
            BodyParams::parse(body.as_bytes()).unwrap(),
        )
    }

    #[test]
    fn test_create_reservation_notifies_current_tenant() {
        let (app, notifier) = setup();
        let mut ex = exchange(
            vec![],
            r#"{"flatId": 1, "dateTime": "2019-11-18T10:20", "prospectiveTenantId": 1}"#,
        );

        create_reservation(&app, &mut ex).unwrap();

        assert_eq!(ex.written(), "1");
        let received = notifier.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].tenant_id, 2);
        assert_eq!(
            received[0].text,
            "Please, approve or reject reservation at \"10 Downing Street\" on 2019-11-18T10:20."
        );
    }

    #[test]
    fn test_create_reservation_rejected_by_policy() {
        let (app, notifier) = setup();
        let mut ex = exchange(
            vec![],
            r#"{"flatId": 1, "dateTime": "2019-11-18T10:10", "prospectiveTenantId": 1}"#,
        );

        let err = create_reservation(&app, &mut ex).unwrap_err();

        assert!(matches!(err, RouteError::Validation(_)));
        assert!(notifier.received().is_empty());
        assert!(app.database().begin().find_all::<Reservation>().unwrap().is_empty());
    }

    #[test]
    fn test_approve_notifies_prospective_tenant() {
        let (app, notifier) = setup();
        app.database()
            .begin()
            .insert_reservation(1, monday(11, 0), 1)
            .unwrap();

        let mut ex = exchange(vec![1], r#"{"approved": true}"#);
        approve_or_reject_reservation(&app, &mut ex).unwrap();

        assert_eq!(ex.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            notifier.received()[0].text,
            "Your reservation at 10 Downing Street on 2019-11-18T11:00 has been approved."
        );
        let stored = app.database().begin().find_by_id::<Reservation>(1).unwrap();
        assert_eq!(stored.map(|r| r.approval), Some(Approval::Approved));
    }

    #[test]
    fn test_get_flat_absent_sets_404() {
        let (app, _) = setup();
        let mut ex = exchange(vec![100500], "");
        get_flat(&app, &mut ex).unwrap();
        assert_eq!(ex.status(), StatusCode::NOT_FOUND);
        assert!(ex.written().is_empty());
    }

    #[test]
    fn test_cancel_unknown_reservation_fails() {
        let (app, _) = setup();
        let mut ex = exchange(vec![9], "");
        let err = cancel_reservation(&app, &mut ex).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
