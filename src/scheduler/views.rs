//! Wire representations of stored rows.

use serde::Serialize;

use crate::codec::format_date_time;
use crate::store::{Flat, Id, Reservation, Tenant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantView<'a> {
    pub id: Id,
    pub name: &'a str,
}

impl<'a> From<&'a Tenant> for TenantView<'a> {
    fn from(tenant: &'a Tenant) -> Self {
        Self {
            id: tenant.id,
            name: &tenant.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatView<'a> {
    pub id: Id,
    pub address: &'a str,
    pub current_tenant_id: Id,
}

impl<'a> From<&'a Flat> for FlatView<'a> {
    fn from(flat: &'a Flat) -> Self {
        Self {
            id: flat.id,
            address: &flat.address,
            current_tenant_id: flat.current_tenant_id,
        }
    }
}

/// `approved` is `null` while the reservation is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: Id,
    pub flat_id: Id,
    pub date_time: String,
    pub prospective_tenant_id: Id,
    pub approved: Option<bool>,
}

impl From<&Reservation> for ReservationView {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id,
            flat_id: reservation.flat_id,
            date_time: format_date_time(&reservation.date_time),
            prospective_tenant_id: reservation.prospective_tenant_id,
            approved: reservation.approval.as_bool(),
        }
    }
}
