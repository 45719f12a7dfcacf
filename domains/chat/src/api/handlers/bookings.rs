//! Booking lifecycle callback handler
//!
//! The booking side of the marketplace posts here whenever a booking
//! between a user and a band changes state (internal, no auth).

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use stagelink_common::Result;
use uuid::Uuid;

use crate::api::middleware::ChatState;
use crate::domain::ids::{BandRef, UserRef};
use crate::injector::BookingNotification;

/// Callback payload from the booking service
#[derive(Debug, Deserialize)]
pub struct BookingEventPayload {
    pub user_id: Uuid,
    pub band_id: Uuid,
    pub booking_id: Uuid,
}

/// Handle a booking state change by injecting a chat message
pub async fn booking_event(
    State(state): State<ChatState>,
    Json(payload): Json<BookingEventPayload>,
) -> Result<StatusCode> {
    state
        .injector
        .handle(BookingNotification {
            user_id: UserRef::from_uuid(payload.user_id),
            band_id: BandRef::from_uuid(payload.band_id),
            booking_id: payload.booking_id,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}
