use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;
use std::collections::HashSet;

use crate::models::{Event, Role};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn from_tag(tag: &str) -> Option<BookingStatus> {
        match tag {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "rejected" => Some(BookingStatus::Rejected),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Legal edges of the booking state graph. `rejected`, `cancelled` and
    /// `completed` are terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Event,
    Guide,
}

/// Inert placeholder until a payment gate exists.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// One request for an event ticket or a guide engagement. Exactly one of
/// `event_id`/`guide_id` is set, determined by `kind`. `total_price` is
/// snapshotted at creation and never recomputed. Bookings are never
/// hard-deleted; terminal statuses keep the history.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub kind: BookingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_id: Option<ObjectId>,
    pub date: String, // ISO date string supplied by the client
    pub people_count: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub message: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Booking {
    /// Event bookings snapshot `event.price × people_count` and auto-confirm
    /// until a payment gate exists.
    pub fn for_event(
        requester: ObjectId,
        event: &Event,
        date: String,
        people_count: i32,
        message: Option<String>,
        now: DateTime,
    ) -> Booking {
        Booking {
            id: None,
            user_id: requester,
            kind: BookingKind::Event,
            event_id: event.id,
            guide_id: None,
            date,
            people_count,
            total_price: event.price * people_count as f64,
            status: BookingStatus::Confirmed,
            message,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Guide pricing is not modeled; the guide must accept first.
    pub fn for_guide(
        requester: ObjectId,
        guide_id: ObjectId,
        date: String,
        people_count: i32,
        message: Option<String>,
        now: DateTime,
    ) -> Booking {
        Booking {
            id: None,
            user_id: requester,
            kind: BookingKind::Guide,
            event_id: None,
            guide_id: Some(guide_id),
            date,
            people_count,
            total_price: 0.0,
            status: BookingStatus::Pending,
            message,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The set of statuses this actor may move the booking to from its current
/// state: the requester may cancel, the target guide may confirm or reject,
/// admins may take any edge the graph allows. Already intersected with the
/// state graph.
pub fn allowed_next_states(
    booking: &Booking,
    actor_id: &ObjectId,
    actor_role: &Role,
) -> HashSet<BookingStatus> {
    use BookingStatus::*;

    let mut allowed = HashSet::new();
    if booking.user_id == *actor_id {
        allowed.insert(Cancelled);
    }
    if booking.guide_id.as_ref() == Some(actor_id) {
        allowed.insert(Confirmed);
        allowed.insert(Rejected);
    }
    if actor_role.is_admin() {
        allowed.extend([Pending, Confirmed, Rejected, Cancelled, Completed]);
    }
    allowed.retain(|next| booking.status.can_transition_to(*next));
    allowed
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateBookingDto {
    pub kind: String, // "event" or "guide"
    pub target_id: String,
    pub date: String,
    pub people_count: i32,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateBookingStatusDto {
    pub status: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    pub id: String,
    pub kind: String,
    pub event_id: Option<String>,
    pub guide_id: Option<String>,
    pub date: String,
    pub people_count: i32,
    pub total_price: f64,
    pub status: String,
    pub message: Option<String>,
    pub payment_status: String,
    /// Display fields for the booking target (event title / guide name),
    /// joined in by the listing endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<serde_json::Value>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        BookingResponse {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            kind: format!("{:?}", booking.kind).to_lowercase(),
            event_id: booking.event_id.map(|id| id.to_hex()),
            guide_id: booking.guide_id.map(|id| id.to_hex()),
            date: booking.date,
            people_count: booking.people_count,
            total_price: booking.total_price,
            status: booking.status.as_tag().to_string(),
            message: booking.message,
            payment_status: format!("{:?}", booking.payment_status).to_lowercase(),
            target: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    fn guide_booking(status: BookingStatus, requester: ObjectId, guide: ObjectId) -> Booking {
        Booking {
            id: Some(ObjectId::new()),
            user_id: requester,
            kind: BookingKind::Guide,
            event_id: None,
            guide_id: Some(guide),
            date: "2026-01-15".to_string(),
            people_count: 2,
            total_price: 0.0,
            status,
            message: None,
            payment_status: PaymentStatus::Pending,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn graph_edges() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Confirmed.can_transition_to(Rejected));
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for from in [Rejected, Cancelled, Completed] {
            assert!(from.is_terminal());
            for to in [Pending, Confirmed, Rejected, Cancelled, Completed] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn requester_may_only_cancel() {
        let requester = ObjectId::new();
        let guide = ObjectId::new();
        let booking = guide_booking(Pending, requester, guide);

        let allowed = allowed_next_states(&booking, &requester, &Role::User);
        assert_eq!(allowed, HashSet::from([Cancelled]));

        let booking = guide_booking(Confirmed, requester, guide);
        let allowed = allowed_next_states(&booking, &requester, &Role::User);
        assert_eq!(allowed, HashSet::from([Cancelled]));
    }

    #[test]
    fn target_guide_may_confirm_or_reject_pending() {
        let requester = ObjectId::new();
        let guide = ObjectId::new();
        let booking = guide_booking(Pending, requester, guide);

        let allowed = allowed_next_states(&booking, &guide, &Role::Guide);
        assert_eq!(allowed, HashSet::from([Confirmed, Rejected]));

        // once confirmed the guide has no further say
        let booking = guide_booking(Confirmed, requester, guide);
        let allowed = allowed_next_states(&booking, &guide, &Role::Guide);
        assert!(allowed.is_empty());
    }

    #[test]
    fn unrelated_user_gets_nothing() {
        let booking = guide_booking(Pending, ObjectId::new(), ObjectId::new());
        let stranger = ObjectId::new();
        assert!(allowed_next_states(&booking, &stranger, &Role::User).is_empty());
        assert!(allowed_next_states(&booking, &stranger, &Role::Guide).is_empty());
    }

    #[test]
    fn admin_is_bounded_by_the_graph() {
        let booking = guide_booking(Pending, ObjectId::new(), ObjectId::new());
        let admin = ObjectId::new();

        let allowed = allowed_next_states(&booking, &admin, &Role::Admin);
        assert_eq!(allowed, HashSet::from([Confirmed, Rejected, Cancelled]));

        let booking = guide_booking(Cancelled, ObjectId::new(), ObjectId::new());
        assert!(allowed_next_states(&booking, &admin, &Role::SuperAdmin).is_empty());
    }

    fn sample_event(price: f64) -> Event {
        Event {
            id: Some(ObjectId::new()),
            title: "Sarhul Mahotsav".to_string(),
            description: "Spring festival".to_string(),
            images: Vec::new(),
            venue: "Morabadi Ground".to_string(),
            district: "Ranchi".to_string(),
            date: "2026-04-03".to_string(),
            price,
            is_approved: true,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn event_booking_starts_confirmed_with_snapshotted_price() {
        let requester = ObjectId::new();
        let mut event = sample_event(150.0);
        let booking = Booking::for_event(
            requester,
            &event,
            "2026-04-03".to_string(),
            3,
            None,
            DateTime::now(),
        );

        assert_eq!(booking.status, Confirmed);
        assert_eq!(booking.total_price, 450.0);
        assert_eq!(booking.kind, BookingKind::Event);
        assert_eq!(booking.event_id, event.id);
        assert_eq!(booking.guide_id, None);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);

        // a later price edit never touches the snapshot
        event.price = 999.0;
        assert_eq!(booking.total_price, 450.0);
    }

    #[test]
    fn guide_booking_starts_pending_and_unpriced() {
        let requester = ObjectId::new();
        let guide = ObjectId::new();
        let booking = Booking::for_guide(
            requester,
            guide,
            "2026-04-10".to_string(),
            2,
            Some("three day trek".to_string()),
            DateTime::now(),
        );

        assert_eq!(booking.status, Pending);
        assert_eq!(booking.total_price, 0.0);
        assert_eq!(booking.kind, BookingKind::Guide);
        assert_eq!(booking.guide_id, Some(guide));
        assert_eq!(booking.event_id, None);
    }

    #[test]
    fn guide_booking_walkthrough() {
        let requester = ObjectId::new();
        let guide = ObjectId::new();
        let admin = ObjectId::new();

        // fresh guide booking: pending, guide may confirm
        let mut booking = guide_booking(Pending, requester, guide);
        assert!(allowed_next_states(&booking, &guide, &Role::Guide).contains(&Confirmed));
        booking.status = Confirmed;

        // requester asking for "confirmed" again hits a dead edge before
        // authorization is even considered
        assert!(!booking.status.can_transition_to(Confirmed));

        // admin may still cancel a confirmed booking, and that ends it
        assert!(allowed_next_states(&booking, &admin, &Role::Admin).contains(&Cancelled));
        booking.status = Cancelled;
        assert!(allowed_next_states(&booking, &admin, &Role::SuperAdmin).is_empty());
        assert!(allowed_next_states(&booking, &requester, &Role::User).is_empty());
    }

    #[test]
    fn status_tags_round_trip() {
        for status in [Pending, Confirmed, Rejected, Cancelled, Completed] {
            assert_eq!(BookingStatus::from_tag(status.as_tag()), Some(status));
        }
        assert_eq!(BookingStatus::from_tag("approved"), None);
    }
}
