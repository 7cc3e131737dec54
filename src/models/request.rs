//! Exchange request entity and derived status projection

use serde::{Deserialize, Serialize};

use super::book::Book;

/// Which side of a negotiation a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    /// The user who initiated the request, offering one of their books.
    Requester,
    /// The owner of the requested book, who must accept or decline.
    Responder,
}

impl Party {
    pub fn other(self) -> Self {
        match self {
            Party::Requester => Party::Responder,
            Party::Responder => Party::Requester,
        }
    }
}

/// Raw request status as stored by the backend.
///
/// `cancelled` never appears here: cancelling a pending request deletes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Exchanged,
}

/// Status as it should be displayed, derived from the confirmation flags.
///
/// The raw `status` string is not trusted on its own: a request with both
/// flags set counts as exchanged whatever the literal field says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Pending,
    Accepted,
    Declined,
    /// Exactly one side has confirmed the physical exchange.
    ConfirmedPartial { confirmed_by: Party },
    Exchanged,
}

/// A one-to-one book exchange negotiation between two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub id: String,
    pub requested_by_id: String,
    pub requested_to_id: String,
    pub requested_book_id: i64,
    #[serde(rename = "RequestedBook")]
    pub requested_book: Book,
    pub offered_book_id: i64,
    #[serde(rename = "OfferedBook")]
    pub offered_book: Book,
    pub status: RequestStatus,
    pub requested_by_confirmed: bool,
    pub requested_to_confirmed: bool,
}

impl ExchangeRequest {
    /// Role of `user_id` in this negotiation, or `None` for third parties.
    pub fn role_of(&self, user_id: &str) -> Option<Party> {
        if self.requested_by_id == user_id {
            Some(Party::Requester)
        } else if self.requested_to_id == user_id {
            Some(Party::Responder)
        } else {
            None
        }
    }

    pub fn has_confirmed(&self, party: Party) -> bool {
        match party {
            Party::Requester => self.requested_by_confirmed,
            Party::Responder => self.requested_to_confirmed,
        }
    }

    /// Projects the two confirmation flags and the raw status into what the
    /// UI should show. Both flags set wins over everything else.
    pub fn display_status(&self) -> DisplayStatus {
        match (self.requested_by_confirmed, self.requested_to_confirmed) {
            (true, true) => DisplayStatus::Exchanged,
            (true, false) => DisplayStatus::ConfirmedPartial {
                confirmed_by: Party::Requester,
            },
            (false, true) => DisplayStatus::ConfirmedPartial {
                confirmed_by: Party::Responder,
            },
            (false, false) => match self.status {
                RequestStatus::Pending => DisplayStatus::Pending,
                RequestStatus::Accepted => DisplayStatus::Accepted,
                RequestStatus::Declined => DisplayStatus::Declined,
                // An exchanged status without flags is a backend anomaly;
                // still show it rather than invent a different state.
                RequestStatus::Exchanged => DisplayStatus::Exchanged,
            },
        }
    }

    /// Whether this request blocks the requester from opening another
    /// request on the same book: anything not declined (and not deleted by
    /// cancellation, which removes the row entirely) still occupies the slot.
    pub fn blocks_new_request(&self) -> bool {
        !matches!(self.display_status(), DisplayStatus::Declined)
    }

    /// Whether owner contact details may be rendered: only once the
    /// negotiation reached `accepted` or later.
    pub fn contact_visible(&self) -> bool {
        !matches!(
            self.display_status(),
            DisplayStatus::Pending | DisplayStatus::Declined
        )
    }

    /// Strips owner contact from both referenced books unless the status
    /// permits showing it. The backend withholds these fields as well; this
    /// is defense in depth on the client.
    pub fn apply_contact_policy(&mut self) {
        if !self.contact_visible() {
            self.requested_book.owner.redact_contact();
            self.offered_book.owner.redact_contact();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::{Book, Owner};

    fn book(id: i64, owner_uid: &str) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Author".into(),
            genre: "Fiction".into(),
            description: "A book".into(),
            user_id: owner_uid.into(),
            owner: Owner {
                uid: owner_uid.into(),
                first_name: "First".into(),
                last_name: "Last".into(),
                email: Some("owner@example.com".into()),
                phone: Some("555-0101".into()),
            },
            location: None,
            is_active: true,
        }
    }

    fn request(status: RequestStatus, by_confirmed: bool, to_confirmed: bool) -> ExchangeRequest {
        ExchangeRequest {
            id: "r1".into(),
            requested_by_id: "alice".into(),
            requested_to_id: "bob".into(),
            requested_book_id: 1,
            requested_book: book(1, "bob"),
            offered_book_id: 2,
            offered_book: book(2, "alice"),
            status,
            requested_by_confirmed: by_confirmed,
            requested_to_confirmed: to_confirmed,
        }
    }

    #[test]
    fn role_of_identifies_parties() {
        let r = request(RequestStatus::Pending, false, false);
        assert_eq!(r.role_of("alice"), Some(Party::Requester));
        assert_eq!(r.role_of("bob"), Some(Party::Responder));
        assert_eq!(r.role_of("carol"), None);
    }

    #[test]
    fn both_flags_display_as_exchanged_regardless_of_raw_status() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Declined,
            RequestStatus::Exchanged,
        ] {
            let r = request(status, true, true);
            assert_eq!(r.display_status(), DisplayStatus::Exchanged);
        }
    }

    #[test]
    fn one_flag_displays_as_confirmed_partial() {
        let r = request(RequestStatus::Accepted, true, false);
        assert_eq!(
            r.display_status(),
            DisplayStatus::ConfirmedPartial {
                confirmed_by: Party::Requester
            }
        );
        let r = request(RequestStatus::Accepted, false, true);
        assert_eq!(
            r.display_status(),
            DisplayStatus::ConfirmedPartial {
                confirmed_by: Party::Responder
            }
        );
    }

    #[test]
    fn no_flags_fall_back_to_raw_status() {
        assert_eq!(
            request(RequestStatus::Pending, false, false).display_status(),
            DisplayStatus::Pending
        );
        assert_eq!(
            request(RequestStatus::Declined, false, false).display_status(),
            DisplayStatus::Declined
        );
    }

    #[test]
    fn pending_accepted_and_exchanged_block_new_requests() {
        assert!(request(RequestStatus::Pending, false, false).blocks_new_request());
        assert!(request(RequestStatus::Accepted, false, false).blocks_new_request());
        assert!(request(RequestStatus::Exchanged, true, true).blocks_new_request());
        assert!(!request(RequestStatus::Declined, false, false).blocks_new_request());
    }

    #[test]
    fn contact_redacted_until_accepted() {
        let mut r = request(RequestStatus::Pending, false, false);
        r.apply_contact_policy();
        assert_eq!(r.requested_book.owner.email, None);
        assert_eq!(r.offered_book.owner.phone, None);

        let mut r = request(RequestStatus::Accepted, false, false);
        r.apply_contact_policy();
        assert!(r.requested_book.owner.email.is_some());
    }

    #[test]
    fn wire_field_names_round_trip() {
        let r = request(RequestStatus::Pending, false, false);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("RequestedBook").is_some());
        assert!(json.get("OfferedBook").is_some());
        assert_eq!(json["status"], "pending");
        let back: ExchangeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
