//! Listing and query adapter
//!
//! Fetches the "requests made" and "requests received" views, reconciles the
//! fetched state into the coordinator's cache (this is where sibling
//! requests auto-declined by the backend surface), and derives card view
//! models with owner contact withheld until acceptance.

use crate::api::exchange::ExchangeApi;
use crate::error::ExchangeError;
use crate::models::{Book, DisplayStatus, ExchangeRequest, Party};
use crate::services::exchange_service::ExchangeCoordinator;

/// Owner contact, only populated once the negotiation reached `accepted`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Everything a request list entry needs to render a card.
#[derive(Debug, Clone)]
pub struct RequestCard {
    pub request_id: String,
    /// The viewer's side of this negotiation.
    pub role: Party,
    pub requested_book_title: String,
    pub offered_book_title: String,
    /// Display name of the counterparty.
    pub other_party: String,
    /// Counterparty contact; `None` until the request is accepted.
    pub contact: Option<ContactDetails>,
    pub status: DisplayStatus,
    pub status_label: String,
}

impl RequestCard {
    pub fn from_request(request: &ExchangeRequest, viewer_id: &str) -> Self {
        // A request only ever shows up in the viewer's own lists.
        let role = request.role_of(viewer_id).unwrap_or(Party::Requester);
        let other_owner = match role {
            Party::Requester => &request.requested_book.owner,
            Party::Responder => &request.offered_book.owner,
        };
        let contact = if request.contact_visible() {
            Some(ContactDetails {
                email: other_owner.email.clone(),
                phone: other_owner.phone.clone(),
            })
        } else {
            None
        };
        RequestCard {
            request_id: request.id.clone(),
            role,
            requested_book_title: request.requested_book.title.clone(),
            offered_book_title: request.offered_book.title.clone(),
            other_party: other_owner.display_name(),
            contact,
            status: request.display_status(),
            status_label: status_label(request),
        }
    }
}

/// Human-readable status line. Partial confirmations name who has and who
/// has not confirmed, as the detail view shows them.
pub fn status_label(request: &ExchangeRequest) -> String {
    // The requester owns the offered book; the responder owns the requested one.
    let requester_name = &request.offered_book.owner.first_name;
    let responder_name = &request.requested_book.owner.first_name;
    match request.display_status() {
        DisplayStatus::Pending => "pending".into(),
        DisplayStatus::Accepted => "accepted".into(),
        DisplayStatus::Declined => "declined".into(),
        DisplayStatus::Exchanged => "exchanged".into(),
        DisplayStatus::ConfirmedPartial { confirmed_by } => {
            let (confirmed, waiting) = match confirmed_by {
                Party::Requester => (requester_name, responder_name),
                Party::Responder => (responder_name, requester_name),
            };
            format!("{confirmed} - confirmed, {waiting} - not confirmed")
        }
    }
}

/// Result of the book-level gating query: may the current user open a new
/// request against this book?
#[derive(Debug, Clone)]
pub struct BookGate {
    pub book_active: bool,
    /// The viewer owns this book; owners cannot request their own listings.
    pub owned_by_viewer: bool,
    /// Display status of the user's own live request on the book, if any.
    /// Declined requests do not block; cancelled ones no longer exist.
    pub existing: Option<DisplayStatus>,
}

impl BookGate {
    pub fn can_request(&self) -> bool {
        self.book_active && !self.owned_by_viewer && self.existing.is_none()
    }
}

impl<A: ExchangeApi> ExchangeCoordinator<A> {
    /// Requests where the current user is the requester.
    pub async fn requests_made(&self) -> Result<Vec<RequestCard>, ExchangeError> {
        let requests = self.api.requests_made(&self.session).await?;
        self.ingest(requests).await
    }

    /// Requests where the current user is the responder.
    pub async fn requests_received(&self) -> Result<Vec<RequestCard>, ExchangeError> {
        let requests = self.api.requests_received(&self.session).await?;
        self.ingest(requests).await
    }

    async fn ingest(
        &self,
        mut requests: Vec<ExchangeRequest>,
    ) -> Result<Vec<RequestCard>, ExchangeError> {
        for request in &mut requests {
            request.apply_contact_policy();
        }
        let cards = requests
            .iter()
            .map(|r| RequestCard::from_request(r, self.session.user_id()))
            .collect();
        self.state.lock().await.cache.sync_all(requests);
        Ok(cards)
    }

    /// Book-level gating check for initiating a new request (see
    /// [`BookGate`]). The fetched requests are reconciled into the cache on
    /// the way through.
    pub async fn book_gate(&self, book_id: i64) -> Result<BookGate, ExchangeError> {
        let book = self.api.book_by_id(&self.session, book_id).await?;
        let mut requests = self.api.requests_for_book(&self.session, book_id).await?;
        for request in &mut requests {
            request.apply_contact_policy();
        }
        let existing = requests
            .iter()
            .find(|r| r.requested_by_id == self.session.user_id() && r.blocks_new_request())
            .map(|r| r.display_status());
        self.state.lock().await.cache.sync_all(requests);
        Ok(BookGate {
            book_active: book.is_active,
            owned_by_viewer: book.user_id == self.session.user_id(),
            existing,
        })
    }

    /// The current user's books that can back an offer.
    pub async fn my_active_books(&self) -> Result<Vec<Book>, ExchangeError> {
        let books = self.api.books(&self.session).await?;
        Ok(books
            .into_iter()
            .filter(|b| b.user_id == self.session.user_id() && b.is_active)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::{Book, Owner};
    use crate::models::request::RequestStatus;

    fn book(id: i64, uid: &str, first_name: &str) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Author".into(),
            genre: "Fiction".into(),
            description: String::new(),
            user_id: uid.into(),
            owner: Owner {
                uid: uid.into(),
                first_name: first_name.into(),
                last_name: "Example".into(),
                email: Some(format!("{first_name}@example.com")),
                phone: Some("555-0100".into()),
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
            requested_book: book(1, "bob", "Bob"),
            offered_book_id: 2,
            offered_book: book(2, "alice", "Alice"),
            status,
            requested_by_confirmed: by_confirmed,
            requested_to_confirmed: to_confirmed,
        }
    }

    #[test]
    fn card_withholds_contact_while_pending() {
        let mut r = request(RequestStatus::Pending, false, false);
        r.apply_contact_policy();
        let card = RequestCard::from_request(&r, "alice");
        assert_eq!(card.role, Party::Requester);
        assert_eq!(card.other_party, "Bob Example");
        assert_eq!(card.contact, None);
    }

    #[test]
    fn card_exposes_contact_once_accepted() {
        let mut r = request(RequestStatus::Accepted, false, false);
        r.apply_contact_policy();
        let card = RequestCard::from_request(&r, "alice");
        let contact = card.contact.expect("contact visible after accept");
        assert_eq!(contact.email.as_deref(), Some("Bob@example.com"));
    }

    #[test]
    fn responder_card_points_at_offered_book_owner() {
        let r = request(RequestStatus::Accepted, false, false);
        let card = RequestCard::from_request(&r, "bob");
        assert_eq!(card.role, Party::Responder);
        assert_eq!(card.other_party, "Alice Example");
    }

    #[test]
    fn partial_confirmation_label_names_both_parties() {
        let r = request(RequestStatus::Accepted, true, false);
        assert_eq!(
            status_label(&r),
            "Alice - confirmed, Bob - not confirmed"
        );
        let r = request(RequestStatus::Accepted, false, true);
        assert_eq!(
            status_label(&r),
            "Bob - confirmed, Alice - not confirmed"
        );
    }

    #[test]
    fn exchanged_label_wins_over_raw_status() {
        let r = request(RequestStatus::Accepted, true, true);
        assert_eq!(status_label(&r), "exchanged");
    }

    #[test]
    fn gate_blocks_on_existing_live_request() {
        let gate = BookGate {
            book_active: true,
            owned_by_viewer: false,
            existing: Some(DisplayStatus::Pending),
        };
        assert!(!gate.can_request());

        let gate = BookGate {
            book_active: true,
            owned_by_viewer: false,
            existing: None,
        };
        assert!(gate.can_request());

        let gate = BookGate {
            book_active: false,
            owned_by_viewer: false,
            existing: None,
        };
        assert!(!gate.can_request());
    }

    #[test]
    fn gate_blocks_the_viewers_own_book() {
        let gate = BookGate {
            book_active: true,
            owned_by_viewer: true,
            existing: None,
        };
        assert!(!gate.can_request());
    }
}
