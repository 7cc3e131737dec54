//! Negotiation coordinator
//!
//! Exposes the intent-level operations (request, accept, decline, cancel,
//! confirm) and owns the local cache. Every mutating intent is validated
//! against the state machine before any network call, holds the
//! at-most-one-in-flight-per-request slot while the call is outstanding, and
//! patches the cache optimistically only when no newer fetch has landed in
//! the meantime.

use std::collections::HashSet;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::exchange::{CreateRequestBody, ExchangeApi};
use crate::cache::RequestCache;
use crate::error::ExchangeError;
use crate::machine::{self, Action, Transition};
use crate::models::ExchangeRequest;
use crate::session::Session;

pub(crate) struct CoordinatorState {
    pub(crate) cache: RequestCache,
    pub(crate) in_flight: HashSet<String>,
}

/// Client-side coordinator for exchange negotiations, acting on behalf of
/// one logged-in user.
pub struct ExchangeCoordinator<A> {
    pub(crate) api: A,
    pub(crate) session: Session,
    pub(crate) state: Mutex<CoordinatorState>,
}

impl<A: ExchangeApi> ExchangeCoordinator<A> {
    pub fn new(api: A, session: Session) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(CoordinatorState {
                cache: RequestCache::new(),
                in_flight: HashSet::new(),
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Locally cached copy of a request, if any.
    pub async fn cached(&self, request_id: &str) -> Option<ExchangeRequest> {
        self.state.lock().await.cache.get(request_id).cloned()
    }

    /// Fetch a single request from the server and reconcile the cache.
    pub async fn refresh(&self, request_id: &str) -> Result<ExchangeRequest, ExchangeError> {
        let mut fetched = self.api.request_by_id(&self.session, request_id).await?;
        fetched.apply_contact_policy();
        self.state.lock().await.cache.sync(fetched.clone());
        Ok(fetched)
    }

    /// Open a new exchange request: offer `offered_book_id` (owned by the
    /// current user) for `requested_book_id`.
    ///
    /// Gated locally first: the target book must be active and belong to
    /// someone else, the offered book must be the user's own active book,
    /// and the user must not already have a live request on the target.
    pub async fn request_exchange(
        &self,
        requested_book_id: i64,
        offered_book_id: i64,
    ) -> Result<ExchangeRequest, ExchangeError> {
        let gate = self.book_gate(requested_book_id).await?;
        if !gate.book_active {
            return Err(ExchangeError::BookInactive);
        }
        if gate.owned_by_viewer {
            return Err(ExchangeError::InvalidOffer(
                "you cannot request your own book".into(),
            ));
        }
        if gate.existing.is_some() {
            return Err(ExchangeError::DuplicateRequest);
        }

        let offered = self.api.book_by_id(&self.session, offered_book_id).await?;
        if offered.user_id != self.session.user_id() {
            return Err(ExchangeError::InvalidOffer(
                "the offered book does not belong to you".into(),
            ));
        }
        if !offered.is_active {
            return Err(ExchangeError::InvalidOffer(
                "the offered book is not open for exchange".into(),
            ));
        }

        let body = CreateRequestBody {
            requested_book_id,
            offered_book_id,
        };
        let mut created = self.api.create_request(&self.session, &body).await?;
        created.apply_contact_policy();
        info!(
            request_id = %created.id,
            requested_book_id, offered_book_id, "exchange request created"
        );
        self.state.lock().await.cache.sync(created.clone());
        Ok(created)
    }

    /// Accept a pending request. Responder only.
    pub async fn accept(&self, request_id: &str) -> Result<ExchangeRequest, ExchangeError> {
        self.dispatch_updating(request_id, Action::Accept).await
    }

    /// Decline a pending request. Responder only.
    pub async fn decline(&self, request_id: &str) -> Result<ExchangeRequest, ExchangeError> {
        self.dispatch_updating(request_id, Action::Decline).await
    }

    /// Record this party's confirmation that the physical exchange happened.
    pub async fn confirm(&self, request_id: &str) -> Result<ExchangeRequest, ExchangeError> {
        self.dispatch_updating(request_id, Action::Confirm).await
    }

    /// Cancel a pending request. Requester only; the request is removed.
    pub async fn cancel(&self, request_id: &str) -> Result<(), ExchangeError> {
        self.dispatch(request_id, Action::Cancel).await.map(|_| ())
    }

    async fn dispatch_updating(
        &self,
        request_id: &str,
        action: Action,
    ) -> Result<ExchangeRequest, ExchangeError> {
        self.dispatch(request_id, action).await?.ok_or_else(|| {
            ExchangeError::Internal("transition produced no local state".into())
        })
    }

    /// Common path for all mutating actions on an existing request.
    async fn dispatch(
        &self,
        request_id: &str,
        action: Action,
    ) -> Result<Option<ExchangeRequest>, ExchangeError> {
        // Hydrate the local view if this request was never fetched.
        let needs_hydration = {
            let state = self.state.lock().await;
            state.cache.get(request_id).is_none() && !state.in_flight.contains(request_id)
        };
        if needs_hydration {
            let mut fetched = self.api.request_by_id(&self.session, request_id).await?;
            fetched.apply_contact_policy();
            self.state.lock().await.cache.sync(fetched);
        }

        // Validate against the cached view and claim the in-flight slot.
        // Both happen under one lock so double submits collapse.
        let (snapshot, transition, based_on) = {
            let mut state = self.state.lock().await;
            if state.in_flight.contains(request_id) {
                debug!(request_id, action = action.as_str(), "duplicate call blocked");
                return Err(ExchangeError::InFlight(request_id.to_string()));
            }
            let request = state
                .cache
                .get(request_id)
                .ok_or_else(|| ExchangeError::NotFound(format!("request {request_id}")))?;
            let transition = machine::validate(request, self.session.user_id(), action)?;
            let snapshot = request.clone();
            let based_on = state.cache.generation_of(request_id).unwrap_or(0);
            state.in_flight.insert(request_id.to_string());
            (snapshot, transition, based_on)
        };

        let result = match action {
            Action::Accept => self.api.accept(&self.session, request_id).await,
            Action::Decline => self.api.decline(&self.session, request_id).await,
            Action::Cancel => self.api.cancel(&self.session, request_id).await,
            Action::Confirm => self.api.confirm(&self.session, request_id).await,
        };

        let mut state = self.state.lock().await;
        state.in_flight.remove(request_id);

        match result {
            Ok(()) => {
                info!(request_id, action = action.as_str(), "exchange action applied");
                match transition {
                    Transition::Removed => {
                        state.cache.remove(request_id);
                        Ok(None)
                    }
                    transition => {
                        let mut patched = snapshot;
                        machine::apply(&mut patched, transition);
                        if !state.cache.patch_if_current(patched.clone(), based_on) {
                            debug!(request_id, "optimistic patch superseded by newer fetch");
                        }
                        Ok(Some(patched))
                    }
                }
            }
            Err(e) => {
                warn!(request_id, action = action.as_str(), error = %e, "exchange action failed");
                Err(e.into())
            }
        }
    }
}
