//! Exchange request state machine
//!
//! Pure transition logic for the negotiation protocol. Given a request, the
//! acting user and an intended action, [`validate`] either rejects the
//! combination or yields a [`Transition`] that [`apply`] can replay onto a
//! local copy of the request. No I/O happens here; the coordinator calls
//! `validate` before touching the network so illegal actions never cost a
//! round trip.

use thiserror::Error;

use crate::models::request::{ExchangeRequest, Party, RequestStatus};

/// A mutating action one of the two parties can attempt on an existing
/// request. Creation is handled separately by the coordinator since its
/// preconditions involve book listings, not an existing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Accept,
    Decline,
    Cancel,
    Confirm,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Accept => "accept",
            Action::Decline => "decline",
            Action::Cancel => "cancel",
            Action::Confirm => "confirm",
        }
    }
}

/// The state change a legal action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ToAccepted,
    ToDeclined,
    /// Cancelled requests are deleted, not kept as a row.
    Removed,
    Confirmed {
        by: Party,
        /// True when the other party had already confirmed, so this
        /// confirmation completes the exchange.
        completes: bool,
    },
}

/// Why a (state, action, actor) combination is illegal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("user is not a party to this exchange request")]
    NotAParty,
    #[error("only the {} may {} this request", required_name(.required), .action.as_str())]
    WrongActor { action: Action, required: Party },
    #[error("cannot {} a request that is {:?}", .action.as_str(), .status)]
    InvalidState {
        action: Action,
        status: RequestStatus,
    },
    #[error("this party has already confirmed the exchange")]
    AlreadyConfirmed,
}

fn required_name(party: &Party) -> &'static str {
    match party {
        Party::Requester => "requester",
        Party::Responder => "book owner",
    }
}

/// Checks the transition table and returns the resulting transition.
pub fn validate(
    request: &ExchangeRequest,
    user_id: &str,
    action: Action,
) -> Result<Transition, TransitionError> {
    let role = request.role_of(user_id).ok_or(TransitionError::NotAParty)?;

    match action {
        Action::Accept | Action::Decline => {
            if role != Party::Responder {
                return Err(TransitionError::WrongActor {
                    action,
                    required: Party::Responder,
                });
            }
            if request.status != RequestStatus::Pending {
                return Err(TransitionError::InvalidState {
                    action,
                    status: request.status,
                });
            }
            Ok(match action {
                Action::Accept => Transition::ToAccepted,
                _ => Transition::ToDeclined,
            })
        }
        Action::Cancel => {
            if role != Party::Requester {
                return Err(TransitionError::WrongActor {
                    action,
                    required: Party::Requester,
                });
            }
            if request.status != RequestStatus::Pending {
                return Err(TransitionError::InvalidState {
                    action,
                    status: request.status,
                });
            }
            Ok(Transition::Removed)
        }
        Action::Confirm => {
            if request.status != RequestStatus::Accepted {
                return Err(TransitionError::InvalidState {
                    action,
                    status: request.status,
                });
            }
            if request.has_confirmed(role) {
                return Err(TransitionError::AlreadyConfirmed);
            }
            Ok(Transition::Confirmed {
                by: role,
                completes: request.has_confirmed(role.other()),
            })
        }
    }
}

/// Replays a validated transition onto a local copy of the request.
///
/// `Removed` is a no-op here; the caller drops the entry from its cache.
pub fn apply(request: &mut ExchangeRequest, transition: Transition) {
    match transition {
        Transition::ToAccepted => request.status = RequestStatus::Accepted,
        Transition::ToDeclined => request.status = RequestStatus::Declined,
        Transition::Removed => {}
        Transition::Confirmed { by, completes } => {
            match by {
                Party::Requester => request.requested_by_confirmed = true,
                Party::Responder => request.requested_to_confirmed = true,
            }
            if completes {
                request.status = RequestStatus::Exchanged;
            }
        }
    }
}
