//! Book and owner models as the backend serves them

use serde::{Deserialize, Serialize};

/// Contact and display details of a book's owner.
///
/// Email and phone are only meant to be shown once an exchange request on the
/// book has been accepted; [`Owner::redact_contact`] strips them for earlier
/// states even if the backend included them in a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Owner {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Drop contact details that must not be rendered yet.
    pub fn redact_contact(&mut self) {
        self.email = None;
        self.phone = None;
    }
}

/// Pickup location attached to a book listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A book listing referenced by exchange requests.
///
/// `is_active` is owned by the backend: it flips to false once a request on
/// the book is accepted, at which point sibling pending requests get
/// auto-declined server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub user_id: String,
    pub owner: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub is_active: bool,
}
