//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Contact records captured from returning users
    pub const RETURNING_USERS: &str = "returning_users";
}
