//! Persistence seam for users and refresh tokens
//!
//! `SessionStore` is the trait the session manager is written against; the
//! file-backed implementation here is the default deployment target. Email
//! uniqueness is enforced inside the store, so a registration race between
//! two requests resolves to one winner and one `StoreError::Conflict`.

pub mod error;
pub mod file;
pub mod records;
pub mod store;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use records::{NewUser, RefreshTokenRecord, UserRecord};
pub use store::SessionStore;
