//! Domain layer - the user record and the rules it must satisfy.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Both store adapters and the HTTP gateway build on the types defined here.

pub mod batch;
pub mod constants;
pub mod error;
pub mod user;

pub use batch::UserBatch;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use user::{
    validation_messages, DocumentUser, DualUser, DualUserList, RelationalUser, UserRecord,
};
