//! Service layer - business logic spanning both stores.

mod probe;
mod user_service;

pub use probe::StoreProbe;
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use probe::MockStoreProbe;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
