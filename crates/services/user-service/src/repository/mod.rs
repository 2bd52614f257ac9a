//! Repository layer for both stores.

mod documents;
pub mod entities;
mod lookup;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod relational;

pub use documents::{to_filter, DocumentStore, MongoUserStore, UserDocument};
pub use lookup::UserLookup;
pub use relational::{to_condition, RelationalStore, SqlUserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use documents::MockDocumentStore;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryDocumentStore;
#[cfg(any(test, feature = "test-utils"))]
pub use relational::MockRelationalStore;
