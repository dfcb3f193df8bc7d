//! Application services
//!
//! Each service depends only on the traits in [`crate::traits`];
//! [`ServiceContainer`] is where concrete adapters are chosen.

pub mod acquirer;
pub mod container;
pub mod identity;
pub mod library;
pub mod lookup;
pub mod password;
pub mod registrar;
pub mod token;

pub use acquirer::AudioAcquirer;
pub use container::ServiceContainer;
pub use identity::IdentityService;
pub use library::{LibraryReader, LibraryRemover};
pub use lookup::AudioSourceLookup;
pub use password::PasswordHasher;
pub use registrar::LibraryEntryRegistrar;
pub use token::TokenHandler;
