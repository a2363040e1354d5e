//! Repository factory trait
//!
//! Repositories are constructed from a shared client so the service layer never
//! touches the pool directly.

/// A trait for database repository factories
///
/// Generic over the repository type and whatever the repository is built from.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance from `config`.
    fn create_repository(&self, config: C) -> R;
}
