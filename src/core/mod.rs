// Shared building blocks of every entity repository: the allow-list trait and
// the existence / uniqueness / association guards.

pub mod guards;
pub mod traits;

pub use guards::{ensure_association_absent, ensure_unique, fetch_association, fetch_by_id};
pub use traits::{MergeIntoActiveModel, Resource};
