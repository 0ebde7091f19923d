use sea_orm::{EntityTrait, Order};

/// A catalog entity exposed through list endpoints.
///
/// The two column tables are the security boundary of the list endpoints:
/// a field name that is not listed here never reaches the query builder.
/// Filtering and sorting are allow-listed independently, so a column may be
/// sortable without being filterable (and vice versa).
pub trait Resource: EntityTrait {
    /// Human readable singular name, used in `"<Name> not found"` messages.
    const RESOURCE_NAME: &'static str;

    /// Columns accepted by the filter expression language.
    fn filterable_columns() -> Vec<(&'static str, Self::Column)>;

    /// Columns accepted as `sort_by`.
    fn sortable_columns() -> Vec<(&'static str, Self::Column)>;

    /// Ordering applied to listings when the caller gives no `sort_by`.
    fn default_order() -> (Self::Column, Order);

    #[must_use]
    fn not_found_message() -> String {
        format!("{} not found", Self::RESOURCE_NAME)
    }
}

/// Partial update payload that writes only the fields it carries.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    fn merge_into_activemodel(self, existing: ActiveModelType) -> ActiveModelType;
}
