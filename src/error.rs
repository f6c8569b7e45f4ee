/// Input rejected before it reaches storage.
///
/// This is the only error kind callers of [`crate::store::TaskStore`] see;
/// storage faults are absorbed at that boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("category name must not be empty")]
    EmptyCategoryName,
    /// Category names are unique; a second insert with the same name is refused.
    #[error("category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}
