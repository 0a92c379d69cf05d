use serde::Serialize;

/// Operation named by the leading keyword of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    /// Select many rows
    ///
    /// # Example
    /// ```text
    /// findByName
    /// ```
    Find,

    /// Select a single row
    ///
    /// # Example
    /// ```text
    /// getById
    /// ```
    Get,

    /// Count matching rows
    Count,

    /// Test whether any row matches
    Exists,

    /// Delete matching rows
    Delete,

    /// Insert the payload bean (or every bean of an iterable with `All`)
    Insert,

    /// Update matching rows from the payload bean
    Update,

    /// Select one page of rows, bounded by `offset` and `limit` parameters
    Page,
}

impl OperationKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "find" => Some(OperationKind::Find),
            "get" => Some(OperationKind::Get),
            "count" => Some(OperationKind::Count),
            "exists" => Some(OperationKind::Exists),
            "delete" => Some(OperationKind::Delete),
            "insert" => Some(OperationKind::Insert),
            "update" => Some(OperationKind::Update),
            "page" => Some(OperationKind::Page),
            _ => None,
        }
    }
}
