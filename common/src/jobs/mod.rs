use serde::Serialize;

/// Lifecycle of a background job such as an archive import.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of the work done so far.
    InProgress(u32),
    Completed(String),
    Failed(String),
}
