/// Structural problems in a role table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoleTableError {
    #[error("citizen floor {floor} must be below director threshold {director}")]
    FloorAboveDirector { floor: i64, director: i64 },
    #[error("director threshold {director} exceeds technician threshold {technician}")]
    DirectorAboveTechnician { director: i64, technician: i64 },
    #[error("role {0} is listed as both admin and reviewer")]
    AdminReviewerOverlap(i64),
    #[error("role ids must be positive, got {0}")]
    NonPositiveId(i64),
}

/// Failure while looking up a reviewer's department assignment.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("assignment source unavailable: {0}")]
    Unavailable(String),
    #[error("procedure {0} has no assignment record")]
    MissingRecord(String),
}
