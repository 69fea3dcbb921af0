use super::domain::{
    ClinicUnit, JobContract, JobId, JobMatch, JobPosting, MatchId, Notification, PostingStatus,
    Professional, ProfessionalId, Registrant, RegistrantId, RegistrationReview, UnitId,
};
use crate::marketplace::domain::AvailabilityStatus;

/// Storage boundary consumed by the engine.
///
/// Each call is atomic over a single record; there are no cross-record
/// transactions. The two uniqueness invariants (one active candidacy per
/// (professional, job), one contract per (job, professional)) are enforced by
/// the store at insert time via [`StoreError::Conflict`] so concurrent
/// read-then-write races cannot slip a duplicate through.
pub trait MarketplaceStore: Send + Sync {
    fn fetch_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Option<Professional>, StoreError>;
    fn update_availability(
        &self,
        id: &ProfessionalId,
        availability: AvailabilityStatus,
    ) -> Result<(), StoreError>;
    fn update_professional_review(
        &self,
        id: &ProfessionalId,
        review: RegistrationReview,
    ) -> Result<(), StoreError>;
    fn list_professionals(&self) -> Result<Vec<Professional>, StoreError>;

    fn fetch_posting(&self, id: &JobId) -> Result<Option<JobPosting>, StoreError>;
    fn update_posting_status(&self, id: &JobId, status: PostingStatus) -> Result<(), StoreError>;

    /// Every match ever recorded for the professional, any status.
    fn matches_for_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Vec<JobMatch>, StoreError>;
    fn fetch_match(&self, id: &MatchId) -> Result<Option<JobMatch>, StoreError>;
    /// Must fail with [`StoreError::Conflict`] when a non-rejected match
    /// already exists for the same (professional, job) pair.
    fn insert_match(&self, record: JobMatch) -> Result<JobMatch, StoreError>;
    fn update_match(&self, record: JobMatch) -> Result<(), StoreError>;

    fn contract_for(
        &self,
        job_id: &JobId,
        professional_id: &ProfessionalId,
    ) -> Result<Option<JobContract>, StoreError>;
    /// Must fail with [`StoreError::Conflict`] when a contract already exists
    /// for the same (job, professional) pair.
    fn insert_contract(&self, record: JobContract) -> Result<JobContract, StoreError>;

    fn fetch_unit(&self, id: &UnitId) -> Result<Option<ClinicUnit>, StoreError>;

    fn fetch_registrant(&self, id: &RegistrantId) -> Result<Option<Registrant>, StoreError>;
    fn update_registrant_review(
        &self,
        id: &RegistrantId,
        review: RegistrationReview,
    ) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook. Delivery is fire-and-forget: the core treats
/// call acceptance as success and never awaits confirmation.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
