//! Matching and contract lifecycle engine.
//!
//! Four pieces carry the real invariants: [`scoring`] computes the 0-4
//! compatibility score, [`candidacy`] gates monthly submissions, [`approval`]
//! drives registrant visibility, and [`contracts`] issues the paired rating
//! tokens on a confirmed hire. [`service`] composes them over the store and
//! dispatcher traits, and [`router`] exposes the operations over HTTP.

pub mod approval;
pub mod candidacy;
pub mod contracts;
pub mod domain;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use approval::{ApprovalError, RejectionReasonCode, ReviewOutcome};
pub use candidacy::{MonthlyQuota, MONTHLY_APPLICATION_LIMIT};
pub use contracts::{decode_token, TokenClaims, TokenParty, TOKEN_PREFIX, TOKEN_VALIDITY_DAYS};
pub use domain::{
    AvailabilityStatus, CandidacyStatus, ClinicUnit, CompensationPreference, ContractId,
    ContractStatus, JobContract, JobId, JobMatch, JobPosting, MatchId, MatchType, Notification,
    NotificationChannel, NotificationKind, PostingStatus, Professional, ProfessionalCategory,
    ProfessionalId, Registrant, RegistrantId, RegistrantKind, RegistrationReview,
    RegistrationStatus, RemunerationType, StartAvailability, UnitId, UserId,
};
pub use router::marketplace_router;
pub use scoring::{score_candidate, ScoreBreakdown, SearchCriteria};
pub use service::{CandidacyRequest, MarketplaceService, RankedCandidate, ServiceError};
pub use store::{DispatchError, MarketplaceStore, NotificationDispatcher, StoreError};
