use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::approval::{self, ApprovalError, RejectionReasonCode, ReviewOutcome};
use super::candidacy::{has_active_candidacy, monthly_quota, MonthlyQuota};
use super::contracts::build_contract;
use super::domain::{
    AvailabilityStatus, CandidacyStatus, ContractId, JobContract, JobMatch, JobPosting, MatchId,
    MatchType, Notification, NotificationChannel, NotificationKind, PostingStatus, Professional,
    ProfessionalId, RegistrantId, RegistrationStatus, UserId,
};
use super::scoring::{score_candidate, ScoreBreakdown, SearchCriteria};
use super::store::{DispatchError, MarketplaceStore, NotificationDispatcher, StoreError};

static MATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CONTRACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_match_id() -> MatchId {
    let id = MATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MatchId(format!("match-{id:06}"))
}

fn next_contract_id() -> ContractId {
    let id = CONTRACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContractId(format!("contract-{id:06}"))
}

/// Candidacy submission parameters. The secondary filters mirror the search
/// screen so the persisted match carries the same label the professional saw.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidacyRequest {
    pub professional_id: ProfessionalId,
    pub job_id: super::domain::JobId,
    #[serde(default)]
    pub minimum_years_formed: Option<u8>,
    #[serde(default)]
    pub available_now: bool,
}

/// One search result, ordered by score.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub professional_id: ProfessionalId,
    pub full_name: String,
    pub score: u8,
    pub match_type: MatchType,
    pub breakdown: ScoreBreakdown,
}

/// Facade composing the pure scoring/gating/approval/issuance modules with
/// the store and dispatcher boundaries. Stateless between requests: every
/// decision is recomputed from freshly read records.
pub struct MarketplaceService<S, D> {
    store: Arc<S>,
    dispatcher: Arc<D>,
}

impl<S, D> MarketplaceService<S, D>
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    pub fn new(store: Arc<S>, dispatcher: Arc<D>) -> Self {
        Self { store, dispatcher }
    }

    /// Rank approved, available professionals against the criteria, best
    /// score first. The same breakdown later backs the persisted match.
    pub fn rank_candidates(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<RankedCandidate>, ServiceError> {
        let mut ranked: Vec<RankedCandidate> = self
            .store
            .list_professionals()?
            .into_iter()
            .filter(|professional| professional.review.status == RegistrationStatus::Aprovado)
            .filter(|professional| professional.availability == AvailabilityStatus::Disponivel)
            .map(|professional| {
                let breakdown = score_candidate(&professional, criteria);
                RankedCandidate {
                    professional_id: professional.id,
                    full_name: professional.full_name,
                    score: breakdown.total,
                    match_type: breakdown.match_type(),
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(ranked)
    }

    /// Current-month quota for a professional, recomputed from the store.
    pub fn candidacy_quota(
        &self,
        professional_id: &ProfessionalId,
        now: DateTime<Utc>,
    ) -> Result<MonthlyQuota, ServiceError> {
        self.require_professional(professional_id)?;
        let matches = self.store.matches_for_professional(professional_id)?;
        Ok(monthly_quota(&matches, now))
    }

    /// Submit a candidacy: duplicate check first, then the monthly gate, then
    /// scoring and the single match insert. A gate rejection is a normal
    /// outcome and writes nothing.
    pub fn apply(
        &self,
        request: CandidacyRequest,
        now: DateTime<Utc>,
    ) -> Result<JobMatch, ServiceError> {
        let professional = self.require_professional(&request.professional_id)?;
        let posting = self.require_posting(&request.job_id)?;

        if posting.status != PostingStatus::Aberto {
            return Err(ServiceError::Validation(format!(
                "job posting '{}' is not open for candidacies",
                posting.id.as_str()
            )));
        }
        if professional.review.status != RegistrationStatus::Aprovado {
            return Err(ServiceError::Validation(
                "professional registration is not approved".to_string(),
            ));
        }

        let matches = self.store.matches_for_professional(&professional.id)?;
        if has_active_candidacy(&matches, &posting.id) {
            return Err(ServiceError::DuplicateCandidacy);
        }

        let quota = monthly_quota(&matches, now);
        if !quota.allows_submission() {
            return Err(ServiceError::RateLimitExceeded {
                limit: quota.limit,
                used: quota.used,
            });
        }

        let mut criteria = SearchCriteria::from_posting(&posting);
        criteria.minimum_years_formed = request.minimum_years_formed;
        criteria.available_now = request.available_now;
        let breakdown = score_candidate(&professional, &criteria);

        let record = JobMatch {
            id: next_match_id(),
            job_id: posting.id.clone(),
            professional_id: professional.id.clone(),
            score: breakdown.total,
            match_type: breakdown.match_type(),
            status: CandidacyStatus::Candidatou,
            created_at: now,
        };

        // The store re-checks the pair uniqueness at insert time, closing the
        // read-then-write window between two concurrent submissions.
        let stored = match self.store.insert_match(record) {
            Ok(stored) => stored,
            Err(StoreError::Conflict) => return Err(ServiceError::DuplicateCandidacy),
            Err(err) => return Err(err.into()),
        };

        if let Some(unit) = self.store.fetch_unit(&posting.unit_id)? {
            self.dispatcher.dispatch(Notification {
                recipient_id: unit.owner_user_id,
                recipient_type: "CLINICA".to_string(),
                kind: NotificationKind::NovaCandidatura,
                title: "Nova candidatura".to_string(),
                message: format!(
                    "{} candidatou-se à vaga '{}'.",
                    professional.full_name, posting.title
                ),
                channels: vec![NotificationChannel::Push, NotificationChannel::Email],
            })?;
        }

        Ok(stored)
    }

    /// Confirm a hire: persist the authoritative contract first, then apply
    /// the follow-up mutations as best-effort compensations. A compensation
    /// failure is logged for reconciliation and surfaced, never hidden.
    pub fn confirm_hire(
        &self,
        match_id: &MatchId,
        now: DateTime<Utc>,
    ) -> Result<JobContract, ServiceError> {
        let record = self
            .store
            .fetch_match(match_id)?
            .ok_or(ServiceError::NotFound("job match"))?;
        let posting = self.require_posting(&record.job_id)?;
        let professional = self.require_professional(&record.professional_id)?;
        let unit = self
            .store
            .fetch_unit(&posting.unit_id)?
            .ok_or(ServiceError::NotFound("clinic unit"))?;

        if self
            .store
            .contract_for(&posting.id, &professional.id)?
            .is_some()
        {
            return Err(ServiceError::DuplicateContract);
        }

        let contract = build_contract(
            next_contract_id(),
            posting.id.clone(),
            professional.id.clone(),
            unit.id.clone(),
            now,
        );

        let stored = match self.store.insert_contract(contract) {
            Ok(stored) => stored,
            Err(StoreError::Conflict) => return Err(ServiceError::DuplicateContract),
            Err(err) => return Err(err.into()),
        };

        let mut hired = record;
        hired.status = CandidacyStatus::Contratado;
        if let Err(err) = self.store.update_match(hired) {
            return Err(self.partial_issuance(&stored, "job match transition", err));
        }
        if let Err(err) = self
            .store
            .update_posting_status(&posting.id, PostingStatus::Preenchido)
        {
            return Err(self.partial_issuance(&stored, "posting transition", err));
        }
        if let Err(err) = self
            .store
            .update_availability(&professional.id, AvailabilityStatus::Ocupado)
        {
            return Err(self.partial_issuance(&stored, "availability transition", err));
        }

        info!(contract = stored.id.as_str(), "hire confirmed");
        self.dispatcher.dispatch(Notification {
            recipient_id: professional.owner_user_id,
            recipient_type: "DENTISTA".to_string(),
            kind: NotificationKind::ContratacaoConfirmada,
            title: "Contratação confirmada".to_string(),
            message: format!(
                "Você foi contratado para '{}'. Sua avaliação mútua está liberada por {} dias.",
                posting.title,
                super::contracts::TOKEN_VALIDITY_DAYS
            ),
            channels: vec![NotificationChannel::Push, NotificationChannel::Email],
        })?;

        Ok(stored)
    }

    /// Approve a registrant (including a previously rejected one) and notify
    /// the owning user. The decision is mirrored onto the linked professional
    /// profile, which is what search visibility filters on.
    pub fn approve_registrant(
        &self,
        registrant_id: &RegistrantId,
        admin: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, ServiceError> {
        let registrant = self.require_registrant(registrant_id)?;
        let outcome = approval::approve(&registrant, admin, now);
        self.store
            .update_registrant_review(registrant_id, outcome.review.clone())?;
        self.mirror_review(&registrant, &outcome)?;
        self.dispatcher.dispatch(outcome.notification.clone())?;
        Ok(outcome)
    }

    /// Reject a registrant with a composed, persisted reason. Mirrored onto
    /// the linked professional profile like an approval.
    pub fn reject_registrant(
        &self,
        registrant_id: &RegistrantId,
        codes: &[RejectionReasonCode],
        free_text: &str,
    ) -> Result<ReviewOutcome, ServiceError> {
        let registrant = self.require_registrant(registrant_id)?;
        let outcome = approval::reject(&registrant, codes, free_text)?;
        self.store
            .update_registrant_review(registrant_id, outcome.review.clone())?;
        self.mirror_review(&registrant, &outcome)?;
        self.dispatcher.dispatch(outcome.notification.clone())?;
        Ok(outcome)
    }

    fn mirror_review(
        &self,
        registrant: &super::domain::Registrant,
        outcome: &ReviewOutcome,
    ) -> Result<(), ServiceError> {
        if let Some(professional_id) = &registrant.professional_id {
            self.store
                .update_professional_review(professional_id, outcome.review.clone())?;
        }
        Ok(())
    }

    /// Administrative nudge, permitted regardless of review status.
    pub fn notify_registrant(
        &self,
        registrant_id: &RegistrantId,
        title: &str,
        message: &str,
        channels: Vec<NotificationChannel>,
    ) -> Result<Notification, ServiceError> {
        let registrant = self.require_registrant(registrant_id)?;
        let notification = approval::notice(&registrant, title, message, channels);
        self.dispatcher.dispatch(notification.clone())?;
        Ok(notification)
    }

    fn require_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Professional, ServiceError> {
        self.store
            .fetch_professional(id)?
            .ok_or(ServiceError::NotFound("professional"))
    }

    fn require_posting(&self, id: &super::domain::JobId) -> Result<JobPosting, ServiceError> {
        self.store
            .fetch_posting(id)?
            .ok_or(ServiceError::NotFound("job posting"))
    }

    fn require_registrant(
        &self,
        id: &RegistrantId,
    ) -> Result<super::domain::Registrant, ServiceError> {
        self.store
            .fetch_registrant(id)?
            .ok_or(ServiceError::NotFound("registrant"))
    }

    fn partial_issuance(
        &self,
        contract: &JobContract,
        step: &str,
        err: StoreError,
    ) -> ServiceError {
        error!(
            contract = contract.id.as_str(),
            step, error = %err,
            "contract persisted but a follow-up write failed; reconciliation required"
        );
        ServiceError::PartialIssuance {
            contract_id: contract.id.as_str().to_string(),
            detail: format!("{step} failed: {err}"),
        }
    }
}

/// Error raised by the marketplace service. Rate-limit and duplicate variants
/// are user-visible outcomes with specific reasons, not generic failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("monthly application limit reached ({used}/{limit} used this month)")]
    RateLimitExceeded { limit: u32, used: u32 },
    #[error("an active candidacy already exists for this job")]
    DuplicateCandidacy,
    #[error("a contract already exists for this job and professional")]
    DuplicateContract,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("contract {contract_id} persisted but follow-up writes failed: {detail}")]
    PartialIssuance { contract_id: String, detail: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl From<ApprovalError> for ServiceError {
    fn from(value: ApprovalError) -> Self {
        ServiceError::Validation(value.to_string())
    }
}
