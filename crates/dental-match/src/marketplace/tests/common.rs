use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::marketplace::domain::{
    AvailabilityStatus, ClinicUnit, CompensationPreference, JobContract, JobId, JobMatch,
    JobPosting, MatchId, Notification, PostingStatus, Professional, ProfessionalId, Registrant,
    RegistrantId, RegistrantKind, RegistrationReview, RegistrationStatus, RemunerationType,
    StartAvailability, UnitId, UserId,
};
use crate::marketplace::store::{
    DispatchError, MarketplaceStore, NotificationDispatcher, StoreError,
};
use crate::marketplace::MarketplaceService;

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn approved_review() -> RegistrationReview {
    RegistrationReview {
        status: RegistrationStatus::Aprovado,
        approved_at: Some(at(2025, 1, 10, 9)),
        approved_by: Some(UserId::from("admin-1")),
        rejection_reason: None,
    }
}

pub(super) fn professional() -> Professional {
    Professional {
        id: ProfessionalId::from("prof-1"),
        owner_user_id: UserId::from("user-prof-1"),
        full_name: "Ana Beatriz Costa".to_string(),
        license_number: "CRO-12345".to_string(),
        license_state: "GO".to_string(),
        specialty: "Ortodontia".to_string(),
        available_cities: vec!["Goiânia - GO".to_string(), "Anápolis - GO".to_string()],
        available_weekdays: vec!["SEG".to_string(), "QUA".to_string(), "SEX".to_string()],
        years_since_graduation: 5,
        compensation: CompensationPreference {
            remuneration_type: RemunerationType::Diaria,
            expected_value: Some(600),
        },
        availability: AvailabilityStatus::Disponivel,
        start_availability: StartAvailability::Imediato,
        review: approved_review(),
        rating_mean: 4.6,
        rating_count: 12,
    }
}

pub(super) fn posting() -> JobPosting {
    JobPosting {
        id: JobId::from("job-1"),
        unit_id: UnitId::from("unit-1"),
        title: "Ortodontista - substituição de férias".to_string(),
        city: "Goiânia".to_string(),
        state: "GO".to_string(),
        remuneration_type: RemunerationType::Diaria,
        remuneration_value: Some(650),
        accepted_specialties: vec!["Ortodontia".to_string()],
        accepts_employee: true,
        accepts_freelancer: true,
        status: PostingStatus::Aberto,
    }
}

pub(super) fn unit() -> ClinicUnit {
    ClinicUnit {
        id: UnitId::from("unit-1"),
        owner_user_id: UserId::from("user-clinic-1"),
        name: "OdontoCenter Setor Bueno".to_string(),
        city: "Goiânia".to_string(),
        state: "GO".to_string(),
    }
}

pub(super) fn registrant(kind: RegistrantKind, status: RegistrationStatus) -> Registrant {
    Registrant {
        id: RegistrantId::from("reg-1"),
        owner_user_id: UserId::from("user-reg-1"),
        display_name: "Carlos Mendes".to_string(),
        kind,
        professional_id: None,
        review: RegistrationReview {
            status,
            approved_at: None,
            approved_by: None,
            rejection_reason: match status {
                RegistrationStatus::Reprovado => Some("Documento ilegível".to_string()),
                _ => None,
            },
        },
    }
}

pub(super) fn candidatou(id: &str, job: &str, created_at: DateTime<Utc>) -> JobMatch {
    JobMatch {
        id: MatchId::from(id),
        job_id: JobId::from(job),
        professional_id: ProfessionalId::from("prof-1"),
        score: 3,
        match_type: crate::marketplace::domain::MatchType::Semelhante,
        status: crate::marketplace::domain::CandidacyStatus::Candidatou,
        created_at,
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) professionals: Mutex<HashMap<ProfessionalId, Professional>>,
    pub(super) postings: Mutex<HashMap<JobId, JobPosting>>,
    pub(super) matches: Mutex<Vec<JobMatch>>,
    pub(super) contracts: Mutex<Vec<JobContract>>,
    pub(super) units: Mutex<HashMap<UnitId, ClinicUnit>>,
    pub(super) registrants: Mutex<HashMap<RegistrantId, Registrant>>,
}

impl MemoryStore {
    pub(super) fn seed_professional(&self, record: Professional) {
        self.professionals
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(super) fn seed_posting(&self, record: JobPosting) {
        self.postings
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(super) fn seed_unit(&self, record: ClinicUnit) {
        self.units
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(super) fn seed_registrant(&self, record: Registrant) {
        self.registrants
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(super) fn seed_match(&self, record: JobMatch) {
        self.matches.lock().expect("store mutex poisoned").push(record);
    }
}

impl MarketplaceStore for MemoryStore {
    fn fetch_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Option<Professional>, StoreError> {
        Ok(self
            .professionals
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn update_availability(
        &self,
        id: &ProfessionalId,
        availability: AvailabilityStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.professionals.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.availability = availability;
        Ok(())
    }

    fn update_professional_review(
        &self,
        id: &ProfessionalId,
        review: RegistrationReview,
    ) -> Result<(), StoreError> {
        let mut guard = self.professionals.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.review = review;
        Ok(())
    }

    fn list_professionals(&self) -> Result<Vec<Professional>, StoreError> {
        Ok(self
            .professionals
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn fetch_posting(&self, id: &JobId) -> Result<Option<JobPosting>, StoreError> {
        Ok(self
            .postings
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn update_posting_status(&self, id: &JobId, status: PostingStatus) -> Result<(), StoreError> {
        let mut guard = self.postings.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.status = status;
        Ok(())
    }

    fn matches_for_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Vec<JobMatch>, StoreError> {
        Ok(self
            .matches
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|record| &record.professional_id == id)
            .cloned()
            .collect())
    }

    fn fetch_match(&self, id: &MatchId) -> Result<Option<JobMatch>, StoreError> {
        Ok(self
            .matches
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }

    fn insert_match(&self, record: JobMatch) -> Result<JobMatch, StoreError> {
        let mut guard = self.matches.lock().expect("store mutex poisoned");
        let duplicate = guard.iter().any(|existing| {
            existing.professional_id == record.professional_id
                && existing.job_id == record.job_id
                && existing.is_active()
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update_match(&self, record: JobMatch) -> Result<(), StoreError> {
        let mut guard = self.matches.lock().expect("store mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(StoreError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn contract_for(
        &self,
        job_id: &JobId,
        professional_id: &ProfessionalId,
    ) -> Result<Option<JobContract>, StoreError> {
        Ok(self
            .contracts
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|record| &record.job_id == job_id && &record.professional_id == professional_id)
            .cloned())
    }

    fn insert_contract(&self, record: JobContract) -> Result<JobContract, StoreError> {
        let mut guard = self.contracts.lock().expect("store mutex poisoned");
        let duplicate = guard.iter().any(|existing| {
            existing.job_id == record.job_id && existing.professional_id == record.professional_id
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch_unit(&self, id: &UnitId) -> Result<Option<ClinicUnit>, StoreError> {
        Ok(self
            .units
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn fetch_registrant(&self, id: &RegistrantId) -> Result<Option<Registrant>, StoreError> {
        Ok(self
            .registrants
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn update_registrant_review(
        &self,
        id: &RegistrantId,
        review: RegistrationReview,
    ) -> Result<(), StoreError> {
        let mut guard = self.registrants.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.review = review;
        Ok(())
    }
}

/// Delegates to `MemoryStore` but fails the availability write, exercising
/// the partial-issuance path after the contract is persisted.
pub(super) struct BrokenAvailabilityStore(pub(super) MemoryStore);

impl MarketplaceStore for BrokenAvailabilityStore {
    fn fetch_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Option<Professional>, StoreError> {
        self.0.fetch_professional(id)
    }

    fn update_availability(
        &self,
        _id: &ProfessionalId,
        _availability: AvailabilityStatus,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("availability write refused".to_string()))
    }

    fn update_professional_review(
        &self,
        id: &ProfessionalId,
        review: RegistrationReview,
    ) -> Result<(), StoreError> {
        self.0.update_professional_review(id, review)
    }

    fn list_professionals(&self) -> Result<Vec<Professional>, StoreError> {
        self.0.list_professionals()
    }

    fn fetch_posting(&self, id: &JobId) -> Result<Option<JobPosting>, StoreError> {
        self.0.fetch_posting(id)
    }

    fn update_posting_status(&self, id: &JobId, status: PostingStatus) -> Result<(), StoreError> {
        self.0.update_posting_status(id, status)
    }

    fn matches_for_professional(
        &self,
        id: &ProfessionalId,
    ) -> Result<Vec<JobMatch>, StoreError> {
        self.0.matches_for_professional(id)
    }

    fn fetch_match(&self, id: &MatchId) -> Result<Option<JobMatch>, StoreError> {
        self.0.fetch_match(id)
    }

    fn insert_match(&self, record: JobMatch) -> Result<JobMatch, StoreError> {
        self.0.insert_match(record)
    }

    fn update_match(&self, record: JobMatch) -> Result<(), StoreError> {
        self.0.update_match(record)
    }

    fn contract_for(
        &self,
        job_id: &JobId,
        professional_id: &ProfessionalId,
    ) -> Result<Option<JobContract>, StoreError> {
        self.0.contract_for(job_id, professional_id)
    }

    fn insert_contract(&self, record: JobContract) -> Result<JobContract, StoreError> {
        self.0.insert_contract(record)
    }

    fn fetch_unit(&self, id: &UnitId) -> Result<Option<ClinicUnit>, StoreError> {
        self.0.fetch_unit(id)
    }

    fn fetch_registrant(&self, id: &RegistrantId) -> Result<Option<Registrant>, StoreError> {
        self.0.fetch_registrant(id)
    }

    fn update_registrant_review(
        &self,
        id: &RegistrantId,
        review: RegistrationReview,
    ) -> Result<(), StoreError> {
        self.0.update_registrant_review(id, review)
    }
}

#[derive(Default)]
pub(super) struct MemoryDispatcher {
    events: Mutex<Vec<Notification>>,
}

impl MemoryDispatcher {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError> {
        self.events
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) fn build_service() -> (
    MarketplaceService<MemoryStore, MemoryDispatcher>,
    Arc<MemoryStore>,
    Arc<MemoryDispatcher>,
) {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let service = MarketplaceService::new(store.clone(), dispatcher.clone());
    (service, store, dispatcher)
}

pub(super) fn seeded_service() -> (
    MarketplaceService<MemoryStore, MemoryDispatcher>,
    Arc<MemoryStore>,
    Arc<MemoryDispatcher>,
) {
    let (service, store, dispatcher) = build_service();
    store.seed_professional(professional());
    store.seed_posting(posting());
    store.seed_unit(unit());
    (service, store, dispatcher)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
