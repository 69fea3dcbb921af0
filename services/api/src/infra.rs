use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use dental_match::marketplace::{
    AvailabilityStatus, ClinicUnit, DispatchError, JobContract, JobId, JobMatch, JobPosting,
    MarketplaceStore, MatchId, Notification, NotificationDispatcher, PostingStatus, Professional,
    ProfessionalId, Registrant, RegistrantId, RegistrationReview, StoreError, UnitId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Entity store backed by process memory. Insert paths enforce the two pair
/// uniqueness invariants the engine relies on.
#[derive(Default)]
pub(crate) struct InMemoryMarketplaceStore {
    professionals: Mutex<HashMap<ProfessionalId, Professional>>,
    postings: Mutex<HashMap<JobId, JobPosting>>,
    matches: Mutex<Vec<JobMatch>>,
    contracts: Mutex<Vec<JobContract>>,
    units: Mutex<HashMap<UnitId, ClinicUnit>>,
    registrants: Mutex<HashMap<RegistrantId, Registrant>>,
}

impl InMemoryMarketplaceStore {
    pub(crate) fn seed_professional(&self, record: Professional) {
        self.professionals
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(crate) fn seed_posting(&self, record: JobPosting) {
        self.postings
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(crate) fn seed_unit(&self, record: ClinicUnit) {
        self.units
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(crate) fn seed_registrant(&self, record: Registrant) {
        self.registrants
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }
}

impl MarketplaceStore for InMemoryMarketplaceStore {
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

/// Dispatcher that records intents and logs them. Real deployments swap in
/// push/WhatsApp/email transports behind the same trait.
#[derive(Default)]
pub(crate) struct LoggingDispatcher {
    events: Mutex<Vec<Notification>>,
}

impl LoggingDispatcher {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl NotificationDispatcher for LoggingDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError> {
        info!(
            recipient = notification.recipient_id.as_str(),
            recipient_type = %notification.recipient_type,
            kind = ?notification.kind,
            "notification accepted for delivery"
        );
        self.events
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notification);
        Ok(())
    }
}
