use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(
    /// Identifier for a registered professional.
    ProfessionalId
);
id_newtype!(
    /// Identifier for a job posting.
    JobId
);
id_newtype!(
    /// Identifier for a clinic unit.
    UnitId
);
id_newtype!(
    /// Identifier for a candidacy (job match) record.
    MatchId
);
id_newtype!(
    /// Identifier for a hire contract record.
    ContractId
);
id_newtype!(
    /// Identifier for any registrant subject to administrator review.
    RegistrantId
);
id_newtype!(
    /// Identifier of the platform user owning a record.
    UserId
);

/// Marketplace availability of a professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    #[serde(rename = "DISPONIVEL")]
    Disponivel,
    #[serde(rename = "INDISPONIVEL")]
    Indisponivel,
    #[serde(rename = "OCUPADO")]
    Ocupado,
}

impl AvailabilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AvailabilityStatus::Disponivel => "DISPONIVEL",
            AvailabilityStatus::Indisponivel => "INDISPONIVEL",
            AvailabilityStatus::Ocupado => "OCUPADO",
        }
    }
}

/// How soon a professional can start a new engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartAvailability {
    #[serde(rename = "IMEDIATO")]
    Imediato,
    #[serde(rename = "15_DIAS")]
    QuinzeDias,
    #[serde(rename = "30_DIAS")]
    TrintaDias,
}

/// Administrator review status shared by every registrant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[serde(rename = "EM_ANALISE")]
    EmAnalise,
    #[serde(rename = "APROVADO")]
    Aprovado,
    #[serde(rename = "REPROVADO")]
    Reprovado,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::EmAnalise => "EM_ANALISE",
            RegistrationStatus::Aprovado => "APROVADO",
            RegistrationStatus::Reprovado => "REPROVADO",
        }
    }
}

/// Review metadata carried by every registrant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationReview {
    pub status: RegistrationStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<UserId>,
    pub rejection_reason: Option<String>,
}

impl RegistrationReview {
    /// Fresh registrations always enter analysis first.
    pub fn pending() -> Self {
        Self {
            status: RegistrationStatus::EmAnalise,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
        }
    }
}

/// Remuneration model offered by a posting or expected by a professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemunerationType {
    #[serde(rename = "DIARIA")]
    Diaria,
    #[serde(rename = "MENSAL")]
    Mensal,
    #[serde(rename = "PORCENTAGEM")]
    Porcentagem,
}

/// Compensation preference declared by a professional at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationPreference {
    pub remuneration_type: RemunerationType,
    pub expected_value: Option<u32>,
}

/// A professional's marketplace profile.
///
/// Created at registration, mutated by profile edits and by the approval
/// workflow; never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: ProfessionalId,
    pub owner_user_id: UserId,
    pub full_name: String,
    pub license_number: String,
    pub license_state: String,
    pub specialty: String,
    /// Cities the professional serves. Intake caps this at six entries.
    pub available_cities: Vec<String>,
    pub available_weekdays: Vec<String>,
    pub years_since_graduation: u8,
    pub compensation: CompensationPreference,
    pub availability: AvailabilityStatus,
    pub start_availability: StartAvailability,
    pub review: RegistrationReview,
    pub rating_mean: f32,
    pub rating_count: u32,
}

/// Lifecycle of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingStatus {
    #[serde(rename = "ABERTO")]
    Aberto,
    #[serde(rename = "PREENCHIDO")]
    Preenchido,
    #[serde(rename = "ENCERRADO")]
    Encerrado,
}

/// A vacancy published by a clinic unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub unit_id: UnitId,
    pub title: String,
    pub city: String,
    pub state: String,
    pub remuneration_type: RemunerationType,
    pub remuneration_value: Option<u32>,
    pub accepted_specialties: Vec<String>,
    pub accepts_employee: bool,
    pub accepts_freelancer: bool,
    pub status: PostingStatus,
}

/// Candidacy lifecycle on a job match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidacyStatus {
    #[serde(rename = "CANDIDATOU")]
    Candidatou,
    #[serde(rename = "CONTRATADO")]
    Contratado,
    #[serde(rename = "REJEITADO")]
    Rejeitado,
}

impl CandidacyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidacyStatus::Candidatou => "CANDIDATOU",
            CandidacyStatus::Contratado => "CONTRATADO",
            CandidacyStatus::Rejeitado => "REJEITADO",
        }
    }
}

/// Match-quality bucket derived from the 0-4 compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "SUPER_JOB")]
    SuperJob,
    #[serde(rename = "SEMELHANTE")]
    Semelhante,
    #[serde(rename = "OUTROS")]
    Outros,
}

impl MatchType {
    /// The label is purely derived from the score and must stay consistent
    /// between search ranking and the persisted match record.
    pub const fn from_score(score: u8) -> Self {
        match score {
            4 => MatchType::SuperJob,
            3 => MatchType::Semelhante,
            _ => MatchType::Outros,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchType::SuperJob => "SUPER_JOB",
            MatchType::Semelhante => "SEMELHANTE",
            MatchType::Outros => "OUTROS",
        }
    }
}

/// Links one applicant to one job posting.
///
/// Invariant: at most one non-rejected match per (professional, job) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub id: MatchId,
    pub job_id: JobId,
    pub professional_id: ProfessionalId,
    pub score: u8,
    pub match_type: MatchType,
    pub status: CandidacyStatus,
    pub created_at: DateTime<Utc>,
}

impl JobMatch {
    pub fn is_active(&self) -> bool {
        self.status != CandidacyStatus::Rejeitado
    }
}

/// Lifecycle of a hire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    #[serde(rename = "ATIVO")]
    Ativo,
    #[serde(rename = "FINALIZADO")]
    Finalizado,
    #[serde(rename = "CANCELADO")]
    Cancelado,
}

/// Record created exactly once per confirmed hire, carrying the paired
/// single-use tokens that unlock the mutual rating exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobContract {
    pub id: ContractId,
    pub job_id: JobId,
    pub professional_id: ProfessionalId,
    pub unit_id: UnitId,
    pub professional_token: String,
    pub clinic_token: String,
    pub token_created_at: DateTime<Utc>,
    pub token_expires_at: DateTime<Utc>,
    pub status: ContractStatus,
}

/// A clinic unit owning postings and one side of each hire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicUnit {
    pub id: UnitId,
    pub owner_user_id: UserId,
    pub name: String,
    pub city: String,
    pub state: String,
}

/// Professional categories carried by registrant records so notifications can
/// address the right audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfessionalCategory {
    #[serde(rename = "DENTISTA")]
    Dentista,
    #[serde(rename = "TSB")]
    Tsb,
    #[serde(rename = "ASB")]
    Asb,
}

impl ProfessionalCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ProfessionalCategory::Dentista => "DENTISTA",
            ProfessionalCategory::Tsb => "TSB",
            ProfessionalCategory::Asb => "ASB",
        }
    }
}

/// The entity kinds subject to administrator approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrantKind {
    Professional(ProfessionalCategory),
    ClinicOwner,
    Supplier,
    Hospital,
    Institution,
}

impl RegistrantKind {
    /// Recipient type used when addressing notifications to the registrant's
    /// owning user: the professional sub-type label, or the fixed literal for
    /// the other kinds.
    pub const fn recipient_type(self) -> &'static str {
        match self {
            RegistrantKind::Professional(category) => category.label(),
            RegistrantKind::ClinicOwner => "CLINICA",
            RegistrantKind::Supplier => "FORNECEDOR",
            RegistrantKind::Hospital => "HOSPITAL",
            RegistrantKind::Institution => "INSTITUICAO",
        }
    }
}

/// Registrant projection consumed by the approval workflow.
///
/// Polymorphic over the full record shapes: the workflow only needs identity,
/// kind, the owning user, and the review block. Professional registrants also
/// carry the id of the profile record their decision must be mirrored onto,
/// since search visibility filters on [`Professional::review`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registrant {
    pub id: RegistrantId,
    pub owner_user_id: UserId,
    pub display_name: String,
    pub kind: RegistrantKind,
    #[serde(default)]
    pub professional_id: Option<ProfessionalId>,
    pub review: RegistrationReview,
}

/// Delivery channels the dispatcher may use. The core only records intent;
/// delivery mechanics live behind the dispatcher trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationChannel {
    #[serde(rename = "PUSH")]
    Push,
    #[serde(rename = "WHATSAPP")]
    WhatsApp,
    #[serde(rename = "EMAIL")]
    Email,
}

/// Event vocabulary understood by the delivery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "STATUS_APROVADO")]
    StatusAprovado,
    #[serde(rename = "STATUS_REPROVADO")]
    StatusReprovado,
    #[serde(rename = "NOVA_CANDIDATURA")]
    NovaCandidatura,
    #[serde(rename = "CONTRATACAO_CONFIRMADA")]
    ContratacaoConfirmada,
    #[serde(rename = "AVISO_ADMINISTRATIVO")]
    AvisoAdministrativo,
}

/// Message handed to the dispatcher. Fire-and-forget from the core's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient_id: UserId,
    pub recipient_type: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub channels: Vec<NotificationChannel>,
}
