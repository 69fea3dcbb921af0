use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Notification, NotificationChannel, NotificationKind, Registrant, RegistrationReview,
    RegistrationStatus, UserId,
};

/// Structured reasons an administrator can select when rejecting a registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReasonCode {
    #[serde(rename = "DOCUMENTO_ILEGIVEL")]
    DocumentoIlegivel,
    #[serde(rename = "DADOS_INCOMPLETOS")]
    DadosIncompletos,
    #[serde(rename = "REGISTRO_INVALIDO")]
    RegistroInvalido,
    #[serde(rename = "OUTRO")]
    Outro,
}

impl RejectionReasonCode {
    /// Human label used verbatim inside the composed reason string.
    pub const fn label(self) -> &'static str {
        match self {
            RejectionReasonCode::DocumentoIlegivel => "Documento ilegível",
            RejectionReasonCode::DadosIncompletos => "Dados incompletos",
            RejectionReasonCode::RegistroInvalido => "Registro profissional inválido",
            RejectionReasonCode::Outro => "Outro",
        }
    }
}

/// Validation errors raised by the approval workflow.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error("rejection requires at least one reason code or free text")]
    MissingReason,
}

/// Result of an administrator decision: the review block to persist plus the
/// notification to deliver. Persistence and delivery stay with the caller so
/// the decision itself remains pure.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub review: RegistrationReview,
    pub notification: Notification,
}

const STATUS_CHANNELS: [NotificationChannel; 2] =
    [NotificationChannel::Push, NotificationChannel::Email];

/// Approve a registrant. Also the path for revisiting a REPROVADO record: the
/// stored rejection reason is cleared. Re-approving an approved record is a
/// business-level no-op, so last-write-wins between administrators is fine.
pub fn approve(registrant: &Registrant, admin: &UserId, now: DateTime<Utc>) -> ReviewOutcome {
    let review = RegistrationReview {
        status: RegistrationStatus::Aprovado,
        approved_at: Some(now),
        approved_by: Some(admin.clone()),
        rejection_reason: None,
    };

    let notification = Notification {
        recipient_id: registrant.owner_user_id.clone(),
        recipient_type: registrant.kind.recipient_type().to_string(),
        kind: NotificationKind::StatusAprovado,
        title: "Cadastro aprovado".to_string(),
        message: "Seu cadastro foi aprovado e seu perfil já está visível no marketplace."
            .to_string(),
        channels: STATUS_CHANNELS.to_vec(),
    };

    ReviewOutcome {
        review,
        notification,
    }
}

/// Reject a registrant with at least one structured code or free text.
pub fn reject(
    registrant: &Registrant,
    codes: &[RejectionReasonCode],
    free_text: &str,
) -> Result<ReviewOutcome, ApprovalError> {
    let reason = compose_rejection_reason(codes, free_text)?;

    let review = RegistrationReview {
        status: RegistrationStatus::Reprovado,
        approved_at: None,
        approved_by: None,
        rejection_reason: Some(reason.clone()),
    };

    let notification = Notification {
        recipient_id: registrant.owner_user_id.clone(),
        recipient_type: registrant.kind.recipient_type().to_string(),
        kind: NotificationKind::StatusReprovado,
        title: "Cadastro reprovado".to_string(),
        message: reason,
        channels: STATUS_CHANNELS.to_vec(),
    };

    Ok(ReviewOutcome {
        review,
        notification,
    })
}

/// Compose the persisted reason string: selected labels joined with `", "`,
/// then `". "` plus the free text when present.
pub fn compose_rejection_reason(
    codes: &[RejectionReasonCode],
    free_text: &str,
) -> Result<String, ApprovalError> {
    let free_text = free_text.trim();
    if codes.is_empty() && free_text.is_empty() {
        return Err(ApprovalError::MissingReason);
    }

    let labels = codes
        .iter()
        .map(|code| code.label())
        .collect::<Vec<_>>()
        .join(", ");

    let reason = match (labels.is_empty(), free_text.is_empty()) {
        (false, false) => format!("{labels}. {free_text}"),
        (false, true) => labels,
        (true, false) => free_text.to_string(),
        (true, true) => unreachable!("guarded above"),
    };

    Ok(reason)
}

/// Out-of-band administrative nudge, permitted in any review state.
pub fn notice(
    registrant: &Registrant,
    title: &str,
    message: &str,
    channels: Vec<NotificationChannel>,
) -> Notification {
    Notification {
        recipient_id: registrant.owner_user_id.clone(),
        recipient_type: registrant.kind.recipient_type().to_string(),
        kind: NotificationKind::AvisoAdministrativo,
        title: title.to_string(),
        message: message.to_string(),
        channels,
    }
}
