use super::common::*;
use crate::marketplace::approval::{
    approve, compose_rejection_reason, notice, reject, ApprovalError, RejectionReasonCode,
};
use crate::marketplace::domain::{
    NotificationChannel, NotificationKind, ProfessionalCategory, RegistrantKind,
    RegistrationStatus, UserId,
};

#[test]
fn approve_stamps_metadata_and_emits_status_aprovado() {
    let registrant = registrant(
        RegistrantKind::Professional(ProfessionalCategory::Dentista),
        RegistrationStatus::EmAnalise,
    );
    let now = at(2025, 6, 20, 10);

    let outcome = approve(&registrant, &UserId::from("admin-7"), now);

    assert_eq!(outcome.review.status, RegistrationStatus::Aprovado);
    assert_eq!(outcome.review.approved_at, Some(now));
    assert_eq!(outcome.review.approved_by, Some(UserId::from("admin-7")));
    assert!(outcome.review.rejection_reason.is_none());
    assert_eq!(outcome.notification.kind, NotificationKind::StatusAprovado);
    assert_eq!(outcome.notification.recipient_type, "DENTISTA");
    assert_eq!(
        outcome.notification.recipient_id,
        registrant.owner_user_id
    );
}

#[test]
fn approving_a_rejected_registrant_clears_the_reason() {
    let registrant = registrant(RegistrantKind::Supplier, RegistrationStatus::Reprovado);
    assert!(registrant.review.rejection_reason.is_some());

    let outcome = approve(&registrant, &UserId::from("admin-7"), at(2025, 6, 20, 10));

    assert_eq!(outcome.review.status, RegistrationStatus::Aprovado);
    assert!(outcome.review.rejection_reason.is_none());
    assert_eq!(outcome.notification.recipient_type, "FORNECEDOR");
}

#[test]
fn reject_composes_the_documented_reason_string() {
    let reason = compose_rejection_reason(
        &[
            RejectionReasonCode::DocumentoIlegivel,
            RejectionReasonCode::Outro,
        ],
        "foto cortada",
    )
    .expect("reason composes");

    assert_eq!(reason, "Documento ilegível, Outro. foto cortada");
}

#[test]
fn reject_accepts_codes_without_free_text_and_vice_versa() {
    let codes_only =
        compose_rejection_reason(&[RejectionReasonCode::DadosIncompletos], "").expect("composes");
    assert_eq!(codes_only, "Dados incompletos");

    let text_only = compose_rejection_reason(&[], "CRO suspenso").expect("composes");
    assert_eq!(text_only, "CRO suspenso");
}

#[test]
fn reject_requires_some_reason() {
    let err = compose_rejection_reason(&[], "  ").expect_err("must fail");
    assert!(matches!(err, ApprovalError::MissingReason));
}

#[test]
fn reject_persists_reason_and_clears_approval_stamps() {
    let registrant = registrant(RegistrantKind::Hospital, RegistrationStatus::EmAnalise);

    let outcome = reject(
        &registrant,
        &[RejectionReasonCode::RegistroInvalido],
        "",
    )
    .expect("rejection succeeds");

    assert_eq!(outcome.review.status, RegistrationStatus::Reprovado);
    assert!(outcome.review.approved_at.is_none());
    assert!(outcome.review.approved_by.is_none());
    assert_eq!(
        outcome.review.rejection_reason.as_deref(),
        Some("Registro profissional inválido")
    );
    assert_eq!(outcome.notification.kind, NotificationKind::StatusReprovado);
    assert_eq!(outcome.notification.recipient_type, "HOSPITAL");
}

#[test]
fn notices_are_permitted_in_any_state() {
    let registrant = registrant(RegistrantKind::ClinicOwner, RegistrationStatus::Reprovado);

    let notification = notice(
        &registrant,
        "Documento ilegível",
        "Reenvie a foto do alvará, por favor.",
        vec![NotificationChannel::WhatsApp],
    );

    assert_eq!(notification.kind, NotificationKind::AvisoAdministrativo);
    assert_eq!(notification.recipient_type, "CLINICA");
    assert_eq!(notification.channels, vec![NotificationChannel::WhatsApp]);
}
