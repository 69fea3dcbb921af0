use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use dental_match::error::AppError;
use dental_match::marketplace::{
    decode_token, AvailabilityStatus, CandidacyRequest, ClinicUnit, CompensationPreference,
    JobId, JobPosting, MarketplaceService, PostingStatus, Professional, ProfessionalCategory,
    ProfessionalId, Registrant, RegistrantId, RegistrantKind, RegistrationReview,
    RemunerationType, SearchCriteria, StartAvailability, UnitId, UserId,
};

use crate::infra::{InMemoryMarketplaceStore, LoggingDispatcher};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// City used for the demo search
    #[arg(long, default_value = "Goiânia")]
    pub(crate) city: String,
    /// Specialty used for the demo search
    #[arg(long, default_value = "Ortodontia")]
    pub(crate) specialty: String,
}

/// Walk the full lifecycle against an in-memory marketplace: approval,
/// search, candidacy, hire, and the issued rating tokens.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryMarketplaceStore::default());
    let dispatcher = Arc::new(LoggingDispatcher::default());
    let service = MarketplaceService::new(store.clone(), dispatcher.clone());

    seed_marketplace(&store, &args);
    let now = Utc::now();

    println!("== 1. administrator approves the professional's registration");
    let outcome = service.approve_registrant(
        &RegistrantId::from("reg-demo"),
        &UserId::from("admin-demo"),
        now,
    )?;
    println!(
        "   registrant -> {} (approved by {})",
        outcome.review.status.label(),
        outcome
            .review
            .approved_by
            .as_ref()
            .map(|id| id.as_str())
            .unwrap_or("-")
    );
    println!("== 2. clinic searches for candidates");
    let criteria = SearchCriteria {
        city: args.city.clone(),
        specialty: args.specialty.clone(),
        minimum_years_formed: Some(3),
        available_now: true,
    };
    for candidate in service.rank_candidates(&criteria)? {
        println!(
            "   {} -> score {} ({})",
            candidate.full_name,
            candidate.score,
            candidate.match_type.label()
        );
        for check in &candidate.breakdown.checks {
            println!(
                "     [{}] {:?}: {}",
                if check.satisfied { "x" } else { " " },
                check.criterion,
                check.note
            );
        }
    }

    println!("== 3. professional applies");
    let quota = service.candidacy_quota(&ProfessionalId::from("prof-demo"), now)?;
    println!("   quota before: {}/{} used", quota.used, quota.limit);
    let record = service.apply(
        CandidacyRequest {
            professional_id: ProfessionalId::from("prof-demo"),
            job_id: JobId::from("job-demo"),
            minimum_years_formed: Some(3),
            available_now: true,
        },
        now,
    )?;
    println!(
        "   candidacy {} recorded as {} ({})",
        record.id.as_str(),
        record.status.label(),
        record.match_type.label()
    );

    println!("== 4. clinic confirms the hire");
    let contract = service.confirm_hire(&record.id, now)?;
    println!(
        "   contract {} active until {}",
        contract.id.as_str(),
        contract.token_expires_at
    );
    println!("   professional token: {}", contract.professional_token);
    println!("   clinic token:       {}", contract.clinic_token);
    if let Some(claims) = decode_token(&contract.professional_token) {
        println!(
            "   support decode -> party {:?}, job {}",
            claims.party,
            claims.job_id.as_str()
        );
    }

    println!("== 5. notifications accepted for delivery");
    for event in dispatcher.events() {
        println!(
            "   {:?} -> {} ({}): {}",
            event.kind,
            event.recipient_id.as_str(),
            event.recipient_type,
            event.title
        );
    }

    Ok(())
}

fn demo_professional(args: &DemoArgs) -> Professional {
    Professional {
        id: ProfessionalId::from("prof-demo"),
        owner_user_id: UserId::from("user-prof-demo"),
        full_name: "Marina Duarte".to_string(),
        license_number: "CRO-55120".to_string(),
        license_state: "GO".to_string(),
        specialty: args.specialty.clone(),
        available_cities: vec![format!("{} - GO", args.city)],
        available_weekdays: vec!["SEG".to_string(), "QUA".to_string()],
        years_since_graduation: 5,
        compensation: CompensationPreference {
            remuneration_type: RemunerationType::Diaria,
            expected_value: Some(600),
        },
        availability: AvailabilityStatus::Disponivel,
        start_availability: StartAvailability::Imediato,
        review: RegistrationReview::pending(),
        rating_mean: 0.0,
        rating_count: 0,
    }
}

fn seed_marketplace(store: &InMemoryMarketplaceStore, args: &DemoArgs) {
    store.seed_professional(demo_professional(args));

    store.seed_registrant(Registrant {
        id: RegistrantId::from("reg-demo"),
        owner_user_id: UserId::from("user-prof-demo"),
        display_name: "Marina Duarte".to_string(),
        kind: RegistrantKind::Professional(ProfessionalCategory::Dentista),
        professional_id: Some(ProfessionalId::from("prof-demo")),
        review: RegistrationReview::pending(),
    });

    store.seed_posting(JobPosting {
        id: JobId::from("job-demo"),
        unit_id: UnitId::from("unit-demo"),
        title: format!("{} - cobertura de agenda", args.specialty),
        city: args.city.clone(),
        state: "GO".to_string(),
        remuneration_type: RemunerationType::Diaria,
        remuneration_value: Some(650),
        accepted_specialties: vec![args.specialty.clone()],
        accepts_employee: true,
        accepts_freelancer: true,
        status: PostingStatus::Aberto,
    });

    store.seed_unit(ClinicUnit {
        id: UnitId::from("unit-demo"),
        owner_user_id: UserId::from("user-clinic-demo"),
        name: "Clínica Horizonte".to_string(),
        city: args.city.clone(),
        state: "GO".to_string(),
    });
}
