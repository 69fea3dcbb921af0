use serde::{Deserialize, Serialize};

use super::domain::{JobPosting, MatchType, Professional, StartAvailability};

/// Search criteria a candidate is scored against: the posting's required city
/// and specialty plus the caller-supplied secondary filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub city: String,
    pub specialty: String,
    /// Minimum years since graduation. Absent means no filter (always met).
    #[serde(default)]
    pub minimum_years_formed: Option<u8>,
    /// When set, only professionals who can start immediately earn the
    /// availability point.
    #[serde(default)]
    pub available_now: bool,
}

impl SearchCriteria {
    /// Criteria implied by a posting, with no secondary filters.
    pub fn from_posting(posting: &JobPosting) -> Self {
        Self {
            city: posting.city.clone(),
            specialty: posting
                .accepted_specialties
                .first()
                .cloned()
                .unwrap_or_default(),
            minimum_years_formed: None,
            available_now: false,
        }
    }
}

/// The four independent compatibility checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchCriterion {
    City,
    Specialty,
    Experience,
    ImmediateStart,
}

/// One evaluated check with its outcome, kept for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCheck {
    pub criterion: MatchCriterion,
    pub satisfied: bool,
    pub note: String,
}

/// Per-candidate scoring result: ordered checks plus the strict point count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub checks: Vec<ScoreCheck>,
    pub total: u8,
}

impl ScoreBreakdown {
    pub fn match_type(&self) -> MatchType {
        MatchType::from_score(self.total)
    }
}

/// Score a professional against the criteria: one point per satisfied check,
/// evaluated in fixed order, never weighted. Pure; missing or empty fields
/// degrade the individual check to false rather than erroring.
pub fn score_candidate(professional: &Professional, criteria: &SearchCriteria) -> ScoreBreakdown {
    let mut checks = Vec::with_capacity(4);

    let city_query = criteria.city.trim().to_lowercase();
    let city_hit = !city_query.is_empty()
        && professional
            .available_cities
            .iter()
            .any(|city| city.to_lowercase().contains(&city_query));
    checks.push(ScoreCheck {
        criterion: MatchCriterion::City,
        satisfied: city_hit,
        note: if city_hit {
            format!("serves '{}'", criteria.city)
        } else {
            format!("no available city matches '{}'", criteria.city)
        },
    });

    let specialty_hit =
        !criteria.specialty.is_empty() && professional.specialty == criteria.specialty;
    checks.push(ScoreCheck {
        criterion: MatchCriterion::Specialty,
        satisfied: specialty_hit,
        note: if specialty_hit {
            format!("specialty '{}' matches", professional.specialty)
        } else {
            format!(
                "specialty '{}' differs from '{}'",
                professional.specialty, criteria.specialty
            )
        },
    });

    let minimum_years = criteria.minimum_years_formed.unwrap_or(0);
    let experience_hit = professional.years_since_graduation >= minimum_years;
    checks.push(ScoreCheck {
        criterion: MatchCriterion::Experience,
        satisfied: experience_hit,
        note: format!(
            "{} year(s) formed against minimum {}",
            professional.years_since_graduation, minimum_years
        ),
    });

    let immediate_hit =
        criteria.available_now && professional.start_availability == StartAvailability::Imediato;
    checks.push(ScoreCheck {
        criterion: MatchCriterion::ImmediateStart,
        satisfied: immediate_hit,
        note: if criteria.available_now {
            if immediate_hit {
                "can start immediately".to_string()
            } else {
                "cannot start immediately".to_string()
            }
        } else {
            "immediate-start filter not requested".to_string()
        },
    });

    let total = checks.iter().filter(|check| check.satisfied).count() as u8;

    ScoreBreakdown { checks, total }
}
