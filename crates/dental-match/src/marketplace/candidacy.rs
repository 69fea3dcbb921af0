use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidacyStatus, JobId, JobMatch};

/// Maximum CANDIDATOU submissions per professional per calendar month.
pub const MONTHLY_APPLICATION_LIMIT: u32 = 3;

/// Quota snapshot computed from freshly read matches. The service recomputes
/// this immediately before every submission decision; it is never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyQuota {
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
}

impl MonthlyQuota {
    pub fn allows_submission(&self) -> bool {
        self.remaining > 0
    }
}

/// First instant of `now`'s month, UTC. UTC month boundaries are the
/// documented convention for the rate limit.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Count this month's CANDIDATOU matches against the limit. Rejected and
/// contracted matches never count, nor does anything from prior months.
pub fn monthly_quota(matches: &[JobMatch], now: DateTime<Utc>) -> MonthlyQuota {
    let boundary = month_start(now);
    let used = matches
        .iter()
        .filter(|record| record.status == CandidacyStatus::Candidatou)
        .filter(|record| record.created_at >= boundary && record.created_at <= now)
        .count() as u32;

    MonthlyQuota {
        limit: MONTHLY_APPLICATION_LIMIT,
        used,
        remaining: MONTHLY_APPLICATION_LIMIT.saturating_sub(used),
    }
}

/// Duplicate-candidacy invariant, checked before the quota: a non-rejected
/// match for the same posting blocks a new submission.
pub fn has_active_candidacy(matches: &[JobMatch], job_id: &JobId) -> bool {
    matches
        .iter()
        .any(|record| &record.job_id == job_id && record.is_active())
}
