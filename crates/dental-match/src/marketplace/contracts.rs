use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use super::domain::{
    ContractId, ContractStatus, JobContract, JobId, ProfessionalId, UnitId,
};

/// Fixed prefix identifying rating tokens in logs and support tooling.
pub const TOKEN_PREFIX: &str = "AVAL";

/// Both tokens of a contract expire exactly this many days after creation.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// The two parties of a mutual rating exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenParty {
    Dentista,
    Clinica,
}

impl TokenParty {
    pub const fn namespace(self) -> &'static str {
        match self {
            TokenParty::Dentista => "DENTISTA",
            TokenParty::Clinica => "CLINICA",
        }
    }

    fn from_namespace(value: &str) -> Option<Self> {
        match value {
            "DENTISTA" => Some(TokenParty::Dentista),
            "CLINICA" => Some(TokenParty::Clinica),
            _ => None,
        }
    }
}

/// Traceable identity embedded in a token. Decodable by support operators,
/// but possession of the full token string is the actual authorization
/// artifact; the claims alone are not a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub party: TokenParty,
    pub professional_id: ProfessionalId,
    pub unit_id: UnitId,
    pub job_id: JobId,
}

fn random_segment(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Mint one party's token: `AVAL_<random-8>_<base64 claims>_<random-10>`.
///
/// Uniqueness rests on the independently generated random segments, not on
/// the deterministic claims in the middle. The standard base64 alphabet keeps
/// `_` free as the segment separator. The claims themselves are also joined
/// with `_`, so record ids must not contain underscores; every id this
/// system assigns uses `-` (see [`super::service`]'s id sequences).
pub fn mint_token(
    party: TokenParty,
    professional_id: &ProfessionalId,
    unit_id: &UnitId,
    job_id: &JobId,
) -> String {
    let claims = format!(
        "{}_{}_{}_{}",
        party.namespace(),
        professional_id.as_str(),
        unit_id.as_str(),
        job_id.as_str()
    );

    format!(
        "{}_{}_{}_{}",
        TOKEN_PREFIX,
        random_segment(8),
        BASE64_STANDARD.encode(claims),
        random_segment(10)
    )
}

/// Recover the claims minted into a token, for support tooling. Returns
/// `None` for anything that does not parse as one of our tokens. Relies on
/// the underscore-free id convention documented on [`mint_token`].
pub fn decode_token(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('_');
    if segments.next()? != TOKEN_PREFIX {
        return None;
    }
    let _random_prefix = segments.next()?;
    let encoded = segments.next()?;
    let _random_suffix = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let decoded = BASE64_STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let mut parts = decoded.splitn(4, '_');
    let party = TokenParty::from_namespace(parts.next()?)?;
    let professional_id = ProfessionalId(parts.next()?.to_string());
    let unit_id = UnitId(parts.next()?.to_string());
    let job_id = JobId(parts.next()?.to_string());

    Some(TokenClaims {
        party,
        professional_id,
        unit_id,
        job_id,
    })
}

/// Shared expiry for a token pair created at `created_at`.
pub fn token_expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(TOKEN_VALIDITY_DAYS)
}

/// Assemble the authoritative contract record for a confirmed hire. Both
/// tokens share one creation instant and one expiry.
pub fn build_contract(
    id: ContractId,
    job_id: JobId,
    professional_id: ProfessionalId,
    unit_id: UnitId,
    now: DateTime<Utc>,
) -> JobContract {
    let professional_token = mint_token(TokenParty::Dentista, &professional_id, &unit_id, &job_id);
    let clinic_token = mint_token(TokenParty::Clinica, &professional_id, &unit_id, &job_id);

    JobContract {
        id,
        job_id,
        professional_id,
        unit_id,
        professional_token,
        clinic_token,
        token_created_at: now,
        token_expires_at: token_expiry(now),
        status: ContractStatus::Ativo,
    }
}
