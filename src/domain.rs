//! Domain vocabulary shared by the route handlers: the closed sets of
//! values the job board accepts, the application status machine, and the
//! read-time certification expiration projection.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const CERTIFICATIONS: &[&str] = &["SRO", "RO", "NRC", "ANSI", "HP", "RP"];
pub const CLEARANCE_LEVELS: &[&str] = &["None", "L", "Q"];
pub const PLANT_TYPES: &[&str] = &["PWR", "BWR", "AP1000", "ABWR", "EPR", "SMR"];
pub const CONTRACT_TYPES: &[&str] = &["Outage", "Long-term", "Permanent"];
pub const NRC_REGIONS: &[&str] = &["I", "II", "III", "IV"];

/// Days before expiry at which a verified certification is surfaced as
/// "expiring soon" on the candidate dashboard.
pub const EXPIRY_WARNING_DAYS: u64 = 90;

pub fn is_certification(value: &str) -> bool {
    CERTIFICATIONS.contains(&value)
}

pub fn is_clearance_level(value: &str) -> bool {
    CLEARANCE_LEVELS.contains(&value)
}

pub fn is_plant_type(value: &str) -> bool {
    PLANT_TYPES.contains(&value)
}

pub fn is_contract_type(value: &str) -> bool {
    CONTRACT_TYPES.contains(&value)
}

pub fn is_nrc_region(value: &str) -> bool {
    NRC_REGIONS.contains(&value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "shortlisted" => Some(Self::Shortlisted),
            "rejected" => Some(Self::Rejected),
            "accepted" => Some(Self::Accepted),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Shortlisted => "shortlisted",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
        }
    }

    /// Whether an employer may move an application from `self` to `to`.
    ///
    /// The review pipeline moves forward only; accepted and rejected are
    /// terminal. Rejection is allowed from any non-terminal state.
    pub fn can_transition_to(self, to: Self) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, to),
            (Pending, Reviewed)
                | (Pending, Shortlisted)
                | (Pending, Rejected)
                | (Reviewed, Shortlisted)
                | (Reviewed, Rejected)
                | (Shortlisted, Accepted)
                | (Shortlisted, Rejected)
        )
    }

    /// Shortlisting (or acceptance) unlocks the compliance checklist for
    /// the application on both the candidate and employer side.
    pub fn unlocks_compliance(self) -> bool {
        matches!(self, Self::Shortlisted | Self::Accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryState {
    Expired,
    ExpiringSoon,
    Current,
}

/// Classifies a certification expiration date relative to `today`.
///
/// Derived at read time, never persisted; a document is in exactly one
/// bucket.
pub fn classify_expiry(expiration_date: NaiveDate, today: NaiveDate) -> ExpiryState {
    if expiration_date < today {
        ExpiryState::Expired
    } else if expiration_date <= today + Days::new(EXPIRY_WARNING_DAYS) {
        ExpiryState::ExpiringSoon
    } else {
        ExpiryState::Current
    }
}
