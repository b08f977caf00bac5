//! Rows and wire shapes for the insurance domain
//!
//! Everything here serialises camelCase because that is what the web client
//! speaks. Password hashes live only in the account store and never appear
//! in these types.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    ProposalSubmitted,
    Active,
}

impl ProposalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProposalStatus::ProposalSubmitted => "PROPOSAL_SUBMITTED",
            ProposalStatus::Active => "ACTIVE",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::UnderReview => "UNDER_REVIEW",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ClaimStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "PENDING" => Ok(ClaimStatus::Pending),
            "UNDER_REVIEW" => Ok(ClaimStatus::UnderReview),
            "APPROVED" => Ok(ClaimStatus::Approved),
            "REJECTED" => Ok(ClaimStatus::Rejected),
            _ => Err(ValidationError::UnknownVariant(
                "status".to_string(),
                s.trim().to_string(),
            )),
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub policy_package: String,
    pub premium_amount: f64,
    pub submission_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub transaction_id: Option<String>,
    pub status: String,
}

impl Proposal {
    pub fn is_active(&self) -> bool {
        self.status == ProposalStatus::Active.as_str()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: i64,
    pub user_id: i64,
    pub proposal_id: i64,
    pub reason: String,
    pub status: String,
    pub date_filed: NaiveDate,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub aadhaar_number: String,
    pub pan_number: String,
    pub role: String,
}

/// A user profile as served to clients, with the derived age
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub age: u32,
}

impl UserResponse {
    pub fn new(profile: UserProfile, today: NaiveDate) -> Self {
        let age = age_on(profile.date_of_birth, today);
        Self { profile, age }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OfficerProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Whole years between `dob` and `today`; zero for dates in the future
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_counts_completed_years() {
        let dob = date(1990, 5, 15);

        assert_eq!(age_on(dob, date(2026, 5, 14)), 35);
        assert_eq!(age_on(dob, date(2026, 5, 15)), 36);
        assert_eq!(age_on(dob, date(2026, 10, 19)), 36);
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 10, 19)), 0);
    }

    #[test]
    fn test_claim_status_parsing() {
        assert_eq!("approved".parse::<ClaimStatus>().unwrap(), ClaimStatus::Approved);
        assert_eq!("Under Review".parse::<ClaimStatus>().unwrap(), ClaimStatus::UnderReview);
        assert_eq!(" REJECTED ".parse::<ClaimStatus>().unwrap(), ClaimStatus::Rejected);
        assert!("SETTLED".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_user_response_is_camel_case_and_flat() {
        let profile = UserProfile {
            id: 1,
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            address: "123 Main Street, Mumbai".to_string(),
            date_of_birth: date(1990, 5, 15),
            aadhaar_number: "123456789012".to_string(),
            pan_number: "ABCDE1234F".to_string(),
            role: "USER".to_string(),
        };

        let json = serde_json::to_value(UserResponse::new(profile, date(2026, 10, 19))).unwrap();

        assert_eq!(json["dateOfBirth"], "1990-05-15");
        assert_eq!(json["aadhaarNumber"], "123456789012");
        assert_eq!(json["age"], 36);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("profile").is_none());
    }

    #[test]
    fn test_only_active_proposals_are_active() {
        let mut proposal = Proposal {
            id: 1,
            user_id: 1,
            vehicle_type: "car".to_string(),
            vehicle_number: "KA01AB1234".to_string(),
            policy_package: "premium".to_string(),
            premium_amount: 7500.0,
            submission_date: date(2026, 10, 19),
            payment_date: None,
            transaction_id: None,
            status: ProposalStatus::ProposalSubmitted.to_string(),
        };
        assert!(!proposal.is_active());

        proposal.status = ProposalStatus::Active.to_string();
        assert!(proposal.is_active());
    }
}
