use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MatchError;

/// Identifier wrapper for candidate profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub u64);

/// Identifier wrapper for job offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferId(pub u64);

/// Identifier of the recruiter that published an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecruiterId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordinal proficiency shared by candidate skills and offer requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const fn rank(self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown skill level '{other}'")),
        }
    }
}

/// Contract types an offer can be published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    Cdi,
    Cdd,
    FullTime,
    PartTime,
    Internship,
    Freelance,
    Apprenticeship,
}

impl ContractType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cdi => "CDI",
            Self::Cdd => "CDD",
            Self::FullTime => "FULL_TIME",
            Self::PartTime => "PART_TIME",
            Self::Internship => "INTERNSHIP",
            Self::Freelance => "FREELANCE",
            Self::Apprenticeship => "APPRENTICESHIP",
        }
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "CDI" => Ok(Self::Cdi),
            "CDD" => Ok(Self::Cdd),
            "FULL_TIME" => Ok(Self::FullTime),
            "PART_TIME" => Ok(Self::PartTime),
            "INTERNSHIP" => Ok(Self::Internship),
            "FREELANCE" => Ok(Self::Freelance),
            "APPRENTICESHIP" => Ok(Self::Apprenticeship),
            other => Err(format!("unknown contract type '{other}'")),
        }
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validated constructor for callers assembling coordinates from raw input.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MatchError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(MatchError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }
}

/// A skill declared by a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSkill {
    pub name: String,
    pub level: SkillLevel,
}

/// A skill an offer requires, with the minimum expected level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredSkill {
    pub name: String,
    pub level_required: SkillLevel,
}

/// Job seeker attributes consumed by the matching engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: CandidateId,
    pub display_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub years_of_experience: u32,
    #[serde(default)]
    pub skills: Vec<CandidateSkill>,
    #[serde(default)]
    pub preferred_contract_types: BTreeSet<ContractType>,
}

/// Job posting as materialized by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    pub id: OfferId,
    pub recruiter_id: RecruiterId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub contract_type: ContractType,
}

impl CandidateProfile {
    /// Rejects coordinates that bypassed [`Coordinates::new`], e.g. deserialized ones.
    pub fn validate(&self) -> Result<(), MatchError> {
        validate_optional(self.coordinates)
    }
}

impl JobOffer {
    pub fn validate(&self) -> Result<(), MatchError> {
        validate_optional(self.coordinates)
    }
}

fn validate_optional(coordinates: Option<Coordinates>) -> Result<(), MatchError> {
    match coordinates {
        Some(point) => Coordinates::new(point.latitude, point.longitude).map(|_| ()),
        None => Ok(()),
    }
}
