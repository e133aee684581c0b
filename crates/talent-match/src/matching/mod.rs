//! Candidate-to-offer matching: four independent scorers combined into one weighted,
//! explained score, plus batch ranking over offers or candidates.

pub mod contract;
pub mod domain;
pub mod engine;
pub mod experience;
pub mod explanation;
pub mod location;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod skills;
pub mod weights;

pub use domain::{
    CandidateId, CandidateProfile, CandidateSkill, ContractType, Coordinates, JobOffer, OfferId,
    RecruiterId, RequiredSkill, SkillLevel,
};
pub use engine::{MatchEngine, MatchingResult};
pub use location::LocationBasis;
pub use ranking::RankingService;
pub use repository::{
    load_offers_csv, load_offers_csv_path, CsvSkillRepository, InMemorySkillRepository,
    SkillRepository, SkillRepositoryError,
};
pub use router::{
    matching_router, CandidateMatchRequest, MatchResponse, OfferMatchRequest, OfferWithSkills,
};
pub use skills::PartialSkillMatch;

/// Precondition failures raised at the engine's call boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("minimum score must be a finite number, got {0}")]
    InvalidThreshold(f64),
    #[error("batch of {size} exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },
}
