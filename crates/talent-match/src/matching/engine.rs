use serde::{Deserialize, Serialize};

use super::contract::contract_score;
use super::domain::{CandidateId, CandidateProfile, JobOffer, OfferId, RequiredSkill};
use super::experience::{experience_score, required_years};
use super::explanation::{explain, score_formula, ScoreBreakdown};
use super::location::{assess_location, LocationBasis, Place};
use super::skills::{assess_skills, PartialSkillMatch};
use super::weights::{Weights, MATCH_WEIGHTS};

/// Explainable score for one (candidate, offer) pair.
///
/// Built once by [`MatchEngine::calculate_match`] or [`MatchingResult::failed`] and handed out by
/// value; results never share state with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResult {
    pub offer_id: OfferId,
    pub offer_title: String,
    pub candidate_id: CandidateId,
    pub overall_score: f64,
    pub skills_score: f64,
    pub location_score: f64,
    pub contract_score: f64,
    pub experience_score: f64,
    pub matched_skills: Vec<String>,
    pub partial_skills: Vec<PartialSkillMatch>,
    pub missing_skills: Vec<String>,
    pub location_basis: LocationBasis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub score_formula: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl MatchingResult {
    /// Zero-scored result standing in for a pair whose computation could not run.
    pub fn failed(candidate: &CandidateProfile, offer: &JobOffer, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let scores = ScoreBreakdown {
            skills: 0.0,
            location: 0.0,
            contract: 0.0,
            experience: 0.0,
            overall: 0.0,
        };

        Self {
            offer_id: offer.id,
            offer_title: offer.title.clone(),
            candidate_id: candidate.id,
            overall_score: 0.0,
            skills_score: 0.0,
            location_score: 0.0,
            contract_score: 0.0,
            experience_score: 0.0,
            matched_skills: Vec::new(),
            partial_skills: Vec::new(),
            missing_skills: Vec::new(),
            location_basis: LocationBasis::Unknown,
            distance_km: None,
            score_formula: score_formula(&MATCH_WEIGHTS, &scores),
            explanation: format!("Match could not be computed for this offer: {reason}."),
            failure: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// Stateless scorer combining the skill, location, contract and experience rules.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    weights: Weights,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            weights: MATCH_WEIGHTS,
        }
    }
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn calculate_match(
        &self,
        candidate: &CandidateProfile,
        offer: &JobOffer,
        required_skills: &[RequiredSkill],
    ) -> MatchingResult {
        let skills = assess_skills(&candidate.skills, required_skills);
        let location = assess_location(
            Place {
                text: &candidate.location,
                coordinates: candidate.coordinates,
            },
            Place {
                text: &offer.location,
                coordinates: offer.coordinates,
            },
        );
        let contract = contract_score(&candidate.preferred_contract_types, offer.contract_type);
        let implied_years = required_years(required_skills);
        let experience = experience_score(candidate.years_of_experience, implied_years);

        let overall = self
            .weights
            .combine(skills.score, location.score, contract, experience)
            .clamp(0.0, 100.0);

        let scores = ScoreBreakdown {
            skills: skills.score,
            location: location.score,
            contract,
            experience,
            overall,
        };
        let explanation = explain(
            &scores,
            &skills,
            &location,
            candidate.years_of_experience,
            implied_years,
        );

        MatchingResult {
            offer_id: offer.id,
            offer_title: offer.title.clone(),
            candidate_id: candidate.id,
            overall_score: overall,
            skills_score: skills.score,
            location_score: location.score,
            contract_score: contract,
            experience_score: experience,
            matched_skills: skills.matched,
            partial_skills: skills.partial,
            missing_skills: skills.missing,
            location_basis: location.basis,
            distance_km: location.distance_km,
            score_formula: score_formula(&self.weights, &scores),
            explanation,
            failure: None,
        }
    }
}
