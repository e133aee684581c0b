use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CandidateProfile, JobOffer, RequiredSkill};
use super::engine::{MatchEngine, MatchingResult};
use super::ranking::{above_threshold, rank_resolved_offers, RankingService};
use super::repository::InMemorySkillRepository;
use super::MatchError;
use crate::config::MatchingSettings;

/// An offer together with the required skills the caller already loaded for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferWithSkills {
    pub offer: JobOffer,
    #[serde(default)]
    pub required_skills: Vec<RequiredSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferMatchRequest {
    pub candidate: CandidateProfile,
    pub offers: Vec<OfferWithSkills>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatchRequest {
    pub offer: JobOffer,
    #[serde(default)]
    pub required_skills: Vec<RequiredSkill>,
    pub candidates: Vec<CandidateProfile>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Ranked results, best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub results: Vec<MatchingResult>,
}

/// Router exposing the JSON matching contract.
pub fn matching_router(settings: MatchingSettings) -> Router {
    Router::new()
        .route("/api/v1/matches/offers", post(offers_handler))
        .route("/api/v1/matches/candidates", post(candidates_handler))
        .with_state(Arc::new(settings))
}

pub(crate) async fn offers_handler(
    State(settings): State<Arc<MatchingSettings>>,
    Json(request): Json<OfferMatchRequest>,
) -> Response {
    match rank_offers(&settings, request) {
        Ok(results) => (StatusCode::OK, Json(MatchResponse { results })).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidates_handler(
    State(settings): State<Arc<MatchingSettings>>,
    Json(request): Json<CandidateMatchRequest>,
) -> Response {
    match rank_candidates(&settings, request) {
        Ok(results) => (StatusCode::OK, Json(MatchResponse { results })).into_response(),
        Err(error) => error_response(error),
    }
}

fn rank_offers(
    settings: &MatchingSettings,
    request: OfferMatchRequest,
) -> Result<Vec<MatchingResult>, MatchError> {
    ensure_batch_size(request.offers.len(), settings.max_batch_size)?;
    request.candidate.validate()?;
    for entry in &request.offers {
        entry.offer.validate()?;
    }

    let ranked = rank_resolved_offers(
        &MatchEngine::new(),
        &request.candidate,
        request
            .offers
            .iter()
            .map(|entry| (&entry.offer, entry.required_skills.as_slice())),
    );
    let min_score = request.min_score.unwrap_or(settings.default_min_score);
    let mut results = above_threshold(ranked, min_score)?;

    if let Some(limit) = request.limit {
        results.truncate(limit);
    }
    Ok(results)
}

fn rank_candidates(
    settings: &MatchingSettings,
    request: CandidateMatchRequest,
) -> Result<Vec<MatchingResult>, MatchError> {
    ensure_batch_size(request.candidates.len(), settings.max_batch_size)?;
    request.offer.validate()?;
    for candidate in &request.candidates {
        candidate.validate()?;
    }

    let repository =
        InMemorySkillRepository::new().with_skills(request.offer.id, request.required_skills);
    let service = RankingService::new(Arc::new(repository));
    let mut results = service.rank_candidates_for_offer(&request.offer, &request.candidates);

    if let Some(limit) = request.limit {
        results.truncate(limit);
    }
    Ok(results)
}

fn ensure_batch_size(size: usize, limit: usize) -> Result<(), MatchError> {
    if size > limit {
        return Err(MatchError::BatchTooLarge { size, limit });
    }
    Ok(())
}

fn error_response(error: MatchError) -> Response {
    let status = match error {
        MatchError::BatchTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        MatchError::InvalidCoordinates { .. } | MatchError::InvalidThreshold(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{
        CandidateId, CandidateSkill, ContractType, Coordinates, OfferId, RecruiterId, SkillLevel,
    };
    use std::collections::BTreeSet;

    fn settings(max_batch_size: usize) -> MatchingSettings {
        MatchingSettings {
            default_min_score: 0.0,
            max_batch_size,
        }
    }

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            id: CandidateId(1),
            display_name: "Nour".to_string(),
            location: "Tunis".to_string(),
            coordinates: None,
            years_of_experience: 3,
            skills: vec![CandidateSkill {
                name: "Python".to_string(),
                level: SkillLevel::Intermediate,
            }],
            preferred_contract_types: BTreeSet::new(),
        }
    }

    fn entry(id: u64, skill: &str) -> OfferWithSkills {
        OfferWithSkills {
            offer: JobOffer {
                id: OfferId(id),
                recruiter_id: RecruiterId(1),
                title: format!("Offer {id}"),
                description: String::new(),
                location: "Tunis".to_string(),
                coordinates: None,
                contract_type: ContractType::Cdd,
            },
            required_skills: vec![RequiredSkill {
                name: skill.to_string(),
                level_required: SkillLevel::Intermediate,
            }],
        }
    }

    #[tokio::test]
    async fn offers_handler_ranks_inline_offers() {
        let request = OfferMatchRequest {
            candidate: candidate(),
            offers: vec![entry(1, "Java"), entry(2, "Python")],
            limit: None,
            min_score: None,
        };

        let response = offers_handler(State(Arc::new(settings(10))), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn rank_offers_applies_threshold_then_limit() {
        let request = OfferMatchRequest {
            candidate: candidate(),
            offers: vec![entry(1, "Java"), entry(2, "Python"), entry(3, "Python")],
            limit: Some(1),
            min_score: Some(50.0),
        };

        let results = rank_offers(&settings(10), request).expect("ranking succeeds");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].offer_id, OfferId(2));
    }

    #[tokio::test]
    async fn oversized_batches_are_rejected() {
        let request = OfferMatchRequest {
            candidate: candidate(),
            offers: vec![entry(1, "Java"), entry(2, "Python")],
            limit: None,
            min_score: None,
        };

        let response = offers_handler(State(Arc::new(settings(1))), Json(request)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_unprocessable() {
        let mut profile = candidate();
        profile.coordinates = Some(Coordinates {
            latitude: 500.0,
            longitude: -900.0,
        });
        let request = OfferMatchRequest {
            candidate: profile,
            offers: vec![entry(1, "Python")],
            limit: None,
            min_score: None,
        };

        let response = offers_handler(State(Arc::new(settings(10))), Json(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let mut bad_offer = entry(2, "Python").offer;
        bad_offer.coordinates = Some(Coordinates {
            latitude: 0.0,
            longitude: 181.0,
        });
        let request = CandidateMatchRequest {
            offer: bad_offer,
            required_skills: Vec::new(),
            candidates: vec![candidate()],
            limit: None,
        };

        let response = candidates_handler(State(Arc::new(settings(10))), Json(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn duplicate_offer_ids_are_scored_against_their_own_skills() {
        let mut java_job = entry(5, "Java");
        java_job.offer.title = "Java job".to_string();
        let mut python_job = entry(5, "Python");
        python_job.offer.title = "Python job".to_string();
        let request = OfferMatchRequest {
            candidate: candidate(),
            offers: vec![java_job, python_job],
            limit: None,
            min_score: None,
        };

        let results = rank_offers(&settings(10), request).expect("ranking succeeds");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].offer_title, "Python job");
        assert_eq!(results[0].skills_score, 100.0);
        assert_eq!(results[1].offer_title, "Java job");
        assert_eq!(results[1].missing_skills, vec!["Java".to_string()]);
    }
}
