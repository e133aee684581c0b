use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::domain::{CandidateProfile, JobOffer, RequiredSkill};
use super::engine::{MatchEngine, MatchingResult};
use super::repository::SkillRepository;
use super::MatchError;

/// Batch facade applying the match engine across offers or candidates.
pub struct RankingService<R> {
    repository: Arc<R>,
    engine: MatchEngine,
}

impl<R> RankingService<R>
where
    R: SkillRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            engine: MatchEngine::new(),
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Scores one offer, turning a failed skill lookup into a degraded result.
    pub fn score_offer(&self, candidate: &CandidateProfile, offer: &JobOffer) -> MatchingResult {
        match self.repository.fetch_required_skills(offer.id) {
            Ok(required) => self.engine.calculate_match(candidate, offer, &required),
            Err(err) => {
                warn!(
                    offer_id = offer.id.0,
                    candidate_id = candidate.id.0,
                    error = %err,
                    "required skills unavailable, offer scored as failed"
                );
                MatchingResult::failed(candidate, offer, err.to_string())
            }
        }
    }

    /// One result per offer, best first.
    pub fn calculate_match_for_all_offers(
        &self,
        candidate: &CandidateProfile,
        offers: &[JobOffer],
    ) -> Vec<MatchingResult> {
        let mut results: Vec<_> = offers
            .iter()
            .map(|offer| self.score_offer(candidate, offer))
            .collect();

        sort_by_offer(&mut results);
        log_batch(candidate, offers.len(), &results);
        results
    }

    /// Same contract as [`Self::calculate_match_for_all_offers`], scored on the rayon pool.
    pub fn calculate_match_for_all_offers_parallel(
        &self,
        candidate: &CandidateProfile,
        offers: &[JobOffer],
    ) -> Vec<MatchingResult> {
        let mut results: Vec<_> = offers
            .par_iter()
            .map(|offer| self.score_offer(candidate, offer))
            .collect();

        sort_by_offer(&mut results);
        log_batch(candidate, offers.len(), &results);
        results
    }

    pub fn get_top_matches(
        &self,
        candidate: &CandidateProfile,
        offers: &[JobOffer],
        k: usize,
    ) -> Vec<MatchingResult> {
        let mut results = self.calculate_match_for_all_offers(candidate, offers);
        results.truncate(k);
        results
    }

    pub fn get_matches_above_threshold(
        &self,
        candidate: &CandidateProfile,
        offers: &[JobOffer],
        min_score: f64,
    ) -> Result<Vec<MatchingResult>, MatchError> {
        check_threshold(min_score)?;
        above_threshold(self.calculate_match_for_all_offers(candidate, offers), min_score)
    }

    pub fn get_matches_above_threshold_parallel(
        &self,
        candidate: &CandidateProfile,
        offers: &[JobOffer],
        min_score: f64,
    ) -> Result<Vec<MatchingResult>, MatchError> {
        check_threshold(min_score)?;
        above_threshold(
            self.calculate_match_for_all_offers_parallel(candidate, offers),
            min_score,
        )
    }

    /// Ranks candidates for a single offer, best first.
    pub fn rank_candidates_for_offer(
        &self,
        offer: &JobOffer,
        candidates: &[CandidateProfile],
    ) -> Vec<MatchingResult> {
        let mut results: Vec<_> = match self.repository.fetch_required_skills(offer.id) {
            Ok(required) => candidates
                .iter()
                .map(|candidate| self.engine.calculate_match(candidate, offer, &required))
                .collect(),
            Err(err) => {
                warn!(
                    offer_id = offer.id.0,
                    candidates = candidates.len(),
                    error = %err,
                    "required skills unavailable, every candidate scored as failed"
                );
                let reason = err.to_string();
                candidates
                    .iter()
                    .map(|candidate| MatchingResult::failed(candidate, offer, reason.clone()))
                    .collect()
            }
        };

        results.sort_by(|a, b| by_score_desc(a, b).then_with(|| a.candidate_id.cmp(&b.candidate_id)));
        results
    }
}

/// Scores offers whose required skills were resolved by the caller, one list per offer.
///
/// Offers sharing an id keep their own requirements and their input order among ties.
pub fn rank_resolved_offers<'a, I>(
    engine: &MatchEngine,
    candidate: &CandidateProfile,
    offers: I,
) -> Vec<MatchingResult>
where
    I: IntoIterator<Item = (&'a JobOffer, &'a [RequiredSkill])>,
{
    let mut results: Vec<_> = offers
        .into_iter()
        .map(|(offer, required)| engine.calculate_match(candidate, offer, required))
        .collect();

    sort_by_offer(&mut results);
    results
}

/// Keeps ranked results scoring at least `min_score`, order preserved.
pub fn above_threshold(
    results: Vec<MatchingResult>,
    min_score: f64,
) -> Result<Vec<MatchingResult>, MatchError> {
    check_threshold(min_score)?;
    Ok(results
        .into_iter()
        .filter(|result| result.overall_score >= min_score)
        .collect())
}

fn check_threshold(min_score: f64) -> Result<(), MatchError> {
    if min_score.is_finite() {
        Ok(())
    } else {
        Err(MatchError::InvalidThreshold(min_score))
    }
}

fn by_score_desc(a: &MatchingResult, b: &MatchingResult) -> Ordering {
    b.overall_score.total_cmp(&a.overall_score)
}

/// Overall score descending, ties broken by offer id ascending.
pub fn sort_by_offer(results: &mut [MatchingResult]) {
    results.sort_by(|a, b| by_score_desc(a, b).then_with(|| a.offer_id.cmp(&b.offer_id)));
}

fn log_batch(candidate: &CandidateProfile, offers: usize, results: &[MatchingResult]) {
    let failed = results.iter().filter(|result| result.is_degraded()).count();
    debug!(
        candidate_id = candidate.id.0,
        offers,
        failed,
        best = results.first().map(|result| result.overall_score),
        "ranked offers for candidate"
    );
}
