use super::location::{LocationAssessment, LocationBasis};
use super::skills::SkillAssessment;
use super::weights::Weights;

/// Narrative band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl FitBand {
    pub fn from_score(overall: f64) -> Self {
        if overall >= 85.0 {
            Self::Excellent
        } else if overall >= 70.0 {
            Self::Good
        } else if overall >= 50.0 {
            Self::Average
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent fit",
            Self::Good => "good fit, minor gaps",
            Self::Average => "average fit, notable gaps",
            Self::Poor => "poor fit",
        }
    }
}

/// Sub-scores feeding an explanation, kept together so the builders stay readable.
#[derive(Debug, Clone, Copy)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub location: f64,
    pub contract: f64,
    pub experience: f64,
    pub overall: f64,
}

pub fn score_formula(weights: &Weights, scores: &ScoreBreakdown) -> String {
    format!(
        "overall = {:.2} x skills({:.1}) + {:.2} x location({:.1}) + {:.2} x contract({:.1}) + {:.2} x experience({:.1}) = {:.1}",
        weights.skills,
        scores.skills,
        weights.location,
        scores.location,
        weights.contract,
        scores.contract,
        weights.experience,
        scores.experience,
        scores.overall
    )
}

pub fn explain(
    scores: &ScoreBreakdown,
    skills: &SkillAssessment,
    location: &LocationAssessment,
    candidate_years: u32,
    required_years: u32,
) -> String {
    let mut sentences = vec![format!(
        "Overall match {:.1}/100: {}.",
        scores.overall,
        FitBand::from_score(scores.overall).label()
    )];

    if !skills.missing.is_empty() {
        sentences.push(format!(
            "Missing {} of {} required skill(s): {}.",
            skills.missing.len(),
            skills.required_count(),
            skills.missing.join(", ")
        ));
    }

    if scores.location < 50.0 {
        let detail = match (location.basis, location.distance_km) {
            (LocationBasis::Coordinates, Some(distance)) => {
                format!("the offer is about {distance:.0} km away")
            }
            _ => "the offer is far from the candidate".to_string(),
        };
        sentences.push(format!("Location is a weak fit: {detail}."));
    }

    if scores.experience < 60.0 {
        sentences.push(format!(
            "Experience of {candidate_years} year(s) is well below the {required_years} year(s) implied by the required skill levels."
        ));
    }

    sentences.join(" ")
}
