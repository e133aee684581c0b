use serde::{Deserialize, Serialize};

use super::domain::{CandidateSkill, RequiredSkill, SkillLevel};

/// Score granted when no skills are required by the offer.
pub const NO_REQUIREMENT_SCORE: f64 = 100.0;

/// A required skill covered by the candidate at a lower level than requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSkillMatch {
    pub name: String,
    pub candidate_level: SkillLevel,
    pub required_level: SkillLevel,
}

/// Outcome of comparing a candidate's skills with an offer's requirements.
///
/// Every required skill lands in exactly one of `matched`, `partial` or `missing`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAssessment {
    pub score: f64,
    pub matched: Vec<String>,
    pub partial: Vec<PartialSkillMatch>,
    pub missing: Vec<String>,
}

impl SkillAssessment {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.partial.len() + self.missing.len()
    }
}

/// Lowercases and trims a skill name, keeping only `[a-z0-9+#]`.
pub fn normalize_skill(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '+' || *c == '#')
        .collect()
}

/// Equality or containment either way, on normalized names.
///
/// Containment is deliberately loose: `java` matches `javascript`.
pub fn skills_match(candidate_skill: &str, required_skill: &str) -> bool {
    let candidate = normalize_skill(candidate_skill);
    let required = normalize_skill(required_skill);
    normalized_match(&candidate, &required)
}

fn normalized_match(candidate: &str, required: &str) -> bool {
    // An empty name would be contained in everything.
    if candidate.is_empty() || required.is_empty() {
        return false;
    }
    candidate == required || candidate.contains(required) || required.contains(candidate)
}

/// Level score for a matched pair: 100 at or above the requirement, 70 one level short, 30 otherwise.
pub fn level_score(candidate: SkillLevel, required: SkillLevel) -> f64 {
    let candidate = i16::from(candidate.rank());
    let required = i16::from(required.rank());

    if candidate >= required {
        100.0
    } else if candidate == required - 1 {
        70.0
    } else {
        30.0
    }
}

/// Scores the candidate against the offer's required skills.
pub fn assess_skills(candidate_skills: &[CandidateSkill], required: &[RequiredSkill]) -> SkillAssessment {
    if required.is_empty() {
        return SkillAssessment {
            score: NO_REQUIREMENT_SCORE,
            matched: Vec::new(),
            partial: Vec::new(),
            missing: Vec::new(),
        };
    }

    let normalized_candidates: Vec<(String, SkillLevel)> = candidate_skills
        .iter()
        .map(|skill| (normalize_skill(&skill.name), skill.level))
        .collect();

    let mut matched = Vec::new();
    let mut partial = Vec::new();
    let mut missing = Vec::new();
    let mut level_total = 0.0;
    let mut match_count = 0usize;

    for requirement in required {
        let wanted = normalize_skill(&requirement.name);
        let found = normalized_candidates
            .iter()
            .find(|(name, _)| normalized_match(name, &wanted))
            .map(|(_, level)| *level);

        match found {
            Some(level) => {
                match_count += 1;
                level_total += level_score(level, requirement.level_required);
                if level >= requirement.level_required {
                    matched.push(requirement.name.clone());
                } else {
                    partial.push(PartialSkillMatch {
                        name: requirement.name.clone(),
                        candidate_level: level,
                        required_level: requirement.level_required,
                    });
                }
            }
            None => missing.push(requirement.name.clone()),
        }
    }

    let score = if match_count == 0 {
        0.0
    } else {
        let coverage = match_count as f64 / required.len() as f64;
        coverage * (level_total / match_count as f64)
    };

    SkillAssessment {
        score,
        matched,
        partial,
        missing,
    }
}
