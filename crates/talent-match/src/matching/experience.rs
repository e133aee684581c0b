use super::domain::{RequiredSkill, SkillLevel};

/// Years of experience implied by a required level.
pub const fn implied_years(level: SkillLevel) -> u32 {
    match level {
        SkillLevel::Beginner => 0,
        SkillLevel::Intermediate => 2,
        SkillLevel::Advanced => 4,
    }
}

/// Implied years for the most demanding requirement, 0 when nothing is required.
pub fn required_years(required: &[RequiredSkill]) -> u32 {
    required
        .iter()
        .map(|skill| skill.level_required)
        .max()
        .map(implied_years)
        .unwrap_or(0)
}

pub fn experience_score(candidate_years: u32, required_years: u32) -> f64 {
    let candidate = i64::from(candidate_years);
    let required = i64::from(required_years);

    if candidate >= required {
        100.0
    } else if candidate == required - 1 {
        80.0
    } else if candidate == required - 2 {
        60.0
    } else {
        40.0
    }
}
