/// Fixed contribution of each sub-score to the overall match score.
pub const MATCH_WEIGHTS: Weights = Weights {
    skills: 0.40,
    location: 0.25,
    contract: 0.20,
    experience: 0.15,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub skills: f64,
    pub location: f64,
    pub contract: f64,
    pub experience: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills + self.location + self.contract + self.experience
    }

    pub fn combine(&self, skills: f64, location: f64, contract: f64, experience: f64) -> f64 {
        skills * self.skills
            + location * self.location
            + contract * self.contract
            + experience * self.experience
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((MATCH_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn combine_applies_each_weight() {
        assert!((MATCH_WEIGHTS.combine(100.0, 0.0, 0.0, 0.0) - 40.0).abs() < 1e-9);
        assert!((MATCH_WEIGHTS.combine(0.0, 100.0, 0.0, 0.0) - 25.0).abs() < 1e-9);
        assert!((MATCH_WEIGHTS.combine(0.0, 0.0, 100.0, 0.0) - 20.0).abs() < 1e-9);
        assert!((MATCH_WEIGHTS.combine(0.0, 0.0, 0.0, 100.0) - 15.0).abs() < 1e-9);
    }
}
