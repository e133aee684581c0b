use std::collections::BTreeSet;

use super::domain::ContractType;

/// Score when the candidate states no contract preference.
pub const NO_PREFERENCE_SCORE: f64 = 80.0;

/// Contract pairs treated as interchangeable, in either direction.
const COMPATIBLE_CONTRACTS: &[(ContractType, ContractType)] = &[
    (ContractType::Cdi, ContractType::FullTime),
    (ContractType::Cdd, ContractType::PartTime),
];

pub fn are_compatible(a: ContractType, b: ContractType) -> bool {
    COMPATIBLE_CONTRACTS
        .iter()
        .any(|(x, y)| (a == *x && b == *y) || (a == *y && b == *x))
}

pub fn contract_score(preferred: &BTreeSet<ContractType>, offered: ContractType) -> f64 {
    if preferred.is_empty() {
        return NO_PREFERENCE_SCORE;
    }

    if preferred.contains(&offered) {
        return 100.0;
    }

    if preferred.iter().any(|wanted| are_compatible(*wanted, offered)) {
        70.0
    } else {
        30.0
    }
}
