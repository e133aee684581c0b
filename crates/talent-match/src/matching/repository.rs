use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{ContractType, Coordinates, JobOffer, OfferId, RecruiterId, RequiredSkill};

/// Data-access collaborator supplying an offer's required skills.
///
/// The engine never calls this itself; the ranking service resolves skills before scoring.
pub trait SkillRepository: Send + Sync {
    fn fetch_required_skills(&self, offer_id: OfferId) -> Result<Vec<RequiredSkill>, SkillRepositoryError>;
}

/// Error enumeration for skill lookups and offer loading.
#[derive(Debug, thiserror::Error)]
pub enum SkillRepositoryError {
    #[error("no required skills registered for offer {0}")]
    NotFound(OfferId),
    #[error("skill repository unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid value on line {line}: {message}")]
    InvalidValue { line: u64, message: String },
}

/// Map-backed repository used by the HTTP boundary and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemorySkillRepository {
    skills: HashMap<OfferId, Vec<RequiredSkill>>,
    strict: bool,
}

impl InMemorySkillRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown offers yield `NotFound` instead of an empty requirement list.
    pub fn strict() -> Self {
        Self {
            skills: HashMap::new(),
            strict: true,
        }
    }

    pub fn insert(&mut self, offer_id: OfferId, skills: Vec<RequiredSkill>) {
        self.skills.insert(offer_id, skills);
    }

    pub fn with_skills(mut self, offer_id: OfferId, skills: Vec<RequiredSkill>) -> Self {
        self.insert(offer_id, skills);
        self
    }
}

impl FromIterator<(OfferId, Vec<RequiredSkill>)> for InMemorySkillRepository {
    fn from_iter<I: IntoIterator<Item = (OfferId, Vec<RequiredSkill>)>>(iter: I) -> Self {
        Self {
            skills: iter.into_iter().collect(),
            strict: false,
        }
    }
}

impl SkillRepository for InMemorySkillRepository {
    fn fetch_required_skills(&self, offer_id: OfferId) -> Result<Vec<RequiredSkill>, SkillRepositoryError> {
        match self.skills.get(&offer_id) {
            Some(skills) => Ok(skills.clone()),
            None if self.strict => Err(SkillRepositoryError::NotFound(offer_id)),
            None => Ok(Vec::new()),
        }
    }
}

/// Repository hydrated from an `offer_id,name,level` CSV export.
#[derive(Debug, Clone)]
pub struct CsvSkillRepository {
    inner: InMemorySkillRepository,
}

impl CsvSkillRepository {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SkillRepositoryError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SkillRepositoryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut inner = InMemorySkillRepository::new();

        for (index, record) in csv_reader.deserialize::<SkillRow>().enumerate() {
            let row = record?;
            let line = data_line(index);
            let level_required = row
                .level
                .parse()
                .map_err(|message| SkillRepositoryError::InvalidValue { line, message })?;

            inner
                .skills
                .entry(OfferId(row.offer_id))
                .or_default()
                .push(RequiredSkill {
                    name: row.name,
                    level_required,
                });
        }

        Ok(Self { inner })
    }

    pub fn offer_count(&self) -> usize {
        self.inner.skills.len()
    }
}

impl SkillRepository for CsvSkillRepository {
    fn fetch_required_skills(&self, offer_id: OfferId) -> Result<Vec<RequiredSkill>, SkillRepositoryError> {
        self.inner.fetch_required_skills(offer_id)
    }
}

/// Loads offers from an `id,recruiter_id,title,description,location,latitude,longitude,contract_type` CSV.
pub fn load_offers_csv<R: Read>(reader: R) -> Result<Vec<JobOffer>, SkillRepositoryError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut offers = Vec::new();

    for (index, record) in csv_reader.deserialize::<OfferRow>().enumerate() {
        let row = record?;
        let line = data_line(index);

        let contract_type: ContractType = row
            .contract_type
            .parse()
            .map_err(|message| SkillRepositoryError::InvalidValue { line, message })?;

        let coordinates = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(
                Coordinates::new(latitude, longitude).map_err(|err| {
                    SkillRepositoryError::InvalidValue {
                        line,
                        message: err.to_string(),
                    }
                })?,
            ),
            _ => None,
        };

        offers.push(JobOffer {
            id: OfferId(row.id),
            recruiter_id: RecruiterId(row.recruiter_id),
            title: row.title,
            description: row.description.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            coordinates,
            contract_type,
        });
    }

    Ok(offers)
}

pub fn load_offers_csv_path(path: impl AsRef<Path>) -> Result<Vec<JobOffer>, SkillRepositoryError> {
    let file = File::open(path)?;
    load_offers_csv(file)
}

// Line 1 holds the header.
fn data_line(index: usize) -> u64 {
    index as u64 + 2
}

#[derive(Debug, Deserialize)]
struct SkillRow {
    offer_id: u64,
    name: String,
    level: String,
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    id: u64,
    recruiter_id: u64,
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    contract_type: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::SkillLevel;
    use std::io::Cursor;

    #[test]
    fn lenient_repository_returns_empty_for_unknown_offer() {
        let repository = InMemorySkillRepository::new();
        let skills = repository
            .fetch_required_skills(OfferId(99))
            .expect("lenient lookup succeeds");
        assert!(skills.is_empty());
    }

    #[test]
    fn strict_repository_reports_unknown_offer() {
        let repository = InMemorySkillRepository::strict();
        let err = repository
            .fetch_required_skills(OfferId(99))
            .expect_err("strict lookup fails");
        assert!(matches!(err, SkillRepositoryError::NotFound(OfferId(99))));
    }

    #[test]
    fn csv_repository_groups_skills_by_offer() {
        let csv = "offer_id,name,level\n1,Java,Advanced\n1,SQL,intermediate\n2,Figma,BEGINNER\n";
        let repository = CsvSkillRepository::from_reader(Cursor::new(csv)).expect("csv parses");

        assert_eq!(repository.offer_count(), 2);
        let skills = repository
            .fetch_required_skills(OfferId(1))
            .expect("offer 1 present");
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[1].level_required, SkillLevel::Intermediate);
    }

    #[test]
    fn csv_repository_rejects_unknown_level() {
        let csv = "offer_id,name,level\n1,Java,Expert\n";
        let err = CsvSkillRepository::from_reader(Cursor::new(csv)).expect_err("level rejected");
        assert!(err.to_string().contains("expert"));
    }

    #[test]
    fn loads_offers_with_optional_columns() {
        let csv = "id,recruiter_id,title,description,location,latitude,longitude,contract_type\n\
                   1,5,Java Developer,Spring APIs,Tunis,36.8065,10.1815,CDI\n\
                   2,5,Designer,,Remote,,,FREELANCE\n";

        let offers = load_offers_csv(Cursor::new(csv)).expect("offers parse");

        assert_eq!(offers.len(), 2);
        assert!(offers[0].coordinates.is_some());
        assert_eq!(offers[0].contract_type, ContractType::Cdi);
        assert!(offers[1].coordinates.is_none());
        assert!(offers[1].description.is_empty());
        assert_eq!(offers[1].location, "Remote");
    }

    #[test]
    fn rejects_out_of_range_offer_coordinates() {
        let csv = "id,recruiter_id,title,description,location,latitude,longitude,contract_type\n\
                   1,5,Java Developer,,Tunis,136.0,10.0,CDI\n";

        let err = load_offers_csv(Cursor::new(csv)).expect_err("coordinates rejected");
        assert!(matches!(err, SkillRepositoryError::InvalidValue { .. }));
    }
}
