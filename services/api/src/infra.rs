use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_match::error::AppError;
use talent_match::matching::CandidateProfile;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_candidate(path: &Path) -> Result<CandidateProfile, AppError> {
    let file = File::open(path)?;
    read_candidate(BufReader::new(file))
}

pub(crate) fn read_candidate<R: Read>(reader: R) -> Result<CandidateProfile, AppError> {
    let candidate: CandidateProfile = serde_json::from_reader(reader)?;
    candidate.validate()?;
    Ok(candidate)
}
