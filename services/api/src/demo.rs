use crate::infra::load_candidate;
use clap::Args;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use talent_match::config::AppConfig;
use talent_match::error::AppError;
use talent_match::matching::{
    load_offers_csv, load_offers_csv_path, CandidateId, CandidateProfile, CandidateSkill,
    ContractType, Coordinates, CsvSkillRepository, JobOffer, MatchError, MatchResponse,
    MatchingResult, RankingService, SkillLevel, SkillRepository,
};
use talent_match::telemetry;
use tracing::info;

const SAMPLE_OFFERS_CSV: &str = "\
id,recruiter_id,title,description,location,latitude,longitude,contract_type
101,7,Java Backend Developer,Spring Boot services for a payments platform,Tunis,36.8065,10.1815,CDI
102,7,Full Stack Engineer,Angular front office with Java APIs,Ariana,36.8989,10.1658,FULL_TIME
103,8,React Native Developer,Mobile banking application,Remote,,,FREELANCE
104,9,DevOps Engineer,Kubernetes platform team,Sfax,34.7406,10.7603,CDD
105,9,Data Analyst Intern,Dashboards and SQL reporting,Sousse,,,INTERNSHIP
106,8,Platform Engineer,Cloud migration squad,La Marsa,,,CDI
";

const SAMPLE_SKILLS_CSV: &str = "\
offer_id,name,level
101,Java,Advanced
101,Spring Boot,Intermediate
101,PostgreSQL,Intermediate
102,Java,Intermediate
102,Angular,Intermediate
102,Docker,Beginner
103,React Native,Advanced
103,TypeScript,Intermediate
104,Kubernetes,Advanced
104,Terraform,Intermediate
104,Go,Intermediate
105,SQL,Beginner
105,Power BI,Beginner
106,Docker,Intermediate
106,AWS,Intermediate
";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of offers to print for the sample candidate.
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
    /// Score offers on the rayon pool.
    #[arg(long)]
    pub(crate) parallel: bool,
    /// Print the ranked results as JSON instead of a text report.
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip ranking the sample candidates for the best offer.
    #[arg(long)]
    pub(crate) skip_candidates: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Candidate profile as JSON.
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Offers CSV: id,recruiter_id,title,description,location,latitude,longitude,contract_type
    #[arg(long)]
    pub(crate) offers: PathBuf,
    /// Required skills CSV: offer_id,name,level
    #[arg(long)]
    pub(crate) skills: PathBuf,
    /// Keep only the best N results.
    #[arg(long)]
    pub(crate) top: Option<usize>,
    /// Drop results scoring below this value (defaults to MATCH_DEFAULT_MIN_SCORE).
    #[arg(long)]
    pub(crate) min_score: Option<f64>,
    /// Score offers on the rayon pool.
    #[arg(long)]
    pub(crate) parallel: bool,
    /// Print the ranked results as JSON instead of a text report.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let candidate = load_candidate(&args.candidate)?;
    let offers = load_offers_csv_path(&args.offers)?;
    let repository = CsvSkillRepository::from_path(&args.skills)?;
    info!(
        candidate_id = candidate.id.0,
        offers = offers.len(),
        offers_with_skills = repository.offer_count(),
        "loaded ranking inputs"
    );

    let service = RankingService::new(Arc::new(repository));
    let min_score = args.min_score.unwrap_or(config.matching.default_min_score);
    let results = rank_offers(
        &service,
        &candidate,
        &offers,
        RankOptions {
            min_score,
            top: args.top,
            parallel: args.parallel,
        },
    )?;

    print_results(&results, args.json)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let offers = load_offers_csv(Cursor::new(SAMPLE_OFFERS_CSV))?;
    let repository = CsvSkillRepository::from_reader(Cursor::new(SAMPLE_SKILLS_CSV))?;
    let service = RankingService::new(Arc::new(repository));
    let candidate = sample_candidate();

    let results = rank_offers(
        &service,
        &candidate,
        &offers,
        RankOptions {
            min_score: 0.0,
            top: Some(args.top),
            parallel: args.parallel,
        },
    )?;

    if !args.json {
        println!(
            "Sample candidate: {} ({}, {} year(s) of experience)",
            candidate.display_name, candidate.location, candidate.years_of_experience
        );
        println!();
    }
    print_results(&results, args.json)?;

    if args.skip_candidates || args.json {
        return Ok(());
    }

    let Some(best) = results
        .first()
        .and_then(|result| offers.iter().find(|offer| offer.id == result.offer_id))
    else {
        return Ok(());
    };

    println!();
    println!("Candidates ranked for \"{}\":", best.title);
    for (position, result) in service
        .rank_candidates_for_offer(best, &sample_pool(&candidate))
        .iter()
        .enumerate()
    {
        println!(
            "  #{} candidate {} [{:.1}] {}",
            position + 1,
            result.candidate_id,
            result.overall_score,
            result.explanation
        );
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RankOptions {
    pub(crate) min_score: f64,
    pub(crate) top: Option<usize>,
    pub(crate) parallel: bool,
}

/// Threshold first, then the top-N cut, both on the ranked order.
pub(crate) fn rank_offers<R>(
    service: &RankingService<R>,
    candidate: &CandidateProfile,
    offers: &[JobOffer],
    options: RankOptions,
) -> Result<Vec<MatchingResult>, MatchError>
where
    R: SkillRepository,
{
    let mut results = if options.parallel {
        service.get_matches_above_threshold_parallel(candidate, offers, options.min_score)?
    } else {
        service.get_matches_above_threshold(candidate, offers, options.min_score)?
    };

    if let Some(top) = options.top {
        results.truncate(top);
    }
    Ok(results)
}

fn print_results(results: &[MatchingResult], json: bool) -> Result<(), AppError> {
    if json {
        let response = MatchResponse {
            results: results.to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if results.is_empty() {
        println!("No offers met the requested threshold.");
    } else {
        print!("{}", render_results(results));
    }
    Ok(())
}

pub(crate) fn render_results(results: &[MatchingResult]) -> String {
    let mut output = String::new();

    for (position, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "#{} [{:.1}] offer {}: {}\n",
            position + 1,
            result.overall_score,
            result.offer_id,
            result.offer_title
        ));
        output.push_str(&format!(
            "    skills {:.1} | location {:.1} | contract {:.1} | experience {:.1}\n",
            result.skills_score,
            result.location_score,
            result.contract_score,
            result.experience_score
        ));
        if let Some(distance) = result.distance_km {
            output.push_str(&format!("    distance: {distance:.1} km\n"));
        }
        if !result.matched_skills.is_empty() {
            output.push_str(&format!("    matched: {}\n", result.matched_skills.join(", ")));
        }
        if !result.partial_skills.is_empty() {
            let partial: Vec<String> = result
                .partial_skills
                .iter()
                .map(|skill| {
                    format!(
                        "{} ({} < {})",
                        skill.name,
                        skill.candidate_level.label(),
                        skill.required_level.label()
                    )
                })
                .collect();
            output.push_str(&format!("    partial: {}\n", partial.join(", ")));
        }
        if !result.missing_skills.is_empty() {
            output.push_str(&format!("    missing: {}\n", result.missing_skills.join(", ")));
        }
        output.push_str(&format!("    {}\n", result.explanation));
    }

    output
}

fn sample_candidate() -> CandidateProfile {
    CandidateProfile {
        id: CandidateId(1),
        display_name: "Yasmine Ben Salah".to_string(),
        location: "Tunis".to_string(),
        coordinates: Some(Coordinates {
            latitude: 36.8065,
            longitude: 10.1815,
        }),
        years_of_experience: 3,
        skills: vec![
            skill("Java", SkillLevel::Advanced),
            skill("Spring Boot", SkillLevel::Intermediate),
            skill("PostgreSQL", SkillLevel::Beginner),
            skill("Docker", SkillLevel::Intermediate),
            skill("Angular", SkillLevel::Beginner),
        ],
        preferred_contract_types: BTreeSet::from([ContractType::Cdi, ContractType::FullTime]),
    }
}

fn sample_pool(first: &CandidateProfile) -> Vec<CandidateProfile> {
    vec![
        first.clone(),
        CandidateProfile {
            id: CandidateId(2),
            display_name: "Karim Jlassi".to_string(),
            location: "Sfax".to_string(),
            coordinates: Some(Coordinates {
                latitude: 34.7406,
                longitude: 10.7603,
            }),
            years_of_experience: 6,
            skills: vec![
                skill("Java", SkillLevel::Advanced),
                skill("Spring", SkillLevel::Advanced),
                skill("PostgreSQL", SkillLevel::Advanced),
                skill("Angular", SkillLevel::Intermediate),
            ],
            preferred_contract_types: BTreeSet::new(),
        },
        CandidateProfile {
            id: CandidateId(3),
            display_name: "Nour Hammami".to_string(),
            location: "Ariana".to_string(),
            coordinates: None,
            years_of_experience: 0,
            skills: vec![skill("JavaScript", SkillLevel::Beginner)],
            preferred_contract_types: BTreeSet::from([ContractType::Internship]),
        },
    ]
}

fn skill(name: &str, level: SkillLevel) -> CandidateSkill {
    CandidateSkill {
        name: name.to_string(),
        level,
    }
}
