//! Agent-first command line surface.
//!
//! Each subcommand reads JSON (or raw text for `normalize`) from a file or
//! stdin and prints the pipeline's JSON output on stdout, so the routing
//! layer and operators can exercise any stage in isolation.

use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::config::PipelineConfig;
use crate::error::BpResult;
use crate::ingest;
use crate::model::{CriterionScores, SkillScore, TaskContext};
use crate::pipeline::AssessmentPipeline;

#[derive(Debug, Parser)]
#[command(name = "bandpipe")]
#[command(about = "Assessment normalization and band scoring pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a raw transcript (plain text input).
    Normalize(InputArgs),
    /// Normalize recognizer JSON output and extract fluency features.
    Features(InputArgs),
    /// Band per-criterion scores: `{"criteria": {...}, "context": {...}}`.
    Score(InputArgs),
    /// Map a listening raw score to its band.
    Listening {
        /// Correctly answered items in the fixed listening set.
        #[arg(long)]
        correct: u32,
        /// Drop the diagnostic ceiling (perfect score maps to 7.5).
        #[arg(long)]
        uncapped: bool,
    },
    /// Aggregate per-skill bands: `[{"skill": "...", "band": ...}, ...]`.
    Aggregate(InputArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file; reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> BpResult<String> {
        match &self.input {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreRequest {
    criteria: CriterionScores,
    #[serde(default)]
    context: TaskContext,
}

pub fn run(cli: Cli) -> BpResult<()> {
    match cli.command {
        Command::Normalize(args) => {
            let raw = args.read()?;
            let pipeline = AssessmentPipeline::new()?;
            let transcript = pipeline.normalize_transcript(&raw);
            println!("{}", serde_json::to_string_pretty(&transcript)?);
        }
        Command::Features(args) => {
            let raw_json: serde_json::Value = serde_json::from_str(&args.read()?)?;
            let recognized = ingest::parse_recognizer_output(&raw_json)?;
            let pipeline = AssessmentPipeline::new()?;
            let assessment =
                pipeline.process_speech(&recognized.transcript, &recognized.segments);
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Command::Score(args) => {
            let request: ScoreRequest = serde_json::from_str(&args.read()?)?;
            let pipeline = AssessmentPipeline::new()?;
            let scored = pipeline.score_task(&request.criteria, &request.context);
            println!("{}", serde_json::to_string_pretty(&scored)?);
        }
        Command::Listening { correct, uncapped } => {
            let mut config = PipelineConfig::default();
            if uncapped {
                config.scoring.diagnostic_ceiling = None;
            }
            let pipeline = AssessmentPipeline::with_config(config)?;
            let band = pipeline.score_listening(correct);
            println!("{}", serde_json::json!({ "band": band }));
        }
        Command::Aggregate(args) => {
            let skills: Vec<SkillScore> = serde_json::from_str(&args.read()?)?;
            let pipeline = AssessmentPipeline::new()?;
            let report = pipeline.report(&skills);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
