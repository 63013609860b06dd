// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::AnalyzerConfig;
use crate::core::{Phase, SubmissionController, SubmissionStatus};
use crate::report::{render_envelope, render_progress};
use crate::types::JobText;
use crate::utils::{analysis_output_path, write_file_content};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "Analyze a resume PDF against a job role or description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file (defaults to ./resume-analyzer.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a resume and print the analysis
    Analyze(AnalyzeArgs),
    /// Show the resolved configuration
    Config,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Resume PDF to analyze
    pub resume: PathBuf,

    /// Short role title, e.g. "Frontend Engineer"
    #[arg(long, conflicts_with_all = ["description", "description_file"])]
    pub role: Option<String>,

    /// Full job description text
    #[arg(long, conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    pub description_file: Option<PathBuf>,

    /// Analysis service base URL, overriding configuration
    #[arg(long, conflicts_with = "simulate")]
    pub endpoint: Option<String>,

    /// Use the built-in example result instead of calling a service
    #[arg(long)]
    pub simulate: bool,

    /// Print the result envelope as JSON
    #[arg(long)]
    pub json: bool,

    /// Save the result envelope into this directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not print upload progress
    #[arg(long)]
    pub quiet: bool,
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = AnalyzerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze(args) => analyze(config, args).await,
        Command::Config => {
            let rendered =
                serde_yaml::to_string(&config).context("Failed to render configuration")?;
            println!("{}", rendered.trim_end());
            println!(
                "mode: {}",
                if config.is_simulated() {
                    "simulated"
                } else {
                    "service"
                }
            );
            Ok(())
        }
    }
}

async fn analyze(config: AnalyzerConfig, args: AnalyzeArgs) -> Result<()> {
    let config = if args.simulate {
        config.without_endpoint()
    } else {
        config.apply_endpoint_override(args.endpoint.clone())
    };

    let mut controller = SubmissionController::new(&config)?;

    let resume_name = match controller.select_path(&args.resume).await {
        Ok(file) => file.name().to_string(),
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            return Err(e).context("Failed to select resume");
        }
    };

    controller.set_job_text(job_text(&args).await?);
    info!(
        "Analyzing {} against {:?} text ({} chars)",
        resume_name,
        controller.mode(),
        controller.job_payload().len()
    );

    let printer = (!args.quiet).then(|| spawn_progress_printer(controller.subscribe()));

    let outcome = controller.submit().await;

    if let Some(printer) = printer {
        printer.abort();
        let _ = printer.await;
        eprintln!();
    }

    let envelope = match outcome {
        Ok(envelope) => envelope,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            return Err(e.into());
        }
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&envelope).context("Failed to serialize analysis")?;
        println!("{}", json);
    } else {
        print!("{}", render_envelope(&envelope));
    }

    if let Some(dir) = &args.output_dir {
        let path = analysis_output_path(dir, &resume_name);
        let json = serde_json::to_string_pretty(&envelope).context("Failed to serialize analysis")?;
        write_file_content(&path, &json).await?;
        println!("✓ Saved analysis to {}", path.display());
    }

    Ok(())
}

async fn job_text(args: &AnalyzeArgs) -> Result<JobText> {
    if let Some(role) = &args.role {
        return Ok(JobText::role(role.clone()));
    }

    if let Some(description) = &args.description {
        return Ok(JobText::description(description.clone()));
    }

    if let Some(path) = &args.description_file {
        let description = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description: {}", path.display()))?;
        return Ok(JobText::description(description));
    }

    Ok(JobText::default())
}

fn spawn_progress_printer(mut rx: watch::Receiver<SubmissionStatus>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = *rx.borrow_and_update();
            if let Some(percent) = status.progress {
                eprint!("\r{}", render_progress(percent));
            }
            if matches!(status.phase, Phase::Settled(_)) {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_parse_analyze_with_role() {
        let cli = parse(&["resume-analyzer", "analyze", "cv.pdf", "--role", "Frontend Engineer"])
            .unwrap();
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.resume, PathBuf::from("cv.pdf"));
                assert_eq!(args.role.as_deref(), Some("Frontend Engineer"));
                assert!(!args.simulate);
            }
            Command::Config => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_role_and_description_conflict() {
        assert!(parse(&[
            "resume-analyzer",
            "analyze",
            "cv.pdf",
            "--role",
            "x",
            "--description",
            "y"
        ])
        .is_err());
    }

    #[test]
    fn test_endpoint_and_simulate_conflict() {
        assert!(parse(&[
            "resume-analyzer",
            "analyze",
            "cv.pdf",
            "--endpoint",
            "http://localhost:5000",
            "--simulate"
        ])
        .is_err());
    }

    #[tokio::test]
    async fn test_job_text_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        std::fs::write(&path, "Build dashboards in React").unwrap();

        let cli = parse(&[
            "resume-analyzer",
            "analyze",
            "cv.pdf",
            "--description-file",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        let text = job_text(&args).await.unwrap();
        assert_eq!(text.active(), "Build dashboards in React");
    }

    #[tokio::test]
    async fn test_analyze_simulated_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("Jane Doe.pdf");
        std::fs::write(&resume, b"%PDF-1.7 resume").unwrap();
        let out = dir.path().join("out");

        let config = AnalyzerConfig::default()
            .with_simulation(crate::config::SimulationConfig::instant());
        let args = AnalyzeArgs {
            resume,
            role: Some("Frontend Engineer".into()),
            description: None,
            description_file: None,
            endpoint: None,
            simulate: true,
            json: true,
            output_dir: Some(out.clone()),
            quiet: true,
        };

        analyze(config, args).await.unwrap();

        let saved: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
        assert_eq!(saved.len(), 1);
        let path = saved[0].as_ref().unwrap().path();
        let content: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(content["gemini_analysis"]["overall_match_score"], 82);
    }
}
