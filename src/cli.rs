use crate::{
    assessment,
    config::Config,
    engine::{command::CommandEngine, MediaType, TextRecovery},
    metrics::HealthMetrics,
    pipeline::{analyze_transcript, Pipeline},
    report::AnalysisResult,
    util::ensure_dir,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "medscan")]
#[command(about = "Medical report analyzer (OCR transcript + metric extraction + recommendations)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./medscan.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the text recovery tools are installed.
    Doctor {},
    /// Print the recovered transcript of one document.
    Extract {
        #[arg(long)]
        input: PathBuf,
        /// Declared media type; guessed from the extension when omitted.
        #[arg(long)]
        media_type: Option<String>,
    },
    /// Run the full analysis on one or more documents.
    Analyze {
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[arg(long)]
        media_type: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Analyze an already recovered plain-text transcript.
    AnalyzeText {
        #[arg(long)]
        input: PathBuf,
    },
    /// Summarise stored metrics (JSON) with warnings and advice.
    Assess {
        #[arg(long)]
        input: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Extract { input, media_type } => extract(&cfg, input, media_type.as_deref()),
        Command::Analyze {
            input,
            media_type,
            out_dir,
        } => analyze(&cfg, input, media_type.as_deref(), out_dir.as_deref()),
        Command::AnalyzeText { input } => analyze_text(&cfg, input),
        Command::Assess { input } => assess(&cfg, input),
    }
}

fn load_config(user: Option<&Path>) -> Result<Config> {
    if let Some(p) = user {
        return Config::load(p);
    }
    for candidate in ["medscan.toml", "medscan.example.toml"] {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Config::load(&path);
        }
    }
    Ok(Config::default())
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries results; logs go to stderr
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if !cfg.output.out_dir.is_empty() {
        return Some(PathBuf::from(&cfg.output.out_dir).join("medscan.log"));
    }

    Some(PathBuf::from("medscan.log"))
}

fn to_json<T: Serialize>(cfg: &Config, value: &T) -> Result<String> {
    let out = if cfg.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

fn doctor(cfg: &Config) -> Result<()> {
    let engine = CommandEngine::new(cfg);
    let diag = engine.doctor()?;
    if !diag.ok {
        warn!("some text recovery tools are missing");
    }
    println!("{}", to_json(cfg, &diag)?);
    Ok(())
}

fn resolve_media_type(input: &Path, declared: Option<&str>) -> String {
    if let Some(mt) = declared {
        return mt.to_string();
    }
    match input.extension().and_then(|s| s.to_str()) {
        Some(ext) => MediaType::guess_from_extension(ext).to_string(),
        None => {
            warn!("input has no extension; cannot guess media type: {}", input.display());
            "application/octet-stream".to_string()
        }
    }
}

fn read_input(cfg: &Config, input: &Path) -> Result<Vec<u8>> {
    let meta = std::fs::metadata(input).with_context(|| format!("stat input: {}", input.display()))?;
    if meta.len() > cfg.limits.max_input_bytes {
        bail!(
            "input exceeds max_input_bytes ({} > {}): {}",
            meta.len(),
            cfg.limits.max_input_bytes,
            input.display()
        );
    }
    std::fs::read(input).with_context(|| format!("reading input: {}", input.display()))
}

fn extract(cfg: &Config, input: &Path, declared: Option<&str>) -> Result<()> {
    let media_type = resolve_media_type(input, declared);
    let bytes = read_input(cfg, input)?;
    let pipeline = Pipeline::new(cfg, CommandEngine::new(cfg));
    let text = pipeline.recover(&bytes, &media_type)?;
    println!("{text}");
    Ok(())
}

fn analyze(
    cfg: &Config,
    inputs: &[PathBuf],
    declared: Option<&str>,
    out_override: Option<&Path>,
) -> Result<()> {
    let out_dir = out_override.map(PathBuf::from).or_else(|| {
        (!cfg.output.out_dir.is_empty()).then(|| PathBuf::from(&cfg.output.out_dir))
    });
    if let Some(dir) = &out_dir {
        ensure_dir(dir)?;
    }

    let pipeline = Pipeline::new(cfg, CommandEngine::new(cfg));
    let width = cfg.limits.max_parallel_documents.max(1);
    let mut failures = 0usize;

    // Each document is an independent unit of work; a batch of `width`
    // runs at once and nothing is shared between them but the pipeline.
    for batch in inputs.chunks(width) {
        let outcomes: Vec<Result<String>> = std::thread::scope(|s| {
            let handles: Vec<_> = batch
                .iter()
                .map(|input| {
                    let pipeline = &pipeline;
                    let out_dir = out_dir.as_deref();
                    s.spawn(move || analyze_one(cfg, pipeline, input, declared, out_dir))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| Err(anyhow!("analysis thread panicked"))))
                .collect()
        });

        for (input, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                Ok(out) => println!("{out}"),
                Err(err) => {
                    failures += 1;
                    error!("{}: {:#}", input.display(), err);
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} documents failed", inputs.len());
    }
    Ok(())
}

/// Returns what to print: the result JSON, or the written path when
/// results go to a directory.
fn analyze_one<E: TextRecovery>(
    cfg: &Config,
    pipeline: &Pipeline<E>,
    input: &Path,
    declared: Option<&str>,
    out_dir: Option<&Path>,
) -> Result<String> {
    let media_type = resolve_media_type(input, declared);
    let bytes = read_input(cfg, input)?;
    let result = pipeline
        .analyze(&bytes, &media_type)
        .with_context(|| format!("analyzing {}", input.display()))?;

    match out_dir {
        Some(dir) => {
            let path = dir.join(output_file_name(input, &result));
            std::fs::write(&path, to_json(cfg, &result)?)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
            Ok(path.display().to_string())
        }
        None => to_json(cfg, &result),
    }
}

fn output_file_name(input: &Path, result: &AnalysisResult) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    match &result.document {
        Some(doc) => format!("{stem}-{}.json", &doc.sha256[..12]),
        None => format!("{stem}.json"),
    }
}

fn analyze_text(cfg: &Config, input: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading transcript: {}", input.display()))?;
    let text = crate::transcript::normalize(cfg, &raw);
    let result = analyze_transcript(cfg, &text)?;
    println!("{}", to_json(cfg, &result)?);
    Ok(())
}

fn assess(cfg: &Config, input: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading metrics: {}", input.display()))?;
    let metrics: HealthMetrics = serde_json::from_str(&raw).with_context(|| "parsing metrics JSON")?;
    let assessment = assessment::assess(&metrics);
    println!("{}", to_json(cfg, &assessment)?);
    Ok(())
}
