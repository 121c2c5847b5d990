use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use glossa::discovery::{self, DiscoveryConfig};
use glossa::parallel_processing::{process_files_parallel, ProcessingConfig};
use glossa::profile::{LanguageProfile, ProfileRegistry};
use glossa::reader::read_file_async;
use glossa::restart_log::RestartLog;
use glossa::{
    decode_annotation, decode_annotation_line, EngineSettings, InMemoryTermRepository, Pipeline,
    SimilarityRanker, TermRepository, UpdatedFields,
};

#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(about = "Segment, match and annotate foreign-language texts against a vocabulary")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write `<stem>_annotation.tsv` next to every *.txt file under a directory
    Process(ProcessArgs),
    /// Read edits back from an annotation file
    Decode(DecodeArgs),
    /// Suggest existing terms similar to a candidate
    Similar(SimilarArgs),
}

#[derive(Args, Debug)]
struct LanguageArgs {
    /// Built-in language profile code
    #[arg(long, default_value = "en")]
    language: String,

    /// Profile TOML file, replaces the built-in profile with the same code
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Vocabulary snapshot: a JSON array of terms
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Engine settings TOML file
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Root directory to scan for *.txt files
    root_dir: PathBuf,

    #[command(flatten)]
    language: LanguageArgs,

    /// Overwrite existing annotation files
    #[arg(long)]
    overwrite_all: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Walk the directory tree with parallel threads
    #[arg(long)]
    parallel_discovery: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Source text the annotation was produced from
    text: PathBuf,

    /// Edited annotation file
    annotation: PathBuf,

    #[command(flatten)]
    language: LanguageArgs,

    /// 1-based line to decode; all lines when omitted
    #[arg(long)]
    line: Option<usize>,

    /// Write edited translations back into the vocabulary file
    #[arg(long)]
    apply: bool,
}

#[derive(Args, Debug)]
struct SimilarArgs {
    /// Candidate term text
    candidate: String,

    #[command(flatten)]
    language: LanguageArgs,

    /// Override the number of suggestions from the settings
    #[arg(long)]
    count: Option<i64>,
}

/// Everything a subcommand needs to run the engine
struct Engine {
    profile: Arc<LanguageProfile>,
    repository: Arc<InMemoryTermRepository>,
    settings: EngineSettings,
}

impl LanguageArgs {
    fn load(&self) -> Result<Engine> {
        let mut registry = ProfileRegistry::builtin()?;
        let profile = match &self.profile {
            Some(path) => {
                let profile = registry.load_file(path)?;
                if profile.code() != self.language {
                    info!(
                        "Profile file {} defines language '{}', using it instead of '{}'",
                        path.display(),
                        profile.code(),
                        self.language
                    );
                }
                profile
            }
            None => registry.get(&self.language)?,
        };

        let repository = match &self.vocabulary {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read vocabulary {}", path.display()))?;
                InMemoryTermRepository::from_json(&json)
                    .with_context(|| format!("Invalid vocabulary {}", path.display()))?
            }
            None => InMemoryTermRepository::default(),
        };

        let settings = match &self.settings {
            Some(path) => EngineSettings::load(path)?,
            None => EngineSettings::default(),
        };

        Ok(Engine {
            profile,
            repository: Arc::new(repository),
            settings,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).json().init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Command::Process(args) => run_process(args).await,
        Command::Decode(args) => run_decode(args).await,
        Command::Similar(args) => run_similar(args),
    }
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    if !args.root_dir.is_dir() {
        bail!("Root path is not a directory: {}", args.root_dir.display());
    }

    let engine = args.language.load()?;
    let pipeline = Arc::new(Pipeline::from_repository(
        Arc::clone(&engine.profile),
        engine.repository.as_ref(),
    )?);

    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
    };
    info!("Starting file discovery in: {}", args.root_dir.display());
    let discovered = if args.parallel_discovery {
        discovery::collect_discovered_files_parallel(&args.root_dir, discovery_config).await?
    } else {
        discovery::collect_discovered_files(&args.root_dir, discovery_config).await?
    };

    let (valid, invalid): (Vec<_>, Vec<_>) = discovered.into_iter().partition(|f| f.is_valid());
    for file in &invalid {
        info!(
            "Issue with {}: {}",
            file.path.display(),
            file.error.as_deref().unwrap_or_default()
        );
    }
    let files: Vec<PathBuf> = valid.into_iter().map(|f| f.path).collect();

    let mut restart_log = RestartLog::load_for_run(
        &args.root_dir,
        engine.profile.code(),
        &pipeline.snapshot().fingerprint(),
    )
    .await;
    let dropped = restart_log.verify_completed_files().await;
    if !dropped.is_empty() {
        info!("{} previously completed files need annotating again", dropped.len());
    }

    let config = ProcessingConfig {
        overwrite_all: args.overwrite_all,
        fail_fast: args.fail_fast,
        use_mmap: args.use_mmap,
        show_progress: !args.no_progress,
        ..ProcessingConfig::default()
    };
    let result = process_files_parallel(&files, pipeline, &config, &mut restart_log).await;
    restart_log.save(&args.root_dir).await?;
    let run = result?;

    run.write_json(&args.stats_out).await?;

    println!("glossa v{} - annotation complete", env!("CARGO_PKG_VERSION"));
    println!(
        "Annotated: {}, skipped: {}, failed: {}, files with issues: {}",
        run.files_processed,
        run.files_skipped,
        run.files_failed,
        invalid.len()
    );
    println!("Sentences: {}, characters: {}", run.total_sentences, run.total_chars);
    println!("Stats written to {}", args.stats_out.display());
    Ok(())
}

async fn run_decode(args: DecodeArgs) -> Result<()> {
    let engine = args.language.load()?;
    let pipeline = Pipeline::from_repository(Arc::clone(&engine.profile), engine.repository.as_ref())?;

    let text = read_file_async(&args.text).await?;
    let document = read_file_async(&args.annotation).await?;
    let view = pipeline.read_text(&text);

    let decoded: Vec<UpdatedFields> = match args.line {
        Some(line) => vec![decode_annotation_line(&document, line, &view.sentences)
            .with_context(|| format!("Failed to decode line {line} of {}", args.annotation.display()))?],
        None => decode_annotation(&document, &view.sentences)
            .with_context(|| format!("Failed to decode {}", args.annotation.display()))?,
    };

    println!("{}", serde_json::to_string_pretty(&decoded)?);

    if args.apply {
        let Some(vocabulary) = &args.language.vocabulary else {
            bail!("--apply needs --vocabulary");
        };
        let updates: Vec<_> = decoded.iter().flat_map(UpdatedFields::term_updates).collect();
        let changed = engine.repository.apply_updates(&updates)?;
        write_vocabulary(vocabulary, &engine.repository).await?;
        info!(changed, "Applied annotation edits to vocabulary");
        println!("Updated {changed} terms in {}", vocabulary.display());
    }
    Ok(())
}

fn run_similar(args: SimilarArgs) -> Result<()> {
    let mut engine = args.language.load()?;
    if let Some(count) = args.count {
        engine.settings.similar_terms_count = count;
    }

    let repository: Arc<dyn TermRepository> = engine.repository;
    let ranker = SimilarityRanker::new(repository, engine.settings);
    let suggestions = ranker.suggest(engine.profile.code(), &args.candidate)?;
    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}

async fn write_vocabulary(path: &Path, repository: &InMemoryTermRepository) -> Result<()> {
    let json = repository.to_json()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write vocabulary {}", path.display()))
}
