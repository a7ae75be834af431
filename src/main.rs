mod abilities;
mod attributes;
mod audit;
mod catalog;
mod classify;
mod config;
mod document;
mod enrich;
mod error;
mod images;
mod import;
mod label;
mod normalize;
mod prompt;
mod remote;
mod sections;
mod species;
mod story;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catalog::Catalog;
use config::Config;
use error::{CatalogError, Result};
use prompt::{NoPrompt, Prompter, StdinPrompter};
use remote::{DocumentStore, FirestoreStore};
use sections::Sections;
use species::Extractor;

#[derive(Parser)]
#[command(
    name = "species_extract",
    about = "Species catalog extraction and maintenance"
)]
struct Cli {
    /// Configuration file (defaults to ./species.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API key for the remote document store
    #[arg(long, env = "FIRESTORE_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Remote project id
    #[arg(long, env = "FIREBASE_PROJECT_ID", global = true)]
    project_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse one species document, append it to the catalog and upload it
    Add {
        /// Source document; prompts with a listing of the source root when omitted
        file: Option<PathBuf>,
        /// Only write the local catalog
        #[arg(long)]
        no_upload: bool,
        /// Never prompt; missing fields keep their defaults
        #[arg(long)]
        non_interactive: bool,
    },
    /// Fill empty and placeholder fields of every record from a multi-species corpus
    Enrich {
        /// Corpus text (defaults to the configured corpus path)
        corpus: Option<PathBuf>,
        /// Report what would change without writing the catalog
        #[arg(long)]
        dry_run: bool,
    },
    /// Convert species images to WebP and point records at them
    Images,
    /// List records with missing or placeholder fields
    Audit {
        /// Also write a Markdown report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Upsert every record of a catalog file with search fields added
    Import {
        /// Catalog or bulk species JSON (defaults to the configured catalog)
        file: Option<PathBuf>,
    },
    /// Upsert existing catalog records to the remote store
    Upload {
        /// Species names, case-insensitive
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(key) = cli.api_key {
        config.remote.api_key = key;
    }
    if let Some(project) = cli.project_id
        && !project.trim().is_empty()
    {
        config.remote.project_id = project;
    }

    match cli.command {
        Command::Add {
            file,
            no_upload,
            non_interactive,
        } => run_add(&config, file, no_upload, non_interactive),
        Command::Enrich { corpus, dry_run } => run_enrich(&config, corpus.as_deref(), dry_run),
        Command::Images => run_images(&config),
        Command::Audit { report } => run_audit(&config, report.as_deref()),
        Command::Import { file } => run_import(&config, file.as_deref()),
        Command::Upload { names } => run_upload(&config, &names),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  ADD: one species document → one new catalog record
// ═══════════════════════════════════════════════════════════════════════

fn run_add(config: &Config, file: Option<PathBuf>, no_upload: bool, non_interactive: bool) -> Result<()> {
    let path = match file {
        Some(path) => path,
        None if non_interactive => {
            return Err(CatalogError::Config(
                "no input file given and prompting is disabled".to_string(),
            ));
        }
        None => choose_source_file(&config.source_root)?,
    };

    let text = document::load_source_text(&path)?;
    let extractor = Extractor::new(config);
    let mut draft = extractor.parse_document(&text);

    let mut catalog = Catalog::load(&config.catalog_path)?;
    // Refuse before asking the operator anything.
    normalize::ensure_unique_name(&catalog.records, &draft.name)?;

    let mut prompter: Box<dyn Prompter> = if non_interactive {
        Box::new(NoPrompt)
    } else {
        Box::new(StdinPrompter)
    };
    species::fill_gaps(&mut draft, prompter.as_mut(), &config.default_source);

    let record = catalog.add(draft, &config.default_source)?.clone();
    catalog.save()?;
    println!("Added '{}' (id {}, slug '{}') to {}", record.name, record.id, record.slug, catalog.path().display());

    if no_upload {
        return Ok(());
    }
    let store = FirestoreStore::new(&config.remote)?;
    store.upsert(&record.slug, &record)?;
    println!("Uploaded '{}' to {}", record.name, config.remote.collection);
    Ok(())
}

/// List the source root and read a relative path from stdin.
fn choose_source_file(root: &Path) -> Result<PathBuf> {
    let files = document::list_source_files(root);
    if files.is_empty() {
        return Err(CatalogError::MissingInputFile(root.to_path_buf()));
    }
    println!("Files under {}:", root.display());
    for file in &files {
        println!("  {}", file.display());
    }
    print!("Enter the relative path of the source file: ");
    io::stdout().flush().map_err(|e| CatalogError::io("<stdout>", e))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CatalogError::io("<stdin>", e))?;
    Ok(root.join(line.trim()))
}

// ═══════════════════════════════════════════════════════════════════════
//  ENRICH: corpus sections → gaps in existing records
// ═══════════════════════════════════════════════════════════════════════

fn run_enrich(config: &Config, corpus: Option<&Path>, dry_run: bool) -> Result<()> {
    let corpus_path = corpus.unwrap_or(config.corpus_path.as_path());
    let text = document::load_source_text(corpus_path)?;
    let sections = Sections::segment(&text);
    if sections.is_empty() {
        tracing::warn!("no section headings found in {}", corpus_path.display());
    } else {
        tracing::info!("{} sections in {}", sections.len(), corpus_path.display());
        tracing::debug!("sections: {}", sections.keys().collect::<Vec<_>>().join(", "));
    }

    let mut catalog = Catalog::load(&config.catalog_path)?;
    let extractor = Extractor::new(config);
    let report = enrich::enrich_catalog(&mut catalog.records, &sections, &extractor, config);

    for (name, fields) in &report.filled {
        println!("  {name}: {}", fields.join(", "));
    }
    let filled: usize = report.filled.iter().map(|(_, f)| f.len()).sum();
    println!(
        "Processed {} records: {} updated, {} fields filled, {} without a section",
        report.processed,
        report.updated(),
        filled,
        report.unmatched.len()
    );

    if dry_run {
        println!("Dry run: {} not written", catalog.path().display());
        return Ok(());
    }
    if report.updated() > 0 {
        catalog.save()?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  IMAGES / AUDIT / IMPORT / UPLOAD
// ═══════════════════════════════════════════════════════════════════════

fn run_images(config: &Config) -> Result<()> {
    let mut catalog = Catalog::load(&config.catalog_path)?;
    let report = images::convert_catalog(&mut catalog.records, config)?;

    for name in &report.missing {
        println!("  no image for {name}");
    }
    println!(
        "Converted {} images into {}; {} species without a source image",
        report.converted.len(),
        config.image_target_dir.display(),
        report.missing.len()
    );
    catalog.save()
}

fn run_audit(config: &Config, report: Option<&Path>) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let issues = audit::audit_catalog(&catalog.records);

    if issues.is_empty() {
        println!("All {} records are complete", catalog.records.len());
    }
    for issue in &issues {
        println!("{} (id {}): {}", issue.name, issue.id, issue.problems.join(", "));
    }

    if let Some(path) = report {
        let markdown = audit::render_markdown(&issues);
        std::fs::write(path, &markdown).map_err(|e| CatalogError::io(path, e))?;
        eprintln!("  {} ({} bytes)", path.display(), markdown.len());
    }
    Ok(())
}

fn run_import(config: &Config, file: Option<&Path>) -> Result<()> {
    let path = file.unwrap_or(config.catalog_path.as_path());
    let catalog = Catalog::load(path)?;
    if catalog.records.is_empty() {
        return Err(CatalogError::Config(format!("{} holds no species records", path.display())));
    }

    let store = FirestoreStore::new(&config.remote)?;
    let updated_at = chrono::Utc::now().to_rfc3339();
    let imported = import::import_catalog(&catalog.records, &store, &config.image_url_prefix, &updated_at)?;
    for slug in &imported {
        println!("Imported {slug}");
    }
    println!("Imported {} species documents into {}", imported.len(), config.remote.collection);
    Ok(())
}

fn run_upload(config: &Config, names: &[String]) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    // Resolve every name before the first request goes out.
    let records = names
        .iter()
        .map(|name| {
            catalog
                .find(name)
                .ok_or_else(|| CatalogError::UnknownSpecies(name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let store = FirestoreStore::new(&config.remote)?;
    for record in records {
        let slug = if record.slug.is_empty() {
            normalize::slugify(&record.name)
        } else {
            record.slug.clone()
        };
        store.upsert(&slug, record)?;
        println!("Uploaded '{}' as {}/{}", record.name, config.remote.collection, slug);
    }
    Ok(())
}
