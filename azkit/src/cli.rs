///
/// This module implements the CLI interface for azkit: command parsing, argument
/// validation and the async entrypoint shared by `main()` and integration tests.
///
/// All business logic (filtering, storage, lookups) lives in the [`azkit-core`] crate.
/// This module is strictly CLI glue: it reads inputs, calls core, and prints results.
///
/// ## Output
/// - Command results go to stdout (JSON where the result is structured).
/// - Diagnostics go through `tracing`, which the binary routes to stderr.
///
/// [`azkit-core`]: ../../azkit-core/
use crate::load_config::load_config;
use anyhow::{bail, Context, Result};
use azkit_core::contract::BlobMetadata;
use azkit_core::data_gen::DataGenerator;
use azkit_core::env::Env;
use azkit_core::local_store::LocalBlobStore;
use azkit_core::pyproject::PyprojectParser;
use azkit_core::storage::StorageUtil;
use azkit_core::tz::Tz;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use serde_json::Value;
use std::path::PathBuf;

/// CLI for azkit: document filtering and Azure-style developer utilities.
#[derive(Parser)]
#[clap(
    name = "azkit",
    version,
    about = "Filter JSON documents, manage blob containers and inspect the local environment"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply an include/exclude filter to a JSON document or array of documents
    Filter {
        /// Path to the YAML filter config
        #[clap(long)]
        config: PathBuf,
        /// Path to the JSON input
        #[clap(long)]
        input: PathBuf,
    },
    /// Print random sample person documents as JSON
    Gen {
        #[clap(long, default_value_t = 1)]
        count: usize,
    },
    /// Show the standard environment variables and whether they are set
    Env,
    /// Summarise a pyproject.toml manifest
    Manifest {
        #[clap(long, default_value = "pyproject.toml")]
        file: PathBuf,
    },
    /// List timezone names
    Tz {
        /// List every zone, including legacy aliases
        #[clap(long)]
        all: bool,
    },
    /// Blob storage operations against a local directory
    Blob {
        /// Root directory of the blob store
        #[clap(long)]
        root: PathBuf,
        #[clap(subcommand)]
        action: BlobAction,
    },
}

#[derive(Subcommand)]
pub enum BlobAction {
    CreateContainer {
        container: String,
    },
    DeleteContainer {
        container: String,
    },
    ListContainers,
    /// List the blobs of a container
    List {
        container: String,
        /// Print name, size, etag, creation time and deleted flag as JSON
        #[clap(long)]
        details: bool,
    },
    /// Upload one or more local files
    Upload {
        container: String,
        #[clap(required = true)]
        files: Vec<PathBuf>,
        /// Blob name to use (single file only)
        #[clap(long = "as")]
        blob_name: Option<String>,
        /// Keep existing blobs instead of replacing them
        #[clap(long)]
        no_replace: bool,
        /// Metadata as key=value, repeatable
        #[clap(long = "meta", value_parser = parse_key_val)]
        metadata: Vec<(String, String)>,
    },
    /// Store a string as a blob
    PutString {
        container: String,
        blob: String,
        content: String,
        #[clap(long)]
        no_replace: bool,
    },
    /// Download a blob to a local file
    Download {
        container: String,
        blob: String,
        output: PathBuf,
    },
    /// Print a blob as UTF-8 text
    Cat {
        container: String,
        blob: String,
    },
    Delete {
        container: String,
        blob: String,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Filter { config, input } => run_filter(config, input),
        Commands::Gen { count } => {
            let docs = DataGenerator::new().random_person_documents(count);
            println!("{}", serde_json::to_string_pretty(&docs)?);
            Ok(())
        }
        Commands::Env => {
            Env::log_standard_env_vars();
            for (name, description) in Env::standard_env_vars() {
                let state = if Env::envvar(name, None).is_some() { "set" } else { "unset" };
                println!("{name} ({state}): {description}");
            }
            Ok(())
        }
        Commands::Manifest { file } => {
            let mut parser = PyprojectParser::new();
            parser
                .parse(&file)
                .with_context(|| format!("Could not load manifest {}", file.display()))?;
            println!("name: {}", parser.name().unwrap_or("<none>"));
            println!("version: {}", parser.version().unwrap_or("<none>"));
            println!("description: {}", parser.description().unwrap_or("<none>"));
            println!("dependencies:");
            for name in parser.dependency_names() {
                println!("  {name}");
            }
            Ok(())
        }
        Commands::Tz { all } => {
            let names = if all { Tz::all_timezones() } else { Tz::common_timezones() };
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Blob { root, action } => {
            let store = LocalBlobStore::open(&root)
                .await
                .with_context(|| format!("Could not open blob store at {}", root.display()))?;
            run_blob(StorageUtil::new(store), action).await
        }
    }
}

fn run_filter(config: PathBuf, input: PathBuf) -> Result<()> {
    let config = load_config(config)?;
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read input {}", input.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Input {} is not valid JSON", input.display()))?;

    let output = match value {
        Value::Array(items) => {
            let mut filtered = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let doc = config
                    .filter
                    .filter_value(item)
                    .with_context(|| format!("Input element {index} is not a document"))?;
                filtered.push(doc);
            }
            tracing::info!(count = filtered.len(), "Filtered documents");
            Value::Array(filtered)
        }
        other => config.filter.filter_value(&other)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_blob(util: StorageUtil<LocalBlobStore>, action: BlobAction) -> Result<()> {
    match action {
        BlobAction::CreateContainer { container } => {
            if util.create_container(&container).await.is_none() {
                bail!("Failed to create container '{container}'");
            }
        }
        BlobAction::DeleteContainer { container } => {
            if !util.delete_container(&container).await {
                bail!("Failed to delete container '{container}'");
            }
        }
        BlobAction::ListContainers => {
            for name in util.list_containers().await {
                println!("{name}");
            }
        }
        BlobAction::List { container, details } => {
            let listing = util.list_container(&container, !details).await;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        BlobAction::Upload {
            container,
            files,
            blob_name,
            no_replace,
            metadata,
        } => {
            let metadata: Option<BlobMetadata> = if metadata.is_empty() {
                None
            } else {
                Some(metadata.into_iter().collect())
            };
            let replace = !no_replace;
            match blob_name {
                Some(name) => {
                    if files.len() != 1 {
                        bail!("--as can only be used with a single file");
                    }
                    if !util
                        .upload_file_as(&container, &name, &files[0], metadata, replace)
                        .await
                    {
                        bail!("Failed to upload {} as '{name}'", files[0].display());
                    }
                }
                None => {
                    let uploads = files
                        .iter()
                        .map(|f| util.upload_file(&container, f, metadata.clone(), replace));
                    let results = join_all(uploads).await;
                    let failed: Vec<_> = files
                        .iter()
                        .zip(results)
                        .filter(|(_, ok)| !ok)
                        .map(|(f, _)| f.display().to_string())
                        .collect();
                    if !failed.is_empty() {
                        bail!("Failed to upload: {}", failed.join(", "));
                    }
                }
            }
        }
        BlobAction::PutString {
            container,
            blob,
            content,
            no_replace,
        } => {
            if !util
                .upload_string_as(&container, &blob, &content, None, !no_replace)
                .await
            {
                bail!("Failed to store blob '{blob}'");
            }
        }
        BlobAction::Download {
            container,
            blob,
            output,
        } => {
            let (ok, props) = util.download_blob_to_file(&container, &blob, &output).await;
            match (ok, props) {
                (true, Some(props)) => println!("{}", serde_json::to_string_pretty(&props)?),
                _ => bail!("Failed to download blob '{blob}'"),
            }
        }
        BlobAction::Cat { container, blob } => match util.download_blob_as_string(&container, &blob).await {
            Some(text) => print!("{text}"),
            None => bail!("Failed to read blob '{blob}'"),
        },
        BlobAction::Delete { container, blob } => {
            if !util.delete_blob(&container, &blob).await {
                bail!("Failed to delete blob '{blob}'");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_metadata_parsing() {
        assert_eq!(
            parse_key_val("origin=cli").unwrap(),
            ("origin".to_string(), "cli".to_string())
        );
        assert_eq!(parse_key_val("empty=").unwrap().1, "");
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
