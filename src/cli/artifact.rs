//
//  gh-actions-client
//  cli/artifact.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Workflow artifact commands
//!
//! Uploads files into an artifact container of the current workflow run
//! through the pipelines service. Must run inside a job, where the runner
//! exports `ACTIONS_RUNTIME_URL` and `ACTIONS_RUNTIME_TOKEN`.
//!
//! ## Examples
//!
//! ```bash
//! # Upload one file; the artifact is named after it
//! gha artifact upload report.html
//!
//! # Upload several files into one artifact
//! gha artifact upload -C test-results junit.xml coverage/
//!
//! # Rename the uploaded items
//! gha artifact upload -C logs build.log unit.log --name build.txt:unit.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::api::internal::{ArtifactUpload, PipelinesApi};
use crate::api::{ApiError, ApiResult};
use crate::config::RunnerEnv;
use crate::util::{format_duration, format_size};

use super::GlobalOptions;

/// Separator of `--name` entries.
const NAME_SEPARATOR: char = ':';

/// Manage workflow artifacts
#[derive(Args, Debug)]
pub struct ArtifactCommand {
    #[command(subcommand)]
    pub command: ArtifactSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ArtifactSubcommand {
    /// Upload files into an artifact of the current run
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Files or directories to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Artifact (container) name
    #[arg(long, short = 'C')]
    pub container_name: Option<String>,

    /// Item names for the files, separated by ':'
    #[arg(long)]
    pub name: Option<String>,

    /// Workflow run id (defaults to GITHUB_RUN_ID)
    #[arg(long)]
    pub run_id: Option<u64>,

    /// Run instance id, to address the service without ACTIONS_RUNTIME_URL
    #[arg(long)]
    pub run_instance_id: Option<String>,

    /// Days to keep the artifact (at most GITHUB_RETENTION_DAYS)
    #[arg(long)]
    pub retention_days: Option<u32>,
}

/// One file scheduled for upload.
#[derive(Debug, Clone, PartialEq)]
struct UploadItem {
    source: PathBuf,
    item_path: String,
}

#[derive(Debug, Serialize)]
struct UploadSummary {
    artifact: String,
    container_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_on: Option<String>,
    files: Vec<String>,
    bytes: u64,
}

impl ArtifactCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ArtifactSubcommand::Upload(args) => self.upload(args, global),
        }
    }

    /// Upload files
    fn upload(&self, args: &UploadArgs, global: &GlobalOptions) -> Result<()> {
        let names = item_names(&args.files, args.name.as_deref())?;
        let artifact = container_name(args.container_name.as_deref(), &names)?;
        let items = expand_items(&args.files, &names)?;
        if items.is_empty() {
            bail!("Nothing to upload: the given directories are empty");
        }

        let api = PipelinesApi::with_env(
            global.token.as_deref(),
            args.run_instance_id.as_deref(),
            RunnerEnv::from_process(),
        )?;

        let started = Instant::now();
        let summary = api.upload_artifact(args.run_id, &artifact, args.retention_days, |upload| {
            for item in &items {
                upload_one(upload, item, global.json)?;
            }
            Ok(UploadSummary {
                artifact: upload.name().to_string(),
                container_id: upload.container().id,
                expires_on: upload.container().expires_on.clone(),
                files: items.iter().map(|i| i.item_path.clone()).collect(),
                bytes: upload.bytes(),
            })
        })?;

        if global.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{} Uploaded {} file(s), {} to artifact {} in {}",
                style("✓").green(),
                summary.files.len(),
                format_size(summary.bytes),
                style(&summary.artifact).cyan(),
                format_duration(started.elapsed())
            );
            if let Some(expires) = &summary.expires_on {
                println!("  Expires: {}", expires);
            }
        }

        Ok(())
    }
}

fn upload_one(upload: &mut ArtifactUpload<'_>, item: &UploadItem, quiet: bool) -> ApiResult<()> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };
    progress.set_message(format!("Uploading {}", item.item_path));

    let result = fs::read(&item.source)
        .map_err(ApiError::from)
        .and_then(|content| upload.put(&item.item_path, &content).map(|_| content.len()));

    match &result {
        Ok(len) => progress.finish_with_message(format!(
            "{} ({})",
            item.item_path,
            format_size(*len as u64)
        )),
        Err(_) => progress.abandon_with_message(format!("{} failed", item.item_path)),
    }
    result.map(|_| ())
}

/// The item name of each `FILE` argument.
///
/// Names come from `--name` when given, otherwise from each file's name.
fn item_names(files: &[PathBuf], names: Option<&str>) -> Result<Vec<String>> {
    match names {
        Some(names) => {
            let names: Vec<String> = names.split(NAME_SEPARATOR).map(str::to_string).collect();
            if names.len() != files.len() {
                bail!(
                    "--name lists {} name(s) for {} file(s)",
                    names.len(),
                    files.len()
                );
            }
            if names.iter().any(|n| n.is_empty()) {
                bail!("--name entries must not be empty");
            }
            Ok(names)
        }
        None => files.iter().map(|f| file_name(f)).collect(),
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

/// The artifact name: `-C`, or the only item's name.
fn container_name(explicit: Option<&str>, names: &[String]) -> Result<String> {
    match (explicit, names) {
        (Some(name), _) if !name.is_empty() => Ok(name.to_string()),
        (Some(_), _) => bail!("--container-name must not be empty"),
        (None, [only]) => Ok(only.clone()),
        (None, _) => bail!("Several files need a --container-name"),
    }
}

/// Expands directories into their files, keeping `<name>/<relative path>`.
fn expand_items(files: &[PathBuf], names: &[String]) -> Result<Vec<UploadItem>> {
    let mut items = Vec::new();
    for (file, name) in files.iter().zip(names) {
        let meta = fs::metadata(file).with_context(|| format!("Cannot read {}", file.display()))?;
        if meta.is_dir() {
            walk_dir(file, name, &mut items)?;
        } else {
            items.push(UploadItem {
                source: file.clone(),
                item_path: name.clone(),
            });
        }
    }
    Ok(items)
}

fn walk_dir(dir: &Path, prefix: &str, items: &mut Vec<UploadItem>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Cannot list {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let item_path = format!("{}/{}", prefix, entry.file_name().to_string_lossy());
        if entry.file_type()?.is_dir() {
            walk_dir(&path, &item_path, items)?;
        } else {
            items.push(UploadItem {
                source: path,
                item_path,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_names_default_to_file_names() {
        let files = vec![PathBuf::from("out/report.html"), PathBuf::from("junit.xml")];
        assert_eq!(item_names(&files, None).unwrap(), vec!["report.html", "junit.xml"]);
    }

    #[test]
    fn test_item_names_must_match_file_count() {
        let files = vec![PathBuf::from("a"), PathBuf::from("b")];
        assert!(item_names(&files, Some("x")).is_err());
        assert_eq!(item_names(&files, Some("x:y")).unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_container_name() {
        assert_eq!(container_name(None, &["a.txt".to_string()]).unwrap(), "a.txt");
        assert_eq!(
            container_name(Some("logs"), &["a".to_string(), "b".to_string()]).unwrap(),
            "logs"
        );
        assert!(container_name(None, &["a".to_string(), "b".to_string()]).is_err());
    }

    #[test]
    fn test_expand_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("index.html"), "<p>hi</p>").unwrap();
        fs::write(root.join("css/main.css"), "p{}").unwrap();

        let items = expand_items(&[root], &["site".to_string()]).unwrap();
        let paths: Vec<&str> = items.iter().map(|i| i.item_path.as_str()).collect();
        assert_eq!(paths, vec!["site/css/main.css", "site/index.html"]);
    }
}
