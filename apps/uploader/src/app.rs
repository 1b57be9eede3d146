//! Command dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use corpus_client::{Client, Credentials};
use corpus_protocol::records::RecordMetadata;
use corpus_transfer::MediaSource;
use corpus_upload::{
    UploadError, UploadEvent, UploadJob, UploadOptions, UploadOrchestrator, infer_media_type,
    scan_media_files,
};
use tracing::{info, warn};

use crate::adapter::ClientAdapter;
use crate::cli::{Cli, Command, UploadArgs};
use crate::config::{self, Config, Settings};
use crate::progress::ProgressPrinter;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let settings = config.resolve(cli.base_url.as_deref(), config::process_env);

    match cli.command {
        Command::Login { phone, password } => {
            login(&settings, config, &config_path, &phone, &password).await
        }
        Command::Logout => logout(config, &config_path),
        Command::Whoami => whoami(&settings).await,
        Command::Upload(args) => upload(&settings, &config, args).await,
    }
}

async fn login(
    settings: &Settings,
    mut config: Config,
    config_path: &Path,
    phone: &str,
    password: &str,
) -> anyhow::Result<()> {
    let client = Client::new(&settings.base_url, &Credentials::Anonymous)?;
    let response = client.login(phone, password).await?;

    config.access_token = Some(response.access_token);
    config.save_to(config_path)?;
    info!(path = %config_path.display(), "access token saved");
    println!("Logged in as {phone}");
    Ok(())
}

fn logout(mut config: Config, config_path: &Path) -> anyhow::Result<()> {
    if config.access_token.take().is_none() {
        println!("Not logged in");
        return Ok(());
    }
    config.save_to(config_path)?;
    println!("Logged out");
    Ok(())
}

async fn whoami(settings: &Settings) -> anyhow::Result<()> {
    if settings.credentials.is_anonymous() {
        bail!("not logged in; run `corpus-uploader login` first");
    }
    let client = Client::new(&settings.base_url, &settings.credentials)?;
    let user = client.current_user().await?;
    if user.name.is_empty() {
        println!("{} ({})", user.phone, user.id);
    } else {
        println!("{} <{}> ({})", user.name, user.phone, user.id);
    }
    Ok(())
}

async fn upload(settings: &Settings, config: &Config, args: UploadArgs) -> anyhow::Result<()> {
    if settings.credentials.is_anonymous() {
        warn!("no access token configured; the server may reject the upload");
    }

    let language = args
        .language
        .clone()
        .or_else(|| config.language.clone())
        .context("--language is required (or set `language` in the config file)")?;
    let release_rights = args
        .release_rights
        .clone()
        .or_else(|| config.release_rights.clone())
        .context("--release-rights is required (or set `release_rights` in the config file)")?;

    let files = collect_files(&args.paths)?;

    let client = Client::new(&settings.base_url, &settings.credentials)?;
    let user_id = match &args.user_id {
        Some(id) => id.clone(),
        None => {
            client
                .current_user()
                .await
                .context("fetching the current user (pass --user-id to skip)")?
                .id
        }
    };

    let template = RecordMetadata {
        title: args.title.clone(),
        description: args.description.clone(),
        category_id: args.category_id.clone(),
        user_id,
        media_type: String::new(),
        latitude: args.latitude,
        longitude: args.longitude,
        release_rights,
        language,
        use_uid_filename: args.use_uid_filename.then_some(true),
    };

    let mut jobs = Vec::with_capacity(files.len());
    for path in &files {
        let source = MediaSource::from_path(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let metadata = job_metadata(&template, path, args.media_type.as_deref(), files.len() > 1)?;
        jobs.push(UploadJob { source, metadata });
    }

    let options = UploadOptions {
        chunk_size: args.chunk_size.unwrap_or(settings.chunk_size),
    };
    let mut orchestrator = UploadOrchestrator::new()
        .with_options(options)
        .with_concurrency(usize::from(args.jobs));

    let cancel = orchestrator.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling uploads");
            cancel.cancel();
        }
    });

    let printer = orchestrator.take_events().map(|mut events| {
        tokio::spawn(async move {
            let mut lines = ProgressPrinter::new();
            while let Some(event) = events.recv().await {
                match event {
                    UploadEvent::Progress(progress) => println!("{}", lines.line(&progress)),
                    UploadEvent::Completed { filename, uid } => {
                        lines.finish(&filename);
                        println!("[{filename}] done: {uid}");
                    }
                    UploadEvent::Failed { filename, error } => {
                        lines.finish(&filename);
                        println!("[{filename}] failed: {error}");
                    }
                }
            }
        })
    });

    let adapter = ClientAdapter::new(client);
    let outcomes = orchestrator.upload_all(&adapter, &adapter, jobs).await;

    // Dropping the orchestrator closes the event channel.
    drop(orchestrator);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    let mut failed = 0;
    let mut cancelled = false;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(record) => println!(
                "{}: uid={} status={} url={}",
                outcome.filename, record.uid, record.status, record.file_url
            ),
            Err(UploadError::Cancelled) => cancelled = true,
            Err(_) => failed += 1,
        }
    }

    if cancelled {
        bail!("upload cancelled");
    }
    if failed > 0 {
        bail!("{failed} of {} uploads failed", outcomes.len());
    }
    Ok(())
}

/// Expands directories into the media files they contain.
fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let found =
            scan_media_files(path).with_context(|| format!("scanning {}", path.display()))?;
        if found.is_empty() && path.is_file() {
            // An explicit file with an unknown extension still uploads;
            // --media-type must then be given.
            files.push(path.clone());
        } else {
            files.extend(found);
        }
    }
    if files.is_empty() {
        bail!("no media files found");
    }
    Ok(files)
}

/// Builds one file's metadata from the shared template.
fn job_metadata(
    template: &RecordMetadata,
    path: &Path,
    media_type: Option<&str>,
    batch: bool,
) -> anyhow::Result<RecordMetadata> {
    let media_type = match media_type {
        Some(m) => m.to_string(),
        None => infer_media_type(path)
            .with_context(|| {
                format!("cannot infer media type of {}; pass --media-type", path.display())
            })?
            .to_string(),
    };

    let title = match path.file_stem().map(|s| s.to_string_lossy()) {
        Some(stem) if batch => format!("{} - {stem}", template.title),
        _ => template.title.clone(),
    };

    Ok(RecordMetadata {
        title,
        media_type,
        ..template.clone()
    })
}
