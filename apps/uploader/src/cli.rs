//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload recordings to the media corpus in chunks")]
pub struct Cli {
    /// Config file (defaults to the per-user config location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides CORPUS_API_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and save the access token
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the saved access token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Upload media files or directories
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Files or directories to upload
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub category_id: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Owner of the records (defaults to the logged-in user)
    #[arg(long)]
    pub user_id: Option<String>,

    /// video, audio or image (inferred from the extension when omitted)
    #[arg(long)]
    pub media_type: Option<String>,

    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    #[arg(long)]
    pub release_rights: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    /// Ask the server to store the file under the record uid
    #[arg(long)]
    pub use_uid_filename: bool,

    /// Bytes per chunk
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,

    /// Files uploaded at the same time
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=8))]
    pub jobs: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_upload() {
        let cli = Cli::try_parse_from([
            "corpus-uploader",
            "--base-url",
            "http://api.local",
            "upload",
            "a.mp4",
            "clips/",
            "--title",
            "Greeting",
            "--category-id",
            "cat-1",
            "--latitude",
            "-33.9",
            "--longitude",
            "18.4",
            "--chunk-size",
            "4096",
            "--use-uid-filename",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://api.local"));
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(args.paths, vec![PathBuf::from("a.mp4"), PathBuf::from("clips/")]);
        assert_eq!(args.latitude, Some(-33.9));
        assert_eq!(args.longitude, Some(18.4));
        assert_eq!(args.chunk_size, Some(4096));
        assert!(args.use_uid_filename);
        assert_eq!(args.jobs, 1);
        assert!(args.user_id.is_none());
    }

    #[test]
    fn latitude_requires_longitude() {
        let result = Cli::try_parse_from([
            "corpus-uploader",
            "upload",
            "a.mp4",
            "--title",
            "t",
            "--category-id",
            "c",
            "--latitude",
            "1.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let result = Cli::try_parse_from([
            "corpus-uploader",
            "upload",
            "a.mp4",
            "--title",
            "t",
            "--category-id",
            "c",
            "--chunk-size",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn upload_requires_a_path() {
        let result =
            Cli::try_parse_from(["corpus-uploader", "upload", "--title", "t", "--category-id", "c"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_login() {
        let cli = Cli::try_parse_from([
            "corpus-uploader",
            "login",
            "--phone",
            "+911234567890",
            "--password",
            "secret",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Login { ref phone, .. } if phone == "+911234567890"));
    }
}
