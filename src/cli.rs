//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use library_core::fetch::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Resolve library catalog entries and download their files.
///
/// The API key for downloads is read from `LIBRARY_KEY`; the catalog host from
/// `LIBRARY_BASE_URL` unless `--base-url` is given.
#[derive(Parser, Debug)]
#[command(name = "library-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Catalog base URL (overrides LIBRARY_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, global = true, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show title, details and mirror links for a catalog entry
    Info {
        /// Catalog identifier (MD5 digest)
        md5: String,

        /// Print the details as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a catalog entry through the fast download API
    Download {
        /// Catalog identifier (MD5 digest)
        md5: String,

        /// Directory to save the file into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MD5: &str = "1065812d567369000ccc1e985e4cadc2";

    #[test]
    fn test_cli_info_parses_identifier() {
        let args = Args::try_parse_from(["library-dl", "info", MD5]).unwrap();
        match args.command {
            Command::Info { md5, json } => {
                assert_eq!(md5, MD5);
                assert!(!json);
            }
            other @ Command::Download { .. } => panic!("Expected Info, got {other:?}"),
        }
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_download_default_output_dir() {
        let args = Args::try_parse_from(["library-dl", "download", MD5]).unwrap();
        match args.command {
            Command::Download { output_dir, .. } => assert_eq!(output_dir, PathBuf::from(".")),
            other @ Command::Info { .. } => panic!("Expected Download, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_download_output_dir_flag() {
        let args =
            Args::try_parse_from(["library-dl", "download", MD5, "-o", "/tmp/books"]).unwrap();
        match args.command {
            Command::Download { output_dir, .. } => {
                assert_eq!(output_dir, PathBuf::from("/tmp/books"));
            }
            other @ Command::Info { .. } => panic!("Expected Download, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["library-dl", "-vv", "info", MD5]).unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["library-dl", "info", MD5, "--verbose"]).unwrap();
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_cli_global_overrides() {
        let args = Args::try_parse_from([
            "library-dl",
            "--base-url",
            "http://127.0.0.1:8080",
            "--connect-timeout",
            "5",
            "info",
            MD5,
            "--json",
        ])
        .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(args.connect_timeout, 5);
        assert_eq!(args.read_timeout, READ_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Args::try_parse_from(["library-dl"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_identifier() {
        let err = Args::try_parse_from(["library-dl", "download"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["library-dl", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_timeout_range_enforced() {
        let result = Args::try_parse_from(["library-dl", "--read-timeout", "0", "info", MD5]);
        assert!(result.is_err());
    }
}
