//! Jenkins Fingerprint CLI
//!
//! Entry point for the `jenkins-fingerprint` command-line tool.

use clap::{Parser, Subcommand};
use jenkins_api_types::fingerprint_of_file;
use jenkins_fingerprint::{
    verify_download, ArtifactCheck, ClientConfig, ConfigOverrides, Jenkins, Verified,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jenkins-fingerprint")]
#[command(about = "Check artifacts against Jenkins fingerprint records", version)]
struct Cli {
    /// Path to config file (default: ~/.config/jenkins-fingerprint/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Jenkins root URL (overrides JENKINS_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// User for basic auth (overrides JENKINS_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fingerprint (MD5) of a local file
    Hash {
        path: PathBuf,
    },

    /// Fail unless the server's record for a fingerprint is usable
    Validate {
        hash: String,
    },

    /// Show which build produced a fingerprint
    Info {
        hash: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check a fingerprint against a job and build
    Check {
        hash: String,

        /// File name the artifact was archived under
        #[arg(long)]
        file: String,

        /// Full job name
        #[arg(long)]
        job: String,

        /// Build number
        #[arg(long)]
        build: u64,
    },

    /// Hash a downloaded artifact and check it against a job and build
    Verify {
        path: PathBuf,

        /// Full job name
        #[arg(long)]
        job: String,

        /// Build number
        #[arg(long)]
        build: u64,

        /// Archived file name (default: the local file name)
        #[arg(long)]
        file_name: Option<String>,

        /// Reject fingerprints the server does not track
        #[arg(long)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Hash { path } => run_hash(path),
        Commands::Validate { hash } => {
            let (_, jenkins) = connect(&cli);
            run_validate(&jenkins, hash);
        }
        Commands::Info { hash, json } => {
            let (_, jenkins) = connect(&cli);
            run_info(&jenkins, hash, *json);
        }
        Commands::Check {
            hash,
            file,
            job,
            build,
        } => {
            let (_, jenkins) = connect(&cli);
            run_check(&jenkins, hash, file, job, *build);
        }
        Commands::Verify {
            path,
            job,
            build,
            file_name,
            ..
        } => {
            let (config, jenkins) = connect(&cli);
            let mut check =
                ArtifactCheck::new(job.clone(), *build).strict(config.strict_validation);
            if let Some(name) = file_name {
                check = check.with_file_name(name.clone());
            }
            run_verify(&jenkins, path, &check);
        }
    }
}

fn connect(cli: &Cli) -> (ClientConfig, Jenkins) {
    let config = match load_config(cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(2);
        }
    };
    tracing::debug!(?config, "resolved configuration");

    match Jenkins::from_config(&config) {
        Ok(jenkins) => (config, jenkins),
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            process::exit(3);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, jenkins_fingerprint::ConfigError> {
    let overrides = ConfigOverrides {
        base_url: cli.url.clone(),
        username: cli.user.clone(),
        timeout_seconds: cli.timeout,
        // Without --strict the file setting stands.
        strict_validation: match cli.command {
            Commands::Verify { strict: true, .. } => Some(true),
            _ => None,
        },
        ..ConfigOverrides::default()
    };
    ClientConfig::load(cli.config.as_deref(), &overrides)
}

fn run_hash(path: &Path) {
    match fingerprint_of_file(path) {
        Ok(id) => println!("{}", id),
        Err(e) => {
            eprintln!("Error hashing {}: {}", path.display(), e);
            process::exit(2);
        }
    }
}

fn run_validate(jenkins: &Jenkins, hash: &str) {
    if let Err(e) = jenkins.validate_fingerprint(hash) {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
    println!("{}: valid", hash);
}

fn run_info(jenkins: &Jenkins, hash: &str, json_output: bool) {
    let info = match jenkins.get_artifact_data(hash) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Job:   {}", info.job_name);
        println!("Build: {}", info.build_number);
        println!("File:  {}", info.file_name);
    }
}

fn run_check(jenkins: &Jenkins, hash: &str, file: &str, job: &str, build: u64) {
    match jenkins.validate_fingerprint_for_build(hash, file, job, build) {
        Ok(true) => println!("{}: matches {} #{}", hash, job, build),
        Ok(false) => {
            println!("{}: does not match {} #{}", hash, job, build);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run_verify(jenkins: &Jenkins, path: &Path, check: &ArtifactCheck) {
    match verify_download(jenkins, path, check) {
        Ok(Verified::Confirmed { id }) => {
            println!("{}: {} verified against {} #{}", path.display(), id, check.job, check.build)
        }
        Ok(Verified::Untracked { id }) => println!(
            "{}: {} not tracked by Jenkins; accepted without confirmation",
            path.display(),
            id
        ),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    }
}
