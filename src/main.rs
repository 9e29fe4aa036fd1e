use clap::{Parser, Subcommand};
use image_list::config::{self, ManifestConfig, ManifestMode};
use image_list::manifest::{self, Manifest};
use image_list::{logging, output, placeholder, writer};
use log::{error, warn};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "image-list")]
#[command(about = "Generate the image manifest for a static quiz site")]
#[command(long_about = "\
Generate the image manifest for a static quiz site

Every directory under the scan root is a category. Images in it are the
category's questions; images in its answer/ sub-directory are the answers,
paired with questions by file name.

Project structure:

  site/
  ├── image-list.toml              # Build config (optional)
  ├── images/
  │   ├── default.jpg              # Placeholder (README.txt written if missing)
  │   └── game/                    # Scan root
  │       ├── cover.png            # Category \".\"
  │       └── people/
  │           └── photo/           # Category \"people/photo\"
  │               ├── 001.jpg      # Question
  │               ├── 002.jpg
  │               └── answer/
  │                   └── 001.jpg  # Answer \"001\"
  └── js/
      └── image-list.json          # Output

Supported formats: .jpg .jpeg .png .gif .webp

For GitHub Pages project sites (https://<user>.github.io/<repo>), pass
--repo <repo> so every URL starts with /<repo>/.

Run 'image-list gen-config' to print a documented image-list.toml.")]
#[command(version)]
struct Cli {
    /// Project directory; relative paths are resolved against it
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Config file (default: <project-dir>/image-list.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory to scan for images
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Manifest output file
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Directory stripped from image paths to form URLs
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// GitHub Pages repository name, prefixed to every URL
    #[arg(long = "repo", value_name = "NAME", global = true)]
    repo: Option<String>,

    /// Emit category → [url] lists without question/answer split
    #[arg(long, global = true)]
    flat: bool,

    /// Keep filesystem order instead of sorting question lists
    #[arg(long, global = true)]
    no_sort: bool,

    /// Skip reading the manifest back after writing
    #[arg(long, global = true)]
    no_validate: bool,

    /// Skip creating the placeholder directory and README
    #[arg(long, global = true)]
    no_placeholder: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Scan the image tree and write the manifest (default)
    Build,
    /// Scan and report without writing anything
    Check,
    /// Print a stock image-list.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let config = resolve_config(cli)?;
            if !cli.quiet {
                output::print_deploy_info(config.repository_name());
            }

            if config.placeholder.enabled {
                let status = placeholder::ensure_placeholder(&config.placeholder.dir)?;
                if !cli.quiet {
                    output::print_placeholder_status(&config.placeholder.dir, &status);
                }
            }

            if !cli.quiet {
                println!("==> Scanning {}", config.root_dir.display());
            }
            let manifest = build(&config)?;
            writer::write_manifest(&manifest, &config.output_file)?;
            if !cli.quiet {
                output::print_build_output(&manifest, Some(&config.output_file));
            }

            if config.output.validate {
                match writer::verify_manifest_file(&config.output_file) {
                    Ok(_) if !cli.quiet => println!("==> Manifest is valid JSON"),
                    Ok(_) => {}
                    Err(e) => warn!("Manifest validation failed: {e}"),
                }
            }
        }
        Command::Check => {
            let config = resolve_config(cli)?;
            if !cli.quiet {
                println!("==> Checking {}", config.root_dir.display());
            }
            let manifest = build(&config)?;
            if !cli.quiet {
                output::print_build_output(&manifest, None);
                println!("==> Content is valid");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, apply command-line overrides, and anchor paths at
/// the project directory.
fn resolve_config(cli: &Cli) -> Result<ManifestConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.project_dir, cli.config.as_deref())?;

    if let Some(root) = &cli.root {
        config.root_dir = root.clone();
    }
    if let Some(output) = &cli.output {
        config.output_file = output.clone();
    }
    if let Some(base) = &cli.base {
        config.base_path = base.clone();
    }
    if let Some(repo) = &cli.repo {
        config.repository_name = Some(repo.clone());
    }
    if cli.flat {
        config.output.mode = ManifestMode::Flat;
    }
    if cli.no_sort {
        config.output.sort = false;
    }
    if cli.no_validate {
        config.output.validate = false;
    }
    if cli.no_placeholder {
        config.placeholder.enabled = false;
    }

    config.validate()?;
    Ok(config.anchored(&cli.project_dir))
}

/// Build the manifest, labelling root and base problems as configuration
/// errors.
fn build(config: &ManifestConfig) -> Result<Manifest, Box<dyn std::error::Error>> {
    match manifest::build_manifest(config) {
        Ok(manifest) => Ok(manifest),
        Err(e) if e.is_config_error() => Err(format!("Configuration error: {e}").into()),
        Err(e) => Err(e.into()),
    }
}
