use std::path::PathBuf;
use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use intakeflow::config::{config_file_path, load_or_default, save, snapshot_dir, WizardConfig};

fn main() -> Result<()> {
    let args = CliArgs::parse()?;
    let config_path = config_file_path()?;
    let mut config = load_or_default()?;
    let mut changed = !config_path.exists();

    changed |= apply_overrides(&mut config, &args);

    let sessions = snapshot_dir(&config)?;
    fs::create_dir_all(&sessions)
        .with_context(|| format!("Failed to create snapshot directory {:?}", sessions))?;

    if changed {
        save(&config)?;
        println!("Wizard settings recorded at {}", config_path.display());
    } else {
        println!("Wizard settings already configured.");
    }
    println!("Session snapshots: {}", sessions.display());

    Ok(())
}

struct CliArgs {
    snapshot_dir: Option<PathBuf>,
    autosave: Option<bool>,
    infer_required: Option<bool>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut args = args.into_iter();
        let mut snapshot_dir = None;
        let mut autosave = None;
        let mut infer_required = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--snapshot-dir" => {
                    let value = args
                        .next()
                        .context("Expected a directory after --snapshot-dir")?;
                    snapshot_dir = Some(PathBuf::from(value));
                }
                "--no-autosave" => autosave = Some(false),
                "--autosave" => autosave = Some(true),
                "--infer-required" => infer_required = Some(true),
                "--no-infer-required" => infer_required = Some(false),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(Self {
            snapshot_dir,
            autosave,
            infer_required,
        })
    }
}

fn print_usage() {
    println!("IntakeFlow setup");
    println!("Writes config.toml and prepares the session snapshot directory.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --snapshot-dir <path>   Store session snapshots in <path>");
    println!("  --autosave | --no-autosave");
    println!("                          Toggle snapshot writes after every wizard event");
    println!("  --infer-required | --no-infer-required");
    println!("                          Toggle inferring answer counts from question text");
}

fn apply_overrides(config: &mut WizardConfig, args: &CliArgs) -> bool {
    let mut changed = false;
    if let Some(dir) = &args.snapshot_dir {
        if config.sessions.snapshot_dir.as_ref() != Some(dir) {
            config.sessions.snapshot_dir = Some(dir.clone());
            changed = true;
        }
    }
    if let Some(autosave) = args.autosave {
        changed |= config.sessions.autosave != autosave;
        config.sessions.autosave = autosave;
    }
    if let Some(infer) = args.infer_required {
        changed |= config.validation.infer_required_from_text != infer;
        config.validation.infer_required_from_text = infer;
    }
    changed
}
