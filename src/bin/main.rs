use std::{error::Error, fs, path::Path};

use tracing::info;
use tracing_subscriber::EnvFilter;

use supervisorgen::{
    cli::{Cli, Commands, Selection, parse_args},
    error::ConfigError,
    manifest::{Manifest, load_manifest},
};

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args();
    init_logging(&args);

    match args.command {
        Commands::Render {
            config,
            selection,
            output,
        } => {
            let manifest = load_manifest(config.as_deref())?;
            let rendered = render_selection(&manifest, &selection)?;
            match output {
                Some(path) => write_output(Path::new(&path), &rendered)?,
                None => print!("{rendered}"),
            }
        }
        Commands::List { config, json } => {
            let manifest = load_manifest(config.as_deref())?;
            let summary = manifest.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for program in &summary.programs {
                    let groups = if program.groups.is_empty() {
                        "-".to_string()
                    } else {
                        program.groups.join(",")
                    };
                    println!(
                        "{:<24} {:<12} {:<32} {}",
                        program.name, program.user, program.root, groups
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_logging(args: &Cli) {
    let filter = if let Some(level) = args.log_level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn render_selection(
    manifest: &Manifest,
    selection: &Selection,
) -> Result<String, ConfigError> {
    match (&selection.program, &selection.group) {
        (Some(program), _) => manifest.program(program)?.render(),
        (None, Some(group)) => manifest.group(group)?.render(),
        (None, None) => manifest.render_all(),
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let to_error = |source| ConfigError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, contents).map_err(to_error)?;

    info!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}
