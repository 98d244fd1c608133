//! quail-export - model conversion tool
//!
//! Loads parsed model dumps (JSON), runs them through the conversion
//! pipeline and reports what was produced.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use quail_export::{
    Animation, ConvertedModel, DirSource, ExportConfig, Model, animation, convert_model,
    load_config, texture,
};

#[derive(Parser)]
#[command(name = "quail-export")]
#[command(about = "Converts parsed models into renderer-ready geometry, textures, skeletons and clips")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert models from a parsed model dump
    Convert {
        /// Model dump (JSON object or array of objects)
        input: PathBuf,

        /// Directory textures are fetched from (default: next to the input)
        #[arg(short, long)]
        textures: Option<PathBuf>,

        /// Path to a quail-export.toml config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write every decoded material texture as PNG into this directory
        #[arg(short, long)]
        dump: Option<PathBuf>,
    },

    /// Decode a single texture file
    Texture {
        /// Input DDS/PNG/BMP file
        input: PathBuf,
    },

    /// Build animation clips for the skinned models of a dump
    Animations {
        /// Model dump (JSON object or array of objects)
        input: PathBuf,

        /// Animation dump (JSON array)
        animations: PathBuf,

        /// Directory textures are fetched from (default: next to the input)
        #[arg(short, long)]
        textures: Option<PathBuf>,

        /// Path to a quail-export.toml config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// A dump holds one model or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ModelFile {
    Many(Vec<Model>),
    One(Model),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            textures,
            config,
            dump,
        } => {
            let config = read_config(config.as_deref())?;
            let converted = convert_dump(&input, textures.as_deref(), &config)?;
            if let Some(dir) = dump {
                dump_textures(&converted, &dir)?;
            }
            tracing::info!("Done!");
        }

        Commands::Texture { input } => {
            let data =
                std::fs::read(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let name = input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let image = texture::decode(name, &data)?;
            if image.is_fallback() {
                tracing::warn!("{:?} could not be decoded, fallback image used", input);
            } else {
                tracing::info!("{:?}: {}x{} RGBA8", input, image.width(), image.height());
            }
        }

        Commands::Animations {
            input,
            animations,
            textures,
            config,
        } => {
            let config = read_config(config.as_deref())?;
            let converted = convert_dump(&input, textures.as_deref(), &config)?;
            let instances: Vec<_> = converted
                .into_iter()
                .filter_map(|(_, model)| model.into_skinned())
                .collect();
            if instances.is_empty() {
                bail!("No skinned models in {:?}", input);
            }

            let json = std::fs::read_to_string(&animations)
                .with_context(|| format!("Failed to read animations: {:?}", animations))?;
            let entries = Animation::list_from_json(&json)
                .with_context(|| format!("Invalid animation dump: {:?}", animations))?;

            let policy = animation::policy_for(config.animation.targets);
            let clips = animation::build_with(&entries, &instances, policy);

            tracing::info!(
                "{} clips from {} animations for {} skinned models:",
                clips.len(),
                entries.len(),
                instances.len()
            );
            for clip in &clips {
                tracing::info!(
                    "  '{}' bone '{}' -> '{}': {} keys",
                    clip.name,
                    clip.track,
                    instances[clip.target].name,
                    clip.key_count()
                );
            }
        }
    }

    Ok(())
}

fn read_config(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ExportConfig::default()),
    }
}

/// Convert every model of a dump, keeping each one's position in the dump.
/// A model that fails is reported and skipped.
fn convert_dump(
    input: &Path,
    textures: Option<&Path>,
    config: &ExportConfig,
) -> Result<Vec<(usize, ConvertedModel)>> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read model dump: {:?}", input))?;
    let models = match serde_json::from_str::<ModelFile>(&json)
        .with_context(|| format!("Invalid model dump: {:?}", input))?
    {
        ModelFile::Many(models) => models,
        ModelFile::One(model) => vec![model],
    };

    let texture_dir = match textures {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };
    let source = DirSource::new(texture_dir);

    let mut converted = Vec::with_capacity(models.len());
    for (index, model) in models.iter().enumerate() {
        match convert_model(model, &source, config) {
            Ok(result) => converted.push((index, result)),
            Err(e) => tracing::error!("Skipping model: {}", e),
        }
    }

    tracing::info!(
        "Converted {} of {} models from {:?}",
        converted.len(),
        models.len(),
        input
    );
    Ok(converted)
}

/// Write decoded textures as `<dump index>_<model>_<slot>_<material>.png`.
fn dump_textures(models: &[(usize, ConvertedModel)], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    for (index, model) in models {
        for material in model.materials.iter() {
            let Some(image) = &material.texture else {
                continue;
            };
            let path = dir.join(format!(
                "{}_{}_{}_{}.png",
                index,
                sanitize(&model.name),
                material.slot,
                sanitize(&material.name)
            ));
            image
                .as_image()
                .save(&path)
                .with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
    }
    Ok(())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
