use anyhow::Result;
use cdn_image_mirror::mirror::{MediaMirror, SaveResult};
use cdn_image_mirror::models::{absolute_path, Config};
use cdn_image_mirror::provider::{ImageProvider, RemoteImageProvider, UrlOptions};
use cdn_image_mirror::{Dimensions, Image, Quality, Transformation};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cdn-image-mirror")]
#[command(about = "Mirror media to an image CDN and build transformed image URLs")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a local image under its derived identifier.
    Upload { path: String },
    /// Remove an image's remote copy.
    Delete { path: String },
    /// Print the delivery URL for an image name.
    Url {
        name: String,
        /// Extra query option, repeatable.
        #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Print the URL of a transformed variant.
    Transform {
        path: String,
        #[arg(long, value_name = "WxH", value_parser = parse_dimensions)]
        dimensions: Option<Dimensions>,
        #[arg(long, value_parser = parse_quality)]
        quality: Option<Quality>,
        #[arg(long)]
        crop: Option<String>,
        #[arg(long)]
        no_optimise: bool,
    },
    /// Run the post-save hook for a file the media pipeline just stored.
    Mirror { dir: String, file: String },
}

fn parse_option(input: &str) -> std::result::Result<(String, String), String> {
    input
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("Invalid option '{}'. Expected format: KEY=VALUE", input))
}

fn parse_dimensions(input: &str) -> std::result::Result<Dimensions, String> {
    input.parse().map_err(|e: cdn_image_mirror::Error| e.to_string())
}

fn parse_quality(input: &str) -> std::result::Result<Quality, String> {
    Quality::from_string(input).map_err(|e| e.to_string())
}

async fn run(command: Command, config: Config) -> Result<()> {
    let provider = RemoteImageProvider::from_config(&config)?;

    match command {
        Command::Upload { path } => provider.upload(&Image::from_path(path)?).await?,
        Command::Delete { path } => provider.delete_image(&Image::from_path(path)?).await?,
        Command::Url { name, options } => {
            let options: UrlOptions = options.into_iter().collect();
            println!("{}", provider.get_image_url_by_name(&name, &options)?);
        }
        Command::Transform {
            path,
            dimensions,
            quality,
            crop,
            no_optimise,
        } => {
            let mut transformation = Transformation::builder();
            if let Some(dimensions) = dimensions {
                transformation = transformation.with_dimensions(dimensions);
            }
            if let Some(quality) = quality {
                transformation = transformation.with_quality(quality);
            }
            if let Some(crop) = crop {
                transformation = transformation.with_crop(crop);
            }
            if no_optimise {
                transformation = transformation.with_optimisation_disabled();
            }

            let image = provider.transform_image(&Image::from_path(path)?, &transformation)?;
            println!("{}", image);
        }
        Command::Mirror { dir, file } => {
            let mirror = MediaMirror::new(Box::new(provider), config.media_root.clone());
            let result = SaveResult {
                path: absolute_path(&dir)?,
                file,
            };
            mirror.after_save(result).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cdn_image_mirror=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Using cloud {}", config.cloud);

    match run(args.command, config).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_valid() {
        assert_eq!(
            parse_option("effect=sepia").unwrap(),
            ("effect".to_string(), "sepia".to_string())
        );
    }

    #[test]
    fn test_parse_option_invalid() {
        let err = parse_option("sepia").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
        assert!(parse_option("=sepia").is_err());
    }

    #[test]
    fn test_parse_dimensions_arg() {
        let dimensions = parse_dimensions("100x200").unwrap();
        assert_eq!(dimensions.width(), 100);
        assert!(parse_dimensions("100").is_err());
    }

    #[test]
    fn test_parse_quality_arg() {
        assert_eq!(parse_quality("80").unwrap().to_string(), "80");
        assert!(parse_quality("high").is_err());
    }

    #[test]
    fn test_cli_parses_transform() {
        let args = CliArgs::try_parse_from([
            "cdn-image-mirror",
            "transform",
            "media/dog.png",
            "--dimensions",
            "50x75",
            "--no-optimise",
        ])
        .unwrap();

        match args.command {
            Command::Transform {
                dimensions,
                no_optimise,
                ..
            } => {
                assert_eq!(dimensions.unwrap().height(), 75);
                assert!(no_optimise);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
