use anyhow::Context;
use clap::{Parser, Subcommand};
use readmegen::platform::{ingest_image, GithubProfileLookup, NoopProfileLookup, UploadSlot};
use readmegen::{Descriptor, Patch, PreviewConfig, Session, ViewMode, Viewport};
use std::path::{Path, PathBuf};

const MIN_WIDTH: i64 = 160;
const MAX_WIDTH: i64 = 16384;

#[derive(Parser)]
#[command(name = "readmegen")]
#[command(about = "Generate, preview and export a project README")]
struct Cli {
    /// Descriptor JSON file; the sample project is used when omitted
    #[arg(long, short, global = true)]
    descriptor: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the sample descriptor to a file
    Init { path: PathBuf },
    /// Print the generated markup
    Generate,
    /// Print the rendered preview (or the raw markup with --raw)
    Preview {
        #[arg(long)]
        raw: bool,
        /// Preview width in pixels
        #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(MIN_WIDTH..=MAX_WIDTH))]
        width: u32,
    },
    /// Write README.md
    Export {
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
    /// Look up the author's avatar and use it as the logo
    FetchAvatar {
        /// Overrides the descriptor's author handle
        #[arg(long)]
        handle: Option<String>,
        /// Profile API base URL
        #[arg(long, default_value = readmegen::DEFAULT_API_BASE)]
        api_base: String,
        /// Write the updated descriptor back to --descriptor
        #[arg(long)]
        save: bool,
    },
    /// Inline an image file as the logo or as a new screenshot
    AddImage {
        #[arg(long, value_enum)]
        slot: UploadSlot,
        path: PathBuf,
        #[arg(long)]
        save: bool,
    },
}

fn load_descriptor(path: Option<&Path>) -> anyhow::Result<Descriptor> {
    match path {
        Some(p) => Descriptor::load(p).with_context(|| format!("reading {}", p.display())),
        None => Ok(Descriptor::sample()),
    }
}

fn save_descriptor(path: Option<&Path>, descriptor: &Descriptor) -> anyhow::Result<()> {
    let p = path.context("--save needs --descriptor")?;
    descriptor
        .save(p)
        .with_context(|| format!("writing {}", p.display()))?;
    log::info!("saved descriptor to {}", p.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let descriptor_path = cli.descriptor.as_deref();

    match cli.command {
        Commands::Init { path } => {
            Descriptor::sample()
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
        }
        Commands::Generate => {
            let descriptor = load_descriptor(descriptor_path)?;
            print!("{}", readmegen::generate(&descriptor));
        }
        Commands::Preview { raw, width } => {
            let descriptor = load_descriptor(descriptor_path)?;
            let config = PreviewConfig {
                viewport: Viewport {
                    width,
                    ..Viewport::default()
                },
                ..Default::default()
            };
            let mut session = Session::new(descriptor, config, NoopProfileLookup);
            if raw {
                session.view_mut().set_mode(ViewMode::Raw);
            }
            println!("{}", session.present().as_text());
        }
        Commands::Export { out } => {
            let descriptor = load_descriptor(descriptor_path)?;
            let session = Session::new(descriptor, PreviewConfig::default(), NoopProfileLookup);
            let report = session.export(&out)?;
            println!("{} ({} bytes)", report.path.display(), report.bytes);
        }
        Commands::FetchAvatar {
            handle,
            api_base,
            save,
        } => {
            let descriptor = load_descriptor(descriptor_path)?;
            let config = PreviewConfig {
                api_base,
                ..Default::default()
            };
            let lookup = GithubProfileLookup::new(&config)?;
            let mut session = Session::new(descriptor, config, lookup);
            if let Some(h) = handle {
                session.apply(Patch::SetAuthorHandle(h));
            }
            if !session.spawn_profile_lookup() {
                anyhow::bail!("no author handle to look up");
            }
            session.settle().await;
            println!("{}", session.descriptor().logo_ref);
            if save {
                save_descriptor(descriptor_path, session.descriptor())?;
            }
        }
        Commands::AddImage { slot, path, save } => {
            let descriptor = load_descriptor(descriptor_path)?;
            let patch = ingest_image(&path, slot)
                .await
                .with_context(|| format!("reading image {}", path.display()))?;
            let mut session = Session::new(descriptor, PreviewConfig::default(), NoopProfileLookup);
            session.apply(patch);
            let d = session.descriptor();
            println!(
                "logo: {} byte(s), screenshots: {}",
                d.logo_ref.len(),
                d.screenshots.len()
            );
            if save {
                save_descriptor(descriptor_path, d)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("readmegen").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn init_ignores_missing_descriptor_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("new.json");
        let out = dir.path().join("out.json");
        let args = ["-d", missing.to_str().unwrap(), "init", out.to_str().unwrap()];

        run(cli(&args)).await.unwrap();
        assert_eq!(Descriptor::load(&out).unwrap(), Descriptor::sample());
    }

    #[tokio::test]
    async fn generate_reports_missing_descriptor_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("new.json");
        let args = ["-d", missing.to_str().unwrap(), "generate"];
        assert!(run(cli(&args)).await.is_err());
    }

    #[test]
    fn preview_width_is_bounded() {
        let parse = |w: &str| Cli::try_parse_from(["readmegen", "preview", "--width", w]);
        assert!(parse("1280").is_ok());
        assert!(parse("500000000").is_err());
        assert!(parse("0").is_err());
    }
}
