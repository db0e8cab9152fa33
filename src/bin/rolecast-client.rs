// src/bin/rolecast-client.rs
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rolecast::client::{self, CaptureSession, Submitter, session::load_upload, watermark};
use rolecast::config::ClientConfig;
use rolecast::models::Role;

#[derive(Parser, Debug)]
#[command(name = "rolecast-client", version)]
struct Cli {
    /// Portrait to transform (JPG, PNG, WEBP or HEIC).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Persona: journalist, blogger or photographer.
    #[arg(long, value_parser = parse_role)]
    role: Option<Role>,

    /// Base URL of the generation proxy. Falls back to ROLECAST_API_BASE.
    #[arg(long)]
    api_base: Option<String>,

    /// Logo path or http(s) URL. Falls back to ROLECAST_LOGO, then the bundled logo.
    #[arg(long)]
    logo: Option<String>,

    /// Directory the `image-<role>.png` file is written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Also print the result as a `data:` URL.
    #[arg(long)]
    print_data_url: bool,
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::parse(value).ok_or_else(|| {
        format!(
            "unknown role {:?}, expected one of: {}",
            value,
            Role::ALL.map(|r| r.as_str()).join(", ")
        )
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_base) = cli.api_base {
        config = config.with_api_base(api_base);
    }
    if let Some(logo) = cli.logo {
        config = config.with_logo(logo);
    }

    let upload = match cli.image.as_deref() {
        Some(path) => Some(load_upload(path)?),
        None => None,
    };

    let mut session = CaptureSession::new().set_image(upload);
    if let Some(role) = cli.role {
        session = session.set_role(role);
    }

    let http = reqwest::Client::new();
    let logo = watermark::resolve_logo(&http, config.logo.as_deref()).await;

    let submitter = Submitter::new(&config);
    let session = client::generate(session, &submitter, logo.as_deref()).await;

    if let Some(error) = session.error() {
        anyhow::bail!("{}", error);
    }
    let result = session
        .result()
        .context("generation finished without a result")?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;
    let target = cli.out.join(result.download_name());
    std::fs::write(&target, &result.png)
        .with_context(|| format!("failed to write {}", target.display()))?;
    log::info!("Saved {}", target.display());

    if cli.print_data_url {
        println!("{}", result.data_url());
    } else {
        println!("{}", target.display());
    }
    Ok(())
}
