use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use oxide_icon::{IconEngine, IconSize, load_config};

/// Save the icon the OS shows for a file or directory as a PNG.
#[derive(Debug, Parser)]
#[command(name = "oxide-icon", version)]
struct Cli {
    /// File or directory to look up
    path: PathBuf,

    /// Where to write the PNG (defaults to <name>.png here)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine configuration file
    #[arg(short, long, default_value = "icon-engine.json")]
    config: PathBuf,

    /// Requested resolution: small, large, extra-large or jumbo
    #[arg(short, long, value_parser = parse_size)]
    size: Option<IconSize>,
}

fn parse_size(name: &str) -> std::result::Result<IconSize, String> {
    IconSize::from_name(name).ok_or_else(|| format!("unknown icon size '{name}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    if let Some(size) = cli.size {
        config.icon_size = size;
    }

    let engine = IconEngine::new(&config)?;

    let Some(pixels) = engine.icon_pixels(&cli.path) else {
        eprintln!("Icon FAIL: '{}'", cli.path.display());
        bail!("no icon available for {}", cli.path.display());
    };
    println!(
        "Icon OK: '{}' ({}x{})",
        cli.path.display(),
        pixels.width(),
        pixels.height()
    );

    let output = cli.output.unwrap_or_else(|| {
        let stem = cli
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("icon");
        PathBuf::from(format!("{stem}.png"))
    });

    let png = pixels.encode_png()?;
    std::fs::write(&output, png)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());

    Ok(())
}
