use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use garment_recolor::{
    ColorSettings, LogoBox, RecolorError, RecolorJob, RecolorRecipe, Recolorer,
};
use tracing_subscriber::EnvFilter;

/// Recolor a garment template region by region.
#[derive(Parser, Debug)]
#[command(name = "garment-recolor", version)]
struct Cli {
    /// Template image (PNG or any raster format).
    #[arg(long)]
    template: PathBuf,

    /// Body silhouette mask (raster or SVG; black = editable).
    #[arg(long)]
    body: PathBuf,

    /// Sleeves silhouette mask.
    #[arg(long)]
    sleeves: PathBuf,

    /// Trims silhouette mask. Only used together with a tertiary color.
    #[arg(long)]
    trims: Option<PathBuf>,

    /// Recipe JSON with colors, logo boxes and guard settings.
    #[arg(long, conflicts_with_all = ["primary", "secondary", "tertiary"])]
    recipe: Option<PathBuf>,

    /// Body color as #RRGGBB.
    #[arg(long, required_unless_present = "recipe")]
    primary: Option<String>,

    /// Sleeves color as #RRGGBB.
    #[arg(long, required_unless_present = "recipe")]
    secondary: Option<String>,

    /// Trims color as #RRGGBB.
    #[arg(long)]
    tertiary: Option<String>,

    /// Protected rectangle as x,y,w,h. Repeatable.
    #[arg(long = "logo", value_parser = parse_logo_box)]
    logos: Vec<LogoBox>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Write the quality report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let recipe = load_recipe(&cli)?;
    let recolorer = Recolorer::from_recipe(&recipe).context("invalid colors")?;

    let template = read(&cli.template)?;
    let body = read(&cli.body)?;
    let sleeves = read(&cli.sleeves)?;
    let trims = cli.trims.as_deref().map(read).transpose()?;

    let mut job = RecolorJob::new(&template, &body, &sleeves);
    if let Some(trims) = trims.as_deref() {
        job = job.with_trims(trims);
    }

    let output = match recolorer.recolor(&job) {
        Ok(output) => output,
        Err(err @ RecolorError::GeometryChanged(_)) => {
            return Err(err).context("recolor discarded, silhouette moved");
        }
        Err(err) => return Err(err).context("recolor failed"),
    };

    if let Some(parent) = cli.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&cli.out, &output.png)
        .with_context(|| format!("write png '{}'", cli.out.display()))?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&output.report).context("serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn load_recipe(cli: &Cli) -> anyhow::Result<RecolorRecipe> {
    let mut recipe = match &cli.recipe {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read recipe '{}'", path.display()))?;
            RecolorRecipe::from_json(&json).with_context(|| "parse recipe JSON")?
        }
        None => {
            let (Some(primary), Some(secondary)) = (&cli.primary, &cli.secondary) else {
                anyhow::bail!("--primary and --secondary are required without --recipe");
            };
            let mut colors = ColorSettings::new(primary, secondary);
            colors.tertiary = cli.tertiary.clone();
            RecolorRecipe::new(colors)
        }
    };
    recipe.logo_boxes.extend(cli.logos.iter().copied());
    Ok(recipe)
}

fn parse_logo_box(s: &str) -> Result<LogoBox, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid logo box '{s}': {e}"))?;
    match parts.as_slice() {
        &[x, y, w, h] => Ok(LogoBox::new(x, y, w, h)),
        _ => Err(format!("logo box '{s}' must be x,y,w,h")),
    }
}
