use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use chroma_palette::{
    Color, EngineConfig, Palette, PaletteAssembler, PaletteSource, PixelBuffer, derive_rule,
    recolor_image,
};

/// Build color palettes from images or harmony schemes and print them as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image paths to extract dominant colors from
    inputs: Vec<PathBuf>,

    /// Number of clusters for extraction
    #[arg(short = 'k', long, default_value_t = 6)]
    n_colors: usize,

    /// Number of colors in the output palette (defaults to k, or the
    /// scheme's natural size)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Base color for harmony generation, e.g. "#3366CC"
    #[arg(short, long)]
    base: Option<String>,

    /// Harmony scheme name, e.g. "split-complementary"
    #[arg(short, long, default_value = "Complementary")]
    scheme: String,

    /// Also derive a harmony rule from each image
    #[arg(long)]
    derive: bool,

    /// Keep near-white and near-black pixels
    #[arg(long)]
    no_filter: bool,

    /// Override the k-means seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// JSON engine configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write a copy of each image recolored with its palette
    #[arg(long)]
    recolor: bool,

    /// Comma-separated hex colors to recolor with instead of the extracted palette
    #[arg(long)]
    palette: Option<String>,

    /// Output directory for recolored images
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "recolored_")]
    prefix: String,
}

fn recolored_path(args: &Args, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match &args.out_dir {
        Some(dir) => dir.join(format!("{stem}.png")),
        None => input.with_file_name(format!("{}{stem}.png", args.prefix)),
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json_str(&text).context("invalid config")?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.extraction.seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let assembler = PaletteAssembler::new(&config)?;

    if args.inputs.is_empty() && args.base.is_none() {
        bail!("nothing to do: pass image paths or --base");
    }

    if let Some(hex) = &args.base {
        let base = Color::from_hex(hex)?;
        let scheme = args.scheme.parse::<chroma_palette::HarmonyScheme>()?;
        let count = args.count.unwrap_or_else(|| scheme.natural_len());
        let source = PaletteSource::Scheme {
            base,
            scheme: args.scheme.clone(),
        };
        let out = assembler.assemble(&source, count)?;
        let report = json!({
            "base": base,
            "scheme": scheme.name(),
            "palette": out.palette,
            "shortfall": out.shortfall(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let fixed_palette = match &args.palette {
        Some(list) => {
            let hexes: Vec<&str> = list.split(',').map(str::trim).collect();
            Some(Palette::from_hex_list(&hexes).context("invalid --palette")?)
        }
        None => None,
    };

    for input in &args.inputs {
        let img = image::open(input).with_context(|| format!("decoding {}", input.display()))?;
        let pixels = PixelBuffer::from_image(&img)?;
        let clusters = assembler
            .extractor()
            .extract(&pixels, args.n_colors, !args.no_filter)
            .with_context(|| format!("extracting from {}", input.display()))?;
        let out = assembler.assemble(
            &PaletteSource::Clusters(&clusters),
            args.count.unwrap_or(args.n_colors),
        )?;

        let mut report = json!({
            "input": input.display().to_string(),
            "palette": out.palette,
            "shortfall": out.shortfall(),
        });

        if args.derive {
            let derived = derive_rule(&clusters, format!("From {}", input.display()))?;
            report["harmony"] = json!({
                "base": derived.base,
                "rule": derived.rule,
            });
        }

        if args.recolor {
            let palette = fixed_palette.as_ref().unwrap_or(&out.palette);
            let out_path = recolored_path(&args, input);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            recolor_image(&img, palette)
                .save(&out_path)
                .with_context(|| format!("writing {}", out_path.display()))?;
            report["recolored"] = json!(out_path.display().to_string());
        }

        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
