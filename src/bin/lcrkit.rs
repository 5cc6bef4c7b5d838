use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lcrkit", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a layered parallax container from images.
    Build(BuildArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Directory holding the static resource blobs.
    #[arg(long)]
    resources: PathBuf,

    /// Output container path.
    #[arg(long)]
    out: PathBuf,

    /// JSON manifest listing layers, origins and the canvas size.
    #[arg(long, conflicts_with = "images")]
    manifest: Option<PathBuf>,

    /// Layer images, front-most first. Origins are zero and the canvas is the
    /// bounding box of all images.
    #[arg(required_unless_present = "manifest")]
    images: Vec<PathBuf>,

    /// Also write the flattened preview as a PNG.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Draw identifiers from a deterministic sequence for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

/// Layout of a `--manifest` file. Relative layer paths resolve against the
/// manifest's directory.
#[derive(serde::Deserialize, Debug)]
struct Manifest {
    canvas: ManifestSize,
    layers: Vec<ManifestLayer>,
    #[serde(default)]
    config: lcrkit::EncodeConfig,
}

#[derive(serde::Deserialize, Debug)]
struct ManifestSize {
    width: f64,
    height: f64,
}

#[derive(serde::Deserialize, Debug)]
struct ManifestLayer {
    path: PathBuf,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_image(path: &Path) -> anyhow::Result<image::DynamicImage> {
    image::open(path).with_context(|| format!("open image '{}'", path.display()))
}

fn read_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let f = File::open(path).with_context(|| format!("open manifest '{}'", path.display()))?;
    let r = BufReader::new(f);
    let manifest: Manifest = serde_json::from_reader(r).with_context(|| "parse manifest JSON")?;
    Ok(manifest)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let mut encoder = lcrkit::LcrEncoder::new(lcrkit::DirResources::new(&args.resources));
    if let Some(seed) = args.seed {
        encoder = encoder.with_id_source(lcrkit::SequentialIds::new(seed));
    }

    let lcr = match &args.manifest {
        Some(manifest_path) => {
            let manifest = read_manifest(manifest_path)?;
            let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));
            let mut sources = Vec::with_capacity(manifest.layers.len());
            for layer in &manifest.layers {
                let img = load_image(&root.join(&layer.path))?;
                let origin = lcrkit::Point::new(layer.x, layer.y);
                sources.push(
                    lcrkit::LayerSource::new(origin, &img)
                        .with_context(|| format!("rasterize '{}'", layer.path.display()))?,
                );
            }
            let canvas = lcrkit::Size::new(manifest.canvas.width, manifest.canvas.height);
            encoder = encoder.with_config(manifest.config);
            encoder.encode(&sources, canvas)?
        }
        None => {
            let images = args
                .images
                .iter()
                .map(|p| load_image(p))
                .collect::<anyhow::Result<Vec<_>>>()?;
            encoder.encode_images(&images)?
        }
    };

    lcr.write_to(&args.out)?;
    eprintln!(
        "wrote {} ({} bytes, {} renditions)",
        args.out.display(),
        lcr.as_bytes().len(),
        lcr.rendition_count()
    );

    if let Some(preview_path) = &args.preview {
        lcr.flattened_image()
            .save_with_format(preview_path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", preview_path.display()))?;
        eprintln!("wrote {}", preview_path.display());
    }

    Ok(())
}
