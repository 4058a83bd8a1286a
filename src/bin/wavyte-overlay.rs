use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wavyte_overlay::{
    ChromaWeight, ConversionMatrix, DEFAULT_SHIFT, DestFrame, GlyphBitmap, MatrixSpec, PixelFormat,
    PlaneMut, RendererConfig, Rgba32, Sample, SubtitleRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "wavyte-overlay", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a JSON scene onto a solid frame and dump the planes.
    Render(RenderArgs),
    /// List supported pixel formats.
    Formats,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Destination pixel format (e.g. `yv12`, `bgra32`, `yuv420_p16`).
    #[arg(long, value_parser = parse_format)]
    format: PixelFormat,

    /// Bits per sample; defaults to the format's widest depth.
    #[arg(long)]
    bits: Option<u32>,

    /// Matrix name (`tv.709`, `pc.601`, ...); overrides the scene.
    #[arg(long)]
    matrix: Option<String>,

    /// Output path for the raw planes, concatenated, little-endian.
    #[arg(long)]
    out: PathBuf,

    /// Optional PNG preview (RGB formats only).
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Scene {
    width: u32,
    height: u32,
    #[serde(default)]
    matrix: Option<MatrixSpec>,
    #[serde(default)]
    chroma_weight: ChromaWeight,
    /// Background RGB.
    #[serde(default)]
    background: [u8; 3],
    #[serde(default)]
    glyphs: Vec<GlyphSpec>,
}

/// A rectangular coverage mask.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct GlyphSpec {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: [u8; 3],
    #[serde(default)]
    transparency: u8,
    #[serde(default = "full_coverage")]
    coverage: u8,
    /// Fade coverage from 0 on the left edge to `coverage` on the right.
    #[serde(default)]
    ramp: bool,
}

fn full_coverage() -> u8 {
    255
}

impl GlyphSpec {
    fn mask(&self) -> Vec<u8> {
        let (w, h) = (self.width as usize, self.height as usize);
        let row: Vec<u8> = (0..w)
            .map(|x| {
                if self.ramp && w > 1 {
                    (u32::from(self.coverage) * x as u32 / (w as u32 - 1)) as u8
                } else {
                    self.coverage
                }
            })
            .collect();
        row.repeat(h)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Formats => {
            cmd_formats();
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wavyte_overlay={level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_format(s: &str) -> Result<PixelFormat, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
        .map_err(|_| format!("unknown pixel format '{s}' (see `wavyte-overlay formats`)"))
}

fn cmd_formats() {
    for format in PixelFormat::ALL {
        let name = serde_json::to_value(format)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        let depths = format.bit_depths();
        println!(
            "{name:<12} {}-bit samples, {}..={} bits, {} plane(s)",
            format.sample_bytes() * 8,
            depths.start(),
            depths.end(),
            format.plane_extents(1, 1).len()
        );
    }
}

fn read_scene(path: &Path) -> anyhow::Result<Scene> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let scene: Scene =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.scene)?;

    let mut config = RendererConfig::new(scene.width, scene.height, args.format)
        .with_chroma_weight(scene.chroma_weight);
    config.bits_per_sample = args.bits;
    config.matrix = match &args.matrix {
        Some(name) => Some(MatrixSpec::from_name(name)),
        None => scene.matrix,
    };
    let mut renderer = SubtitleRenderer::new(config).context("configure renderer")?;

    let masks: Vec<Vec<u8>> = scene.glyphs.iter().map(GlyphSpec::mask).collect();
    let glyphs: Vec<GlyphBitmap<'_>> = scene
        .glyphs
        .iter()
        .zip(&masks)
        .map(|(g, mask)| {
            let color = Rgba32::new(g.color[0], g.color[1], g.color[2], g.transparency);
            GlyphBitmap::new(g.width, g.height, g.x, g.y, color, mask)
        })
        .collect();

    let background = background_channels(&config, scene.background);
    let (raw, preview) = match args.format.sample_bytes() {
        1 => composite::<u8>(&mut renderer, &glyphs, background)?,
        _ => composite::<u16>(&mut renderer, &glyphs, background)?,
    };

    write_file(&args.out, &raw)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = &args.png {
        let Some(rgba) = preview else {
            anyhow::bail!("PNG preview needs an RGB format, got {:?}", args.format);
        };
        if let Some(parent) = png.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            png,
            &rgba,
            scene.width,
            scene.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", png.display()))?;
        eprintln!("wrote {}", png.display());
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

/// Background color in destination channel order `[c1, c2, c3]` at full depth.
fn background_channels(config: &RendererConfig, rgb: [u8; 3]) -> [u32; 3] {
    let bits = config.bits();
    let max = (1u32 << bits) - 1;
    let matrix = ConversionMatrix::build(config.resolved_matrix(), bits, DEFAULT_SHIFT);
    let stretched = rgb.map(|v| ((u32::from(v) * max + 127) / 255) as i32);
    matrix
        .apply(stretched)
        .map(|v| v.clamp(0, max as i32) as u32)
}

/// Render onto a solid frame; returns the raw bytes and, for RGB layouts, an RGBA8 preview.
fn composite<S: Sample>(
    renderer: &mut SubtitleRenderer,
    glyphs: &[GlyphBitmap<'_>],
    background: [u32; 3],
) -> anyhow::Result<(Vec<u8>, Option<Vec<u8>>)> {
    let config = *renderer.config();
    let (width, height) = config.dimensions();
    let extents = config.format.plane_extents(width, height);
    let mut planes = solid_planes::<S>(config.format, &extents, background);

    {
        let views = planes
            .iter_mut()
            .zip(&extents)
            .map(|(data, &(w, h))| PlaneMut::from_stride(data, w, w, h))
            .collect::<Result<Vec<_>, _>>()?;
        let mut frame = DestFrame::new(views);
        renderer.render(glyphs, true, &mut frame)?;
    }

    let mut raw = Vec::with_capacity(planes.iter().map(|p| p.len() * S::BYTES).sum());
    for sample in planes.iter().flatten() {
        raw.extend_from_slice(&sample.to_u32().to_le_bytes()[..S::BYTES]);
    }
    let preview = preview_rgba(config.format, config.bits(), &planes);
    Ok((raw, preview))
}

fn solid_planes<S: Sample>(
    format: PixelFormat,
    extents: &[(usize, usize)],
    [c1, c2, c3]: [u32; 3],
) -> Vec<Vec<S>> {
    let opaque = S::MAX;
    let patterns: Vec<Vec<u32>> = match format {
        PixelFormat::Bgra32 | PixelFormat::Bgrx32 | PixelFormat::Bgra64 => {
            vec![vec![c3, c2, c1, opaque]]
        }
        PixelFormat::Bgr24 | PixelFormat::Bgr48 => vec![vec![c3, c2, c1]],
        PixelFormat::Yuy2 => vec![vec![c1, c2, c1, c3]],
        PixelFormat::Y8 | PixelFormat::Y16 => vec![vec![c1]],
        _ => vec![vec![c1], vec![c2], vec![c3]],
    };
    extents
        .iter()
        .zip(patterns)
        .map(|(&(w, h), pattern)| {
            pattern
                .iter()
                .copied()
                .cycle()
                .take(w * h)
                .map(S::from_u32)
                .collect()
        })
        .collect()
}

fn preview_rgba<S: Sample>(format: PixelFormat, bits: u32, planes: &[Vec<S>]) -> Option<Vec<u8>> {
    let max = (1u32 << bits) - 1;
    let to8 = |s: S| (((s.to_u32().min(max) * 255) + max / 2) / max) as u8;
    let alpha_max = S::MAX;
    let to8_alpha = |s: S| (((s.to_u32() * 255) + alpha_max / 2) / alpha_max) as u8;

    let rgba = match (format, planes) {
        (PixelFormat::Bgra32 | PixelFormat::Bgra64, [packed]) => packed
            .chunks_exact(4)
            .flat_map(|px| [to8(px[2]), to8(px[1]), to8(px[0]), to8_alpha(px[3])])
            .collect(),
        (PixelFormat::Bgrx32, [packed]) => packed
            .chunks_exact(4)
            .flat_map(|px| [to8(px[2]), to8(px[1]), to8(px[0]), 255])
            .collect(),
        (PixelFormat::Bgr24 | PixelFormat::Bgr48, [packed]) => packed
            .chunks_exact(3)
            .flat_map(|px| [to8(px[2]), to8(px[1]), to8(px[0]), 255])
            .collect(),
        (PixelFormat::RgbP8 | PixelFormat::RgbP16, [r, g, b]) => r
            .iter()
            .zip(g)
            .zip(b)
            .flat_map(|((&r, &g), &b)| [to8(r), to8(g), to8(b), 255])
            .collect(),
        _ => return None,
    };
    Some(rgba)
}
