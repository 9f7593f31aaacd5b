use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use dotqr::{EcLevel, EncodedSymbol, ModuleMatrix, RenderConfig, Rgb, Style};

#[derive(Parser, Debug)]
#[command(name = "dotqr", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a QR symbol for the given text as PNG and/or SVG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text to encode.
    #[arg(long)]
    text: String,

    /// Error-correction level.
    #[arg(long, value_enum, default_value_t = EcChoice::H)]
    ec: EcChoice,

    /// Pin the symbol version (1..=40) instead of fitting to the data.
    #[arg(long)]
    symbol_version: Option<i16>,

    /// Load the full render config from a JSON file. The geometry,
    /// color, and style flags below are ignored when this is set.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Module style. Ignored by `--format all`, which renders both.
    #[arg(long, value_enum, default_value_t = StyleChoice::Circular)]
    style: StyleChoice,

    /// Output format. `all` writes the full style/format grid.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Output directory.
    #[arg(long, default_value = "generated")]
    out: PathBuf,

    /// Output file stem.
    #[arg(long, default_value = "qr")]
    name: String,

    /// Native pixels per module before resampling.
    #[arg(long, default_value_t = 40)]
    module_size: u32,

    /// Quiet-zone border width, in modules.
    #[arg(long, default_value_t = 4)]
    quiet_zone: u32,

    /// Side length of the output, in pixels / SVG units.
    #[arg(long, default_value_t = 1000)]
    output_size: u32,

    /// Foreground color (#RRGGBB).
    #[arg(long, default_value = "#000000")]
    fg: String,

    /// Background color (#RRGGBB).
    #[arg(long, default_value = "#ffffff")]
    bg: String,

    /// Print an ASCII preview of the module matrix to stdout.
    #[arg(long)]
    preview: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EcChoice {
    L,
    M,
    Q,
    H,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Circular,
    Square,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Svg,
    All,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => RenderConfig {
            module_size: args.module_size,
            quiet_zone: args.quiet_zone,
            output_size: args.output_size,
            foreground: parse_color(&args.fg).context("parse --fg")?,
            background: parse_color(&args.bg).context("parse --bg")?,
            style: match args.style {
                StyleChoice::Circular => Style::Circular,
                StyleChoice::Square => Style::Square,
            },
        },
    };
    let ec = match args.ec {
        EcChoice::L => EcLevel::Low,
        EcChoice::M => EcLevel::Medium,
        EcChoice::Q => EcLevel::Quartile,
        EcChoice::H => EcLevel::High,
    };

    let EncodedSymbol { matrix, version } =
        dotqr::encode_matrix(&args.text, ec, args.symbol_version)?;
    println!(
        "encoded version {version} ({size}x{size} modules)",
        size = matrix.size()
    );

    if args.preview {
        print_preview(&matrix, config.quiet_zone);
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    match args.format {
        FormatChoice::Png => {
            let img = dotqr::render_raster(&matrix, &config)?;
            let png = dotqr::render::raster::encode_png(&img)?;
            write_file(&args.out.join(format!("{}.png", args.name)), &png)?;
        }
        FormatChoice::Svg => {
            let svg = dotqr::render_vector(&matrix, &config)?;
            write_file(&args.out.join(format!("{}.svg", args.name)), svg.as_bytes())?;
        }
        FormatChoice::All => {
            let all = dotqr::render_all(&matrix, &config)?;
            for (suffix, style) in [("circular", &all.circular), ("square", &all.square)] {
                write_file(
                    &args.out.join(format!("{}_{suffix}.png", args.name)),
                    &style.png,
                )?;
                write_file(
                    &args.out.join(format!("{}_{suffix}.svg", args.name)),
                    style.svg.as_bytes(),
                )?;
            }
        }
    }

    Ok(())
}

fn read_config_json(path: &Path) -> anyhow::Result<RenderConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: RenderConfig =
        serde_json::from_reader(r).with_context(|| "parse render config JSON")?;
    Ok(config)
}

fn parse_color(s: &str) -> anyhow::Result<Rgb> {
    Rgb::from_hex(s).map_err(|e| anyhow::anyhow!(e))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn print_preview(matrix: &ModuleMatrix, quiet_zone: u32) {
    let size = matrix.size() as i64;
    let border = i64::from(quiet_zone);
    for row in -border..size + border {
        for col in -border..size + border {
            let dark = row >= 0
                && row < size
                && col >= 0
                && col < size
                && matrix.get(row as usize, col as usize);
            let c = if dark { '\u{2588}' } else { ' ' };
            print!("{c}{c}");
        }
        println!();
    }
}
