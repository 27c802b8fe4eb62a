use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rawsquare_rs::image_pipeline::raw::params::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_GAMMA};
use rawsquare_rs::image_pipeline::square::parse_fill_color;
use rawsquare_rs::image_pipeline::{ConversionError, OutputFormat};

#[derive(Parser)]
#[command(name = "rawsquare", version, about = "Square-normalize RAW and raster images")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Develop every DNG in a directory and square the results (stops at the first error)
    Convert {
        /// Directory containing the RAW files
        input_dir: PathBuf,

        /// Output directory (defaults to the input directory)
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        develop: DevelopArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = FormatArg::Png)]
        format: FormatArg,

        /// Square method applied after developing (pad, crop or stretch)
        #[arg(short, long, default_value = "crop")]
        method: String,

        /// Fill color for pad, as R,G,B or #RRGGBB
        #[arg(long, value_parser = parse_fill_arg, default_value = "255,255,255")]
        fill: [u8; 3],
    },

    /// Develop a single RAW file
    Raw {
        /// RAW file to develop
        input: PathBuf,

        /// Output file (defaults to the input with a .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        develop: DevelopArgs,

        /// Print a per-step timing summary
        #[arg(long, default_value_t = false)]
        timings: bool,
    },

    /// Square a single raster image
    Square {
        /// Image to square
        input: PathBuf,

        /// Output file (defaults to <stem>_<method>.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        square: SquareArgs,
    },

    /// Square every supported image in a directory (continues past failures)
    SquareDir {
        /// Directory containing the images
        input_dir: PathBuf,

        /// Output directory (defaults to <INPUT_DIR>/square_outputs)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        square: SquareArgs,
    },
}

#[derive(Args)]
pub struct DevelopArgs {
    /// Compression level (0-9)
    #[arg(short, long, default_value_t = DEFAULT_COMPRESSION_LEVEL, allow_negative_numbers = true)]
    pub compression: i32,

    /// Gamma exponent of the output curve
    #[arg(short, long, default_value_t = DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Resize the developed image, as WIDTHxHEIGHT
    #[arg(short, long, value_parser = parse_resize)]
    pub resize: Option<(u32, u32)>,
}

#[derive(Args)]
pub struct SquareArgs {
    /// Square method (pad, crop or stretch)
    #[arg(short, long, default_value = "pad")]
    pub method: String,

    /// Fill color for pad, as R,G,B or #RRGGBB
    #[arg(long, value_parser = parse_fill_arg, default_value = "255,255,255")]
    pub fill: [u8; 3],

    /// Compression level (0-9)
    #[arg(short, long, default_value_t = 6, allow_negative_numbers = true)]
    pub compression: i32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Png,
    Tiff,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Tiff => OutputFormat::Tiff,
        }
    }
}

fn parse_fill_arg(s: &str) -> Result<[u8; 3], ConversionError> {
    parse_fill_color(s)
}

/// Parses `WIDTHxHEIGHT`; zero sides are left for the decoder to reject.
fn parse_resize(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid dimension '{}' in '{}'", v, s))
    };
    Ok((parse(width)?, parse(height)?))
}
