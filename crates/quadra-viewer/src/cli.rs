//! Command-line parsing for `quadra-viewer`.

use std::path::PathBuf;

use quadra_engine::render::{QuadConfig, RegionSpec, TexcoordOrigin};
use quadra_engine::window::RuntimeConfig;
use thiserror::Error;
use winit::dpi::LogicalSize;

pub const USAGE: &str = "\
usage: quadra-viewer <image.tga> [options]

options:
  --region x0,y0,x1,y1   pixel corners of the region to show (default: whole image)
  --origin raster|math   texture row order: raster = top row first (default)
  --title T              window title
  --size WxH             initial window size in logical pixels (default: 800x600)
  -h, --help             print this message";

#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("missing image path")]
    MissingImage,

    #[error("unexpected argument `{0}`")]
    Unexpected(String),

    #[error("`{0}` needs a value")]
    MissingValue(&'static str),

    #[error("invalid value `{value}` for `{flag}`: expected {expected}")]
    InvalidValue {
        flag: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Everything the viewer needs to start.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub image: PathBuf,
    pub quad: QuadConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone)]
pub enum Command {
    Run(ViewerOptions),
    Help,
}

/// Parses arguments, program name excluded.
pub fn parse_args<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let mut image = None;
    let mut quad = QuadConfig::default();
    let mut runtime = RuntimeConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--region" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--region"))?;
                quad.region = parse_region(&value)?;
            }
            "--origin" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--origin"))?;
                quad.texcoord_origin = parse_origin(&value)?;
            }
            "--title" => {
                runtime.title = args.next().ok_or(ArgsError::MissingValue("--title"))?;
            }
            "--size" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--size"))?;
                runtime.initial_size = parse_size(&value)?;
            }
            flag if flag.starts_with('-') => return Err(ArgsError::Unexpected(arg)),
            _ if image.is_none() => image = Some(PathBuf::from(arg)),
            _ => return Err(ArgsError::Unexpected(arg)),
        }
    }

    let image = image.ok_or(ArgsError::MissingImage)?;
    Ok(Command::Run(ViewerOptions { image, quad, runtime }))
}

fn parse_region(value: &str) -> Result<RegionSpec, ArgsError> {
    let invalid = || ArgsError::InvalidValue {
        flag: "--region",
        value: value.to_string(),
        expected: "four comma-separated pixel coordinates",
    };

    let coords = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    match coords.as_slice() {
        &[start_x, start_y, end_x, end_y] => Ok(RegionSpec::Pixels {
            start_x,
            start_y,
            end_x,
            end_y,
        }),
        _ => Err(invalid()),
    }
}

fn parse_origin(value: &str) -> Result<TexcoordOrigin, ArgsError> {
    match value {
        "raster" => Ok(TexcoordOrigin::Raster),
        "math" | "mathematical" => Ok(TexcoordOrigin::Mathematical),
        _ => Err(ArgsError::InvalidValue {
            flag: "--origin",
            value: value.to_string(),
            expected: "`raster` or `math`",
        }),
    }
}

fn parse_size(value: &str) -> Result<LogicalSize<f64>, ArgsError> {
    let invalid = || ArgsError::InvalidValue {
        flag: "--size",
        value: value.to_string(),
        expected: "WIDTHxHEIGHT with both sides above zero",
    };

    let (w, h) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let h = h.trim().parse::<u32>().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }

    Ok(LogicalSize::new(f64::from(w), f64::from(h)))
}
