// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: turn an aerial image tile into a CityGML building
//!
//! Usage:
//!   citylod <image_path> [options]

use anyhow::{bail, Context, Result};
use citylod_citygml::{
    build_solid, extract_geometry, write_city_model, BuildingAttributes, CityGmlOptions,
    EnvelopeMode, ModelData,
};
use citylod_vision::{
    draw_overlay, image_statistics, preprocess, segment, PreprocessOptions, RasterImage,
};
use std::fs;
use std::path::{Path, PathBuf};

mod config;

use config::Config;

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
struct Args {
    image_path: PathBuf,
    lod: i64,
    output_path: PathBuf,
    attributes_path: Option<PathBuf>,
    options: CityGmlOptions,
    preprocess: PreprocessOptions,
    overlay: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "info,citylod_vision=debug,citylod_citygml=debug".into()
        }))
        .init();

    let config = Config::from_env();
    let raw: Vec<String> = std::env::args().skip(1).collect();

    let args = match parse_args(&raw, &config)? {
        Some(args) => args,
        None => {
            print_usage();
            return Ok(());
        }
    };

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    tracing::info!(
        image = %args.image_path.display(),
        lod = args.lod,
        output = %args.output_path.display(),
        epsg = args.options.epsg,
        "Starting CityLOD"
    );

    let decoded = image::open(&args.image_path)
        .with_context(|| format!("Cannot open image '{}'", args.image_path.display()))?;
    let mut raster = RasterImage::from_dynamic(&decoded);
    if !args.preprocess.is_noop() {
        raster = preprocess(&raster, &args.preprocess).context("Preprocessing failed")?;
    }

    let stats = image_statistics(&raster).context("Cannot compute image statistics")?;
    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        channels = raster.channels(),
        edge_density = stats.edge_density,
        "Loaded image"
    );

    let segmentation = segment(&raster).context("Segmentation failed")?;
    tracing::info!(
        footprints = segmentation.count(),
        lines = segmentation.lines.len(),
        "Segmented image"
    );

    if args.overlay {
        let overlay = draw_overlay(&raster, &segmentation).context("Cannot draw overlay")?;
        let overlay_path = overlay_path(&args.output_path);
        ensure_parent(&overlay_path)?;
        overlay
            .save(&overlay_path)
            .with_context(|| format!("Cannot write overlay '{}'", overlay_path.display()))?;
        tracing::info!(path = %overlay_path.display(), "Wrote overlay");
    }

    let attributes = match &args.attributes_path {
        Some(path) => load_attributes(path)?,
        None => BuildingAttributes::default(),
    };

    let model = ModelData::from_segmentation(segmentation);
    let geometry = extract_geometry(&model);
    let building =
        build_solid(args.lod, &geometry, &attributes).context("Cannot build building solid")?;
    let document =
        write_city_model(&building, &args.options).context("Cannot serialize CityGML")?;

    ensure_parent(&args.output_path)?;
    fs::write(&args.output_path, &document)
        .with_context(|| format!("Cannot write '{}'", args.output_path.display()))?;

    tracing::info!(
        path = %args.output_path.display(),
        lod = building.lod.number(),
        geometry = geometry.form_name(),
        faces = building.solid.faces.len(),
        room = building.room.is_some(),
        warnings = building.warnings.len(),
        "Model exported"
    );

    Ok(())
}

/// Returns `None` when help was requested.
fn parse_args(raw: &[String], config: &Config) -> Result<Option<Args>> {
    let Some(first) = raw.first() else {
        return Ok(None);
    };
    if first == "--help" || first == "-h" {
        return Ok(None);
    }

    let image_path = PathBuf::from(first);
    let mut lod = config.lod;
    let mut output_path: Option<PathBuf> = None;
    let mut attributes_path = None;
    let mut options = CityGmlOptions {
        epsg: config.epsg,
        envelope: config.envelope,
        ..Default::default()
    };
    let mut prepare = PreprocessOptions::default();
    let mut overlay = false;

    let mut rest = raw[1..].iter();
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .with_context(|| format!("Missing value for {}", flag))
        };
        match flag.as_str() {
            "--lod" => {
                let v = value()?;
                lod = v.parse().with_context(|| format!("Invalid LOD value: {}", v))?;
            }
            "--output" | "-o" => output_path = Some(PathBuf::from(value()?)),
            "--attributes" => attributes_path = Some(PathBuf::from(value()?)),
            "--epsg" => {
                let v = value()?;
                options.epsg = v.parse().with_context(|| format!("Invalid EPSG code: {}", v))?;
            }
            "--building-type" => options.building_type = value()?,
            "--computed-envelope" => options.envelope = EnvelopeMode::Computed,
            "--contrast-stretch" => {
                prepare.contrast_stretch = Some(parse_percentiles(&value()?)?);
            }
            "--resize" => prepare.resize = Some(parse_size(&value()?)?),
            "--overlay" => overlay = true,
            other => bail!("Unknown option: {}", other),
        }
    }

    let output_path = normalize_output(
        output_path.unwrap_or_else(|| default_output(&config.output_dir, &image_path)),
    );

    Ok(Some(Args {
        image_path,
        lod,
        output_path,
        attributes_path,
        options,
        preprocess: prepare,
        overlay,
    }))
}

/// `LOW,HIGH` percentiles, e.g. `2,98`
fn parse_percentiles(value: &str) -> Result<(u8, u8)> {
    let (low, high) = value
        .split_once(',')
        .with_context(|| format!("Expected LOW,HIGH percentiles, got '{}'", value))?;
    let low: u8 = low
        .trim()
        .parse()
        .with_context(|| format!("Invalid percentile: {}", low))?;
    let high: u8 = high
        .trim()
        .parse()
        .with_context(|| format!("Invalid percentile: {}", high))?;
    if low >= high || high > 100 {
        bail!("Percentiles must satisfy LOW < HIGH <= 100, got {},{}", low, high);
    }
    Ok((low, high))
}

/// `WIDTHxHEIGHT`, e.g. `512x512`
fn parse_size(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("Expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: u32 = width.parse().with_context(|| format!("Invalid width: {}", width))?;
    let height: u32 = height.parse().with_context(|| format!("Invalid height: {}", height))?;
    if width == 0 || height == 0 {
        bail!("Resize target must be non-empty, got {}x{}", width, height);
    }
    Ok((width, height))
}

fn default_output(dir: &Path, image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "building".to_string());
    dir.join(format!("{}.gml", stem))
}

/// Force the `.gml` extension
fn normalize_output(mut path: PathBuf) -> PathBuf {
    let is_gml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gml"));
    if !is_gml {
        path.set_extension("gml");
    }
    path
}

fn overlay_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "building".to_string());
    output.with_file_name(format!("{}_overlay.png", stem))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn load_attributes(path: &Path) -> Result<BuildingAttributes> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read attributes '{}'", path.display()))?;
    BuildingAttributes::from_json(&json)
        .with_context(|| format!("Invalid attributes in '{}'", path.display()))
}

fn print_usage() {
    println!("Usage: citylod <image_path> [options]");
    println!();
    println!("Options:");
    println!("  --lod <N>               Level of detail 1-4, others build LOD2 (default: 2)");
    println!("  --output, -o <PATH>     Output file, forced to .gml (default: <image>.gml)");
    println!("  --attributes <FILE>     JSON file with building attributes");
    println!("  --epsg <CODE>           EPSG code of the envelope (default: 4326)");
    println!("  --building-type <NAME>  Building element name (default: Building)");
    println!("  --computed-envelope     Envelope from the geometry instead of the world extent");
    println!("  --contrast-stretch <L,H> Stretch percentiles L-H to 0-255 (e.g. 2,98)");
    println!("  --resize <WxH>          Resample the image before segmenting");
    println!("  --overlay               Also write <output>_overlay.png");
    println!();
    println!(
        "Environment: CITYLOD_LOD, CITYLOD_EPSG, CITYLOD_OUTPUT_DIR, CITYLOD_ENVELOPE, RUST_LOG"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_help() {
        let config = Config::default();
        assert_eq!(parse_args(&[], &config).unwrap(), None);
        assert_eq!(parse_args(&args(&["-h"]), &config).unwrap(), None);
    }

    #[test]
    fn test_defaults_from_config() {
        let config = Config {
            lod: 3,
            epsg: 3857,
            output_dir: PathBuf::from("out"),
            envelope: EnvelopeMode::Computed,
        };
        let parsed = parse_args(&args(&["tiles/house.png"]), &config)
            .unwrap()
            .unwrap();

        assert_eq!(parsed.lod, 3);
        assert_eq!(parsed.output_path, PathBuf::from("out/house.gml"));
        assert_eq!(parsed.options.epsg, 3857);
        assert_eq!(parsed.options.envelope, EnvelopeMode::Computed);
        assert!(!parsed.overlay);
    }

    #[test]
    fn test_flags_override() {
        let parsed = parse_args(
            &args(&[
                "house.jpg",
                "--lod",
                "4",
                "--output",
                "result/model.xml",
                "--attributes",
                "attrs.json",
                "--epsg",
                "25832",
                "--building-type",
                "BuildingPart",
                "--computed-envelope",
                "--overlay",
            ]),
            &Config::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(parsed.lod, 4);
        assert_eq!(parsed.output_path, PathBuf::from("result/model.gml"));
        assert_eq!(parsed.attributes_path, Some(PathBuf::from("attrs.json")));
        assert_eq!(parsed.options.epsg, 25832);
        assert_eq!(parsed.options.building_type, "BuildingPart");
        assert_eq!(parsed.options.envelope, EnvelopeMode::Computed);
        assert!(parsed.overlay);
    }

    #[test]
    fn test_out_of_range_lod_is_passed_through() {
        let config = Config::default();
        for value in ["300", "-1", "0"] {
            let parsed = parse_args(&args(&["a.png", "--lod", value]), &config)
                .unwrap()
                .unwrap();
            assert_eq!(parsed.lod, value.parse::<i64>().unwrap());
        }
    }

    #[test]
    fn test_preprocess_flags() {
        let config = Config::default();
        let plain = parse_args(&args(&["a.png"]), &config).unwrap().unwrap();
        assert!(plain.preprocess.is_noop());

        let parsed = parse_args(
            &args(&["a.png", "--contrast-stretch", "2,98", "--resize", "512x256"]),
            &config,
        )
        .unwrap()
        .unwrap();
        assert_eq!(parsed.preprocess.contrast_stretch, Some((2, 98)));
        assert_eq!(parsed.preprocess.resize, Some((512, 256)));

        for bad in [
            &["a.png", "--contrast-stretch", "98,2"][..],
            &["a.png", "--contrast-stretch", "5"],
            &["a.png", "--contrast-stretch", "0,101"],
            &["a.png", "--resize", "0x10"],
            &["a.png", "--resize", "512"],
        ] {
            assert!(parse_args(&args(bad), &config).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_bad_flags() {
        let config = Config::default();
        assert!(parse_args(&args(&["a.png", "--lod"]), &config).is_err());
        assert!(parse_args(&args(&["a.png", "--lod", "x"]), &config).is_err());
        assert!(parse_args(&args(&["a.png", "--frobnicate"]), &config).is_err());
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(
            normalize_output(PathBuf::from("a/b.GML")),
            PathBuf::from("a/b.GML")
        );
        assert_eq!(normalize_output(PathBuf::from("model")), PathBuf::from("model.gml"));
        assert_eq!(
            overlay_path(Path::new("out/house.gml")),
            PathBuf::from("out/house_overlay.png")
        );
    }
}
