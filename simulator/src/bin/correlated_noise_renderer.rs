//! Correlated noise renderer
//!
//! Builds a correlated-noise model, either by estimating it from a synthetic
//! sample image with correlated pixels or by loading a stored reference
//! correlation function, optionally transforms it, then synthesizes a noise
//! field on a target grid and reports its statistics.
//!
//! Usage:
//! ```
//! cargo run --release --bin correlated_noise_renderer -- [OPTIONS]
//! ```

use clap::Parser;
use ndarray::{s, Array2};
use shared::algo::{ks_critical_value, ks_test_normal, mean_and_variance, pearson_correlation};
use shared::image_proc::{simple_normal_array, GaussianDeviate, Image};
use shared::units::{Angle, AngleExt};
use simulator::noise::{load_reference_noise, save_reference_correlation};
use simulator::{CorrelatedNoise, EstimateConfig, Shear};
use std::error::Error;
use std::path::PathBuf;

/// Command-line arguments for correlated noise rendering
#[derive(Parser, Debug)]
#[clap(author, version, about = "Estimate, transform and render correlated noise")]
struct Args {
    /// Sample image size used for estimation (NxN)
    #[clap(long, default_value = "128")]
    sample_size: usize,

    /// Sample image pixel scale
    #[clap(long, default_value = "0.03")]
    sample_scale: f64,

    /// Target image size (NxN)
    #[clap(short = 'i', long, default_value = "256")]
    target_size: usize,

    /// Target image pixel scale
    #[clap(long, default_value = "0.03")]
    target_scale: f64,

    /// Random seed for reproducibility
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Stored reference correlation function (JSON) to use instead of a
    /// synthetic sample
    #[clap(short = 'r', long)]
    reference: Option<PathBuf>,

    /// Rescale the model to this point variance (0 keeps the estimate)
    #[clap(long, default_value = "0")]
    variance: f64,

    /// Magnify correlations by this linear factor
    #[clap(long)]
    magnify: Option<f64>,

    /// Rotate correlations counter-clockwise by this many degrees
    #[clap(long)]
    rotate_deg: Option<f64>,

    /// Shear correlations by "g1,g2"
    #[clap(long, value_parser = parse_shear)]
    shear: Option<Shear>,

    /// Write the model's correlation function to this JSON file
    #[clap(short = 'o', long)]
    save_correlation: Option<PathBuf>,

    /// Verbose output
    #[clap(short = 'v', long)]
    verbose: bool,
}

fn parse_shear(arg: &str) -> Result<Shear, String> {
    let (g1, g2) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected \"g1,g2\", got \"{arg}\""))?;
    let g1: f64 = g1.trim().parse().map_err(|e| format!("bad g1: {e}"))?;
    let g2: f64 = g2.trim().parse().map_err(|e| format!("bad g2: {e}"))?;
    Shear::new(g1, g2).map_err(|e| e.to_string())
}

/// Sample image whose pixels are correlated with their +x neighbour:
/// white noise summed with a one-pixel shifted copy of itself.
fn correlated_sample(size: usize, scale: f64, seed: u64) -> Result<Image, Box<dyn Error>> {
    let white = simple_normal_array((size, size + 1), 0.0, 1.0, seed)?;
    let sample: Array2<f64> =
        &white.slice(s![.., ..size]) + &white.slice(s![.., 1..size + 1]);
    Ok(Image::from_array(sample, scale))
}

fn build_model(args: &Args, rng: GaussianDeviate) -> Result<CorrelatedNoise, Box<dyn Error>> {
    let mut noise = match &args.reference {
        Some(path) => load_reference_noise(path, rng, None, args.variance)?,
        None => {
            let sample = correlated_sample(args.sample_size, args.sample_scale, args.seed)?;
            let config = EstimateConfig::default().with_scale(args.sample_scale);
            let mut noise = CorrelatedNoise::from_image(&sample, rng, &config)?;
            if args.variance > 0.0 {
                noise.set_variance(args.variance)?;
            }
            noise
        }
    };

    if let Some(scale) = args.magnify {
        noise.apply_magnification(scale)?;
    }
    if let Some(degrees) = args.rotate_deg {
        noise.apply_rotation(Angle::from_degrees(degrees));
    }
    if let Some(shear) = args.shear {
        noise.apply_shear(shear);
    }
    Ok(noise)
}

/// Pearson correlation of each pixel with its +x and +y neighbours
fn neighbour_correlations(field: &Array2<f64>) -> (f64, f64) {
    let (rows, cols) = field.dim();
    let left: Vec<f64> = field.slice(s![.., ..cols - 1]).iter().copied().collect();
    let right: Vec<f64> = field.slice(s![.., 1..]).iter().copied().collect();
    let lower: Vec<f64> = field.slice(s![..rows - 1, ..]).iter().copied().collect();
    let upper: Vec<f64> = field.slice(s![1.., ..]).iter().copied().collect();
    (
        pearson_correlation(&left, &right),
        pearson_correlation(&lower, &upper),
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.target_size < 2 {
        return Err("target size must be at least 2".into());
    }

    let rng = GaussianDeviate::new(args.seed.wrapping_add(1));
    let mut noise = build_model(&args, rng)?;
    println!("Model variance: {:.6}", noise.variance());

    let mut image = Image::with_size(args.target_size, args.target_size, args.target_scale);
    noise.apply_to(&mut image)?;

    let (mean, variance) = mean_and_variance(image.array().view());
    let (corr_x, corr_y) = neighbour_correlations(image.array());
    println!(
        "Rendered {}x{} field at scale {}",
        args.target_size, args.target_size, args.target_scale
    );
    println!("  Mean:     {:.6}", mean);
    println!("  Variance: {:.6}", variance);
    println!("  Neighbour correlation: x = {:.4}, y = {:.4}", corr_x, corr_y);

    if variance > 0.0 {
        let sigma = variance.sqrt();
        let residuals: Vec<f64> = image.array().iter().map(|v| (v - mean) / sigma).collect();
        let ks = ks_test_normal(&residuals);
        let critical = ks_critical_value(residuals.len(), 0.05);
        println!(
            "  KS statistic vs N(0,1): {:.4} (5% critical value {:.4})",
            ks, critical
        );
    }

    if let Some(path) = &args.save_correlation {
        let mut cf_image = Image::with_size(31, 31, args.target_scale);
        noise.draw(&mut cf_image, None, false)?;
        save_reference_correlation(path, &cf_image)?;
        println!("Saved correlation function to {}", path.display());
    }

    Ok(())
}
