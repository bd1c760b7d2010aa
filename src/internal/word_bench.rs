#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::print_stdout)]

//! Times word counting over text files with each map backing.
//!
//! ```text
//! word_bench reddit_comments_2008.txt --backing tree,hash --runs 5 --plot build_times.svg
//! RUST_LOG=trimap=debug word_bench sample.txt --capacity 4
//! word_bench --explore 100000
//! ```

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, bail};
use clap::Parser;
use plotters::prelude::*;
use rand::Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use trimap::{
    Backing, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR, HashMapConfig, TreeMap, WordCounter,
};

/// Number of batches the random tree exploration is reported in
const EXPLORE_BATCHES: usize = 10;

#[derive(Debug, Parser)]
#[command(version, about = "Count words with every map backing and compare build times")]
struct Args {
    /// Text files to count
    files: Vec<PathBuf>,

    /// Backings to run, comma separated (linear, tree, hash)
    #[arg(long, value_delimiter = ',', default_values_t = Backing::ALL)]
    backing: Vec<Backing>,

    /// How many times each map is rebuilt; the reported time is the average
    #[arg(long, default_value_t = 10)]
    runs: u32,

    /// How many of the most frequent words to print
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Directory receiving one word-count file per input and backing
    #[arg(long, value_name = "DIR")]
    report: Option<PathBuf>,

    /// SVG file receiving a chart of build times
    #[arg(long, value_name = "FILE.svg")]
    plot: Option<PathBuf>,

    /// Insert this many random keys into a tree and report how its shape evolves
    #[arg(long, value_name = "N")]
    explore: Option<usize>,

    /// Initial bucket count of the hash backing
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Load factor at which the hash backing doubles
    #[arg(long, default_value_t = DEFAULT_MAX_LOAD_FACTOR)]
    load_factor: f64,
}

/// Outcome of counting one file with one backing
#[derive(Debug)]
struct Measurement {
    file: String,
    backing: Backing,
    average: Duration,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.files.is_empty() && args.explore.is_none() {
        bail!("nothing to do: pass at least one text file or --explore N");
    }
    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }

    let config = HashMapConfig::new()
        .with_initial_capacity(args.capacity)
        .with_max_load_factor(args.load_factor);
    config.validate().context("invalid hash map settings")?;

    if let Some(dir) = &args.report {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create report directory {}", dir.display()))?;
    }

    let mut measurements = Vec::new();
    for path in &args.files {
        for &backing in &args.backing {
            measurements.push(measure(path, backing, config, &args)?);
        }
    }

    if let Some(plot) = &args.plot {
        if measurements.is_empty() {
            info!("no measurements, skipping chart");
        } else {
            draw_chart(plot, &measurements, &args.backing)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("cannot draw chart {}", plot.display()))?;
            info!(path = %plot.display(), "chart written");
        }
    }

    if let Some(n) = args.explore {
        explore(n);
    }

    Ok(())
}

/// Counts `path` with `backing` `args.runs` times and prints the summary
fn measure(
    path: &Path,
    backing: Backing,
    config: HashMapConfig,
    args: &Args,
) -> anyhow::Result<Measurement> {
    let mut counter = WordCounter::with_config(backing, config)?;
    let mut total = Duration::ZERO;
    for run in 0..args.runs {
        counter.clear();
        let file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let words = counter
            .read_words(BufReader::new(file))
            .with_context(|| format!("cannot read {}", path.display()))?;
        let elapsed = counter.build_map(&words);
        debug!(run, %backing, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "map built");
        total += elapsed;
    }
    let average = total / args.runs;

    println!("{} [{backing}]", path.display());
    println!(
        "  average build: {:.3} ms over {} runs",
        average.as_secs_f64() * 1000.0,
        args.runs
    );
    println!(
        "  words: {} total, {} unique, max probe depth {}",
        counter.total_word_count(),
        counter.unique_word_count(),
        counter.max_probe_depth()
    );
    for (rank, (word, count)) in counter.top_words(args.top).into_iter().enumerate() {
        println!("  {:>3}. {word} - {count} ({:.4})", rank + 1, counter.frequency(&word));
    }

    if let Some(dir) = &args.report {
        let stem = path.file_stem()
            .map_or_else(|| "words".into(), |s| s.to_string_lossy());
        let out = dir.join(format!("{stem}_{backing}.txt"));
        let file =
            File::create(&out).with_context(|| format!("cannot create {}", out.display()))?;
        counter
            .write_word_count(BufWriter::new(file))
            .with_context(|| format!("cannot write {}", out.display()))?;
        info!(path = %out.display(), "word counts written");
    }

    Ok(Measurement {
        file: path.display().to_string(),
        backing,
        average,
    })
}

/// Average build time per file, one line per backing
fn draw_chart(
    path: &Path,
    measurements: &[Measurement],
    backings: &[Backing],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220), RGBColor(50, 180, 50)];

    let mut files: Vec<&str> = Vec::new();
    for m in measurements {
        if !files.contains(&m.file.as_str()) {
            files.push(&m.file);
        }
    }

    let max_ms = measurements
        .iter()
        .map(|m| m.average.as_secs_f64() * 1000.0)
        .fold(0.0, f64::max)
        * 1.1;

    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let last = files.len().saturating_sub(1).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption("Average map build time", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..last, 0.0..max_ms.max(f64::MIN_POSITIVE))?;

    chart
        .configure_mesh()
        .x_labels(files.len())
        .x_label_formatter(&|x| files.get(*x).map_or_else(String::new, |f| (*f).to_string()))
        .x_desc("Input file")
        .y_desc("Build time (ms)")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (i, backing) in backings.iter().enumerate() {
        let color = colors.get(i % colors.len()).copied().unwrap_or(BLACK);
        let style = ShapeStyle::from(&color).stroke_width(2);
        let points: Vec<(usize, f64)> = files
            .iter()
            .enumerate()
            .filter_map(|(x, file)| {
                measurements
                    .iter()
                    .find(|m| m.backing == *backing && m.file == *file)
                    .map(|m| (x, m.average.as_secs_f64() * 1000.0))
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), style))?
            .label(backing.name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Inserts `n` random keys into a tree, reporting its shape after every batch
fn explore(n: usize) {
    let mut rng = rand::rng();
    let mut tree = TreeMap::new();
    let batch = n.div_ceil(EXPLORE_BATCHES).max(1);

    println!("tree exploration: {n} random keys in batches of {batch}");
    println!("{:>10} {:>8} {:>12}", "size", "height", "unbalanced");

    let mut inserted = 0;
    while inserted < n {
        let step = batch.min(n - inserted);
        for _ in 0..step {
            let key: u64 = rng.random_range(0..u64::MAX);
            tree.insert(key, ());
        }
        inserted += step;
        println!(
            "{:>10} {:>8} {:>12}",
            tree.len(),
            tree.height(),
            tree.unbalanced_count()
        );
    }
}
