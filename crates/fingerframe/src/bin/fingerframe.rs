//! Replay recorded detector traces through the finger-frame pipeline.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use fingerframe::gesture::{
    replay_trace, CropRegion, DetectorTrace, PipelineConfig, PolicyKind, ReplayReport,
};
use log::LevelFilter;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

/// Finger-frame gesture pipeline tools
#[derive(Parser, Debug)]
#[command(name = "fingerframe", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a detector trace and report the captures it produces
    Replay {
        /// Detector trace JSON
        #[arg(long)]
        trace: PathBuf,

        /// Pipeline config JSON (defaults to the policy defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Recognition policy, overriding the config
        #[arg(long)]
        policy: Option<PolicyKind>,

        /// Simulated export duration in milliseconds
        #[arg(long)]
        latency_ms: Option<f64>,

        /// Where to write the replay report JSON
        #[arg(long)]
        out: Option<PathBuf>,

        /// Frame image to crop every capture from
        #[cfg(feature = "image")]
        #[arg(long, requires = "out_dir")]
        snapshot: Option<PathBuf>,

        /// Directory for the cropped captures
        #[cfg(feature = "image")]
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print the default config JSON for a policy
    Defaults {
        #[arg(long, default_value = "proximity-rect")]
        policy: PolicyKind,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Replay {
            trace,
            config,
            policy,
            latency_ms,
            out,
            #[cfg(feature = "image")]
            snapshot,
            #[cfg(feature = "image")]
            out_dir,
        } => {
            let config = resolve_config(config.as_deref(), policy)?;
            let trace = DetectorTrace::load_json(&trace)?;
            let mut pipeline = config.build_pipeline()?;
            let latency = latency_ms.unwrap_or(config.export_latency_ms);

            let report = replay_trace(&mut pipeline, &trace, latency);
            print_summary(&report);

            if let Some(out) = out {
                report.write_json(&out)?;
                println!("wrote replay report to {}", out.display());
            }

            #[cfg(feature = "image")]
            if let (Some(snapshot), Some(out_dir)) = (snapshot, out_dir) {
                write_snapshots(&report, &snapshot, &out_dir)?;
            }
        }
        Command::Defaults { policy } => {
            let config = PipelineConfig::for_policy(policy);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn resolve_config(
    path: Option<&Path>,
    policy: Option<PolicyKind>,
) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match (path, policy) {
        (Some(path), _) => PipelineConfig::load_json(path)?,
        (None, Some(kind)) => PipelineConfig::for_policy(kind),
        (None, None) => PipelineConfig::default(),
    };
    if let Some(kind) = policy {
        if config.params.policy.kind() != kind {
            config.params.policy = kind.into();
            config.params.crop_mode = None;
        }
    }
    config.params.validate()?;
    Ok(config)
}

fn print_summary(report: &ReplayReport) {
    println!(
        "replayed {} ticks with {}: {} capture(s)",
        report.ticks,
        report.policy,
        report.captures.len()
    );
    for capture in &report.captures {
        let event = &capture.event;
        let shape = match &event.crop.region {
            CropRegion::Rect(r) => format!("rect {},{} {}x{}", r.x, r.y, r.width, r.height),
            CropRegion::Polygon { points } => {
                let r = event.crop.region.bounding_rect();
                format!(
                    "polygon of {} points in {},{} {}x{}",
                    points.len(),
                    r.x,
                    r.y,
                    r.width,
                    r.height
                )
            }
        };
        let finished = match &capture.finished {
            Some(f) => format!("{:?} after {:.0} ms", f.outcome, f.duration_ms),
            None => "never finished".to_string(),
        };
        println!(
            "  {} at {:.0} ms: {}{} ({})",
            event.ticket,
            event.timestamp_ms,
            shape,
            if event.crop.fallback { " [full frame]" } else { "" },
            finished
        );
    }
}

#[cfg(feature = "image")]
fn write_snapshots(
    report: &ReplayReport,
    snapshot: &Path,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use fingerframe::extract::{extract_region, frame_size};

    let img = image::ImageReader::open(snapshot)?.decode()?.to_rgba8();
    if frame_size(&img) != report.frame {
        log::warn!(
            "snapshot is {}x{} but the trace frame is {}x{}; regions may not line up",
            img.width(),
            img.height(),
            report.frame.width,
            report.frame.height
        );
    }
    std::fs::create_dir_all(out_dir)?;
    for capture in &report.captures {
        let cropped = extract_region(&img, &capture.event.crop.region)?;
        let path = out_dir.join(format!("capture-{}.png", capture.event.ticket.id()));
        cropped.save(&path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Ignore errors if a logger/subscriber was already installed.
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    #[cfg(not(feature = "tracing"))]
    {
        let _ = fingerframe::core::init_with_level(level);
    }
}
