mod app;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use log::info;

use scroll_ribbon::config::{self, Config};
use scroll_ribbon::engine::pipeline::PageLoader;
use scroll_ribbon::ribbon::builder::repeat_count;
use scroll_ribbon::ribbon::{InitOutcome, RibbonRegistry, Signal, Trigger};

use app::RibbonApp;

/// Viewport width assumed by the headless commands when none is given.
const HEADLESS_VIEWPORT_WIDTH: f32 = 1280.0;

#[derive(Parser)]
#[command(
    name = "scroll-ribbon",
    about = "Infinite auto-scrolling ribbon for page-builder image galleries",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Host page to open (URL or local HTML file)
    page: Option<String>,

    /// Width used to size tracks, in pixels (defaults to the window width)
    #[arg(long, global = true)]
    viewport_width: Option<f32>,

    /// Pixels the ribbon moves per frame
    #[arg(long, global = true)]
    speed: Option<f32>,

    /// How pause signals combine: `any-active` or `last-writer-wins`
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Config file (defaults to $XDG_CONFIG_HOME/scroll-ribbon/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output file path (logs go to stderr otherwise)
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List the galleries on a page and how their tracks would be sized
    Plan {
        /// Host page (URL or local HTML file)
        page: String,
    },
    /// Run the animation headless for a number of frames and report
    Simulate {
        /// Host page (URL or local HTML file)
        page: String,

        /// Frames to run
        #[arg(long, default_value_t = 600)]
        ticks: u64,

        /// Hold every ribbon paused (as if hovered)
        #[arg(long)]
        paused: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let mut file = config::load_config(cli.config.as_deref())?;
    let page = if cli.command.is_none() { cli.page.clone() } else { None };
    file.merge_cli(page, cli.viewport_width, cli.speed, cli.policy.clone());
    let config = file.resolve()?;

    match cli.command {
        Some(Command::Plan { page }) => run_plan(&page, &config),
        Some(Command::Simulate { page, ticks, paused }) => run_simulate(&page, ticks, paused, &config),
        None => run_viewer(config),
    }
}

fn init_logging(log_path: Option<&Path>) -> Result<()> {
    match log_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::init(),
    }
    Ok(())
}

fn run_viewer(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    info!("starting viewer");
    eframe::run_native(
        "Scroll Ribbon",
        options,
        Box::new(|_cc| Ok(Box::new(RibbonApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start viewer: {e}"))
}

fn run_plan(page: &str, config: &Config) -> Result<()> {
    let result = PageLoader::new()
        .load_page(page)
        .with_context(|| format!("failed to load {page}"))?;
    let width = config.viewport_width.unwrap_or(HEADLESS_VIEWPORT_WIDTH);
    let doc = &result.document;

    println!("{} ({})", doc.title, doc.url);
    println!("{} gallery widget(s), viewport {}px", doc.galleries.len(), width);
    for gallery in &doc.galleries {
        let repeats = repeat_count(width, gallery.sources.len(), &config.ribbon);
        if gallery.is_inert() {
            println!("  gallery {}: no images, left alone", gallery.key);
            continue;
        }
        println!(
            "  gallery {}: {} image(s) x {} repeat(s) = {} slide(s)",
            gallery.key,
            gallery.sources.len(),
            repeats,
            repeats * gallery.sources.len()
        );
        for src in &gallery.sources {
            println!("    {}", src);
        }
    }
    Ok(())
}

fn run_simulate(page: &str, ticks: u64, paused: bool, config: &Config) -> Result<()> {
    let result = PageLoader::new()
        .load_page(page)
        .with_context(|| format!("failed to load {page}"))?;
    let width = config.viewport_width.unwrap_or(HEADLESS_VIEWPORT_WIDTH);
    let galleries = &result.document.galleries;

    let mut registry = RibbonRegistry::new(config.ribbon.clone());
    let outcomes = registry.initialize_all(Trigger::DocumentReady, galleries, width);

    for (gallery, outcome) in galleries.iter().zip(outcomes) {
        if outcome != InitOutcome::Created {
            println!("gallery {}: {:?}", gallery.key, outcome);
            continue;
        }
        let Some(instance) = registry.get_mut(&gallery.key) else { continue };
        if paused {
            instance.ribbon.signal(Signal::Hover, true);
        }
        let summary = instance.animation.run(&mut instance.ribbon, ticks);
        println!(
            "gallery {}: {} frame(s), {} advanced, {} recycle(s), offset {:.1}px, head slide {}",
            gallery.key,
            summary.frames,
            summary.advanced,
            summary.recycled,
            instance.ribbon.offset(),
            instance
                .ribbon
                .track()
                .head()
                .map(|s| s.id.to_string())
                .unwrap_or_default()
        );
    }

    registry.teardown_all();
    Ok(())
}
