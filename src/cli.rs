use crate::affiliation::{
    MergedAffiliation, consolidate_with_gap, most_recent_first, returning_parties,
};
use crate::config::{Config, load_config};
use crate::ir::{Legislator, OPEN_END};
use crate::layout::SeatLayoutEngine;
use crate::layout_dump::{HistoryDump, LayoutDump, write_json};
use crate::parser::{parse_feed, parse_feed_date};
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hemiciclo",
    version,
    about = "Hemicycle charts and party histories for the Chilean Congress"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the chamber as a hemicycle colored by party
    Seats(SeatsArgs),
    /// Print consolidated party affiliations
    History(HistoryArgs),
}

#[derive(clap::Args, Debug)]
pub struct SeatsArgs {
    /// Feed file (XML or JSON) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Hemicycle diameter in pixels
    #[arg(short = 'd', long = "diameter")]
    pub diameter: Option<f32>,

    /// Chart title
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Resolve memberships at this date instead of today
    #[arg(long = "as-of")]
    pub as_of: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Feed file (XML or JSON) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Only this legislator id
    #[arg(short = 'l', long = "legislator")]
    pub legislator: Option<String>,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    match args.command {
        Command::Seats(seats) => run_seats(seats),
        Command::History(history) => run_history(history),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_seats(args: SeatsArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(diameter) = args.diameter {
        config.render.diameter = diameter.max(1.0);
    }
    if args.title.is_some() {
        config.render.title = args.title.clone();
    }
    let as_of = args.as_of.as_deref().map(parse_as_of).transpose()?;

    let legislators = parse_feed(&read_input(args.input.as_deref())?)?;
    tracing::info!(legislators = legislators.len(), "loaded feed");

    let engine = SeatLayoutEngine::new(config.parties.clone(), config.layout.clone());
    let layout = match as_of {
        Some(at) => engine.layout_at(&legislators, config.render.diameter, at),
        None => engine.layout(&legislators, config.render.diameter),
    };

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
        OutputFormat::Json => {
            write_json(&LayoutDump::from_layout(&layout), args.output.as_deref())?;
        }
    }
    Ok(())
}

fn run_history(args: HistoryArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let legislators = parse_feed(&read_input(args.input.as_deref())?)?;
    let selected: Vec<&Legislator> = match args.legislator.as_deref() {
        Some(id) => {
            let found: Vec<&Legislator> = legislators.iter().filter(|l| l.id == id).collect();
            if found.is_empty() {
                return Err(anyhow::anyhow!("No legislator with id {id} in feed"));
            }
            found
        }
        None => legislators.iter().collect(),
    };

    let histories: Vec<(&Legislator, Vec<MergedAffiliation>)> = selected
        .into_iter()
        .map(|legislator| {
            let merged =
                consolidate_with_gap(&legislator.memberships, config.affiliation.max_gap());
            (legislator, merged)
        })
        .collect();

    if args.json {
        let dumps: Vec<HistoryDump> = histories
            .iter()
            .map(|(legislator, merged)| {
                HistoryDump::new(legislator, merged, returning_parties(merged))
            })
            .collect();
        return write_json(&dumps, None);
    }

    let mut out = String::new();
    for (legislator, merged) in &histories {
        out.push_str(&format_history(legislator, merged, &config));
    }
    print!("{out}");
    Ok(())
}

fn format_history(
    legislator: &Legislator,
    merged: &[MergedAffiliation],
    config: &Config,
) -> String {
    let mut out = format!("{} [{}]\n", legislator.full_name(), legislator.id);
    if merged.is_empty() {
        out.push_str("  (no party memberships)\n");
        return out;
    }
    for entry in most_recent_first(merged) {
        let name = config
            .parties
            .display_name_of(&entry.party_id, Some(entry.party_name.as_str()));
        let mut line = format!(
            "  {:<6} {} → {}  {}",
            entry.party_id,
            format_date(entry.start),
            format_date(entry.end),
            name
        );
        if entry.is_reelection() {
            line.push_str(&format!(" ({} periods)", entry.period_count));
        }
        out.push_str(&line);
        out.push('\n');
    }
    let returning = returning_parties(merged);
    if !returning.is_empty() {
        out.push_str(&format!("  returned to: {}\n", returning.join(", ")));
    }
    out
}

fn format_date(date: NaiveDateTime) -> String {
    if date == OPEN_END {
        return "present".to_string();
    }
    date.format("%Y-%m-%d").to_string()
}

fn parse_as_of(value: &str) -> Result<NaiveDateTime> {
    parse_feed_date(value).ok_or_else(|| anyhow::anyhow!("Invalid --as-of date: {value}"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {ext} output"))
}
