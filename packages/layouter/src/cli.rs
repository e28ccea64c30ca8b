//! Command-line interface for the layouter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::{
    validate_max_depth, ParseOptions, DEFAULT_MAX_DEPTH, GEOGEBRA_XML_NAME, OUTPUT_SUFFIX,
};
use crate::error::Result;
use crate::layout::{GeoGebraDocument, LayoutConfig};
use crate::schema::ggb_registry;

/// GeoGebra Layouter - Apply a JSON layout to an extracted GeoGebra file.
#[derive(Parser)]
#[command(name = "ggb-layouter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a layout file to a geogebra.xml document.
    Apply {
        /// Layout file (JSON)
        layout: PathBuf,

        /// Extracted geogebra.xml, or the directory containing it
        xml: PathBuf,

        /// Output file (default: <input stem>_layouted.xml next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum element nesting depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Parse and re-serialize a document without styling it.
    Normalize {
        /// Extracted geogebra.xml, or the directory containing it
        xml: PathBuf,

        /// Output file (default: standard output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum element nesting depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            layout,
            xml,
            output,
            max_depth,
        } => apply_command(&layout, &xml, output.as_deref(), max_depth),
        Commands::Normalize {
            xml,
            output,
            max_depth,
        } => normalize_command(&xml, output.as_deref(), max_depth),
    }
}

/// Resolve the XML input: a directory stands for its `geogebra.xml`.
pub fn resolve_xml_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(GEOGEBRA_XML_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Default output path: `<stem>_layouted.<ext>` beside the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "geogebra".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "xml".to_string());
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{extension}"))
}

fn load_document(xml_path: &Path, max_depth: usize) -> Result<GeoGebraDocument<'static>> {
    let options = ParseOptions::default().with_max_depth(validate_max_depth(max_depth)?);
    let text = fs::read_to_string(xml_path)?;
    tracing::debug!(path = %xml_path.display(), bytes = text.len(), "read document");
    GeoGebraDocument::parse_with(ggb_registry(), &text, options)
}

/// Execute the apply command.
fn apply_command(
    layout_path: &Path,
    xml: &Path,
    output: Option<&Path>,
    max_depth: usize,
) -> Result<()> {
    let xml_path = resolve_xml_path(xml);
    let layout = LayoutConfig::from_path(layout_path)?;

    println!(
        "{} {} with {}",
        style("Layouting").bold(),
        style(xml_path.display()).cyan(),
        style(layout_path.display()).green()
    );

    let mut doc = load_document(&xml_path, max_depth)?;
    let report = doc.apply_layout(&layout)?;

    let output_path = output.map_or_else(|| default_output_path(&xml_path), Path::to_path_buf);
    fs::write(&output_path, doc.xml_repr())?;

    println!("  Views recoloured: {}", report.background_views);
    println!("  Captions: {}", report.captions);
    println!("  Line styles: {}", report.line_styles);
    println!("  Axes: {} in {} views", report.axes, report.axes_views);
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    Ok(())
}

/// Execute the normalize command.
fn normalize_command(xml: &Path, output: Option<&Path>, max_depth: usize) -> Result<()> {
    let xml_path = resolve_xml_path(xml);
    let doc = load_document(&xml_path, max_depth)?;
    let text = doc.xml_repr();

    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
