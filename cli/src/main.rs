//! libpdf CLI - PDF structure resolution tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use libpdf::{
    extract, render, CropMargins, Element, ExtractOptions, JsonFormat, MemoryProvider,
    PageSelection,
};

#[derive(Parser)]
#[command(name = "libpdf")]
#[command(version)]
#[command(about = "Resolve PDF layouts into chapters, paragraphs, tables, figures and links", long_about = None)]
struct Cli {
    /// Input layout dump (JSON)
    #[arg(value_name = "LAYOUT")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a layout dump and write the document tree as JSON
    Json {
        /// Input layout dump (JSON)
        #[arg(value_name = "LAYOUT")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show structure statistics of a layout dump
    Info {
        /// Input layout dump (JSON)
        #[arg(value_name = "LAYOUT")]
        input: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct ExtractArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Do not detect chapters
    #[arg(long)]
    no_chapters: bool,

    /// Do not emit paragraphs
    #[arg(long)]
    no_paragraphs: bool,

    /// Do not extract tables
    #[arg(long)]
    no_tables: bool,

    /// Do not extract figures
    #[arg(long)]
    no_figures: bool,

    /// Do not extract rects
    #[arg(long)]
    no_rects: bool,

    /// Ignore link annotations
    #[arg(long)]
    no_annotations: bool,

    /// Remove text, tables and figures repeated in the top or bottom page margin
    #[arg(long)]
    smart_page_crop: bool,

    /// Classify pages on a single thread
    #[arg(long)]
    sequential: bool,

    /// Crop margins in points: TOP,BOTTOM,LEFT,RIGHT or a single value
    #[arg(long, value_name = "MARGINS")]
    crop: Option<String>,
}

impl ExtractArgs {
    fn to_options(&self) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
        let mut options = ExtractOptions::new().with_parallel(!self.sequential);

        if let Some(p) = &self.pages {
            options = options.with_pages(PageSelection::parse(p)?);
        }
        if let Some(c) = &self.crop {
            options = options.with_crop(parse_crop(c)?);
        }

        options.no_chapters = self.no_chapters;
        options.no_paragraphs = self.no_paragraphs;
        options.no_tables = self.no_tables;
        options.no_figures = self.no_figures;
        options.no_rects = self.no_rects;
        options.no_annotations = self.no_annotations;
        options.smart_page_crop = self.smart_page_crop;

        log::debug!("Options: {:?}", options);
        Ok(options)
    }
}

fn parse_crop(s: &str) -> Result<CropMargins, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid crop margins \"{}\": {}", s, e))?;

    match values.as_slice() {
        [all] => Ok(CropMargins::uniform(*all)),
        [top, bottom, left, right] => Ok(CropMargins {
            top: *top,
            bottom: *bottom,
            left: *left,
            right: *right,
        }),
        _ => Err(format!(
            "Invalid crop margins \"{}\": expected 1 or 4 values",
            s
        )),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Some(Commands::Json {
            input,
            output,
            compact,
            extract,
        }) => cmd_json(&input, output.as_deref(), compact, &extract),
        Some(Commands::Info { input, extract }) => cmd_info(&input, &extract),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: resolve to JSON if input is provided
            if let Some(input) = cli.input {
                cmd_json(&input, cli.output.as_deref(), cli.compact, &cli.extract)
            } else {
                println!("{}", "Usage: libpdf <LAYOUT> [-o OUTPUT]".yellow());
                println!("       libpdf --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    let provider = MemoryProvider::from_path(input)?;
    let root = extract(&provider, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&root, format)?;
    log::info!("Rendered {} bytes of JSON", json.len());

    if let Some(path) = output {
        fs::write(path, &json)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    let provider = MemoryProvider::from_path(input)?;
    let root = extract(&provider, &options)?;
    let flat = root.flattened();

    println!("{}", "Document Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), root.page_count());
    println!(
        "{}: {} ({} ghost)",
        "Chapters".bold(),
        flat.chapters.len(),
        flat.chapters.iter().filter(|c| c.is_ghost()).count()
    );
    println!("{}: {}", "Paragraphs".bold(), flat.paragraphs.len());
    println!("{}: {}", "Tables".bold(), flat.tables.len());
    println!("{}: {}", "Figures".bold(), flat.figures.len());
    println!("{}: {}", "Rects".bold(), flat.rects.len());

    let links = root.links();
    let to_elements = links
        .iter()
        .filter(|l| {
            l.libpdf_target
                .as_deref()
                .map_or(false, |t| !t.starts_with("page.") && !t.starts_with("unresolved/"))
        })
        .count();

    println!();
    println!("{}", "Links".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Total".bold(), links.len());
    println!("{}: {}", "To elements".bold(), to_elements);
    println!("{}: {}", "Fallback".bold(), links.len() - to_elements);

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print_chapters(&root.content, 0);

    Ok(())
}

fn print_chapters(elements: &[Element], depth: usize) {
    for element in elements {
        if let Element::Chapter(chapter) = element {
            let line = format!("{}{} {}", "  ".repeat(depth), chapter.number, chapter.title);
            if chapter.is_ghost() {
                println!("{}", line.dimmed());
            } else {
                println!("{}", line);
            }
            print_chapters(&chapter.content, depth + 1);
        }
    }
}

fn cmd_version() {
    println!("{} {}", "libpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF structure resolution tool");
    println!();
    println!("License: MIT");
}
