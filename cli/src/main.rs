//! pdfreq CLI - split PDF requirement documents from reviewer comments

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfreq::render::WrittenFiles;
use pdfreq::{
    parse_file_with_options, ExtractionSummary, JsonFormat, OutputWriter, PageSelection,
    ParseOptions,
};

#[derive(Parser, Debug)]
#[command(name = "pdfreq")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract requirements and reviewer comments from a PDF document",
    long_about = None
)]
struct Cli {
    /// Input PDF file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output directory (created if missing; its parent must exist)
    #[arg(short, long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Skip OCR for pages without extractable text
    #[arg(long)]
    no_ocr: bool,

    /// Rasterization resolution for OCR
    #[arg(long, default_value_t = 300, env = "PDFREQ_DPI")]
    dpi: u32,

    /// Tesseract language code
    #[arg(long, default_value = "eng", env = "PDFREQ_LANG")]
    lang: String,

    /// Do not write parsed_document.md
    #[arg(long)]
    no_markdown: bool,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message(format!("Parsing {}...", cli.input.display()));
    let result = match parse_file_with_options(&cli.input, options) {
        Ok(result) => result,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    pb.set_message("Writing output...");
    let written = prepare_output_dir(&cli.output_dir)
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(|()| {
            let format = if cli.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            OutputWriter::new()
                .with_format(format)
                .with_markdown(!cli.no_markdown)
                .write_result(&result, &cli.output_dir)
                .map_err(Into::into)
        });
    pb.finish_and_clear();
    let written = written?;

    print_summary(&result.summary, &written);
    Ok(())
}

fn build_options(cli: &Cli) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = &cli.pages {
        PageSelection::parse(p)?
    } else {
        PageSelection::All
    };

    let mut options = ParseOptions::new()
        .with_pages(page_selection)
        .with_dpi(cli.dpi)
        .with_language(cli.lang.clone());
    if cli.no_ocr {
        options = options.without_ocr();
    }
    Ok(options)
}

/// Create the output directory itself, never its parents.
fn prepare_output_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir(dir)
}

fn print_summary(summary: &ExtractionSummary, written: &WrittenFiles) {
    println!("{}", "Extraction Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), summary.pages);
    println!("{}: {}", "Blocks".bold(), summary.blocks);
    println!("{}: {}", "Comments".bold(), summary.annotations);
    if !summary.ocr_pages.is_empty() {
        println!("{}: {}", "OCR pages".bold(), join_pages(&summary.ocr_pages));
    }
    if !summary.skipped_pages.is_empty() {
        println!(
            "{}: {}",
            "Skipped pages".yellow().bold(),
            join_pages(&summary.skipped_pages)
        );
    }

    println!("\n{}", "Output files:".green().bold());
    let mut files = vec![&written.requirements, &written.comments];
    files.extend(written.report.as_ref());
    for (i, path) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
}

fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_arguments() {
        assert!(Cli::try_parse_from(["pdfreq", "-i", "doc.pdf"]).is_err());

        let cli = Cli::try_parse_from(["pdfreq", "-i", "doc.pdf", "-o", "out"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("doc.pdf"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert!(!cli.no_ocr);
    }

    #[test]
    fn test_build_options() {
        let cli = Cli::try_parse_from([
            "pdfreq",
            "--input",
            "doc.pdf",
            "--output-dir",
            "out",
            "--pages",
            "2-3",
            "--no-ocr",
            "--dpi",
            "200",
        ])
        .unwrap();
        let options = build_options(&cli).unwrap();
        assert!(!options.ocr.enabled);
        assert_eq!(options.ocr.dpi, 200);
        assert_eq!(options.pages, PageSelection::Range(2..=3));
    }

    #[test]
    fn test_invalid_pages_rejected() {
        let cli = Cli::try_parse_from(["pdfreq", "-i", "a.pdf", "-o", "out", "--pages", "0-2"])
            .unwrap();
        assert!(build_options(&cli).is_err());
    }

    #[test]
    fn test_prepare_output_dir_only_creates_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let leaf = dir.path().join("out");
        prepare_output_dir(&leaf).unwrap();
        assert!(leaf.is_dir());
        prepare_output_dir(&leaf).unwrap();

        let nested = dir.path().join("missing").join("out");
        assert!(prepare_output_dir(&nested).is_err());
    }

    #[test]
    fn test_join_pages() {
        assert_eq!(join_pages(&[1, 4, 7]), "1, 4, 7");
    }
}
