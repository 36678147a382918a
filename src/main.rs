use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use svgpress::{Options, Registry, SvgMinifier, minify};

#[derive(Parser)]
#[command(name = "svgpress")]
#[command(about = "A streaming SVG minifier", long_about = None)]
struct Cli {
    /// Input file (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Round path coordinates to this many decimal places
    #[arg(short, long)]
    precision: Option<u8>,

    /// Leave <style> content and style attributes unminified
    #[arg(long)]
    no_css: bool,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(&cli.input)?
    };

    let options = Options {
        precision: cli.precision,
    };
    let registry = if cli.no_css {
        let mut registry = Registry::new();
        registry.add("image/svg+xml", SvgMinifier::new(options));
        registry
    } else {
        Registry::with_defaults()
    };

    // Minify
    let mut output = Vec::with_capacity(input.len());
    minify(&registry, &mut output, input.as_slice(), &options)?;

    // Write output
    if cli.output.as_os_str() == "-" {
        io::stdout().lock().write_all(&output)?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    // Print stats if requested
    if cli.stats {
        let saved = input.len().saturating_sub(output.len());
        let percent = if input.is_empty() {
            0.0
        } else {
            (saved as f64 / input.len() as f64) * 100.0
        };
        eprintln!(
            "{} -> {} bytes ({:.1}% smaller)",
            input.len(),
            output.len(),
            percent
        );
    }

    Ok(())
}
