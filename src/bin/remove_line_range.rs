use std::path::PathBuf;

use clap::Parser;
use hbs_maintenance::line_range::{preview_removal, remove_lines_from_file, LineRange};
use hbs_maintenance::logging::init_tracing;

#[derive(Parser)]
#[command(name = "remove-line-range")]
#[command(about = "Remove a fixed range of lines from a file in place", long_about = None)]
struct Cli {
    /// File to rewrite (e.g. frontend/src/pages/Bookings.jsx)
    #[arg(long, env = "TARGET_FILE")]
    file: PathBuf,

    /// First line to remove, 0-indexed
    #[arg(long, default_value_t = LineRange::DEFAULT.start())]
    start: usize,

    /// Line to resume at, 0-indexed (exclusive)
    #[arg(long, default_value_t = LineRange::DEFAULT.end())]
    end: usize,

    /// Report the counts without touching the file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing("warn,hbs_maintenance=info");
    let cli = Cli::parse();

    let range = LineRange::new(cli.start, cli.end)?;

    let summary = if cli.dry_run {
        println!("Dry run: {} will not be modified", cli.file.display());
        preview_removal(&cli.file, range)?
    } else {
        remove_lines_from_file(&cli.file, range)?
    };

    println!("{summary}");

    Ok(())
}
