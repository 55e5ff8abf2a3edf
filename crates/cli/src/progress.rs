//! Progress reporting and summaries for CLI

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use skucurate_core::{CurationStats, SeedMergeStats};

/// Progress bar over curated groups
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a reporter for `total_groups`; hidden when `quiet`
    pub fn new(total_groups: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_groups)
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {human_pos}/{human_len} groups ({per_sec}) {msg}")
        {
            bar.set_style(style.progress_chars("█▓▒░-"));
        }
        bar.set_message("Curating...");
        Self { bar }
    }

    /// Record the number of groups finished so far
    pub fn update(&self, done: usize) {
        // workers finish out of order; never move the bar backwards
        if done as u64 > self.bar.position() {
            self.bar.set_position(done as u64);
        }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Complete!");
    }
}

/// Print the export summary
pub fn print_export_report(input: &Path, output: &Path, stats: &CurationStats) {
    println!("\n{}", "═".repeat(60));
    println!("SKU Curation Export Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());
    println!("Output:             {}", output.display());
    println!("Aliases read:       {}", format_with_commas(stats.total_aliases));
    println!("SKUs curated:       {}", format_with_commas(stats.total_groups));
    println!(
        "AUTO:               {} ({:.1}%)",
        format_with_commas(stats.auto),
        stats.auto_rate()
    );
    println!("NEED_APPROVAL:      {}", format_with_commas(stats.need_approval));
    println!("{}", "═".repeat(60));
}

/// Print the seed merge summary
pub fn print_seed_report(seed_path: &Path, rows: usize, version: &str, stats: &SeedMergeStats) {
    println!("\n{}", "═".repeat(60));
    println!("Seed Updated");
    println!("{}", "═".repeat(60));
    println!("Seed:               {}", seed_path.display());
    println!("Version:            {}", version);
    println!("Rows:               {}", format_with_commas(rows));
    println!("Inserted:           {}", format_with_commas(stats.inserted));
    println!("Replaced:           {}", format_with_commas(stats.replaced));
    println!("Kept (higher prio): {}", format_with_commas(stats.kept));
    println!(
        "Awaiting approval:  {}",
        format_with_commas(stats.skipped_need_approval)
    );
    println!("{}", "═".repeat(60));
}

/// Format number with thousand separators
fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
