//! search-bench entry point.

use colored::Colorize;

fn main() {
    if let Err(e) = search_bench_cli::run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
