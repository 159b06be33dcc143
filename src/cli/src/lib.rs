//! # cli
//! Argument parsing and the per-file run loop. Record lines go to
//! stdout; all progress and warnings go to stderr through the logger.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "extract WPA/WPA2 4-way handshakes from pcap captures", long_about = None)]
struct Args {
    /// pcap capture files to scan
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// upper bound on tracked networks (each one retains buffers)
    #[arg(long, default_value_t = wpa::MAX_NETWORKS)]
    max_networks: usize,
}

pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // one directory for the whole run, so an exchange split across
    // input files still correlates
    let mut directory = wpa::NetworkDirectory::with_limit(args.max_networks);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in &args.files {
        let mut reader = match capfile::Reader::open(path) {
            Ok(reader) => reader,
            Err(err) => {
                // a file that cannot be opened or framed is skipped;
                // the run goes on with the next one
                error!("{}: {}", path.display(), err);
                continue;
            }
        };

        match wpa::process_capture(&mut reader, &mut directory, &mut out) {
            Ok(summary) => info!(
                "{}: {} frames, {} tentative, {} confirmed",
                path.display(),
                summary.frames,
                summary.tentative,
                summary.confirmed
            ),
            Err(err) => {
                return Err(err).with_context(|| format!("processing {}", path.display()));
            }
        }
        out.flush()?;
    }
    Ok(())
}
