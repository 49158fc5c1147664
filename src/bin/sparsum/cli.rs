use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sparsum", about = "Print sparse fingerprints of files")]
pub struct Cli {
    /// Files or directories to fingerprint (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Include only files matching these glob patterns
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Exclude files matching these glob patterns
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Digest primitive fed with the sampled bytes
    #[arg(long, value_enum, default_value = "blake3")]
    pub algorithm: Algorithm,

    /// Bytes hashed from each sample window (0 hashes every input in full)
    #[arg(long, value_name = "BYTES")]
    pub sample_size: Option<u64>,

    /// Files smaller than this many bytes are hashed in full
    #[arg(long, value_name = "BYTES")]
    pub size_threshold: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Blake3,
    Murmur3,
}
