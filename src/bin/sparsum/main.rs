mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use sparsum::{Murmur3x128, SparseHasher, DEFAULT_SAMPLE_SIZE, DEFAULT_SIZE_THRESHOLD};

use cli::{Algorithm, Cli};
use config::Config;

struct Options {
    recursive: bool,
    follow_symlinks: bool,
    hidden: bool,
    include: GlobSet,
    exclude: GlobSet,
}

impl Options {
    fn from_args_and_config(args: &Cli, config: &Config) -> Result<Self> {
        // CLI include/exclude take priority; fall back to config
        let include_globs: Vec<&str> = if !args.include.is_empty() {
            args.include.iter().map(|s| s.as_str()).collect()
        } else {
            config.include.iter().map(|s| s.as_str()).collect()
        };
        let exclude_globs: Vec<&str> = if !args.exclude.is_empty() {
            args.exclude.iter().map(|s| s.as_str()).collect()
        } else {
            config.exclude.iter().map(|s| s.as_str()).collect()
        };

        Ok(Self {
            recursive: args.recursive || config.recursive,
            follow_symlinks: args.follow_symlinks || config.follow_symlinks,
            hidden: args.hidden || config.hidden,
            include: build_globset(&include_globs)?,
            exclude: build_globset(&exclude_globs)?,
        })
    }

    fn file_included(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.is_match(name) {
            return false;
        }
        if self.exclude.is_match(name) {
            return false;
        }
        true
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let config = Config::load()?;
    let opts = Options::from_args_and_config(&args, &config)?;

    let sample_size = args
        .sample_size
        .or(config.sample_size)
        .unwrap_or(DEFAULT_SAMPLE_SIZE);
    let size_threshold = args
        .size_threshold
        .or(config.size_threshold)
        .unwrap_or(DEFAULT_SIZE_THRESHOLD);

    let hasher = match args.algorithm {
        Algorithm::Blake3 => {
            SparseHasher::with_policy(blake3::Hasher::new, sample_size, size_threshold)
        }
        Algorithm::Murmur3 => {
            SparseHasher::with_policy(Murmur3x128::new, sample_size, size_threshold)
        }
    }?;

    let paths = if args.paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        args.paths.clone()
    };

    let mut failures = 0usize;
    for path in &paths {
        if path.is_file() {
            // Explicitly named files bypass the include/exclude filters.
            hash_one(&hasher, path, &mut failures);
            continue;
        }
        for entry in walk(path, &opts) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy();
                    if !opts.file_included(&name) {
                        continue;
                    }
                    hash_one(&hasher, entry.path(), &mut failures);
                }
                Err(e) => {
                    eprintln!("sparsum: {e}");
                    failures += 1;
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("failed on {failures} path(s)");
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn hash_one(hasher: &SparseHasher, path: &Path, failures: &mut usize) {
    let result = hasher
        .sum_file(path)
        .with_context(|| format!("hashing {}", path.display()));
    match result {
        Ok(fp) => println!("{fp}  {}", path.display()),
        Err(e) => {
            eprintln!("sparsum: {e:#}");
            *failures += 1;
        }
    }
}

fn walk(
    root: &Path,
    opts: &Options,
) -> impl Iterator<Item = std::result::Result<DirEntry, walkdir::Error>> {
    let mut walker = WalkDir::new(root).follow_links(opts.follow_symlinks);
    if !opts.recursive {
        walker = walker.max_depth(1);
    }
    let hidden = opts.hidden;
    walker
        .into_iter()
        .filter_entry(move |e| hidden || e.depth() == 0 || !is_hidden(e))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p)?);
    }
    Ok(builder.build()?)
}
