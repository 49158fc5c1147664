/// mktest — generate deterministic fingerprint fixtures under testdata/
///
/// Run with: cargo run --bin mktest
///
/// Wipes and recreates testdata/ from scratch. With the default policy
/// (16 KiB sample windows, 128 KiB full-hash threshold):
///   empty.bin       0 bytes    full mode
///   small.txt       12 bytes   full mode
///   boundary.bin    128 KiB    sampled mode (exactly at the threshold)
///   big_a.bin       256 KiB    sampled mode
///   big_gap.bin     256 KiB    differs from big_a.bin only between the
///                              sample windows — same fingerprint
///   big_edge.bin    256 KiB    differs from big_a.bin in the last byte of
///                              the leading window — different fingerprint

use std::fs;
use std::io::Write;
use std::path::Path;

const SIZE: usize = 256 * 1024;
const SAMPLE: usize = 16 * 1024;
const THRESHOLD: usize = 128 * 1024;

fn main() {
    let root = Path::new("testdata");

    // Wipe and recreate
    if root.exists() {
        fs::remove_dir_all(root).expect("remove testdata");
    }
    fs::create_dir_all(root).expect("create testdata");

    write_file(&root.join("empty.bin"), b"");
    write_file(&root.join("small.txt"), b"hello world\n");
    write_file(&root.join("boundary.bin"), &vec![0xabu8; THRESHOLD]);

    let base = vec![0xabu8; SIZE];
    write_file(&root.join("big_a.bin"), &base);

    // Flip bytes strictly between the windows: invisible to sampling.
    let mut gap = base.clone();
    gap[SAMPLE] = 0xcd;
    gap[SIZE - SAMPLE - 1] = 0xcd;
    write_file(&root.join("big_gap.bin"), &gap);

    // Flip the last byte of the leading window: visible.
    let mut edge = base.clone();
    edge[SAMPLE - 1] = 0xcd;
    write_file(&root.join("big_edge.bin"), &edge);

    println!("Test data created under testdata/");
    println!();
    println!("Expected with the default policy:");
    println!("  big_a.bin and big_gap.bin    same fingerprint");
    println!("  big_a.bin and big_edge.bin   different fingerprints");
    println!("  everything else              unique (sizes differ)");
    println!();
    println!("Try:");
    println!("  cargo run -- testdata --recursive");
    println!("  cargo run -- testdata --recursive --algorithm murmur3");
    println!("  cargo run -- testdata --recursive --size-threshold 1048576   # full mode everywhere");
}

fn write_file(path: &Path, content: &[u8]) {
    let mut f = fs::File::create(path)
        .unwrap_or_else(|e| panic!("create {}: {}", path.display(), e));
    f.write_all(content)
        .unwrap_or_else(|e| panic!("write {}: {}", path.display(), e));
}
