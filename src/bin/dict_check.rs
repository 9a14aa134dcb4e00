//! Dictionary self-check driver.
//!
//! Loads a newline-separated dictionary, inserts every entry into a
//! [`RadixSet`], then looks every entry back up.
//!
//! Usage:
//!   dict_check <path_to_dictionary>
//!
//! Exits non-zero on a wrong argument count, an unreadable file, a duplicate
//! dictionary entry, or any entry that fails the lookup pass.

use radix_set::RadixSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process;

fn main() {
    let mut args = std::env::args().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => {
            eprintln!("Usage: dict_check <path_to_dictionary>");
            process::exit(2);
        }
    };

    let entries = match read_entries(Path::new(&path)) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("dict_check: {}: {}", path, err);
            process::exit(1);
        }
    };

    let mut set = RadixSet::new();
    for (lineno, entry) in entries.iter().enumerate() {
        if !set.insert(entry) {
            eprintln!(
                "dict_check: duplicate entry at line {}: {}",
                lineno + 1,
                String::from_utf8_lossy(entry)
            );
            process::exit(1);
        }
    }

    let missing = entries.iter().filter(|e| !set.contains(e)).count();
    if missing > 0 {
        eprintln!("dict_check: {} entries missing after insertion", missing);
        process::exit(1);
    }

    let stats = set.stats();
    println!("Checked {} entries from {}", set.len(), path);
    println!("  Nodes: {} ({} leaves)", stats.node_count, stats.leaf_count);
    println!("  Fragment bytes: {}", stats.fragment_bytes);
    println!(
        "  Total: {} bytes ({:.1} per key)",
        stats.total_bytes, stats.bytes_per_key
    );
}

/// Read the dictionary as raw byte entries, one per line. Blank lines are
/// valid, distinct empty entries.
fn read_entries(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    let file = File::open(path)?;
    BufReader::new(file).split(b'\n').collect()
}
