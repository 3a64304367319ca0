//! ungz - restore files from gzip archives
//!
//! Decodes single-member gzip files whose DEFLATE payload uses dynamic
//! Huffman blocks and writes the recovered bytes to a file named from the
//! header's FNAME field.

use std::process;

mod bits;
mod cli;
mod codelen;
mod error;
mod gunzip;
mod header;
mod huffman;
mod inflate;
mod window;

#[cfg(test)]
#[macro_use]
mod test_utils;

use cli::UngzArgs;
use error::UngzError;

const VERSION: &str = concat!("ungz ", env!("CARGO_PKG_VERSION"));

fn main() {
    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("ungz: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, UngzError> {
    let args = UngzArgs::parse()?;

    if args.version {
        println!("{}", VERSION);
        return Ok(0);
    }

    if args.help {
        print_help();
        return Ok(0);
    }

    if args.files.is_empty() {
        return Err(UngzError::invalid_argument(
            "no input files (try --help)",
        ));
    }

    if args.list && args.verbosity > 0 {
        println!(
            "{:>12} {:>12} {:>7}  name",
            "compressed", "uncompressed", "ratio"
        );
    }

    let mut exit_code = 0;
    for file in &args.files {
        let result = if args.list {
            gunzip::list_file(file, &args)
        } else {
            gunzip::decompress_file(file, &args)
        };

        match result {
            Ok(code) => {
                if code != 0 {
                    exit_code = code;
                }
            }
            Err(e) => {
                eprintln!("ungz: {}: {}", file, e);
                exit_code = 1;
            }
        }
    }

    Ok(exit_code)
}

fn print_help() {
    println!("Usage: ungz [OPTION]... FILE...");
    println!();
    println!("Restore files from gzip archives compressed with dynamic Huffman");
    println!("DEFLATE blocks. Each output file is named from the archive's stored");
    println!("file name and created next to the input.");
    println!();
    println!("Options:");
    println!("  -f, --force      Overwrite existing output files");
    println!("  -l, --list       Show archive contents without extracting");
    println!("  -q, --quiet      Suppress non-error output");
    println!("  -v, --verbose    Show decompression statistics");
    println!("  -h, --help       Show this help");
    println!("  -V, --version    Show version");
    println!();
    println!("Examples:");
    println!("  ungz backup.gz           Restore the file stored in backup.gz");
    println!("  ungz -l *.gz             List stored names and sizes");
}
