//! Per-file decompression front end.
//!
//! Opens and memory-maps the input, parses the member header, then streams
//! the DEFLATE payload through the decoder into a file named from the
//! stored FNAME field.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::cli::UngzArgs;
use crate::error::{UngzError, UngzResult};
use crate::header::{self, GzipHeader, TRAILER_SIZE};
use crate::inflate::Inflater;

/// Output buffer size (256KB for better throughput).
const STREAM_BUFFER_SIZE: usize = 256 * 1024;

pub fn decompress_file(filename: &str, args: &UngzArgs) -> UngzResult<i32> {
    if filename == "-" {
        return Err(UngzError::invalid_argument(
            "reading from standard input is not supported",
        ));
    }

    let input_path = Path::new(filename);
    if !input_path.exists() {
        return Err(UngzError::FileNotFound(filename.to_string()));
    }
    if input_path.is_dir() {
        return Err(UngzError::invalid_argument(format!(
            "{} is a directory",
            filename
        )));
    }

    let input_file = File::open(input_path)?;
    let mmap = unsafe { Mmap::map(&input_file)? };

    let header = GzipHeader::parse(&mmap)?;
    let stored_name = header
        .name
        .as_deref()
        .ok_or(UngzError::InvalidHeader("member has no stored file name"))?;
    let output_path = output_path_for(input_path, stored_name);

    if output_path.exists() && !args.force {
        return Err(UngzError::invalid_argument(format!(
            "output file {} already exists (use --force to overwrite)",
            output_path.display()
        )));
    }

    if mmap.len() < header.header_len + TRAILER_SIZE {
        return Err(UngzError::UnexpectedEof);
    }
    let deflate_data = &mmap[header.header_len..mmap.len() - TRAILER_SIZE];

    let output_file = File::create(&output_path)?;
    let mut writer = BufWriter::with_capacity(STREAM_BUFFER_SIZE, output_file);

    let mut inflater = Inflater::new(deflate_data);
    let result = inflater.inflate(&mut writer).and_then(|size| {
        writer.flush()?;
        Ok(size)
    });
    drop(writer);

    match result {
        Ok(output_size) => {
            if args.verbosity > 1 && !args.quiet {
                print_decompression_stats(
                    filename,
                    &output_path,
                    mmap.len() as u64,
                    output_size,
                    inflater.blocks(),
                );
            }
            Ok(0)
        }
        Err(e) => {
            let _ = fs::remove_file(&output_path);
            Err(e)
        }
    }
}

/// Show member metadata without decompressing.
pub fn list_file(filename: &str, args: &UngzArgs) -> UngzResult<i32> {
    let input_path = Path::new(filename);
    if !input_path.exists() {
        return Err(UngzError::FileNotFound(filename.to_string()));
    }

    let input_file = File::open(input_path)?;
    let mmap = unsafe { Mmap::map(&input_file)? };

    let header = GzipHeader::parse(&mmap)?;
    let isize = header::read_isize(&mmap)? as u64;
    let compressed = mmap.len() as u64;
    let saved = isize.saturating_sub(compressed);

    println!(
        "{:>12} {:>12} {:>7}  {}",
        compressed,
        isize,
        format_percentage(saved, isize),
        header.name.as_deref().unwrap_or("-"),
    );
    if args.verbose {
        eprintln!(
            "ungz: {}: flags {:#04x}, mtime {}, xfl {}, os {}",
            filename, header.flags, header.mtime, header.xfl, header.os
        );
    }
    Ok(0)
}

/// The output lands next to the input, named by the final component of the
/// stored name. Any directory part the encoder put in FNAME is dropped.
fn output_path_for(input: &Path, stored_name: &str) -> PathBuf {
    let base = Path::new(stored_name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("gzip.out"));
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(base),
        _ => PathBuf::from(base),
    }
}

fn print_decompression_stats(
    filename: &str,
    output_path: &Path,
    compressed: u64,
    output_size: u64,
    blocks: usize,
) {
    eprintln!(
        "ungz: {}: {} -> {} ({}, {} block{}) -> {}",
        filename,
        format_size(compressed),
        format_size(output_size),
        format_percentage(output_size.saturating_sub(compressed), output_size),
        blocks,
        if blocks == 1 { "" } else { "s" },
        output_path.display()
    );
}

fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.0} {}", size, UNITS[unit])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

fn format_percentage(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        "N/A".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}
