//! mk_background.rs - one-shot CLI to convert a raw RGB888 image dump
//! into the little-endian RGB565 `.bin` the renderer loads.
//!
//! USAGE:
//! ```bash
//! cargo run --bin mk_background -- \
//!     --input field.rgb \
//!     --output assets/field.bin
//! ```
//!
//! The input is expected as tightly packed R,G,B byte triplets, e.g. the
//! output of `convert field.png -depth 8 rgb:field.rgb`.

use anyhow::{bail, Context};
use byteorder::{LittleEndian, WriteBytesExt};
use clap::Parser;
use std::{fs, path::PathBuf};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Raw RGB888 input image
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Destination `.bin` file
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Expected pixel width
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Expected pixel height
    #[arg(long, default_value_t = 240)]
    height: usize,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let rgb = fs::read(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let expected = opts.width * opts.height * 3;
    if rgb.len() != expected {
        bail!(
            "{} is {} bytes, expected {} ({}x{} RGB888)",
            opts.input.display(),
            rgb.len(),
            expected,
            opts.width,
            opts.height
        );
    }

    let packed = pack_rgb565(&rgb)?;
    fs::write(&opts.output, &packed)
        .with_context(|| format!("writing {}", opts.output.display()))?;

    println!(
        "wrote {} ({} pixels, {} bytes)",
        opts.output.display(),
        opts.width * opts.height,
        packed.len()
    );
    Ok(())
}

/// Quantize 8:8:8 triplets down to packed little-endian 5:6:5.
fn pack_rgb565(rgb: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(rgb.len() / 3 * 2);
    for px in rgb.chunks_exact(3) {
        let (r, g, b) = (u16::from(px[0]), u16::from(px[1]), u16::from(px[2]));
        let packed = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
        out.write_u16::<LittleEndian>(packed)?;
    }
    Ok(out)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn packs_pure_channels() {
        // red, green, blue, white
        let rgb = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let out = pack_rgb565(&rgb).unwrap();
        assert_eq!(out, [0x00, 0xF8, 0xE0, 0x07, 0x1F, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn round_trips_through_a_file() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input.write_all(&[255, 255, 255, 0, 0, 0]).unwrap();

        let rgb = fs::read(input.path()).unwrap();
        let packed = pack_rgb565(&rgb).unwrap();
        assert_eq!(packed, [0xFF, 0xFF, 0x00, 0x00]);
    }
}
