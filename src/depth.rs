//! Depth image conversion for the external grasp model.
//!
//! Rendered depth PNGs store millimeters as 16-bit grayscale; the model wants
//! a float32 array in meters with an explicit trailing channel dimension,
//! persisted in NPY format. The conversion is a direct cast-scale-reshape;
//! wrong bit depths or sizes are not validated beyond what decoding enforces.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ImageReader;
use log::info;

use crate::error::Result;

/// Depth image as a float array with logical shape (height, width, 1).
#[derive(Debug, Clone, PartialEq)]
pub struct DepthArray {
    /// Rows
    pub height: u32,
    /// Columns
    pub width: u32,
    /// Row-major samples, one channel per pixel
    pub data: Vec<f32>,
}

impl DepthArray {
    /// Array shape as (rows, columns, channels)
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.height, self.width, 1)
    }

    /// Convert assumed millimeter samples to meters.
    pub fn to_meters(mut self) -> Self {
        for value in &mut self.data {
            *value /= 1000.0;
        }
        self
    }

    /// Serialize as NPY format version 1.0: little-endian float32, C order,
    /// shape `(height, width, 1)`.
    pub fn write_npy(&self, path: &Path) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);

        let dict = format!(
            "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {}, 1), }}",
            self.height, self.width
        );
        // magic (6) + version (2) + header length (2) + dict + padding + '\n'
        // must total a multiple of 64
        let unpadded = 6 + 2 + 2 + dict.len() + 1;
        let padding = (64 - unpadded % 64) % 64;
        let header_len = (dict.len() + padding + 1) as u16;

        file.write_all(b"\x93NUMPY")?;
        file.write_all(&[0x01, 0x00])?;
        file.write_all(&header_len.to_le_bytes())?;
        file.write_all(dict.as_bytes())?;
        file.write_all(&b" ".repeat(padding))?;
        file.write_all(b"\n")?;

        for value in &self.data {
            file.write_all(&value.to_le_bytes())?;
        }
        file.flush()?;
        Ok(())
    }
}

/// Decode a depth PNG into a float array, logging image diagnostics.
pub fn load_depth_png(path: &Path) -> Result<DepthArray> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?;

    if let Some(format) = format {
        info!("Image format: {:?}", format);
    }
    info!("Image size: {}x{}", image.width(), image.height());
    info!("Image color: {:?}", image.color());

    let gray = image.into_luma16();
    let (width, height) = gray.dimensions();
    let data = gray.pixels().map(|pixel| f32::from(pixel.0[0])).collect();

    Ok(DepthArray {
        height,
        width,
        data,
    })
}

/// Output path for a converted image: strip a trailing `.png`, then a
/// trailing `_raw`, and append `.npy`.
///
/// `0_depth_raw.png` becomes `0_depth.npy`.
pub fn derived_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".png").unwrap_or(&name);
    let stem = stem.strip_suffix("_raw").unwrap_or(stem);
    input.with_file_name(format!("{stem}.npy"))
}
