//! MCAM binary decoder
//!
//! Layout (little-endian):
//!
//! | field               | type                      |
//! |---------------------|---------------------------|
//! | magic               | 4 bytes, `MCAM` or `MMC2` |
//! | version             | u32, 1 to 3               |
//! | declared file size  | u32, must equal length    |
//! | creation timestamp  | u64, 100 ns since 1601    |
//! | units flag          | u8, 0 mm / 1 inch         |
//! | vertex count        | u32, then (f32 x3) each   |
//! | face count          | u32, then (u32 x3) each   |
//! | toolpath count      | u16                       |
//! | per toolpath        | u16 tool, u32 points, then (f32 x, y, z, feed) each |
//!
//! Any decode failure falls back to reading the bytes as G-code text; the
//! original error is returned when that yields no motion either.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use camkit_core::{MotionPoint, Toolpath, Units, ValidationIssue};

use super::reader::ByteReader;
use crate::error::{DecodeError, DecodeResult};
use crate::gcode::GcodeParser;

/// Accepted file magics
pub const MAGICS: [&[u8; 4]; 2] = [b"MCAM", b"MMC2"];

/// Supported format versions
pub const SUPPORTED_VERSIONS: std::ops::RangeInclusive<u32> = 1..=3;

pub const MAX_VERTICES: u32 = 1_000_000;
pub const MAX_FACES: u32 = 2_000_000;
pub const MAX_TOOLPATHS: u16 = 1000;

const VERTEX_SIZE: usize = 12;
const FACE_SIZE: usize = 12;
const POINT_SIZE: usize = 16;

/// Milliseconds between 1601-01-01 and 1970-01-01
const FILETIME_EPOCH_OFFSET_MS: i64 = 11_644_473_600_000;

/// Whether a buffer starts with an MCAM magic
pub fn has_mcam_magic(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && MAGICS.iter().any(|m| &bytes[..4] == m.as_slice())
}

/// Convert 100 ns ticks since 1601 to a UTC timestamp
pub fn filetime_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    let ms = (ticks / 10_000) as i64 - FILETIME_EPOCH_OFFSET_MS;
    DateTime::from_timestamp_millis(ms)
}

/// Decoded file header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McamHeader {
    pub magic: String,
    pub version: u32,
    pub file_size: u32,
    /// Raw 100 ns ticks since 1601-01-01
    pub creation_timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub units: Units,
}

/// Mesh carried by the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McamGeometry {
    pub vertices: Vec<[f32; 3]>,
    /// Triangles as indices into `vertices`
    pub faces: Vec<[u32; 3]>,
}

/// Fully decoded binary file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McamFile {
    pub header: McamHeader,
    pub geometry: McamGeometry,
    pub toolpaths: Vec<Toolpath>,
}

/// Where a decode result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeSource {
    #[default]
    Binary,
    /// Bytes were not valid MCAM but parsed as G-code text
    GcodeFallback,
}

/// Result of [`McamDecoder::decode`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<McamHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<McamGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolpaths: Option<Vec<Toolpath>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub source: DecodeSource,
    /// Findings from the G-code fallback parse
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationIssue>,
}

impl DecodeOutcome {
    fn failure(err: &DecodeError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    /// All toolpaths concatenated in file order
    pub fn combined_toolpath(&self) -> Toolpath {
        let mut combined = Toolpath::new();
        for toolpath in self.toolpaths.iter().flatten() {
            combined.extend(toolpath.iter().cloned());
        }
        combined
    }
}

/// Decoder for MCAM binary files
#[derive(Debug, Clone, Default)]
pub struct McamDecoder {
    parser: GcodeParser,
}

impl McamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode bytes, falling back to G-code text on failure
    pub fn decode(&self, bytes: &[u8]) -> DecodeOutcome {
        match self.decode_binary(bytes) {
            Ok(file) => {
                info!(
                    "Decoded MCAM v{}: {} vertices, {} faces, {} toolpaths",
                    file.header.version,
                    file.geometry.vertices.len(),
                    file.geometry.faces.len(),
                    file.toolpaths.len()
                );
                DecodeOutcome {
                    success: true,
                    units: Some(file.header.units),
                    header: Some(file.header),
                    geometry: Some(file.geometry),
                    toolpaths: Some(file.toolpaths),
                    error: None,
                    source: DecodeSource::Binary,
                    warnings: Vec::new(),
                }
            }
            Err(err) => self.fallback(bytes, err),
        }
    }

    fn fallback(&self, bytes: &[u8], err: DecodeError) -> DecodeOutcome {
        let text = String::from_utf8_lossy(bytes);
        let parsed = self.parser.parse(&text);
        if parsed.toolpaths.iter().any(|t| !t.is_empty()) {
            warn!("Binary decode failed ({}), loaded as G-code text instead", err);
            return DecodeOutcome {
                success: true,
                header: None,
                geometry: None,
                units: Some(parsed.units),
                toolpaths: Some(parsed.toolpaths),
                error: None,
                source: DecodeSource::GcodeFallback,
                warnings: parsed.warnings,
            };
        }
        warn!("Binary decode failed: {}", err);
        DecodeOutcome::failure(&err)
    }

    /// Strict binary decode with no fallback
    pub fn decode_binary(&self, bytes: &[u8]) -> DecodeResult<McamFile> {
        let mut reader = ByteReader::new(bytes);
        let header = read_header(&mut reader)?;
        let geometry = read_geometry(&mut reader)?;
        let toolpaths = read_toolpaths(&mut reader)?;
        if reader.remaining() > 0 {
            debug!("Ignoring {} trailing bytes", reader.remaining());
        }
        Ok(McamFile {
            header,
            geometry,
            toolpaths,
        })
    }
}

fn read_header(reader: &mut ByteReader<'_>) -> DecodeResult<McamHeader> {
    let magic = reader.read_tag::<4>("header.magic")?;
    if !MAGICS.iter().any(|m| **m == magic) {
        return Err(DecodeError::format(format!(
            "Invalid MCAM magic {:?}",
            String::from_utf8_lossy(&magic)
        )));
    }

    let version = reader.read_u32("header.version")?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(DecodeError::format(format!(
            "Unsupported MCAM version {}",
            version
        )));
    }

    let file_size = reader.read_u32("header.file_size")?;
    if file_size as usize != reader.len() {
        return Err(DecodeError::format(format!(
            "Declared file size {} does not match buffer length {}",
            file_size,
            reader.len()
        )));
    }

    let creation_timestamp = reader.read_u64("header.creation_timestamp")?;
    let flag = reader.read_u8("header.units")?;
    let units = Units::from_flag(flag)
        .ok_or_else(|| DecodeError::format(format!("Invalid units flag {}", flag)))?;

    Ok(McamHeader {
        magic: String::from_utf8_lossy(&magic).into_owned(),
        version,
        file_size,
        creation_timestamp,
        created_at: filetime_to_datetime(creation_timestamp),
        units,
    })
}

/// Fail before allocating when `count` elements of `size` bytes cannot fit
fn require_array(
    reader: &ByteReader<'_>,
    element: &str,
    count: usize,
    size: usize,
) -> DecodeResult<()> {
    let needed = count.saturating_mul(size);
    if needed <= reader.remaining() {
        return Ok(());
    }
    let first_missing = reader.remaining() / size;
    Err(DecodeError::bounds(
        format!("{}[{}]", element, first_missing),
        format!(
            "{} elements of {} bytes declared at offset {}, only {} bytes remain",
            count,
            size,
            reader.offset(),
            reader.remaining()
        ),
    ))
}

fn read_geometry(reader: &mut ByteReader<'_>) -> DecodeResult<McamGeometry> {
    let vertex_count = reader.read_u32("vertex_count")?;
    if vertex_count > MAX_VERTICES {
        return Err(DecodeError::bounds(
            "vertex_count",
            format!("{} exceeds the limit of {}", vertex_count, MAX_VERTICES),
        ));
    }
    require_array(reader, "vertex", vertex_count as usize, VERTEX_SIZE)?;

    let mut vertices = Vec::with_capacity(vertex_count as usize);
    for i in 0..vertex_count {
        let x = reader.read_f32(&format!("vertex[{}].x", i))?;
        let y = reader.read_f32(&format!("vertex[{}].y", i))?;
        let z = reader.read_f32(&format!("vertex[{}].z", i))?;
        vertices.push([x, y, z]);
    }

    let face_count = reader.read_u32("face_count")?;
    if face_count > MAX_FACES {
        return Err(DecodeError::bounds(
            "face_count",
            format!("{} exceeds the limit of {}", face_count, MAX_FACES),
        ));
    }
    require_array(reader, "face", face_count as usize, FACE_SIZE)?;

    let mut faces = Vec::with_capacity(face_count as usize);
    for i in 0..face_count {
        let mut face = [0u32; 3];
        for (corner, slot) in face.iter_mut().enumerate() {
            let index = reader.read_u32(&format!("face[{}].{}", i, corner))?;
            if index >= vertex_count {
                return Err(DecodeError::format(format!(
                    "Face {} references vertex {} but only {} vertices exist",
                    i, index, vertex_count
                )));
            }
            *slot = index;
        }
        faces.push(face);
    }

    Ok(McamGeometry { vertices, faces })
}

fn read_toolpaths(reader: &mut ByteReader<'_>) -> DecodeResult<Vec<Toolpath>> {
    let count = reader.read_u16("toolpath_count")?;
    if count > MAX_TOOLPATHS {
        return Err(DecodeError::bounds(
            "toolpath_count",
            format!("{} exceeds the limit of {}", count, MAX_TOOLPATHS),
        ));
    }

    let mut toolpaths = Vec::with_capacity(count as usize);
    for t in 0..count {
        let tool = reader.read_u16(&format!("toolpath[{}].tool_number", t))? as u32;
        let point_count = reader.read_u32(&format!("toolpath[{}].point_count", t))?;
        require_array(
            reader,
            &format!("toolpath[{}].point", t),
            point_count as usize,
            POINT_SIZE,
        )?;

        let mut toolpath = Toolpath::new();
        toolpath.tool_id = Some(tool);
        for i in 0..point_count {
            let field = |name: &str| format!("toolpath[{}].point[{}].{}", t, i, name);
            let x = reader.read_f32(&field("x"))? as f64;
            let y = reader.read_f32(&field("y"))? as f64;
            let z = reader.read_f32(&field("z"))? as f64;
            let feed = reader.read_f32(&field("feed"))? as f64;

            let point = if i == 0 {
                MotionPoint::rapid(x, y, z)
            } else {
                MotionPoint::linear(x, y, z).with_feed(feed)
            };
            toolpath.push(point.with_tool(tool));
        }
        debug!("Toolpath {}: tool {}, {} points", t, tool, toolpath.len());
        toolpaths.push(toolpath);
    }

    Ok(toolpaths)
}
