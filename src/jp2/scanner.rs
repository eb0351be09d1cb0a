//! Forward-only JP2 header scanner.
//!
//! This is not a box tree walker. After checking the 12-byte JP2 signature it
//! searches forward, byte by byte, for each token it cares about and reads a
//! fixed big-endian layout right after it:
//!
//! | Token | Fields |
//! |---|---|
//! | `ihdr` | height, width, components, bits per component |
//! | `colr` | method, precedence, approximation, enumerated colour space |
//! | `FF4F FF51` (SOC + SIZ) | lsiz, rsiz, image and tile geometry, csiz |
//! | `FF52` (COD) | lcod, scod, sgcod, decomposition levels |
//!
//! The reader never seeks, so any `Read` works, including a network stream.

use super::info::{ColorMethod, ColorSpace, Jp2Info};
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// The only JP2 signature box we accept.
pub const JP2_SIGNATURE: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0c, 0x6a, 0x50, 0x20, 0x20, 0x0d, 0x0a, 0x87, 0x0a,
];

const IHDR: &[u8] = b"ihdr";
const COLR: &[u8] = b"colr";
const SOC_SIZ: &[u8] = &[0xFF, 0x4F, 0xFF, 0x51];
const COD: &[u8] = &[0xFF, 0x52];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("unknown file format")]
    UnknownFormat,
}

/// Scan a JP2 file. The file is closed before this returns.
pub fn scan_file(path: &Path) -> Result<Jp2Info, ScanError> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "scanning JP2 header");
    scan(file)
}

/// Scan a JP2 header from any reader.
pub fn scan<R: Read>(reader: R) -> Result<Jp2Info, ScanError> {
    let mut r = BufReader::new(reader);

    let mut signature = [0u8; 12];
    match r.read_exact(&mut signature) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(ScanError::UnknownFormat),
        Err(e) => return Err(e.into()),
    }
    if signature != JP2_SIGNATURE {
        return Err(ScanError::UnknownFormat);
    }

    let mut info = Jp2Info::default();

    scan_until(&mut r, IHDR, "ihdr")?;
    read_ihdr(&mut r, &mut info).map_err(|e| context(e, "ihdr"))?;

    scan_until(&mut r, COLR, "colr")?;
    read_colr(&mut r, &mut info).map_err(|e| context(e, "colr"))?;

    scan_until(&mut r, SOC_SIZ, "SIZ")?;
    read_siz(&mut r, &mut info).map_err(|e| context(e, "SIZ"))?;

    scan_until(&mut r, COD, "COD")?;
    read_cod(&mut r, &mut info).map_err(|e| context(e, "COD"))?;

    debug!(
        width = info.width,
        height = info.height,
        levels = info.levels,
        "scanned JP2 header"
    );
    Ok(info)
}

/// Consume bytes until `token` has been read, leaving the reader on the
/// first byte after it.
fn scan_until<R: Read>(r: &mut R, token: &[u8], name: &str) -> io::Result<()> {
    let mut window: Vec<u8> = Vec::with_capacity(token.len());
    loop {
        let byte = match r.read_u8() {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("no {name} before end of file"),
                ));
            }
            Err(e) => return Err(e),
        };

        if window.len() == token.len() {
            window.remove(0);
        }
        window.push(byte);
        if window == token {
            return Ok(());
        }
    }
}

fn context(e: io::Error, name: &str) -> io::Error {
    io::Error::new(e.kind(), format!("reading {name}: {e}"))
}

fn read_ihdr<R: Read>(r: &mut R, info: &mut Jp2Info) -> io::Result<()> {
    info.height = r.read_u32::<BigEndian>()?;
    info.width = r.read_u32::<BigEndian>()?;
    info.comps = r.read_u16::<BigEndian>()?;
    info.bpc = r.read_u8()?;
    Ok(())
}

fn read_colr<R: Read>(r: &mut R, info: &mut Jp2Info) -> io::Result<()> {
    info.color_method = ColorMethod::from(r.read_u8()?);
    info.prec = r.read_u8()?;
    info.approx = r.read_u8()?;

    info.color_space = match info.color_method {
        ColorMethod::Enumerated => {
            // EnumCS is four bytes; the codes all fit in the low two
            r.read_u16::<BigEndian>()?;
            ColorSpace::from_enumerated(r.read_u16::<BigEndian>()?)
        }
        _ => {
            warn!("JP2 colour profile is not enumerated; colour space unknown");
            ColorSpace::Unknown
        }
    };
    Ok(())
}

fn read_siz<R: Read>(r: &mut R, info: &mut Jp2Info) -> io::Result<()> {
    info.lsiz = r.read_u16::<BigEndian>()?;
    info.rsiz = r.read_u16::<BigEndian>()?;
    info.xsiz = r.read_u32::<BigEndian>()?;
    info.ysiz = r.read_u32::<BigEndian>()?;
    info.xosiz = r.read_u32::<BigEndian>()?;
    info.yosiz = r.read_u32::<BigEndian>()?;
    info.xtsiz = r.read_u32::<BigEndian>()?;
    info.ytsiz = r.read_u32::<BigEndian>()?;
    info.xtosiz = r.read_u32::<BigEndian>()?;
    info.ytosiz = r.read_u32::<BigEndian>()?;
    info.csiz = r.read_u16::<BigEndian>()?;
    Ok(())
}

fn read_cod<R: Read>(r: &mut R, info: &mut Jp2Info) -> io::Result<()> {
    info.lcod = r.read_u16::<BigEndian>()?;
    info.scod = r.read_u8()?;
    info.sgcod = r.read_u32::<BigEndian>()?;
    info.levels = r.read_u8()?;
    Ok(())
}
