//! Shared test utilities for the iiif-jp2 test suite.
//!
//! Provides a builder for synthetic JP2 files: just enough box structure
//! (signature, `ftyp`, `jp2h` with `ihdr` and `colr`, and a `jp2c` holding
//! SOC, SIZ and COD marker segments) for the header scanner to read.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = Jp2Builder::new(800, 400).tiles(256, 256).levels(5).build();
//! let info = crate::jp2::scan(bytes.as_slice()).unwrap();
//! assert_eq!(info.tile_width(), 256);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::jp2::JP2_SIGNATURE;

/// How the `colr` box is written.
#[derive(Debug, Clone, Copy)]
pub enum Colr {
    Enumerated(u32),
    Icc,
}

#[derive(Debug, Clone)]
pub struct Jp2Builder {
    width: u32,
    height: u32,
    comps: u16,
    bpc: u8,
    colr: Colr,
    tile: (u32, u32),
    tile_offset: (u32, u32),
    levels: u8,
    prefix: Vec<u8>,
}

impl Jp2Builder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            comps: 3,
            bpc: 7,
            colr: Colr::Enumerated(16),
            tile: (width, height),
            tile_offset: (0, 0),
            levels: 5,
            prefix: Vec::new(),
        }
    }

    pub fn comps(mut self, comps: u16) -> Self {
        self.comps = comps;
        self
    }

    pub fn colr(mut self, colr: Colr) -> Self {
        self.colr = colr;
        self
    }

    pub fn tiles(mut self, width: u32, height: u32) -> Self {
        self.tile = (width, height);
        self
    }

    pub fn tile_offset(mut self, x: u32, y: u32) -> Self {
        self.tile_offset = (x, y);
        self
    }

    pub fn levels(mut self, levels: u8) -> Self {
        self.levels = levels;
        self
    }

    /// Raw bytes written right after the signature, inside an unknown box.
    pub fn prefix(mut self, bytes: &[u8]) -> Self {
        self.prefix = bytes.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = JP2_SIGNATURE.to_vec();

        let ftyp: &[&[u8]] = &[b"jp2 ", &[0; 4], b"jp2 "];
        push_box(&mut out, b"ftyp", &ftyp.concat());
        if !self.prefix.is_empty() {
            push_box(&mut out, b"skip", &self.prefix);
        }

        let mut ihdr = Vec::new();
        ihdr.extend(self.height.to_be_bytes());
        ihdr.extend(self.width.to_be_bytes());
        ihdr.extend(self.comps.to_be_bytes());
        ihdr.extend([self.bpc, 7, 0, 0]);

        let mut colr = Vec::new();
        match self.colr {
            Colr::Enumerated(code) => {
                colr.extend([1, 0, 0]);
                colr.extend(code.to_be_bytes());
            }
            Colr::Icc => {
                colr.extend([2, 0, 0]);
                colr.extend([0x00, 0x00, 0x02, 0x0c, b'l', b'c', b'm', b's']);
            }
        }

        let mut jp2h = Vec::new();
        push_box(&mut jp2h, b"ihdr", &ihdr);
        push_box(&mut jp2h, b"colr", &colr);
        push_box(&mut out, b"jp2h", &jp2h);

        push_box(&mut out, b"jp2c", &self.codestream());
        out
    }

    fn codestream(&self) -> Vec<u8> {
        let mut cs = vec![0xFF, 0x4F, 0xFF, 0x51];
        let lsiz = 38 + 3 * self.comps;
        cs.extend(lsiz.to_be_bytes());
        cs.extend(0u16.to_be_bytes()); // rsiz
        for v in [
            self.width,
            self.height,
            0,
            0,
            self.tile.0 + self.tile_offset.0,
            self.tile.1 + self.tile_offset.1,
            self.tile_offset.0,
            self.tile_offset.1,
        ] {
            cs.extend(v.to_be_bytes());
        }
        cs.extend(self.comps.to_be_bytes());
        for _ in 0..self.comps {
            cs.extend([self.bpc, 1, 1]);
        }

        cs.extend([0xFF, 0x52]);
        cs.extend(12u16.to_be_bytes()); // lcod
        cs.push(0); // scod
        cs.extend([0x00, 0x00, 0x01, 0x00]); // LRCP, one layer, no MCT
        cs.push(self.levels);
        cs.extend([4, 4, 0, 0]);

        cs.extend([0xFF, 0xD9]);
        cs
    }

    /// Write the file into a fresh temp directory.
    pub fn write(&self, name: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(name);
        std::fs::write(&path, self.build()).unwrap();
        (tmp, path)
    }
}

fn push_box(out: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
    let len = (8 + body.len()) as u32;
    out.extend(len.to_be_bytes());
    out.extend(kind);
    out.extend(body);
}

/// Path that is guaranteed not to exist.
pub fn missing_file(tmp: &Path) -> PathBuf {
    tmp.join("does-not-exist.jp2")
}
