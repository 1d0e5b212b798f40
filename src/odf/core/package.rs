//! ODF package (ZIP archive) handling.
//!
//! A [`Package`] keeps the archive bytes in memory. Rewriting one member
//! produces a new archive in which every other member is copied raw, so
//! their bytes, compression and order are exactly those of the input.

use crate::common::{Error, Result};
use crate::odf::constants::{ODF_MIMETYPE, is_spreadsheet_mime_type};
use log::{debug, warn};
use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// How a rewritten member is compressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMode {
    /// Reuse the method the member was stored with
    #[default]
    Preserve,
    /// Store uncompressed
    Stored,
    /// Deflate
    Deflated,
}

impl CompressionMode {
    fn method(self, original: CompressionMethod) -> CompressionMethod {
        match self {
            CompressionMode::Preserve => original,
            CompressionMode::Stored => CompressionMethod::Stored,
            CompressionMode::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// An ODF package held in memory
pub struct Package {
    archive: RefCell<ZipArchive<Cursor<Vec<u8>>>>,
    mimetype: Option<String>,
}

impl Package {
    /// Open a package from archive bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|_| Error::InvalidFormat("Invalid ZIP archive".to_string()))?;

        let mimetype = Self::read_mimetype(&mut archive)?;
        match mimetype.as_deref() {
            Some(mime) if is_spreadsheet_mime_type(mime) => {},
            Some(mime) => warn!("package mimetype {mime} is not a spreadsheet"),
            None => warn!("package has no {ODF_MIMETYPE} member"),
        }
        debug!("opened package with {} members", archive.len());

        Ok(Self {
            archive: RefCell::new(archive),
            mimetype,
        })
    }

    /// Open a package from a file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    fn read_mimetype(archive: &mut ZipArchive<Cursor<Vec<u8>>>) -> Result<Option<String>> {
        let mut file = match archive.by_name(ODF_MIMETYPE) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(Some(content.trim().to_string()))
    }

    /// Content of the `mimetype` member, if present
    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    /// Read one member fully.
    pub fn member(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(name)
            .map_err(|_| Error::not_found(name))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Check if a member exists
    pub fn has_member(&self, name: &str) -> bool {
        self.archive.borrow_mut().by_name(name).is_ok()
    }

    /// Member names in archive order.
    pub fn member_names(&self) -> Result<Vec<String>> {
        let mut archive = self.archive.borrow_mut();
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            names.push(archive.by_index_raw(i)?.name().to_string());
        }
        Ok(names)
    }

    /// Build a new archive with `name` replaced by `content`.
    ///
    /// The replaced member keeps its position; all other members are raw
    /// copied. Fails with [`NotFound`](Error::NotFound) when `name` is absent.
    pub fn replace_member(
        &self,
        name: &str,
        content: &[u8],
        mode: CompressionMode,
    ) -> Result<Vec<u8>> {
        if !self.has_member(name) {
            return Err(Error::not_found(name));
        }

        let mut archive = self.archive.borrow_mut();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            if file.name() != name {
                writer.raw_copy_file(file)?;
                continue;
            }

            let method = mode.method(file.compression());
            let mut options = SimpleFileOptions::default().compression_method(method);
            if let Some(modified) = file.last_modified() {
                options = options.last_modified_time(modified);
            }
            drop(file);
            writer.start_file(name, options)?;
            writer.write_all(content)?;
            debug!("rewrote member {name} ({} bytes, {method:?})", content.len());
        }

        Ok(writer.finish()?.into_inner())
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("mimetype", &self.mimetype)
            .field("members", &self.archive.borrow().len())
            .finish()
    }
}
