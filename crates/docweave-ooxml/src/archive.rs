//! Archive handling for DOCX packages
//!
//! A DOCX file is a ZIP archive of XML parts. Parts are kept in a sorted
//! map so that the written archive only depends on their contents.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::error::{OoxmlError, Result};
use crate::options::Compression;

/// An in-memory OOXML package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OoxmlArchive {
    /// All parts in the archive, keyed by path
    files: BTreeMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        Ok(Self { files })
    }

    /// Get a part's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a part's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get a part that must be present
    pub fn require_string(&self, path: &str) -> Result<String> {
        self.get_string(path)
            .ok_or_else(|| OoxmlError::MissingPart(path.to_string()))
    }

    /// Check if a part exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Part paths in sorted order
    pub fn file_list(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// Parts with their contents, in sorted order
    pub fn parts(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Set or update a part's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Write the archive to any writer
    ///
    /// Entries are written in path order with a fixed timestamp, so equal
    /// archives produce identical bytes.
    pub fn write_to<W: Write + Seek>(&self, writer: W, compression: Compression) -> Result<()> {
        let method = match compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(writer);
        for (path, contents) in &self.files {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }
        zip.finish()?;
        Ok(())
    }

    /// Serialize the archive into a byte vector
    pub fn to_bytes(&self, compression: Compression) -> Result<Vec<u8>> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        self.write_to(&mut buffer, compression)?;
        Ok(buffer.into_inner())
    }

    /// Write the archive to `path` atomically
    ///
    /// The package is staged in a temporary file next to `path`, synced,
    /// then renamed over it. On failure the staged file is removed and any
    /// existing file at `path` is left untouched.
    pub fn save_atomic<P: AsRef<Path>>(&self, path: P, compression: Compression) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir)?;
        self.write_to(staged.as_file_mut(), compression)?;
        staged.as_file_mut().flush()?;
        staged.as_file().sync_all()?;
        staged.persist(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> OoxmlArchive {
        let mut archive = OoxmlArchive::new();
        archive.set_string("word/document.xml", "<w:document/>");
        archive.set_string("[Content_Types].xml", "<Types/>");
        archive.set_string("_rels/.rels", "<Relationships/>");
        archive
    }

    #[test]
    fn test_file_operations() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("test.xml", "<root/>");
        assert!(archive.contains("test.xml"));
        assert_eq!(archive.get_string("test.xml"), Some("<root/>".to_string()));
        assert!(archive.require_string("missing.xml").is_err());
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_file_list_is_sorted() {
        let archive = sample();
        let paths: Vec<_> = archive.file_list().collect();
        assert_eq!(
            paths,
            vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]
        );
    }

    #[test]
    fn test_roundtrip_through_zip() {
        let archive = sample();
        let bytes = archive.to_bytes(Compression::Deflated).unwrap();
        let restored = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(restored, archive);
    }

    #[test]
    fn test_output_is_byte_stable() {
        for compression in [Compression::Deflated, Compression::Stored] {
            let first = sample().to_bytes(compression).unwrap();
            let second = sample().to_bytes(compression).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut reversed = OoxmlArchive::new();
        reversed.set_string("_rels/.rels", "<Relationships/>");
        reversed.set_string("[Content_Types].xml", "<Types/>");
        reversed.set_string("word/document.xml", "<w:document/>");
        assert_eq!(
            reversed.to_bytes(Compression::Stored).unwrap(),
            sample().to_bytes(Compression::Stored).unwrap()
        );
    }

    #[test]
    fn test_save_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        std::fs::write(&path, b"old").unwrap();

        sample().save_atomic(&path, Compression::Deflated).unwrap();

        let restored = OoxmlArchive::open(&path).unwrap();
        assert!(restored.contains("word/document.xml"));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_save_atomic_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.docx");
        let err = sample().save_atomic(&path, Compression::Deflated).unwrap_err();
        assert!(matches!(err, OoxmlError::Io(_)));
        assert!(!path.exists());
    }
}
