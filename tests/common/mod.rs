//! Shared test utilities, fixture archives and a fake archiver
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use zip7z::convert::{ArchiveFormat, Archiver, ConvertError};

/// Write a ZIP archive at `path` containing `files` (`name` → bytes).
/// Names ending in `/` become directory entries.
pub fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in files {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents).unwrap();
        }
    }
    writer.finish().unwrap();
}

/// File entries of a ZIP archive (`name` → bytes), directories skipped
pub fn zip_contents(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut contents = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        contents.insert(entry.name().to_string(), bytes);
    }
    contents
}

/// Regular files under `dir` keyed by `/`-separated relative path
pub fn read_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(dir).unwrap();
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (key, fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Names of everything directly inside `dir`, sorted
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// One call made against [`FakeArchiver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Extract(ArchiveFormat, PathBuf),
    CompressSevenZip(PathBuf),
    CompressZip(PathBuf),
}

/// Where the fake should report a tool failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Extract,
    Compress,
    /// Writes the destination archive, then reports failure
    CompressAfterWrite,
}

/// In-process archiver: both "formats" are ZIP containers written with the
/// `zip` crate, so conversions can be checked without system binaries.
#[derive(Debug, Default)]
pub struct FakeArchiver {
    pub calls: RefCell<Vec<Call>>,
    fail_at: Option<FailAt>,
    remove_source_after_compress: bool,
}

impl FakeArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at: Some(fail_at),
            ..Self::default()
        }
    }

    /// Deletes the directory it just compressed, so the pipeline's own
    /// cleanup step finds nothing to remove and fails.
    pub fn removing_source_after_compress() -> Self {
        Self {
            remove_source_after_compress: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn tool_failure(tool: &str) -> ConvertError {
        ConvertError::ToolNotFound {
            tool: tool.to_string(),
        }
    }

    fn write_archive(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError> {
        assert!(dest.is_absolute(), "destination should be absolute");
        if dest.exists() {
            // Real archivers would merge into an existing archive
            return Err(io_error("destination already exists", io::ErrorKind::AlreadyExists));
        }
        if fs::read_dir(dir).map_err(|e| wrap("read dir", e))?.next().is_none() {
            return Err(ConvertError::EmptyArchive(dir.to_path_buf()));
        }

        let file = File::create(dest).map_err(|e| wrap("create archive", e))?;
        let mut writer = ZipWriter::new(file);
        for (name, contents) in read_tree(dir) {
            writer
                .start_file(name, SimpleFileOptions::default())
                .map_err(zip_error)?;
            writer.write_all(&contents).map_err(|e| wrap("write entry", e))?;
        }
        writer.finish().map_err(zip_error)?;

        if self.remove_source_after_compress {
            fs::remove_dir_all(dir).map_err(|e| wrap("remove source", e))?;
        }
        Ok(())
    }
}

impl Archiver for FakeArchiver {
    fn extract(
        &self,
        format: ArchiveFormat,
        archive: &Path,
        into: &Path,
    ) -> Result<(), ConvertError> {
        self.calls
            .borrow_mut()
            .push(Call::Extract(format, archive.to_path_buf()));
        if self.fail_at == Some(FailAt::Extract) {
            // Leave something behind, like a tool that dies half way
            fs::write(into.join("partial"), b"x").map_err(|e| wrap("partial", e))?;
            return Err(Self::tool_failure("fake-extract"));
        }
        assert!(into.is_dir(), "extraction target should already exist");

        let file = File::open(archive).map_err(|e| wrap("open archive", e))?;
        let mut zip = ZipArchive::new(file).map_err(zip_error)?;
        zip.extract(into).map_err(zip_error)
    }

    fn compress_to_seven_zip(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError> {
        self.calls
            .borrow_mut()
            .push(Call::CompressSevenZip(dest.to_path_buf()));
        if self.fail_at == Some(FailAt::Compress) {
            return Err(Self::tool_failure("fake-7z"));
        }
        self.write_archive(dir, dest)?;
        if self.fail_at == Some(FailAt::CompressAfterWrite) {
            return Err(Self::tool_failure("fake-7z"));
        }
        Ok(())
    }

    fn compress_to_zip(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError> {
        self.calls
            .borrow_mut()
            .push(Call::CompressZip(dest.to_path_buf()));
        if self.fail_at == Some(FailAt::Compress) {
            return Err(Self::tool_failure("fake-zip"));
        }
        self.write_archive(dir, dest)?;
        if self.fail_at == Some(FailAt::CompressAfterWrite) {
            return Err(Self::tool_failure("fake-zip"));
        }
        Ok(())
    }
}

fn wrap(context: &str, source: io::Error) -> ConvertError {
    ConvertError::Io {
        context: context.to_string(),
        source,
    }
}

fn io_error(context: &str, kind: io::ErrorKind) -> ConvertError {
    wrap(context, io::Error::new(kind, context.to_string()))
}

fn zip_error(e: zip::result::ZipError) -> ConvertError {
    wrap("zip", io::Error::new(io::ErrorKind::InvalidData, e))
}
