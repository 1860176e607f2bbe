//! Core TriangleM archive reader module

pub mod error;
pub mod membody;
pub mod memfs;
pub mod models;
pub mod script;

use std::path::Path;

use encoding_rs::UTF_8;
use log::info;

pub use error::{FormatError, Result};
use models::{DecodedBlob, DialogueUnit, FileEntry, Scene};

/// One decoded memfs/membody pair: the index catalog, the inflated payload,
/// and the scenes tokenized from it.
///
/// Each instance is fully independent; decoding the same bytes twice yields
/// identical results. The catalog and the payload are not cross-referenced:
/// the index is a master catalog for a whole series, and a given volume's
/// payload typically backs only a subset of its entries.
pub struct ScriptArchive {
    source_name: String,
    catalog: Vec<FileEntry>,
    blob: DecodedBlob,
    scenes: Vec<Scene>,
}

impl ScriptArchive {
    /// Run the full decode pipeline on one memfs/membody pair.
    ///
    /// `source_name` labels the dialogue units this archive produces,
    /// typically the membody file's name.
    ///
    /// # Errors
    /// Returns an error if either container is structurally invalid
    /// (bad magic, truncated index record, missing or broken stream). A
    /// declared-size mismatch is not an error; it is reported through
    /// [`DecodedBlob::size_mismatch`] and the actual bytes are used.
    pub fn new(
        memfs_data: &[u8],
        membody_data: &[u8],
        source_name: impl Into<String>,
    ) -> Result<Self> {
        let source_name = source_name.into();
        info!("Decoding script archive: {}", source_name);

        let catalog = memfs::parse(memfs_data)?;
        let blob = membody::decompress(membody_data)?;

        // BOM-stripping UTF-8 decode; undecodable bytes become replacement
        // characters rather than aborting the file.
        let (text, _, _) = UTF_8.decode(&blob.data);
        let scenes = script::split_scenes(&text);

        info!(
            "Archive decoded: {} catalog entries, {} script bytes, {} scenes",
            catalog.len(),
            blob.data.len(),
            scenes.len()
        );

        Ok(Self {
            source_name,
            catalog,
            blob,
            scenes,
        })
    }

    /// Read an archive pair from disk and decode it.
    pub fn open(memfs_path: impl AsRef<Path>, membody_path: impl AsRef<Path>) -> Result<Self> {
        let membody_path = membody_path.as_ref();
        let memfs_data = std::fs::read(memfs_path)?;
        let membody_data = std::fs::read(membody_path)?;
        let source_name = membody_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| membody_path.display().to_string());

        Self::new(&memfs_data, &membody_data, source_name)
    }

    /// Catalog entries in container order.
    pub fn catalog(&self) -> &[FileEntry] {
        &self.catalog
    }

    /// The inflated payload, with its declared-size bookkeeping.
    pub fn blob(&self) -> &DecodedBlob {
        &self.blob
    }

    /// Tokenized scenes in script order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// All dialogue units of the archive, scene by scene, in script order.
    pub fn dialogue_units(&self) -> impl Iterator<Item = DialogueUnit> + '_ {
        self.scenes
            .iter()
            .flat_map(|scene| script::extract_dialogue(scene, &self.source_name))
    }
}
