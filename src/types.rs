use crate::{
    statics::{EVENT_LANGUAGES_DIR, LANGUAGE_ASSET_BUNDLE, MANAGED_ASSEMBLY, STREAMING_LANGUAGE_DIR},
    template::TemplateError,
};
use indexmap::IndexMap;
use std::{
    hash::BuildHasherDefault,
    path::{Path, PathBuf},
    process::ExitStatus,
};
use thiserror::Error;
use xxhash_rust::xxh3::Xxh3;

pub type Xxh3Builder = BuildHasherDefault<Xxh3>;
pub type IndexMapXxh3<K, V> = IndexMap<K, V, Xxh3Builder>;

/// Symbolic language key -> 0-based line of `ui_language.txt`.
pub type SymbolTable = IndexMapXxh3<String, usize>;
pub type StringMap = IndexMapXxh3<String, String>;

pub type ResultVec = Vec<Result<Outcome, Error>>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {err}", .file.display())]
    ReadFileFailed { file: PathBuf, err: std::io::Error },
    #[error("failed to write {}: {err}", .file.display())]
    WriteFileFailed { file: PathBuf, err: std::io::Error },
    #[error("failed to read directory {}: {err}", .dir.display())]
    ReadDirFailed { dir: PathBuf, err: std::io::Error },
    #[error("failed to parse JSON from {}: {err}", .file.display())]
    JSONParseFailed { file: PathBuf, err: sonic_rs::Error },
    #[error("failed to serialize {}: {err}", .file.display())]
    JSONSerializeFailed { file: PathBuf, err: sonic_rs::Error },
    #[error("failed to run decompiler {}: {err}", .program.display())]
    DecompilerFailed { program: PathBuf, err: std::io::Error },
    #[error("decompiler {} exited with {status}: {stderr}", .program.display())]
    DecompilerExited {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    #[error("failed to parse {}: {err}", .file.display())]
    TemplateParseFailed { file: PathBuf, err: TemplateError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ParsedTemplate(PathBuf),
    ResolvedFile { file: PathBuf, entries: usize },
    CopiedFile(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredPath {
    ManagedAssembly,
    EventLanguagesDir,
    LanguageAssetBundle,
    StreamingLanguageDir,
}

/// Locations the extractor needs inside a game installation.
#[derive(Debug, Clone)]
pub struct GamePaths {
    pub managed_assembly: PathBuf,
    pub event_languages: PathBuf,
    pub language_asset_bundle: PathBuf,
    pub streaming_language: PathBuf,
}

impl GamePaths {
    pub fn new(game_dir: &Path) -> Self {
        let join = |components: &[&str]| -> PathBuf {
            components
                .iter()
                .fold(game_dir.to_path_buf(), |path: PathBuf, component: &&str| path.join(component))
        };

        Self {
            managed_assembly: join(&MANAGED_ASSEMBLY[..]),
            event_languages: join(&EVENT_LANGUAGES_DIR[..]),
            language_asset_bundle: join(&LANGUAGE_ASSET_BUNDLE[..]),
            streaming_language: join(&STREAMING_LANGUAGE_DIR[..]),
        }
    }

    /// Returns the first required path that is absent, in the order the extractor uses them.
    pub fn find_missing(&self) -> Option<(RequiredPath, &Path)> {
        [
            (RequiredPath::ManagedAssembly, self.managed_assembly.as_path(), false),
            (RequiredPath::EventLanguagesDir, self.event_languages.as_path(), true),
            (RequiredPath::LanguageAssetBundle, self.language_asset_bundle.as_path(), false),
            (RequiredPath::StreamingLanguageDir, self.streaming_language.as_path(), true),
        ]
        .into_iter()
        .find(|(_, path, is_dir)| if *is_dir { !path.is_dir() } else { !path.is_file() })
        .map(|(kind, path, _)| (kind, path))
    }
}
