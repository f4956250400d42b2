use crate::abi::function::FunctionDescriptor;
use crate::error::Error;
use std::collections::hash_map;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the descriptor files written by the compiler
pub const ABI_EXTENSION: &str = "abi";

/// A descriptor file that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// What happened while scanning an ABI directory.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub loaded: usize,
    pub failures: Vec<LoadFailure>,
    /// Keys seen more than once, the last file read wins
    pub duplicates: Vec<String>,
}

/// Every entry function of a compiled package, keyed by `module::function`.
///
/// Built once per compilation and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    functions: HashMap<String, FunctionDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `dir/<module>/*.abi`.
    ///
    /// Files that fail to read or decode are logged and listed in the
    /// report; they never abort the scan. Files with another extension and
    /// anything that is not a module directory are skipped. A missing
    /// directory yields an empty registry, since a package without entry
    /// functions has no `abis` directory at all.
    pub fn from_dir(dir: &Path) -> Result<(Self, BuildReport), Error> {
        let mut registry = DescriptorRegistry::new();
        let mut report = BuildReport::default();
        if !dir.exists() {
            debug!("No abi directory at {}", dir.display());
            return Ok((registry, report));
        }

        for module_dir in sorted_entries(dir)? {
            if !module_dir.is_dir() {
                continue;
            }
            let files = match sorted_entries(&module_dir) {
                Ok(files) => files,
                Err(error) => {
                    warn!("Skipping {}: {}", module_dir.display(), error);
                    report.failures.push(LoadFailure {
                        path: module_dir,
                        error,
                    });
                    continue;
                }
            };
            for path in files {
                if !path.is_file() || path.extension().map_or(true, |ext| ext != ABI_EXTENSION) {
                    continue;
                }
                match load_descriptor(&path) {
                    Ok(descriptor) => {
                        trace!("Loaded {} from {}", descriptor.key(), path.display());
                        report.loaded += 1;
                        if let Some(previous) = registry.insert(descriptor) {
                            warn!(
                                "Duplicate abi {}, {} replaces the earlier entry",
                                previous.key(),
                                path.display()
                            );
                            report.duplicates.push(previous.key());
                        }
                    }
                    Err(error) => {
                        warn!("Failed to load abi {}: {}", path.display(), error);
                        report.failures.push(LoadFailure { path, error });
                    }
                }
            }
        }
        info!(
            "Loaded {} abis from {}, {} failed",
            report.loaded,
            dir.display(),
            report.failures.len()
        );
        Ok((registry, report))
    }

    /// Adds a descriptor, returning the one it replaced.
    pub fn insert(&mut self, descriptor: FunctionDescriptor) -> Option<FunctionDescriptor> {
        self.functions.insert(descriptor.key(), descriptor)
    }

    pub fn get(&self, key: &str) -> Result<&FunctionDescriptor, Error> {
        self.functions
            .get(key)
            .ok_or_else(|| Error::UnknownFunction(key.to_owned()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.functions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Values<'_, String, FunctionDescriptor> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<FunctionDescriptor> for DescriptorRegistry {
    fn from_iter<I: IntoIterator<Item = FunctionDescriptor>>(iter: I) -> Self {
        let mut registry = DescriptorRegistry::new();
        for descriptor in iter {
            registry.insert(descriptor);
        }
        registry
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let io_error = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        paths.push(entry.map_err(io_error)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn load_descriptor(path: &Path) -> Result<FunctionDescriptor, Error> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FunctionDescriptor::from_bytes(&bytes)?)
}
