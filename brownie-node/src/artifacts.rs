//! What the compiler leaves under `build/<package>`.

use crate::error::NodeError;
use brownie::abi::{BuildReport, DescriptorRegistry};
use std::fs;
use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = "package-metadata.bcs";
pub const BYTECODE_DIR: &str = "bytecode_modules";
pub const ABI_DIR: &str = "abis";
pub const MODULE_EXTENSION: &str = "mv";

#[derive(Debug, Default)]
pub struct BuildArtifacts {
    /// BCS encoded package metadata, published with the modules
    pub metadata: Vec<u8>,
    /// Module bytecode ordered by file name
    pub modules: Vec<(PathBuf, Vec<u8>)>,
    pub registry: DescriptorRegistry,
    pub report: BuildReport,
}

impl BuildArtifacts {
    pub fn load(build_dir: &Path) -> Result<Self, NodeError> {
        let metadata = read(&build_dir.join(METADATA_FILE))?;

        let bytecode_dir = build_dir.join(BYTECODE_DIR);
        let entries = fs::read_dir(&bytecode_dir).map_err(|source| NodeError::Io {
            path: bytecode_dir.clone(),
            source,
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| NodeError::Io {
                path: bytecode_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == MODULE_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();
        let mut modules = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = read(&path)?;
            modules.push((path, bytes));
        }

        let (registry, report) = DescriptorRegistry::from_dir(&build_dir.join(ABI_DIR))?;
        info!(
            "Loaded {} modules and {} entry functions from {}",
            modules.len(),
            registry.len(),
            build_dir.display()
        );
        Ok(BuildArtifacts {
            metadata,
            modules,
            registry,
            report,
        })
    }
}

fn read(path: &Path) -> Result<Vec<u8>, NodeError> {
    fs::read(path).map_err(|source| NodeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use brownie::abi::{ArgumentDescriptor, FunctionDescriptor};
    use brownie::TypeTag;

    #[test]
    fn load_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path();
        fs::write(build.join(METADATA_FILE), [1, 2, 3]).unwrap();
        fs::create_dir_all(build.join(BYTECODE_DIR)).unwrap();
        fs::write(build.join(BYTECODE_DIR).join("pool.mv"), [0xa1, 0x1c]).unwrap();
        fs::write(build.join(BYTECODE_DIR).join("coin.mv"), [0xa1]).unwrap();
        fs::write(build.join(BYTECODE_DIR).join("notes.txt"), "skip").unwrap();

        let deposit = FunctionDescriptor {
            name: "deposit".to_string(),
            module: "0xcafe::pool".parse().unwrap(),
            doc: String::new(),
            ty_args: vec![],
            args: vec![ArgumentDescriptor::new("amount", TypeTag::U64).unwrap()],
        };
        fs::create_dir_all(build.join(ABI_DIR).join("pool")).unwrap();
        fs::write(build.join(ABI_DIR).join("pool").join("deposit.abi"), deposit.to_bytes()).unwrap();

        let artifacts = BuildArtifacts::load(build).unwrap();
        assert_eq!(artifacts.metadata, vec![1, 2, 3]);
        let names: Vec<_> = artifacts
            .modules
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["coin.mv", "pool.mv"]);
        assert_eq!(artifacts.registry.get("pool::deposit").unwrap(), &deposit);
        assert!(artifacts.report.failures.is_empty());
    }

    #[test]
    fn missing_metadata_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            BuildArtifacts::load(dir.path()),
            Err(NodeError::Io { .. })
        ));
    }
}
