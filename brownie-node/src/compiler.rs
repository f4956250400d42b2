//! Drives the `aptos` command line to compile and publish a package.

use crate::config::NamedAddresses;
use crate::error::NodeError;
use brownie::PrivateKey;
use std::path::Path;
use std::process::Command;

pub const DEFAULT_CLI: &str = "aptos";

#[derive(Debug, Clone)]
pub struct MoveCli {
    program: String,
}

impl Default for MoveCli {
    fn default() -> Self {
        MoveCli::new(DEFAULT_CLI)
    }
}

impl MoveCli {
    pub fn new(program: &str) -> Self {
        MoveCli {
            program: program.to_string(),
        }
    }

    pub fn compile_args(package_dir: &Path, named: &NamedAddresses) -> Vec<String> {
        let mut args: Vec<String> = [
            "move",
            "compile",
            "--included-artifacts",
            "all",
            "--save-metadata",
            "--package-dir",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(package_dir.display().to_string());
        args.extend(named.to_args());
        args
    }

    pub fn publish_args(
        package_dir: &Path,
        named: &NamedAddresses,
        node_url: &str,
        key: &PrivateKey,
    ) -> Vec<String> {
        let mut args = vec![
            "move".to_string(),
            "publish".to_string(),
            "--assume-yes".to_string(),
        ];
        args.extend(named.to_args());
        args.push("--package-dir".to_string());
        args.push(package_dir.display().to_string());
        args.push("--url".to_string());
        args.push(node_url.to_string());
        args.push("--private-key".to_string());
        args.push(key.to_string());
        args
    }

    pub fn compile(&self, package_dir: &Path, named: &NamedAddresses) -> Result<(), NodeError> {
        self.run(&Self::compile_args(package_dir, named), None)
    }

    pub fn publish(
        &self,
        package_dir: &Path,
        named: &NamedAddresses,
        node_url: &str,
        key: &PrivateKey,
    ) -> Result<(), NodeError> {
        let args = Self::publish_args(package_dir, named, node_url, key);
        self.run(&args, Some(&key.to_string()))
    }

    /// Runs the command inheriting stdio, `secret` is masked in logs.
    fn run(&self, args: &[String], secret: Option<&str>) -> Result<(), NodeError> {
        let shown: Vec<&str> = args
            .iter()
            .map(|a| match secret {
                Some(s) if a == s => "***",
                _ => a.as_str(),
            })
            .collect();
        let command = format!("{} {}", self.program, shown.join(" "));
        info!("{}", command);
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|source| NodeError::Io {
                path: self.program.clone().into(),
                source,
            })?;
        if !status.success() {
            return Err(NodeError::Compiler { command, status });
        }
        Ok(())
    }
}
