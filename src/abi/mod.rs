//! Entry function descriptors written by the Move compiler.
//!
//! The compiler emits one binary file per entry function under
//! `build/<package>/abis/<module>/<function>.abi`. Each file holds a single
//! [`FunctionDescriptor`] whose arguments are [`ArgumentDescriptor`]s, and
//! a [`DescriptorRegistry`] collects every descriptor of a package so calls
//! can be looked up by `module::function`.

pub mod argument;
pub mod function;
pub mod registry;

pub use argument::ArgumentDescriptor;
pub use function::{FunctionDescriptor, ModuleId};
pub use registry::{BuildReport, DescriptorRegistry, LoadFailure};
