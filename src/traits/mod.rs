pub mod filesystem;

pub use filesystem::{FileSystem, MockFileSystem, RealFileSystem};
