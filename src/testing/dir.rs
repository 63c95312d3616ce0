use std::{
    ops,
    path::{Path, PathBuf},
};

/// A scratch directory under the system temp dir named after the current thread, which `cargo
/// test` names after the running test. The directory is removed on drop.
#[derive(Debug)]
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new() -> TestDir {
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("unnamed").replace("::", "-");
        let path = std::env::temp_dir()
            .join("liouring-test-dir")
            .join(format!("{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("could not create test directory");
        TestDir { path }
    }
}

impl ops::Deref for TestDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
