pub mod dirs {
    use std::env;
    use std::path::{Path, PathBuf};

    /// directory of the running executable, falling back to the working directory
    pub fn base_dir() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
