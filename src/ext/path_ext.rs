use std::path::{Path, PathBuf};

pub trait PathExt {
    /// `self` made absolute for log and error messages, or shown as-is if that fails.
    fn best_effort_display(&self) -> String;

    /// A hidden file next to `self`, unique to this process, used to stage writes.
    fn temporary_sibling(&self) -> PathBuf;
}

impl PathExt for Path {
    fn best_effort_display(&self) -> String {
        std::path::absolute(self)
            .unwrap_or_else(|_| self.to_path_buf())
            .display()
            .to_string()
    }

    fn temporary_sibling(&self) -> PathBuf {
        let name = self
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }
}
