use crate::fs::File;
use crate::http::error::RequestError;
use crate::reactor::poller::platform::sys_stat;

use std::ffi::CString;
use std::path::Path;

/// A successfully resolved target: the opened file plus the resolved path
/// string (the MIME lookup runs on the latter, so `/` is classified as the
/// default document it resolves to).
#[derive(Debug)]
pub struct Served {
    pub file: File,
    pub path: String,
}

/// Maps a request target to a path under the document root.
///
/// A target of exactly `/` resolves to the default document
/// `root/index.html`; any other target is appended to the root verbatim.
/// A resolved path containing the literal substring `../` anywhere is
/// rejected. This is a textual guard, not canonicalization — symlinks and
/// encoded sequences pass it — but it is the documented minimum bar.
pub fn resolve(root: &Path, target: &str) -> Result<String, RequestError> {
    let resolved = if target == "/" {
        format!("{}/index.html", root.display())
    } else {
        format!("{}{}", root.display(), target)
    };

    if resolved.contains("../") {
        return Err(RequestError::Traversal);
    }

    Ok(resolved)
}

/// Resolves a target and opens the file it names.
///
/// Stat failure maps to `NotFound`, a directory target to `Directory`
/// (listing is unsupported), and an open failure after a successful stat
/// to `Internal`.
pub fn open(root: &Path, target: &str) -> Result<Served, RequestError> {
    let resolved = resolve(root, target)?;

    // A path with an interior NUL cannot name a file.
    let c_path = CString::new(resolved.as_str()).map_err(|_| RequestError::NotFound)?;

    let st = sys_stat(&c_path).map_err(|_| RequestError::NotFound)?;

    if st.is_dir {
        return Err(RequestError::Directory);
    }

    let file = File::open_read(&c_path, st.size).map_err(|_| RequestError::Internal)?;

    Ok(Served {
        file,
        path: resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("public")
    }

    #[test]
    fn root_target_resolves_to_default_document() {
        assert_eq!(resolve(&root(), "/").unwrap(), "public/index.html");
    }

    #[test]
    fn other_targets_are_appended_verbatim() {
        assert_eq!(resolve(&root(), "/a/b.css").unwrap(), "public/a/b.css");
        assert_eq!(resolve(&root(), "/..x").unwrap(), "public/..x");
    }

    #[test]
    fn traversal_is_rejected_anywhere_in_the_path() {
        assert_eq!(resolve(&root(), "/../etc/passwd"), Err(RequestError::Traversal));
        assert_eq!(resolve(&root(), "/a/../b"), Err(RequestError::Traversal));
        assert_eq!(resolve(&root(), "/a/b/../"), Err(RequestError::Traversal));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let err = open(dir.path(), "/missing.html").unwrap_err();
        assert_eq!(err, RequestError::NotFound);
    }

    #[test]
    fn directory_target_is_rejected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("sub")).expect("Failed to create subdir");

        let err = open(dir.path(), "/sub").unwrap_err();
        assert_eq!(err, RequestError::Directory);
    }

    #[test]
    fn existing_file_opens_with_its_size() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut f = std::fs::File::create(dir.path().join("page.html"))
            .expect("Failed to create fixture");
        f.write_all(b"<p>hi</p>").expect("Failed to write fixture");

        let served = open(dir.path(), "/page.html").expect("Failed to open fixture");
        assert_eq!(served.file.size(), 9);
        assert!(served.path.ends_with("/page.html"));
    }

    #[test]
    fn target_with_interior_nul_is_not_found() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let err = open(dir.path(), "/a\0b").unwrap_err();
        assert_eq!(err, RequestError::NotFound);
    }
}
