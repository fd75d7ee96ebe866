//! Shared test setup for the goldscript crates: tracing initialization and
//! script fixtures on disk.

use std::io::Write;
use std::sync::Once;

use tempfile::{NamedTempFile, TempDir};

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
///
/// Honors `RUST_LOG` when set, otherwise stays quiet at `warn`. The target
/// field is suppressed to keep assertion output readable.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    });
}

/// Write script text to a named temp file with a `.sql` suffix.
///
/// The file lives as long as the returned handle; tests pass its path to the
/// file-based runner entry points.
pub fn script_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".sql").expect("create script temp file");
    file.write_all(contents.as_bytes())
        .expect("write script temp file");
    file.flush().expect("flush script temp file");
    file
}

/// Build a temp directory containing the given `(name, contents)` scripts.
///
/// Names are taken relative to the directory root and may not contain path
/// separators; directory-walking tests create a flat corpus with this.
pub fn script_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create script temp dir");
    for (name, contents) in files {
        assert!(
            !name.contains('/') && !name.contains('\\'),
            "script fixture names must be flat: {name}"
        );
        std::fs::write(dir.path().join(name), contents).expect("write script fixture");
    }
    dir
}

#[cfg(feature = "auto-init")]
mod auto {
    // Run at binary init time so individual tests need no init call.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}
