use std::path::{Path, PathBuf};
use error_stack::{Report, ResultExt};
use crate::prelude::{ErrorCL, Result};

/// Reads the kernel source file at `path` and appends its contents to `sources`.
///
/// Relative paths that don't exist from the working directory are retried from the crate root,
/// so the binaries find `kernels/kernels.cl` when launched from anywhere inside the repository.
pub fn add_sources (sources: &mut Vec<String>, path: impl AsRef<Path>) -> Result<()> {
    let path = resolve_source_path(path.as_ref());
    let source = std::fs::read_to_string(&path)
        .map_err(|e| Report::new(ErrorCL::InvalidValue).attach_printable(e))
        .attach_printable_lazy(|| format!("failed to read kernel source '{}'", path.display()))?;

    tracing::debug!(path = %path.display(), bytes = source.len(), "kernel source loaded");
    sources.push(source);
    Ok(())
}

pub fn resolve_source_path (path: &Path) -> PathBuf {
    if path.exists() || path.is_absolute() {
        return path.to_path_buf();
    }

    let fallback = Path::new(env!("CARGO_MANIFEST_DIR")).join(path);
    match fallback.exists() {
        true => fallback,
        false => path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_kernels_resolve_from_crate_root () {
        let mut sources = Vec::new();
        add_sources(&mut sources, "kernels/kernels.cl").unwrap();

        assert_eq!(sources.len(), 1);
        assert!(sources[0].contains("__kernel void multadd"));
        assert!(sources[0].contains("__kernel void outer_sum"));
    }

    #[test]
    fn sources_accumulate () {
        let path = std::env::temp_dir().join(format!("cl-tutorial-{}.cl", std::process::id()));
        std::fs::write(&path, "__kernel void noop() {}\n").unwrap();

        let mut sources = vec![String::from("// header\n")];
        let result = add_sources(&mut sources, &path);
        std::fs::remove_file(&path).unwrap();

        result.unwrap();
        assert_eq!(sources, ["// header\n", "__kernel void noop() {}\n"]);
    }

    #[test]
    fn missing_file_is_invalid_value () {
        let mut sources = Vec::new();
        let report = add_sources(&mut sources, "kernels/does_not_exist.cl").unwrap_err();

        assert_eq!(*report.current_context(), ErrorCL::InvalidValue);
        assert!(sources.is_empty());
        assert!(format!("{report:?}").contains("does_not_exist.cl"));
    }
}
