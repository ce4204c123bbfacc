use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write through a sibling temp file and rename, so `path` is either the old
/// content or the complete new content.
///
/// The temp file sits in the target's own directory because `rename` is only
/// atomic within one filesystem; a temp file under `/tmp` could sit on another mount.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let tmp = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output"),
        std::process::id()
    ));

    {
        let mut file =
            File::create(&tmp).with_context(|| format!("create tmp {}", tmp.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("write tmp {}", tmp.display()))?;
        file.sync_all()
            .with_context(|| format!("sync tmp {}", tmp.display()))?;
    }

    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err)
            .with_context(|| format!("rename tmp {} -> {}", tmp.display(), path.display()));
    }
    Ok(())
}
