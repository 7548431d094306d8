use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::Overrides;
use crate::pipeline;

/// Surveille les fichiers de variante et regénère la sortie de celui qui change.
///
/// Retourne le Watcher (doit rester vivant tant que la surveillance dure).
///
/// # Errors
/// Returns an error if the watcher cannot be created or a path cannot be watched.
pub fn spawn_variant_watcher(
    paths: &[PathBuf],
    out_dir: &Path,
    overrides: &Overrides,
) -> Result<impl Watcher + use<>> {
    // notify rapporte des chemins absolus.
    let watched: Vec<PathBuf> = paths
        .iter()
        .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()))
        .collect();
    let out_dir = out_dir.to_path_buf();
    let overrides = overrides.clone();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let Ok(event) = res else {
            return;
        };
        if !matches!(event.kind, EventKind::Modify(_)) {
            return;
        }
        for path in watched
            .iter()
            .filter(|p| event.paths.iter().any(|e| e == *p || e.ends_with(p)))
        {
            regenerate(path, &out_dir, &overrides);
        }
    })?;

    for path in paths {
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        log::info!("Surveillance de {}", path.display());
    }
    Ok(watcher)
}

fn regenerate(path: &Path, out_dir: &Path, overrides: &Overrides) {
    let result = pipeline::resolve_variants(&[path.to_path_buf()], overrides)
        .and_then(|configs| pipeline::generate(&configs, out_dir, false));
    match result {
        Ok(written) => log::info!(
            "{} regénéré ({} fichiers)",
            path.display(),
            written.len()
        ),
        // On garde les anciens fichiers. Pas de panic.
        Err(e) => log::warn!("Erreur de regénération {} : {e:#}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerate_rewrites_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.toml");
        std::fs::write(&path, "[letters]\ne = \"#    \"\n[emit]\nformat = \"bin\"\n").unwrap();
        let out = dir.path().join("out");

        regenerate(&path, &out, &Overrides::default());
        assert_eq!(std::fs::read(out.join("live_map.bin")).unwrap()[usize::from(b'e')], 0x21);

        std::fs::write(&path, "[figures]\ne = \"#    \"\n[emit]\nformat = \"bin\"\n").unwrap();
        regenerate(&path, &out, &Overrides::default());
        assert_eq!(std::fs::read(out.join("live_map.bin")).unwrap()[usize::from(b'e')], 0x41);
    }

    #[test]
    fn broken_file_keeps_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.toml");
        std::fs::write(&path, "[letters]\ne = \"#    \"\n[emit]\nformat = \"bin\"\n").unwrap();
        let out = dir.path().join("out");
        regenerate(&path, &out, &Overrides::default());

        std::fs::write(&path, "[letters]\ne = \"#\"\n").unwrap();
        regenerate(&path, &out, &Overrides::default());
        assert_eq!(std::fs::read(out.join("live_map.bin")).unwrap()[usize::from(b'e')], 0x21);
    }

    #[test]
    fn watcher_accepts_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.toml");
        std::fs::write(&path, "").unwrap();
        assert!(spawn_variant_watcher(&[path], dir.path(), &Overrides::default()).is_ok());
    }

    #[test]
    fn watcher_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(spawn_variant_watcher(&[path], dir.path(), &Overrides::default()).is_err());
    }
}
