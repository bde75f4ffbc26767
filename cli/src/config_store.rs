use crate::message::HostMessage;
use droptty_core::{ConfigFile, PlatformCapabilities, UserConfig};
use log::{info, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::error::Error;
use std::path::{Path, PathBuf};
use winit::event_loop::EventLoopProxy;

/// The user's `overlay` section, kept as it was last read successfully.
pub struct ConfigStore {
    path: Option<PathBuf>,
    current: Option<UserConfig>,
}

impl ConfigStore {
    /// A store that never reads a file, so the built-in defaults apply.
    pub fn defaults() -> Self {
        Self {
            path: None,
            current: None,
        }
    }

    pub fn open(path: PathBuf, capabilities: &PlatformCapabilities) -> Result<Self, Box<dyn Error>> {
        let file = ConfigFile::load_or_create(&path, capabilities)?;
        info!("Loaded config from {}", path.display());

        Ok(Self {
            path: Some(path),
            current: file.overlay,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn current(&self) -> Option<&UserConfig> {
        self.current.as_ref()
    }

    /// Re-reads the file and returns true if the section changed. A file that doesn't parse
    /// leaves the last good configuration in place.
    pub fn reload(&mut self) -> bool {
        let Some(path) = &self.path else {
            return false;
        };

        match ConfigFile::load(path) {
            Ok(file) if file.overlay != self.current => {
                info!("Config changed, reloading");
                self.current = file.overlay;
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("Keeping previous config: {e}");
                false
            }
        }
    }

    /// Watches the config file and posts `HostMessage::ConfigChanged` whenever it is written.
    pub fn watch(
        &self,
        proxy: EventLoopProxy<HostMessage>,
    ) -> notify::Result<Option<RecommendedWatcher>> {
        let Some(path) = self.path.clone() else {
            return Ok(None);
        };
        let Some(dir) = path.parent().map(Path::to_path_buf) else {
            return Ok(None);
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &path) => {
                    let _ = proxy.send_event(HostMessage::ConfigChanged);
                }
                Ok(_) => {}
                Err(e) => warn!("Config watch error: {e}"),
            },
            Config::default(),
        )?;

        // Editors often replace the file instead of writing it, so watch the directory.
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(Some(watcher))
    }
}

fn touches(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|changed| changed.file_name() == path.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droptty_core::config::Anchor;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::fs;

    fn temp_config(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("droptty-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        dir.join("config.yaml")
    }

    #[test]
    fn test_open_creates_default_file() {
        let path = temp_config("create");
        let store = ConfigStore::open(path.clone(), &PlatformCapabilities::other()).unwrap();

        assert!(path.exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("overlay:"));
        assert!(store.current().is_some());
    }

    #[test]
    fn test_reload_keeps_last_good_config() {
        let path = temp_config("reload");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "overlay:\n  position: bottom\n").unwrap();

        let mut store = ConfigStore::open(path.clone(), &PlatformCapabilities::other()).unwrap();
        assert_eq!(store.current().unwrap().position, Some(Anchor::Bottom));
        assert!(!store.reload());

        fs::write(&path, "overlay:\n  position: sideways\n").unwrap();
        assert!(!store.reload());
        assert_eq!(store.current().unwrap().position, Some(Anchor::Bottom));

        fs::write(&path, "overlay:\n  position: left\n").unwrap();
        assert!(store.reload());
        assert_eq!(store.current().unwrap().position, Some(Anchor::Left));
    }

    #[test]
    fn test_defaults_store_never_reloads() {
        let mut store = ConfigStore::defaults();
        assert!(store.current().is_none());
        assert!(store.path().is_none());
        assert!(!store.reload());
    }

    #[test]
    fn test_touches_only_config_writes() {
        let path = PathBuf::from("/home/user/.config/droptty/config.yaml");
        let write = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());
        let create = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
        let remove = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/home/user/.config/droptty/notes.txt"));

        assert!(touches(&write, &path));
        assert!(touches(&create, &path));
        assert!(!touches(&remove, &path));
        assert!(!touches(&other, &path));
    }
}
