use crate::events::Winner;
use async_channel::{Receiver, Sender, TryRecvError};
use fs_err as fs;
use std::io;
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

pub const WINNER_FILE: &str = "winner.txt";
pub const SUB_FILE: &str = "sub.txt";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Marker {
    Import,
    Spin,
}

impl Marker {
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        let name: &str = self.as_ref();
        dir.join(name)
    }
}

pub fn extra_file_name(position: usize) -> String {
    format!("extra{}.txt", position)
}

fn is_extra_file(name: &str) -> bool {
    name.strip_prefix("extra")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Control file error: {0}")]
    Io(#[from] io::Error),
}

/// Where `import` / `spin` requests come from. Polling consumes the request.
pub trait CommandSource {
    fn poll_import(&mut self) -> bool;
    fn poll_spin(&mut self) -> bool;
    /// Drops anything pending, so a request made while busy does not fire later.
    fn clear(&mut self);
}

/// Where the outcome of a spin is recorded.
pub trait ResultSink {
    fn write_result(&mut self, winner: &Winner) -> Result<(), ControlError>;
}

/// File-based control directory: empty marker files in, text files out.
#[derive(Debug, Clone)]
pub struct MarkerDir {
    dir: PathBuf,
}

impl MarkerDir {
    /// Opens the directory, creating it if needed, and removes stale markers
    /// from a previous run.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ControlError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let markers = Self { dir };
        markers.clear_markers();
        log::info!("Watching {} for markers", markers.dir.display());
        Ok(markers)
    }

    /// Consumes a marker if present. Removing the file is the consume step,
    /// so a marker that cannot be deleted is never acted on.
    fn take(&self, marker: Marker) -> bool {
        match fs::remove_file(marker.path_in(&self.dir)) {
            Ok(()) => {
                log::info!("Marker '{}' received", marker);
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                log::error!("Ignoring '{}' marker, failed to remove it: {}", marker, e);
                false
            }
        }
    }

    fn clear_markers(&self) {
        for marker in Marker::iter() {
            if let Err(e) = fs::remove_file(marker.path_in(&self.dir))
                && e.kind() != io::ErrorKind::NotFound
            {
                log::warn!("Failed to clear {} marker: {}", marker, e);
            }
        }
    }

    /// Empties every numbered extra file so fields from an earlier winner
    /// don't linger beyond what the current one fills.
    fn clear_extras(&self) -> io::Result<()> {
        for entry in fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            let is_extra = path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(is_extra_file);
            if is_extra && path.is_file() {
                fs::write(&path, "")?;
            }
        }
        Ok(())
    }
}

impl CommandSource for MarkerDir {
    fn poll_import(&mut self) -> bool {
        self.take(Marker::Import)
    }

    fn poll_spin(&mut self) -> bool {
        self.take(Marker::Spin)
    }

    fn clear(&mut self) {
        self.clear_markers();
    }
}

impl ResultSink for MarkerDir {
    fn write_result(&mut self, winner: &Winner) -> Result<(), ControlError> {
        fs::write(self.dir.join(WINNER_FILE), &winner.name)?;
        fs::write(
            self.dir.join(SUB_FILE),
            winner.sub.as_deref().unwrap_or_default(),
        )?;

        self.clear_extras()?;
        for (i, extra) in winner.extras.iter().enumerate() {
            fs::write(self.dir.join(extra_file_name(i + 1)), extra)?;
        }
        Ok(())
    }
}

/// In-process command source fed through a channel, for triggers that do not
/// live on disk.
#[derive(Debug)]
pub struct ChannelCommands {
    rx: Receiver<Marker>,
    import: bool,
    spin: bool,
}

impl ChannelCommands {
    pub fn channel() -> (Sender<Marker>, Self) {
        let (tx, rx) = async_channel::unbounded();
        (
            tx,
            Self {
                rx,
                import: false,
                spin: false,
            },
        )
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(Marker::Import) => self.import = true,
                Ok(Marker::Spin) => self.spin = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}

impl CommandSource for ChannelCommands {
    fn poll_import(&mut self) -> bool {
        self.drain();
        std::mem::take(&mut self.import)
    }

    fn poll_spin(&mut self) -> bool {
        self.drain();
        std::mem::take(&mut self.spin)
    }

    fn clear(&mut self) {
        self.drain();
        self.import = false;
        self.spin = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::Rgb;

    fn winner(name: &str, sub: Option<&str>, extras: &[&str]) -> Winner {
        Winner {
            name: name.to_string(),
            sub: sub.map(str::to_string),
            extras: extras.iter().map(|e| e.to_string()).collect(),
            color: Rgb::new(1, 2, 3),
        }
    }

    fn touch(dir: &Path, marker: Marker) {
        fs::write(marker.path_in(dir), "").unwrap();
    }

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn test_marker_names() {
        let name: &str = Marker::Import.as_ref();
        assert_eq!(name, "import");
        assert_eq!(Marker::Spin.to_string(), "spin");
        assert_eq!("SPIN".parse::<Marker>().unwrap(), Marker::Spin);
    }

    #[test]
    fn test_extra_file_pattern() {
        assert!(is_extra_file("extra1.txt"));
        assert!(is_extra_file("extra12.txt"));
        assert!(!is_extra_file("extra.txt"));
        assert!(!is_extra_file("extra1.txt.bak"));
        assert!(!is_extra_file("extras1.txt"));
    }

    #[test]
    fn test_open_clears_stale_markers() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), Marker::Import);
        touch(dir.path(), Marker::Spin);

        MarkerDir::open(dir.path()).unwrap();
        assert!(!Marker::Import.path_in(dir.path()).exists());
        assert!(!Marker::Spin.path_in(dir.path()).exists());
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("stream").join("wheel");
        MarkerDir::open(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_poll_consumes_marker_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut markers = MarkerDir::open(dir.path()).unwrap();

        assert!(!markers.poll_spin());
        touch(dir.path(), Marker::Spin);
        assert!(!markers.poll_import());
        assert!(markers.poll_spin());
        assert!(!markers.poll_spin());
        assert!(!Marker::Spin.path_in(dir.path()).exists());
    }

    #[test]
    fn test_undeletable_marker_is_not_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let mut markers = MarkerDir::open(dir.path()).unwrap();

        // a directory under the marker's name cannot be removed with remove_file
        fs::create_dir(Marker::Spin.path_in(dir.path())).unwrap();
        fs::write(Marker::Spin.path_in(dir.path()).join("keep"), "").unwrap();

        let polls: Vec<bool> = (0..3).map(|_| markers.poll_spin()).collect();
        assert_eq!(polls, [false, false, false]);
        assert!(Marker::Spin.path_in(dir.path()).exists());
    }

    #[test]
    fn test_write_result_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut markers = MarkerDir::open(dir.path()).unwrap();

        markers
            .write_result(&winner("Cat", Some("meow"), &["a", "b", "c"]))
            .unwrap();
        assert_eq!(read(dir.path(), WINNER_FILE), "Cat");
        assert_eq!(read(dir.path(), SUB_FILE), "meow");
        assert_eq!(read(dir.path(), "extra3.txt"), "c");

        markers.write_result(&winner("Dog", None, &["z"])).unwrap();
        assert_eq!(read(dir.path(), WINNER_FILE), "Dog");
        assert_eq!(read(dir.path(), SUB_FILE), "");
        assert_eq!(read(dir.path(), "extra1.txt"), "z");
        assert_eq!(read(dir.path(), "extra2.txt"), "");
        assert_eq!(read(dir.path(), "extra3.txt"), "");
    }

    #[test]
    fn test_channel_commands() {
        let (tx, mut commands) = ChannelCommands::channel();
        assert!(!commands.poll_spin());

        tx.send_blocking(Marker::Spin).unwrap();
        tx.send_blocking(Marker::Import).unwrap();
        assert!(commands.poll_import());
        assert!(commands.poll_spin());
        assert!(!commands.poll_spin());

        tx.send_blocking(Marker::Spin).unwrap();
        commands.clear();
        assert!(!commands.poll_spin());
    }
}
