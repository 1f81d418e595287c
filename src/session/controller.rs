//! Image session: which image is active, where its labels live, and the
//! save-then-load cycle on every navigation.

use std::path::{Path, PathBuf};

use crate::editor::{AnnotationEditor, LabelSets};
use crate::format::{ImageMeta, LabelFile, label_path_for};
use crate::model::AnnotationStore;

use super::error::SessionError;
use super::probe::{ImageCrateProbe, ImageProbe};
use super::sequence::ImageSequence;

/// Where the annotations shown after activating an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No label file; the store starts empty.
    Empty,
    /// The image's own label file.
    Loaded,
    /// The label file of the image navigated from.
    CarriedForward,
    /// The label file was unreadable; the store starts empty.
    Malformed,
}

impl LoadOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            LoadOutcome::Empty => "empty",
            LoadOutcome::Loaded => "loaded",
            LoadOutcome::CarriedForward => "carried forward",
            LoadOutcome::Malformed => "malformed label file ignored",
        }
    }
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

/// Result of [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// A different image is now active.
    Moved(LoadOutcome),
    /// Already at the first/last image; nothing but the save happened.
    AtBoundary,
}

/// Label directory for an image folder: `<label_root>/<folder name>`.
pub fn label_dir_for(label_root: &Path, sequence: &ImageSequence) -> PathBuf {
    label_root.join(sequence.folder_name())
}

/// One annotation session over an image folder.
pub struct Session<P: ImageProbe = ImageCrateProbe> {
    sequence: ImageSequence,
    label_dir: PathBuf,
    editor: AnnotationEditor,
    probe: P,
    carry_forward: bool,
    active: Option<ImageMeta>,
}

impl Session<ImageCrateProbe> {
    pub fn new(sequence: ImageSequence, label_dir: PathBuf, labels: LabelSets) -> Self {
        Self::with_probe(sequence, label_dir, labels, ImageCrateProbe)
    }
}

impl<P: ImageProbe> Session<P> {
    pub fn with_probe(
        sequence: ImageSequence,
        label_dir: PathBuf,
        labels: LabelSets,
        probe: P,
    ) -> Self {
        Self {
            sequence,
            label_dir,
            editor: AnnotationEditor::new(labels),
            probe,
            carry_forward: false,
            active: None,
        }
    }

    /// Create the label directory and activate the first image.
    pub fn open(&mut self) -> Result<LoadOutcome, SessionError> {
        std::fs::create_dir_all(&self.label_dir)?;
        log::info!(
            "Session opened: {} images, labels in {:?}",
            self.sequence.len(),
            self.label_dir
        );
        self.activate(0, None)
    }

    /// Make image `index` active and load its annotations.
    ///
    /// With carry-forward on, the label file of `came_from` is preferred
    /// over the image's own file. Unreadable files are logged and treated as
    /// absent. If the image cannot be read the current image stays active.
    pub fn activate(
        &mut self,
        index: usize,
        came_from: Option<usize>,
    ) -> Result<LoadOutcome, SessionError> {
        let (image_path, meta) = self.inspect(index)?;
        self.enter(index, &image_path, meta, came_from)
    }

    /// Path and metadata of image `index`, without touching the cursor.
    fn inspect(&self, index: usize) -> Result<(PathBuf, ImageMeta), SessionError> {
        let image_path = self
            .sequence
            .get(index)
            .ok_or(SessionError::InvalidIndex {
                index,
                len: self.sequence.len(),
            })?
            .to_path_buf();
        let (width, height) = self.probe.dimensions(&image_path)?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok((image_path, ImageMeta::new(file_name, width, height)))
    }

    fn enter(
        &mut self,
        index: usize,
        image_path: &Path,
        meta: ImageMeta,
        came_from: Option<usize>,
    ) -> Result<LoadOutcome, SessionError> {
        self.sequence.go_to(index)?;

        let carried = came_from
            .filter(|_| self.carry_forward)
            .and_then(|prev| self.sequence.get(prev))
            .map(|prev| label_path_for(&self.label_dir, prev));

        let own = label_path_for(&self.label_dir, image_path);
        let (mut store, outcome) = match self.read_labels(carried.as_deref(), &own) {
            Ok((store, outcome)) => (store, outcome),
            Err(err) => {
                log::error!("Ignoring label file for {:?}: {}", image_path, err);
                (AnnotationStore::new(), LoadOutcome::Malformed)
            }
        };
        // Own file on disk differs from the store
        if matches!(outcome, LoadOutcome::CarriedForward | LoadOutcome::Malformed) {
            store.mark_dirty();
        }

        log::info!(
            "Image {}: {:?} ({}x{}, {})",
            self.sequence.progress(),
            image_path,
            meta.width,
            meta.height,
            outcome.name()
        );
        self.editor.load(store);
        self.active = Some(meta);
        Ok(outcome)
    }

    fn read_labels(
        &self,
        carried: Option<&Path>,
        own: &Path,
    ) -> Result<(AnnotationStore, LoadOutcome), SessionError> {
        if let Some(path) = carried {
            let decoded =
                LabelFile::read(path).and_then(|label| label.map(|l| l.to_store()).transpose());
            match decoded {
                Ok(Some(store)) => return Ok((store, LoadOutcome::CarriedForward)),
                Ok(None) => {}
                Err(err) => log::error!("Not carrying forward {:?}: {}", path, err),
            }
        }
        match LabelFile::read(own)? {
            Some(label) => Ok((label.to_store()?, LoadOutcome::Loaded)),
            None => Ok((AnnotationStore::new(), LoadOutcome::Empty)),
        }
    }

    /// Persist the active image's annotations and clear the store.
    pub fn deactivate(&mut self) -> Result<(), SessionError> {
        self.save()?;
        self.editor.load(AnnotationStore::new());
        self.active = None;
        Ok(())
    }

    /// Save, then move one image in `step` direction.
    ///
    /// At the first or last image the save still happens and the store is
    /// left as it is. If the target image cannot be read the save happens
    /// and the current image stays active.
    pub fn advance(&mut self, step: Step) -> Result<Navigation, SessionError> {
        let from = self.sequence.current_index();
        let target = match step {
            Step::Next if self.sequence.has_next() => from + 1,
            Step::Previous if self.sequence.has_previous() => from - 1,
            _ => {
                self.save()?;
                log::debug!("No {:?} image from {}", step, self.sequence.progress());
                return Ok(Navigation::AtBoundary);
            }
        };
        let (image_path, meta) = match self.inspect(target) {
            Ok(inspected) => inspected,
            Err(err) => {
                self.save()?;
                log::error!("Staying on image {}: {}", self.sequence.progress(), err);
                return Err(err);
            }
        };
        self.deactivate()?;
        let outcome = self.enter(target, &image_path, meta, Some(from))?;
        Ok(Navigation::Moved(outcome))
    }

    /// Write the active image's label file. Returns its path.
    ///
    /// An unchanged store is not rewritten over an existing file.
    pub fn save(&mut self) -> Result<PathBuf, SessionError> {
        let meta = self.active.as_ref().ok_or(SessionError::NoActiveImage)?;
        let path = label_path_for(&self.label_dir, self.sequence.current_image());
        if !self.editor.store().is_dirty() && path.exists() {
            log::debug!("{:?} is up to date", path);
            return Ok(path);
        }
        LabelFile::from_store(self.editor.store(), meta).write(&path)?;
        self.editor.mark_saved();
        log::info!(
            "Saved {} boxes and {} interactions to {:?}",
            self.editor.store().len(),
            self.editor.store().link_count(),
            path
        );
        Ok(path)
    }

    /// Drop every annotation of the active image.
    pub fn reset(&mut self) {
        self.editor.reset();
    }

    pub fn set_carry_forward(&mut self, enabled: bool) {
        self.carry_forward = enabled;
        log::info!(
            "Carry-forward {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    pub fn carry_forward(&self) -> bool {
        self.carry_forward
    }

    pub fn editor(&self) -> &AnnotationEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut AnnotationEditor {
        &mut self.editor
    }

    pub fn sequence(&self) -> &ImageSequence {
        &self.sequence
    }

    pub fn active_image(&self) -> Option<&ImageMeta> {
        self.active.as_ref()
    }

    /// Label file path of the active image.
    pub fn active_label_path(&self) -> Option<PathBuf> {
        self.active
            .as_ref()
            .map(|_| label_path_for(&self.label_dir, self.sequence.current_image()))
    }

    pub fn label_dir(&self) -> &Path {
        &self.label_dir
    }

    pub fn progress(&self) -> String {
        self.sequence.progress()
    }
}
