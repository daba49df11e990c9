//! The labeling project document.
//!
//! [`Labels`] is built entirely from observable primitives. Every derived
//! operation below goes through the primitives' own mutators, so each field
//! notifies at most once per operation.

use imagemark_signal::{Event, Signal, SignalDictionary, SignalList};

use crate::constants::DEFAULT_MAGNIFICATION;
use crate::model::{MarkerTool, RectangleLabel};

/// How a clicked image combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionOperation {
    /// Selection becomes just the clicked image
    #[default]
    ReplaceAll,
    /// Clicked image is added to the selection
    Add,
    /// Clicked image is removed from the selection
    Subtract,
}

/// One labeling project.
///
/// Cloning yields another handle to the same observable fields.
#[derive(Debug, Clone)]
pub struct Labels {
    /// Base folder of the project
    pub directory_path: Signal<String>,
    /// Known label class names
    pub label_names: SignalList<String>,
    /// Every image in the project, kept in ascending order
    pub image_paths: SignalList<String>,
    /// Selected subset of `image_paths`
    pub image_path_selection: SignalList<String>,
    /// Drawn labels grouped by image path. Keys may outlive their image.
    pub rectangle_labels: SignalDictionary<String, Vec<RectangleLabel>>,
    /// Image currently shown for editing, empty when none
    pub working_image_path: Signal<String>,
    /// Zoom factor of the preview
    pub image_preview_magnification: Signal<f32>,
    /// Current interaction mode
    pub active_marker_tool: Signal<MarkerTool>,
    /// Emitted once after a document has been loaded into this model
    pub on_loaded: Event<()>,
}

impl Labels {
    /// Create an empty project.
    pub fn new() -> Self {
        Self {
            directory_path: Signal::default(),
            label_names: SignalList::new(),
            image_paths: SignalList::new(),
            image_path_selection: SignalList::new(),
            rectangle_labels: SignalDictionary::new(),
            working_image_path: Signal::default(),
            image_preview_magnification: Signal::new(DEFAULT_MAGNIFICATION),
            active_marker_tool: Signal::new(MarkerTool::default()),
            on_loaded: Event::new(),
        }
    }

    // ========================================================================
    // Rectangle labels
    // ========================================================================

    /// Append a label to the list for `image_path`, creating the list if
    /// needed.
    pub fn add_label(&self, image_path: &str, label: RectangleLabel) {
        self.rectangle_labels
            .upsert_with(image_path.to_string(), Vec::new, |labels| {
                labels.push(label)
            });
    }

    /// Drop every label of `image_path`. Returns whether there were any.
    pub fn remove_labels(&self, image_path: &str) -> bool {
        self.rectangle_labels.remove(&image_path.to_string())
    }

    pub fn contains_labels(&self, image_path: &str) -> bool {
        self.rectangle_labels.contains_key(&image_path.to_string())
    }

    pub fn labels_for(&self, image_path: &str) -> Option<Vec<RectangleLabel>> {
        self.rectangle_labels.try_get(&image_path.to_string())
    }

    // ========================================================================
    // Images
    // ========================================================================

    pub fn contains_image(&self, image_path: &str) -> bool {
        self.image_paths.with(|paths| paths.iter().any(|p| p == image_path))
    }

    /// Add one image if it is not already part of the project.
    pub fn add_image(&self, image_path: &str) {
        self.add_images([image_path]);
    }

    /// Add every image not yet in the project, sorting once at the end.
    ///
    /// `image_paths` notifies once for the whole batch, and not at all when
    /// every path was already present.
    pub fn add_images<I, S>(&self, image_paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut paths = self.image_paths.to_vec();
        let before = paths.len();
        for path in image_paths {
            let path = path.into();
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        if paths.len() == before {
            return;
        }

        paths.sort();
        log::debug!("Adding {} images to project", paths.len() - before);
        self.image_paths.set_all(paths);
    }

    /// Remove one image from the project and from the selection.
    pub fn remove_image(&self, image_path: &str) {
        self.remove_images([image_path]);
    }

    /// Remove images from the project and from the selection.
    ///
    /// The working image is cleared when it no longer belongs to the project.
    /// Labels drawn on the removed images are kept.
    pub fn remove_images<I, S>(&self, image_paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed: Vec<String> = image_paths
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        let mut paths = self.image_paths.to_vec();
        paths.retain(|p| !removed.contains(p));
        paths.sort();
        self.image_paths.set_all(paths);

        let mut selection = self.image_path_selection.to_vec();
        selection.retain(|p| !removed.contains(p));
        self.image_path_selection.set_all(selection);

        self.drop_dangling_working_image();
    }

    /// Remove every selected image, then clear the selection.
    pub fn remove_selected_images(&self) {
        let selected = self.image_path_selection.to_vec();
        log::debug!("Removing {} selected images", selected.len());
        self.remove_images(&selected);
        self.image_path_selection.clear();
    }

    /// Reset paths and lists. Rectangle labels and view settings are kept.
    pub fn clear(&self) {
        self.directory_path.set(String::new());
        self.working_image_path.set(String::new());
        self.label_names.clear();
        self.image_paths.clear();
        self.image_path_selection.clear();
    }

    fn drop_dangling_working_image(&self) {
        let working = self.working_image_path.get();
        if !working.is_empty() && !self.contains_image(&working) {
            log::debug!("Working image {:?} left the project", working);
            self.working_image_path.set(String::new());
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Index of `image_path` in `image_paths`.
    pub fn find_image_index(&self, image_path: &str) -> Option<usize> {
        self.image_paths
            .with(|paths| paths.iter().position(|p| p == image_path))
    }

    /// Apply a selection click on the image at `index`.
    ///
    /// An in-range index also makes that image the working image. Returns
    /// whether `index` was in range; an out-of-range `ReplaceAll` still
    /// empties the selection.
    pub fn select_image(&self, index: usize, operation: SelectionOperation) -> bool {
        let image = self.image_paths.get(index).ok();

        match (operation, image.as_ref()) {
            (SelectionOperation::ReplaceAll, Some(path)) => {
                self.image_path_selection.set_all(vec![path.clone()]);
            }
            (SelectionOperation::ReplaceAll, None) => {
                self.image_path_selection.set_all(Vec::new());
            }
            (SelectionOperation::Add, Some(path)) => {
                if !self.image_path_selection.contains(path) {
                    self.image_path_selection.push(path.clone());
                }
            }
            (SelectionOperation::Subtract, Some(path)) => {
                self.image_path_selection.remove(path);
            }
            (_, None) => {}
        }

        match image {
            Some(path) => {
                self.working_image_path.set(path);
                true
            }
            None => false,
        }
    }

    /// Select the image after the working image, wrapping around.
    pub fn next_image(&self, operation: SelectionOperation) {
        self.step_image(1, operation);
    }

    /// Select the image before the working image, wrapping around.
    pub fn previous_image(&self, operation: SelectionOperation) {
        self.step_image(-1, operation);
    }

    fn step_image(&self, step: isize, operation: SelectionOperation) {
        let count = self.image_paths.len();
        if count == 0 {
            return;
        }
        let current = self
            .find_image_index(&self.working_image_path.get())
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(count as isize) as usize;
        self.select_image(next, operation);
    }

    // ========================================================================
    // Load broadcast
    // ========================================================================

    /// Re-broadcast every field once, then emit [`Labels::on_loaded`].
    ///
    /// Called after the fields were replaced silently, so observers that
    /// only listen to per-field changes still see the loaded state.
    pub fn notify_loaded(&self) {
        self.directory_path.force_change();
        self.label_names.force_change();
        self.image_paths.force_change();
        self.image_path_selection.force_change();
        self.rectangle_labels.force_change();
        self.working_image_path.force_change();
        self.image_preview_magnification.force_change();
        self.active_marker_tool.force_change();
        self.on_loaded.emit(&());
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::new()
    }
}
