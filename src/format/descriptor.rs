//! Declared list of the persisted members of [`Labels`].
//!
//! Only the fields listed in [`LABELS_FIELDS`] ever reach a document. Event
//! channels and subscriptions have no descriptor and so can never leak into
//! the persisted form.

use imagemark_signal::Restore;
use serde_json::Value;

use crate::model::Labels;

/// How one field of [`Labels`] is written, read and moved between models.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    /// Key of the field in the document
    pub name: &'static str,
    /// Serialize the field's current data
    pub save: fn(&Labels) -> Result<Value, serde_json::Error>,
    /// Replace the field's data from a document value without notifying
    pub load: fn(&Labels, Value) -> Result<(), serde_json::Error>,
    /// Copy the field's data from the first model into the second without
    /// notifying
    pub transfer: fn(&Labels, &Labels),
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

macro_rules! field {
    ($name:literal, $field:ident) => {{
        fn save(labels: &Labels) -> Result<Value, serde_json::Error> {
            serde_json::to_value(&labels.$field)
        }
        fn load(labels: &Labels, value: Value) -> Result<(), serde_json::Error> {
            labels.$field.restore(serde_json::from_value(value)?);
            Ok(())
        }
        fn transfer(from: &Labels, to: &Labels) {
            to.$field.restore(from.$field.snapshot());
        }
        FieldDescriptor {
            name: $name,
            save,
            load,
            transfer,
        }
    }};
}

/// Every persisted field of [`Labels`], in document order.
pub static LABELS_FIELDS: &[FieldDescriptor] = &[
    field!("directoryPath", directory_path),
    field!("labelNames", label_names),
    field!("imagePaths", image_paths),
    field!("imagePathSelection", image_path_selection),
    field!("rectangleLabels", rectangle_labels),
    field!("workingImagePath", working_image_path),
    field!("imagePreviewMagnification", image_preview_magnification),
    field!("activeMarkerTool", active_marker_tool),
];

/// Look up a descriptor by document key.
pub fn find_field(name: &str) -> Option<&'static FieldDescriptor> {
    LABELS_FIELDS.iter().find(|field| field.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarkerTool, RectangleLabel};

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<_> = LABELS_FIELDS.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LABELS_FIELDS.len());
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_save_reads_plain_data() {
        let labels = Labels::new();
        labels.working_image_path.set("a.png".to_string());
        labels.active_marker_tool.set(MarkerTool::Rectangle);

        let working = find_field("workingImagePath").unwrap();
        assert_eq!((working.save)(&labels).unwrap(), Value::from("a.png"));
        let tool = find_field("activeMarkerTool").unwrap();
        assert_eq!((tool.save)(&labels).unwrap(), Value::from(1));
        assert!(find_field("onLoaded").is_none());
    }

    #[test]
    fn test_load_and_transfer_are_silent() {
        use std::cell::Cell;
        use std::rc::Rc;

        let staging = Labels::new();
        let target = Labels::new();
        let count = Rc::new(Cell::new(0));
        let _sub = {
            let count = Rc::clone(&count);
            target.rectangle_labels.subscribe(move || count.set(count.get() + 1))
        };

        let field = find_field("rectangleLabels").unwrap();
        let value = serde_json::json!({
            "a.png": [{"name": "cat", "minX": 0.1, "maxX": 0.5, "minY": 0.2, "maxY": 0.6}]
        });
        (field.load)(&staging, value).unwrap();
        (field.transfer)(&staging, &target);

        assert_eq!(
            target.labels_for("a.png"),
            Some(vec![RectangleLabel::new("cat", 0.1, 0.5, 0.2, 0.6)])
        );
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_load_rejects_wrong_type() {
        let labels = Labels::new();
        let field = find_field("imagePaths").unwrap();
        assert!((field.load)(&labels, Value::from(3)).is_err());
        assert!(labels.image_paths.is_empty());
    }
}
