//! Global constants for the imagemark application

/// File name used for a project that has not been saved anywhere yet
pub const DEFAULT_PROJECT_NAME: &str = "newLabelProject.json";

/// Directory name under the platform data/config directories
pub const APP_DIR_NAME: &str = "imagemark";

/// Image preview magnification of a fresh project
pub const DEFAULT_MAGNIFICATION: f32 = 1.0;

/// Extension filter offered for image import
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
