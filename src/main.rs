//! Command-line front end for imagemark projects.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use imagemark::config::{AppConfig, ConfigError, FileSettingsStore};
use imagemark::constants::IMAGE_EXTENSIONS;
use imagemark::{
    LabelSerializer, Labels, ManagerError, ProjectManager, RectangleLabel, SelectionOperation,
};

const USAGE: &str = "usage: imagemark <command>

commands:
  show                                      print the current project
  new                                       start a new project at the default location
  open <project>                            open a project file
  save-as <project>                         save the current project to a new file
  add <image>...                            add images to the project
  remove-selected                           remove the selected images
  select <index>                            select an image and make it the working image
  label <name> <minX> <minY> <maxX> <maxY>  label the working image";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, PartialEq)]
enum Command {
    Show,
    New,
    Open(PathBuf),
    SaveAs(PathBuf),
    Add(Vec<String>),
    RemoveSelected,
    Select(usize),
    Label {
        name: String,
        min: (f32, f32),
        max: (f32, f32),
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Show);
        };

        let command = match (name.as_str(), rest) {
            ("show", []) => Command::Show,
            ("new", []) => Command::New,
            ("open", [path]) => Command::Open(PathBuf::from(path)),
            ("save-as", [path]) => Command::SaveAs(PathBuf::from(path)),
            ("add", images) if !images.is_empty() => Command::Add(images.to_vec()),
            ("remove-selected", []) => Command::RemoveSelected,
            ("select", [index]) => Command::Select(
                index
                    .parse()
                    .map_err(|_| CliError::Usage(format!("invalid index '{}'", index)))?,
            ),
            ("label", [name, min_x, min_y, max_x, max_y]) => Command::Label {
                name: name.clone(),
                min: (parse_coord(min_x)?, parse_coord(min_y)?),
                max: (parse_coord(max_x)?, parse_coord(max_y)?),
            },
            _ => {
                return Err(CliError::Usage(format!(
                    "unrecognized command '{}'",
                    args.join(" ")
                )));
            }
        };
        Ok(command)
    }

    /// Whether the command edits the open project and must be saved.
    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Add(_) | Command::RemoveSelected | Command::Select(_) | Command::Label { .. }
        )
    }
}

fn parse_coord(text: &str) -> Result<f32, CliError> {
    match text.parse::<f32>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(CliError::Usage(format!(
            "invalid coordinate '{}', expected a number in [0, 1]",
            text
        ))),
    }
}

fn is_image(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn run(command: Command, manager: &ProjectManager<FileSettingsStore>) -> Result<(), CliError> {
    let mutates = command.mutates();
    if !matches!(command, Command::New | Command::Open(_)) {
        manager.load_last_project();
    }

    match command {
        Command::Show => {}
        Command::New => manager.create_project()?,
        // Projects are remembered by absolute path; bare names have no
        // directory and would be rejected by the serializer.
        Command::Open(path) => manager.open_project(std::path::absolute(path)?)?,
        Command::SaveAs(path) => manager.save_project_as(std::path::absolute(path)?)?,
        Command::Add(images) => {
            let (accepted, skipped): (Vec<_>, Vec<_>) =
                images.into_iter().partition(|path| is_image(path));
            for path in &skipped {
                log::warn!("Skipping {:?}: not a supported image type", path);
            }
            manager.add_images(accepted);
        }
        Command::RemoveSelected => manager.remove_selected_images(),
        Command::Select(index) => {
            if !manager.labels().select_image(index, SelectionOperation::ReplaceAll) {
                return Err(CliError::Rejected(format!(
                    "no image at index {} ({} images in project)",
                    index,
                    manager.labels().image_paths.len()
                )));
            }
        }
        Command::Label { name, min, max } => {
            let working = manager.labels().working_image_path.get();
            if working.is_empty() {
                return Err(CliError::Rejected(
                    "no working image, select one first".to_string(),
                ));
            }
            manager
                .labels()
                .add_label(&working, RectangleLabel::from_corners(&name, min, max));
        }
    }

    if mutates {
        let path = manager.project_path();
        if path == manager.serializer().default_project_path() {
            std::fs::create_dir_all(path.parent().unwrap_or(Path::new(".")))?;
        }
        manager.save_project()?;
    }

    print_summary(&manager.project_path(), manager.labels());
    Ok(())
}

fn print_summary(project_path: &Path, labels: &Labels) {
    let working = labels.working_image_path.get();
    println!("project:       {}", project_path.display());
    println!("directory:     {}", labels.directory_path.get());
    println!("label names:   {}", labels.label_names.to_vec().join(", "));
    println!("tool:          {}", labels.active_marker_tool.get().name());
    println!("magnification: {}", labels.image_preview_magnification.get());
    println!("images:");
    labels.image_paths.for_each(|path| {
        let selected = if labels.image_path_selection.contains(path) { '*' } else { ' ' };
        let current = if *path == working { '>' } else { ' ' };
        let count = labels.labels_for(path).map_or(0, |l| l.len());
        println!("  {}{} {} ({} labels)", current, selected, path, count);
    });
    if let Some(rects) = labels.labels_for(&working) {
        println!("labels on {}:", working);
        for rect in rects {
            println!(
                "  {} [{:.3}, {:.3}] - [{:.3}, {:.3}]",
                rect.name, rect.min_x, rect.min_y, rect.max_x, rect.max_y
            );
        }
    }
}

fn main() -> ExitCode {
    let config_path = AppConfig::default_path()
        .unwrap_or_else(|| PathBuf::from(AppConfig::default_filename()));
    let settings = FileSettingsStore::open(config_path);
    let preferences = settings.config().preferences;

    env_logger::Builder::new()
        .filter_level(preferences.log_level.to_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let serializer = LabelSerializer::with_store(
        imagemark::storage::NativeFileStore,
        imagemark::config::default_project_path_named(&preferences.default_project_name),
    );
    let manager = ProjectManager::new(settings, serializer);

    match run(command, &manager) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("imagemark: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Show);
        assert_eq!(Command::parse(&args("select 3")).unwrap(), Command::Select(3));
        assert_eq!(
            Command::parse(&args("add a.png b.jpg")).unwrap(),
            Command::Add(args("a.png b.jpg"))
        );
        assert_eq!(
            Command::parse(&args("label cat 0.1 0.2 0.5 0.25")).unwrap(),
            Command::Label {
                name: "cat".to_string(),
                min: (0.1, 0.2),
                max: (0.5, 0.25),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse(&args("add")).is_err());
        assert!(Command::parse(&args("select x")).is_err());
        assert!(Command::parse(&args("label cat 0 0 2 1")).is_err());
        assert!(Command::parse(&args("open")).is_err());
        assert!(Command::parse(&args("frobnicate")).is_err());
    }

    #[test]
    fn test_mutating_commands() {
        assert!(Command::Add(vec![]).mutates());
        assert!(Command::Select(0).mutates());
        assert!(!Command::Show.mutates());
        assert!(!Command::SaveAs(PathBuf::from("p.json")).mutates());
    }

    #[test]
    fn test_image_filter() {
        assert!(is_image("a.PNG"));
        assert!(is_image("dir/b.jpeg"));
        assert!(!is_image("notes.txt"));
        assert!(!is_image("noext"));
    }
}
