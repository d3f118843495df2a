use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tasklist_core::view::DEFAULT_PAGE_SIZE;
use tasklist_core::{SortDirection, SortField};

/// Directory holding project configuration and, by default, the database.
pub const CONFIG_DIR: &str = ".tasklist";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DB_FILE: &str = "tasks.db";
const DEFAULT_PAGE_LINKS: usize = 5;

/// Walk up from `start` to the nearest directory containing [`CONFIG_DIR`].
///
/// Falls back to `start` when no ancestor has one.
#[must_use]
pub fn discover_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

/// Top-level project configuration loaded from `.tasklist/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Where tasks are persisted.
    #[serde(default)]
    pub store: StoreConfig,
    /// Task list defaults.
    #[serde(default)]
    pub view: ViewConfig,
}

impl ProjectConfig {
    /// Discover the project root from `cwd` and load its configuration.
    ///
    /// Returns the root alongside the configuration.
    pub fn load(cwd: impl AsRef<Path>) -> Result<(PathBuf, Self)> {
        let root = discover_root(cwd.as_ref());
        let config = Self::from_root(&root)?;
        Ok((root, config))
    }

    /// Load configuration from a known project root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let config_path = root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    /// Database file for the project at `root`.
    #[must_use]
    pub fn database_path(&self, root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(&self.store.path)
    }

    fn validate(&self) -> Result<()> {
        self.view.validate()
    }
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Database file; relative paths are resolved against `.tasklist/`.
    #[serde(default = "StoreConfig::default_path")]
    pub path: PathBuf,
}

impl StoreConfig {
    fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_DB_FILE)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

/// `[view]` block: defaults for the task list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    page_size: usize,
    page_size_options: Vec<usize>,
    page_links: usize,
    sort_field: SortField,
    sort_direction: SortDirection,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![5, 10, 15, 20],
            page_links: DEFAULT_PAGE_LINKS,
            sort_field: SortField::DueDate,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl ViewConfig {
    /// Rows per page when none is requested.
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Page sizes a user may pick.
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Whether `size` is one of the offered page sizes.
    pub fn offers_page_size(&self, size: usize) -> bool {
        self.page_size_options.contains(&size)
    }

    /// Maximum page links shown under the table.
    pub const fn page_links(&self) -> usize {
        self.page_links
    }

    /// Initial sort key.
    pub const fn sort_field(&self) -> SortField {
        self.sort_field
    }

    /// Initial sort direction.
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("view.page_size must be at least 1");
        }
        if self.page_links == 0 {
            bail!("view.page_links must be at least 1");
        }
        if self.page_size_options.is_empty() {
            bail!("view.page_size_options must not be empty");
        }
        let mut seen = HashSet::new();
        for &option in &self.page_size_options {
            if option == 0 {
                bail!("view.page_size_options entries must be at least 1");
            }
            if !seen.insert(option) {
                bail!("duplicate page size option detected: {option}");
            }
        }
        if !self.offers_page_size(self.page_size) {
            bail!(
                "view.page_size {} is not listed in view.page_size_options",
                self.page_size
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(root: &Path, body: &str) -> Result<()> {
        let cfg_dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(file, "{body}")?;
        Ok(())
    }

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ProjectConfig::from_root(dir.path())?;
        assert_eq!(cfg.view.page_size(), 5);
        assert_eq!(cfg.view.page_size_options(), &[5, 10, 15, 20]);
        assert_eq!(cfg.view.page_links(), 5);
        assert_eq!(cfg.view.sort_field(), SortField::DueDate);
        assert_eq!(cfg.view.sort_direction(), SortDirection::Asc);
        assert_eq!(
            cfg.database_path(dir.path()),
            dir.path().join(".tasklist").join("tasks.db")
        );
        Ok(())
    }

    #[test]
    fn load_config_with_view_and_store() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[store]\npath = \"data/todo.sqlite\"\n\n[view]\npage_size = 10\npage_size_options = [10, 25]\nsort_field = \"priority\"\nsort_direction = \"desc\"",
        )?;

        let cfg = ProjectConfig::from_root(dir.path())?;
        assert_eq!(cfg.view.page_size(), 10);
        assert!(cfg.view.offers_page_size(25));
        assert!(!cfg.view.offers_page_size(5));
        assert_eq!(cfg.view.page_links(), 5);
        assert_eq!(cfg.view.sort_field(), SortField::Priority);
        assert_eq!(cfg.view.sort_direction(), SortDirection::Desc);
        assert_eq!(
            cfg.database_path(dir.path()),
            dir.path().join(".tasklist").join("data/todo.sqlite")
        );
        Ok(())
    }

    #[test]
    fn absolute_store_path_wins() -> Result<()> {
        let dir = tempdir()?;
        let absolute = dir.path().join("elsewhere.db");
        write_config(
            dir.path(),
            &format!("[store]\npath = {:?}", absolute.display().to_string()),
        )?;
        let cfg = ProjectConfig::from_root(dir.path())?;
        assert_eq!(cfg.database_path(dir.path()), absolute);
        Ok(())
    }

    #[test]
    fn page_size_must_be_offered() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[view]\npage_size = 7")?;

        let Err(err) = ProjectConfig::from_root(dir.path()) else {
            panic!("page size outside options should error");
        };
        assert!(format!("{err:#}").contains("not listed in view.page_size_options"));
        Ok(())
    }

    #[test]
    fn invalid_view_values_are_rejected() -> Result<()> {
        let cases = [
            ("[view]\npage_size = 0", "page_size must be at least 1"),
            ("[view]\npage_links = 0", "page_links must be at least 1"),
            ("[view]\npage_size_options = []", "must not be empty"),
            ("[view]\npage_size_options = [5, 5]", "duplicate page size option"),
            ("[view]\npage_size_options = [0, 5]", "entries must be at least 1"),
        ];
        for (body, expected) in cases {
            let dir = tempdir()?;
            write_config(dir.path(), body)?;
            let Err(err) = ProjectConfig::from_root(dir.path()) else {
                panic!("config should be rejected: {body}");
            };
            let message = format!("{err:#}");
            assert!(message.contains(expected), "{message}");
        }
        Ok(())
    }

    #[test]
    fn unknown_sort_field_fails_to_parse() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[view]\nsort_field = \"color\"")?;
        let Err(err) = ProjectConfig::from_root(dir.path()) else {
            panic!("unknown sort field should error");
        };
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }

    #[test]
    fn discover_root_walks_up_to_config_dir() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join(CONFIG_DIR))?;
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested)?;

        assert_eq!(discover_root(&nested), dir.path());

        let (root, cfg) = ProjectConfig::load(&nested)?;
        assert_eq!(root, dir.path());
        assert_eq!(cfg.view.page_size(), 5);
        Ok(())
    }

    #[test]
    fn discover_root_falls_back_to_start() -> Result<()> {
        let dir = tempdir()?;
        let lonely = dir.path().join("lonely");
        fs::create_dir_all(&lonely)?;
        if lonely.ancestors().all(|p| !p.join(CONFIG_DIR).is_dir()) {
            assert_eq!(discover_root(&lonely), lonely);
        }
        Ok(())
    }
}
