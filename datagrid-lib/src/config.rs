//! Table configuration

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::query::DEFAULT_ROWS_PER_PAGE;
use crate::query::Features;
use crate::query::FilterScope;

/// Page size choices offered by the pagination footer by default.
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

/// Colour tokens for presentation shells.
///
/// Every token is optional; [`Theme::resolve`] fills in the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(alias = "primaryColor")]
    pub primary_color: Option<String>,
    #[serde(alias = "headerBg")]
    pub header_bg: Option<String>,
    #[serde(alias = "rowHoverColor")]
    pub row_hover_color: Option<String>,
    #[serde(alias = "borderColor")]
    pub border_color: Option<String>,
    #[serde(alias = "buttonBg")]
    pub button_bg: Option<String>,
    #[serde(alias = "textColor")]
    pub text_color: Option<String>,
}

/// A theme with every token filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub primary_color: String,
    pub header_bg: String,
    pub row_hover_color: String,
    pub border_color: String,
    pub button_bg: String,
    pub text_color: String,
}

impl Theme {
    /// Fills unset tokens with the default palette.
    pub fn resolve(&self) -> ResolvedTheme {
        fn pick(value: &Option<String>, default: &str) -> String {
            value.clone().unwrap_or_else(|| default.to_string())
        }
        ResolvedTheme {
            primary_color: pick(&self.primary_color, "#1976d2"),
            header_bg: pick(&self.header_bg, "#f5f5f5"),
            row_hover_color: pick(&self.row_hover_color, "#fafafa"),
            border_color: pick(&self.border_color, "#e0e0e0"),
            button_bg: pick(&self.button_bg, "#1976d2"),
            text_color: pick(&self.text_color, "#212121"),
        }
    }
}

/// Per-table configuration.
///
/// Controls which engine stages run, which affordances a shell shows and the
/// initial page size.
///
/// # Example
///
/// ```
/// use datagrid_lib::config::TableConfig;
/// use datagrid_lib::query::FilterScope;
///
/// let config = TableConfig::default()
///     .with_rows_per_page(25)
///     .with_filter_scope(FilterScope::VisibleColumns)
///     .with_title("Customers");
///
/// assert_eq!(config.rows_per_page, 25);
/// assert!(config.features.sorting);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Enabled engine stages.
    pub features: Features,

    /// Search and text-filter scope.
    ///
    /// Default: every field, regardless of column visibility
    pub filter_scope: FilterScope,

    /// Initial rows per page.
    ///
    /// Default: 10
    pub rows_per_page: usize,

    /// Page sizes offered to the user.
    ///
    /// Default: 5, 10, 25, 50
    pub rows_per_page_options: Vec<usize>,

    /// Table title shown above the toolbar.
    pub title: Option<String>,

    /// Subtitle shown under the title.
    pub subtitle: Option<String>,

    /// Show the global search box.
    pub show_search: bool,

    /// Show the CSV export button.
    pub show_export: bool,

    /// Show the column visibility menu.
    pub show_column_menu: bool,

    /// Show the pagination footer.
    pub show_pagination: bool,

    /// Allow reordering visible columns.
    pub column_move: bool,

    /// Colour tokens.
    pub theme: Theme,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            features: Features::default(),
            filter_scope: FilterScope::default(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec(),
            title: None,
            subtitle: None,
            show_search: true,
            show_export: true,
            show_column_menu: true,
            show_pagination: true,
            column_move: false,
            theme: Theme::default(),
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        log::debug!("loaded table config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows_per_page == 0 {
            return Err(ConfigError::invalid("rows_per_page", "must be at least 1"));
        }
        if self.rows_per_page_options.contains(&0) {
            return Err(ConfigError::invalid(
                "rows_per_page_options",
                "page sizes must be at least 1",
            ));
        }
        Ok(())
    }

    /// Sets the enabled engine stages.
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Sets the search and text-filter scope.
    pub fn with_filter_scope(mut self, scope: FilterScope) -> Self {
        self.filter_scope = scope;
        self
    }

    /// Sets the initial rows per page (clamped to at least one).
    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page.max(1);
        self
    }

    /// Sets the page sizes offered to the user.
    pub fn with_rows_per_page_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.rows_per_page_options = options.into();
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Sets the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Enables column reordering.
    pub fn with_column_move(mut self, enabled: bool) -> Self {
        self.column_move = enabled;
        self
    }
}
