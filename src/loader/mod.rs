//! Shared page fragments (header, scripts, footer) and the retry policy used
//! to fetch them. The browser transport lives in the wasm driver.

mod retry;

pub use retry::RetryPolicy;

pub const COMPONENT_DIR: &str = "components";
/// Fired on `document` once per injected fragment, `detail.component` = name.
pub const LOADED_EVENT: &str = "componentLoaded";
/// Fired on `document` after every fragment has loaded or failed.
pub const READY_EVENT: &str = "componentsReady";
/// Class of the inline element shown in place of a fragment that failed.
pub const ERROR_CLASS: &str = "component-error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    /// Id of the container the HTML goes into.
    pub target_id: String,
    pub url: String,
}

impl Fragment {
    /// `components/<name>.html`, loaded into `#component-<name>`.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            target_id: format!("component-{name}"),
            url: format!("{COMPONENT_DIR}/{name}.html"),
        }
    }

    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self { url: url.into(), ..self }
    }

    pub fn error_html(&self) -> String {
        format!(
            "<p class=\"{ERROR_CLASS}\">Could not load the {} section.</p>",
            self.name
        )
    }
}

/// Header first so page scripts see it, then the script list, then footer.
pub fn default_fragments() -> Vec<Fragment> {
    ["header", "scripts", "footer"].into_iter().map(Fragment::named).collect()
}
