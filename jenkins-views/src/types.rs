//! Request payloads and response shapes for the view API.
//!
//! Field names here are what Jenkins' stapler form binding expects, so the
//! serde renames must match the server byte for byte.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Mode string Jenkins uses for list views.
pub const LIST_VIEW_MODE: &str = "hudson.model.ListView";

/// Mode string Jenkins uses for "my" views.
pub const MY_VIEW_MODE: &str = "hudson.model.MyView";

/// Name of the default view that always exists and cannot be deleted.
pub const ALL_VIEW: &str = "All";

/// Column renderer classes shown on a freshly configured list view, in display order.
pub const LIST_VIEW_COLUMNS: [&str; 7] = [
    "hudson.views.StatusColumn",
    "hudson.views.WeatherColumn",
    "hudson.views.JobColumn",
    "hudson.views.LastSuccessColumn",
    "hudson.views.LastFailureColumn",
    "hudson.views.LastDurationColumn",
    "hudson.views.BuildButtonColumn",
];

// ────────────────────────────────────────────────────────────────────────────
// View type and status filter
// ────────────────────────────────────────────────────────────────────────────

/// Kind of view that can be created through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    #[default]
    ListView,
    MyView,
}

impl ViewType {
    /// Server-side class name for this view type.
    pub fn mode(&self) -> &'static str {
        match self {
            ViewType::ListView => LIST_VIEW_MODE,
            ViewType::MyView => MY_VIEW_MODE,
        }
    }

    /// Short name accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::ListView => "listview",
            ViewType::MyView => "myview",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "listview" => Ok(ViewType::ListView),
            "myview" => Ok(ViewType::MyView),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

/// Which jobs a list view shows based on their enabled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    AllSelectedJobs,
    EnabledJobsOnly,
    DisabledJobsOnly,
}

impl StatusFilter {
    /// Look up a filter by its name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all_selected_jobs" => Some(StatusFilter::AllSelectedJobs),
            "enabled_jobs_only" => Some(StatusFilter::EnabledJobsOnly),
            "disabled_jobs_only" => Some(StatusFilter::DisabledJobsOnly),
            _ => None,
        }
    }

    /// Value of the `statusFilter` form field.
    pub fn form_value(&self) -> &'static str {
        match self {
            StatusFilter::AllSelectedJobs => "",
            StatusFilter::EnabledJobsOnly => "1",
            StatusFilter::DisabledJobsOnly => "2",
        }
    }
}

/// `statusFilter` form value for an optional filter; absent means all jobs.
pub fn status_filter_value(filter: Option<StatusFilter>) -> &'static str {
    filter.map(|f| f.form_value()).unwrap_or("")
}

// ────────────────────────────────────────────────────────────────────────────
// Form parameters
// ────────────────────────────────────────────────────────────────────────────

/// Ordered form fields for a POST body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping insertion order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Value of the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request payloads
// ────────────────────────────────────────────────────────────────────────────

/// JSON body duplicated into the `json` field of `/createView`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateViewRequest {
    pub name: String,
    pub mode: String,
}

impl CreateViewRequest {
    pub fn new(name: impl Into<String>, view_type: ViewType) -> Self {
        Self {
            name: name.into(),
            mode: view_type.mode().to_string(),
        }
    }

    /// Flat `name`/`mode` fields plus the same pair encoded under `json`.
    pub fn to_form(&self) -> Result<FormParams> {
        Ok(FormParams::new()
            .with("name", &self.name)
            .with("mode", &self.mode)
            .with("json", serde_json::to_string(self)?))
    }
}

/// A display column entry in a list view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "stapler-class")]
    pub stapler_class: String,
    pub kind: String,
}

impl ColumnDescriptor {
    pub fn new(class: &str) -> Self {
        Self {
            stapler_class: class.to_string(),
            kind: class.to_string(),
        }
    }

    /// The fixed column set used for new list views.
    pub fn defaults() -> Vec<Self> {
        LIST_VIEW_COLUMNS.iter().map(|c| Self::new(c)).collect()
    }
}

/// JSON body of a list view `configSubmit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListViewConfigRequest {
    pub name: String,
    pub description: String,
    pub mode: String,
    #[serde(rename = "statusFilter")]
    pub status_filter: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl ListViewConfigRequest {
    pub fn from_config(config: &ListViewConfig) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone().unwrap_or_default(),
            mode: LIST_VIEW_MODE.to_string(),
            status_filter: status_filter_value(config.status_filter).to_string(),
            columns: ColumnDescriptor::defaults(),
        }
    }

    /// Form fields for `configSubmit`.
    ///
    /// Optional flags are only present when set; Jenkins treats any
    /// present checkbox field as checked.
    pub fn to_form(&self, config: &ListViewConfig) -> Result<FormParams> {
        let mut form = FormParams::new()
            .with("name", &self.name)
            .with("mode", &self.mode)
            .with("description", &self.description)
            .with("statusFilter", &self.status_filter)
            .with("json", serde_json::to_string(self)?);

        if config.filter_queue {
            form.push("filterQueue", "on");
        }
        if config.filter_executors {
            form.push("filterExecutors", "on");
        }
        if let Some(regex) = &config.regex {
            form.push("useincluderegex", "on");
            form.push("includeRegex", regex);
        }

        Ok(form)
    }
}

/// Settings for [`ViewClient::create_list_view`](crate::ViewClient::create_list_view).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListViewConfig {
    pub name: String,
    pub description: Option<String>,
    pub status_filter: Option<StatusFilter>,
    pub filter_queue: bool,
    pub filter_executors: bool,
    pub regex: Option<String>,
}

impl ListViewConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status_filter(mut self, filter: StatusFilter) -> Self {
        self.status_filter = Some(filter);
        self
    }

    /// Set the status filter by name; unknown names clear it.
    pub fn status_filter_name(mut self, name: &str) -> Self {
        self.status_filter = StatusFilter::from_name(name);
        self
    }

    pub fn filter_queue(mut self, on: bool) -> Self {
        self.filter_queue = on;
        self
    }

    pub fn filter_executors(mut self, on: bool) -> Self {
        self.filter_executors = on;
        self
    }

    pub fn regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response shapes
// ────────────────────────────────────────────────────────────────────────────

/// A view entry from the root API's `views` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub name: String,
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// A job entry from a view's `jobs` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Root API response restricted to `views`.
#[derive(Debug, Deserialize)]
pub(crate) struct ViewsResponse {
    pub views: Vec<ViewSummary>,
}

/// View API response restricted to `jobs`.
#[derive(Debug, Deserialize)]
pub(crate) struct JobsResponse {
    pub jobs: Vec<JobSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_type_parses_known_names() {
        assert_eq!("listview".parse::<ViewType>().unwrap(), ViewType::ListView);
        assert_eq!("myview".parse::<ViewType>().unwrap(), ViewType::MyView);
    }

    #[test]
    fn view_type_rejects_unknown_name() {
        let err = "bogus".parse::<ViewType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(ref t) if t == "bogus"));
    }

    #[test]
    fn view_type_maps_to_mode() {
        assert_eq!(ViewType::ListView.mode(), "hudson.model.ListView");
        assert_eq!(ViewType::MyView.mode(), "hudson.model.MyView");
        assert_eq!(ViewType::default(), ViewType::ListView);
    }

    #[test]
    fn status_filter_form_values() {
        assert_eq!(status_filter_value(StatusFilter::from_name("all_selected_jobs")), "");
        assert_eq!(status_filter_value(StatusFilter::from_name("enabled_jobs_only")), "1");
        assert_eq!(status_filter_value(StatusFilter::from_name("disabled_jobs_only")), "2");
        assert_eq!(status_filter_value(StatusFilter::from_name("whatever")), "");
        assert_eq!(status_filter_value(None), "");
    }

    #[test]
    fn form_params_keep_insertion_order() {
        let form = FormParams::new().with("b", "2").with("a", "1");
        assert_eq!(form.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(form.get("a"), Some("1"));
        assert!(!form.contains_key("c"));
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn create_request_duplicates_fields_into_json() {
        let form = CreateViewRequest::new("nightly", ViewType::MyView)
            .to_form()
            .unwrap();

        assert_eq!(form.keys().collect::<Vec<_>>(), vec!["name", "mode", "json"]);
        assert_eq!(form.get("name"), Some("nightly"));
        assert_eq!(form.get("mode"), Some("hudson.model.MyView"));
        assert_eq!(
            form.get("json"),
            Some(r#"{"name":"nightly","mode":"hudson.model.MyView"}"#)
        );
    }

    #[test]
    fn list_view_json_has_seven_columns_in_order() {
        let config = ListViewConfig::new("release");
        let request = ListViewConfigRequest::from_config(&config);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();

        let columns = json["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 7);
        assert_eq!(columns[0]["stapler-class"], "hudson.views.StatusColumn");
        assert_eq!(columns[0]["kind"], "hudson.views.StatusColumn");
        assert_eq!(columns[6]["stapler-class"], "hudson.views.BuildButtonColumn");
        assert_eq!(json["mode"], "hudson.model.ListView");
        assert_eq!(json["statusFilter"], "");
        assert_eq!(json["description"], "");
    }

    #[test]
    fn list_view_form_omits_unset_flags() {
        let config = ListViewConfig::new("release");
        let form = ListViewConfigRequest::from_config(&config)
            .to_form(&config)
            .unwrap();

        assert!(!form.contains_key("filterQueue"));
        assert!(!form.contains_key("filterExecutors"));
        assert!(!form.contains_key("useincluderegex"));
        assert!(!form.contains_key("includeRegex"));
    }

    #[test]
    fn list_view_form_includes_set_flags() {
        let config = ListViewConfig::new("release")
            .description("Release jobs")
            .status_filter(StatusFilter::DisabledJobsOnly)
            .filter_queue(true)
            .filter_executors(true)
            .regex("^release-.*");
        let form = ListViewConfigRequest::from_config(&config)
            .to_form(&config)
            .unwrap();

        assert_eq!(form.get("description"), Some("Release jobs"));
        assert_eq!(form.get("statusFilter"), Some("2"));
        assert_eq!(form.get("filterQueue"), Some("on"));
        assert_eq!(form.get("filterExecutors"), Some("on"));
        assert_eq!(form.get("useincluderegex"), Some("on"));
        assert_eq!(form.get("includeRegex"), Some("^release-.*"));
    }

    #[test]
    fn parse_views_response_reads_class() {
        let json = r#"{
            "_class": "hudson.model.Hudson",
            "views": [
                {"_class": "hudson.model.AllView", "name": "All"},
                {"_class": "hudson.model.ListView", "name": "release"}
            ]
        }"#;

        let response: ViewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.views.len(), 2);
        assert_eq!(response.views[1].name, "release");
        assert_eq!(
            response.views[1].class.as_deref(),
            Some("hudson.model.ListView")
        );
    }

    #[test]
    fn parse_jobs_response_tolerates_missing_details() {
        let json = r#"{"jobs": [{"name": "build"}, {"name": "deploy", "color": "blue"}]}"#;

        let response: JobsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.jobs[0].name, "build");
        assert!(response.jobs[0].color.is_none());
        assert_eq!(response.jobs[1].color.as_deref(), Some("blue"));
    }
}
