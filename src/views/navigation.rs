//! Navigation adapters
//!
//! Views read their journey id from a route parameter and the highlight
//! request from a query parameter. Where those come from depends on how the
//! view was reached: a URL path, or already-parsed arguments. Each source
//! implements [`NavigationAdapter`] and the views never care which one it is.

use crate::error::{JourneyError, Result};
use crate::highlight::{HighlightRequest, EVENT_QUERY_PARAM};

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// Route parameter naming the journey
pub const JOURNEY_ROUTE_PARAM: &str = "id";

/// Base that relative route paths are resolved against
fn app_base() -> &'static Url {
    static BASE: OnceLock<Url> = OnceLock::new();
    BASE.get_or_init(|| Url::parse("journeyscope://app/").expect("static base is valid"))
}

/// Source of route and query parameters for a view
pub trait NavigationAdapter: Send + Sync {
    /// Value of a path parameter such as `id`
    fn route_param(&self, name: &str) -> Option<String>;

    /// Value of a query parameter such as `event`
    fn query_param(&self, name: &str) -> Option<String>;

    /// Highlight request carried by the `event` query parameter
    fn highlight(&self) -> HighlightRequest {
        HighlightRequest::from_param(self.query_param(EVENT_QUERY_PARAM).as_deref())
    }
}

/// The three per-journey views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Flowchart,
    Docs,
    Replay,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Flowchart, ViewKind::Docs, ViewKind::Replay];

    pub fn segment(&self) -> &'static str {
        match self {
            ViewKind::Flowchart => "flowchart",
            ViewKind::Docs => "docs",
            ViewKind::Replay => "replay",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        ViewKind::ALL.into_iter().find(|kind| kind.segment() == segment)
    }

    /// Tab label shown in journey navigation
    pub fn label(&self) -> &'static str {
        match self {
            ViewKind::Flowchart => "Flowchart",
            ViewKind::Docs => "Documentation",
            ViewKind::Replay => "Replay",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// A journey view plus its optional highlighted event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub journey_id: String,
    pub view: ViewKind,
    pub event: Option<String>,
}

impl Route {
    pub fn new(journey_id: impl Into<String>, view: ViewKind) -> Self {
        Self {
            journey_id: journey_id.into(),
            view,
            event: None,
        }
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event = Some(event_id.into());
        self
    }

    /// Path form, e.g. `/journey/j1/docs?event=e7`
    ///
    /// The journey id and event id are percent-encoded, so parsing the path
    /// with [`UrlNavigation::parse`] yields them back unchanged.
    pub fn to_path(&self) -> String {
        let mut url = app_base().clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .clear()
                .push("journey")
                .push(&self.journey_id)
                .push(self.view.segment());
        }
        if let Some(event) = &self.event {
            url.query_pairs_mut().append_pair(EVENT_QUERY_PARAM, event);
        }

        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Parameters parsed from a `/journey/{id}/{view}?event=...` path or URL
#[derive(Debug, Clone)]
pub struct UrlNavigation {
    route_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
    view: ViewKind,
}

impl UrlNavigation {
    /// Parse a route path or absolute URL
    ///
    /// # Errors
    ///
    /// Returns [`JourneyError::Route`] if the path is not a journey view.
    pub fn parse(target: &str) -> Result<Self> {
        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(_) => app_base()
                .join(target)
                .map_err(|e| JourneyError::Route(format!("{}: {}", target, e)))?,
        };

        let segments = url
            .path_segments()
            .map(|s| {
                s.filter(|seg| !seg.is_empty())
                    .map(|seg| {
                        percent_decode_str(seg)
                            .decode_utf8()
                            .map(|decoded| decoded.into_owned())
                            .map_err(|e| JourneyError::Route(format!("{}: {}", target, e)))
                    })
                    .collect::<std::result::Result<Vec<String>, JourneyError>>()
            })
            .transpose()?
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let (journey_id, view) = match segments.as_slice() {
            ["journey", id, view] => match ViewKind::from_segment(view) {
                Some(kind) => (id.to_string(), kind),
                None => return Err(JourneyError::Route(target.to_string()).into()),
            },
            ["journey", id] => (id.to_string(), ViewKind::Flowchart),
            _ => return Err(JourneyError::Route(target.to_string()).into()),
        };

        let mut route_params = HashMap::new();
        route_params.insert(JOURNEY_ROUTE_PARAM.to_string(), journey_id);

        let query_params = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            route_params,
            query_params,
            view,
        })
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }
}

impl NavigationAdapter for UrlNavigation {
    fn route_param(&self, name: &str) -> Option<String> {
        self.route_params.get(name).cloned()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.query_params.get(name).cloned()
    }
}

/// Parameters supplied directly, as from parsed command-line arguments
#[derive(Debug, Clone, Default)]
pub struct StaticNavigation {
    route_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
}

impl StaticNavigation {
    /// Navigation for a journey with an optional highlighted event
    pub fn journey(journey_id: &str, event: Option<&str>) -> Self {
        let mut nav = Self::default();
        nav.route_params
            .insert(JOURNEY_ROUTE_PARAM.to_string(), journey_id.to_string());
        if let Some(event) = event {
            nav.query_params
                .insert(EVENT_QUERY_PARAM.to_string(), event.to_string());
        }
        nav
    }
}

impl NavigationAdapter for StaticNavigation {
    fn route_param(&self, name: &str) -> Option<String> {
        self.route_params.get(name).cloned()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.query_params.get(name).cloned()
    }
}

/// Journey id from the adapter's route parameters
pub fn journey_id(nav: &dyn NavigationAdapter) -> Result<String> {
    nav.route_param(JOURNEY_ROUTE_PARAM)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| JourneyError::Route("missing journey id".to_string()).into())
}
