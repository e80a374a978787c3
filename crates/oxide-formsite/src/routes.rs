//! Route table and path matching.

use regex::Regex;

use crate::error::{Result, SiteError};
use crate::http::{Method, PathParams};

/// Every operation the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    ListForms,
    CreateForm,
    GetForm,
    UpdateForm,
    DeleteForm,
    PublishForm,
    UnpublishForm,
    DuplicateForm,
    FormStats,
    SubmitForm,
    ListSubmissions,
    ExportSubmissions,
    GetSubmission,
    DeleteSubmission,
    PublicForm,
    ShowForm,
    PostForm,
}

const ROUTES: &[(Method, &str, Endpoint)] = &[
    (Method::Get, "/api/health", Endpoint::Health),
    (Method::Get, "/api/forms", Endpoint::ListForms),
    (Method::Post, "/api/forms", Endpoint::CreateForm),
    (Method::Get, "/api/forms/{id}", Endpoint::GetForm),
    (Method::Put, "/api/forms/{id}", Endpoint::UpdateForm),
    (Method::Delete, "/api/forms/{id}", Endpoint::DeleteForm),
    (Method::Post, "/api/forms/{id}/publish", Endpoint::PublishForm),
    (Method::Post, "/api/forms/{id}/unpublish", Endpoint::UnpublishForm),
    (Method::Post, "/api/forms/{id}/duplicate", Endpoint::DuplicateForm),
    (Method::Get, "/api/forms/{id}/stats", Endpoint::FormStats),
    (Method::Post, "/api/forms/{id}/submit", Endpoint::SubmitForm),
    (Method::Get, "/api/forms/{id}/submissions", Endpoint::ListSubmissions),
    (Method::Get, "/api/forms/{id}/export", Endpoint::ExportSubmissions),
    (Method::Get, "/api/submissions/{id}", Endpoint::GetSubmission),
    (Method::Delete, "/api/submissions/{id}", Endpoint::DeleteSubmission),
    (Method::Get, "/api/public/forms/{id}", Endpoint::PublicForm),
    (Method::Get, "/form/{id}", Endpoint::ShowForm),
    (Method::Post, "/form/{id}", Endpoint::PostForm),
];

/// A compiled path pattern such as `/api/forms/{id}`.
///
/// Each `{name}` segment captures one non-empty path segment. A trailing
/// slash is accepted.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compiles a pattern such as `/api/forms/{id}`.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");

        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            regex_str.push('/');
            if let Some(name) = part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                param_names.push(name.to_string());
                regex_str.push_str("([^/]+)");
            } else {
                regex_str.push_str(&regex::escape(part));
            }
        }
        regex_str.push_str("/?$");

        let regex = Regex::new(&regex_str)
            .map_err(|e| SiteError::InvalidPattern(format!("{pattern}: {e}")))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            param_names,
        })
    }

    /// Matches a path, returning the captured parameters.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let mut params = PathParams::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.insert(name.clone(), value.as_str());
            }
        }
        Some(params)
    }

    /// Returns the pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Resolves method and path to an [`Endpoint`].
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<(Method, PathPattern, Endpoint)>,
}

impl Router {
    /// Compiles the site's route table.
    pub fn new() -> Result<Self> {
        let routes = ROUTES
            .iter()
            .map(|&(method, pattern, endpoint)| {
                PathPattern::new(pattern).map(|p| (method, p, endpoint))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { routes })
    }

    /// Finds the endpoint for a request. A path that matches only under
    /// other methods yields [`SiteError::MethodNotAllowed`].
    pub fn resolve(&self, method: Method, path: &str) -> Result<(Endpoint, PathParams)> {
        let mut path_matched = false;
        for (route_method, pattern, endpoint) in &self.routes {
            if let Some(params) = pattern.match_path(path) {
                if *route_method == method {
                    return Ok((*endpoint, params));
                }
                path_matched = true;
            }
        }

        let path = path.to_string();
        Err(if path_matched {
            SiteError::MethodNotAllowed { method, path }
        } else {
            SiteError::NotFound { method, path }
        })
    }
}
