//! Route table for the task views.
//!
//! | Path            | Route                        |
//! |-----------------|------------------------------|
//! | `/`             | redirect to [`Route::TaskList`] |
//! | `/tasks`        | [`Route::TaskList`]          |
//! | `/tasks/create` | [`Route::TaskCreate`]        |
//! | `/tasks/:id`    | [`Route::TaskEdit`], guarded |

use std::fmt;

/// A view the client can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    TaskList,
    TaskCreate,
    TaskEdit { id: String },
    NotFound { path: String },
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: Route,
    /// Path originally asked for when a redirect or guard kicked in.
    pub redirected_from: Option<String>,
}

impl Route {
    /// Resolve a path, applying redirects and the edit-view guard.
    #[must_use]
    pub fn resolve(path: &str) -> Resolution {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let direct = |route| Resolution {
            route,
            redirected_from: None,
        };
        let redirect = |route| Resolution {
            route,
            redirected_from: Some(path.to_string()),
        };

        match segments.as_slice() {
            [] => redirect(Self::TaskList),
            ["tasks"] => direct(Self::TaskList),
            ["tasks", "create"] => direct(Self::TaskCreate),
            ["tasks", id] if !id.trim().is_empty() => direct(Self::TaskEdit {
                id: (*id).to_string(),
            }),
            ["tasks", _] => redirect(Self::TaskList),
            _ => direct(Self::NotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Canonical path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::TaskList => "/tasks".to_string(),
            Self::TaskCreate => "/tasks/create".to_string(),
            Self::TaskEdit { id } => format!("/tasks/{id}"),
            Self::NotFound { path } => path.clone(),
        }
    }

    /// Route name, as used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TaskList => "TaskList",
            Self::TaskCreate => "TaskCreate",
            Self::TaskEdit { .. } => "TaskEdit",
            Self::NotFound { .. } => "NotFound",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_to_list() {
        let resolution = Route::resolve("/");
        assert_eq!(resolution.route, Route::TaskList);
        assert_eq!(resolution.redirected_from.as_deref(), Some("/"));

        assert_eq!(Route::resolve("").route, Route::TaskList);
    }

    #[test]
    fn test_known_routes() {
        assert_eq!(
            Route::resolve("/tasks/"),
            Resolution {
                route: Route::TaskList,
                redirected_from: None
            }
        );
        assert_eq!(Route::resolve("/tasks/create").route, Route::TaskCreate);
        assert_eq!(
            Route::resolve("/tasks/3f2a?tab=details").route,
            Route::TaskEdit {
                id: "3f2a".to_string()
            }
        );
    }

    #[test]
    fn test_edit_guard_redirects_blank_id() {
        let resolution = Route::resolve("/tasks/ ");
        assert_eq!(resolution.route, Route::TaskList);
        assert_eq!(resolution.redirected_from.as_deref(), Some("/tasks/ "));
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(
            Route::resolve("/settings").route,
            Route::NotFound {
                path: "/settings".to_string()
            }
        );
        assert_eq!(Route::resolve("/tasks/1/edit").route.name(), "NotFound");
    }
}
