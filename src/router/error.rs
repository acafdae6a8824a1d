use http::Method;
use std::fmt;

/// Route registration error
///
/// Returned by [`Router::try_register`](super::Router::try_register) when a
/// path is malformed or collides with a route that is already registered.
/// [`Router::register`](super::Router::register) panics with the same value,
/// since a bad route table is a startup bug rather than a request-time condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The path is the empty string
    EmptyPath,
    /// The path does not begin with `/`
    MissingLeadingSlash {
        /// The offending path
        path: String,
    },
    /// The path contains `//`
    EmptySegment {
        /// The offending path
        path: String,
    },
    /// A `:` is not followed by a name
    EmptyParamName {
        /// The offending path
        path: String,
    },
    /// A parameter name contains `:` or `*`, i.e. two markers share a segment
    InvalidParamName {
        /// The offending path
        path: String,
        /// The name as written, up to the next `/`
        name: String,
    },
    /// The same parameter name appears twice in one path
    DuplicateParamName {
        /// The offending path
        path: String,
        /// The repeated name
        name: String,
    },
    /// More than one `*` in the path
    MultipleWildcards {
        /// The offending path
        path: String,
    },
    /// A `*` that is not the last character of the path
    WildcardNotAtEnd {
        /// The offending path
        path: String,
    },
    /// A `*` directly following a parameter name (`/:id*`)
    WildcardAfterParam {
        /// The offending path
        path: String,
    },
    /// The same method and path shape is already registered
    DuplicateRoute {
        /// HTTP method of the rejected route
        method: Method,
        /// The rejected path
        path: String,
    },
    /// The path shape is already registered with different parameter names
    AmbiguousRoute {
        /// The rejected path
        path: String,
        /// The path that was registered first
        existing: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::EmptyPath => write!(f, "route path must not be empty"),
            RouteError::MissingLeadingSlash { path } => {
                write!(f, "route path '{}' must begin with '/'", path)
            }
            RouteError::EmptySegment { path } => {
                write!(f, "route path '{}' contains an empty segment ('//')", path)
            }
            RouteError::EmptyParamName { path } => {
                write!(f, "route path '{}' has a ':' without a parameter name", path)
            }
            RouteError::InvalidParamName { path, name } => write!(
                f,
                "route path '{}' has invalid parameter name '{}'. \
                Parameters in the same segment must be separated by '/'",
                path, name
            ),
            RouteError::DuplicateParamName { path, name } => write!(
                f,
                "route path '{}' binds parameter '{}' more than once",
                path, name
            ),
            RouteError::MultipleWildcards { path } => {
                write!(f, "route path '{}' contains more than one '*'", path)
            }
            RouteError::WildcardNotAtEnd { path } => {
                write!(f, "route path '{}' has a '*' that is not at the end", path)
            }
            RouteError::WildcardAfterParam { path } => write!(
                f,
                "route path '{}' has a '*' directly after a parameter. \
                Separate them with '/'",
                path
            ),
            RouteError::DuplicateRoute { method, path } => {
                write!(f, "route {} {} is already registered", method, path)
            }
            RouteError::AmbiguousRoute { path, existing } => write!(
                f,
                "route path '{}' is ambiguous with '{}': same shape, different parameter names",
                path, existing
            ),
        }
    }
}

impl std::error::Error for RouteError {}
