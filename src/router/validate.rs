//! Registration-time path grammar.
//!
//! A route path is a `/`-separated sequence of segments. A segment may contain
//! one `:name` parameter (which runs to the next `/`), and the path may end in a
//! single `*` catch-all. Parsing erases parameter names to produce the
//! *structural* path used as the tree key: `/users/:id/files/*` becomes
//! `/users/:/files/*` with names `["id", "*"]`.

use std::sync::Arc;

use super::error::RouteError;

/// Synthetic parameter name bound by a trailing `*`.
pub const WILDCARD_PARAM: &str = "*";

/// A validated route path, decomposed for tree insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedPath {
    /// Path with parameter names erased
    pub structural: String,
    /// Parameter names in path order, `*` last if the path ends in a wildcard
    pub names: Vec<Arc<str>>,
    /// Byte offsets of every `:` and `*` marker within `structural`
    pub markers: Vec<usize>,
}

/// Validate `path` and split it into its structural form and parameter names.
pub(crate) fn parse(path: &str) -> Result<ParsedPath, RouteError> {
    if path.is_empty() {
        return Err(RouteError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash {
            path: path.to_owned(),
        });
    }
    if path.contains("//") {
        return Err(RouteError::EmptySegment {
            path: path.to_owned(),
        });
    }

    let mut structural = String::with_capacity(path.len());
    let mut names: Vec<Arc<str>> = Vec::new();
    let mut markers = Vec::new();
    let mut wildcards = 0usize;
    let mut rest = path;

    while let Some(pos) = rest.find([':', '*']) {
        structural.push_str(&rest[..pos]);
        let marker = rest.as_bytes()[pos];
        let after = &rest[pos + 1..];

        if marker == b'*' {
            wildcards += 1;
            if wildcards > 1 || after.contains('*') {
                return Err(RouteError::MultipleWildcards {
                    path: path.to_owned(),
                });
            }
            if !after.is_empty() {
                return Err(RouteError::WildcardNotAtEnd {
                    path: path.to_owned(),
                });
            }
            markers.push(structural.len());
            structural.push('*');
            names.push(Arc::from(WILDCARD_PARAM));
            rest = after;
            continue;
        }

        let end = after.find('/').unwrap_or(after.len());
        let name = &after[..end];
        check_param_name(path, name)?;
        if names.iter().any(|existing| existing.as_ref() == name) {
            return Err(RouteError::DuplicateParamName {
                path: path.to_owned(),
                name: name.to_owned(),
            });
        }
        markers.push(structural.len());
        structural.push(':');
        names.push(Arc::from(name));
        rest = &after[end..];
    }
    structural.push_str(rest);

    Ok(ParsedPath {
        structural,
        names,
        markers,
    })
}

fn check_param_name(path: &str, name: &str) -> Result<(), RouteError> {
    match name.find([':', '*']) {
        None if !name.is_empty() => Ok(()),
        None | Some(0) => Err(RouteError::EmptyParamName {
            path: path.to_owned(),
        }),
        Some(pos) if &name[pos..] == "*" => Err(RouteError::WildcardAfterParam {
            path: path.to_owned(),
        }),
        Some(_) if name.matches('*').count() > 1 => Err(RouteError::MultipleWildcards {
            path: path.to_owned(),
        }),
        Some(_) => Err(RouteError::InvalidParamName {
            path: path.to_owned(),
            name: name.to_owned(),
        }),
    }
}
