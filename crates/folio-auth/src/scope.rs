//! Capability scopes.
//!
//! A scope is a colon-separated capability string. Content-type scopes have
//! the form `collections:{slug}:{action}` where `slug` may be `*` and
//! `action` is `*`, a class (`read`/`write`) or an operation name. Globals
//! share the `collections:` namespace.
//!
//! An operation on a type is permitted by any of:
//!
//! | Scope                          | Grants                          |
//! |--------------------------------|---------------------------------|
//! | `collections:*:*`              | everything                      |
//! | `collections:{slug}:*`         | every operation on the type     |
//! | `collections:{slug}:read`      | `list`, `get`                   |
//! | `collections:{slug}:write`     | `create`, `update`, `delete`    |
//! | `collections:{slug}:{op}`      | exactly that operation          |

use folio_core::{Operation, OperationClass};

/// Universal wildcard.
pub const ALL_COLLECTIONS: &str = "collections:*:*";

/// Permission to call discovery endpoints.
pub const MCP_DESCRIBE: &str = "mcp:describe";

/// Permission to upload media.
pub const MEDIA_UPLOAD: &str = "media:upload";

const WILDCARD: &str = "*";

/// A parsed `collections:` scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionScope {
    /// `None` for `*`.
    pub slug: Option<String>,
    pub action: ScopeAction,
}

/// The action part of a collection scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeAction {
    Any,
    Class(OperationClass),
    Exact(Operation),
}

impl CollectionScope {
    /// Parse a scope string; returns `None` for non-collection or malformed scopes.
    pub fn parse(scope: &str) -> Option<Self> {
        let mut parts = scope.split(':');
        let namespace = parts.next()?;
        let slug = parts.next()?;
        let action = parts.next()?;
        if namespace != "collections" || slug.is_empty() || parts.next().is_some() {
            return None;
        }

        let action = match action {
            WILDCARD => ScopeAction::Any,
            "read" => ScopeAction::Class(OperationClass::Read),
            "write" => ScopeAction::Class(OperationClass::Write),
            other => ScopeAction::Exact(other.parse().ok()?),
        };
        let slug = if slug == WILDCARD {
            None
        } else {
            Some(slug.to_string())
        };

        // A type wildcard only combines with an action wildcard.
        if slug.is_none() && action != ScopeAction::Any {
            return None;
        }

        Some(Self { slug, action })
    }

    /// Whether this scope permits `operation` on `slug`.
    pub fn permits(&self, slug: &str, operation: Operation) -> bool {
        let slug_matches = match &self.slug {
            None => true,
            Some(s) => s == slug,
        };
        if !slug_matches {
            return false;
        }
        match self.action {
            ScopeAction::Any => true,
            ScopeAction::Class(class) => class == operation.class(),
            ScopeAction::Exact(op) => op == operation,
        }
    }
}

/// Build the scope string for a type and action.
pub fn collection_scope(slug: &str, action: &str) -> String {
    format!("collections:{}:{}", slug, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(
            CollectionScope::parse("collections:*:*"),
            Some(CollectionScope {
                slug: None,
                action: ScopeAction::Any
            })
        );
        assert_eq!(
            CollectionScope::parse("collections:posts:read").map(|s| s.action),
            Some(ScopeAction::Class(OperationClass::Read))
        );
        assert_eq!(
            CollectionScope::parse("collections:posts:delete").map(|s| s.action),
            Some(ScopeAction::Exact(Operation::Delete))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CollectionScope::parse("media:upload").is_none());
        assert!(CollectionScope::parse("collections:posts").is_none());
        assert!(CollectionScope::parse("collections:posts:read:extra").is_none());
        assert!(CollectionScope::parse("collections:posts:publish").is_none());
        assert!(CollectionScope::parse("collections::read").is_none());
        assert!(CollectionScope::parse("collections:*:read").is_none());
    }

    #[test]
    fn test_permits() {
        let read = CollectionScope::parse("collections:posts:read").unwrap();
        assert!(read.permits("posts", Operation::List));
        assert!(read.permits("posts", Operation::Get));
        assert!(!read.permits("posts", Operation::Create));
        assert!(!read.permits("pages", Operation::List));

        let exact = CollectionScope::parse("collections:posts:update").unwrap();
        assert!(exact.permits("posts", Operation::Update));
        assert!(!exact.permits("posts", Operation::Delete));

        let any = CollectionScope::parse(ALL_COLLECTIONS).unwrap();
        assert!(any.permits("anything", Operation::Delete));
    }
}
