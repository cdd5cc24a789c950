//! Node construction and rendering errors.

use crate::node::types::NodeRole;
use std::path::PathBuf;

/// Errors raised while building or rendering a node
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("invalid {role} node '{name}': {reason}")]
    InvalidNode {
        name: String,
        role: NodeRole,
        reason: String,
    },

    #[error("template '{template}' not found while rendering {role} node '{name}'")]
    TemplateNotFound {
        name: String,
        role: NodeRole,
        template: String,
    },

    #[error("failed to render {role} node '{name}' from '{template}': {message}")]
    Render {
        name: String,
        role: NodeRole,
        template: String,
        message: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NodeError {
    pub(crate) fn invalid(name: &str, role: NodeRole, reason: impl Into<String>) -> Self {
        NodeError::InvalidNode {
            name: name.to_string(),
            role,
            reason: reason.into(),
        }
    }
}
