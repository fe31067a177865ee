//! Tool registry.
//!
//! Holds the generated descriptors together with the analysis each one
//! dispatches to. Built once per configuration and shared read-only behind
//! an `Arc`; generation itself lives in [`crate::tool_generator`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::analyzer::ContentTypeAnalysis;
use crate::protocol::ToolDefinition;
use crate::tool_generator::{ToolDescriptor, generate};

/// A registered tool and the content type it runs against.
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub analysis: Arc<ContentTypeAnalysis>,
}

/// Registry of available tools, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and register the tools of every analysis. Name collisions
    /// are resolved by [`generate`].
    pub fn build(analyses: Vec<ContentTypeAnalysis>) -> Self {
        let descriptors = generate(&analyses);

        let mut by_type: HashMap<(String, bool), Arc<ContentTypeAnalysis>> = HashMap::new();
        for analysis in analyses {
            by_type
                .entry((analysis.slug.clone(), analysis.is_global))
                .or_insert_with(|| Arc::new(analysis));
        }

        let mut registry = Self::new();
        for descriptor in descriptors {
            let key = (descriptor.collection.clone(), descriptor.is_global);
            if let Some(analysis) = by_type.get(&key) {
                registry.push(descriptor, analysis.clone());
            }
        }
        tracing::info!(tools = registry.len(), "Tool registry built");
        registry
    }

    fn push(&mut self, descriptor: ToolDescriptor, analysis: Arc<ContentTypeAnalysis>) {
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            analysis,
        });
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.iter()
    }

    /// Protocol definitions for `tools/list`.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| t.descriptor.to_definition())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str()).collect()
    }
}
