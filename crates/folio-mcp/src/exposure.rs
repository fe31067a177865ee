//! Exposure resolution: which content types become tools.

use std::collections::HashSet;

use folio_core::{
    ContentTypeDefinition, ContentTypeSet, ExposureConfig, ExposureMode, OperationSet,
    TypeExposure,
};

use crate::analyzer::{AnalyzeOptions, ContentTypeAnalysis, analyze, is_hidden_type};

/// Resolve the exposed content types and analyze them.
///
/// Collections come first, then globals, each in configuration order (or
/// registration order for `all`). Pure: the same inputs always give the same
/// analyses.
pub fn resolve(
    types: &ContentTypeSet,
    config: &ExposureConfig,
    defaults: &OperationSet,
) -> Vec<ContentTypeAnalysis> {
    let mut analyses = resolve_kind(&types.collections, &config.collections, defaults, "collection");
    analyses.extend(resolve_kind(&types.globals, &config.globals, defaults, "global"));
    analyses
}

fn resolve_kind(
    registered: &[ContentTypeDefinition],
    mode: &ExposureMode,
    defaults: &OperationSet,
    kind: &str,
) -> Vec<ContentTypeAnalysis> {
    let selected: Vec<(&ContentTypeDefinition, TypeExposure)> = match mode {
        ExposureMode::All(_) => registered
            .iter()
            .filter(|def| !is_hidden_type(&def.slug))
            .map(|def| (def, TypeExposure::new(def.slug.clone())))
            .collect(),
        ExposureMode::List(entries) => {
            let mut seen = HashSet::new();
            let mut selected = Vec::new();
            for entry in entries {
                let slug = entry.slug();
                if is_hidden_type(slug) {
                    tracing::warn!(slug = %slug, kind = %kind, "Internal content type cannot be exposed; ignoring");
                    continue;
                }
                let Some(def) = registered.iter().find(|d| d.slug == slug) else {
                    tracing::warn!(slug = %slug, kind = %kind, "Configured content type is not registered; ignoring");
                    continue;
                };
                if !seen.insert(slug.to_string()) {
                    tracing::warn!(slug = %slug, kind = %kind, "Content type listed twice; keeping the first entry");
                    continue;
                }
                selected.push((def, entry.settings()));
            }
            selected
        }
    };

    selected
        .into_iter()
        .map(|(def, settings)| {
            let options = AnalyzeOptions {
                operations: defaults.merge(&settings.operations),
                tool_prefix: settings.tool_prefix,
                exclude_fields: settings.exclude_fields,
                description: settings.description,
            };
            analyze(def, options)
        })
        .collect()
}
