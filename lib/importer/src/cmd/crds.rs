use catalog::annotations::{CRD_GROUP, SOURCE_LOCATION};
use catalog::{Api, EntityBuilder, Export};
use tracing::{debug, info, warn};

use crate::dedupe::{Deduplicator, ReadStats};
use crate::settings::Settings;
use crate::sources::crd::{CrdConfigItem, CrdMetadata};
use crate::sources::ContentSource;
use crate::ImporterResult;

pub const CRDS_FILE: &str = "crds.yaml";

const CRD_API_TYPE: &str = "crd";

#[derive(Debug)]
pub struct CrdsReport {
    pub apis: Export,
    pub stats: ReadStats,
}

/// Builds an API entity for every configured CRD, with the CRD manifest as its definition.
///
/// Items whose manifest cannot be fetched or parsed are logged and skipped.
pub fn invoke(
    items: &[CrdConfigItem],
    source: &dyn ContentSource,
    settings: &Settings,
) -> CrdsReport {
    info!("found {} CRD definitions in config", items.len());

    let mut apis = Export::new(settings.output_dir.join(CRDS_FILE));
    let mut dedupe = Deduplicator::new();

    for (i, item) in items.iter().enumerate() {
        debug!("[{}/{}] processing CRD from {}", i + 1, items.len(), item.url);
        dedupe.record_read();

        let content = match source.fetch(&item.url) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to fetch CRD from {}: {e}", item.url);
                continue;
            }
        };

        let api = match api_from_crd(item, &content, &settings.namespace) {
            Ok(api) => api,
            Err(e) => {
                warn!("failed to create API entity from {}: {e}", item.url);
                continue;
            }
        };

        let entity = api.to_entity();
        if !dedupe.mark_seen(entity.entity_ref()) {
            warn!("API {} already exported, skipping {}", api.name(), item.url);
            continue;
        }

        apis.add_entity(entity);
        dedupe.record_created();
        debug!("created API entity {}", api.name());
    }

    CrdsReport {
        apis,
        stats: dedupe.stats(),
    }
}

fn api_from_crd(item: &CrdConfigItem, content: &str, namespace: &str) -> ImporterResult<Api> {
    let crd = CrdMetadata::parse(content)?;
    let description = crd
        .description
        .clone()
        .unwrap_or_else(|| format!("Kubernetes Custom Resource Definition for {}", crd.kind));

    let mut api = Api::new(&crd.name)?
        .with_namespace(namespace)
        .with_title(&crd.kind)
        .with_description(description)
        .with_owner(&item.owner)
        .with_lifecycle(&item.lifecycle)
        .with_type(CRD_API_TYPE)
        .with_definition(content)
        .with_system(&item.system);

    api.add_tag("crd");
    api.add_tag("kubernetes");
    api.set_annotation(SOURCE_LOCATION, format!("url:{}", item.url));
    if !crd.group.is_empty() {
        api.set_annotation(CRD_GROUP, &crd.group);
    }

    Ok(api)
}
