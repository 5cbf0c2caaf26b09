use catalog::annotations::{HELMCHART_APP_VERSIONS, HELMCHART_VERSIONS, HELMCHARTS, ICON_URL};
use catalog::{Component, EntityBuilder, EntityKind, EntityRef, Export};
use serde_json::Value;
use tag_resolver::latest_tag;
use tracing::{debug, info, warn};

use crate::dedupe::{Deduplicator, ReadStats};
use crate::fields::{
    deployment_names, is_chart_deployable, parse_created, resolve_audience, resolve_managed,
    resolve_owner, should_include_chart, SlugMatcher, AUDIENCE, MANAGED,
};
use crate::settings::Settings;
use crate::sources::oci::ManifestInfo;
use crate::sources::ChartRegistry;
use crate::stats::AnnotationStats;
use crate::{ImporterError, ImporterResult};

pub const CHARTS_FILE: &str = "charts.yaml";

pub(crate) const HELMCHART_TAG: &str = "helmchart";

const DEPLOYABLE_TAG: &str = "helmchart-deployable";

#[derive(Clone, Debug, Default)]
pub struct ChartsOptions {
    /// Only repositories whose name starts with this prefix are read.
    pub prefix: String,

    /// Stop after this many repositories.
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct ChartsReport {
    pub components: Export,
    pub stats: AnnotationStats,
    pub read: ReadStats,
}

/// Builds one component per published chart of the registry.
///
/// Listing the repositories is the only fatal step. Repositories without tags or manifest, and
/// charts not meant for everyone, are skipped.
pub fn invoke(
    registry: &dyn ChartRegistry,
    settings: &Settings,
    options: &ChartsOptions,
) -> ImporterResult<ChartsReport> {
    let matcher = SlugMatcher::github(&settings.github_organization);

    let mut repositories = registry.list_repositories(&options.prefix)?;
    info!(
        "found {} repositories with prefix '{}' in {}",
        repositories.len(),
        options.prefix,
        registry.hostname()
    );
    if let Some(limit) = options.limit.filter(|limit| *limit < repositories.len()) {
        info!("limiting to the first {limit} repositories");
        repositories.truncate(limit);
    }

    let mut components = Export::new(settings.output_dir.join(CHARTS_FILE));
    let mut stats = AnnotationStats::default();
    let mut dedupe = Deduplicator::new();

    for repository in &repositories {
        debug!("processing repository {repository}");
        dedupe.record_read();

        let tags = match registry.list_tags(repository) {
            Ok(tags) => tags,
            Err(e) => {
                warn!("failed to list tags for repository {repository}: {e}");
                continue;
            }
        };
        let Some(tag) = latest_tag(&tags) else {
            warn!("no tags found for repository {repository}");
            continue;
        };

        let manifest = match registry.fetch_manifest(repository, tag) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("failed to get manifest for {repository}:{tag}: {e}");
                continue;
            }
        };

        if !should_include_chart(&manifest.config) {
            info!("skipping chart {repository}:{tag}, audience is not 'all'");
            continue;
        }

        let component = match component_from_chart(
            registry.hostname(),
            repository,
            tag,
            &manifest,
            &matcher,
            settings,
        ) {
            Ok(component) => component,
            Err(e) => {
                warn!("failed to create component for {repository}:{tag}: {e}");
                continue;
            }
        };

        let entity_ref = EntityRef::new(
            EntityKind::Component,
            component.namespace(),
            component.name(),
        );
        if !dedupe.mark_seen(entity_ref) {
            warn!(
                "component {} already exported, skipping {repository}",
                component.name()
            );
            continue;
        }

        let entity = component.to_entity();
        stats.track(&entity.metadata.annotations);
        components.add_entity(entity);
        dedupe.record_created();
        debug!("created component {}", component.name());
    }

    Ok(ChartsReport {
        components,
        stats,
        read: dedupe.stats(),
    })
}

fn config_str<'a>(manifest: &'a ManifestInfo, key: &str) -> Option<&'a str> {
    manifest
        .config
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn component_from_chart(
    hostname: &str,
    repository: &str,
    tag: &str,
    manifest: &ManifestInfo,
    matcher: &SlugMatcher,
    settings: &Settings,
) -> ImporterResult<Component> {
    let context = format!("{repository}:{tag}");
    let record = manifest.to_record(repository, tag);
    let annotations = record.annotations();
    let namespace = &settings.namespace;

    // charts are named after their GitHub repository
    let slug = matcher
        .detect(&record)
        .ok_or_else(|| ImporterError::MissingSlug(context.clone()))?;

    let release_time = match record.created.as_deref().map(parse_created).transpose() {
        Ok(time) => time,
        Err(e) => {
            warn!("ignoring creation time of {context}: {e}");
            None
        }
    };

    let description = config_str(manifest, "description")
        .map(String::from)
        .unwrap_or_else(|| format!("OCI chart from {repository}"));
    let version = config_str(manifest, "version").unwrap_or(tag);
    let chart_type = config_str(manifest, "type").unwrap_or_default();

    let mut component = Component::new(&slug.repository)?
        .with_namespace(namespace)
        .with_title(&slug.repository)
        .with_description(description)
        .with_owner(resolve_owner(annotations, namespace))
        .with_type(&settings.chart_component_type)
        .with_latest_release_tag(version)
        .with_latest_release_time(release_time)
        .with_deployment_names(deployment_names(&slug.repository, &[]))
        .with_github_project_slug(slug.to_string());

    component.add_tag(HELMCHART_TAG);
    if is_chart_deployable(chart_type) {
        component.add_tag(DEPLOYABLE_TAG);
    }

    component.set_annotation(HELMCHARTS, format!("{hostname}/{repository}"));
    component.set_annotation(HELMCHART_VERSIONS, version);
    if let Some(app_version) = config_str(manifest, "appVersion") {
        component.set_annotation(HELMCHART_APP_VERSIONS, app_version);
    }
    component.set_annotation(
        AUDIENCE.legacy,
        resolve_audience(annotations, &context).as_ref(),
    );
    component.set_annotation(
        MANAGED.legacy,
        resolve_managed(annotations, &context).to_string(),
    );
    if let Some(icon) = config_str(manifest, "icon") {
        component.set_annotation(ICON_URL, icon);
    }

    Ok(component)
}
