use catalog::annotations::{
    ACCOUNT_ENGINEER, BASE_DOMAIN, ESCALATION_MATRIX, OPSGENIE_COMPONENT_SELECTOR,
    SOURCE_LOCATION,
};
use catalog::{EntityBuilder, EntityKind, EntityLink, EntityRef, Export, Resource};
use tracing::{info, warn};

use crate::dedupe::{Deduplicator, ReadStats};
use crate::github::GITHUB_URL;
use crate::settings::Settings;
use crate::sources::installations::{AwsIdentity, Installation};
use crate::sources::InstallationDirectory;
use crate::ImporterResult;

pub const INSTALLATIONS_FILE: &str = "installations.yaml";

const RESOURCE_TYPE: &str = "installation";

/// Repository holding one `<codename>/cluster.yaml` per installation.
const INSTALLATIONS_REPOSITORY: &str = "installations";

const AWS_SWITCH_ROLE_URL: &str = "https://signin.aws.amazon.com/switchrole";

#[derive(Debug)]
pub struct InstallationsReport {
    pub resources: Export,
    pub stats: ReadStats,
}

/// Builds one resource per installation. Installations without a codename are skipped, and
/// only the first installation of a codename is kept.
pub fn invoke(
    directory: &dyn InstallationDirectory,
    settings: &Settings,
) -> ImporterResult<InstallationsReport> {
    let installations = directory.installations()?;
    info!("read {} installations", installations.len());

    let mut resources = Export::new(settings.output_dir.join(INSTALLATIONS_FILE));
    let mut dedupe = Deduplicator::new();

    for installation in &installations {
        let codename = &installation.codename;
        let entity_ref = EntityRef::new(EntityKind::Resource, &settings.namespace, codename);
        if !dedupe.check_and_mark(entity_ref) {
            warn!("installation {codename} is listed more than once, skipping");
            continue;
        }

        match resource_from_installation(installation, settings) {
            Ok(resource) => {
                resources.add_entity(resource.to_entity());
                dedupe.record_created();
            }
            Err(e) => warn!("could not create resource entity for installation '{codename}': {e}"),
        }
    }

    Ok(InstallationsReport {
        resources,
        stats: dedupe.stats(),
    })
}

fn resource_from_installation(
    installation: &Installation,
    settings: &Settings,
) -> ImporterResult<Resource> {
    let namespace = &settings.namespace;
    let organization = &settings.github_organization;
    let Installation {
        codename,
        customer,
        pipeline,
        provider,
        ..
    } = installation;

    let owner = if customer.is_empty() {
        String::new()
    } else {
        format!("group:{namespace}/{customer}")
    };

    let mut resource = Resource::new(codename)?
        .with_namespace(namespace)
        .with_title(codename)
        .with_type(RESOURCE_TYPE)
        .with_owner(owner)
        .with_description(format!(
            "{pipeline} installation on {provider} owned by {customer}"
        ));

    for (key, value) in [
        ("giantswarm.io/provider", provider),
        ("giantswarm.io/customer", customer),
        ("giantswarm.io/pipeline", pipeline),
        ("giantswarm.io/region", &installation.region),
    ] {
        if !value.is_empty() {
            resource.set_label(key, value);
        }
    }

    resource.set_annotation(
        SOURCE_LOCATION,
        format!(
            "url:{GITHUB_URL}{organization}/{INSTALLATIONS_REPOSITORY}/blob/master/{codename}/cluster.yaml"
        ),
    );
    resource.set_annotation(
        OPSGENIE_COMPONENT_SELECTOR,
        format!("detailsPair(installation:{codename})"),
    );
    for (key, value) in [
        (BASE_DOMAIN, &installation.base),
        (ACCOUNT_ENGINEER, &installation.account_engineer),
        (ESCALATION_MATRIX, &installation.escalation_matrix),
    ] {
        if !value.is_empty() {
            resource.set_annotation(key, value);
        }
    }

    for (repository, title, link_type) in [
        (
            &installation.cmc_repository,
            "Customer management clusters (CMC)",
            "CMC",
        ),
        (&installation.ccr_repository, "Customer config (CCR)", "CCR"),
    ] {
        if !repository.is_empty() {
            resource.add_link(
                EntityLink::new(format!("{GITHUB_URL}{organization}/{repository}"))
                    .with_title(title)
                    .with_icon("github")
                    .with_type(link_type),
            );
        }
    }

    if !installation.base.is_empty() {
        let domain = installation.web_domain();
        resource.add_link(
            EntityLink::new(format!("https://happa.{domain}/admin-login"))
                .with_title("Happa")
                .with_icon("giantswarm"),
        );
        resource.add_link(
            EntityLink::new(format!("https://grafana.{domain}/"))
                .with_title("Grafana")
                .with_icon("grafana"),
        );
    }

    if let Some(aws) = &installation.aws {
        for (identity, scope) in [
            (&aws.host_cluster, "management cluster"),
            (&aws.guest_cluster, "workload clusters"),
        ] {
            if identity.is_complete() {
                resource.add_link(aws_console_link(identity, codename, scope));
            }
        }
    }

    Ok(resource)
}

fn aws_console_link(identity: &AwsIdentity, codename: &str, scope: &str) -> EntityLink {
    let display_name = format!("{codename} {scope}").replace(' ', "+");
    EntityLink::new(format!(
        "{AWS_SWITCH_ROLE_URL}?account={}&roleName={}&displayName={display_name}",
        identity.account, identity.admin_role_arn
    ))
    .with_title(format!("AWS Console ({scope})"))
    .with_icon("aws")
}
