//! Well-known annotation keys written by the entity builders and the importer.

pub const ACCOUNT_ENGINEER: &str = "giantswarm.io/account-engineer";
pub const BASE_DOMAIN: &str = "giantswarm.io/base";
pub const CIRCLECI_PROJECT_SLUG: &str = "circleci.com/project-slug";
pub const CRD_GROUP: &str = "giantswarm.io/crd-group";
pub const DEPLOYMENT_NAMES: &str = "giantswarm.io/deployment-names";
pub const ESCALATION_MATRIX: &str = "giantswarm.io/escalation-matrix";
pub const GITHUB_PROJECT_SLUG: &str = "github.com/project-slug";
pub const GITHUB_TEAM_SLUG: &str = "github.com/team-slug";
pub const GRAFANA_DASHBOARD_SELECTOR: &str = "grafana/dashboard-selector";
pub const HELMCHART_APP_VERSIONS: &str = "giantswarm.io/helmchart-app-versions";
pub const HELMCHART_VERSIONS: &str = "giantswarm.io/helmchart-versions";
pub const HELMCHARTS: &str = "giantswarm.io/helmcharts";
pub const ICON_URL: &str = "giantswarm.io/icon-url";
pub const KUBERNETES_ID: &str = "backstage.io/kubernetes-id";
pub const LATEST_RELEASE_DATE: &str = "giantswarm.io/latest-release-date";
pub const LATEST_RELEASE_TAG: &str = "giantswarm.io/latest-release-tag";
pub const OPSGENIE_COMPONENT_SELECTOR: &str = "opsgenie.com/component-selector";
pub const SOURCE_LOCATION: &str = "backstage.io/source-location";
pub const TECHDOCS_REF: &str = "backstage.io/techdocs-ref";
