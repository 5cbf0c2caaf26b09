use serde::Deserialize;

/// Providers of installations whose web UIs live below `g8s.<base>`.
const VINTAGE_PROVIDERS: [&str; 3] = ["aws", "azure", "kvm"];

/// A management cluster installation, as described by its `cluster.yaml`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Installation {
    /// Base domain.
    pub base: String,
    pub codename: String,
    pub customer: String,
    pub cmc_repository: String,
    pub ccr_repository: String,
    #[serde(rename = "accountEngineer")]
    pub account_engineer: String,
    pub escalation_matrix: String,
    pub pipeline: String,
    pub provider: String,
    pub region: String,
    pub aws: Option<AwsDetails>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AwsDetails {
    pub region: String,
    pub host_cluster: AwsIdentity,
    pub guest_cluster: AwsIdentity,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AwsIdentity {
    pub account: String,
    #[serde(rename = "adminRoleARN")]
    pub admin_role_arn: String,
}

impl AwsIdentity {
    pub fn is_complete(&self) -> bool {
        !self.account.is_empty() && !self.admin_role_arn.is_empty()
    }
}

impl Installation {
    /// Fills the region from the AWS details when it is not given.
    pub fn with_region_fallback(mut self) -> Self {
        if self.region.is_empty() {
            if let Some(aws) = &self.aws {
                self.region = aws.region.clone();
            }
        }
        self
    }

    pub fn is_vintage(&self) -> bool {
        VINTAGE_PROVIDERS.contains(&self.provider.as_str())
    }

    /// Domain below which the installation's web UIs are served.
    pub fn web_domain(&self) -> String {
        if self.is_vintage() {
            format!("g8s.{}", self.base)
        } else {
            format!("{}.{}", self.codename, self.base)
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use crate::sources::installations::Installation;

    #[test]
    fn region_should_fall_back_to_aws() {
        let installation: Installation = serde_yaml::from_str(
            "codename: gauss\naws:\n  region: eu-west-1\n  hostCluster:\n    account: \"1\"\n",
        )
        .unwrap();
        let installation = installation.with_region_fallback();

        assert_eq!("eu-west-1", installation.region);
        let aws = installation.aws.unwrap();
        assert!(!aws.host_cluster.is_complete());
        assert!(!aws.guest_cluster.is_complete());
    }

    #[test]
    fn explicit_region_should_win() {
        let installation: Installation =
            serde_yaml::from_str("region: westeurope\naws:\n  region: eu-west-1\n").unwrap();
        assert_eq!("westeurope", installation.with_region_fallback().region);
    }

    #[test_case("aws" => "g8s.example.io"; "vintage")]
    #[test_case("capa" => "gauss.example.io"; "cluster api")]
    fn should_derive_web_domain(provider: &str) -> String {
        Installation {
            base: "example.io".to_string(),
            codename: "gauss".to_string(),
            provider: provider.to_string(),
            ..Default::default()
        }
        .web_domain()
    }
}
