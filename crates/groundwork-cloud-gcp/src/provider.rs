//! GCP implementations of the Terraform-path collaborator contracts

use crate::error::GcpError;
use crate::gcloud::Gcloud;
use async_trait::async_trait;
use groundwork_cloud::gcp::{
    GcpKeyPairDeleter, NetworkInstancesChecker, TerraformOutputResolver, TerraformOutputs,
};
use groundwork_cloud::{CloudError, Result as CloudResult};
use groundwork_core::state::{EnvState, GcpCredentials};

/// Compute Engine-backed network check and SSH key removal.
pub struct ComputeEngine {
    cli: Gcloud,
}

impl ComputeEngine {
    pub fn new(credentials: &GcpCredentials) -> Self {
        Self {
            cli: Gcloud::new(credentials),
        }
    }
}

#[async_trait]
impl NetworkInstancesChecker for ComputeEngine {
    async fn validate_safe_to_delete(&self, network_name: &str) -> CloudResult<()> {
        let filter = format!("networkInterfaces.network:{network_name}");
        let output = self
            .cli
            .run(&["compute", "instances", "list", "--filter", &filter])
            .await
            .map_err(CloudError::from)?;

        let instances: Vec<serde_json::Value> = if output.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(output.trim())
                .map_err(GcpError::from)
                .map_err(CloudError::from)?
        };
        if !instances.is_empty() {
            return Err(CloudError::NotSafeToDelete(format!(
                "network {network_name}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl GcpKeyPairDeleter for ComputeEngine {
    async fn delete(&self, public_key: &str) -> CloudResult<()> {
        if public_key.is_empty() {
            return Ok(());
        }
        self.cli
            .run(&["compute", "os-login", "ssh-keys", "remove", "--key", public_key])
            .await
            .map_err(CloudError::from)?;
        Ok(())
    }
}

/// Resolves live identifiers from the recorded Terraform state blob.
pub struct StateOutputResolver;

impl StateOutputResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StateOutputResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TerraformOutputResolver for StateOutputResolver {
    async fn resolve(&self, state: &EnvState) -> CloudResult<TerraformOutputs> {
        Ok(parse_outputs(&state.tf_state).map_err(CloudError::from)?)
    }
}

/// Read one output, accepting both the flat form (`"name": "value"`) and
/// the wrapped form (`"name": {"value": "..."}`) older and newer Terraform
/// releases write.
fn lookup_output(outputs: &serde_json::Value, key: &str) -> Option<String> {
    let entry = outputs.get(key)?;
    match entry {
        serde_json::Value::String(s) => Some(s.clone()),
        other => other.get("value")?.as_str().map(str::to_string),
    }
}

fn parse_outputs(tf_state: &str) -> crate::error::Result<TerraformOutputs> {
    let value: serde_json::Value = serde_json::from_str(tf_state)
        .map_err(|e| GcpError::TerraformState(format!("cannot parse state: {e}")))?;

    let outputs = value
        .get("outputs")
        .cloned()
        .or_else(|| {
            value
                .get("modules")
                .and_then(|m| m.as_array())
                .and_then(|m| m.first())
                .and_then(|m| m.get("outputs"))
                .cloned()
        })
        .ok_or_else(|| GcpError::TerraformState("no outputs recorded".to_string()))?;

    let network_name = lookup_output(&outputs, "network_name")
        .ok_or_else(|| GcpError::TerraformState("no network_name output recorded".to_string()))?;
    let external_ip = lookup_output(&outputs, "external_ip").unwrap_or_default();

    // the director answers on the standard control port at the external IP
    let director_address = if external_ip.is_empty() {
        String::new()
    } else {
        format!("https://{external_ip}:25555")
    };

    Ok(TerraformOutputs {
        external_ip,
        network_name,
        subnetwork_name: lookup_output(&outputs, "subnetwork_name").unwrap_or_default(),
        director_tag: lookup_output(&outputs, "director_tag_name").unwrap_or_default(),
        internal_tag: lookup_output(&outputs, "internal_tag_name").unwrap_or_default(),
        director_address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outputs_flat_form() {
        let tf_state = r#"{
            "modules": [
                {
                    "outputs": {
                        "external_ip": "198.51.100.4",
                        "network_name": "lake-1-network",
                        "subnetwork_name": "lake-1-subnet",
                        "director_tag_name": "lake-1-director",
                        "internal_tag_name": "lake-1-internal"
                    }
                }
            ]
        }"#;

        let outputs = parse_outputs(tf_state).unwrap();
        assert_eq!(outputs.network_name, "lake-1-network");
        assert_eq!(outputs.subnetwork_name, "lake-1-subnet");
        assert_eq!(outputs.director_tag, "lake-1-director");
        assert_eq!(outputs.internal_tag, "lake-1-internal");
        assert_eq!(outputs.director_address, "https://198.51.100.4:25555");
    }

    #[test]
    fn test_parse_outputs_wrapped_form() {
        let tf_state = r#"{
            "outputs": {
                "external_ip": {"value": "198.51.100.4"},
                "network_name": {"value": "lake-1-network"}
            }
        }"#;

        let outputs = parse_outputs(tf_state).unwrap();
        assert_eq!(outputs.network_name, "lake-1-network");
        assert_eq!(outputs.external_ip, "198.51.100.4");
        assert_eq!(outputs.subnetwork_name, "");
    }

    #[test]
    fn test_parse_outputs_requires_network_name() {
        let err = parse_outputs(r#"{"outputs": {"external_ip": "1.2.3.4"}}"#).unwrap_err();
        assert!(err.to_string().contains("network_name"));

        assert!(parse_outputs("not json").is_err());
        assert!(parse_outputs("{}").is_err());
    }
}
