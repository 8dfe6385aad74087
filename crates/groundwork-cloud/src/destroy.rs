//! Teardown orchestration
//!
//! Tears down everything the bootstrapper provisioned for an environment,
//! in dependency order: pre-flight guards, then the deployment director,
//! then the provider-specific resources. The persisted state is
//! checkpointed after every confirmed irreversible deletion, so a run
//! interrupted by a crash or a rejected step resumes from exactly where it
//! stopped instead of double-deleting or claiming unverified progress.

use crate::aws::{
    AwsKeyPairDeleter, CertificateDeleter, Stack, StackDeleter, StackDescriber, VpcStatusChecker,
    VPC_ID_OUTPUT,
};
use crate::credentials::CredentialValidator;
use crate::director::{DirectorError, DirectorManager};
use crate::error::{CloudError, Result, MINIMUM_TERRAFORM_VERSION};
use crate::gcp::{
    GcpKeyPairDeleter, NetworkInstancesChecker, TerraformDestroyError, TerraformDestroyInput,
    TerraformExecutor, TerraformOutputResolver, TEMPLATE,
};
use crate::ui::Ui;
use groundwork_core::state::{DirectorState, EnvState, Iaas, KeyPair};
use groundwork_core::store::{StateStore, StateValidator};
use semver::Version;
use std::sync::Arc;

/// Flags recognized by the destroy command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyFlags {
    /// Exit successfully when there is no state to destroy.
    pub skip_if_missing: bool,
    /// Skip the interactive confirmation prompt.
    pub no_confirm: bool,
}

impl DestroyFlags {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        for arg in args {
            match arg.as_str() {
                "--skip-if-missing" => flags.skip_if_missing = true,
                "--no-confirm" | "-n" => flags.no_confirm = true,
                other => {
                    return Err(CloudError::UnknownFlag(
                        other.trim_start_matches('-').to_string(),
                    ));
                }
            }
        }
        Ok(flags)
    }
}

/// The collaborators a destroy run drives.
///
/// Both provider paths are always wired; the state's discriminator decides
/// which ones actually get called.
pub struct DestroyDeps {
    pub ui: Arc<dyn Ui>,
    pub state_validator: Arc<dyn StateValidator>,
    pub state_store: Arc<dyn StateStore>,
    pub credential_validator: Arc<dyn CredentialValidator>,
    pub director_manager: Arc<dyn DirectorManager>,
    pub stack_describer: Arc<dyn StackDescriber>,
    pub stack_deleter: Arc<dyn StackDeleter>,
    pub vpc_checker: Arc<dyn VpcStatusChecker>,
    pub certificate_deleter: Arc<dyn CertificateDeleter>,
    pub aws_key_pair_deleter: Arc<dyn AwsKeyPairDeleter>,
    pub terraform: Arc<dyn TerraformExecutor>,
    pub terraform_outputs: Arc<dyn TerraformOutputResolver>,
    pub network_checker: Arc<dyn NetworkInstancesChecker>,
    pub gcp_key_pair_deleter: Arc<dyn GcpKeyPairDeleter>,
}

/// The destroy command.
pub struct Destroy {
    deps: DestroyDeps,
}

impl Destroy {
    pub fn new(deps: DestroyDeps) -> Self {
        Self { deps }
    }

    /// Run the teardown for `state`.
    ///
    /// `args` are the raw subcommand arguments; unrecognized flags are
    /// rejected here, before any credential validation or destructive call.
    pub async fn execute(&self, args: &[String], mut state: EnvState) -> Result<()> {
        let flags = DestroyFlags::parse(args)?;

        if state.is_empty() && flags.skip_if_missing {
            self.deps
                .ui
                .step("state file not found, and --skip-if-missing flag provided, exiting");
            return Ok(());
        }

        self.deps.state_validator.validate(&state)?;

        if !flags.no_confirm && !self.confirm(&state) {
            self.deps.ui.step("exiting");
            return Ok(());
        }

        self.check_terraform_version().await?;

        match state.iaas {
            Iaas::Aws => self.deps.credential_validator.validate_aws(&state.aws)?,
            Iaas::Gcp => self.deps.credential_validator.validate_gcp(&state.gcp)?,
            Iaas::Unset => {}
        }

        self.delete_director(&mut state).await?;

        match state.iaas {
            Iaas::Gcp => self.destroy_terraform_resources(&mut state).await,
            // State files predating the provider field only ever described
            // stack-based environments, so the legacy variant shares the
            // stack path.
            Iaas::Aws | Iaas::Unset => self.destroy_stack_resources(&mut state).await,
        }
    }

    fn confirm(&self, state: &EnvState) -> bool {
        let response = self.deps.ui.prompt(&format!(
            "Are you sure you want to delete infrastructure for {:?}? This operation cannot be undone!",
            state.env_id
        ));
        let response = response.trim();
        response.eq_ignore_ascii_case("yes") || response.eq_ignore_ascii_case("y")
    }

    async fn check_terraform_version(&self) -> Result<()> {
        let raw = self.deps.terraform.version().await?;
        let version = Version::parse(raw.trim())
            .map_err(|e| CloudError::MalformedTerraformVersion(format!("{}: {e}", raw.trim())))?;
        let minimum = Version::parse(MINIMUM_TERRAFORM_VERSION)
            .map_err(|e| CloudError::MalformedTerraformVersion(e.to_string()))?;

        if version < minimum {
            return Err(CloudError::TerraformVersionBelowMinimum);
        }
        Ok(())
    }

    /// Persist the snapshot of everything confirmed deleted so far.
    async fn checkpoint(&self, state: &EnvState) -> Result<()> {
        tracing::debug!("checkpointing state for environment {:?}", state.env_id);
        self.deps
            .state_store
            .persist(state)
            .await
            .map_err(CloudError::from)
    }

    async fn delete_director(&self, state: &mut EnvState) -> Result<()> {
        if state.director.is_empty() {
            self.deps.ui.note("no director, skipping...");
            return Ok(());
        }

        self.deps.ui.step("destroying the director");
        let result = self.deps.director_manager.delete(state).await;
        match result {
            Ok(()) => {
                state.director = DirectorState::default();
                self.checkpoint(state).await
            }
            Err(DirectorError::FailedWithState {
                state: partial,
                source,
            }) => {
                // The engine confirmed how far it got; adopt its snapshot
                // before surfacing the failure.
                *state = *partial;
                match self.checkpoint(state).await {
                    Ok(()) => Err(source),
                    Err(save) => Err(CloudError::Aggregate(vec![source, save])),
                }
            }
            Err(DirectorError::Failed(source)) => Err(source),
        }
    }

    async fn destroy_stack_resources(&self, state: &mut EnvState) -> Result<()> {
        let stack = self.describe_stack(state).await?;
        if let Some(stack) = stack {
            let vpc_id = stack.outputs.get(VPC_ID_OUTPUT).cloned().unwrap_or_default();
            self.deps.vpc_checker.validate_safe_to_delete(&vpc_id).await?;

            self.deps.ui.step("destroying AWS stack");
            self.deps.stack_deleter.delete(&state.stack.name).await?;
            state.stack.name.clear();
            state.stack.lb_type.clear();
            self.checkpoint(state).await?;
        }

        if !state.stack.certificate_name.is_empty() {
            self.deps.ui.step("deleting certificate");
            self.deps
                .certificate_deleter
                .delete(&state.stack.certificate_name)
                .await?;
            state.stack.certificate_name.clear();
            self.checkpoint(state).await?;
        }

        if !state.key_pair.is_empty() {
            self.deps.ui.step("deleting keypair");
            self.deps
                .aws_key_pair_deleter
                .delete(&state.key_pair.name)
                .await?;
            state.key_pair = KeyPair::default();
            self.checkpoint(state).await?;
        }

        Ok(())
    }

    /// Resolve the recorded stack against the provider. `None` means the
    /// stack is already gone (or was never created) and the stack and VPC
    /// steps are skipped.
    async fn describe_stack(&self, state: &EnvState) -> Result<Option<Stack>> {
        if state.stack.name.is_empty() {
            self.deps.ui.note("no AWS stack, skipping...");
            return Ok(None);
        }

        let result = self.deps.stack_describer.describe(&state.stack.name).await;
        match result {
            Ok(stack) => Ok(Some(stack)),
            Err(CloudError::StackNotFound(_)) => {
                self.deps.ui.note("no AWS stack, skipping...");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn destroy_terraform_resources(&self, state: &mut EnvState) -> Result<()> {
        let mut infrastructure_destroyed = false;

        if state.tf_state.is_empty() {
            self.deps.ui.note("no terraform state, skipping...");
        } else {
            let outputs = self.deps.terraform_outputs.resolve(state).await?;
            self.deps
                .network_checker
                .validate_safe_to_delete(&outputs.network_name)
                .await?;

            self.deps.ui.step("destroying GCP infrastructure");
            let result = self
                .deps
                .terraform
                .destroy(TerraformDestroyInput {
                    service_account_key: &state.gcp.service_account_key,
                    env_id: &state.env_id,
                    project_id: &state.gcp.project_id,
                    zone: &state.gcp.zone,
                    region: &state.gcp.region,
                    tf_state: &state.tf_state,
                    template: TEMPLATE,
                })
                .await;

            match result {
                Ok(new_tf_state) => {
                    // Expected empty on full success. Not checkpointed yet:
                    // the key-pair step's save covers it.
                    state.tf_state = new_tf_state;
                    infrastructure_destroyed = true;
                }
                Err(TerraformDestroyError { tf_state, source }) => {
                    // Terraform confirmed this much progress even though the
                    // run failed; record it before surfacing the error.
                    state.tf_state = tf_state;
                    return match self.checkpoint(state).await {
                        Ok(()) => Err(source),
                        Err(save) => Err(CloudError::Aggregate(vec![source, save])),
                    };
                }
            }
        }

        if state.key_pair.is_empty() {
            if infrastructure_destroyed {
                // No key pair to delete, but the cleared terraform state
                // still has to land on disk.
                self.checkpoint(state).await?;
            }
            return Ok(());
        }

        self.deps.ui.step("deleting keypair");
        self.deps
            .gcp_key_pair_deleter
            .delete(&state.key_pair.public_key)
            .await?;
        state.key_pair = KeyPair::default();
        self.checkpoint(state).await
    }
}
