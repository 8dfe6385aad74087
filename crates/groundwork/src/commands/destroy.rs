use crate::engine::EngineCli;
use groundwork_cloud::{Destroy, DestroyDeps, StoredCredentialValidator, TerminalUi};
use groundwork_cloud_aws::{CloudFormation, Ec2, Iam};
use groundwork_cloud_gcp::{ComputeEngine, StateOutputResolver, TerraformCli};
use groundwork_core::{FileStateStore, SchemaValidator};
use std::sync::Arc;

pub async fn handle(args: &[String]) -> anyhow::Result<()> {
    let project_root = std::env::current_dir()?;
    let store = Arc::new(FileStateStore::new(&project_root));
    let state = store.load().await?;

    // Both provider paths are wired regardless of the recorded provider;
    // the orchestrator only calls the ones the state asks for.
    let cloud_formation = Arc::new(CloudFormation::new(&state.aws));
    let ec2 = Arc::new(Ec2::new(&state.aws));
    let compute_engine = Arc::new(ComputeEngine::new(&state.gcp));

    let destroy = Destroy::new(DestroyDeps {
        ui: Arc::new(TerminalUi::new()),
        state_validator: Arc::new(SchemaValidator::new()),
        state_store: store,
        credential_validator: Arc::new(StoredCredentialValidator::new()),
        director_manager: Arc::new(EngineCli::new()),
        stack_describer: cloud_formation.clone(),
        stack_deleter: cloud_formation,
        vpc_checker: ec2.clone(),
        certificate_deleter: Arc::new(Iam::new(&state.aws)),
        aws_key_pair_deleter: ec2,
        terraform: Arc::new(TerraformCli::new()),
        terraform_outputs: Arc::new(StateOutputResolver::new()),
        network_checker: compute_engine.clone(),
        gcp_key_pair_deleter: compute_engine,
    });

    destroy.execute(args, state).await?;
    Ok(())
}
