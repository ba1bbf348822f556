use std::sync::Arc;

use anyhow::{Context, Result};
use deltabot_mod_add::{
    OverrideCollaborators, OverrideCommand, OverrideWorkflow, PrivateMessage, WorkflowOutcome,
};
use deltabot_reddit::{
    comment_lock_key, MarkerReplyDetector, RedditApiClient, RedditApiClientConfig,
    TemplateReplyComposer,
};

use crate::cli_args::{Cli, ModAddArgs};

pub(crate) fn load_private_message(args: &ModAddArgs) -> Result<PrivateMessage> {
    if let Some(path) = args.message_file.as_deref() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str::<PrivateMessage>(&raw)
            .with_context(|| format!("failed to parse private message {}", path.display()));
    }

    let id = args
        .message_id
        .as_deref()
        .context("--message-id or --message-file is required")?;
    Ok(PrivateMessage {
        id: id.to_string(),
        author: args.author.clone(),
        body: args.body.clone().unwrap_or_default(),
    })
}

pub(crate) fn reddit_client_config(cli: &Cli) -> RedditApiClientConfig {
    RedditApiClientConfig {
        api_base: cli.api_base.clone(),
        token: cli.token.clone(),
        user_agent: cli.user_agent.clone(),
        request_timeout_ms: cli.request_timeout_ms,
        retry_max_attempts: cli.retry_max_attempts,
        retry_base_delay_ms: cli.retry_base_delay_ms,
    }
}

pub(crate) fn build_mod_add_workflow(cli: &Cli) -> Result<OverrideWorkflow> {
    let client = Arc::new(RedditApiClient::new(reddit_client_config(cli))?);
    let collaborators = OverrideCollaborators {
        resolver: client.clone(),
        detector: Arc::new(MarkerReplyDetector::new(cli.bot_username.as_str())),
        award_engine: client.clone(),
        composer: Arc::new(TemplateReplyComposer::new(cli.subreddit.as_str())),
        publisher: client.clone(),
        notifier: client,
    };
    Ok(OverrideWorkflow::new(collaborators).with_lock_key(comment_lock_key))
}

pub(crate) async fn execute_mod_add_command(
    cli: &Cli,
    args: &ModAddArgs,
) -> Result<WorkflowOutcome> {
    let message = load_private_message(args)?;
    let command = OverrideCommand::from_private_message(&message);
    let workflow = build_mod_add_workflow(cli)?;
    workflow
        .execute_serialized(&command)
        .await
        .with_context(|| format!("moderator add for private message {} failed", message.id))
}
