use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(name = "deltabot", about = "DeltaBot moderator tools for Reddit", version)]
pub(crate) struct Cli {
    #[arg(
        long,
        env = "DELTABOT_API_BASE",
        default_value = "https://oauth.reddit.com",
        help = "Base URL of the Reddit OAuth API."
    )]
    pub(crate) api_base: String,

    #[arg(
        long,
        env = "DELTABOT_TOKEN",
        hide_env_values = true,
        help = "OAuth bearer token for the bot account."
    )]
    pub(crate) token: String,

    #[arg(
        long,
        env = "DELTABOT_BOT_USERNAME",
        default_value = "DeltaBot",
        help = "Bot account name used to recognise its own replies."
    )]
    pub(crate) bot_username: String,

    #[arg(
        long,
        env = "DELTABOT_SUBREDDIT",
        default_value = "changemyview",
        help = "Subreddit linked from reply footers."
    )]
    pub(crate) subreddit: String,

    #[arg(
        long,
        env = "DELTABOT_USER_AGENT",
        default_value = "deltabot-rs/0.1 (moderator tools)"
    )]
    pub(crate) user_agent: String,

    #[arg(
        long,
        env = "DELTABOT_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64
    )]
    pub(crate) request_timeout_ms: u64,

    #[arg(
        long,
        env = "DELTABOT_RETRY_MAX_ATTEMPTS",
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Attempts per Reddit request, including the first one."
    )]
    pub(crate) retry_max_attempts: usize,

    #[arg(
        long,
        env = "DELTABOT_RETRY_BASE_DELAY_MS",
        default_value_t = 500,
        value_parser = parse_positive_u64
    )]
    pub(crate) retry_base_delay_ms: u64,

    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CliCommand {
    /// Force a delta onto the comment linked in a moderator's private message.
    ModAdd(ModAddArgs),
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("message_source")
        .required(true)
        .args(["message_id", "message_file"])
))]
pub(crate) struct ModAddArgs {
    #[arg(long, requires = "body", help = "Id of the private message to answer.")]
    pub(crate) message_id: Option<String>,

    #[arg(long, requires = "message_id", help = "Message body, the comment URL.")]
    pub(crate) body: Option<String>,

    #[arg(long, default_value = "", help = "Moderator who sent the message.")]
    pub(crate) author: String,

    #[arg(
        long,
        conflicts_with_all = ["message_id", "body"],
        help = "JSON file with {\"id\", \"author\", \"body\"}."
    )]
    pub(crate) message_file: Option<PathBuf>,
}
