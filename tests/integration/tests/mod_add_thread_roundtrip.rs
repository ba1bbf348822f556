use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use deltabot_mod_add::{
    AwardEngine, AwardError, Comment, CommentResolver, Notifier, NotifyError,
    OverrideCollaborators, OverrideCommand, OverrideWorkflow, PublishError, ReplyKind,
    ReplyPublisher, ReplyRef, ResolutionError, WorkflowOutcome, ADD_FAILED_ALREADY_AWARDED_MESSAGE,
    ADD_SUCCEEDED_MESSAGE,
};
use deltabot_reddit::delta_flair::{next_delta_flair, parse_delta_count};
use deltabot_reddit::reply_marker::{extract_reply_marker, render_reply_marker};
use deltabot_reddit::{
    comment_lock_key, parse_comment_locator, MarkerReplyDetector, TemplateReplyComposer,
};
use tokio::sync::Mutex as AsyncMutex;

const BOT_USERNAME: &str = "DeltaBot";
const COMMENT_URL: &str = "https://www.reddit.com/r/changemyview/comments/abc/_/def/";

#[derive(Debug, Default)]
struct ThreadState {
    flair: Option<String>,
    replies: Vec<Comment>,
    next_reply: usize,
    notifications: Vec<(String, String)>,
    deleted: Vec<String>,
    awards: usize,
}

/// In-memory stand-in for one Reddit thread with a single target comment.
struct ThreadFixture {
    state: AsyncMutex<ThreadState>,
}

impl ThreadFixture {
    fn new(flair: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            state: AsyncMutex::new(ThreadState {
                flair: flair.map(str::to_string),
                ..ThreadState::default()
            }),
        })
    }

    async fn seed_bot_reply(&self, kind: ReplyKind) {
        let mut state = self.state.lock().await;
        let body = format!("Automated reply.\n\n{}", render_reply_marker(kind));
        let reply = bot_reply(&mut state, body);
        state.replies.push(reply);
    }

    fn target(flair: Option<String>) -> Comment {
        Comment {
            fullname: "t1_def".to_string(),
            id: "def".to_string(),
            author: "bob".to_string(),
            body: "my view".to_string(),
            subreddit: "changemyview".to_string(),
            link_id: "t3_abc".to_string(),
            parent_id: Some("t3_abc".to_string()),
            author_flair_text: flair,
            replies: Vec::new(),
        }
    }

    async fn bot_reply_kinds(&self) -> Vec<Option<ReplyKind>> {
        let state = self.state.lock().await;
        state
            .replies
            .iter()
            .filter(|reply| reply.author == BOT_USERNAME)
            .map(|reply| extract_reply_marker(&reply.body))
            .collect()
    }
}

fn bot_reply(state: &mut ThreadState, body: String) -> Comment {
    state.next_reply += 1;
    let id = format!("r{}", state.next_reply);
    Comment {
        fullname: format!("t1_{id}"),
        id,
        author: BOT_USERNAME.to_string(),
        body,
        subreddit: "changemyview".to_string(),
        link_id: "t3_abc".to_string(),
        parent_id: Some("t1_def".to_string()),
        author_flair_text: None,
        replies: Vec::new(),
    }
}

#[async_trait]
impl CommentResolver for ThreadFixture {
    async fn resolve_by_locator(&self, locator: &str) -> Result<Comment, ResolutionError> {
        let parsed =
            parse_comment_locator(locator).map_err(|_| ResolutionError::not_found(locator))?;
        if parsed.comment_fullname() != "t1_def" {
            return Err(ResolutionError::not_found(locator));
        }
        let state = self.state.lock().await;
        Ok(Self::target(state.flair.clone()))
    }

    async fn populate_context(&self, comment: &mut Comment) -> Result<(), ResolutionError> {
        let state = self.state.lock().await;
        comment.replies = state.replies.clone();
        Ok(())
    }
}

#[async_trait]
impl AwardEngine for ThreadFixture {
    async fn award(&self, comment: &Comment) -> Result<(), AwardError> {
        // Widen the window between the guard check and the award.
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.flair = Some(next_delta_flair(comment.author_flair_text.as_deref()));
        state.awards += 1;
        Ok(())
    }
}

#[async_trait]
impl ReplyPublisher for ThreadFixture {
    async fn delete(&self, reply: &ReplyRef) -> Result<(), PublishError> {
        let mut state = self.state.lock().await;
        let before = state.replies.len();
        state
            .replies
            .retain(|existing| existing.fullname != reply.fullname);
        if state.replies.len() == before {
            return Err(PublishError::Delete {
                reply: reply.fullname.clone(),
                source: anyhow!("reply already gone"),
            });
        }
        state.deleted.push(reply.fullname.clone());
        Ok(())
    }

    async fn publish(&self, _comment: &Comment, text: &str) -> Result<(), PublishError> {
        let mut state = self.state.lock().await;
        let reply = bot_reply(&mut state, text.to_string());
        state.replies.push(reply);
        Ok(())
    }
}

#[async_trait]
impl Notifier for ThreadFixture {
    async fn reply_to_requester(&self, message_id: &str, text: &str) -> Result<(), NotifyError> {
        let mut state = self.state.lock().await;
        if state
            .notifications
            .iter()
            .any(|(existing, _)| existing == message_id)
        {
            return Err(NotifyError {
                message_id: message_id.to_string(),
                source: anyhow!("private message answered twice"),
            });
        }
        state
            .notifications
            .push((message_id.to_string(), text.to_string()));
        Ok(())
    }
}

fn build_workflow(fixture: &Arc<ThreadFixture>) -> OverrideWorkflow {
    OverrideWorkflow::new(OverrideCollaborators {
        resolver: fixture.clone(),
        detector: Arc::new(MarkerReplyDetector::new(BOT_USERNAME)),
        award_engine: fixture.clone(),
        composer: Arc::new(TemplateReplyComposer::new("changemyview")),
        publisher: fixture.clone(),
        notifier: fixture.clone(),
    })
    .with_lock_key(comment_lock_key)
}

fn command(message_id: &str, locator: &str) -> OverrideCommand {
    OverrideCommand::new(message_id, "mod_alice", locator)
}

#[tokio::test]
async fn integration_mod_add_swaps_failed_reply_for_moderator_reply() {
    let fixture = ThreadFixture::new(Some("2∆"));
    fixture.seed_bot_reply(ReplyKind::FailCommentTooShort).await;
    let workflow = build_workflow(&fixture);

    let outcome = workflow
        .execute_serialized(&command("m1", COMMENT_URL))
        .await
        .expect("mod add");

    assert_eq!(outcome, WorkflowOutcome::Succeeded);
    assert_eq!(
        fixture.bot_reply_kinds().await,
        vec![Some(ReplyKind::ModeratorAdded)]
    );
    let state = fixture.state.lock().await;
    assert_eq!(state.deleted, vec!["t1_r1".to_string()]);
    assert_eq!(parse_delta_count(state.flair.as_deref()), 3);
    assert_eq!(
        state.notifications,
        vec![("m1".to_string(), ADD_SUCCEEDED_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn regression_mod_add_respects_success_reply_behind_failed_reply() {
    let fixture = ThreadFixture::new(Some("1∆"));
    fixture.seed_bot_reply(ReplyKind::FailCommentTooShort).await;
    fixture.seed_bot_reply(ReplyKind::Success).await;
    let workflow = build_workflow(&fixture);

    let outcome = workflow
        .execute_serialized(&command("m1", COMMENT_URL))
        .await
        .expect("mod add");

    assert_eq!(outcome, WorkflowOutcome::AlreadyAwarded);
    let state = fixture.state.lock().await;
    assert_eq!(state.awards, 0);
    assert!(state.deleted.is_empty());
    assert_eq!(parse_delta_count(state.flair.as_deref()), 1);
}

#[tokio::test]
async fn regression_mod_add_clears_every_failed_bot_reply() {
    let fixture = ThreadFixture::new(None);
    fixture.seed_bot_reply(ReplyKind::FailCommentTooShort).await;
    fixture.seed_bot_reply(ReplyKind::FailAlreadyAwarded).await;
    let workflow = build_workflow(&fixture);

    let outcome = workflow
        .execute_serialized(&command("m1", COMMENT_URL))
        .await
        .expect("mod add");

    assert_eq!(outcome, WorkflowOutcome::Succeeded);
    assert_eq!(
        fixture.bot_reply_kinds().await,
        vec![Some(ReplyKind::ModeratorAdded)]
    );
    let state = fixture.state.lock().await;
    assert_eq!(
        state.deleted,
        vec!["t1_r1".to_string(), "t1_r2".to_string()]
    );
}

#[tokio::test]
async fn integration_reissued_mod_add_hits_already_awarded_guard() {
    let fixture = ThreadFixture::new(None);
    let workflow = build_workflow(&fixture);

    let first = workflow
        .execute_serialized(&command("m1", COMMENT_URL))
        .await
        .expect("first add");
    let second = workflow
        .execute_serialized(&command(
            "m2",
            " old.reddit.com/r/changemyview/comments/abc/title/def ",
        ))
        .await
        .expect("second add");

    assert_eq!(first, WorkflowOutcome::Succeeded);
    assert_eq!(second, WorkflowOutcome::AlreadyAwarded);
    assert_eq!(
        fixture.bot_reply_kinds().await,
        vec![Some(ReplyKind::ModeratorAdded)]
    );
    let state = fixture.state.lock().await;
    assert_eq!(state.awards, 1);
    assert_eq!(parse_delta_count(state.flair.as_deref()), 1);
    assert_eq!(
        state.notifications[1],
        (
            "m2".to_string(),
            ADD_FAILED_ALREADY_AWARDED_MESSAGE.to_string()
        )
    );
}

#[tokio::test]
async fn integration_concurrent_mod_adds_for_one_comment_award_once() {
    let fixture = ThreadFixture::new(Some("4∆"));
    fixture.seed_bot_reply(ReplyKind::FailCannotAwardOp).await;
    let workflow = build_workflow(&fixture);
    let first_command = command("m1", COMMENT_URL);
    let second_command = command("m2", "https://reddit.com/r/changemyview/comments/abc/_/def");

    let (first, second) = tokio::join!(
        workflow.execute_serialized(&first_command),
        workflow.execute_serialized(&second_command),
    );

    let mut outcomes = vec![first.expect("first"), second.expect("second")];
    outcomes.sort_by_key(|outcome| outcome.label());
    assert_eq!(
        outcomes,
        vec![WorkflowOutcome::AlreadyAwarded, WorkflowOutcome::Succeeded]
    );
    assert_eq!(
        fixture.bot_reply_kinds().await,
        vec![Some(ReplyKind::ModeratorAdded)]
    );
    let state = fixture.state.lock().await;
    assert_eq!(state.awards, 1);
    assert_eq!(parse_delta_count(state.flair.as_deref()), 5);
    assert_eq!(state.notifications.len(), 2);
}

#[tokio::test]
async fn regression_mod_add_for_unknown_comment_sends_single_failure_reply() {
    let fixture = ThreadFixture::new(None);
    let workflow = build_workflow(&fixture);

    let error = workflow
        .execute_serialized(&command(
            "m1",
            "https://reddit.com/r/changemyview/comments/abc/_/zzz",
        ))
        .await
        .expect_err("unknown comment");

    assert_eq!(error.stage(), "resolve");
    assert!(fixture.bot_reply_kinds().await.is_empty());
    let state = fixture.state.lock().await;
    assert_eq!(state.awards, 0);
    assert_eq!(state.notifications.len(), 1);
    assert!(state.notifications[0]
        .1
        .starts_with("Add failed. DeltaBot is very sorry"));
}
