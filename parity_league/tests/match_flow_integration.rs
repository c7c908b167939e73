//! Integration tests for single-match orchestration.
//!
//! Participants follow a script of replies. Time is paused so timeouts and
//! retry delays resolve instantly while elapsed virtual time stays exact.

use async_trait::async_trait;
use parity_league::{
    CallError, ChoiceRequest, CompletedMatch, Fixture, Invitation, InvitationReply, MatchConfig,
    MatchOrchestrator, MatchStatus, ParityChoice, Participant, ParticipantId, SequenceDraw,
    participant::CallResult,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{sync::mpsc, time::Instant};

#[derive(Clone)]
enum Reply {
    Token(&'static str),
    Silent,
    Fail(CallError),
    Late(Duration, &'static str),
}

struct Scripted {
    id: ParticipantId,
    invitation: Reply,
    choices: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ChoiceRequest>>,
}

impl Scripted {
    fn new(id: &str, choices: Vec<Reply>) -> Self {
        Self {
            id: id.into(),
            invitation: Reply::Token("accept"),
            choices: Mutex::new(choices.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_invitation(mut self, reply: Reply) -> Self {
        self.invitation = reply;
        self
    }

    fn requests(&self) -> Vec<ChoiceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Participant for Scripted {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    async fn offer_invitation(&self, _invitation: &Invitation) -> CallResult<InvitationReply> {
        match self.invitation.clone() {
            Reply::Token("accept") => Ok(InvitationReply::accept()),
            Reply::Token(reason) => Ok(InvitationReply::reject(reason)),
            Reply::Silent => std::future::pending().await,
            Reply::Fail(e) => Err(e),
            Reply::Late(delay, _) => {
                tokio::time::sleep(delay).await;
                Ok(InvitationReply::accept())
            }
        }
    }

    async fn request_choice(&self, request: &ChoiceRequest) -> CallResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.choices.lock().unwrap().pop_front().unwrap_or(Reply::Silent);
        match next {
            Reply::Token(token) => Ok(token.to_string()),
            Reply::Silent => std::future::pending().await,
            Reply::Fail(e) => Err(e),
            Reply::Late(delay, token) => {
                tokio::time::sleep(delay).await;
                Ok(token.to_string())
            }
        }
    }
}

fn fixture() -> Fixture {
    Fixture {
        match_id: "R1M1".to_string(),
        round: 1,
        side_a: "P01".into(),
        side_b: "P02".into(),
    }
}

async fn play(a: &Arc<Scripted>, b: &Arc<Scripted>, config: &MatchConfig, drawn: u32) -> CompletedMatch {
    MatchOrchestrator::new(
        &fixture(),
        a.clone(),
        b.clone(),
        config,
        Arc::new(SequenceDraw::constant(drawn)),
    )
    .unwrap()
    .run()
    .await
}

#[tokio::test(start_paused = true)]
async fn test_two_timeouts_then_success_completes_normally() {
    let a = Arc::new(Scripted::new(
        "P01",
        vec![Reply::Silent, Reply::Silent, Reply::Token("even")],
    ));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("odd")]));

    let started = Instant::now();
    let event = play(&a, &b, &MatchConfig::default(), 8).await;

    assert_eq!(event.status, MatchStatus::Finished);
    assert_eq!(event.winner, Some("P01".into()));
    assert_eq!(event.drawn, Some(8));
    assert_eq!(
        a.requests().iter().map(|r| r.attempt).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(b.requests().len(), 1);
    // two expired 30s attempts and two 2s delays
    assert_eq!(started.elapsed(), Duration::from_secs(64));
}

#[tokio::test(start_paused = true)]
async fn test_three_timeouts_is_technical_loss() {
    let a = Arc::new(Scripted::new("P01", vec![Reply::Token("odd")]));
    let b = Arc::new(Scripted::new("P02", vec![]));

    let event = play(&a, &b, &MatchConfig::default(), 5).await;

    assert_eq!(event.status, MatchStatus::Finished);
    assert_eq!(event.winner, Some("P01".into()));
    assert_eq!((event.points_a, event.points_b), (3, 0));
    assert_eq!(event.drawn, None);
    assert!(event.reason.contains("P02"));
    assert!(event.reason.contains("3 attempt"));
    assert_eq!(b.requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_connection_failure_is_retried() {
    let a = Arc::new(Scripted::new(
        "P01",
        vec![
            Reply::Fail(CallError::ConnectionFailure("reset by peer".into())),
            Reply::Token("odd"),
        ],
    ));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("odd")]));

    let event = play(&a, &b, &MatchConfig::default(), 3).await;

    assert!(event.is_draw());
    assert_eq!((event.points_a, event.points_b), (1, 1));
    assert_eq!(a.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_choice_corrected_within_attempt() {
    let a = Arc::new(Scripted::new(
        "P01",
        vec![Reply::Token("maybe"), Reply::Token("even")],
    ));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("odd")]));

    let event = play(&a, &b, &MatchConfig::default(), 7).await;

    assert_eq!(event.status, MatchStatus::Finished);
    assert_eq!(event.winner, Some("P02".into()));

    let requests = a.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].correction.is_none());
    assert!(requests[1].correction.as_deref().unwrap_or_default().contains("maybe"));
    // corrections stay inside the first attempt
    assert_eq!(requests[1].attempt, 1);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_choice_then_silence_is_terminal() {
    let a = Arc::new(Scripted::new("P01", vec![Reply::Token("EVEN!"), Reply::Silent]));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("odd")]));

    let started = Instant::now();
    let event = play(&a, &b, &MatchConfig::default(), 2).await;

    assert_eq!(event.winner, Some("P02".into()));
    assert!(event.reason.contains("invalid value"));
    assert_eq!(a.requests().len(), 2);
    // no retry after the deadline passed on an invalid submission
    assert_eq!(started.elapsed(), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_correction_budget_exhausted() {
    let config = MatchConfig {
        max_corrections: 1,
        ..Default::default()
    };
    let a = Arc::new(Scripted::new("P01", vec![Reply::Token("even")]));
    let b = Arc::new(Scripted::new(
        "P02",
        vec![Reply::Token("one"), Reply::Token("two"), Reply::Token("odd")],
    ));

    let event = play(&a, &b, &config, 4).await;

    assert_eq!(event.winner, Some("P01".into()));
    assert_eq!(event.choice_a, Some(ParityChoice::Even));
    assert_eq!(event.choice_b, None);
    assert_eq!(b.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_invalid_value_error_allows_correction() {
    let a = Arc::new(Scripted::new(
        "P01",
        vec![
            Reply::Fail(CallError::InvalidValue("garbled frame".into())),
            Reply::Token("odd"),
        ],
    ));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("even")]));

    let event = play(&a, &b, &MatchConfig::default(), 9).await;

    assert_eq!(event.winner, Some("P01".into()));
    assert_eq!(a.requests()[1].correction.as_deref(), Some("garbled frame"));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_choice_not_retried() {
    let a = Arc::new(Scripted::new(
        "P01",
        vec![Reply::Fail(CallError::Rejected("not playing".into()))],
    ));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("even")]));

    let event = play(&a, &b, &MatchConfig::default(), 9).await;

    assert_eq!(event.winner, Some("P02".into()));
    assert_eq!(a.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_invitation_reject_aborts_with_walkover() {
    let a = Arc::new(Scripted::new("P01", vec![Reply::Token("even")]));
    let b = Arc::new(
        Scripted::new("P02", vec![Reply::Token("odd")]).with_invitation(Reply::Token("busy")),
    );

    let event = play(&a, &b, &MatchConfig::default(), 2).await;

    assert_eq!(event.status, MatchStatus::Aborted);
    assert_eq!(event.winner, Some("P01".into()));
    assert_eq!((event.points_a, event.points_b), (3, 0));
    assert!(event.reason.contains("busy"));
    assert!(a.requests().is_empty());
    assert!(b.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_silent_invitations_are_double_forfeit() {
    let a = Arc::new(Scripted::new("P01", vec![]).with_invitation(Reply::Silent));
    let b = Arc::new(Scripted::new("P02", vec![]).with_invitation(Reply::Silent));

    let started = Instant::now();
    let event = play(&a, &b, &MatchConfig::default(), 2).await;

    assert_eq!(event.status, MatchStatus::Aborted);
    assert!(event.winner.is_none());
    assert_eq!((event.points_a, event.points_b), (0, 0));
    assert!(event.reason.contains("double forfeit"));
    // invitations are not retried
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_late_invitation_counts_as_no_response() {
    let a = Arc::new(
        Scripted::new("P01", vec![]).with_invitation(Reply::Late(Duration::from_secs(6), "")),
    );
    let b = Arc::new(Scripted::new("P02", vec![]));

    let event = play(&a, &b, &MatchConfig::default(), 2).await;

    assert_eq!(event.status, MatchStatus::Aborted);
    assert_eq!(event.winner, Some("P02".into()));
}

#[tokio::test(start_paused = true)]
async fn test_both_sides_contacted_concurrently() {
    let a = Arc::new(Scripted::new(
        "P01",
        vec![Reply::Late(Duration::from_secs(10), "even")],
    ));
    let b = Arc::new(Scripted::new(
        "P02",
        vec![Reply::Late(Duration::from_secs(10), "even")],
    ));

    let started = Instant::now();
    let event = play(&a, &b, &MatchConfig::default(), 1).await;

    assert!(event.is_draw());
    assert_eq!(started.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_result_reported_to_sink() {
    let a = Arc::new(Scripted::new("P01", vec![Reply::Token("odd")]));
    let b = Arc::new(Scripted::new("P02", vec![Reply::Token("even")]));
    let (tx, mut rx) = mpsc::channel::<CompletedMatch>(1);

    let event = MatchOrchestrator::new(
        &fixture(),
        a,
        b,
        &MatchConfig::default(),
        Arc::new(SequenceDraw::constant(10)),
    )
    .unwrap()
    .run_and_report(&tx)
    .await;

    assert_eq!(rx.recv().await, Some(event));
}
