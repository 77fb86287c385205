mod common;

use async_trait::async_trait;
use grx_core::{
    AssistantService, Draft, GenerationError, GoalDraft, MemoAttachment, MemoDraft,
    TextGenerationService, UnavailableTextGenerator,
};
use std::sync::{Arc, Mutex};

enum Script {
    Reply(&'static str),
    Fail,
}

/// Replies from a script and records every prompt it receives.
struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerationService for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script {
            Script::Reply(text) => Ok(text.to_string()),
            Script::Fail => Err(GenerationError::Upstream {
                status: Some(503),
                message: "overloaded".to_string(),
            }),
        }
    }
}

fn memo_draft() -> MemoDraft {
    let mut draft = MemoDraft {
        subject: "Proposed Switch to HubSpot".to_string(),
        summary: "Save $32k annually.".to_string(),
        ..MemoDraft::default()
    };
    draft.attach(MemoAttachment::from_upload(
        "a1",
        "HubSpot_Pricing_Comparison.pdf",
        1_000,
        "application/pdf",
    ));
    draft
}

#[tokio::test]
async fn missing_credentials_return_sentinels() {
    let assistant = AssistantService::new(Arc::new(UnavailableTextGenerator));
    assert_eq!(
        assistant.critique_memo(&memo_draft()).await,
        "AI Service Unavailable: Missing API Key"
    );
    assert_eq!(assistant.optimize_goal("grow").await, "AI Service Unavailable");

    let session = common::session(common::seed("u3"));
    let snapshot = session.knowledge_snapshot();
    assert_eq!(
        assistant.query_knowledge_base("who owns CAC?", &snapshot).await,
        "AI Service Unavailable"
    );
}

#[tokio::test]
async fn failures_and_empty_replies_map_to_fixed_messages() {
    let failing = AssistantService::new(ScriptedGenerator::new(Script::Fail));
    assert_eq!(
        failing.critique_memo(&memo_draft()).await,
        "Error generating critique."
    );
    assert_eq!(
        failing.optimize_goal("grow").await,
        "Error generating goal suggestion."
    );

    let silent = AssistantService::new(ScriptedGenerator::new(Script::Reply("  ")));
    assert_eq!(silent.critique_memo(&memo_draft()).await, "No feedback generated.");
    assert_eq!(silent.optimize_goal("grow").await, "No suggestion generated.");
    let session = common::session(common::seed("u3"));
    assert_eq!(
        silent
            .query_knowledge_base("anything", &session.knowledge_snapshot())
            .await,
        "I couldn't find an answer to that."
    );
}

#[tokio::test]
async fn prompts_carry_the_relevant_data() {
    let generator = ScriptedGenerator::new(Script::Reply("- Quantify adoption"));
    let assistant = AssistantService::new(generator.clone());

    let critique = assistant.critique_memo(&memo_draft()).await;
    assert_eq!(critique, "- Quantify adoption");
    let prompt = generator.last_prompt();
    assert!(prompt.contains("Proposed Switch to HubSpot"));
    assert!(prompt.contains("Save $32k annually."));
    assert!(prompt.contains("HubSpot_Pricing_Comparison.pdf"));

    let session = common::session(common::seed("u3"));
    assistant
        .query_knowledge_base("How is CAC trending?", &session.knowledge_snapshot())
        .await;
    let prompt = generator.last_prompt();
    assert!(prompt.contains("Reduce CAC via LinkedIn Ads"));
    assert!(prompt.contains("110/90 CAC ($)"));
    assert!(prompt.contains("Sarah (Solar)"));
    assert!(prompt.contains("How is CAC trending?"));
}

#[tokio::test]
async fn suggestion_lands_only_in_the_draft_that_asked() {
    let assistant = AssistantService::new(ScriptedGenerator::new(Script::Reply(
        "Title: Grow installs to 20/month",
    )));
    let mut draft = Draft::open(GoalDraft {
        title: "more installs".to_string(),
        ..GoalDraft::default()
    });

    let ticket = draft.ticket();
    let suggestion = assistant.optimize_goal(&draft.get().title).await;
    assert!(draft.apply(&ticket, |goal| goal.ai_suggestion = Some(suggestion)));
    assert_eq!(
        draft.get().ai_suggestion.as_deref(),
        Some("Title: Grow installs to 20/month")
    );

    let stale = draft.ticket();
    draft.reset(GoalDraft::default());
    let late = assistant.optimize_goal("more installs").await;
    assert!(!draft.apply(&stale, |goal| goal.ai_suggestion = Some(late)));
    assert_eq!(draft.get().ai_suggestion, None);
}

#[tokio::test]
async fn response_after_view_closed_is_discarded() {
    let assistant = AssistantService::new(ScriptedGenerator::new(Script::Reply("- tighten")));
    let draft = Draft::open(memo_draft());
    let ticket = draft.ticket();
    let pending = {
        let body = draft.get().clone();
        let assistant = assistant.clone();
        async move { assistant.critique_memo(&body).await }
    };
    drop(draft);

    let critique = pending.await;
    assert_eq!(critique, "- tighten");
    assert!(!ticket.is_live());
}

#[test]
fn session_without_key_hands_out_offline_assistant() {
    let session = common::session(common::seed("u3"));
    let assistant = session.assistant();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let reply = runtime.block_on(assistant.optimize_goal("grow"));
    assert_eq!(reply, "AI Service Unavailable");
}
