//! StageAgent - multi-turn tool loop for one pipeline stage

use std::sync::Arc;

use eyre::{Result, eyre};
use tracing::{debug, info, warn};

use super::Stage;
use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, Message, MessageContent, StopReason, TokenUsage,
};
use crate::tools::{ToolContext, ToolExecutor, ToolResult};

const KICKOFF: &str = "Carry out the task described in your instructions. When you are done, reply with the \
                       expected output only.";

const FORCE_ANSWER: &str = "You have reached the tool-use limit for this task. Do not call any more tools. \
                            Reply now with the expected output, based on what you have gathered so far.";

/// What a stage produced
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub text: String,
    pub usage: TokenUsage,
    /// Tool calls executed across all rounds
    pub tool_calls: usize,
}

/// Runs one stage as a conversation with tool access
pub struct StageAgent {
    stage: Stage,
    llm: Arc<dyn LlmClient>,
    tools: ToolExecutor,
    max_tool_rounds: u32,
    max_tokens: u32,
}

impl StageAgent {
    pub fn new(stage: Stage, llm: Arc<dyn LlmClient>, max_tool_rounds: u32, max_tokens: u32) -> Self {
        debug!(%stage, max_tool_rounds, max_tokens, "StageAgent::new: called");
        Self {
            stage,
            llm,
            tools: ToolExecutor::with_profile(stage.tool_profile()),
            max_tool_rounds,
            max_tokens,
        }
    }

    /// Run the tool loop until the model answers without tool calls
    ///
    /// After `max_tool_rounds` rounds of tool use, one final request is
    /// sent with no tools so the model has to answer.
    pub async fn run(&self, system_prompt: &str, ctx: &ToolContext) -> Result<StageOutcome> {
        info!(stage = %self.stage, run_id = %ctx.run_id(), "Stage started");
        let tool_defs = self.tools.definitions();
        let mut messages = vec![Message::user(KICKOFF)];
        let mut usage = TokenUsage::default();
        let mut tool_calls = 0;
        let mut rounds = 0;

        loop {
            if rounds >= self.max_tool_rounds && !tool_defs.is_empty() {
                info!(stage = %self.stage, rounds, "Tool-use limit reached, forcing final answer");
                let response = self.force_answer(system_prompt, messages).await?;
                usage.add(&response.usage);
                return self.finish(response, usage, tool_calls);
            }

            let request = CompletionRequest {
                system_prompt: system_prompt.to_string(),
                messages: messages.clone(),
                tools: tool_defs.clone(),
                max_tokens: self.max_tokens,
            };
            let response = self
                .llm
                .complete(request)
                .await
                .map_err(|e| eyre!("{} stage: LLM call failed: {}", self.stage, e))?;
            usage.add(&response.usage);

            debug!(
                stage = %self.stage,
                stop_reason = ?response.stop_reason,
                tool_calls = response.tool_calls.len(),
                "StageAgent::run: got response"
            );

            if response.tool_calls.is_empty() {
                return self.finish(response, usage, tool_calls);
            }

            messages.push(response_to_message(&response));
            let results = self.tools.execute_all(&response.tool_calls, ctx).await;
            tool_calls += results.len();
            messages.push(format_tool_results(&results));
            rounds += 1;
        }
    }

    async fn force_answer(&self, system_prompt: &str, mut messages: Vec<Message>) -> Result<CompletionResponse> {
        append_user_text(&mut messages, FORCE_ANSWER);
        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            messages,
            tools: vec![],
            max_tokens: self.max_tokens,
        };
        self.llm
            .complete(request)
            .await
            .map_err(|e| eyre!("{} stage: final answer request failed: {}", self.stage, e))
    }

    fn finish(&self, response: CompletionResponse, usage: TokenUsage, tool_calls: usize) -> Result<StageOutcome> {
        if response.stop_reason == StopReason::MaxTokens {
            warn!(stage = %self.stage, "Stage output truncated at max tokens");
        }
        let text = response.content.unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(eyre!("{} stage produced no output", self.stage));
        }
        info!(stage = %self.stage, tool_calls, output_len = text.len(), "Stage finished");
        Ok(StageOutcome {
            text,
            usage,
            tool_calls,
        })
    }
}

fn response_to_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();
    if let Some(text) = &response.content
        && !text.is_empty()
    {
        blocks.push(ContentBlock::text(text));
    }
    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }
    Message::assistant_blocks(blocks)
}

fn format_tool_results(results: &[(String, ToolResult)]) -> Message {
    let blocks = results
        .iter()
        .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
        .collect();
    Message::user_blocks(blocks)
}

/// Add text to the trailing user turn, or start a new one
fn append_user_text(messages: &mut Vec<Message>, text: &str) {
    if let Some(Message {
        role: crate::llm::Role::User,
        content: MessageContent::Blocks(blocks),
    }) = messages.last_mut()
    {
        blocks.push(ContentBlock::text(text));
        return;
    }
    messages.push(Message::user(text));
}
