//! Interactive terminal agent.
//!
//! The `chat` subcommand: reads user text from the terminal, forwards it to
//! an OpenAI-compatible backend with the CAD tool catalog attached,
//! executes any tool calls the model requests against the in-process tool
//! registry, and prints the final assistant message.
//!
//! Bridge failures during a tool call are fed back to the model as the
//! tool's result text; the model decides how to present them to the user.

mod openai;

pub use openai::{ChatClient, ChatMessage, ToolSpec};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::bridge::CommandBridge;
use crate::error::AgentError;
use crate::tools::ToolRegistry;

/// Upper bound on tool-call rounds per user turn. Stops a model that keeps
/// requesting tools without ever producing a final answer.
const MAX_TOOL_ROUNDS: usize = 16;

const SYSTEM_PROMPT: &str = "You are a CAD operator controlling a live BRL-CAD modeling session. \
     Use the provided tools to create geometry and combine it with boolean \
     operations. Coordinates and dimensions are in the session's working \
     units. Report tool output back to the user concisely.";

/// Runs the interactive chat loop until the user exits or stdin closes.
///
/// # Errors
///
/// Returns an error on terminal I/O failure or when the LLM backend is
/// unreachable or misconfigured.
pub async fn run_chat(
    client: &ChatClient,
    registry: &ToolRegistry,
    bridge: &dyn CommandBridge,
) -> Result<(), AgentError> {
    let tools: Vec<ToolSpec> = registry.definitions().map(ToolSpec::from).collect();

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    println!("=================================================");
    println!(" BRL-CAD Terminal Agent Active. Type 'exit' to quit.");
    println!("=================================================");

    let mut history = vec![ChatMessage::system(SYSTEM_PROMPT)];

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let mut line = String::new();
        if stdin.read_line(&mut line).await? == 0 {
            println!("\nGoodbye!");
            return Ok(());
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
            return Ok(());
        }

        history.push(ChatMessage::user(input));
        println!("AI is calculating geometry...");

        run_turn(client, registry, bridge, &tools, &mut history).await?;
    }
}

/// Drives one user turn to completion, executing tool calls as requested.
async fn run_turn(
    client: &ChatClient,
    registry: &ToolRegistry,
    bridge: &dyn CommandBridge,
    tools: &[ToolSpec],
    history: &mut Vec<ChatMessage>,
) -> Result<(), AgentError> {
    for _ in 0..MAX_TOOL_ROUNDS {
        let reply = client.complete(history, tools).await?;

        let Some(calls) = reply.tool_calls.clone().filter(|c| !c.is_empty()) else {
            println!("\nAI: {}", reply.content.as_deref().unwrap_or(""));
            history.push(reply);
            return Ok(());
        };

        history.push(reply);

        for call in calls {
            debug!(tool = %call.function.name, "executing tool call");

            let arguments: Value = serde_json::from_str(&call.function.arguments)
                .unwrap_or(Value::Object(serde_json::Map::new()));

            let result = match registry
                .call(&call.function.name, &arguments, bridge)
                .await
            {
                Ok(output) => output.text,
                Err(e) => format!("Error: {e}"),
            };

            history.push(ChatMessage::tool_result(call.id, result));
        }
    }

    println!("\nAI: (stopped after {MAX_TOOL_ROUNDS} tool rounds without a final answer)");
    Ok(())
}
