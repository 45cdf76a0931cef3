//! Folds message sets into the flat message list a model backend expects.

use std::collections::HashMap;

use tracing::warn;

use crate::prompts::{SYNTHESIS_INTERJECTION, TOOL_CALL_INTERRUPTED};

use super::models::{
    Attachment, BlockType, LlmMessage, Message, MessageSetDetail, ToolResult, ToolsBlock,
};

/// Encode a chat snapshot as the ordered message list for a model call.
///
/// Sets contribute messages in order: user turns become `user` messages,
/// tools turns encode their selected responses (see [`perspective_labels`]
/// and the synthesis entry point for the multi-perspective path). Sets with
/// an unrecognized block type are logged and skipped; one malformed set
/// never aborts the rest of the conversation.
///
/// Ephemeral attachments survive only on the last user turn. Earlier user
/// turns have them filtered out; if the chat has no user turn at all,
/// every set is treated as "not the last" and stripped.
pub fn llm_conversation(message_sets: &[MessageSetDetail]) -> Vec<LlmMessage> {
    let last_user_set = message_sets
        .iter()
        .rposition(|detail| detail.set.selected_block_type == BlockType::User);

    let mut messages = Vec::new();
    for (index, detail) in message_sets.iter().enumerate() {
        let keep_ephemeral = last_user_set == Some(index);
        match detail.set.selected_block_type {
            BlockType::User => {
                let Some(user) = detail.user_block.as_ref().and_then(|b| b.message.as_ref())
                else {
                    continue;
                };
                messages.push(LlmMessage::User {
                    content: user.content.clone(),
                    attachments: filter_attachments(&user.attachments, keep_ephemeral),
                });
            }
            BlockType::Tools => {
                if let Some(block) = &detail.tools_block {
                    encode_tools_block(block, &mut messages);
                }
            }
            BlockType::Unknown => {
                warn!(set_id = %detail.set.id, "skipping message set with unrecognized block type");
            }
        }
    }
    messages
}

/// Encode a chat snapshot as a synthesis request.
///
/// The target set (by id, falling back to the last set when the id is
/// absent or unmatched) supplies the perspectives: every response in its
/// tools block, selected or not, labeled per [`perspective_labels`] and
/// wrapped in `<perspective>` tags under a fixed merge instruction. The
/// sets before the target encode normally, so the model sees the leading
/// conversation and then the synthesis request as the final user turn.
///
/// An empty snapshot yields an empty conversation.
pub fn llm_conversation_for_synthesis(
    message_sets: &[MessageSetDetail],
    target_set_id: Option<&str>,
) -> Vec<LlmMessage> {
    if message_sets.is_empty() {
        return Vec::new();
    }

    let target = target_set_id
        .and_then(|id| message_sets.iter().position(|detail| detail.set.id == id))
        .unwrap_or(message_sets.len() - 1);

    let mut messages = llm_conversation(&message_sets[..target]);

    let perspectives = match &message_sets[target].tools_block {
        Some(block) => {
            let labels = perspective_labels(&block.chat_messages);
            block
                .chat_messages
                .iter()
                .zip(labels)
                .map(|(message, label)| wrap_perspective(&label, &joined_content(message)))
                .collect::<Vec<_>>()
        }
        None => Vec::new(),
    };

    let mut content = SYNTHESIS_INTERJECTION.to_string();
    if !perspectives.is_empty() {
        content.push_str("\n\n");
        content.push_str(&perspectives.join("\n\n"));
    }
    messages.push(LlmMessage::User {
        content,
        attachments: Vec::new(),
    });
    messages
}

/// Label each response with its model name, disambiguating duplicates.
///
/// When every model name is unique the labels are the bare names. As soon
/// as any name repeats (two instances of the same model in a group), every
/// label becomes `"<model> (<n>)"` with a per-name counter in encounter
/// order.
pub fn perspective_labels(messages: &[Message]) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for message in messages {
        *totals.entry(message.model.as_str()).or_default() += 1;
    }

    if totals.values().all(|&count| count == 1) {
        return messages.iter().map(|m| m.model.clone()).collect();
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    messages
        .iter()
        .map(|message| {
            let n = seen.entry(message.model.as_str()).or_default();
            *n += 1;
            format!("{} ({})", message.model, n)
        })
        .collect()
}

fn filter_attachments(attachments: &[Attachment], keep_ephemeral: bool) -> Vec<Attachment> {
    attachments
        .iter()
        .filter(|attachment| keep_ephemeral || !attachment.ephemeral)
        .cloned()
        .collect()
}

fn encode_tools_block(block: &ToolsBlock, out: &mut Vec<LlmMessage>) {
    let selected: Vec<&Message> = block
        .chat_messages
        .iter()
        .filter(|message| message.selected)
        .collect();

    match selected.as_slice() {
        [] => {}
        [message] => encode_single_response(message, out),
        many => out.push(perspective_message(many)),
    }
}

/// Encode the one selected response as alternating assistant/tool-result
/// messages, appending placeholder results if the turn was interrupted
/// with tool calls still outstanding.
fn encode_single_response(message: &Message, out: &mut Vec<LlmMessage>) {
    for part in &message.parts {
        match &part.tool_results {
            Some(results) if results.is_empty() => {
                warn!(message_id = %message.id, "skipping tool-result part with no results");
            }
            Some(results) => out.push(LlmMessage::ToolResults {
                tool_results: results.clone(),
            }),
            None => out.push(LlmMessage::Assistant {
                content: part.content.clone(),
                model: message.model.clone(),
                tool_calls: part.tool_calls.clone(),
            }),
        }
    }

    // A trailing assistant part with tool calls means the results never
    // arrived. Backends reject transcripts with unanswered calls, so close
    // each one with a placeholder result.
    if let Some(last) = message.parts.last() {
        if last.tool_results.is_none() && !last.tool_calls.is_empty() {
            out.push(LlmMessage::ToolResults {
                tool_results: last
                    .tool_calls
                    .iter()
                    .map(|call| ToolResult {
                        id: call.id.clone(),
                        namespaced_tool_name: call.namespaced_tool_name.clone(),
                        content: TOOL_CALL_INTERRUPTED.to_string(),
                    })
                    .collect(),
            });
        }
    }
}

/// Collapse several selected responses into one assistant message, each
/// wrapped in a `<perspective>` tag, rather than sending them as separate
/// turns.
fn perspective_message(selected: &[&Message]) -> LlmMessage {
    let content = selected
        .iter()
        .map(|message| wrap_perspective(&message.model, &joined_content(message)))
        .collect::<Vec<_>>()
        .join("\n\n");

    LlmMessage::Assistant {
        content,
        model: selected[0].model.clone(),
        tool_calls: Vec::new(),
    }
}

/// A message's prose: the non-empty content of its assistant parts,
/// blank-line joined. Tool-response parts carry no prose and drop out.
fn joined_content(message: &Message) -> String {
    message
        .parts
        .iter()
        .filter(|part| !part.is_tool_response())
        .map(|part| part.content.as_str())
        .filter(|content| !content.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn wrap_perspective(sender: &str, content: &str) -> String {
    format!("<perspective sender=\"{sender}\">{content}</perspective>")
}
