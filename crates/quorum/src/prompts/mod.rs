//! Fixed prompt text shared with the model-invocation layer.
//!
//! These strings are part of the wire contract: the encoder splices them
//! into outgoing conversations, and downstream consumers (and tests) match
//! on them verbatim. Change them deliberately.

/// Instruction that opens a synthesis request. The responses being merged
/// follow, each wrapped in a `<perspective sender="...">` tag.
pub const SYNTHESIS_INTERJECTION: &str = "Several assistants have each drafted a response to the \
conversation above. Merge their drafts into one final answer: keep the strongest points from \
each, resolve any disagreements explicitly, and write as a single voice without referring to \
the drafts or their authors.";

/// Placeholder result recorded for a tool call whose turn ended before the
/// real result arrived. Keeps the transcript well-formed: every tool call
/// must have a matching result.
pub const TOOL_CALL_INTERRUPTED: &str = "[Tool call was interrupted before a result was returned.]";
