//! Conversion between domain messages and Chat Completions wire types.

use serde_json::Value;
use std::collections::HashSet;
use toolmend_application::GeneratorError;
use toolmend_domain::{Message, Role, ToolCall, ToolSchema};

use super::types::{
    ErrorResponse, FunctionCall, FunctionDef, Request, Response, Tool, ToolCallRequest, WireMessage,
};

/// Build a request body.
pub(crate) fn build_request<'a>(
    model: &'a str,
    temperature: Option<f32>,
    messages: &[Message],
    tools: &'a [ToolSchema],
    tool_choice: Option<&str>,
) -> Request<'a> {
    Request {
        model,
        messages: convert_messages(messages),
        temperature,
        tools: tools
            .iter()
            .map(|t| Tool {
                tool_type: "function",
                function: FunctionDef {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.parameters,
                },
            })
            .collect(),
        tool_choice: tool_choice.map(convert_tool_choice),
    }
}

/// `"any"` and `"required"` force some tool; anything else names one.
pub(crate) fn convert_tool_choice(choice: &str) -> Value {
    match choice {
        "any" | "required" => Value::String("required".to_string()),
        "auto" | "none" => Value::String(choice.to_string()),
        name => serde_json::json!({ "type": "function", "function": { "name": name } }),
    }
}

/// Convert a history to wire messages.
///
/// The API rejects `tool` messages that do not answer a call of the
/// immediately preceding assistant turn; those are sent as user messages.
pub(crate) fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
    let mut open_calls: HashSet<&str> = HashSet::new();
    messages
        .iter()
        .map(|m| match m.role {
            Role::System => {
                open_calls.clear();
                text_message("system", &m.content)
            }
            Role::User => {
                open_calls.clear();
                text_message("user", &m.content)
            }
            Role::Assistant => {
                open_calls = m.tool_calls.iter().map(|c| c.id.as_str()).collect();
                WireMessage {
                    role: "assistant",
                    content: (!m.content.is_empty()).then(|| m.content.clone()),
                    tool_calls: (!m.tool_calls.is_empty())
                        .then(|| m.tool_calls.iter().map(convert_tool_call).collect()),
                    tool_call_id: None,
                }
            }
            Role::Tool => match m.tool_call_id.as_deref() {
                Some(id) if open_calls.contains(id) => WireMessage {
                    role: "tool",
                    content: Some(m.content.clone()),
                    tool_calls: None,
                    tool_call_id: Some(id.to_string()),
                },
                _ => text_message("user", &m.content),
            },
        })
        .collect()
}

fn text_message(role: &'static str, content: &str) -> WireMessage {
    WireMessage {
        role,
        content: Some(content.to_string()),
        tool_calls: None,
        tool_call_id: None,
    }
}

fn convert_tool_call(call: &ToolCall) -> ToolCallRequest {
    let arguments = match &call.args {
        Value::String(raw) => raw.clone(),
        args => args.to_string(),
    };
    ToolCallRequest {
        id: call.id.clone(),
        call_type: "function",
        function: FunctionCall {
            name: call.name.clone(),
            arguments,
        },
    }
}

/// Convert a response body into an assistant message.
///
/// The response id is not reused as the message id; some servers repeat it.
///
/// Arguments that are not valid JSON are kept as a JSON string so that
/// validation can report them instead of the request failing outright.
pub(crate) fn convert_response(response: Response) -> Result<Message, GeneratorError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GeneratorError::InvalidResponse("response has no choices".to_string()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let args = serde_json::from_str(&call.function.arguments)
                .unwrap_or(Value::String(call.function.arguments));
            ToolCall::new(call.id, call.function.name).with_args(args)
        })
        .collect();

    Ok(Message::assistant(choice.message.content.unwrap_or_default()).with_tool_calls(tool_calls))
}

/// Turn an error body into a readable message.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => format!("HTTP {}: {}", status, err.error.message),
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_choice_mapping() {
        assert_eq!(convert_tool_choice("any"), json!("required"));
        assert_eq!(convert_tool_choice("required"), json!("required"));
        assert_eq!(convert_tool_choice("auto"), json!("auto"));
        assert_eq!(
            convert_tool_choice("Respond"),
            json!({"type": "function", "function": {"name": "Respond"}})
        );
    }

    #[test]
    fn test_orphan_tool_message_becomes_user_message() {
        let messages = vec![
            Message::user("hi"),
            Message::assistant("").with_tool_call(ToolCall::new("c1", "Respond")),
            Message::tool("c1", "error for c1").as_error(),
            Message::tool("zz", "no matching call"),
            Message::user("again"),
            Message::tool("c1", "after a user turn"),
        ];
        let wire = convert_messages(&messages);
        assert_eq!(wire[1].role, "assistant");
        assert!(wire[1].content.is_none());
        assert_eq!(wire[2].role, "tool");
        assert_eq!(wire[2].tool_call_id.as_deref(), Some("c1"));
        assert_eq!(wire[3].role, "user");
        assert_eq!(wire[3].content.as_deref(), Some("no matching call"));
        assert_eq!(wire[5].role, "user");
    }

    #[test]
    fn test_assistant_arguments_are_json_encoded() {
        let messages = vec![Message::assistant("thinking").with_tool_call(
            ToolCall::new("c1", "Respond").with_args(json!({"a": 1})),
        )];
        let wire = convert_messages(&messages);
        let calls = wire[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, r#"{"a":1}"#);
        assert_eq!(wire[0].content.as_deref(), Some("thinking"));
    }

    #[test]
    fn test_build_request_serializes_function_tools() {
        let tools = vec![ToolSchema::new("Respond", "Answer", json!({"type": "object"}))];
        let request = build_request("gpt", Some(0.0), &[Message::user("hi")], &tools, Some("Respond"));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "Respond");
        assert_eq!(body["tool_choice"]["function"]["name"], "Respond");
    }

    #[test]
    fn test_build_request_omits_empty_tools() {
        let request = build_request("gpt", None, &[Message::user("hi")], &[], None);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_convert_response_parses_arguments() {
        let response: Response = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "c1", "type": "function", "function": {"name": "Respond", "arguments": "{\"a\": 1}"}},
                        {"id": "c2", "type": "function", "function": {"name": "Respond", "arguments": "{broken"}}
                    ]
                }
            }]
        }))
        .unwrap();
        let message = convert_response(response).unwrap();
        assert!(message.is_assistant());
        assert!(message.id.is_none());
        assert_eq!(message.tool_calls[0].args, json!({"a": 1}));
        assert_eq!(message.tool_calls[1].args, json!("{broken"));
    }

    #[test]
    fn test_convert_response_without_choices_fails() {
        let response: Response = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            convert_response(response),
            Err(GeneratorError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_message_prefers_api_detail() {
        assert_eq!(
            error_message(401, r#"{"error": {"message": "bad key"}}"#),
            "HTTP 401: bad key"
        );
        assert_eq!(error_message(502, "upstream"), "HTTP 502: upstream");
    }
}
