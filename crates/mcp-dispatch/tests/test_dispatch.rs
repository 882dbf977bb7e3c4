use mcp_dispatch::{
    CallToolResult, CapabilityRegistry, Content, DispatchError, Dispatcher, ErrorCode, ErrorData,
    JsonObject, Request, Response, Tool, ValidationPolicy, object,
};
use serde_json::json;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn add_tool() -> Tool {
    Tool::new(
        "add",
        "Add two numbers",
        object(json!({
            "type": "object",
            "properties": {
                "a": {"type": "number"},
                "b": {"type": "number"}
            },
            "required": ["a", "b"]
        })),
    )
}

async fn add(arguments: JsonObject) -> Result<CallToolResult, ErrorData> {
    let a = arguments["a"].as_f64().unwrap_or_default();
    let b = arguments["b"].as_f64().unwrap_or_default();
    Ok(CallToolResult::success(vec![Content::text(
        (a + b).to_string(),
    )]))
}

fn weather_tool() -> Tool {
    Tool::new(
        "get_weather",
        "Get current weather for a city",
        object(json!({
            "type": "object",
            "properties": {
                "city": {"type": "string"}
            },
            "required": ["city"]
        })),
    )
}

async fn get_weather(arguments: JsonObject) -> Result<CallToolResult, ErrorData> {
    let city = arguments["city"].as_str().unwrap_or_default();
    match city {
        "Seoul" => Ok(CallToolResult::success(vec![Content::json(
            json!({"city": "Seoul", "temp": 18, "condition": "cloudy"}),
        )?])),
        _ => Err(ErrorData::internal_error(
            format!("no weather data for {city}"),
            None,
        )),
    }
}

fn registry() -> CapabilityRegistry {
    CapabilityRegistry::builder()
        .tool(add_tool(), add)
        .unwrap()
        .tool(weather_tool(), get_weather)
        .unwrap()
        .build()
}

#[tokio::test]
async fn test_add_tool_returns_five() {
    let dispatcher = Dispatcher::new(registry());
    let result = dispatcher
        .call_tool("add", Some(object(json!({"a": 2, "b": 3}))))
        .await
        .unwrap();
    assert_eq!(result.content[0].as_text(), Some("5"));
    assert_eq!(result.is_error, Some(false));
}

#[tokio::test]
async fn test_missing_argument_is_named_in_error() {
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher
        .call_tool("add", Some(object(json!({"a": 2}))))
        .await
        .unwrap_err();
    let data = ErrorData::from(error);
    assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
    assert!(data.message.contains("b"));
    assert_eq!(data.data.unwrap()["fields"][0], "b");
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher.call_tool("does_not_exist", None).await.unwrap_err();
    let data = ErrorData::from(error);
    assert_eq!(data.code, ErrorCode::METHOD_NOT_FOUND);
    assert!(data.message.contains("does_not_exist"));
}

#[tokio::test]
async fn test_validation_runs_before_handler() {
    // the handler would default a missing "a" to 0 and answer; the
    // validator must reject first
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher
        .call_tool("add", Some(object(json!({"b": 3}))))
        .await
        .unwrap_err();
    assert!(matches!(error, DispatchError::Validation(_)));
}

#[tokio::test]
async fn test_strict_rejects_extra_arguments() {
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher
        .call_tool("add", Some(object(json!({"a": 2, "b": 3, "c": 9}))))
        .await
        .unwrap_err();
    let data = ErrorData::from(error);
    assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
    assert!(data.message.contains("c"));
}

#[tokio::test]
async fn test_lenient_policy_passes_extra_arguments() {
    let dispatcher = Dispatcher::new(registry()).with_tool_policy(ValidationPolicy::Lenient);
    let result = dispatcher
        .call_tool("add", Some(object(json!({"a": 2, "b": 3, "c": 9}))))
        .await
        .unwrap();
    assert_eq!(result.content[0].as_text(), Some("5"));
}

#[tokio::test]
async fn test_type_mismatch_rejected() {
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher
        .call_tool("add", Some(object(json!({"a": "two", "b": 3}))))
        .await
        .unwrap_err();
    let data = ErrorData::from(error);
    assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
    assert!(data.message.contains("a"));
}

#[tokio::test]
async fn test_type_mismatch_names_every_field() {
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher
        .call_tool("add", Some(object(json!({"a": "two", "b": "three"}))))
        .await
        .unwrap_err();
    let data = ErrorData::from(error);
    assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(data.data.unwrap()["fields"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_handler_error_becomes_response_not_crash() {
    init_logging();
    let dispatcher = Dispatcher::new(registry());
    let response = dispatcher
        .handle(Request::Tool {
            name: "get_weather".to_string(),
            arguments: Some(object(json!({"city": "Atlantis"}))),
        })
        .await;
    match response {
        Response::Error { error } => {
            assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
            assert!(error.message.contains("Atlantis"));
        }
        Response::Success { .. } => panic!("Expected error response"),
    }

    // subsequent requests still succeed
    let result = dispatcher
        .call_tool("get_weather", Some(object(json!({"city": "Seoul"}))))
        .await
        .unwrap();
    assert!(result.content[0].as_text().unwrap().contains("cloudy"));
}

#[tokio::test]
async fn test_handle_normalizes_tool_content() {
    init_logging();
    let dispatcher = Dispatcher::new(registry());
    let response = dispatcher
        .handle(Request::Tool {
            name: "add".to_string(),
            arguments: Some(object(json!({"a": 2, "b": 3}))),
        })
        .await;
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["content"][0]["type"], "text");
    assert_eq!(json["content"][0]["text"], "5");
}

#[tokio::test]
async fn test_missing_arguments_object_treated_as_empty() {
    let dispatcher = Dispatcher::new(registry());
    let error = dispatcher.call_tool("add", None).await.unwrap_err();
    let data = ErrorData::from(error);
    assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(data.data.unwrap()["fields"], json!(["a", "b"]));
}

#[test]
fn test_list_tools_registration_order_and_idempotence() {
    let registry = registry();
    let names: Vec<_> = registry
        .list_tools()
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect();
    assert_eq!(names, vec!["add", "get_weather"]);
    assert_eq!(registry.list_tools(), registry.list_tools());
}

#[test]
fn test_duplicate_tool_registration_fails() {
    let error = CapabilityRegistry::builder()
        .tool(add_tool(), add)
        .unwrap()
        .tool(add_tool(), add)
        .unwrap_err();
    assert!(error.to_string().contains("duplicate tool"));
}

#[tokio::test]
async fn test_domain_failure_reported_in_band() {
    // a tool can report failure as content with is_error, distinct from
    // a protocol error
    let attr = Tool::new(
        "lookup",
        "Look a record up",
        object(json!({"type": "object", "properties": {}, "required": []})),
    );
    let registry = CapabilityRegistry::builder()
        .tool(attr, |_arguments: JsonObject| async {
            Ok(CallToolResult::error(vec![Content::text("no such record")]))
        })
        .unwrap()
        .build();
    let dispatcher = Dispatcher::new(registry);
    let result = dispatcher.call_tool("lookup", None).await.unwrap();
    assert_eq!(result.is_error, Some(true));

    let response = dispatcher
        .handle(Request::Tool {
            name: "lookup".to_string(),
            arguments: None,
        })
        .await;
    assert!(!response.is_error());
}
