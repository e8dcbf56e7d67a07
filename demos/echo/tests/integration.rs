use echo::echo_handler::echo;
use lambda_gateway::{Gateway, LambdaContext};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn proxy_event(
  method: &str,
  path: &str,
  headers: Value,
  body: Value,
  is_base64: bool,
) -> Value {
  json!({
    "resource": "/{proxy+}",
    "path": path,
    "httpMethod": method,
    "headers": headers,
    "multiValueHeaders": {},
    "queryStringParameters": {"page": "2"},
    "multiValueQueryStringParameters": {"page": ["2"]},
    "pathParameters": null,
    "stageVariables": null,
    "requestContext": {
      "accountId": "123456789012",
      "resourceId": "abc123",
      "stage": "prod",
      "requestId": "v1-request",
      "identity": {"sourceIp": "203.0.113.7"},
      "resourcePath": "/{proxy+}",
      "authorizer": {"principalId": "user-1"},
      "httpMethod": method,
      "requestTimeEpoch": 1428582896000_i64,
      "apiId": "1234567890",
      "protocol": "HTTP/1.1"
    },
    "body": body,
    "isBase64Encoded": is_base64
  })
}

fn http_api_event(
  method: &str,
  path: &str,
  headers: Value,
  body: Value,
  is_base64: bool,
) -> Value {
  json!({
    "version": "2.0",
    "routeKey": "$default",
    "rawPath": path,
    "rawQueryString": "page=2",
    "cookies": ["theme=dark"],
    "headers": headers,
    "requestContext": {
      "accountId": "210987654321",
      "apiId": "api-id",
      "domainName": "id.execute-api.us-east-1.amazonaws.com",
      "domainPrefix": "id",
      "http": {
        "method": method,
        "path": path,
        "protocol": "HTTP/1.1",
        "sourceIp": "198.51.100.4",
        "userAgent": "agent"
      },
      "requestId": "v2-request",
      "routeKey": "$default",
      "stage": "$default",
      "time": "12/Mar/2020:19:03:58 +0000",
      "timeEpoch": 1583348638390_i64
    },
    "body": body,
    "isBase64Encoded": is_base64
  })
}

fn traced_context() -> LambdaContext {
  let mut context = LambdaContext::default();
  context.xray_trace_id = Some("Root=1-5759e988-bd862e3fe1be46a994272793".to_string());
  context
}

fn response_json(result: &Value) -> Value {
  serde_json::from_str(result["body"].as_str().expect("body should be a string"))
    .expect("body should be JSON")
}

#[test]
fn test_echo_v1_json() {
  let gateway = Gateway::v1(echo);

  let result = gateway
    .invoke(
      proxy_event(
        "POST",
        "/pets",
        json!({"Content-Type": "application/json", "Host": "api.example.com"}),
        json!(r#"{"name": "Rex"}"#),
        false,
      ),
      traced_context(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(200));
  assert_eq!(result["isBase64Encoded"], json!(false));
  assert_eq!(result["headers"]["content-type"], json!("application/json"));

  let description = response_json(&result);
  assert_eq!(description["method"], json!("POST"));
  assert_eq!(description["path"], json!("/pets"));
  assert_eq!(description["query"], json!("page=2"));
  assert_eq!(description["host"], json!("api.example.com"));
  assert_eq!(description["body"], json!({"name": "Rex"}));
  assert_eq!(description["requestId"], json!("v1-request"));
  assert_eq!(description["stage"], json!("prod"));
  assert_eq!(description["sourceIp"], json!("203.0.113.7"));
  assert_eq!(
    description["traceId"],
    json!("Root=1-5759e988-bd862e3fe1be46a994272793")
  );
  assert_eq!(description["accountId"], json!("123456789012"));
  assert_eq!(description["headers"]["x-request-id"], json!(["v1-request"]));
  assert_eq!(description["headers"]["x-stage"], json!(["prod"]));
  assert_eq!(
    description["headers"]["x-amzn-trace-id"],
    json!(["Root=1-5759e988-bd862e3fe1be46a994272793"])
  );
  assert_eq!(description["headers"]["content-length"], json!(["15"]));
}

#[test]
fn test_echo_v2_json() {
  let gateway = Gateway::v2(echo);

  let result = gateway
    .invoke(
      http_api_event(
        "PUT",
        "/pets/1",
        json!({
          "content-type": "application/json; charset=utf-8",
          "accept": "text/html, application/json",
        }),
        json!(r#"[1, 2, 3]"#),
        false,
      ),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(200));
  assert_eq!(result["isBase64Encoded"], json!(false));

  let description = response_json(&result);
  assert_eq!(description["method"], json!("PUT"));
  assert_eq!(description["path"], json!("/pets/1"));
  assert_eq!(description["query"], json!("page=2"));
  assert_eq!(description["body"], json!([1, 2, 3]));
  assert_eq!(description["requestId"], json!("v2-request"));
  assert_eq!(description["stage"], json!("$default"));
  assert_eq!(description["sourceIp"], json!("198.51.100.4"));
  assert_eq!(description["traceId"], Value::Null);
  assert_eq!(description["accountId"], json!("210987654321"));
  assert_eq!(
    description["headers"]["accept"],
    json!(["text/html", "application/json"])
  );
  assert_eq!(description["headers"]["cookie"], json!(["theme=dark"]));
  assert_eq!(description["headers"].get("x-amzn-trace-id"), None);
}

#[test]
fn test_echo_text_body() {
  let gateway = Gateway::v2(echo);

  let result = gateway
    .invoke(
      http_api_event(
        "POST",
        "/notes",
        json!({"content-type": "text/plain"}),
        json!("just some text"),
        false,
      ),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(200));
  assert_eq!(response_json(&result)["body"], json!("just some text"));
}

#[test]
fn test_echo_binary_v1() {
  let gateway = Gateway::v1(echo);

  // Bytes 0x00 0xff 0x10 0x80.
  let result = gateway
    .invoke(
      proxy_event(
        "POST",
        "/binary",
        json!({"Content-Type": "application/octet-stream"}),
        json!("AP8QgA=="),
        true,
      ),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(200));
  assert_eq!(result["isBase64Encoded"], json!(true));
  assert_eq!(result["body"], json!("AP8QgA=="));
  assert_eq!(
    result["headers"]["content-type"],
    json!("application/octet-stream")
  );
}

#[test]
fn test_echo_binary_v2() {
  let gateway = Gateway::v2(echo);

  let result = gateway
    .invoke(
      http_api_event(
        "POST",
        "/binary",
        json!({"content-type": "image/png"}),
        json!("iVBORw0KGgo="),
        true,
      ),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(200));
  assert_eq!(result["isBase64Encoded"], json!(true));
  assert_eq!(result["body"], json!("iVBORw0KGgo="));
}

#[test]
fn test_echo_cookies_v2() {
  let gateway = Gateway::v2(echo);

  let result = gateway
    .invoke(
      http_api_event("GET", "/cookies", json!({}), Value::Null, false),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(204));
  assert_eq!(
    result["cookies"],
    json!(["flavor=oatmeal", "session=abc123; HttpOnly"])
  );
  assert_eq!(result["headers"].get("set-cookie"), None);
  assert_eq!(result["body"], json!(""));
  assert_eq!(result["isBase64Encoded"], json!(false));
}

#[test]
fn test_echo_cookies_v1() {
  let gateway = Gateway::v1(echo);

  let result = gateway
    .invoke(
      proxy_event("GET", "/cookies", json!({}), Value::Null, false),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(204));
  assert_eq!(
    result["multiValueHeaders"]["set-cookie"],
    json!(["flavor=oatmeal", "session=abc123; HttpOnly"])
  );
}

#[test]
fn test_echo_invalid_json() {
  let gateway = Gateway::v1(echo);

  let result = gateway
    .invoke(
      proxy_event(
        "POST",
        "/pets",
        json!({"Content-Type": "application/json"}),
        json!("{not json"),
        false,
      ),
      LambdaContext::default(),
    )
    .unwrap();

  assert_eq!(result["statusCode"], json!(400));
  assert_eq!(result["body"], json!("invalid JSON request body"));
  assert_eq!(
    result["headers"]["content-type"],
    json!("text/plain; charset=utf8")
  );
}
