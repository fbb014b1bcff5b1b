//! AWS Lambda handler for tax evaluations
//!
//! Accepts an evaluation request as JSON through a Lambda Function URL and
//! returns the outputs and alerts for it.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use tax_engine::{EngineConfig, FieldMap, Regime, TaxEngine, TaxType};

/// Request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationRequest {
    tax_type: TaxType,
    #[serde(default)]
    regime: Regime,
    #[serde(default)]
    inputs: FieldMap,
    /// Optional overrides for rates and thresholds
    #[serde(default)]
    config: Option<EngineConfig>,
}

fn respond(status_code: i64, body: String) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_body(message: &str) -> String {
    json!({ "error": message }).to_string()
}

/// Evaluate one request body, returning the status code and JSON body
fn handle_body(body: &str) -> (i64, String) {
    let request: EvaluationRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return (400, error_body(&format!("Invalid JSON: {}", e))),
    };

    let engine = TaxEngine::with_config(request.config.unwrap_or_default());
    let evaluation = match engine.evaluate(request.tax_type, request.regime, &request.inputs) {
        Ok(evaluation) => evaluation,
        Err(e) if e.is_validation() => return (400, error_body(&e.to_string())),
        Err(e) => return (500, error_body(&e.to_string())),
    };

    match serde_json::to_string(&evaluation) {
        Ok(json) => (200, json),
        Err(e) => (500, error_body(&e.to_string())),
    }
}

async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;

    if request.is_base64_encoded {
        warn!("rejecting base64-encoded request body");
        return Ok(respond(400, error_body("binary request bodies are not supported")));
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());
    let (status, body) = handle_body(&body);
    info!("evaluation request finished with status {}", status);
    Ok(respond(status, body))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::Value;

    #[test]
    fn test_evaluates_request() {
        let (status, body) = handle_body(
            r#"{"taxType": "VAT", "inputs": {"monthlySales": 1000000, "monthlyPurchases": 400000}}"#,
        );
        assert_eq!(status, 200);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["taxType"], "VAT");
        assert_eq!(value["regime"], "2026+");
        assert_relative_eq!(value["outputs"]["vatPayable"].as_f64().unwrap(), 45_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_config_override() {
        let (status, body) = handle_body(
            r#"{"taxType": "VAT", "inputs": {"monthlySales": 1000}, "config": {"vatRate": 0.1}}"#,
        );
        assert_eq!(status, 200);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_relative_eq!(value["outputs"]["vatPayable"].as_f64().unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bad_requests() {
        assert_eq!(handle_body("not json").0, 400);
        assert_eq!(handle_body(r#"{"taxType": "GST"}"#).0, 400);

        let (status, body) = handle_body(
            r#"{"taxType": "WHT", "inputs": {"vendors": [{"name": "X", "type": "trust", "amount": 5}]}}"#,
        );
        assert_eq!(status, 400);
        assert!(body.contains("unknown vendor type"));
    }
}
