//! End-to-end tests against the mock server.
//!
//! The core never does I/O, so these tests play the host: spin up the mock
//! server on a random port, execute built requests with `ureq` and feed the
//! responses back for parsing.

use std::collections::BTreeMap;
use std::net::TcpListener;

use cycle_core::{ApiError, CycleClient, CycleRequest, HttpMethod, HttpRequest, HttpResponse};

fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            mock_server::run(listener).await;
        });
    });
    format!("http://{addr}/v1/menstrualcycle")
}

fn execute(request: &HttpRequest) -> HttpResponse {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();
    let mut builder = match request.method {
        HttpMethod::Get => agent.get(&request.path),
    };
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (key, value) in &request.headers {
        builder = builder.header(key, value);
    }
    let mut response = builder.call().unwrap();
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap();
    HttpResponse {
        status,
        headers: vec![],
        body,
    }
}

#[test]
fn calculate_round_trip() {
    let base_url = start_server();
    let client = CycleClient::with_base_url("test-key", &base_url);

    let input = CycleRequest {
        last_period: "2024-01-01".to_string(),
        cycle_length: 28,
        period_length: 5,
        cycles: 3,
    };
    let request = client.build_calculate(&input).unwrap();
    let response = execute(&request);
    let parsed = client.parse_calculate(response).unwrap();

    assert_eq!(parsed.status, "ok");
    assert_eq!(parsed.data.last_period_date, "2024-01-01");
    assert_eq!(parsed.data.cycle_length, 28);
    assert_eq!(parsed.data.cycles.len(), 3);
    assert_eq!(parsed.data.cycles[0].cycle_number, 1);
    assert_eq!(parsed.data.cycles[0].period.start_date, "2024-01-29");
    assert_eq!(parsed.data.cycles[0].period.duration_days, 5);
    assert_eq!(parsed.data.averages.cycle_length, 28);
}

#[test]
fn calculate_with_defaults_only() {
    let base_url = start_server();
    let client = CycleClient::with_base_url("test-key", &base_url);

    let input = CycleRequest {
        last_period: "2024-01-01".to_string(),
        ..Default::default()
    };
    let request = client.build_calculate(&input).unwrap();
    assert_eq!(request.query.len(), 1);

    let parsed = client.parse_calculate(execute(&request)).unwrap();
    assert_eq!(parsed.data.cycle_length, 28);
    assert_eq!(parsed.data.period_length, 5);
    assert_eq!(parsed.data.cycles.len(), 3);
}

#[test]
fn server_rejects_impossible_date_that_passes_local_format_check() {
    let base_url = start_server();
    let client = CycleClient::with_base_url("test-key", &base_url);

    // The local check is shape-only, so month 99 builds fine.
    let input = CycleRequest {
        last_period: "2024-99-99".to_string(),
        ..Default::default()
    };
    let request = client.build_calculate(&input).unwrap();
    let err = client.parse_calculate(execute(&request)).unwrap_err();
    match err {
        ApiError::Api { status, .. } => assert_eq!(status, 400),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn raw_request_surfaces_server_side_validation() {
    let base_url = start_server();
    let client = CycleClient::with_base_url("test-key", &base_url);

    let request = client.build_calculate_raw(&BTreeMap::new()).unwrap();
    let err = client.parse_calculate(execute(&request)).unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Required parameter [last_period] is missing");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn invalid_input_fails_locally_without_network() {
    let client = CycleClient::new("test-key");
    let input = CycleRequest {
        last_period: "2024-01-01".to_string(),
        cycle_length: 50,
        ..Default::default()
    };
    let err = client.build_calculate(&input).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn missing_api_key_fails_locally() {
    let client = CycleClient::new("");
    let err = client.build_calculate(&CycleRequest::default()).unwrap_err();
    assert!(matches!(err, ApiError::MissingApiKey));
}
