use courier_client::{
    config::ClientConfig,
    optimizer_api::{CUSTOMERS_API_PATH, OptimizerApiClient, STORAGES_API_PATH},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub fn customers_body() -> Value {
    json!({
        "customers": [
            { "id": 1, "name": "Green Grocer", "address": "12 Market Street", "location": [40.71, -74.0] },
            { "id": 2, "name": "Bakery Dupont", "address": "3 Main Street", "location": [40.73, -73.99] }
        ]
    })
}

pub fn storages_body() -> Value {
    json!({
        "storages": [
            { "id": 7, "name": "Harbor", "address": "Pier 17", "location": [40.70, -74.01] }
        ]
    })
}

pub fn client_for(server: &MockServer) -> OptimizerApiClient {
    OptimizerApiClient::from_config(&ClientConfig::default().with_api_url(server.uri()))
}

/// Mock server already answering both listings.
pub async fn start_backend() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CUSTOMERS_API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(customers_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(STORAGES_API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(storages_body()))
        .mount(&server)
        .await;

    server
}
