//! Pipeline entry points.
//!
//! - `LookupPipeline`: runs one invocation through its stages
//! - `handle_request`: the request boundary; opens storage, builds the
//!   lookup client, runs the pipeline and maps the outcome to a response

mod response;
mod run;

pub use response::{LookupResponse, ResponseBody, error_response, respond};
pub use run::{LookupPipeline, PipelineFailure, PipelineStage, RunReport};

use crate::error::Result;
use crate::models::Config;
use crate::services::LookupClient;
use crate::storage::{BlobStore, open_store};

/// Serve one inbound request. Never fails; errors become a 500 response.
pub async fn handle_request(config: &Config) -> LookupResponse {
    log::info!("Lookup triggered");

    let (store, client) = match connect(config).await {
        Ok(parts) => parts,
        Err(error) => return error_response(&error),
    };

    let mut pipeline = LookupPipeline::new(config, store.as_ref(), &client);
    respond(&pipeline.run().await)
}

async fn connect(config: &Config) -> Result<(Box<dyn BlobStore>, LookupClient)> {
    let store = open_store(&config.storage).await?;
    let client = LookupClient::new(&config.lookup)?;
    Ok((store, client))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::{AppError, ErrorKind};
    use crate::models::{Candidate, EnrichmentResult};
    use crate::services::Enricher;
    use crate::storage::LocalStorage;

    const CONTAINER: &str = "nonprofits";
    const OUTPUT: &str = "NonprofitLookupResults.csv";
    const FIXTURE: &[u8] = include_bytes!("../../tests/fixtures/organisations.xlsx");

    /// Answers from a fixed table; unknown names get an empty result.
    struct ScriptedEnricher {
        answers: HashMap<String, EnrichmentResult>,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedEnricher {
        fn new(answers: &[(&str, &str, &str)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(name, phone, website)| {
                        (
                            name.to_string(),
                            EnrichmentResult {
                                phone: phone.to_string(),
                                website: website.to_string(),
                            },
                        )
                    })
                    .collect(),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Enricher for ScriptedEnricher {
        async fn lookup(&self, candidate: &Candidate) -> EnrichmentResult {
            self.seen.lock().unwrap().push(candidate.query());
            self.answers
                .get(&candidate.name)
                .cloned()
                .unwrap_or_default()
        }
    }

    /// Reads from a local directory but refuses every write.
    struct ReadOnlyStore(LocalStorage);

    #[async_trait]
    impl BlobStore for ReadOnlyStore {
        async fn read_bytes(&self, container: &str, name: &str) -> Result<Vec<u8>> {
            self.0.read_bytes(container, name).await
        }

        async fn write_bytes(&self, _: &str, name: &str, _: &[u8], _: &str) -> Result<()> {
            Err(AppError::storage(name, "This request is not authorized"))
        }
    }

    fn test_config(root: &std::path::Path, input_file: &str) -> Config {
        let mut config = Config::default();
        config.lookup.api_key = "test-key".to_string();
        config.storage.connection = Url::from_directory_path(root).unwrap().to_string();
        config.storage.container = CONTAINER.to_string();
        config.storage.input_file = input_file.to_string();
        config
    }

    async fn seed(storage: &LocalStorage, name: &str, bytes: &[u8]) {
        storage
            .write_bytes(CONTAINER, name, bytes, "application/octet-stream")
            .await
            .unwrap();
    }

    async fn read_output(storage: &LocalStorage) -> Vec<Vec<String>> {
        let bytes = storage.read_bytes(CONTAINER, OUTPUT).await.unwrap();
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes.as_slice())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn table(rows: &[[&str; 3]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_workbook_run_degrades_failed_lookup() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        seed(&storage, "Vereine.xlsx", FIXTURE).await;

        let config = test_config(tmp.path(), "Vereine.xlsx");
        let enricher = ScriptedEnricher::new(&[("Helping Hands", "+49 1", "hh.org")]);
        let mut pipeline = LookupPipeline::new(&config, &storage, &enricher);

        let report = pipeline.run().await.unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Succeeded);
        assert_eq!(report.processed, 2);
        assert_eq!(report.degraded, 1);
        assert_eq!(report.output_file, OUTPUT);
        assert_eq!(
            enricher.queries(),
            vec!["Helping Hands Berlin", "Food Bank Cologne"]
        );

        assert_eq!(
            read_output(&storage).await,
            table(&[
                ["Organisation", "Phone", "Website"],
                ["Helping Hands", "+49 1", "hh.org"],
                ["Food Bank", "", ""],
            ])
        );
    }

    #[tokio::test]
    async fn test_cap_applies_to_named_rows() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let mut input = String::from("Name,Typ,Ort\n");
        for i in 0..250 {
            input.push_str(&format!("Org {i},e.V.,Berlin\n"));
            input.push_str(",e.V.,Nowhere\n");
        }
        seed(&storage, "Vereine.csv", input.as_bytes()).await;

        let config = test_config(tmp.path(), "Vereine.csv");
        let enricher = ScriptedEnricher::new(&[]);
        let report = LookupPipeline::new(&config, &storage, &enricher)
            .run()
            .await
            .unwrap();

        assert_eq!(report.processed, 200);
        let output = read_output(&storage).await;
        assert_eq!(output.len(), 201);
        assert_eq!(output[200][0], "Org 199");
    }

    #[tokio::test]
    async fn test_unparseable_input_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        seed(&storage, "Vereine.xlsx", b"PK\x03\x04 truncated").await;

        let config = test_config(tmp.path(), "Vereine.xlsx");
        let enricher = ScriptedEnricher::new(&[]);
        let mut pipeline = LookupPipeline::new(&config, &storage, &enricher);

        let failure = pipeline.run().await.unwrap_err();
        assert_eq!(failure.stage, PipelineStage::Parsing);
        assert_eq!(failure.error.kind(), ErrorKind::ParseError);
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
        assert!(enricher.queries().is_empty());
        assert!(!tmp.path().join(CONTAINER).join(OUTPUT).exists());

        let response = respond(&Err(failure));
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn test_missing_input_fails_while_fetching() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let config = test_config(tmp.path(), "Vereine.xlsx");
        let enricher = ScriptedEnricher::new(&[]);
        let failure = LookupPipeline::new(&config, &storage, &enricher)
            .run()
            .await
            .unwrap_err();

        assert_eq!(failure.stage, PipelineStage::Fetching);
        assert_eq!(failure.error.kind(), ErrorKind::StorageError);
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let local = LocalStorage::new(tmp.path());
        seed(&local, "Vereine.xlsx", FIXTURE).await;
        let storage = ReadOnlyStore(local);

        let config = test_config(tmp.path(), "Vereine.xlsx");
        let enricher = ScriptedEnricher::new(&[]);
        let failure = LookupPipeline::new(&config, &storage, &enricher)
            .run()
            .await
            .unwrap_err();

        assert_eq!(failure.stage, PipelineStage::Uploading);
        assert_eq!(enricher.queries().len(), 2);

        let response = respond(&Err(failure));
        let body: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("This request is not authorized")
        );
    }

    #[tokio::test]
    async fn test_handle_request_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        seed(&storage, "Vereine.xlsx", FIXTURE).await;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/v1/LocalSearch/"))
            .and(query_param("query", "Helping Hands Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceSets": [{ "resources": [{ "PhoneNumber": "+49 1", "Website": "hh.org" }] }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/REST/v1/LocalSearch/"))
            .and(query_param("query", "Food Bank Cologne"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let mut config = test_config(tmp.path(), "Vereine.xlsx");
        config.lookup.endpoint = format!("{}/REST/v1/LocalSearch/", server.uri());

        let response = handle_request(&config).await;
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            ResponseBody::Success {
                message: "Lookup completed successfully".to_string(),
                output_file: OUTPUT.to_string(),
            }
        );
        assert_eq!(
            read_output(&storage).await,
            table(&[
                ["Organisation", "Phone", "Website"],
                ["Helping Hands", "+49 1", "hh.org"],
                ["Food Bank", "", ""],
            ])
        );
    }

    #[tokio::test]
    async fn test_handle_request_bad_connection() {
        let mut config = test_config(std::path::Path::new("/"), "Vereine.xlsx");
        config.storage.connection = "gopher://nowhere".to_string();

        let response = handle_request(&config).await;
        assert_eq!(response.status, 500);
        assert!(response.to_json().contains("Unsupported storage scheme"));
    }
}
