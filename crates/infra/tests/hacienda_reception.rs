//! Submission against a mocked Hacienda reception endpoint.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dtesv_infra::SubmissionError;
use dtesv_invoicing::{DteDocument, DteStatus};

use common::{TOKEN, client, config, draft_for, sample_invoice};

async fn mount_signer(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/firmardocumento/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "body": "ABC"})))
        .mount(server)
        .await;
}

async fn signed_document(server: &MockServer) -> DteDocument {
    let invoice = sample_invoice();
    let mut doc = draft_for(&invoice);
    client(config(&server.uri())).sign(&invoice, &mut doc).await.unwrap();
    doc
}

#[tokio::test]
async fn processed_response_marks_document_submitted() {
    let server = MockServer::start().await;
    mount_signer(&server).await;
    let mut doc = signed_document(&server).await;
    let code = doc.generation_code().unwrap();

    Mock::given(method("POST"))
        .and(path("/fesv/recepciondte"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({
            "ambiente": "00",
            "idEnvio": 1,
            "version": 1,
            "tipoDte": "01",
            "documento": "ABC",
            "codigoGeneracion": code.to_string()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": 2,
            "ambiente": "00",
            "estado": "PROCESADO",
            "codigoGeneracion": code.to_string(),
            "selloRecibido": "SELLO123ABC",
            "descripcionMsg": "RECIBIDO"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = client(config(&server.uri())).submit(&mut doc).await.unwrap();

    assert_eq!(doc.status(), DteStatus::Submitted);
    let receipt = doc.receipt().unwrap();
    assert_eq!(receipt.stamp.as_deref(), Some("SELLO123ABC"));
    assert_eq!(receipt.response["descripcionMsg"], "RECIBIDO");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), "dte.document.submission_accepted");
}

#[tokio::test]
async fn rejected_response_marks_document_rejected() {
    let server = MockServer::start().await;
    mount_signer(&server).await;
    let mut doc = signed_document(&server).await;

    Mock::given(method("POST"))
        .and(path("/fesv/recepciondte"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "estado": "RECHAZADO",
            "descripcionMsg": "Error en validación",
            "observaciones": ["Campo #/receptor/numDocumento no cumple el formato requerido"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(config(&server.uri())).submit(&mut doc).await.unwrap_err();

    assert_eq!(doc.status(), DteStatus::Rejected);
    let SubmissionError::Rejected { message, response, events } = err else {
        panic!("expected rejection, got {err:?}");
    };
    assert_eq!(message, "Error en validación");
    assert_eq!(response.unwrap()["estado"], "RECHAZADO");
    assert_eq!(events[0].event_type(), "dte.document.submission_rejected");
    assert!(doc.receipt().is_none());
}

#[tokio::test]
async fn ok_status_without_processed_state_is_a_rejection() {
    let server = MockServer::start().await;
    mount_signer(&server).await;
    let mut doc = signed_document(&server).await;

    Mock::given(method("POST"))
        .and(path("/fesv/recepciondte"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"estado": "OBSERVADO"})))
        .mount(&server)
        .await;

    let err = client(config(&server.uri())).submit(&mut doc).await.unwrap_err();
    assert_eq!(err.message(), "unknown error");
    assert_eq!(doc.status(), DteStatus::Rejected);
}

#[tokio::test]
async fn unreachable_hacienda_is_a_rejection() {
    let server = MockServer::start().await;
    mount_signer(&server).await;
    let mut doc = signed_document(&server).await;

    let cfg = config(&server.uri()).with_reception_url("http://127.0.0.1:1/fesv/recepciondte");
    let err = client(cfg).submit(&mut doc).await.unwrap_err();

    assert!(matches!(err, SubmissionError::Rejected { response: None, .. }));
    assert_eq!(doc.status(), DteStatus::Rejected);
    assert!(doc.rejection().unwrap().message.contains("could not reach Hacienda"));
}

#[tokio::test]
async fn unsigned_document_never_reaches_hacienda() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fesv/recepciondte"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let invoice = sample_invoice();
    let mut doc = draft_for(&invoice);
    let err = client(config(&server.uri())).submit(&mut doc).await.unwrap_err();

    assert!(matches!(err, SubmissionError::Precondition(_)));
    assert_eq!(doc.status(), DteStatus::Draft);
}
