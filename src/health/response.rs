use super::models::CompositeResult;
use actix_web::body::BoxBody;
use actix_web::{http::StatusCode, HttpRequest, HttpResponse, Responder};

impl CompositeResult {
    pub fn status_code(&self) -> StatusCode {
        if self.is_down() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        }
    }
}

/// The body has the same shape whether the service is up or down, so monitoring can
/// always see which probe failed.
impl Responder for CompositeResult {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::build(self.status_code()).json(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::ProbeResult;
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;
    use serde_json::{json, Value};

    async fn render(result: CompositeResult) -> (StatusCode, Value) {
        let req = TestRequest::default().to_http_request();
        let response = result.respond_to(&req);
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn empty_result_maps_to_ok_with_empty_object() {
        let (status, body) = render(CompositeResult::default()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[actix_web::test]
    async fn down_result_maps_to_service_unavailable_with_full_body() {
        let result = CompositeResult::from_entries(
            [
                ("DB".to_string(), ProbeResult::up()),
                ("URL".to_string(), ProbeResult::down("connection refused")),
            ]
            .into_iter()
            .collect(),
        );

        let (status, body) = render(result).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({
                "DB": {"status": "UP"},
                "URL": {"status": "DOWN", "error": "connection refused"}
            })
        );
    }
}
