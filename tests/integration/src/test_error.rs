//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use ruststack_block_core::BlockConfig;

    use crate::{TestGateway, test_bucket_name, xml_text};

    #[tokio::test]
    async fn test_should_return_no_such_bucket_on_get() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = test_bucket_name("ghost");

        let resp = gw
            .client()
            .get(gw.url(&format!("/bucket/{bucket}/object/k")))
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/xml")
        );
        let request_id = resp
            .headers()
            .get("x-amz-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("request id")
            .to_owned();

        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("NoSuchBucket"));
        assert_eq!(xml_text(&xml, "Resource"), Some(bucket.as_str()));
        assert_eq!(xml_text(&xml, "RequestId"), Some(request_id.as_str()));
    }

    #[tokio::test]
    async fn test_should_return_no_such_bucket_on_put() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let resp = gw
            .client()
            .put(gw.url("/bucket/nowhere/object/k"))
            .body("data")
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("NoSuchBucket"));
    }

    #[tokio::test]
    async fn test_should_return_no_such_key_on_get() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("nokey").await.expect("create");

        let resp = gw
            .client()
            .get(gw.url(&format!("/bucket/{bucket}/object/missing.txt")))
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("NoSuchKey"));
    }

    #[tokio::test]
    async fn test_should_return_invalid_range_past_end() {
        let gw = TestGateway::with_capacity(8192).await.expect("gateway");
        let bucket = gw.create_bucket("range").await.expect("create");
        let url = gw.url(&format!("/bucket/{bucket}/object/k"));
        gw.client().put(&url).body("abc").send().await.expect("put");

        let resp = gw
            .client()
            .get(format!("{url}?offset=100000&length=1"))
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("InvalidRange"));
    }

    #[tokio::test]
    async fn test_should_reject_malformed_offset() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("badoffset").await.expect("create");

        let resp = gw
            .client()
            .put(gw.url(&format!("/bucket/{bucket}/object/k?offset=ten")))
            .body("data")
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("InvalidArgument"));
    }

    #[tokio::test]
    async fn test_should_reject_unknown_path_and_wrong_method() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");

        let resp = gw
            .client()
            .get(gw.url("/not/a/route"))
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("InvalidRequest"));

        let resp = gw
            .client()
            .put(gw.url("/capacity"))
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("MethodNotAllowed"));
    }

    #[tokio::test]
    async fn test_should_reject_oversized_body() {
        let config = BlockConfig::builder()
            .capacity(1 << 20)
            .max_body_size(1024)
            .build();
        let gw = TestGateway::start(config).await.expect("gateway");
        let bucket = gw.create_bucket("big").await.expect("create");

        let resp = gw
            .client()
            .put(gw.url(&format!("/bucket/{bucket}/object/k")))
            .body(vec![7u8; 2048])
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("EntityTooLarge"));
    }

    #[tokio::test]
    async fn test_should_answer_health_check() {
        let gw = TestGateway::with_capacity(1024).await.expect("gateway");
        for path in ["/health", "/_health"] {
            let resp = gw.client().get(gw.url(path)).send().await.expect("health");
            assert_eq!(resp.status(), StatusCode::OK);
            let body = resp.text().await.expect("body");
            assert!(body.contains("\"status\":\"running\""));
        }
    }
}
