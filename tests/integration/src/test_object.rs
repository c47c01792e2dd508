//! Object read/write integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{TestGateway, xml_text};

    #[tokio::test]
    async fn test_should_round_trip_object_bytes() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("roundtrip").await.expect("create");
        let url = gw.url(&format!("/bucket/{bucket}/object/docs/hello.bin"));
        let payload: Vec<u8> = (0..=255u8).collect();

        let resp = gw
            .client()
            .put(&url)
            .body(payload.clone())
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::OK);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Size"), Some("256"));
        assert_eq!(
            xml_text(&xml, "Location"),
            Some(format!("/bucket/{bucket}/object/docs/hello.bin").as_str())
        );

        let resp = gw
            .client()
            .get(format!("{url}?length=256"))
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/octet-stream")
        );
        let body = resp.bytes().await.expect("body");
        assert_eq!(&body[..], payload.as_slice());
    }

    #[tokio::test]
    async fn test_should_read_default_length_window() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("window").await.expect("create");
        let url = gw.url(&format!("/bucket/{bucket}/object/k"));

        gw.client()
            .put(&url)
            .body("abc")
            .send()
            .await
            .expect("put");

        let body = gw
            .client()
            .get(&url)
            .send()
            .await
            .expect("get")
            .bytes()
            .await
            .expect("body");
        assert_eq!(body.len(), 1024);
        assert_eq!(&body[..3], b"abc");
        assert!(body[3..].iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn test_should_write_at_offset() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("offset").await.expect("create");
        let url = gw.url(&format!("/bucket/{bucket}/object/k"));

        gw.client()
            .put(&url)
            .body("aaaaaaaa")
            .send()
            .await
            .expect("put");
        let resp = gw
            .client()
            .put(format!("{url}?offset=2"))
            .body("bbb")
            .send()
            .await
            .expect("put at offset");
        assert_eq!(resp.status(), StatusCode::OK);

        let body = gw
            .client()
            .get(format!("{url}?offset=1&length=6"))
            .send()
            .await
            .expect("get")
            .bytes()
            .await
            .expect("body");
        assert_eq!(&body[..], b"abbbaa");
    }

    #[tokio::test]
    async fn test_should_accept_form_upload() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("form").await.expect("create");
        let url = gw.url(&format!("/bucket/{bucket}/object/upload.txt"));

        let body = "--BOUNDARY\r\n\
                    Content-Disposition: form-data; name=\"file\"; filename=\"upload.txt\"\r\n\
                    Content-Type: text/plain\r\n\r\n\
                    form payload\r\n\
                    --BOUNDARY--\r\n";
        let resp = gw
            .client()
            .put(&url)
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(body)
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::OK);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Size"), Some("12"));

        let body = gw
            .client()
            .get(format!("{url}?length=12"))
            .send()
            .await
            .expect("get")
            .bytes()
            .await
            .expect("body");
        assert_eq!(&body[..], b"form payload");
    }
}
