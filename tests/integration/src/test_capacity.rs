//! Capacity ledger and address-space integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{TestGateway, xml_text};

    #[tokio::test]
    async fn test_should_report_initial_capacity() {
        let gw = TestGateway::with_capacity(8192).await.expect("gateway");
        let resp = gw.client().get(gw.url("/capacity")).send().await.expect("capacity");
        assert_eq!(resp.status(), StatusCode::OK);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "TotalCapacity"), Some("8192"));
        assert_eq!(xml_text(&xml, "Allocated"), Some("0"));
        assert_eq!(xml_text(&xml, "Remaining"), Some("8192"));
    }

    #[tokio::test]
    async fn test_should_allocate_metadata_until_exhausted() {
        let gw = TestGateway::with_capacity(1024).await.expect("gateway");

        let resp = gw
            .client()
            .post(gw.url("/allocate-metadata/1000"))
            .send()
            .await
            .expect("allocate");
        assert_eq!(resp.status(), StatusCode::OK);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Size"), Some("1000"));
        assert_eq!(xml_text(&xml, "Remaining"), Some("24"));

        let resp = gw
            .client()
            .post(gw.url("/allocate-metadata/25"))
            .send()
            .await
            .expect("over-allocate");
        assert_eq!(resp.status(), StatusCode::INSUFFICIENT_STORAGE);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("InsufficientCapacity"));

        let resp = gw
            .client()
            .post(gw.url("/allocate-metadata/24"))
            .send()
            .await
            .expect("exact fill");
        assert_eq!(resp.status(), StatusCode::OK);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Remaining"), Some("0"));
    }

    #[tokio::test]
    async fn test_should_list_namespaces() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("ns").await.expect("create");
        gw.client()
            .put(gw.url(&format!("/bucket/{bucket}/object/k")))
            .body("x")
            .send()
            .await
            .expect("put");

        let xml = gw
            .client()
            .get(gw.url("/namespaces"))
            .send()
            .await
            .expect("namespaces")
            .text()
            .await
            .expect("body");
        assert!(xml.contains("<ListNamespacesResult"));
        assert!(xml.contains(&format!(
            "<Name>{bucket}</Name><KeyCount>1</KeyCount><Registered>true</Registered>"
        )));
        assert!(xml.contains("<Name>buckets</Name>"));
        assert!(xml.contains("<Name>objects</Name>"));
    }
}
