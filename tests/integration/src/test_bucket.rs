//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{TestGateway, xml_text};

    #[tokio::test]
    async fn test_should_create_head_and_delete_bucket() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = crate::test_bucket_name("lifecycle");
        let url = gw.url(&format!("/bucket/{bucket}"));

        let resp = gw.client().post(&url).send().await.expect("create");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some(format!("/bucket/{bucket}").as_str())
        );
        assert_eq!(
            resp.headers().get("server").and_then(|v| v.to_str().ok()),
            Some("RustStackBlock")
        );

        let resp = gw.client().head(&url).send().await.expect("head");
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = gw.client().delete(&url).send().await.expect("delete");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = gw.client().head(&url).send().await.expect("head after delete");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_should_list_buckets() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let b1 = gw.create_bucket("list1").await.expect("create b1");
        let b2 = gw.create_bucket("list2").await.expect("create b2");

        for path in ["/", "/buckets"] {
            let resp = gw.client().get(gw.url(path)).send().await.expect("list");
            assert_eq!(resp.status(), StatusCode::OK);
            let xml = resp.text().await.expect("body");
            assert!(xml.contains("<ListAllMyBucketsResult"));
            assert!(xml.contains(&format!("<Name>{b1}</Name>")), "should contain {b1}");
            assert!(xml.contains(&format!("<Name>{b2}</Name>")), "should contain {b2}");
            assert_eq!(xml_text(&xml, "ID"), Some("ruststack"));
        }
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_bucket() {
        let gw = TestGateway::with_capacity(1 << 20).await.expect("gateway");
        let bucket = gw.create_bucket("dup").await.expect("create");

        let resp = gw
            .client()
            .post(gw.url(&format!("/bucket/{bucket}")))
            .send()
            .await
            .expect("second create");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let xml = resp.text().await.expect("body");
        assert_eq!(xml_text(&xml, "Code"), Some("BucketAlreadyExists"));
    }

    #[tokio::test]
    async fn test_should_charge_bucket_metadata_to_ledger() {
        let gw = TestGateway::with_capacity(4096).await.expect("gateway");
        gw.create_bucket("charged").await.expect("create");

        let xml = gw
            .client()
            .get(gw.url("/capacity"))
            .send()
            .await
            .expect("capacity")
            .text()
            .await
            .expect("body");
        assert_eq!(xml_text(&xml, "Allocated"), Some("1024"));
        assert_eq!(xml_text(&xml, "Remaining"), Some("3072"));
    }
}
