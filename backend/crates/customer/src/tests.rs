//! Use case and router tests for the customer crate

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    use auth::Principal;
    use kernel::id::ClientDataId;
    use platform::clamav::{ScanError, ScanVerdict, VirusScanner};

    use crate::domain::client_data::{ClientData, NewClientData};
    use crate::domain::repository::ClientDataRepository;
    use crate::domain::value_object::Uid;
    use crate::error::CustomerResult;

    pub const INFECTED: &[u8] = b"infected-bytes";

    /// Clones share the same store
    #[derive(Clone, Default)]
    pub struct MemoryClients {
        next_id: Arc<AtomicI64>,
        rows: Arc<Mutex<Vec<ClientData>>>,
    }

    impl MemoryClients {
        pub fn get(&self, uid: &str) -> Option<ClientData> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.uid.as_str() == uid)
                .cloned()
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn insert(&self, data: &NewClientData) -> ClientData {
            let client = ClientData {
                id: ClientDataId::from_db(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                uid: data.uid.clone(),
                email: data.email.clone(),
                image: data.image.clone(),
                coupon_used: data.coupon_used,
            };
            self.rows.lock().unwrap().push(client.clone());
            client
        }
    }

    impl ClientDataRepository for MemoryClients {
        async fn find_by_uid(&self, uid: &Uid) -> CustomerResult<Option<ClientData>> {
            Ok(self.get(uid.as_str()))
        }

        async fn create_if_absent(&self, data: &NewClientData) -> CustomerResult<(ClientData, bool)> {
            match self.get(data.uid.as_str()) {
                Some(existing) => Ok((existing, false)),
                None => Ok((self.insert(data), true)),
            }
        }

        async fn upsert(&self, data: &NewClientData) -> CustomerResult<ClientData> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|c| c.uid == data.uid) {
                row.email = data.email.clone();
                if data.image.is_some() {
                    row.image = data.image.clone();
                }
                row.coupon_used = data.coupon_used;
                return Ok(row.clone());
            }
            drop(rows);
            Ok(self.insert(data))
        }

        async fn set_coupon_used(&self, uid: &Uid, used: bool) -> CustomerResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|c| &c.uid == uid) {
                Some(row) => {
                    row.coupon_used = used;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn claim_coupon(&self, uid: &Uid) -> CustomerResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|c| &c.uid == uid && !c.coupon_used) {
                Some(row) => {
                    row.coupon_used = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn set_image(&self, uid: &Uid, image: &[u8]) -> CustomerResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|c| &c.uid == uid) {
                Some(row) => {
                    row.image = Some(image.to_vec());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    pub struct StubScanner;

    impl VirusScanner for StubScanner {
        async fn scan(&self, data: &[u8]) -> Result<ScanVerdict, ScanError> {
            if data == INFECTED {
                return Ok(ScanVerdict::Infected {
                    signature: "Eicar-Signature".to_string(),
                });
            }
            Ok(ScanVerdict::Clean)
        }
    }

    pub fn principal(subject: &str) -> Principal {
        Principal {
            subject: subject.to_string(),
            username: Some(format!("{subject}-name")),
            email: Some(format!("{subject}@example.com")),
            authorities: vec!["ROLE_user".to_string()],
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use super::support::*;
    use crate::application::*;
    use crate::error::CustomerError;
    use platform::image::{ImageValidator, UploadedImage};
    use std::sync::Arc;

    fn images() -> ImageValidator<StubScanner> {
        ImageValidator::new(Arc::new(StubScanner), 1024)
    }

    fn jpeg(bytes: &[u8]) -> UploadedImage {
        UploadedImage::new(Some("me.jpg".into()), Some("image/jpeg".into()), bytes.to_vec())
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let repo = Arc::new(MemoryClients::default());
        let use_case = GetOrCreateClientUseCase::new(repo.clone());

        let first = use_case.execute("uid-1".into(), Some("Ana@Example.com")).await.unwrap();
        assert!(first.created);
        assert_eq!(first.client.email.unwrap().as_str(), "ana@example.com");
        assert!(!first.client.coupon_used);

        let second = use_case.execute("uid-1".into(), None).await.unwrap();
        assert!(!second.created);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_drops_malformed_token_email() {
        let repo = Arc::new(MemoryClients::default());
        let output = GetOrCreateClientUseCase::new(repo)
            .execute("uid-2".into(), Some("not-an-email"))
            .await
            .unwrap();
        assert!(output.created);
        assert!(output.client.email.is_none());
    }

    #[tokio::test]
    async fn test_save_upserts_by_subject() {
        let repo = Arc::new(MemoryClients::default());
        let save = SaveClientDataUseCase::new(repo.clone(), images());
        let ana = principal("uid-ana");

        let saved = save
            .execute(
                &ana,
                SaveClientDataInput {
                    email: Some("ana@example.com".into()),
                    image: Some(jpeg(b"jpeg-bytes")),
                    coupon_used: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.uid.as_str(), "uid-ana");
        assert!(saved.has_image());

        let saved = save
            .execute(
                &ana,
                SaveClientDataInput {
                    email: Some("ana@work.example".into()),
                    image: None,
                    coupon_used: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(repo.len(), 1);
        assert!(saved.coupon_used);
        assert_eq!(saved.image.as_deref(), Some(&b"jpeg-bytes"[..]));

        let err = save
            .execute(
                &ana,
                SaveClientDataInput {
                    email: None,
                    image: Some(jpeg(INFECTED)),
                    coupon_used: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::Image(_)));
    }

    #[tokio::test]
    async fn test_update_image_checks_in_order() {
        let repo = Arc::new(MemoryClients::default());
        let update = UpdateClientImageUseCase::new(repo.clone(), images());
        let ana = principal("uid-ana");

        let err = update
            .execute(&ana, "uid-bob".into(), Some(jpeg(b"x")))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::NotOwner));

        let err = update
            .execute(&ana, "uid-ana".into(), Some(jpeg(b"x")))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::ClientNotFound));

        GetOrCreateClientUseCase::new(repo.clone())
            .execute("uid-ana".into(), None)
            .await
            .unwrap();

        let err = update.execute(&ana, "uid-ana".into(), None).await.unwrap_err();
        assert!(matches!(err, CustomerError::Validation(_)));

        tokio_test::assert_ok!(update.execute(&ana, "uid-ana".into(), Some(jpeg(b"new"))).await);
        assert_eq!(repo.get("uid-ana").unwrap().image, Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_concurrent_consumes_claim_coupon_once() {
        let repo = Arc::new(MemoryClients::default());
        GetOrCreateClientUseCase::new(repo.clone())
            .execute("uid-ana".into(), None)
            .await
            .unwrap();

        let first = SetCouponUseCase::new(repo.clone());
        let second = SetCouponUseCase::new(repo.clone());
        let (a, b) = tokio::join!(first.consume("uid-ana"), second.consume("uid-ana"));

        let claimed = [a.unwrap(), b.unwrap()];
        assert_eq!(claimed.iter().filter(|c| **c).count(), 1);
        assert!(repo.get("uid-ana").unwrap().coupon_used);
    }

    #[tokio::test]
    async fn test_coupon_consume_only_once() {
        let repo = Arc::new(MemoryClients::default());
        let coupon = SetCouponUseCase::new(repo.clone());

        assert!(!coupon.consume("uid-ghost").await.unwrap());

        GetOrCreateClientUseCase::new(repo.clone())
            .execute("uid-ana".into(), None)
            .await
            .unwrap();
        assert!(coupon.consume("uid-ana").await.unwrap());
        assert!(!coupon.consume("uid-ana").await.unwrap());
        assert!(repo.get("uid-ana").unwrap().coupon_used);

        assert!(!coupon.execute("uid-ana".into(), false).await.unwrap());
        assert!(matches!(
            coupon.execute("uid-ghost".into(), true).await,
            Err(CustomerError::ClientNotFound)
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use super::support::*;
    use crate::presentation::router::customer_router_generic;
    use auth::Principal;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use platform::image::ImageValidator;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "client-boundary";

    fn app(repo: MemoryClients) -> Router {
        Router::new().nest(
            "/api/client-data",
            customer_router_generic(repo, ImageValidator::new(Arc::new(StubScanner), 4096)),
        )
    }

    fn request(method: Method, uri: &str, user: Option<Principal>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.extension(user);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn multipart(
        method: Method,
        uri: &str,
        user: Principal,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
        if let Some((content_type, data)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"imagen\"; filename=\"me.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(method)
            .uri(uri)
            .extension(user)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_creates_then_returns() {
        let repo = MemoryClients::default();

        let response = app(repo.clone())
            .oneshot(request(Method::GET, "/api/client-data/uid-ana", Some(principal("uid-ana"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "id": 1,
                "uid": "uid-ana",
                "correo": "uid-ana@example.com",
                "imagen": null,
                "usoCodigoDescuento": false
            })
        );

        let response = app(repo)
            .oneshot(request(Method::GET, "/api/client-data/uid-ana", Some(principal("uid-ana"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_toggle_coupon() {
        let repo = MemoryClients::default();

        let response = app(repo.clone())
            .oneshot(request(
                Method::PUT,
                "/api/client-data/uid-ana/toggle-coupon?useCoupon=true",
                Some(principal("uid-ana")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Client not found"}));

        app(repo.clone())
            .oneshot(request(Method::GET, "/api/client-data/uid-ana", Some(principal("uid-ana"))))
            .await
            .unwrap();

        let response = app(repo.clone())
            .oneshot(request(
                Method::PUT,
                "/api/client-data/uid-ana/toggle-coupon?useCoupon=true",
                Some(principal("uid-ana")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"usoCodigoDescuento": true}));
        assert!(repo.get("uid-ana").unwrap().coupon_used);
    }

    #[tokio::test]
    async fn test_post_and_image_roundtrip() {
        let repo = MemoryClients::default();

        let response = app(repo.clone())
            .oneshot(multipart(
                Method::POST,
                "/api/client-data",
                principal("uid-ana"),
                &[("correo", "ana@example.com"), ("usoCodigoDescuento", "false")],
                Some(("image/jpeg", b"\xff\xd8\xffjpeg")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["uid"], "uid-ana");
        assert_eq!(body["imagen"], "/9j/anBlZw==");

        let response = app(repo.clone())
            .oneshot(request(Method::GET, "/api/client-data/uid-ana/image", Some(principal("uid-bob"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"\xff\xd8\xffjpeg");

        let response = app(repo)
            .oneshot(request(Method::GET, "/api/client-data/uid-bob/image", Some(principal("uid-bob"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_image_rules() {
        let repo = MemoryClients::default();
        app(repo.clone())
            .oneshot(request(Method::GET, "/api/client-data/uid-ana", Some(principal("uid-ana"))))
            .await
            .unwrap();

        let response = app(repo.clone())
            .oneshot(multipart(
                Method::PUT,
                "/api/client-data/uid-ana/image",
                principal("uid-bob"),
                &[],
                Some(("image/png", b"png")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(repo.clone())
            .oneshot(multipart(
                Method::PUT,
                "/api/client-data/uid-ana/image",
                principal("uid-ana"),
                &[],
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(repo.clone())
            .oneshot(multipart(
                Method::PUT,
                "/api/client-data/uid-ana/image",
                principal("uid-ana"),
                &[],
                Some(("image/gif", b"GIF89a")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response = app(repo.clone())
            .oneshot(multipart(
                Method::PUT,
                "/api/client-data/uid-ana/image",
                principal("uid-ana"),
                &[],
                Some(("image/png", INFECTED)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(repo.clone())
            .oneshot(multipart(
                Method::PUT,
                "/api/client-data/uid-ana/image",
                principal("uid-ana"),
                &[],
                Some(("image/png", b"png")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"message": "Image updated"}));
        assert_eq!(repo.get("uid-ana").unwrap().image, Some(b"png".to_vec()));
    }
}
